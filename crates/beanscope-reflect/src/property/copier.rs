use std::any::Any;

use beanscope_types::{superclass_chain, ClassId, TypeEnv};

/// Copies every instance field of `class` (declared on it or inherited) from `source` to
/// `destination`, returning the number of fields copied.
///
/// Fields without runtime hooks, read-only fields and fields whose read or write fails are
/// skipped; the failure is logged.
pub fn copy_bean_properties(
    env: &dyn TypeEnv,
    class: ClassId,
    source: &dyn Any,
    destination: &mut dyn Any,
) -> usize {
    let mut copied = 0;
    for current in superclass_chain(env, class) {
        let Some(def) = env.class(current) else {
            continue;
        };
        for field in def.fields.iter().filter(|field| !field.is_static) {
            let Some(access) = field.access.as_ref().filter(|access| access.is_writable()) else {
                continue;
            };
            let result = access
                .read(source)
                .and_then(|value| access.write(destination, value));
            match result {
                Ok(()) => copied += 1,
                Err(err) => {
                    tracing::debug!(
                        class = %def.name,
                        field = %field.name,
                        error = %err,
                        "skipping field while copying bean properties"
                    );
                }
            }
        }
    }
    copied
}
