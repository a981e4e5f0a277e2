use std::collections::HashSet;

use crate::{ClassId, ClassType, Type, TypeEnv};

/// Reduce `ty` to the runtime type used for storage and comparison.
///
/// Parameterized types lose their arguments, arrays erase their component, and any leftover
/// type variable or wildcard erases to its first upper bound (`Object` when it has none).
pub fn erasure(env: &dyn TypeEnv, ty: &Type) -> Type {
    fn inner(env: &dyn TypeEnv, ty: &Type, seen_type_vars: &mut HashSet<crate::TypeVarId>) -> Type {
        match ty {
            Type::Void | Type::Primitive(_) | Type::Class(_) => ty.clone(),
            Type::Parameterized(ClassType { def, .. }) => Type::Class(*def),
            Type::Array(component) => Type::array(inner(env, component, seen_type_vars)),
            Type::TypeVar(id) => {
                // `T extends Comparable<T>` must not recurse forever.
                if !seen_type_vars.insert(*id) {
                    return env.object_type();
                }
                let erased = env
                    .type_param(*id)
                    .and_then(|tp| tp.upper_bounds.first())
                    .map(|bound| inner(env, bound, seen_type_vars))
                    .unwrap_or_else(|| env.object_type());
                seen_type_vars.remove(id);
                erased
            }
            Type::Wildcard(wildcard) => wildcard
                .upper_bounds
                .first()
                .map(|bound| inner(env, bound, seen_type_vars))
                .unwrap_or_else(|| env.object_type()),
        }
    }

    inner(env, ty, &mut HashSet::new())
}

/// `class` followed by its superclasses, most-derived first.
///
/// Stops at the first class without a registered definition or at a repeated class, so a
/// malformed (cyclic) registration cannot loop.
pub fn superclass_chain(env: &dyn TypeEnv, class: ClassId) -> Vec<ClassId> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(class);
    while let Some(id) = current {
        if !seen.insert(id) {
            break;
        }
        let Some(def) = env.class(id) else {
            break;
        };
        chain.push(id);
        current = def.super_class.as_ref().and_then(Type::raw_class);
    }
    chain
}

/// `true` when `sub` is `sup` or inherits from it through any superclass/interface path.
pub fn is_subclass(env: &dyn TypeEnv, sub: ClassId, sup: ClassId) -> bool {
    if sub == sup {
        return true;
    }

    let mut stack = vec![sub];
    let mut seen = HashSet::new();
    while let Some(current) = stack.pop() {
        if current == sup {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        let Some(def) = env.class(current) else {
            continue;
        };
        stack.extend(def.super_class.iter().filter_map(Type::raw_class));
        stack.extend(def.interfaces.iter().filter_map(Type::raw_class));
    }

    false
}

/// Runtime assignability over erased types: can a value of type `source` be stored in a slot of
/// type `target`?
///
/// Both sides are erased first. Primitives and `void` are only assignable to themselves (no
/// boxing or widening), `Object` accepts every reference type, and arrays are covariant over
/// reference components.
pub fn is_assignable_from(env: &dyn TypeEnv, target: &Type, source: &Type) -> bool {
    let target = erasure(env, target);
    let source = erasure(env, source);
    assignable_erased(env, &target, &source)
}

fn assignable_erased(env: &dyn TypeEnv, target: &Type, source: &Type) -> bool {
    if target == source {
        return true;
    }

    let wk = env.well_known();
    match (target, source) {
        (Type::Class(t), _) if *t == wk.object => source.is_reference(),
        (Type::Class(t), Type::Class(s)) => is_subclass(env, *s, *t),
        (Type::Class(t), Type::Array(_)) => *t == wk.cloneable || *t == wk.serializable,
        (Type::Array(t), Type::Array(s)) => {
            t.is_reference() && s.is_reference() && assignable_erased(env, t, s)
        }
        _ => false,
    }
}
