//! Instantiation of registered classes.

use std::sync::Arc;

use beanscope_types::{
    erasure, format_type, is_subclass, ClassId, ConstructorDef, Type, TypeEnv, Value,
};

use crate::{AccessPolicy, ReflectError, Result};

pub trait ObjectFactory: Send + Sync {
    /// Instantiates `class` through its zero-argument constructor.
    fn create(&self, class: ClassId) -> Result<Value> {
        self.create_with(class, &[], Vec::new())
    }

    /// Instantiates `class` through the constructor whose parameter types are `arg_types`.
    fn create_with(&self, class: ClassId, arg_types: &[Type], args: Vec<Value>) -> Result<Value>;

    /// `true` for `java.util.Collection` and its subtypes.
    fn is_collection(&self, class: ClassId) -> bool;
}

/// Builds objects from registered constructors, substituting a default implementation for the
/// common collection interfaces (`List` becomes `ArrayList`, `Map` becomes `HashMap`, ...).
pub struct DefaultObjectFactory {
    env: Arc<dyn TypeEnv + Send + Sync>,
    policy: AccessPolicy,
}

impl DefaultObjectFactory {
    pub fn new(env: Arc<dyn TypeEnv + Send + Sync>) -> Self {
        Self::with_policy(env, AccessPolicy::default())
    }

    pub fn with_policy(env: Arc<dyn TypeEnv + Send + Sync>, policy: AccessPolicy) -> Self {
        Self { env, policy }
    }

    /// The class actually instantiated for `class`.
    pub fn resolve_interface(&self, class: ClassId) -> ClassId {
        let wk = self.env.well_known();
        if class == wk.list || class == wk.collection || class == wk.iterable {
            wk.array_list
        } else if class == wk.map {
            wk.hash_map
        } else if class == wk.sorted_set {
            wk.tree_set
        } else if class == wk.set {
            wk.hash_set
        } else {
            class
        }
    }

    fn find_constructor<'a>(
        &self,
        constructors: &'a [ConstructorDef],
        arg_types: &[Type],
    ) -> Option<&'a ConstructorDef> {
        let env = &*self.env;
        let wanted: Vec<Type> = arg_types.iter().map(|ty| erasure(env, ty)).collect();
        constructors.iter().find(|ctor| {
            ctor.params.len() == wanted.len()
                && ctor
                    .params
                    .iter()
                    .zip(&wanted)
                    .all(|(param, wanted)| erasure(env, param) == *wanted)
        })
    }
}

impl ObjectFactory for DefaultObjectFactory {
    fn create_with(&self, class: ClassId, arg_types: &[Type], args: Vec<Value>) -> Result<Value> {
        let env = &*self.env;
        let target = self.resolve_interface(class);
        let failure = |cause: String| ReflectError::Instantiation {
            class: env.class_name(target),
            arg_types: arg_types
                .iter()
                .map(|ty| format_type(env, ty))
                .collect::<Vec<_>>()
                .join(", "),
            cause,
        };

        let def = env
            .class(target)
            .ok_or_else(|| failure("class is not registered".to_string()))?;
        let ctor = self
            .find_constructor(&def.constructors, arg_types)
            .ok_or_else(|| failure("no matching constructor".to_string()))?;
        if !self.policy.can_access(ctor.visibility) {
            return Err(failure("constructor is not accessible".to_string()));
        }
        let handle = ctor
            .handle
            .as_ref()
            .ok_or_else(|| failure("constructor has no runtime handle".to_string()))?;

        handle
            .construct(args)
            .map_err(|err| failure(err.to_string()))
    }

    fn is_collection(&self, class: ClassId) -> bool {
        is_subclass(&*self.env, class, self.env.well_known().collection)
    }
}
