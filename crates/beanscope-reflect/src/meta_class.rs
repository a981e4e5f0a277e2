//! Property-path navigation over class metadata.
//!
//! A [`MetaClass`] answers questions about dotted paths such as `orders[0].items[1].sku`: each
//! intermediate segment is followed through its getter type, and an indexed segment on a
//! collection, map or array property continues with the element type.

use std::sync::Arc;

use beanscope_types::{
    erasure, format_type, is_subclass, resolve_type, ClassId, ClassType, Type, TypeEnv,
};

use crate::property::PathStep;
use crate::{ClassMetadata, Invoker, MetadataFactory, ReflectError, Result};

#[derive(Clone)]
pub struct MetaClass {
    factory: Arc<dyn MetadataFactory>,
    metadata: Arc<ClassMetadata>,
}

impl MetaClass {
    pub fn for_class(class: ClassId, factory: Arc<dyn MetadataFactory>) -> Result<Self> {
        let metadata = factory.metadata_for(class)?;
        Ok(Self { factory, metadata })
    }

    pub fn metadata(&self) -> &ClassMetadata {
        &self.metadata
    }

    /// MetaClass of the type returned by the getter of `name`.
    pub fn meta_class_for_property(&self, name: &str) -> Result<MetaClass> {
        let ty = self.metadata.getter_type(name)?.clone();
        self.meta_class_for_type(&ty)
    }

    /// Canonical spelling of `path`, matching each segment case-insensitively. Indexed
    /// segments continue with the element type; the indexes themselves are dropped. With
    /// `use_camel_case`, underscores are removed first so `first_name` finds `firstName`.
    ///
    /// Returns `None` as soon as a segment names no known property.
    pub fn find_property(&self, path: &str, use_camel_case: bool) -> Option<String> {
        let path = if use_camel_case {
            path.replace('_', "")
        } else {
            path.to_string()
        };

        let mut canonical = Vec::new();
        let mut current = self.clone();
        for step in PathStep::parse(&path) {
            let name = current.metadata.find_canonical_name(step.name())?.to_string();
            if step.has_next() {
                let ty = current.metadata.generic_getter_type(&name).ok()?;
                let ty = current.step_type(ty, &step);
                current = current.meta_class_for_type(&ty).ok()?;
            }
            canonical.push(name);
        }
        Some(canonical.join("."))
    }

    /// Erased type read by the getter at the end of `path`.
    pub fn getter_type(&self, path: &str) -> Result<Type> {
        let step = PathStep::parse(path);
        let (owner, last) = self.walk_to_last(&step)?;
        let ty = owner.metadata.generic_getter_type(last.name())?;
        Ok(owner.step_type(ty, &last))
    }

    /// Erased type accepted by the setter at the end of `path`.
    pub fn setter_type(&self, path: &str) -> Result<Type> {
        let step = PathStep::parse(path);
        let (owner, last) = self.walk_to_last(&step)?;
        let ty = owner.metadata.generic_setter_type(last.name())?;
        Ok(owner.step_type(ty, &last))
    }

    pub fn has_getter(&self, path: &str) -> bool {
        let step = PathStep::parse(path);
        match self.walk_to_last(&step) {
            Ok((owner, last)) => owner.metadata.has_getter(last.name()),
            Err(_) => false,
        }
    }

    pub fn has_setter(&self, path: &str) -> bool {
        let step = PathStep::parse(path);
        match self.walk_to_last(&step) {
            Ok((owner, last)) => owner.metadata.has_setter(last.name()),
            Err(_) => false,
        }
    }

    pub fn getter_names(&self) -> Vec<&str> {
        self.metadata.readable_names()
    }

    pub fn setter_names(&self) -> Vec<&str> {
        self.metadata.writable_names()
    }

    pub fn get_invoker(&self, name: &str) -> Result<Arc<dyn Invoker>> {
        self.metadata.get_invoker(name)
    }

    pub fn set_invoker(&self, name: &str) -> Result<Arc<dyn Invoker>> {
        self.metadata.set_invoker(name)
    }

    pub fn has_default_constructor(&self) -> bool {
        self.metadata.has_default_constructor()
    }

    /// Follows every step but the last through readable properties, returning the MetaClass
    /// that owns the final segment together with that segment.
    fn walk_to_last(&self, first: &PathStep) -> Result<(MetaClass, PathStep)> {
        let mut current = self.clone();
        let mut step = first.clone();
        while let Some(next) = step.next_step() {
            let ty = current.metadata.generic_getter_type(step.name())?;
            let ty = current.step_type(ty, &step);
            current = current.meta_class_for_type(&ty)?;
            step = next;
        }
        Ok((current, step))
    }

    /// The erased type a step evaluates to: the property type itself, or its element type when
    /// the step is indexed.
    fn step_type(&self, property_ty: &Type, step: &PathStep) -> Type {
        let env = self.factory.type_env();
        match step.index() {
            Some(_) => erasure(env, &element_type(env, property_ty)),
            None => erasure(env, property_ty),
        }
    }

    fn meta_class_for_type(&self, ty: &Type) -> Result<MetaClass> {
        let env = self.factory.type_env();
        let class = ty.raw_class().ok_or_else(|| ReflectError::UnknownClass {
            class: format_type(env, ty),
        })?;
        MetaClass::for_class(class, Arc::clone(&self.factory))
    }
}

impl std::fmt::Debug for MetaClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaClass")
            .field("class", &self.metadata.class_name())
            .finish_non_exhaustive()
    }
}

/// Element type of a collection, map or array type: the component of an array, the value type
/// of a `Map` and the element type of a `Collection`. `Object` for anything else, or when the
/// element type is unknown.
fn element_type(env: &dyn TypeEnv, ty: &Type) -> Type {
    if let Type::Array(component) = ty {
        return (**component).clone();
    }
    let Some(class) = ty.raw_class() else {
        return env.object_type();
    };

    let wk = env.well_known();
    let (declaring, position) = if is_subclass(env, class, wk.map) {
        (wk.map, 1)
    } else if is_subclass(env, class, wk.collection) {
        (wk.collection, 0)
    } else {
        return env.object_type();
    };

    if class == declaring {
        // `Map<K, V>` or `Collection<E>` itself: the argument is the element type.
        return match ty {
            Type::Parameterized(ClassType { args, .. }) => args
                .get(position)
                .cloned()
                .unwrap_or_else(|| env.object_type()),
            _ => env.object_type(),
        };
    }

    let var = env
        .class(declaring)
        .and_then(|def| def.type_params.get(position).copied());
    match var {
        Some(var) => resolve_type(env, &Type::TypeVar(var), ty, declaring),
        None => env.object_type(),
    }
}
