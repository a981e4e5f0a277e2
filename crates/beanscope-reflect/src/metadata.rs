//! Accessor discovery: which properties a class exposes and how to reach them.
//!
//! Discovery is a pure function of the registered schema. Methods are collected from the
//! superclass chain and then every (transitively) implemented interface, de-duplicated by
//! erased signature so that a more-derived declaration shadows the one it overrides.
//! `get*`/`is*` and `set*` methods become accessors; fields fill in whatever the methods left
//! uncovered.

use std::collections::HashMap;
use std::sync::Arc;

use beanscope_config::ReflectionConfig;
use beanscope_types::{
    erasure, format_type, is_assignable_from, resolve_field_type, resolve_return_type,
    resolve_type, superclass_chain, ClassId, ConstructorHandle, FieldAccess, FieldDef, MethodDef,
    Type, TypeEnv, Visibility,
};
use indexmap::IndexMap;

use crate::invoker::{GetFieldInvoker, Invoker, MethodInvoker, SetFieldInvoker};
use crate::members::{Member, MemberIndex};
use crate::property::{is_getter, is_setter, is_valid_property_name, method_to_property};
use crate::{AccessorKind, ReflectError, Result};

/// Whether non-public members may be used.
///
/// When private access is disallowed, non-public fields and constructors are ignored and
/// accessor methods that are not public fail when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    pub allow_private_access: bool,
}

impl AccessPolicy {
    pub fn can_access(self, visibility: Visibility) -> bool {
        visibility.is_public() || self.allow_private_access
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            allow_private_access: true,
        }
    }
}

impl From<&ReflectionConfig> for AccessPolicy {
    fn from(config: &ReflectionConfig) -> Self {
        Self {
            allow_private_access: config.allow_private_access,
        }
    }
}

/// One resolved accessor: the invoker plus the property type it reads or writes.
#[derive(Debug, Clone)]
struct PropertyAccessor {
    invoker: Arc<dyn Invoker>,
    /// Erased runtime type.
    ty: Type,
    /// Resolved through the class but not erased, e.g. `List<Long>`.
    generic_ty: Type,
}

/// Immutable per-class property metadata.
#[derive(Debug, Clone)]
pub struct ClassMetadata {
    class: ClassId,
    class_name: String,
    getters: IndexMap<String, PropertyAccessor>,
    setters: IndexMap<String, PropertyAccessor>,
    /// Upper-cased name -> canonical name, over readable and writable names.
    case_fold: HashMap<String, String>,
    default_constructor: Option<ConstructorHandle>,
}

impl ClassMetadata {
    pub fn discover(env: &dyn TypeEnv, class: ClassId, policy: AccessPolicy) -> Result<Self> {
        Self::discover_with(env, class, policy, &MemberIndex::new())
    }

    /// Like [`ClassMetadata::discover`], reusing the method collections memoized in `members`.
    pub fn discover_with(
        env: &dyn TypeEnv,
        class: ClassId,
        policy: AccessPolicy,
        members: &MemberIndex,
    ) -> Result<Self> {
        let def = env.class(class).ok_or_else(|| ReflectError::UnknownClass {
            class: env.class_name(class),
        })?;

        let mut discovery = Discovery {
            env,
            class_name: def.name.clone(),
            viewpoint: Type::Class(class),
            policy,
            getters: IndexMap::new(),
            setters: IndexMap::new(),
        };

        let methods = members.methods(env, class);
        discovery.add_getters(&methods)?;
        discovery.add_setters(&methods)?;
        discovery.add_fields(class);

        let Discovery {
            class_name,
            getters,
            setters,
            ..
        } = discovery;

        let mut case_fold = HashMap::new();
        for name in getters.keys().chain(setters.keys()) {
            case_fold.insert(name.to_uppercase(), name.clone());
        }

        let default_constructor = def
            .constructors
            .iter()
            .filter(|ctor| ctor.params.is_empty() && policy.can_access(ctor.visibility))
            .find_map(|ctor| ctor.handle.clone());

        tracing::debug!(
            class = %class_name,
            readable = getters.len(),
            writable = setters.len(),
            default_constructor = default_constructor.is_some(),
            "discovered class metadata"
        );

        Ok(Self {
            class,
            class_name,
            getters,
            setters,
            case_fold,
            default_constructor,
        })
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Readable property names in discovery order.
    pub fn readable_names(&self) -> Vec<&str> {
        self.getters.keys().map(String::as_str).collect()
    }

    /// Writable property names in discovery order.
    pub fn writable_names(&self) -> Vec<&str> {
        self.setters.keys().map(String::as_str).collect()
    }

    pub fn has_getter(&self, name: &str) -> bool {
        self.getters.contains_key(name)
    }

    pub fn has_setter(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    /// Erased type returned by the getter of `name`.
    pub fn getter_type(&self, name: &str) -> Result<&Type> {
        self.getter(name).map(|accessor| &accessor.ty)
    }

    /// Erased type accepted by the setter of `name`.
    pub fn setter_type(&self, name: &str) -> Result<&Type> {
        self.setter(name).map(|accessor| &accessor.ty)
    }

    /// Getter type with its resolved type arguments, e.g. `List<Long>` where
    /// [`getter_type`](Self::getter_type) reports `List`.
    pub fn generic_getter_type(&self, name: &str) -> Result<&Type> {
        self.getter(name).map(|accessor| &accessor.generic_ty)
    }

    pub fn generic_setter_type(&self, name: &str) -> Result<&Type> {
        self.setter(name).map(|accessor| &accessor.generic_ty)
    }

    pub fn get_invoker(&self, name: &str) -> Result<Arc<dyn Invoker>> {
        self.getter(name).map(|accessor| Arc::clone(&accessor.invoker))
    }

    pub fn set_invoker(&self, name: &str) -> Result<Arc<dyn Invoker>> {
        self.setter(name).map(|accessor| Arc::clone(&accessor.invoker))
    }

    /// Case-insensitive lookup of a readable or writable property name.
    pub fn find_canonical_name(&self, name: &str) -> Option<&str> {
        self.case_fold.get(&name.to_uppercase()).map(String::as_str)
    }

    pub fn has_default_constructor(&self) -> bool {
        self.default_constructor.is_some()
    }

    pub fn default_constructor(&self) -> Result<&ConstructorHandle> {
        self.default_constructor
            .as_ref()
            .ok_or_else(|| ReflectError::MissingDefaultConstructor {
                class: self.class_name.clone(),
            })
    }

    fn getter(&self, name: &str) -> Result<&PropertyAccessor> {
        self.getters
            .get(name)
            .ok_or_else(|| self.missing(name, AccessorKind::Getter))
    }

    fn setter(&self, name: &str) -> Result<&PropertyAccessor> {
        self.setters
            .get(name)
            .ok_or_else(|| self.missing(name, AccessorKind::Setter))
    }

    fn missing(&self, name: &str, kind: AccessorKind) -> ReflectError {
        ReflectError::MissingAccessor {
            class: self.class_name.clone(),
            property: name.to_string(),
            kind,
        }
    }
}

struct Discovery<'a> {
    env: &'a dyn TypeEnv,
    class_name: String,
    viewpoint: Type,
    policy: AccessPolicy,
    getters: IndexMap<String, PropertyAccessor>,
    setters: IndexMap<String, PropertyAccessor>,
}

impl Discovery<'_> {
    fn add_getters(&mut self, methods: &[Member<'_>]) -> Result<()> {
        let mut conflicting: IndexMap<String, Vec<Member<'_>>> = IndexMap::new();
        for member in methods {
            let name = &member.method.name;
            if member.method.params.is_empty() && is_getter(name) {
                conflicting
                    .entry(method_to_property(name)?)
                    .or_default()
                    .push(*member);
            }
        }

        for (property, candidates) in conflicting {
            let mut candidates = candidates.into_iter();
            let Some(mut winner) = candidates.next() else {
                continue;
            };
            let mut winner_ty = erasure(self.env, &winner.method.return_type);
            for candidate in candidates {
                let candidate_ty = erasure(self.env, &candidate.method.return_type);
                if is_assignable_from(self.env, &winner_ty, &candidate_ty) {
                    // Covariant override: the narrower return type wins.
                    winner = candidate;
                    winner_ty = candidate_ty;
                } else if !is_assignable_from(self.env, &candidate_ty, &winner_ty) {
                    return Err(self.ambiguous(
                        &property,
                        AccessorKind::Getter,
                        &winner_ty,
                        &candidate_ty,
                    ));
                }
            }
            self.add_getter_method(property, winner);
        }
        Ok(())
    }

    fn add_getter_method(&mut self, property: String, member: Member<'_>) {
        if !is_valid_property_name(&property) {
            return;
        }
        let generic_ty =
            resolve_return_type(self.env, member.method, member.declaring, &self.viewpoint);
        let accessor = self.method_accessor(member.method, generic_ty);
        self.getters.insert(property, accessor);
    }

    fn add_setters(&mut self, methods: &[Member<'_>]) -> Result<()> {
        let mut conflicting: IndexMap<String, Vec<(Member<'_>, &Type)>> = IndexMap::new();
        for member in methods {
            let name = &member.method.name;
            if let [param] = member.method.params.as_slice() {
                if is_setter(name) {
                    conflicting
                        .entry(method_to_property(name)?)
                        .or_default()
                        .push((*member, param));
                }
            }
        }

        for (property, candidates) in conflicting {
            let getter_ty = self.getters.get(&property).map(|getter| getter.ty.clone());
            let mut matched: Option<(Member<'_>, &Type)> = None;
            let mut error = None;

            for candidate in candidates {
                let param_ty = erasure(self.env, candidate.1);
                if getter_ty.as_ref() == Some(&param_ty) {
                    matched = Some(candidate);
                    break;
                }
                if error.is_none() {
                    match self.pick_better_setter(&property, matched, candidate) {
                        Ok(better) => matched = Some(better),
                        Err(err) => {
                            matched = None;
                            error = Some(err);
                        }
                    }
                }
            }

            match (matched, error) {
                (Some((member, param)), _) => self.add_setter_method(property, member, param),
                (None, Some(err)) => return Err(err),
                (None, None) => {}
            }
        }
        Ok(())
    }

    fn pick_better_setter<'m>(
        &self,
        property: &str,
        current: Option<(Member<'m>, &'m Type)>,
        candidate: (Member<'m>, &'m Type),
    ) -> Result<(Member<'m>, &'m Type)> {
        let Some(current) = current else {
            return Ok(candidate);
        };
        let current_ty = erasure(self.env, current.1);
        let candidate_ty = erasure(self.env, candidate.1);
        if is_assignable_from(self.env, &current_ty, &candidate_ty) {
            Ok(candidate)
        } else if is_assignable_from(self.env, &candidate_ty, &current_ty) {
            Ok(current)
        } else {
            Err(self.ambiguous(property, AccessorKind::Setter, &current_ty, &candidate_ty))
        }
    }

    fn add_setter_method(&mut self, property: String, member: Member<'_>, param: &Type) {
        if !is_valid_property_name(&property) {
            return;
        }
        let generic_ty = resolve_type(self.env, param, &self.viewpoint, member.declaring);
        let accessor = self.method_accessor(member.method, generic_ty);
        self.setters.insert(property, accessor);
    }

    fn method_accessor(&self, method: &MethodDef, generic_ty: Type) -> PropertyAccessor {
        let ty = erasure(self.env, &generic_ty);
        let invoker = MethodInvoker::new(
            method.name.clone(),
            method.handle.clone(),
            ty.clone(),
            self.policy.can_access(method.visibility),
        );
        PropertyAccessor {
            invoker: Arc::new(invoker),
            ty,
            generic_ty,
        }
    }

    /// Fields cover properties the accessor methods left without a getter or setter. A name
    /// claimed at one level is never overwritten by a less-derived class.
    fn add_fields(&mut self, class: ClassId) {
        let env = self.env;
        for current in superclass_chain(env, class) {
            let Some(def) = env.class(current) else {
                continue;
            };
            for field in &def.fields {
                if !self.policy.can_access(field.visibility)
                    || !is_valid_property_name(&field.name)
                {
                    continue;
                }
                // Compile-time constants are never writable.
                let constant = field.is_static && field.is_final;
                if !constant && !self.setters.contains_key(&field.name) {
                    let accessor = self.field_accessor(field, current, |name, access, ty| {
                        Arc::new(SetFieldInvoker::new(name, access, ty)) as Arc<dyn Invoker>
                    });
                    self.setters.insert(field.name.clone(), accessor);
                }
                if !self.getters.contains_key(&field.name) {
                    let accessor = self.field_accessor(field, current, |name, access, ty| {
                        Arc::new(GetFieldInvoker::new(name, access, ty)) as Arc<dyn Invoker>
                    });
                    self.getters.insert(field.name.clone(), accessor);
                }
            }
        }
    }

    fn field_accessor(
        &self,
        field: &FieldDef,
        declaring: ClassId,
        make: impl FnOnce(String, Option<FieldAccess>, Type) -> Arc<dyn Invoker>,
    ) -> PropertyAccessor {
        let generic_ty = resolve_field_type(self.env, field, declaring, &self.viewpoint);
        let ty = erasure(self.env, &generic_ty);
        PropertyAccessor {
            invoker: make(field.name.clone(), field.access.clone(), ty.clone()),
            ty,
            generic_ty,
        }
    }

    fn ambiguous(
        &self,
        property: &str,
        kind: AccessorKind,
        first: &Type,
        second: &Type,
    ) -> ReflectError {
        let first = format_type(self.env, first);
        let second = format_type(self.env, second);
        tracing::debug!(
            class = %self.class_name,
            property,
            %kind,
            %first,
            %second,
            "ambiguous accessors"
        );
        ReflectError::AmbiguousAccessor {
            class: self.class_name.clone(),
            property: property.to_string(),
            kind,
            first,
            second,
        }
    }
}
