//! Type model and type-schema registry for beanscope.
//!
//! Rust has no runtime reflection over user types, so every class that should be introspected
//! is registered up front in a [`TypeStore`]: its type parameters, generic supertypes, declared
//! fields/methods/constructors and the runtime handles that read, write, call and construct the
//! backing Rust values.
//!
//! The [`resolve`] module substitutes type variables through the supertype graph and
//! [`erasure`] reduces any descriptor to the runtime type used for storage and comparison.

#![forbid(unsafe_code)]

mod format;
mod handle;
pub mod resolve;
mod store;
mod subtyping;

use serde::{Deserialize, Serialize};

pub use format::{format_type, method_signature};
pub use handle::{ConstructorHandle, FieldAccess, InvokeError, MethodHandle, Value};
pub use resolve::{resolve_field_type, resolve_param_types, resolve_return_type, resolve_type};
pub use store::{TypeStore, WellKnownTypes};
pub use subtyping::{erasure, is_assignable_from, is_subclass, superclass_chain};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassId(u32);

impl ClassId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeVarId(u32);

impl TypeVarId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

/// A parameterized class type such as `Map<String, List<V>>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    pub def: ClassId,
    pub args: Vec<Type>,
}

/// `?`, `? extends U` or `? super L`.
///
/// An unbounded wildcard has empty bound lists; `Object` is implied as the upper bound.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WildcardType {
    pub upper_bounds: Vec<Type>,
    pub lower_bounds: Vec<Type>,
}

impl WildcardType {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn extends(bound: Type) -> Self {
        Self {
            upper_bounds: vec![bound],
            lower_bounds: Vec::new(),
        }
    }

    pub fn super_of(bound: Type) -> Self {
        Self {
            upper_bounds: Vec::new(),
            lower_bounds: vec![bound],
        }
    }
}

/// Type descriptor.
///
/// `TypeVar` only appears as an intermediate value: resolution through a viewpoint type replaces
/// every variable, and [`erasure`] reduces what remains to a concrete runtime type. `Wildcard` only
/// appears nested inside the arguments of a `Parameterized` type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Void,
    Primitive(PrimitiveType),
    Class(ClassId),
    Parameterized(ClassType),
    Array(Box<Type>),
    TypeVar(TypeVarId),
    Wildcard(WildcardType),
}

impl Type {
    pub fn class(def: ClassId) -> Self {
        Type::Class(def)
    }

    /// `def<args>`; an empty argument list yields the raw class type.
    pub fn parameterized(def: ClassId, args: Vec<Type>) -> Self {
        if args.is_empty() {
            Type::Class(def)
        } else {
            Type::Parameterized(ClassType { def, args })
        }
    }

    pub fn array(component: Type) -> Self {
        Type::Array(Box::new(component))
    }

    pub fn int() -> Self {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn long() -> Self {
        Type::Primitive(PrimitiveType::Long)
    }

    pub fn boolean() -> Self {
        Type::Primitive(PrimitiveType::Boolean)
    }

    /// The class this type is an instance of, ignoring type arguments.
    pub fn raw_class(&self) -> Option<ClassId> {
        match self {
            Type::Class(id) => Some(*id),
            Type::Parameterized(ClassType { def, .. }) => Some(*def),
            _ => None,
        }
    }

    /// `true` when no type variable or wildcard is reachable from this type.
    pub fn is_concrete(&self) -> bool {
        match self {
            Type::Void | Type::Primitive(_) | Type::Class(_) => true,
            Type::Parameterized(ClassType { args, .. }) => args.iter().all(Type::is_concrete),
            Type::Array(component) => component.is_concrete(),
            Type::TypeVar(_) | Type::Wildcard(_) => false,
        }
    }

    pub fn is_reference(&self) -> bool {
        !matches!(self, Type::Void | Type::Primitive(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: String,
    pub upper_bounds: Vec<Type>,
}

#[derive(Clone, Debug)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    /// Runtime read/write hooks; `None` for schema-only fields.
    pub access: Option<FieldAccess>,
}

impl FieldDef {
    /// A private instance field, the common shape of a bean's backing state.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: Visibility::Private,
            is_static: false,
            is_final: false,
            access: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    pub fn with_access(mut self, access: FieldAccess) -> Self {
        self.access = Some(access);
        self
    }
}

#[derive(Clone, Debug)]
pub struct MethodDef {
    pub name: String,
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub visibility: Visibility,
    pub is_static: bool,
    /// Compiler-generated bridge/synthetic methods are never treated as accessors.
    pub is_synthetic: bool,
    pub handle: Option<MethodHandle>,
}

impl MethodDef {
    /// A public instance method.
    pub fn new(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            params,
            return_type,
            visibility: Visibility::Public,
            is_static: false,
            is_synthetic: false,
            handle: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeVarId>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn with_synthetic(mut self, is_synthetic: bool) -> Self {
        self.is_synthetic = is_synthetic;
        self
    }

    pub fn with_handle(mut self, handle: MethodHandle) -> Self {
        self.handle = Some(handle);
        self
    }
}

#[derive(Clone, Debug)]
pub struct ConstructorDef {
    pub params: Vec<Type>,
    pub visibility: Visibility,
    pub handle: Option<ConstructorHandle>,
}

impl ConstructorDef {
    pub fn new(params: Vec<Type>, handle: ConstructorHandle) -> Self {
        Self {
            params,
            visibility: Visibility::Public,
            handle: Some(handle),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Clone, Debug)]
pub struct ClassDef {
    /// Binary name, e.g. `com.example.User`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub fields: Vec<FieldDef>,
    pub constructors: Vec<ConstructorDef>,
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// Position of `var` in this class's own type-parameter list.
    pub fn type_param_index(&self, var: TypeVarId) -> Option<usize> {
        self.type_params.iter().position(|tp| *tp == var)
    }
}

/// Read-only view of the registered type schema.
///
/// This is the seam between the introspection algorithms and whatever supplies class
/// structure; [`TypeStore`] is the in-memory registration table.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;

    /// The universal top type.
    fn object_type(&self) -> Type {
        Type::Class(self.well_known().object)
    }

    fn class_name(&self, id: ClassId) -> String {
        match self.class(id) {
            Some(def) => def.name.clone(),
            None => format!("<unknown class #{}>", id.to_raw()),
        }
    }
}
