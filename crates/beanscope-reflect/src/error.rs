use beanscope_types::InvokeError;

pub type Result<T> = std::result::Result<T, ReflectError>;

/// Errors produced by metadata discovery, lookups and instantiation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReflectError {
    /// Two getter (or setter) candidates for one property have mutually non-assignable types.
    /// Fatal for the whole class.
    #[error(
        "ambiguous {kind} for property `{property}` in class {class}: `{first}` and `{second}` are unrelated"
    )]
    AmbiguousAccessor {
        class: String,
        property: String,
        kind: AccessorKind,
        first: String,
        second: String,
    },

    #[error("there is no {kind} for property `{property}` in class {class}")]
    MissingAccessor {
        class: String,
        property: String,
        kind: AccessorKind,
    },

    #[error("class {class} has no accessible default constructor")]
    MissingDefaultConstructor { class: String },

    #[error("class {class} is not registered")]
    UnknownClass { class: String },

    #[error("`{name}` is not a getter or setter name")]
    InvalidPropertyName { name: String },

    #[error("error instantiating {class} with argument types [{arg_types}]: {cause}")]
    Instantiation {
        class: String,
        arg_types: String,
        cause: String,
    },

    #[error("invocation failed: {0}")]
    Invocation(#[from] InvokeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Getter,
    Setter,
}

impl std::fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AccessorKind::Getter => "getter",
            AccessorKind::Setter => "setter",
        })
    }
}
