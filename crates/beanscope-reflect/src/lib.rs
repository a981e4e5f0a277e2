//! Bean property introspection over a registered type schema.
//!
//! [`ClassMetadata::discover`] finds the readable and writable properties of a class (accessor
//! methods first, fields as a fallback) and resolves each property's type through the class's
//! generic supertypes. [`DefaultMetadataFactory`] memoizes the result per class, and
//! [`MetaClass`] navigates dotted property paths (`orders[0].items[1].sku`) across classes.
//!
//! ```ignore
//! let factory = Arc::new(DefaultMetadataFactory::new(Arc::new(store)));
//! let metadata = factory.metadata_for(user)?;
//! let mut bean = metadata.default_constructor()?.construct(Vec::new())?;
//! metadata.set_invoker("name")?.invoke(&mut *bean, vec![Box::new("Ada".to_string())])?;
//! ```

#![forbid(unsafe_code)]

mod error;
mod factory;
pub mod invoker;
mod members;
mod meta_class;
mod metadata;
mod object_factory;
pub mod property;

pub use error::{AccessorKind, ReflectError, Result};
pub use factory::{DefaultMetadataFactory, MetadataFactory};
pub use invoker::{GetFieldInvoker, Invoker, MethodInvoker, SetFieldInvoker};
pub use members::MemberIndex;
pub use meta_class::MetaClass;
pub use metadata::{AccessPolicy, ClassMetadata};
pub use object_factory::{DefaultObjectFactory, ObjectFactory};
pub use property::{copy_bean_properties, PathStep};
