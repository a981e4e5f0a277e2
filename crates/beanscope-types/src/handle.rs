//! Runtime member handles.
//!
//! A registered class pairs its schema with closures that operate on the backing Rust value.
//! Targets are passed as `&dyn Any`/`&mut dyn Any` and values travel boxed as [`Value`]; the
//! typed constructors below take care of downcasting and report mismatches as [`InvokeError`].

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A dynamically typed runtime value.
pub type Value = Box<dyn Any + Send>;

/// Failure while reading, writing, calling or constructing through a runtime handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
    #[error("target is not an instance of `{expected}`")]
    TargetMismatch { expected: &'static str },
    #[error("argument {index} is not an instance of `{expected}`")]
    ArgumentMismatch { index: usize, expected: &'static str },
    #[error("expected {expected} argument(s), found {found}")]
    ArgumentCount { expected: usize, found: usize },
    #[error("member `{member}` is not accessible")]
    Inaccessible { member: String },
    #[error("member `{member}` has no runtime handle")]
    MissingHandle { member: String },
    #[error("field is read-only")]
    ReadOnly,
    #[error("{0}")]
    Raised(String),
}

type ReadFn = dyn Fn(&dyn Any) -> Result<Value, InvokeError> + Send + Sync;
type WriteFn = dyn Fn(&mut dyn Any, Value) -> Result<(), InvokeError> + Send + Sync;
type CallFn = dyn Fn(&mut dyn Any, Vec<Value>) -> Result<Option<Value>, InvokeError> + Send + Sync;
type ConstructFn = dyn Fn(Vec<Value>) -> Result<Value, InvokeError> + Send + Sync;

fn target_ref<T: Any>(target: &dyn Any) -> Result<&T, InvokeError> {
    target
        .downcast_ref::<T>()
        .ok_or(InvokeError::TargetMismatch {
            expected: type_name::<T>(),
        })
}

fn target_mut<T: Any>(target: &mut dyn Any) -> Result<&mut T, InvokeError> {
    target
        .downcast_mut::<T>()
        .ok_or(InvokeError::TargetMismatch {
            expected: type_name::<T>(),
        })
}

fn take_arg<V: Any>(index: usize, value: Value) -> Result<V, InvokeError> {
    value
        .downcast::<V>()
        .map(|boxed| *boxed)
        .map_err(|_| InvokeError::ArgumentMismatch {
            index,
            expected: type_name::<V>(),
        })
}

fn expect_args(args: &[Value], expected: usize) -> Result<(), InvokeError> {
    if args.len() != expected {
        return Err(InvokeError::ArgumentCount {
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

/// Read/write hooks for a field.
#[derive(Clone)]
pub struct FieldAccess {
    read: Arc<ReadFn>,
    write: Option<Arc<WriteFn>>,
}

impl FieldAccess {
    pub fn new(
        read: impl Fn(&dyn Any) -> Result<Value, InvokeError> + Send + Sync + 'static,
        write: impl Fn(&mut dyn Any, Value) -> Result<(), InvokeError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            read: Arc::new(read),
            write: Some(Arc::new(write)),
        }
    }

    pub fn read_only(
        read: impl Fn(&dyn Any) -> Result<Value, InvokeError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            read: Arc::new(read),
            write: None,
        }
    }

    /// Hooks for a field of type `V` on a Rust value of type `T`.
    pub fn typed<T, V>(
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        T: Any,
        V: Any + Send,
    {
        Self::new(
            move |target| Ok(Box::new(get(target_ref::<T>(target)?)) as Value),
            move |target, value| {
                let target = target_mut::<T>(target)?;
                set(target, take_arg::<V>(0, value)?);
                Ok(())
            },
        )
    }

    pub fn typed_read_only<T, V>(get: impl Fn(&T) -> V + Send + Sync + 'static) -> Self
    where
        T: Any,
        V: Any + Send,
    {
        Self::read_only(move |target| Ok(Box::new(get(target_ref::<T>(target)?)) as Value))
    }

    pub fn read(&self, target: &dyn Any) -> Result<Value, InvokeError> {
        (self.read)(target)
    }

    pub fn write(&self, target: &mut dyn Any, value: Value) -> Result<(), InvokeError> {
        match &self.write {
            Some(write) => write(target, value),
            None => Err(InvokeError::ReadOnly),
        }
    }

    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }
}

impl fmt::Debug for FieldAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccess")
            .field("writable", &self.is_writable())
            .finish_non_exhaustive()
    }
}

/// A callable method body.
#[derive(Clone)]
pub struct MethodHandle(Arc<CallFn>);

impl MethodHandle {
    pub fn new(
        call: impl Fn(&mut dyn Any, Vec<Value>) -> Result<Option<Value>, InvokeError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(Arc::new(call))
    }

    /// A zero-argument method on `T` returning `V`.
    pub fn getter<T, V>(get: impl Fn(&T) -> V + Send + Sync + 'static) -> Self
    where
        T: Any,
        V: Any + Send,
    {
        Self::new(move |target, args| {
            expect_args(&args, 0)?;
            let target = target_ref::<T>(&*target)?;
            Ok(Some(Box::new(get(target)) as Value))
        })
    }

    /// A one-argument method on `T` taking `V` and returning nothing.
    pub fn setter<T, V>(set: impl Fn(&mut T, V) + Send + Sync + 'static) -> Self
    where
        T: Any,
        V: Any + Send,
    {
        Self::new(move |target, mut args| {
            expect_args(&args, 1)?;
            let target = target_mut::<T>(target)?;
            let value = take_arg::<V>(0, args.remove(0))?;
            set(target, value);
            Ok(None)
        })
    }

    pub fn call(&self, target: &mut dyn Any, args: Vec<Value>) -> Result<Option<Value>, InvokeError> {
        (self.0)(target, args)
    }
}

impl fmt::Debug for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodHandle").finish_non_exhaustive()
    }
}

/// Instantiates the backing Rust value of a class.
#[derive(Clone)]
pub struct ConstructorHandle(Arc<ConstructFn>);

impl ConstructorHandle {
    pub fn new(
        construct: impl Fn(Vec<Value>) -> Result<Value, InvokeError> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(construct))
    }

    /// A zero-argument constructor backed by `T::default()`.
    pub fn default_of<T>() -> Self
    where
        T: Default + Any + Send,
    {
        Self::new(|args| {
            expect_args(&args, 0)?;
            Ok(Box::new(T::default()) as Value)
        })
    }

    pub fn construct(&self, args: Vec<Value>) -> Result<Value, InvokeError> {
        (self.0)(args)
    }
}

impl fmt::Debug for ConstructorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorHandle").finish_non_exhaustive()
    }
}
