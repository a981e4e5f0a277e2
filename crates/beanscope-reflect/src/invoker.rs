//! Uniform get/set/call abstraction over fields and methods.

use std::any::Any;
use std::fmt;

use beanscope_types::{FieldAccess, InvokeError, MethodHandle, Type, Value};

/// A property accessor bound to one field or method.
///
/// `declared_type` is the erased type of the value the accessor reads or writes.
pub trait Invoker: Send + Sync + fmt::Debug {
    fn invoke(&self, target: &mut dyn Any, args: Vec<Value>) -> Result<Option<Value>, InvokeError>;

    fn declared_type(&self) -> &Type;
}

/// Reads a field directly; arguments are ignored.
#[derive(Debug, Clone)]
pub struct GetFieldInvoker {
    field: String,
    access: Option<FieldAccess>,
    ty: Type,
}

impl GetFieldInvoker {
    pub fn new(field: impl Into<String>, access: Option<FieldAccess>, ty: Type) -> Self {
        Self {
            field: field.into(),
            access,
            ty,
        }
    }
}

impl Invoker for GetFieldInvoker {
    fn invoke(&self, target: &mut dyn Any, _args: Vec<Value>) -> Result<Option<Value>, InvokeError> {
        let access = self.access.as_ref().ok_or_else(|| InvokeError::MissingHandle {
            member: self.field.clone(),
        })?;
        access.read(&*target).map(Some)
    }

    fn declared_type(&self) -> &Type {
        &self.ty
    }
}

/// Writes `args[0]` into a field and returns nothing.
#[derive(Debug, Clone)]
pub struct SetFieldInvoker {
    field: String,
    access: Option<FieldAccess>,
    ty: Type,
}

impl SetFieldInvoker {
    pub fn new(field: impl Into<String>, access: Option<FieldAccess>, ty: Type) -> Self {
        Self {
            field: field.into(),
            access,
            ty,
        }
    }
}

impl Invoker for SetFieldInvoker {
    fn invoke(
        &self,
        target: &mut dyn Any,
        mut args: Vec<Value>,
    ) -> Result<Option<Value>, InvokeError> {
        let access = self.access.as_ref().ok_or_else(|| InvokeError::MissingHandle {
            member: self.field.clone(),
        })?;
        if args.len() != 1 {
            return Err(InvokeError::ArgumentCount {
                expected: 1,
                found: args.len(),
            });
        }
        access.write(target, args.remove(0))?;
        Ok(None)
    }

    fn declared_type(&self) -> &Type {
        &self.ty
    }
}

/// Calls a bound method with the given arguments and returns its result.
#[derive(Debug, Clone)]
pub struct MethodInvoker {
    method: String,
    handle: Option<MethodHandle>,
    ty: Type,
    accessible: bool,
}

impl MethodInvoker {
    /// `accessible` is false for a non-public method when private access is disallowed; such an
    /// invoker fails on every call.
    pub fn new(
        method: impl Into<String>,
        handle: Option<MethodHandle>,
        ty: Type,
        accessible: bool,
    ) -> Self {
        Self {
            method: method.into(),
            handle,
            ty,
            accessible,
        }
    }
}

impl Invoker for MethodInvoker {
    fn invoke(&self, target: &mut dyn Any, args: Vec<Value>) -> Result<Option<Value>, InvokeError> {
        if !self.accessible {
            return Err(InvokeError::Inaccessible {
                member: self.method.clone(),
            });
        }
        let handle = self.handle.as_ref().ok_or_else(|| InvokeError::MissingHandle {
            member: self.method.clone(),
        })?;
        handle.call(target, args)
    }

    fn declared_type(&self) -> &Type {
        &self.ty
    }
}
