//! Generic type resolution.
//!
//! A member declared on an ancestor class mentions that ancestor's type variables; observed
//! through a concrete subclass those variables usually have concrete values. Given the
//! member's declared type, the class that declares it and the viewpoint type, the functions
//! here substitute every reachable variable by walking the viewpoint's generic supertypes
//! (superclass first, then interfaces in declaration order).
//!
//! Example: `List<V> getValues()` declared on `Base<K, V>`, observed through
//! `Sub extends Mid<Long>` with `Mid<V> extends Base<String, V>`, resolves to `List<Long>`.

use std::collections::HashSet;

use crate::{
    erasure, is_subclass, ClassDef, ClassId, ClassType, FieldDef, MethodDef, Type, TypeEnv,
    TypeVarId, WildcardType,
};

/// Resolve `method`'s return type as observed through `viewpoint`.
pub fn resolve_return_type(
    env: &dyn TypeEnv,
    method: &MethodDef,
    declaring: ClassId,
    viewpoint: &Type,
) -> Type {
    resolve_type(env, &method.return_type, viewpoint, declaring)
}

/// Resolve each of `method`'s parameter types as observed through `viewpoint`.
pub fn resolve_param_types(
    env: &dyn TypeEnv,
    method: &MethodDef,
    declaring: ClassId,
    viewpoint: &Type,
) -> Vec<Type> {
    method
        .params
        .iter()
        .map(|param| resolve_type(env, param, viewpoint, declaring))
        .collect()
}

/// Resolve `field`'s declared type as observed through `viewpoint`.
pub fn resolve_field_type(
    env: &dyn TypeEnv,
    field: &FieldDef,
    declaring: ClassId,
    viewpoint: &Type,
) -> Type {
    resolve_type(env, &field.ty, viewpoint, declaring)
}

/// Substitute the type variables in `ty`, a type expression found on a member of `declaring`,
/// as seen from `viewpoint`.
///
/// The result contains no type variable as long as `viewpoint` itself contains none. Variables
/// that cannot be bound to an actual argument erase to their first bound (or `Object`).
pub fn resolve_type(env: &dyn TypeEnv, ty: &Type, viewpoint: &Type, declaring: ClassId) -> Type {
    match ty {
        Type::TypeVar(var) => {
            let mut visited = HashSet::new();
            resolve_type_var(env, *var, viewpoint, declaring, &mut visited)
        }
        Type::Parameterized(ClassType { def, args }) => Type::Parameterized(ClassType {
            def: *def,
            args: args
                .iter()
                .map(|arg| resolve_type(env, arg, viewpoint, declaring))
                .collect(),
        }),
        Type::Array(component) => Type::array(resolve_type(env, component, viewpoint, declaring)),
        Type::Wildcard(wildcard) => Type::Wildcard(WildcardType {
            upper_bounds: wildcard
                .upper_bounds
                .iter()
                .map(|bound| resolve_type(env, bound, viewpoint, declaring))
                .collect(),
            lower_bounds: wildcard
                .lower_bounds
                .iter()
                .map(|bound| resolve_type(env, bound, viewpoint, declaring))
                .collect(),
        }),
        Type::Void | Type::Primitive(_) | Type::Class(_) => ty.clone(),
    }
}

fn resolve_type_var(
    env: &dyn TypeEnv,
    var: TypeVarId,
    viewpoint: &Type,
    declaring: ClassId,
    visited: &mut HashSet<ClassId>,
) -> Type {
    let Some(class) = viewpoint.raw_class() else {
        return env.object_type();
    };

    if class == declaring {
        // No supertype left to bind the variable, even when the viewpoint is parameterized.
        return erased_bound(env, var);
    }

    // Guards against cyclic registrations; a well-formed hierarchy never revisits a class on
    // a single upward walk that still has to reach `declaring`.
    if !visited.insert(class) {
        return env.object_type();
    }

    let Some(class_def) = env.class(class) else {
        return env.object_type();
    };

    let supertypes = class_def.super_class.iter().chain(class_def.interfaces.iter());
    for super_ty in supertypes {
        if let Some(found) =
            scan_super_type(env, var, viewpoint, declaring, class_def, super_ty, visited)
        {
            return found;
        }
    }

    env.object_type()
}

fn scan_super_type(
    env: &dyn TypeEnv,
    var: TypeVarId,
    viewpoint: &Type,
    declaring: ClassId,
    class_def: &ClassDef,
    super_ty: &Type,
    visited: &mut HashSet<ClassId>,
) -> Option<Type> {
    // Rewrite the supertype through the viewpoint first: `Mid<V> extends Base<String, V>`
    // seen as `Mid<Long>` is `Base<String, Long>`.
    let parent = substitute_own_params(env, super_ty, class_def, viewpoint);
    let parent_class = parent.raw_class()?;

    if parent_class == declaring {
        let resolved = own_argument(env, var, &parent, env.class(declaring));
        return Some(resolved.unwrap_or_else(|| erased_bound(env, var)));
    }

    if is_subclass(env, parent_class, declaring) {
        return Some(resolve_type_var(env, var, &parent, declaring, visited));
    }

    None
}

/// The actual argument `parameterized` supplies for `var`, one of `def`'s own type parameters.
fn own_argument(
    env: &dyn TypeEnv,
    var: TypeVarId,
    parameterized: &Type,
    def: Option<&ClassDef>,
) -> Option<Type> {
    let Type::Parameterized(ClassType { args, .. }) = parameterized else {
        return None;
    };
    let idx = def?.type_param_index(var)?;
    let arg = args.get(idx)?;
    // A caller-supplied viewpoint may itself mention variables; never leak them.
    Some(replace_vars(arg, &|v| Some(erased_bound(env, v))))
}

/// Replace the type parameters of `class_def` inside `ty` by the arguments `viewpoint` supplies
/// for them. A raw viewpoint, or one with too few arguments, erases them to their bounds.
fn substitute_own_params(
    env: &dyn TypeEnv,
    ty: &Type,
    class_def: &ClassDef,
    viewpoint: &Type,
) -> Type {
    let args: &[Type] = match viewpoint {
        Type::Parameterized(ClassType { args, .. }) => args,
        _ => &[],
    };
    replace_vars(ty, &|var| {
        let idx = class_def.type_param_index(var)?;
        Some(
            args.get(idx)
                .cloned()
                .unwrap_or_else(|| erased_bound(env, var)),
        )
    })
}

fn replace_vars(ty: &Type, replace: &dyn Fn(TypeVarId) -> Option<Type>) -> Type {
    match ty {
        Type::TypeVar(var) => replace(*var).unwrap_or_else(|| ty.clone()),
        Type::Parameterized(ClassType { def, args }) => Type::Parameterized(ClassType {
            def: *def,
            args: args.iter().map(|arg| replace_vars(arg, replace)).collect(),
        }),
        Type::Array(component) => Type::array(replace_vars(component, replace)),
        Type::Wildcard(wildcard) => Type::Wildcard(WildcardType {
            upper_bounds: wildcard
                .upper_bounds
                .iter()
                .map(|bound| replace_vars(bound, replace))
                .collect(),
            lower_bounds: wildcard
                .lower_bounds
                .iter()
                .map(|bound| replace_vars(bound, replace))
                .collect(),
        }),
        Type::Void | Type::Primitive(_) | Type::Class(_) => ty.clone(),
    }
}

fn erased_bound(env: &dyn TypeEnv, var: TypeVarId) -> Type {
    erasure(env, &Type::TypeVar(var))
}
