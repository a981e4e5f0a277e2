//! Java-like rendering of type descriptors, stable enough for signatures and diagnostics.

use std::fmt::Write as _;

use crate::{erasure, ClassType, MethodDef, Type, TypeEnv};

pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    let mut out = String::new();
    write_type(env, ty, &mut out);
    out
}

fn write_type(env: &dyn TypeEnv, ty: &Type, out: &mut String) {
    match ty {
        Type::Void => out.push_str("void"),
        Type::Primitive(p) => out.push_str(p.name()),
        Type::Class(id) => out.push_str(&env.class_name(*id)),
        Type::Parameterized(ClassType { def, args }) => {
            out.push_str(&env.class_name(*def));
            out.push('<');
            for (idx, arg) in args.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                write_type(env, arg, out);
            }
            out.push('>');
        }
        Type::Array(component) => {
            write_type(env, component, out);
            out.push_str("[]");
        }
        Type::TypeVar(id) => match env.type_param(*id) {
            Some(tp) => out.push_str(&tp.name),
            None => {
                let _ = write!(out, "<unknown type var #{}>", id.to_raw());
            }
        },
        Type::Wildcard(wildcard) => {
            out.push('?');
            if let Some(lower) = wildcard.lower_bounds.first() {
                out.push_str(" super ");
                write_type(env, lower, out);
            } else if let Some(upper) = wildcard.upper_bounds.first() {
                out.push_str(" extends ");
                write_type(env, upper, out);
            }
        }
    }
}

/// Override-identity signature of a method: `ret#name:p1,p2` over erased type names.
///
/// Two declarations with the same signature are the same method seen at different levels of a
/// hierarchy; the more-derived one shadows the other.
pub fn method_signature(env: &dyn TypeEnv, method: &MethodDef) -> String {
    let mut sig = format_type(env, &erasure(env, &method.return_type));
    sig.push('#');
    sig.push_str(&method.name);
    for (idx, param) in method.params.iter().enumerate() {
        sig.push(if idx == 0 { ':' } else { ',' });
        sig.push_str(&format_type(env, &erasure(env, param)));
    }
    sig
}
