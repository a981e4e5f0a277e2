//! Bean naming rules: accessor prefixes and the name-to-property mapping.

use crate::{ReflectError, Result};

/// Property name derived from an accessor method name (`getFoo`, `isFoo`, `setFoo`).
///
/// The prefix is stripped, then the first character of the remainder is lower-cased when the
/// remainder is a single character or its second character is not upper-case. `getURL` therefore
/// stays `URL` while `getUrl` becomes `url`.
pub fn method_to_property(name: &str) -> Result<String> {
    let rest = if let Some(rest) = name.strip_prefix("is") {
        rest
    } else if let Some(rest) = name.strip_prefix("get").or_else(|| name.strip_prefix("set")) {
        rest
    } else {
        return Err(ReflectError::InvalidPropertyName {
            name: name.to_string(),
        });
    };
    Ok(decapitalize(rest))
}

fn decapitalize(rest: &str) -> String {
    let mut chars = rest.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let keep_case = chars.next().is_some_and(char::is_uppercase);
    if keep_case {
        return rest.to_string();
    }
    let mut out = String::with_capacity(rest.len());
    out.extend(first.to_lowercase());
    out.push_str(&rest[first.len_utf8()..]);
    out
}

pub fn is_property(name: &str) -> bool {
    is_getter(name) || is_setter(name)
}

/// `getX` (longer than 3) or `isX` (longer than 2).
pub fn is_getter(name: &str) -> bool {
    (name.starts_with("get") && name.len() > 3) || (name.starts_with("is") && name.len() > 2)
}

pub fn is_setter(name: &str) -> bool {
    name.starts_with("set") && name.len() > 3
}

/// Names that never become properties: compiler-generated `$`-names, the serialization version
/// constant, and `class` (which would otherwise come from `Object.getClass()`).
pub fn is_valid_property_name(name: &str) -> bool {
    !(name.starts_with('$') || name == "serialVersionUID" || name == "class")
}
