//! Property-level helpers: naming rules, path tokenization and bean copying.

mod copier;
mod name;
mod tokenizer;

pub use copier::copy_bean_properties;
pub use name::{is_getter, is_property, is_setter, is_valid_property_name, method_to_property};
pub use tokenizer::{PathStep, Steps};
