//! Declared template structure: bindings, fields and page layouts.

pub(crate) mod binding;
pub(crate) mod field;
pub(crate) mod import;
pub(crate) mod page;
