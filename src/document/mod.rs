//! Documents: declaration, runtime values and generation.

pub(crate) mod builder;
pub(crate) mod doc;
pub(crate) mod values;
