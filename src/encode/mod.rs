//! Output document encoding.

pub(crate) mod content;
pub(crate) mod pdf;
