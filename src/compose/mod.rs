//! Page composition: field geometry, text layout and primitive assembly.

pub(crate) mod compositor;
pub(crate) mod geometry;
pub(crate) mod text;
