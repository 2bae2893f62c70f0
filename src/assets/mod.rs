//! Source document loading and image decoding.

pub(crate) mod decode;
pub(crate) mod source;
