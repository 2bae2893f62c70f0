//! Template resolution: source bytes plus declared layouts into immutable page structure.

pub(crate) mod resolver;
pub(crate) mod runtime;
