//! Page background rasterization collaborators.

pub(crate) mod page;
