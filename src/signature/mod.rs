//! Freehand signature capture and rasterization.

pub(crate) mod capture;
pub(crate) mod raster;
pub(crate) mod snapshot;
