//! Raster data structures and georeferencing

mod element;
mod geotransform;
mod grid;
mod sampler;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::{Raster, RasterStatistics};
pub use sampler::{GeoBounds, GridSampler};
