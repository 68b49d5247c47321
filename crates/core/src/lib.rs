//! # riptide core
//!
//! Core types and I/O for deriving rip-current indicators from bathymetry.
//!
//! This crate provides:
//! - `Raster<T>`: Georeferenced raster grid
//! - `GeoTransform`: Affine transformation for georeferencing
//! - `CRS` and `CoordinateTransform`: projected → WGS84 conversion
//! - `GridSampler` / `GeoBounds`: geographic lookup for raster cells
//! - Single-band GeoTIFF reading and writing

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;

pub use crs::{transform_to_wgs84, CoordinateTransform, CRS};
pub use error::{Error, Result};
pub use raster::{GeoBounds, GeoTransform, GridSampler, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{CoordinateTransform, CRS};
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoBounds, GeoTransform, GridSampler, Raster, RasterElement};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in riptide.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
