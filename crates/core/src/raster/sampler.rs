//! Geographic lookup for raster cells

use crate::crs::{transform_to_wgs84, CoordinateTransform};
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic extent of a raster in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// Maps raster (row, col) positions to WGS84 latitude/longitude.
///
/// Combines the raster's affine transform with a projected → geographic
/// conversion. Positions are the top-left pixel corner, so cell `(0, 0)`
/// reports the raster origin.
pub struct GridSampler {
    transform: GeoTransform,
    to_wgs84: Box<dyn CoordinateTransform>,
}

impl GridSampler {
    /// Create a sampler from an explicit transform pair
    pub fn new(transform: GeoTransform, to_wgs84: Box<dyn CoordinateTransform>) -> Self {
        Self {
            transform,
            to_wgs84,
        }
    }

    /// Create a sampler from a raster's own georeferencing.
    ///
    /// Fails with [`Error::MissingCrs`] when the raster carries no CRS and
    /// [`Error::UnsupportedCrs`] when it cannot be projected to WGS84.
    pub fn for_raster<T: RasterElement>(raster: &Raster<T>) -> Result<Self> {
        let crs = raster.crs().ok_or(Error::MissingCrs)?;
        Ok(Self::new(*raster.transform(), transform_to_wgs84(crs)?))
    }

    /// Affine transform used for pixel positions
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Latitude and longitude of pixel (row, col)
    pub fn lat_lon(&self, row: usize, col: usize) -> (f64, f64) {
        let (x, y) = self.transform.pixel_corner(col, row);
        let (lon, lat) = self.to_wgs84.to_lon_lat(x, y);
        (lat, lon)
    }

    /// Geographic bounds of a `rows` x `cols` raster.
    ///
    /// The south-west and north-east corners of the projected envelope are
    /// converted independently.
    pub fn geo_bounds(&self, rows: usize, cols: usize) -> GeoBounds {
        let (min_x, min_y, max_x, max_y) = self.transform.bounds(cols, rows);
        let (west, south) = self.to_wgs84.to_lon_lat(min_x, min_y);
        let (east, north) = self.to_wgs84.to_lon_lat(max_x, max_y);
        GeoBounds {
            south,
            west,
            north,
            east,
        }
    }
}

impl fmt::Debug for GridSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridSampler")
            .field("transform", &self.transform)
            .finish_non_exhaustive()
    }
}
