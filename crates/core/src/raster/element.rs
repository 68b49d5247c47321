//! Raster element trait for cell values

use num_traits::{Float, NumCast};
use std::fmt::Debug;

/// Trait for types that can be stored in a depth raster cell.
///
/// Bathymetry rasters are always floating point: the no-data sentinel is
/// NaN, and a declared GDAL no-data value is folded into NaN on read.
pub trait RasterElement:
    Float + Copy + Debug + NumCast + Send + Sync + 'static
{
    /// Check if this value represents no-data
    fn is_nodata(&self) -> bool {
        self.is_nan()
    }
}

impl RasterElement for f32 {}
impl RasterElement for f64 {}
