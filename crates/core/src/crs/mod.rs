//! Coordinate Reference System handling

mod transform;

pub use transform::{transform_to_wgs84, CoordinateTransform, Geographic, Utm, WebMercator};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System of a raster, identified by EPSG code
/// when the source declares one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    /// EPSG code if known
    epsg: Option<u32>,
    /// Free-form description (GeoTIFF citation, WKT fragment, ...)
    description: Option<String>,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            epsg: Some(code),
            description: None,
        }
    }

    /// Create a CRS known only by a textual description
    pub fn from_description(text: impl Into<String>) -> Self {
        Self {
            epsg: None,
            description: Some(text.into()),
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        match (&self.epsg, &self.description) {
            (Some(code), _) => format!("EPSG:{}", code),
            (None, Some(text)) => text.chars().take(50).collect(),
            (None, None) => "Unknown".to_string(),
        }
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::wgs84()
    }
}
