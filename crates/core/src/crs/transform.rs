//! Pure-Rust projected → WGS84 conversion (Snyder 1987, USGS formulas).
//!
//! Covers geographic WGS84-like codes, UTM North/South (EPSG 326xx, 327xx,
//! and NAD83 269xx) and Web Mercator (EPSG 3857). Bathymetry rasters
//! derived from Sentinel-2 or Landsat scenes are delivered in UTM.

use super::CRS;
use crate::error::{Error, Result};

// ── WGS84 ellipsoid constants ────────────────────────────────────────────

const A: f64 = 6_378_137.0; // semi-major axis (m)
const F: f64 = 1.0 / 298.257_223_563; // flattening
const E2: f64 = 2.0 * F - F * F; // eccentricity squared
const E_PRIME2: f64 = E2 / (1.0 - E2); // second eccentricity squared
const K0: f64 = 0.9996; // UTM scale factor
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Converts projected coordinates to geographic (longitude, latitude) in
/// degrees on WGS84.
pub trait CoordinateTransform: Send + Sync {
    /// Convert projected `(x, y)` to `(longitude, latitude)`
    fn to_lon_lat(&self, x: f64, y: f64) -> (f64, f64);
}

impl<T> CoordinateTransform for T
where
    T: Fn(f64, f64) -> (f64, f64) + Send + Sync,
{
    fn to_lon_lat(&self, x: f64, y: f64) -> (f64, f64) {
        self(x, y)
    }
}

/// Select the conversion to WGS84 for a raster's CRS.
///
/// Fails with [`Error::UnsupportedCrs`] for codes this crate cannot
/// project; callers surface this before any numeric work starts.
pub fn transform_to_wgs84(crs: &CRS) -> Result<Box<dyn CoordinateTransform>> {
    let code = crs
        .epsg()
        .ok_or_else(|| Error::UnsupportedCrs(crs.identifier()))?;

    if is_geographic(code) {
        return Ok(Box::new(Geographic));
    }
    if code == 3857 {
        return Ok(Box::new(WebMercator));
    }
    if let Some(utm) = Utm::from_epsg(code) {
        return Ok(Box::new(utm));
    }

    Err(Error::UnsupportedCrs(crs.identifier()))
}

/// Geographic codes whose datum is within a metre of WGS84.
fn is_geographic(epsg: u32) -> bool {
    matches!(epsg, 4326 | 4258 | 4269 | 4283)
}

/// Identity: the raster is already in longitude/latitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geographic;

impl CoordinateTransform for Geographic {
    fn to_lon_lat(&self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }
}

/// Spherical Web Mercator (EPSG:3857).
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl CoordinateTransform for WebMercator {
    fn to_lon_lat(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = (x / A).to_degrees();
        let lat = (2.0 * (y / A).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
        (lon, lat)
    }
}

/// Universal Transverse Mercator zone on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utm {
    pub zone: u32,
    pub north: bool,
}

impl Utm {
    /// Parse an EPSG code into a UTM zone.
    ///
    /// - EPSG 326xx → zone xx, North hemisphere
    /// - EPSG 327xx → zone xx, South hemisphere
    /// - EPSG 269xx → NAD83 zone xx (North), treated as WGS84
    pub fn from_epsg(epsg: u32) -> Option<Self> {
        match epsg {
            32601..=32660 => Some(Self { zone: epsg - 32600, north: true }),
            32701..=32760 => Some(Self { zone: epsg - 32700, north: false }),
            26901..=26923 => Some(Self { zone: epsg - 26900, north: true }),
            _ => None,
        }
    }

    fn central_meridian(&self) -> f64 {
        ((self.zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians()
    }
}

impl CoordinateTransform for Utm {
    /// Inverse transverse Mercator (Snyder eqs. 8-12 to 8-18)
    fn to_lon_lat(&self, easting: f64, northing: f64) -> (f64, f64) {
        let x = easting - FALSE_EASTING;
        let y = if self.north {
            northing
        } else {
            northing - FALSE_NORTHING_SOUTH
        };

        let e4 = E2 * E2;
        let e6 = e4 * E2;

        // Footpoint latitude from the rectifying latitude mu
        let m = y / K0;
        let mu = m / (A * (1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

        let sqrt_1_e2 = (1.0 - E2).sqrt();
        let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);
        let e1_2 = e1 * e1;
        let e1_3 = e1_2 * e1;
        let e1_4 = e1_3 * e1;

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

        let sin_phi1 = phi1.sin();
        let cos_phi1 = phi1.cos();
        let tan_phi1 = phi1.tan();

        let c1 = E_PRIME2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let w = 1.0 - E2 * sin_phi1 * sin_phi1;
        let n1 = A / w.sqrt();
        let r1 = A * (1.0 - E2) / w.powf(1.5);
        let d = x / (n1 * K0);

        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;
        let d5 = d4 * d;
        let d6 = d5 * d;

        let lat = phi1
            - (n1 * tan_phi1 / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * E_PRIME2) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * E_PRIME2
                        - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lon = self.central_meridian()
            + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * E_PRIME2 + 24.0 * t1 * t1)
                    * d5
                    / 120.0)
                / cos_phi1;

        (lon.to_degrees(), lat.to_degrees())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
