//! Sparse flow vectors for map rendering

use riptide_core::{Error, GridSampler, Result};
use serde::{Deserialize, Serialize};

use super::field::FlowField;
use super::sampling::{check_spacing, sample_positions};
use crate::numeric::percentile;

/// Parameters for flow vector extraction
#[derive(Debug, Clone)]
pub struct FlowVectorParams {
    /// Sampling stride in pixels (default 15)
    pub grid_spacing: usize,
    /// Magnitude percentile, over the full field, below which samples are dropped (default 30)
    pub percentile: f64,
}

impl Default for FlowVectorParams {
    fn default() -> Self {
        Self {
            grid_spacing: 15,
            percentile: 30.0,
        }
    }
}

impl FlowVectorParams {
    fn validate(&self) -> Result<()> {
        check_spacing("grid_spacing", self.grid_spacing)?;
        if !(0.0..=100.0).contains(&self.percentile) {
            return Err(Error::invalid_parameter(
                "percentile",
                self.percentile,
                "must be in [0, 100]",
            ));
        }
        Ok(())
    }
}

/// A single sampled flow arrow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowVector {
    pub lat: f64,
    pub lon: f64,
    pub dx: f64,
    pub dy: f64,
    /// Relative steepness in [0, 1]
    pub magnitude: f64,
}

/// Sample `field` every `grid_spacing` pixels and emit geographic flow vectors.
///
/// Samples whose magnitude is below the configured percentile of the whole
/// magnitude array are skipped, as are cells with no gradient at all. The
/// remaining magnitudes are divided by the largest retained magnitude.
/// Output is row-major in sample order.
pub fn extract_flow_vectors(
    field: &FlowField,
    sampler: &GridSampler,
    params: &FlowVectorParams,
) -> Result<Vec<FlowVector>> {
    params.validate()?;

    let (rows, cols) = field.shape();
    let threshold = match percentile(field.magnitude.iter().copied(), params.percentile) {
        Some(t) => t,
        None => return Ok(Vec::new()),
    };

    let mut vectors: Vec<FlowVector> = sample_positions(rows, cols, params.grid_spacing)
        .filter_map(|(row, col)| {
            let magnitude = field.magnitude[[row, col]];
            if magnitude < threshold || magnitude <= 0.0 {
                return None;
            }
            let (lat, lon) = sampler.lat_lon(row, col);
            Some(FlowVector {
                lat,
                lon,
                dx: field.dx[[row, col]],
                dy: field.dy[[row, col]],
                magnitude,
            })
        })
        .collect();

    let max_magnitude = vectors.iter().map(|v| v.magnitude).fold(0.0_f64, f64::max);
    if max_magnitude > 0.0 {
        for v in &mut vectors {
            v.magnitude /= max_magnitude;
        }
    }

    Ok(vectors)
}
