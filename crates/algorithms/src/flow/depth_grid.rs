//! Coarse depth + flow grid for client-side recomputation

use ndarray::{s, Array2};
use riptide_core::{GridSampler, Result};
use serde::{Deserialize, Serialize};

use super::field::FlowField;
use super::sampling::check_spacing;
use crate::numeric::gradient;

/// Parameters for the depth grid export
#[derive(Debug, Clone)]
pub struct DepthGridParams {
    /// Keep every `downsample`-th row and column (default 10)
    pub downsample: usize,
}

impl Default for DepthGridParams {
    fn default() -> Self {
        Self { downsample: 10 }
    }
}

/// One cell of the coarse grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthGridCell {
    pub lat: f64,
    pub lon: f64,
    /// `None` where the source held no-data
    pub depth: Option<f64>,
    pub flow_x: f64,
    pub flow_y: f64,
}

/// Row-major grid of [`DepthGridCell`]
#[derive(Debug, Clone, PartialEq)]
pub struct DepthGrid {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Vec<DepthGridCell>>,
}

/// Strided subsample of the raw depth array with its own flow directions.
///
/// Cell `(i, j)` is source pixel `(i * k, j * k)`; no averaging is done.
/// Flow directions are recomputed from the unsmoothed subsample, so they
/// differ from the full-resolution field.
pub fn export_depth_grid(
    depth: &Array2<f64>,
    sampler: &GridSampler,
    params: &DepthGridParams,
) -> Result<DepthGrid> {
    check_spacing("downsample", params.downsample)?;
    let k = params.downsample;

    let coarse = depth.slice(s![..;k, ..;k]).to_owned();
    let (rows, cols) = coarse.dim();

    let (grad_x, grad_y) = gradient(&coarse);
    let flow = FlowField::from_gradient(&grad_x, &grad_y);

    let cells = (0..rows)
        .map(|i| {
            (0..cols)
                .map(|j| {
                    let (lat, lon) = sampler.lat_lon(i * k, j * k);
                    let value = coarse[[i, j]];
                    DepthGridCell {
                        lat,
                        lon,
                        depth: (!value.is_nan()).then_some(value),
                        flow_x: flow.dx[[i, j]],
                        flow_y: flow.dy[[i, j]],
                    }
                })
                .collect()
        })
        .collect();

    Ok(DepthGrid { rows, cols, cells })
}
