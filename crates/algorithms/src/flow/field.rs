//! Gradient field: smoothed depth → unit flow direction + steepness

use ndarray::{Array2, Axis, Zip};
use riptide_core::raster::Raster;
use riptide_core::{Algorithm, Error, Result};

use crate::numeric::{gradient, gradient_axis, safe_divide, sanitize};
use crate::smoothing::gaussian_smooth;

/// Parameters for the gradient field
#[derive(Debug, Clone)]
pub struct GradientParams {
    /// Gaussian smoothing standard deviation in cells (default 2.0)
    pub sigma: f64,
}

impl Default for GradientParams {
    fn default() -> Self {
        Self { sigma: 2.0 }
    }
}

impl GradientParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.sigma > 0.0 && self.sigma.is_finite()) {
            return Err(Error::invalid_parameter(
                "sigma",
                self.sigma,
                "must be a positive finite number of cells",
            ));
        }
        Ok(())
    }
}

/// Per-cell flow direction and steepness, co-indexed with the source raster.
///
/// `dx`/`dy` are unit-length (or zero on flat and no-data cells);
/// `magnitude` is the raw gradient norm with no-data replaced by 0.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowField {
    pub dx: Array2<f64>,
    pub dy: Array2<f64>,
    pub magnitude: Array2<f64>,
}

impl FlowField {
    /// Smooth `depth`, differentiate, and normalize.
    pub(crate) fn from_depth(depth: &Array2<f64>, sigma: f64) -> Self {
        let smoothed = gaussian_smooth(depth, sigma);
        let (grad_x, grad_y) = gradient(&smoothed);
        Self::from_gradient(&grad_x, &grad_y)
    }

    /// Build from precomputed gradient components.
    pub fn from_gradient(grad_x: &Array2<f64>, grad_y: &Array2<f64>) -> Self {
        let magnitude = Zip::from(grad_x)
            .and(grad_y)
            .map_collect(|&gx, &gy| (gx * gx + gy * gy).sqrt());

        let dx = Zip::from(grad_x)
            .and(&magnitude)
            .map_collect(|&g, &m| sanitize(safe_divide(g, m)));
        let dy = Zip::from(grad_y)
            .and(&magnitude)
            .map_collect(|&g, &m| sanitize(safe_divide(g, m)));

        Self {
            dx,
            dy,
            magnitude: magnitude.mapv(sanitize),
        }
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.magnitude.dim()
    }

    /// Divergence of the unit direction field, `∂dx/∂x + ∂dy/∂y`.
    ///
    /// Negative values mark converging flow.
    pub fn divergence(&self) -> Array2<f64> {
        gradient_axis(&self.dx, Axis(1)) + gradient_axis(&self.dy, Axis(0))
    }
}

/// Gradient field algorithm
#[derive(Debug, Clone, Default)]
pub struct GradientField;

impl Algorithm for GradientField {
    type Input = Raster<f64>;
    type Output = FlowField;
    type Params = GradientParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "GradientField"
    }

    fn description(&self) -> &'static str {
        "Smooth a bathymetry raster and derive unit flow direction and gradient magnitude"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        gradient_field(&input, &params)
    }
}

/// Compute the flow field of a depth raster.
///
/// 1. Gaussian smoothing (σ = `params.sigma`)
/// 2. Central-difference gradient `(grad_x, grad_y)`
/// 3. `magnitude = |grad|`, `(dx, dy) = grad / (magnitude + ε)`
/// 4. NaN / ∞ from no-data → 0
///
/// Any non-empty raster succeeds; a single cell yields a zero field.
pub fn gradient_field(depth: &Raster<f64>, params: &GradientParams) -> Result<FlowField> {
    params.validate()?;
    Ok(FlowField::from_depth(depth.data(), params.sigma))
}
