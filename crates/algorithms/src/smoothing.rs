//! Isotropic Gaussian smoothing of depth rasters
//!
//! Band-ratio bathymetry is quantized and noisy; differentiating it raw
//! yields gradients dominated by pixel-level artifacts. The field is
//! smoothed first with a separable Gaussian:
//!
//! 1. 1D kernel `exp(-x² / 2σ²)`, normalized, radius `round(4σ)`
//! 2. Column pass (along rows, axis 0), then row pass (along columns, axis 1)
//! 3. Out-of-range taps reflect symmetrically about the edge:
//!    `d c b a | a b c d | d c b a`
//!
//! NaN is not masked: any no-data cell inside a kernel window makes the
//! output NaN, so holes grow by the kernel radius and are zeroed later.

use crate::maybe_rayon::*;
use ndarray::Array2;
use riptide_core::{Error, Result};

/// Kernel half-width in standard deviations
const TRUNCATE: f64 = 4.0;

/// Smooth a 2D field with a Gaussian of standard deviation `sigma` cells.
pub fn gaussian_filter(data: &Array2<f64>, sigma: f64) -> Result<Array2<f64>> {
    if !(sigma > 0.0 && sigma.is_finite()) {
        return Err(Error::invalid_parameter(
            "sigma",
            sigma,
            "must be a positive finite number of cells",
        ));
    }
    Ok(gaussian_smooth(data, sigma))
}

/// Smoothing with a pre-validated sigma
pub(crate) fn gaussian_smooth(data: &Array2<f64>, sigma: f64) -> Array2<f64> {
    let (rows, cols) = data.dim();
    if rows == 0 || cols == 0 {
        return data.clone();
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;

    // Axis 0: each output row is a weighted sum of reflected input rows
    let col_pass: Vec<Vec<f64>> = (0..rows)
        .into_par_iter()
        .map(|row| {
            let mut out = vec![0.0; cols];
            for (k, &w) in kernel.iter().enumerate() {
                let src = reflect(row as isize + k as isize - radius, rows);
                for (o, &v) in out.iter_mut().zip(data.row(src).iter()) {
                    *o += w * v;
                }
            }
            out
        })
        .collect();

    // Axis 1: convolve each row of the column-pass result
    let row_pass: Vec<Vec<f64>> = (0..rows)
        .into_par_iter()
        .map(|row| {
            let line = &col_pass[row];
            (0..cols)
                .map(|col| {
                    kernel
                        .iter()
                        .enumerate()
                        .map(|(k, &w)| {
                            w * line[reflect(col as isize + k as isize - radius, cols)]
                        })
                        .sum::<f64>()
                })
                .collect::<Vec<f64>>()
        })
        .collect();

    Array2::from_shape_fn((rows, cols), |(row, col)| row_pass[row][col])
}

/// Normalized 1D Gaussian kernel of radius `round(4σ)`
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let denom = 2.0 * sigma * sigma;

    let kernel: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / denom).exp())
        .collect();

    let sum: f64 = kernel.iter().sum();
    kernel.into_iter().map(|w| w / sum).collect()
}

/// Map an out-of-range index into `0..n` by symmetric reflection, with
/// period `2n` so arrays shorter than the kernel still resolve.
fn reflect(index: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = index.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}
