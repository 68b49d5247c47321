//! Shared numeric helpers: guarded division, NaN suppression, finite
//! differences and percentiles.
//!
//! Every stage divides by gradient magnitudes that can be zero (flat water)
//! or NaN (no-data propagated through smoothing). All of those sites go
//! through [`safe_divide`] and [`sanitize`] so the policy lives in one place.

use ndarray::{Array2, Axis, Slice, Zip};

/// Added to every magnitude denominator
pub const EPSILON: f64 = 1e-10;

/// `num / (den + EPSILON)`
#[inline]
pub fn safe_divide(num: f64, den: f64) -> f64 {
    num / (den + EPSILON)
}

/// Replace NaN and ±∞ with 0
#[inline]
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Finite-difference derivative of `data` along one axis.
///
/// Central differences `(f[i+1] - f[i-1]) / 2` in the interior and
/// one-sided differences at both edges, in index units. An axis of length
/// 1 has zero derivative. NaN inputs propagate to every difference that
/// touches them.
pub fn gradient_axis(data: &Array2<f64>, axis: Axis) -> Array2<f64> {
    let n = data.len_of(axis);
    let mut out = Array2::zeros(data.raw_dim());
    if n < 2 {
        return out;
    }

    if n > 2 {
        Zip::from(out.slice_axis_mut(axis, Slice::from(1..n - 1)))
            .and(data.slice_axis(axis, Slice::from(2..n)))
            .and(data.slice_axis(axis, Slice::from(0..n - 2)))
            .for_each(|o, &ahead, &behind| *o = (ahead - behind) / 2.0);
    }

    Zip::from(out.index_axis_mut(axis, 0))
        .and(data.index_axis(axis, 1))
        .and(data.index_axis(axis, 0))
        .for_each(|o, &second, &first| *o = second - first);

    Zip::from(out.index_axis_mut(axis, n - 1))
        .and(data.index_axis(axis, n - 1))
        .and(data.index_axis(axis, n - 2))
        .for_each(|o, &last, &before| *o = last - before);

    out
}

/// Gradient of a 2D field as `(grad_x, grad_y)`.
///
/// `grad_x` is the derivative along columns (positive = value increases
/// eastward), `grad_y` along rows (positive = value increases with row
/// index, i.e. southward on a north-up raster).
pub fn gradient(data: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
    (gradient_axis(data, Axis(1)), gradient_axis(data, Axis(0)))
}

/// The `p`-th percentile (0–100) of `values`, ignoring NaN.
///
/// Linear interpolation between the two closest ranks at virtual index
/// `p/100 * (n - 1)`. Returns `None` for empty or all-NaN input.
pub fn percentile<I>(values: I, p: f64) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let rank = (sorted.len() - 1) as f64 * (p.clamp(0.0, 100.0) / 100.0);
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let t = rank - lo as f64;

    Some(lerp(sorted[lo], sorted[hi], t))
}

/// Interpolate from whichever end is closer to keep the result monotone
/// and exact at t = 0 and t = 1.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}
