//! Regular sub-sampling of raster positions

use riptide_core::{Error, Result};

/// Row-major `(row, col)` positions at multiples of `spacing`, anchored at
/// the top-left cell.
///
/// This is the traversal order of every sampled output, which keeps the
/// generated documents reproducible.
pub fn sample_positions(
    rows: usize,
    cols: usize,
    spacing: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let step = spacing.max(1);
    (0..rows)
        .step_by(step)
        .flat_map(move |row| (0..cols).step_by(step).map(move |col| (row, col)))
}

/// Reject a zero grid spacing / downsample factor
pub(crate) fn check_spacing(name: &'static str, spacing: usize) -> Result<()> {
    if spacing == 0 {
        return Err(Error::invalid_parameter(name, spacing, "must be >= 1 pixel"));
    }
    Ok(())
}
