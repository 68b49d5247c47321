//! Divergence-based rip current risk scoring
//!
//! Three independent heat maps are produced: currents running east, west
//! and offshore. Each combines the directional flow component, flow
//! convergence (negative divergence) and the local gradient magnitude.

use ndarray::Array2;
use riptide_core::{Error, GridSampler, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::field::FlowField;
use super::sampling::{check_spacing, sample_positions};

/// Weight of the along-shore flow component in east/west risk
pub const ALONGSHORE_FLOW_WEIGHT: f64 = 0.4;
/// Weight of convergence in east/west risk
pub const ALONGSHORE_CONVERGENCE_WEIGHT: f64 = 0.3;
/// Weight of the offshore component in east/west risk
pub const ALONGSHORE_OFFSHORE_WEIGHT: f64 = 0.3;
/// Weight of the offshore component in offshore risk
pub const OFFSHORE_FLOW_WEIGHT: f64 = 0.6;
/// Weight of convergence in offshore risk
pub const OFFSHORE_CONVERGENCE_WEIGHT: f64 = 0.4;
/// Scale applied to raw scores before clamping to 1
pub const RISK_SCALE: f64 = 100.0;

/// Parameters for risk scoring
#[derive(Debug, Clone)]
pub struct RiskParams {
    /// Sampling stride in pixels (default 15)
    pub grid_spacing: usize,
    /// Clamped scores must exceed this to be kept (default 0.001)
    pub inclusion_threshold: f64,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            grid_spacing: 15,
            inclusion_threshold: 0.001,
        }
    }
}

impl RiskParams {
    fn validate(&self) -> Result<()> {
        check_spacing("grid_spacing", self.grid_spacing)?;
        if !(self.inclusion_threshold >= 0.0 && self.inclusion_threshold < 1.0) {
            return Err(Error::invalid_parameter(
                "inclusion_threshold",
                self.inclusion_threshold,
                "must be in [0, 1)",
            ));
        }
        Ok(())
    }
}

/// Flow quantities of one cell that feed the risk formulas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellFlow {
    pub flow_x: f64,
    pub flow_y: f64,
    pub divergence: f64,
    pub magnitude: f64,
}

impl CellFlow {
    /// Positive when the flow field converges here
    pub fn convergence(&self) -> f64 {
        -self.divergence
    }

    /// Offshore means decreasing row index (flow_y < 0)
    pub fn offshore_component(&self) -> f64 {
        -self.flow_y
    }

    fn alongshore_risk(&self, alongshore_flow: f64) -> f64 {
        (alongshore_flow.max(0.0) * ALONGSHORE_FLOW_WEIGHT
            + self.convergence().max(0.0) * ALONGSHORE_CONVERGENCE_WEIGHT
            + self.offshore_component().max(0.0) * ALONGSHORE_OFFSHORE_WEIGHT)
            * self.magnitude
            * RISK_SCALE
    }

    /// Unclamped eastward-current score
    pub fn east_risk(&self) -> f64 {
        self.alongshore_risk(self.flow_x)
    }

    /// Unclamped westward-current score
    pub fn west_risk(&self) -> f64 {
        self.alongshore_risk(-self.flow_x)
    }

    /// Unclamped offshore-current score
    pub fn offshore_risk(&self) -> f64 {
        (self.offshore_component().max(0.0) * OFFSHORE_FLOW_WEIGHT
            + self.convergence().max(0.0) * OFFSHORE_CONVERGENCE_WEIGHT)
            * self.magnitude
            * RISK_SCALE
    }

    /// Unclamped score for `direction`
    pub fn risk(&self, direction: RiskDirection) -> f64 {
        match direction {
            RiskDirection::East => self.east_risk(),
            RiskDirection::West => self.west_risk(),
            RiskDirection::Offshore => self.offshore_risk(),
        }
    }
}

/// Current direction a heat map describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskDirection {
    East,
    West,
    Offshore,
}

impl RiskDirection {
    pub const ALL: [RiskDirection; 3] = [Self::East, Self::West, Self::Offshore];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::East => "east",
            Self::West => "west",
            Self::Offshore => "offshore",
        }
    }
}

impl std::fmt::Display for RiskDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One heat map sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskCell {
    pub lat: f64,
    pub lon: f64,
    /// Relative risk in [0, 1] within its own direction
    pub risk: f64,
}

/// Risk cells per direction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskZones {
    pub east: Vec<RiskCell>,
    pub west: Vec<RiskCell>,
    pub offshore: Vec<RiskCell>,
}

impl RiskZones {
    pub fn get(&self, direction: RiskDirection) -> &[RiskCell] {
        match direction {
            RiskDirection::East => &self.east,
            RiskDirection::West => &self.west,
            RiskDirection::Offshore => &self.offshore,
        }
    }

    fn get_mut(&mut self, direction: RiskDirection) -> &mut Vec<RiskCell> {
        match direction {
            RiskDirection::East => &mut self.east,
            RiskDirection::West => &mut self.west,
            RiskDirection::Offshore => &mut self.offshore,
        }
    }

    /// Cells across all three directions
    pub fn total(&self) -> usize {
        self.east.len() + self.west.len() + self.offshore.len()
    }

    /// Divide each direction by its own maximum
    fn normalize(&mut self) {
        for direction in RiskDirection::ALL {
            let cells = self.get_mut(direction);
            let max_risk = cells.iter().map(|c| c.risk).fold(0.0_f64, f64::max);
            if max_risk > 0.0 {
                for cell in cells.iter_mut() {
                    cell.risk /= max_risk;
                }
            }
        }
    }
}

/// Score east / west / offshore rip risk on a regular sample grid.
///
/// `depth` is the raw raster the field was derived from; no-data cells are
/// never scored. Raw scores are clamped to 1, kept if above the inclusion
/// threshold, then each direction is normalized by its own maximum.
pub fn score_rip_risk(
    depth: &Array2<f64>,
    field: &FlowField,
    sampler: &GridSampler,
    params: &RiskParams,
) -> Result<RiskZones> {
    params.validate()?;
    if depth.dim() != field.shape() {
        return Err(Error::Other(format!(
            "depth array {:?} and flow field {:?} differ in shape",
            depth.dim(),
            field.shape()
        )));
    }

    let divergence = field.divergence();
    let (rows, cols) = field.shape();
    let mut zones = RiskZones::default();

    for (row, col) in sample_positions(rows, cols, params.grid_spacing) {
        if depth[[row, col]].is_nan() {
            continue;
        }

        let cell = CellFlow {
            flow_x: field.dx[[row, col]],
            flow_y: field.dy[[row, col]],
            divergence: divergence[[row, col]],
            magnitude: field.magnitude[[row, col]],
        };

        let mut position = None;
        for direction in RiskDirection::ALL {
            let risk = cell.risk(direction).min(1.0);
            if risk > params.inclusion_threshold {
                let (lat, lon) = *position.get_or_insert_with(|| sampler.lat_lon(row, col));
                zones.get_mut(direction).push(RiskCell { lat, lon, risk });
            }
        }
    }

    debug!(
        east = zones.east.len(),
        west = zones.west.len(),
        offshore = zones.offshore.len(),
        "risk cells before normalization"
    );

    zones.normalize();
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{gradient_field, GradientParams};
    use approx::assert_relative_eq;
    use riptide_core::{GeoTransform, Raster};

    fn identity_sampler() -> GridSampler {
        GridSampler::new(
            GeoTransform::new(0.0, 0.0, 1.0, -1.0),
            Box::new(|x: f64, y: f64| (x, y)),
        )
    }

    fn every_cell() -> RiskParams {
        RiskParams {
            grid_spacing: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_formula_weights() {
        let cell = CellFlow {
            flow_x: 0.6,
            flow_y: -0.8,
            divergence: -0.5,
            magnitude: 0.001,
        };
        // (0.6*0.4 + 0.5*0.3 + 0.8*0.3) * 0.001 * 100
        assert_relative_eq!(cell.east_risk(), 0.063, epsilon = 1e-12);
        // west flow is negative, contributes nothing
        assert_relative_eq!(cell.west_risk(), 0.039, epsilon = 1e-12);
        // (0.8*0.6 + 0.5*0.4) * 0.1
        assert_relative_eq!(cell.offshore_risk(), 0.068, epsilon = 1e-12);
    }

    #[test]
    fn test_diverging_onshore_flow_scores_nothing() {
        let cell = CellFlow {
            flow_x: 0.0,
            flow_y: 1.0,
            divergence: 0.3,
            magnitude: 5.0,
        };
        for direction in RiskDirection::ALL {
            assert_eq!(cell.risk(direction), 0.0);
        }
    }

    #[test]
    fn test_westward_ramp() {
        // depth increases toward the west
        let depth = Raster::from_array(Array2::from_shape_fn((4, 4), |(_, c)| 3.0 - c as f64));
        let field = gradient_field(&depth, &GradientParams::default()).unwrap();
        let zones = score_rip_risk(depth.data(), &field, &identity_sampler(), &every_cell()).unwrap();

        assert!(zones.east.is_empty());
        assert_eq!(zones.west.len(), 16);
        assert!(zones.west.iter().any(|c| c.risk == 1.0));
        assert!(zones.west.iter().all(|c| c.risk > 0.0 && c.risk <= 1.0));
    }

    #[test]
    fn test_bowl_converges_at_center() {
        let depth = Array2::from_shape_fn((5, 5), |(r, c)| {
            let (dr, dc) = (r as f64 - 2.0, c as f64 - 2.0);
            10.0 - (dr * dr + dc * dc)
        });
        let field = gradient_field(&Raster::from_array(depth), &GradientParams::default()).unwrap();
        let divergence = field.divergence();
        assert!(divergence[[2, 2]] < 0.0);

        let cell = CellFlow {
            flow_x: 0.0,
            flow_y: -1.0,
            divergence: divergence[[2, 2]],
            magnitude: 0.01,
        };
        assert!(cell.offshore_risk() > 0.0);
    }

    #[test]
    fn test_bowl_scored_end_to_end() {
        let depth = Array2::from_shape_fn((5, 5), |(r, c)| {
            let (dr, dc) = (r as f64 - 2.0, c as f64 - 2.0);
            10.0 - (dr * dr + dc * dc)
        });
        let field = gradient_field(&Raster::from_array(depth.clone()), &GradientParams::default())
            .unwrap();
        let zones = score_rip_risk(&depth, &field, &identity_sampler(), &every_cell()).unwrap();

        // the center converges but is flat, so it scores in no direction
        assert!(field.divergence()[[2, 2]] < -1.0);
        assert!(field.magnitude[[2, 2]] < 1e-9);
        let center = (-2.0, 2.0);
        let mut scored: Vec<(f64, f64)> = Vec::new();
        for direction in RiskDirection::ALL {
            for cell in zones.get(direction) {
                assert_ne!((cell.lat, cell.lon), center, "{direction} scored the center");
                if !scored.contains(&(cell.lat, cell.lon)) {
                    scored.push((cell.lat, cell.lon));
                }
            }
        }
        assert_eq!(scored.len(), 24);
        // rows south of the center flow north toward it
        assert!(zones.offshore.iter().any(|c| c.lat < -2.0));
    }

    #[test]
    fn test_directions_normalized_independently() {
        // offshore everywhere, stronger toward the bottom rows
        let field = FlowField {
            dx: Array2::zeros((3, 3)),
            dy: Array2::from_elem((3, 3), -1.0),
            magnitude: Array2::from_shape_fn((3, 3), |(r, _)| 0.001 * (r + 1) as f64),
        };
        let depth = Array2::zeros((3, 3));
        let zones = score_rip_risk(&depth, &field, &identity_sampler(), &every_cell()).unwrap();

        assert_eq!(zones.offshore.len(), 9);
        assert_eq!(zones.east.len(), 9);
        assert_eq!(zones.west.len(), 9);
        for direction in RiskDirection::ALL {
            let max = zones.get(direction).iter().map(|c| c.risk).fold(0.0, f64::max);
            assert_relative_eq!(max, 1.0);
        }
        // row 0 scored 0.06 offshore and 0.03 alongshore; both become 1/3
        assert_relative_eq!(zones.offshore[0].risk, 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(zones.east[0].risk, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nodata_cells_skipped() {
        let field = FlowField {
            dx: Array2::from_elem((2, 2), 1.0),
            dy: Array2::zeros((2, 2)),
            magnitude: Array2::ones((2, 2)),
        };
        let mut depth = Array2::zeros((2, 2));
        depth[[0, 0]] = f64::NAN;
        let zones = score_rip_risk(&depth, &field, &identity_sampler(), &every_cell()).unwrap();
        assert_eq!(zones.east.len(), 3);
        assert!(zones.west.is_empty());
    }

    #[test]
    fn test_flat_field_is_empty() {
        let field = FlowField::from_gradient(&Array2::zeros((4, 4)), &Array2::zeros((4, 4)));
        let zones =
            score_rip_risk(&Array2::zeros((4, 4)), &field, &identity_sampler(), &every_cell())
                .unwrap();
        assert_eq!(zones.total(), 0);
    }

    #[test]
    fn test_shape_mismatch() {
        let field = FlowField::from_gradient(&Array2::zeros((4, 4)), &Array2::zeros((4, 4)));
        let result = score_rip_risk(&Array2::zeros((3, 4)), &field, &identity_sampler(), &every_cell());
        assert!(result.is_err());
    }
}
