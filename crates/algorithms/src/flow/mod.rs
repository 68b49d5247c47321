//! Flow-direction analysis of bathymetry
//!
//! Water is modelled as moving along the gradient of the depth-derived
//! value. From one [`FlowField`] per raster the module derives:
//! - Flow vectors: thresholded arrows on a regular sample grid
//! - Rip risk: divergence-weighted east / west / offshore scores
//! - Depth grid: a coarse, independently differentiated copy of the raw depth

mod depth_grid;
mod field;
mod risk;
mod sampling;
mod vectors;

pub use depth_grid::{export_depth_grid, DepthGrid, DepthGridCell, DepthGridParams};
pub use field::{gradient_field, FlowField, GradientField, GradientParams};
pub use risk::{score_rip_risk, CellFlow, RiskCell, RiskDirection, RiskParams, RiskZones};
pub use sampling::sample_positions;
pub use vectors::{extract_flow_vectors, FlowVector, FlowVectorParams};
