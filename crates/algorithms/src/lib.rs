//! # riptide algorithms
//!
//! Numeric pipeline turning a bathymetry raster into rip-current indicators.
//!
//! ## Stages
//!
//! - **flow::field**: Gaussian smoothing + gradient → unit flow direction and steepness
//! - **flow::vectors**: sparse, thresholded flow arrows for map rendering
//! - **flow::risk**: divergence-based east / west / offshore risk heat maps
//! - **flow::depth_grid**: downsampled depth + flow grid for client-side recomputation
//! - **output**: JSON documents for each artifact
//! - **pipeline**: [`RipAnalysis`] runs the stages for one raster

pub mod flow;
pub mod numeric;
pub mod output;
pub mod pipeline;
pub mod smoothing;

mod maybe_rayon;

pub use pipeline::RipAnalysis;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::flow::{
        export_depth_grid, extract_flow_vectors, gradient_field, score_rip_risk, DepthGrid,
        DepthGridCell, DepthGridParams, FlowField, FlowVector, FlowVectorParams, GradientField,
        GradientParams, RiskCell, RiskDirection, RiskParams, RiskZones,
    };
    pub use crate::output::{
        write_json, DepthGridDocument, FlowVectorDocument, JsonStyle, RiskZoneDocument,
    };
    pub use crate::pipeline::RipAnalysis;
    pub use riptide_core::prelude::*;
}
