//! One-raster rip current analysis

use std::cell::OnceCell;
use std::time::Instant;

use riptide_core::{Error, GeoBounds, GridSampler, Raster, Result};
use tracing::{debug, info};

use crate::flow::{
    export_depth_grid, extract_flow_vectors, score_rip_risk, DepthGridParams, FlowField,
    FlowVectorParams, GradientParams, RiskParams,
};
use crate::output::{DepthGridDocument, FlowVectorDocument, RiskZoneDocument};

/// Runs the analysis stages over a single bathymetry raster.
///
/// The full-resolution [`FlowField`] is computed on first use and shared by
/// the flow vector and risk stages. Geographic bounds are computed once and
/// reused by every document.
pub struct RipAnalysis<'a> {
    depth: &'a Raster<f64>,
    sampler: GridSampler,
    gradient: GradientParams,
    field: OnceCell<FlowField>,
    bounds: GeoBounds,
}

impl<'a> RipAnalysis<'a> {
    /// Analyse `depth` with an explicit sampler
    pub fn new(depth: &'a Raster<f64>, sampler: GridSampler) -> Result<Self> {
        if depth.is_empty() {
            return Err(Error::EmptyRaster {
                rows: depth.rows(),
                cols: depth.cols(),
            });
        }
        let bounds = sampler.geo_bounds(depth.rows(), depth.cols());
        debug!(?bounds, rows = depth.rows(), cols = depth.cols(), "analysis bounds");

        Ok(Self {
            depth,
            sampler,
            gradient: GradientParams::default(),
            field: OnceCell::new(),
            bounds,
        })
    }

    /// Analyse `depth` using its own transform and CRS
    pub fn from_raster(depth: &'a Raster<f64>) -> Result<Self> {
        let sampler = GridSampler::for_raster(depth)?;
        Self::new(depth, sampler)
    }

    /// Override the smoothing parameters.
    ///
    /// Discards any flow field already computed.
    pub fn with_gradient_params(mut self, params: GradientParams) -> Result<Self> {
        params.validate()?;
        self.gradient = params;
        self.field = OnceCell::new();
        Ok(self)
    }

    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    pub fn sampler(&self) -> &GridSampler {
        &self.sampler
    }

    /// Full-resolution flow field
    pub fn flow_field(&self) -> &FlowField {
        self.field.get_or_init(|| {
            let start = Instant::now();
            let field = FlowField::from_depth(self.depth.data(), self.gradient.sigma);
            debug!(
                stage = "gradient_field",
                sigma = self.gradient.sigma,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "flow field computed"
            );
            field
        })
    }

    /// Build `flow_vectors.json`
    pub fn flow_vectors(&self, params: &FlowVectorParams) -> Result<FlowVectorDocument> {
        let vectors = extract_flow_vectors(self.flow_field(), &self.sampler, params)?;
        info!(
            stage = "flow_vectors",
            grid_spacing = params.grid_spacing,
            vectors = vectors.len(),
            "flow vectors extracted"
        );
        Ok(FlowVectorDocument::new(
            self.bounds,
            vectors,
            params.grid_spacing,
        ))
    }

    /// Build `rip_risk_zones.json`
    pub fn risk_zones(&self, params: &RiskParams) -> Result<RiskZoneDocument> {
        let zones = score_rip_risk(self.depth.data(), self.flow_field(), &self.sampler, params)?;
        info!(
            stage = "risk_zones",
            grid_resolution = params.grid_spacing,
            east = zones.east.len(),
            west = zones.west.len(),
            offshore = zones.offshore.len(),
            "risk zones scored"
        );
        Ok(RiskZoneDocument::new(self.bounds, zones, params.grid_spacing))
    }

    /// Build `depth_grid.json`
    pub fn depth_grid(&self, params: &DepthGridParams) -> Result<DepthGridDocument> {
        let grid = export_depth_grid(self.depth.data(), &self.sampler, params)?;
        info!(
            stage = "depth_grid",
            downsample = params.downsample,
            rows = grid.rows,
            cols = grid.cols,
            "depth grid exported"
        );
        Ok(DepthGridDocument::new(self.bounds, grid))
    }
}
