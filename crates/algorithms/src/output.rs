//! JSON documents written for the web map

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use riptide_core::{Error, GeoBounds, Result};
use serde::{Deserialize, Serialize};

use crate::flow::{DepthGrid, DepthGridCell, FlowVector, RiskZones};

/// Default file name of the flow vector document
pub const FLOW_VECTORS_FILE: &str = "flow_vectors.json";
/// Default file name of the depth grid document
pub const DEPTH_GRID_FILE: &str = "depth_grid.json";
/// Default file name of the risk zone document
pub const RISK_ZONES_FILE: &str = "rip_risk_zones.json";

/// `flow_vectors.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowVectorDocument {
    pub bounds: GeoBounds,
    pub flow_vectors: Vec<FlowVector>,
    pub metadata: FlowVectorMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowVectorMetadata {
    pub grid_spacing: usize,
    pub total_vectors: usize,
}

impl FlowVectorDocument {
    pub fn new(bounds: GeoBounds, flow_vectors: Vec<FlowVector>, grid_spacing: usize) -> Self {
        let total_vectors = flow_vectors.len();
        Self {
            bounds,
            flow_vectors,
            metadata: FlowVectorMetadata {
                grid_spacing,
                total_vectors,
            },
        }
    }
}

/// `depth_grid.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthGridDocument {
    pub bounds: GeoBounds,
    pub grid_size: GridSize,
    pub grid: Vec<Vec<DepthGridCell>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl DepthGridDocument {
    pub fn new(bounds: GeoBounds, grid: DepthGrid) -> Self {
        Self {
            bounds,
            grid_size: GridSize {
                rows: grid.rows,
                cols: grid.cols,
            },
            grid: grid.cells,
        }
    }
}

/// `rip_risk_zones.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskZoneDocument {
    pub bounds: GeoBounds,
    pub risk_zones: RiskZones,
    pub metadata: RiskZoneMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskZoneMetadata {
    pub description: String,
    pub risk_scale: String,
    pub grid_resolution: usize,
}

impl RiskZoneDocument {
    pub const DESCRIPTION: &'static str = "Rip current risk heat map for different flow directions";
    pub const RISK_SCALE: &'static str = "0 = safe, 1 = extreme danger";

    pub fn new(bounds: GeoBounds, risk_zones: RiskZones, grid_resolution: usize) -> Self {
        Self {
            bounds,
            risk_zones,
            metadata: RiskZoneMetadata {
                description: Self::DESCRIPTION.to_string(),
                risk_scale: Self::RISK_SCALE.to_string(),
                grid_resolution,
            },
        }
    }
}

/// JSON layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// Two-space indented
    #[default]
    Pretty,
    /// Single line
    Compact,
}

/// Serialize `document` to `path`, creating parent directories and
/// replacing any existing file.
pub fn write_json<T, P>(path: P, document: &T, style: JsonStyle) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    let written = match style {
        JsonStyle::Pretty => serde_json::to_writer_pretty(&mut writer, document),
        JsonStyle::Compact => serde_json::to_writer(&mut writer, document),
    };
    written.map_err(|e| Error::Json(format!("{}: {}", path.display(), e)))?;
    writer.flush()?;
    Ok(())
}
