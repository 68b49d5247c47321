//! End-to-end runs over synthetic beach bathymetry written as GeoTIFF.
//!
//! The surface deepens offshore (toward row 0, north) with a narrow channel
//! cut through the surf zone, the classic rip current geometry. The bottom
//! rows are dry land encoded as no-data.

use ndarray::Array2;
use riptide_algorithms::flow::{DepthGridParams, FlowVectorParams, RiskDirection, RiskParams};
use riptide_algorithms::output::{
    write_json, JsonStyle, DEPTH_GRID_FILE, FLOW_VECTORS_FILE, RISK_ZONES_FILE,
};
use riptide_algorithms::RipAnalysis;
use riptide_core::io::{read_geotiff, write_geotiff};
use riptide_core::{Error, GeoTransform, Raster, CRS};
use serde_json::Value;

const ROWS: usize = 60;
const COLS: usize = 80;
const LAND_ROWS: usize = 6;

fn beach() -> Raster<f64> {
    let data = Array2::from_shape_fn((ROWS, COLS), |(r, c)| {
        if r >= ROWS - LAND_ROWS {
            return f64::NAN;
        }
        let offshore = (ROWS - r) as f64 * 0.08;
        let channel_offset = (c as f64 - 40.0) / 4.0;
        let channel = 0.8 * (-channel_offset * channel_offset).exp();
        offshore + channel
    });
    Raster::from_array(data)
        .with_transform(GeoTransform::new(583_000.0, 4_507_000.0, 5.0, -5.0))
        .with_crs(CRS::from_epsg(32618))
}

/// Write the fixture and read it back, as the CLI would see it.
fn beach_from_disk(dir: &tempfile::TempDir) -> Raster<f64> {
    let path = dir.path().join("beach.tif");
    write_geotiff(&beach(), &path).expect("write failed");
    read_geotiff(&path).expect("read failed")
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Georeferencing
// ---------------------------------------------------------------------------

#[test]
fn geotiff_keeps_georeferencing_and_nodata() {
    let dir = tempfile::tempdir().unwrap();
    let raster = beach_from_disk(&dir);

    assert_eq!(raster.shape(), (ROWS, COLS));
    assert_eq!(raster.crs().and_then(|c| c.epsg()), Some(32618));
    assert!(raster.get(ROWS - 1, 0).unwrap().is_nan());
    assert!(!raster.get(0, 0).unwrap().is_nan());
}

#[test]
fn bounds_cover_sampled_positions() {
    let dir = tempfile::tempdir().unwrap();
    let raster = beach_from_disk(&dir);
    let analysis = RipAnalysis::from_raster(&raster).unwrap();
    let bounds = analysis.bounds();

    // New York area, UTM 18N
    assert!(bounds.south > 40.0 && bounds.north < 41.0);
    assert!(bounds.west > -74.5 && bounds.east < -73.5);

    // downsample 1 visits every pixel corner. The envelope only converts two
    // corners, so grid convergence allows a few metres of slack.
    let grid = analysis
        .depth_grid(&DepthGridParams { downsample: 1 })
        .unwrap();
    let tol = 1e-4;
    for cell in grid.grid.iter().flatten() {
        assert!(cell.lat >= bounds.south - tol && cell.lat <= bounds.north + tol);
        assert!(cell.lon >= bounds.west - tol && cell.lon <= bounds.east + tol);
    }
    // row 0, col 0 is the north-west corner
    let origin = grid.grid[0][0];
    assert!((origin.lat - bounds.north).abs() < 1e-4);
    assert!((origin.lon - bounds.west).abs() < 1e-4);
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[test]
fn flow_vectors_point_offshore_and_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let raster = beach_from_disk(&dir);
    let analysis = RipAnalysis::from_raster(&raster).unwrap();
    let doc = analysis
        .flow_vectors(&FlowVectorParams {
            grid_spacing: 5,
            ..Default::default()
        })
        .unwrap();

    let vectors = &doc.flow_vectors;
    assert!(!vectors.is_empty());
    assert_eq!(doc.metadata.total_vectors, vectors.len());
    let max = vectors.iter().map(|v| v.magnitude).fold(0.0, f64::max);
    assert_eq!(max, 1.0);
    assert!(vectors.iter().all(|v| (0.0..=1.0).contains(&v.magnitude)));
    // deeper water is north, so most arrows have dy < 0
    let offshore = vectors.iter().filter(|v| v.dy < 0.0).count();
    assert!(offshore * 2 > vectors.len());
}

#[test]
fn risk_zones_are_independently_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let raster = beach_from_disk(&dir);
    let analysis = RipAnalysis::from_raster(&raster).unwrap();
    let doc = analysis
        .risk_zones(&RiskParams {
            grid_spacing: 4,
            ..Default::default()
        })
        .unwrap();

    assert!(!doc.risk_zones.offshore.is_empty());
    for direction in RiskDirection::ALL {
        let cells = doc.risk_zones.get(direction);
        if cells.is_empty() {
            continue;
        }
        let max = cells.iter().map(|c| c.risk).fold(0.0, f64::max);
        assert_eq!(max, 1.0, "{direction} not normalized");
        assert!(cells.iter().all(|c| c.risk > 0.0 && c.risk <= 1.0));
    }

    // land rows never scored
    let land_lat = analysis.sampler().lat_lon(ROWS - 1, 0).0;
    let all_cells = RiskDirection::ALL
        .iter()
        .flat_map(|&d| doc.risk_zones.get(d).iter());
    for cell in all_cells {
        assert!(cell.lat > land_lat);
    }
}

#[test]
fn depth_grid_nulls_land() {
    let dir = tempfile::tempdir().unwrap();
    let raster = beach_from_disk(&dir);
    let analysis = RipAnalysis::from_raster(&raster).unwrap();
    let doc = analysis.depth_grid(&DepthGridParams::default()).unwrap();

    assert_eq!((doc.grid_size.rows, doc.grid_size.cols), (6, 8));
    // source row 50 is still water, the land starts at row 54
    assert!(doc.grid[5].iter().all(|c| c.depth.is_some()));

    let doc = analysis.depth_grid(&DepthGridParams { downsample: 3 }).unwrap();
    let last = doc.grid.last().unwrap();
    assert!(last.iter().all(|c| c.depth.is_none()));
    assert!(last.iter().all(|c| c.flow_x == 0.0 && c.flow_y == 0.0));
}

#[test]
fn written_documents_are_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let raster = beach_from_disk(&dir);

    let run = |name: &str| -> Vec<String> {
        let out = dir.path().join(name);
        let analysis = RipAnalysis::from_raster(&raster).unwrap();
        let flow = analysis.flow_vectors(&FlowVectorParams::default()).unwrap();
        let grid = analysis.depth_grid(&DepthGridParams::default()).unwrap();
        let risk = analysis.risk_zones(&RiskParams::default()).unwrap();
        write_json(out.join(FLOW_VECTORS_FILE), &flow, JsonStyle::Pretty).unwrap();
        write_json(out.join(DEPTH_GRID_FILE), &grid, JsonStyle::Compact).unwrap();
        write_json(out.join(RISK_ZONES_FILE), &risk, JsonStyle::Pretty).unwrap();
        [FLOW_VECTORS_FILE, DEPTH_GRID_FILE, RISK_ZONES_FILE]
            .iter()
            .map(|f| std::fs::read_to_string(out.join(f)).unwrap())
            .collect()
    };

    assert_eq!(run("first"), run("second"));

    let risk = read_json(&dir.path().join("first").join(RISK_ZONES_FILE));
    assert_eq!(
        risk["metadata"]["description"],
        "Rip current risk heat map for different flow directions"
    );
    assert_eq!(risk["metadata"]["grid_resolution"], 15);
    let grid = read_json(&dir.path().join("first").join(DEPTH_GRID_FILE));
    assert!(grid["grid"][5][0]["depth"].is_number());
}

// ---------------------------------------------------------------------------
// Degenerate inputs
// ---------------------------------------------------------------------------

#[test]
fn all_nodata_produces_empty_documents() {
    let raster = Raster::from_array(Array2::from_elem((20, 20), f64::NAN))
        .with_transform(GeoTransform::new(583_000.0, 4_507_000.0, 5.0, -5.0))
        .with_crs(CRS::from_epsg(32618));
    let analysis = RipAnalysis::from_raster(&raster).unwrap();

    let flow = analysis.flow_vectors(&FlowVectorParams::default()).unwrap();
    let risk = analysis.risk_zones(&RiskParams::default()).unwrap();
    assert!(flow.flow_vectors.is_empty());
    assert_eq!(flow.metadata.total_vectors, 0);
    assert_eq!(risk.risk_zones.total(), 0);
}

#[test]
fn unsupported_crs_is_an_input_error() {
    let raster = beach().with_crs(CRS::from_epsg(2193));
    match RipAnalysis::from_raster(&raster) {
        Err(e @ Error::UnsupportedCrs(_)) => assert!(e.is_input_error()),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("expected an error"),
    }
}

#[test]
fn truncated_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.tif");
    std::fs::write(&path, b"II*\0garbage").unwrap();
    let err = read_geotiff(&path).unwrap_err();
    assert!(err.is_input_error());
}
