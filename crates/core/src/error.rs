//! Error types for riptide

use thiserror::Error;

/// Main error type for riptide operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF error: {0}")]
    Tiff(String),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Raster is empty ({rows} rows x {cols} cols)")]
    EmptyRaster { rows: usize, cols: usize },

    #[error("Expected a single-band raster, found {found} samples per pixel")]
    BandCount { found: u16 },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),

    #[error("Raster has no coordinate reference system")]
    MissingCrs,

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("{0}")]
    Other(String),
}

impl From<tiff::TiffError> for Error {
    fn from(e: tiff::TiffError) -> Self {
        Error::Tiff(e.to_string())
    }
}

impl Error {
    /// Shorthand for rejecting a numeric parameter
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error was raised while loading input, before any numeric step
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::Tiff(_)
                | Error::InvalidDimensions { .. }
                | Error::EmptyRaster { .. }
                | Error::BandCount { .. }
                | Error::UnsupportedDataType(_)
                | Error::UnsupportedCrs(_)
                | Error::MissingCrs
        )
    }
}

/// Result type alias for riptide operations
pub type Result<T> = std::result::Result<T, Error>;
