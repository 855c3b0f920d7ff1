use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a rendering surface or its print formatter.
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Content has not finished loading")]
    NotLoaded,

    #[error("Height probe evaluation failed: {0}")]
    Evaluation(String),

    #[error("PDF export failed: {0}")]
    Export(String),

    #[error("Print formatter failed: {0}")]
    Formatter(String),

    #[error("Operation not supported by this surface: {0}")]
    Unsupported(&'static str),
}

#[derive(Error, Debug)]
pub enum PaginationError {
    #[error("Content measurement failed: {0}")]
    Measurement(String),

    #[error("Rendering page {page} failed: {source}")]
    Render {
        page: usize,
        #[source]
        source: SurfaceError,
    },

    #[error("PDF assembly failed: {0}")]
    Assembly(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Render cancelled after {completed} of {total} pages")]
    Cancelled { completed: usize, total: usize },

    #[error("Invalid page geometry: {0}")]
    Geometry(String),
}

impl PaginationError {
    /// Wrap a surface failure for the page at `page`.
    pub fn render(page: usize, source: SurfaceError) -> Self {
        PaginationError::Render { page, source }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid margin {margin}pt: must be non-negative and below half of {limit}pt")]
    InvalidMargin { margin: f32, limit: f32 },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid empty-page slack: {0}")]
    InvalidSlack(i64),

    #[error("Unrecognized region or locale: {0}")]
    InvalidRegion(String),
}

impl From<ConfigError> for PaginationError {
    fn from(err: ConfigError) -> Self {
        PaginationError::Geometry(err.to_string())
    }
}
