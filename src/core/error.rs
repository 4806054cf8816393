//! Error types for loading and rendering graphs
//!
//! Row and field numbers are 1-based. Rows count physical lines of the input,
//! so the header is row 1.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Stage of a run in which an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading and parsing the input CSV
    Load,
    /// Laying out, encoding and writing the output image
    Render,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Render => write!(f, "render"),
        }
    }
}

/// Reason a CSV field or row could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The file has no header row
    #[error("missing header row with the vertex count")]
    MissingHeader,
    /// A field is not an integer
    #[error("invalid integer {0:?}")]
    InvalidInteger(String),
    /// The header declares a negative vertex count
    #[error("vertex count must be non-negative, got {0}")]
    NegativeCount(i64),
    /// The header declares more vertices than the loader accepts
    #[error("vertex count {count} exceeds the limit of {limit}")]
    CountTooLarge {
        /// Declared vertex count
        count: usize,
        /// Largest accepted vertex count
        limit: usize,
    },
    /// The row ends before its vertex or flag field
    #[error("missing field")]
    MissingField,
    /// The neighbour list is not terminated by `-1`
    #[error("neighbour list is not terminated by -1")]
    MissingSentinel,
    /// The row has more fields than the configured cap
    #[error("row exceeds the limit of {limit} fields")]
    RowTooWide {
        /// Configured maximum number of fields per row
        limit: usize,
    },
    /// A field is not valid UTF-8
    #[error("invalid UTF-8")]
    InvalidUtf8,
    /// Any other CSV framing problem
    #[error("malformed CSV: {0}")]
    Malformed(String),
}

/// Errors raised by the renderers
#[derive(Debug, Error)]
pub enum RenderError {
    /// The output extension does not map to any renderer
    #[error("unsupported output format {extension:?} (supported: {supported})")]
    UnsupportedFormat {
        /// Extension of the requested output path (empty when missing)
        extension: String,
        /// Comma-separated list of supported extensions
        supported: String,
    },
    /// The external renderer executable could not be found
    #[error("external renderer `{command}` not found; install Graphviz or set render.graphviz")]
    RendererNotFound {
        /// Command that was attempted
        command: String,
    },
    /// The external renderer could not be started or talked to
    #[error("external renderer `{command}` could not be run: {source}")]
    RendererIo {
        /// Command that was attempted
        command: String,
        /// Underlying I/O error
        source: io::Error,
    },
    /// The external renderer exited unsuccessfully or produced nothing
    #[error("external renderer `{command}` failed ({status}): {stderr}")]
    RendererFailed {
        /// Command that was run
        command: String,
        /// Exit status description
        status: String,
        /// Captured diagnostic output
        stderr: String,
    },
    /// A drawing template failed to render
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
    /// The output file could not be written
    #[error("cannot write {}: {source}", path.display())]
    Output {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// Errors raised while loading, writing or rendering a graph
#[derive(Debug, Error)]
pub enum GraphError {
    /// Input file missing or unreadable, or a CSV export target unwritable
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        /// Path that could not be accessed
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// A malformed row
    #[error("row {row}, field {field}: {kind}")]
    Parse {
        /// 1-based line number
        row: usize,
        /// 1-based field position
        field: usize,
        /// What went wrong
        kind: ParseErrorKind,
    },
    /// A vertex index outside `0..count`
    #[error("row {row}, field {field}: vertex {vertex} is out of range (graph declares {count} vertices)")]
    Range {
        /// 1-based line number
        row: usize,
        /// 1-based field position
        field: usize,
        /// Offending index as written in the file
        vertex: i64,
        /// Declared vertex count
        count: usize,
    },
    /// A vertex with outgoing edges but no status cannot be written as a CSV row
    #[error("vertex {vertex} has outgoing edges but no status")]
    MissingStatus {
        /// Offending vertex
        vertex: usize,
    },
    /// The renderer failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl GraphError {
    /// Stage of the run this error belongs to
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Render(_) => Stage::Render,
            _ => Stage::Load,
        }
    }

    /// Process exit code for this error: 3 file access, 4 bad content, 5 render failure
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::FileAccess { .. } | Self::Render(RenderError::Output { .. }) => 3,
            Self::Parse { .. } | Self::Range { .. } | Self::MissingStatus { .. } => 4,
            Self::Render(_) => 5,
        }
    }
}
