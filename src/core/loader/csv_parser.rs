//! CSV parser for immunization graphs
//!
//! The first row holds the vertex count `n`. Every further row is
//! `v, flag, u1, ..., uk, -1`: subject vertex, immunization flag (nonzero is
//! immunized) and neighbours terminated by the `-1` sentinel.

use crate::core::error::{GraphError, ParseErrorKind};
use crate::core::models::{ImmunizationGraph, Status};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Terminates every neighbour list
pub const SENTINEL: i64 = -1;

/// Default cap on the number of fields in one row
pub const DEFAULT_MAX_ROW_FIELDS: usize = 1 << 20;

/// Default cap on the vertex count declared by the header
pub const DEFAULT_MAX_VERTICES: usize = 1 << 24;

/// Settings for the CSV loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Rows with more fields than this fail with `RowTooWide`
    ///
    /// This bounds the number of fields, not bytes: the CSV reader buffers a
    /// whole record before the check runs.
    pub max_row_fields: usize,
    /// Headers declaring more vertices than this fail with `CountTooLarge`
    ///
    /// Never exceeds [`ImmunizationGraph::max_vertices`], whatever is set here.
    pub max_vertices: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_row_fields: DEFAULT_MAX_ROW_FIELDS,
            max_vertices: DEFAULT_MAX_VERTICES,
        }
    }
}

impl LoaderOptions {
    /// Vertex count limit after clamping to what the graph can address
    #[must_use]
    pub fn vertex_limit(&self) -> usize {
        self.max_vertices.min(ImmunizationGraph::max_vertices())
    }
}

/// Load a graph CSV file with default options
///
/// # Errors
/// Returns `FileAccess` if the file cannot be opened or read, `Parse` for a
/// malformed row and `Range` for a vertex index outside the declared count.
pub fn load_graph_csv<P: AsRef<Path>>(path: P) -> Result<ImmunizationGraph, GraphError> {
    load_graph_csv_with(path, &LoaderOptions::default())
}

/// Load a graph CSV file
///
/// The file handle is dropped before returning on every path.
///
/// # Errors
/// See [`load_graph_csv`].
pub fn load_graph_csv_with<P: AsRef<Path>>(
    path: P,
    options: &LoaderOptions,
) -> Result<ImmunizationGraph, GraphError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| GraphError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Reading graph from {}", path.display());
    read_records(file, path, options)
}

/// Parse a graph from any reader, e.g. an in-memory buffer
///
/// # Errors
/// See [`load_graph_csv`]; I/O failures report the path `<stream>`.
pub fn read_graph<R: Read>(
    reader: R,
    options: &LoaderOptions,
) -> Result<ImmunizationGraph, GraphError> {
    read_records(reader, Path::new("<stream>"), options)
}

fn read_records<R: Read>(
    reader: R,
    path: &Path,
    options: &LoaderOptions,
) -> Result<ImmunizationGraph, GraphError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut graph: Option<ImmunizationGraph> = None;

    for (index, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|err| csv_error(err, path, index + 1))?;
        if is_blank(&record) {
            continue;
        }
        let row = line_of(&record, index + 1);

        match graph.as_mut() {
            None => {
                let count = parse_header(&record, row, options)?;
                debug!("Header declares {count} vertices");
                graph = Some(ImmunizationGraph::with_vertices(count));
            }
            Some(graph) => parse_row(&record, row, graph, options)?,
        }
    }

    let graph = graph.ok_or(GraphError::Parse {
        row: 1,
        field: 1,
        kind: ParseErrorKind::MissingHeader,
    })?;
    debug!(
        "Loaded {} vertices and {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Parse the vertex count from the header row. Extra header fields are ignored.
fn parse_header(
    record: &StringRecord,
    row: usize,
    options: &LoaderOptions,
) -> Result<usize, GraphError> {
    let value = integer_field(record, row, 0)?;
    let count = usize::try_from(value).map_err(|_| GraphError::Parse {
        row,
        field: 1,
        kind: ParseErrorKind::NegativeCount(value),
    })?;

    let limit = options.vertex_limit();
    if count > limit {
        return Err(GraphError::Parse {
            row,
            field: 1,
            kind: ParseErrorKind::CountTooLarge { count, limit },
        });
    }
    Ok(count)
}

/// Apply one adjacency row to the graph
fn parse_row(
    record: &StringRecord,
    row: usize,
    graph: &mut ImmunizationGraph,
    options: &LoaderOptions,
) -> Result<(), GraphError> {
    if record.len() > options.max_row_fields {
        return Err(GraphError::Parse {
            row,
            field: options.max_row_fields + 1,
            kind: ParseErrorKind::RowTooWide {
                limit: options.max_row_fields,
            },
        });
    }

    let count = graph.vertex_count();
    let subject = vertex_field(record, row, 0, count)?;
    let flag = integer_field(record, row, 1)?;

    if let Some(previous) = graph.set_status(subject, Status::from_flag(flag)) {
        warn!(
            "Row {row}: vertex {subject} listed again; status {previous} replaced, edges accumulate"
        );
    }

    for idx in 2..record.len() {
        let value = integer_field(record, row, idx)?;
        if value == SENTINEL {
            return Ok(());
        }
        let target = check_range(value, row, idx, count)?;
        graph.add_edge(subject, target);
    }

    Err(GraphError::Parse {
        row,
        field: record.len() + 1,
        kind: ParseErrorKind::MissingSentinel,
    })
}

/// Parse field `idx` (0-based) as an integer
fn integer_field(record: &StringRecord, row: usize, idx: usize) -> Result<i64, GraphError> {
    let raw = record.get(idx).ok_or(GraphError::Parse {
        row,
        field: idx + 1,
        kind: ParseErrorKind::MissingField,
    })?;
    raw.parse::<i64>().map_err(|_| GraphError::Parse {
        row,
        field: idx + 1,
        kind: ParseErrorKind::InvalidInteger(raw.to_string()),
    })
}

/// Parse field `idx` as a vertex index in `0..count`
fn vertex_field(
    record: &StringRecord,
    row: usize,
    idx: usize,
    count: usize,
) -> Result<usize, GraphError> {
    let value = integer_field(record, row, idx)?;
    check_range(value, row, idx, count)
}

fn check_range(value: i64, row: usize, idx: usize, count: usize) -> Result<usize, GraphError> {
    usize::try_from(value)
        .ok()
        .filter(|&vertex| vertex < count)
        .ok_or(GraphError::Range {
            row,
            field: idx + 1,
            vertex: value,
            count,
        })
}

/// A whitespace-only line. Rows of empty fields such as `,,,` are data.
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

/// Physical line of a record, falling back to its ordinal
fn line_of(record: &StringRecord, ordinal: usize) -> usize {
    record
        .position()
        .and_then(|pos| usize::try_from(pos.line()).ok())
        .unwrap_or(ordinal)
}

fn csv_error(err: csv::Error, path: &Path, ordinal: usize) -> GraphError {
    let row = err
        .position()
        .and_then(|pos| usize::try_from(pos.line()).ok())
        .unwrap_or(ordinal);
    match err.into_kind() {
        csv::ErrorKind::Io(source) => GraphError::FileAccess {
            path: path.to_path_buf(),
            source,
        },
        csv::ErrorKind::Utf8 { err, .. } => GraphError::Parse {
            row,
            field: err.field() + 1,
            kind: ParseErrorKind::InvalidUtf8,
        },
        other => GraphError::Parse {
            row,
            field: 1,
            kind: ParseErrorKind::Malformed(format!("{other:?}")),
        },
    }
}
