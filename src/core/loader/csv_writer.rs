//! CSV writer for immunization graphs
//!
//! Emits the same format the parser reads: the vertex count, then one
//! `v,flag,u1,...,uk,-1` row per vertex with a status, in vertex order.

use super::csv_parser::SENTINEL;
use crate::core::error::GraphError;
use crate::core::models::ImmunizationGraph;
use csv::WriterBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Serialize a graph to CSV text
///
/// Rows of a repeated subject are merged. Vertices without a status and
/// without edges are omitted.
///
/// # Errors
/// Returns `MissingStatus` if a vertex has outgoing edges but no status.
pub fn to_csv_string(graph: &ImmunizationGraph) -> Result<String, GraphError> {
    let rows = collect_rows(graph)?;
    let bytes = encode(graph.vertex_count(), &rows).map_err(|source| GraphError::FileAccess {
        path: PathBuf::from("<memory>"),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write a graph to a CSV file
///
/// # Errors
/// Returns `MissingStatus` as [`to_csv_string`] does, and `FileAccess` if the
/// file cannot be written.
pub fn write_graph_csv<P: AsRef<Path>>(graph: &ImmunizationGraph, path: P) -> Result<(), GraphError> {
    let path = path.as_ref();
    let content = to_csv_string(graph)?;
    fs::write(path, content).map_err(|source| GraphError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

/// Build one record per vertex that has a status
fn collect_rows(graph: &ImmunizationGraph) -> Result<Vec<Vec<String>>, GraphError> {
    let mut adjacency = vec![Vec::new(); graph.vertex_count()];
    for (from, to) in graph.edges() {
        adjacency[from].push(to);
    }

    let mut rows = Vec::new();
    for (vertex, status) in graph.statuses() {
        let targets = &adjacency[vertex];
        let Some(status) = status else {
            if targets.is_empty() {
                continue;
            }
            return Err(GraphError::MissingStatus { vertex });
        };

        let mut record = Vec::with_capacity(targets.len() + 3);
        record.push(vertex.to_string());
        record.push(status.flag().to_string());
        record.extend(targets.iter().map(ToString::to_string));
        record.push(SENTINEL.to_string());
        rows.push(record);
    }
    Ok(rows)
}

fn encode(count: usize, rows: &[Vec<String>]) -> io::Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record([count.to_string()])?;
    for record in rows {
        writer.write_record(record)?;
    }
    writer.into_inner().map_err(csv::IntoInnerError::into_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::{read_graph, LoaderOptions};
    use crate::core::models::Status;

    #[test]
    fn test_writes_original_format() {
        let mut graph = ImmunizationGraph::with_vertices(3);
        graph.set_status(0, Status::Immunized);
        graph.set_status(1, Status::Vulnerable);
        graph.set_status(2, Status::Immunized);
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);
        graph.add_edge(2, 0);

        let csv = to_csv_string(&graph).unwrap();
        assert_eq!(csv, "3\n0,1,1,2,-1\n1,0,-1\n2,1,0,-1\n");
    }

    #[test]
    fn test_unassigned_isolated_vertices_are_skipped() {
        let mut graph = ImmunizationGraph::with_vertices(3);
        graph.set_status(1, Status::Vulnerable);

        let csv = to_csv_string(&graph).unwrap();
        assert_eq!(csv, "3\n1,0,-1\n");
    }

    #[test]
    fn test_edges_without_status_are_rejected() {
        let mut graph = ImmunizationGraph::with_vertices(2);
        graph.add_edge(1, 0);

        let err = to_csv_string(&graph).unwrap_err();
        assert!(matches!(err, GraphError::MissingStatus { vertex: 1 }));
    }

    #[test]
    fn test_output_parses_back() {
        let original = "4\n0,1,1,1,3,-1\n2,0,2,-1\n0,1,0,-1\n";
        let graph = read_graph(original.as_bytes(), &LoaderOptions::default()).unwrap();
        let written = to_csv_string(&graph).unwrap();
        let reread = read_graph(written.as_bytes(), &LoaderOptions::default()).unwrap();

        assert_eq!(reread.vertex_count(), 4);
        assert_eq!(reread.neighbors(0), vec![1, 1, 3, 0]);
        assert_eq!(reread.neighbors(2), vec![2]);
        assert_eq!(reread.status(0), Some(Status::Immunized));
        assert_eq!(reread.status(2), Some(Status::Vulnerable));
        assert_eq!(reread.status(1), None);
    }
}
