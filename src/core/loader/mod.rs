//! Reading and writing the CSV adjacency-list format

pub mod csv_parser;
pub mod csv_writer;

pub use csv_parser::{load_graph_csv, load_graph_csv_with, read_graph, LoaderOptions, SENTINEL};
pub use csv_writer::{to_csv_string, write_graph_csv};
