//! Render command handler
//!
//! Loads a graph CSV and writes the coloured drawing to the output path.

use immunograph::config::Config;
use immunograph::core::{
    error::{GraphError, Stage},
    loader::load_graph_csv_with,
    models::{ImmunizationGraph, Status},
    render::{render_graph, OutputFormat, RenderOptions},
};
use immunograph::verbose;
use log::{error, info, warn};
use std::path::Path;
use std::process::ExitCode;

/// Run the render command.
///
/// # Arguments
/// * `input` - Graph CSV to load
/// * `output` - Image file to write
/// * `config` - Configuration with CLI overrides already applied
pub fn run(input: &Path, output: &Path, config: &Config) -> ExitCode {
    match load_and_render(input, output, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = match err.stage() {
                Stage::Load => format!("Failed to load {}: {err}", input.display()),
                Stage::Render => format!("Failed to render {}: {err}", output.display()),
            };
            error!("{message}");
            eprintln!("✗ {message}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn load_and_render(input: &Path, output: &Path, config: &Config) -> Result<(), GraphError> {
    // Reject unknown extensions before reading the input
    let format = OutputFormat::from_path(output)?;

    let graph = load_graph_csv_with(input, &config.loader_options())?;
    info!("Graph loaded: {}", input.display());
    summarize(&graph);

    let options = RenderOptions::from_config(config);
    if format.is_external() {
        info!("Rendering {format} with '{}'", options.graphviz);
    }
    render_graph(&graph, output, &options)?;

    println!("✓ Rendered {} ({format})", output.display());
    Ok(())
}

fn summarize(graph: &ImmunizationGraph) {
    let unassigned = graph.unassigned_count();
    verbose!(
        "  {} vertices, {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );
    verbose!(
        "  {} immunized, {} vulnerable, {unassigned} without status",
        graph.count_with_status(Status::Immunized),
        graph.count_with_status(Status::Vulnerable)
    );
    if unassigned > 0 {
        warn!("{unassigned} vertices have no row and are drawn as unassigned");
    }
}
