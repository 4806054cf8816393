//! Graphviz DOT generator

use crate::core::error::RenderError;
use crate::core::render::{GraphRenderer, RenderContext};
use petgraph::dot::{Config, Dot};

/// Writes the graph as DOT source with filled, status-coloured vertices
pub struct DotRenderer;

impl DotRenderer {
    /// Create a new DOT renderer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generate DOT source for the graph
    #[must_use]
    pub fn generate(ctx: &RenderContext) -> String {
        let palette = &ctx.options.palette;
        format!(
            "{:?}",
            Dot::with_attr_getters(
                ctx.graph.as_petgraph(),
                &[Config::EdgeNoLabel, Config::NodeNoLabel],
                &|_, _| String::new(),
                &|_, (index, status)| {
                    format!(
                        "label=\"{}\" style=filled fillcolor=\"{}\"",
                        index.index(),
                        escape_attr(palette.color_for(*status))
                    )
                },
            )
        )
    }
}

/// Escape a value for use inside a double-quoted DOT attribute
fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Default for DotRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRenderer for DotRenderer {
    fn render(&self, ctx: &RenderContext) -> Result<Vec<u8>, RenderError> {
        Ok(Self::generate(ctx).into_bytes())
    }
}
