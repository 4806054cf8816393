//! HTML page generator
//!
//! Wraps the SVG drawing in a self-contained page with a colour legend.

use super::svg::SvgRenderer;
use crate::core::error::RenderError;
use crate::core::get_version;
use crate::core::models::Status;
use crate::core::render::{GraphRenderer, RenderContext};
use askama::Template;

struct LegendEntry<'a> {
    label: &'static str,
    color: &'a str,
    count: usize,
}

#[derive(Template)]
#[template(path = "graph.html")]
struct HtmlTemplate<'a> {
    title: &'a str,
    version: &'static str,
    vertex_count: usize,
    edge_count: usize,
    legend: Vec<LegendEntry<'a>>,
    svg: String,
}

/// Draws the graph into a standalone HTML page
pub struct HtmlRenderer {
    title: String,
}

impl HtmlRenderer {
    /// Create a new HTML renderer with the default title
    #[must_use]
    pub fn new() -> Self {
        Self::with_title("Immunization graph")
    }

    /// Create an HTML renderer with a custom page title
    #[must_use]
    pub fn with_title(title: &str) -> Self {
        Self {
            title: title.to_owned(),
        }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRenderer for HtmlRenderer {
    fn render(&self, ctx: &RenderContext) -> Result<Vec<u8>, RenderError> {
        let palette = &ctx.options.palette;
        let graph = ctx.graph;

        let mut legend = vec![
            LegendEntry {
                label: Status::Immunized.as_str(),
                color: &palette.immunized,
                count: graph.count_with_status(Status::Immunized),
            },
            LegendEntry {
                label: Status::Vulnerable.as_str(),
                color: &palette.vulnerable,
                count: graph.count_with_status(Status::Vulnerable),
            },
        ];
        let unassigned = graph.unassigned_count();
        if unassigned > 0 {
            legend.push(LegendEntry {
                label: "unassigned",
                color: &palette.unassigned,
                count: unassigned,
            });
        }

        let page = HtmlTemplate {
            title: &self.title,
            version: get_version(),
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
            legend,
            svg: SvgRenderer::draw(ctx)?,
        };
        Ok(page.render()?.into_bytes())
    }
}
