//! SVG drawing generator
//!
//! Lays the graph out with the force-directed layout and fills the
//! `graph.svg` template with vertices and directed edges.

use crate::core::error::RenderError;
use crate::core::render::layout::compute_layout;
use crate::core::render::{GraphRenderer, RenderContext};
use askama::Template;
use glam::Vec2;
use std::collections::HashSet;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Bend applied to an edge whose reverse edge also exists, relative to its length
const REVERSE_EDGE_BEND: f32 = 0.15;

/// A drawn vertex
struct SvgVertex<'a> {
    id: usize,
    x: String,
    y: String,
    color: &'a str,
    status: &'static str,
}

#[derive(Template)]
#[template(path = "graph.svg", escape = "html")]
struct SvgTemplate<'a> {
    width: u32,
    height: u32,
    radius: String,
    font_size: String,
    edges: Vec<String>,
    vertices: Vec<SvgVertex<'a>>,
}

/// Draws the graph as a standalone SVG document
pub struct SvgRenderer;

impl SvgRenderer {
    /// Create a new SVG renderer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Draw the `<svg>` element without an XML declaration, for embedding
    ///
    /// # Errors
    /// Returns `Template` if the template fails to render.
    pub fn draw(ctx: &RenderContext) -> Result<String, RenderError> {
        let settings = &ctx.options.layout;
        let layout = compute_layout(ctx.graph, settings);
        let radius = settings.vertex_radius;
        let colors = ctx.vertex_colors();

        let vertices = ctx
            .graph
            .statuses()
            .map(|(id, status)| {
                let position = layout.positions[id];
                SvgVertex {
                    id,
                    x: coord(position.x),
                    y: coord(position.y),
                    color: colors[id],
                    status: status.map_or("unassigned", |s| s.as_str()),
                }
            })
            .collect();

        let edge_set: HashSet<(usize, usize)> = ctx.graph.edges().collect();
        let edges = ctx
            .graph
            .edges()
            .map(|(from, to)| {
                let bend = if from != to && edge_set.contains(&(to, from)) {
                    REVERSE_EDGE_BEND
                } else {
                    0.0
                };
                edge_path(layout.positions[from], layout.positions[to], from == to, radius, bend)
            })
            .collect();

        let template = SvgTemplate {
            width: settings.width,
            height: settings.height,
            radius: coord(radius),
            font_size: coord(radius),
            edges,
            vertices,
        };
        Ok(template.render()?)
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRenderer for SvgRenderer {
    fn render(&self, ctx: &RenderContext) -> Result<Vec<u8>, RenderError> {
        let mut output = String::from(XML_DECLARATION);
        output.push_str(&Self::draw(ctx)?);
        output.push('\n');
        Ok(output.into_bytes())
    }
}

fn coord(value: f32) -> String {
    format!("{value:.1}")
}

/// SVG path data for an edge, clipped to the vertex circles
///
/// Self-loops are drawn as a loop above the vertex. `bend` offsets the
/// midpoint sideways so that a pair of opposite edges stays distinguishable.
fn edge_path(from: Vec2, to: Vec2, self_loop: bool, radius: f32, bend: f32) -> String {
    if self_loop {
        let start = from + Vec2::new(-0.6, -0.8) * radius;
        let end = from + Vec2::new(0.6, -0.8) * radius;
        let c1 = start + Vec2::new(-1.5, -3.0) * radius;
        let c2 = end + Vec2::new(1.5, -3.0) * radius;
        return format!(
            "M {} {} C {} {} {} {} {} {}",
            coord(start.x),
            coord(start.y),
            coord(c1.x),
            coord(c1.y),
            coord(c2.x),
            coord(c2.y),
            coord(end.x),
            coord(end.y)
        );
    }

    let delta = to - from;
    let normal = delta.perp().normalize_or_zero();
    let control = from + delta / 2.0 + normal * delta.length() * bend;

    let start = from + (control - from).normalize_or_zero() * radius;
    let end = to - (to - control).normalize_or_zero() * radius;

    if bend == 0.0 {
        format!(
            "M {} {} L {} {}",
            coord(start.x),
            coord(start.y),
            coord(end.x),
            coord(end.y)
        )
    } else {
        format!(
            "M {} {} Q {} {} {} {}",
            coord(start.x),
            coord(start.y),
            coord(control.x),
            coord(control.y),
            coord(end.x),
            coord(end.y)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ImmunizationGraph, Status};
    use crate::core::render::RenderOptions;

    fn reference_graph() -> ImmunizationGraph {
        let mut graph = ImmunizationGraph::with_vertices(3);
        graph.set_status(0, Status::Immunized);
        graph.set_status(1, Status::Vulnerable);
        graph.set_status(2, Status::Immunized);
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);
        graph.add_edge(2, 0);
        graph
    }

    #[test]
    fn test_svg_generation() {
        let graph = reference_graph();
        let options = RenderOptions::default();
        let ctx = RenderContext::new(&graph, &options);

        let bytes = SvgRenderer::new().render(&ctx).unwrap();
        let svg = String::from_utf8(bytes).unwrap();

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches("fill=\"blue\"").count(), 2);
        assert_eq!(svg.matches("fill=\"red\"").count(), 1);
        assert_eq!(svg.matches("marker-end=\"url(#arrow)\"").count(), 3);
        assert!(svg.contains("vertex 1 (vulnerable)"));
    }

    #[test]
    fn test_opposite_edges_are_curved() {
        let graph = reference_graph();
        let options = RenderOptions::default();
        let svg = SvgRenderer::draw(&RenderContext::new(&graph, &options)).unwrap();

        // 0 -> 2 and 2 -> 0 bend apart, 0 -> 1 stays straight.
        // The arrowhead marker path contributes two more " L ".
        assert_eq!(svg.matches(" Q ").count(), 2);
        assert_eq!(svg.matches(" L ").count(), 3);
    }

    #[test]
    fn test_colors_are_escaped() {
        let graph = reference_graph();
        let mut options = RenderOptions::default();
        options.palette.vulnerable = "red\" onload=\"x".to_string();

        let svg = SvgRenderer::draw(&RenderContext::new(&graph, &options)).unwrap();
        assert!(!svg.contains("onload=\"x"));
    }

    #[test]
    fn test_straight_edge_is_clipped_to_circles() {
        let path = edge_path(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), false, 10.0, 0.0);
        assert_eq!(path, "M 10.0 0.0 L 90.0 0.0");
    }

    #[test]
    fn test_self_loop_path() {
        let path = edge_path(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0), true, 10.0, 0.0);
        assert!(path.starts_with("M 44.0 42.0 C"));
        assert!(path.ends_with("56.0 42.0"));
    }
}
