//! Renderer implementations
//!
//! DOT text, SVG and HTML are drawn in-process; everything else goes through Graphviz.

pub mod dot;
pub mod graphviz;
pub mod html;
pub mod svg;

pub use dot::DotRenderer;
pub use graphviz::GraphvizRenderer;
pub use html::HtmlRenderer;
pub use svg::SvgRenderer;
