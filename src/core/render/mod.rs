//! Rendering of immunization graphs to image files
//!
//! The output format is chosen from the output path's extension. DOT, SVG and
//! HTML are produced in-process; raster and print formats are delegated to the
//! Graphviz `dot` executable. Every renderer produces the complete file in
//! memory first, so a failed render never leaves a partial file behind.

pub mod formats;
pub mod layout;

use crate::core::config::Config;
use crate::core::error::RenderError;
use crate::core::models::{ImmunizationGraph, Status};
use log::{debug, info};
use std::fmt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub use formats::{DotRenderer, GraphvizRenderer, HtmlRenderer, SvgRenderer};
pub use layout::{compute_layout, Layout, LayoutSettings};

/// Default external renderer command
pub const DEFAULT_GRAPHVIZ: &str = "dot";

/// Extensions handed to Graphviz
const GRAPHVIZ_EXTENSIONS: [&str; 10] = [
    "png", "pdf", "ps", "eps", "jpg", "jpeg", "gif", "bmp", "tiff", "webp",
];

/// Colours assigned to vertices by status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Fill for immunized vertices
    pub immunized: String,
    /// Fill for vulnerable vertices
    pub vulnerable: String,
    /// Fill for vertices that never appeared as a row subject
    pub unassigned: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            immunized: "blue".to_string(),
            vulnerable: "red".to_string(),
            unassigned: "gray".to_string(),
        }
    }
}

impl Palette {
    /// Colour for a vertex status
    #[must_use]
    pub fn color_for(&self, status: Option<Status>) -> &str {
        match status {
            Some(Status::Immunized) => &self.immunized,
            Some(Status::Vulnerable) => &self.vulnerable,
            None => &self.unassigned,
        }
    }
}

/// Everything a renderer needs besides the graph
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Vertex colours
    pub palette: Palette,
    /// Canvas and force simulation settings for in-process drawings
    pub layout: LayoutSettings,
    /// Command used for Graphviz-backed formats
    pub graphviz: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            layout: LayoutSettings::default(),
            graphviz: DEFAULT_GRAPHVIZ.to_string(),
        }
    }
}

impl RenderOptions {
    /// Build render options from the `[render]` and `[colors]` config sections
    ///
    /// Empty or zero values fall back to the built-in defaults.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        let or_default = |value: &str, fallback: &str| {
            if value.trim().is_empty() {
                fallback.to_string()
            } else {
                value.trim().to_string()
            }
        };

        let render = &config.render;
        let colors = &config.colors;
        let layout = LayoutSettings {
            width: if render.width == 0 {
                defaults.layout.width
            } else {
                render.width
            },
            height: if render.height == 0 {
                defaults.layout.height
            } else {
                render.height
            },
            iterations: render.iterations,
            vertex_radius: if render.vertex_radius > 0.0 {
                render.vertex_radius
            } else {
                defaults.layout.vertex_radius
            },
        };

        Self {
            palette: Palette {
                immunized: or_default(&colors.immunized, &defaults.palette.immunized),
                vulnerable: or_default(&colors.vulnerable, &defaults.palette.vulnerable),
                unassigned: or_default(&colors.unassigned, &defaults.palette.unassigned),
            },
            layout,
            graphviz: or_default(&render.graphviz, &defaults.graphviz),
        }
    }
}

/// Data handed to each renderer
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Graph being drawn
    pub graph: &'a ImmunizationGraph,
    /// Render settings
    pub options: &'a RenderOptions,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context
    #[must_use]
    pub const fn new(graph: &'a ImmunizationGraph, options: &'a RenderOptions) -> Self {
        Self { graph, options }
    }

    /// Colour of every vertex, indexed by vertex
    #[must_use]
    pub fn vertex_colors(&self) -> Vec<&'a str> {
        let palette = &self.options.palette;
        self.graph
            .statuses()
            .map(|(_, status)| palette.color_for(status))
            .collect()
    }
}

/// Trait for graph renderers
pub trait GraphRenderer {
    /// Render the complete output file contents
    ///
    /// # Errors
    /// Returns an error if layout, encoding or an external renderer fails
    fn render(&self, ctx: &RenderContext) -> Result<Vec<u8>, RenderError>;
}

/// Output formats, selected by file extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// Graphviz DOT source
    Dot,
    /// Scalable vector graphics
    Svg,
    /// Standalone HTML page with an embedded SVG drawing
    Html,
    /// Any format rendered by Graphviz, named by its `-T` argument
    Graphviz(String),
}

impl OutputFormat {
    /// Select the format from a path's extension (case-insensitive)
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` for a missing or unknown extension.
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "dot" | "gv" => Ok(Self::Dot),
            "svg" => Ok(Self::Svg),
            "html" | "htm" => Ok(Self::Html),
            ext if GRAPHVIZ_EXTENSIONS.contains(&ext) => Ok(Self::Graphviz(ext.to_string())),
            _ => Err(RenderError::UnsupportedFormat {
                extension,
                supported: Self::supported_extensions().join(", "),
            }),
        }
    }

    /// All recognised output extensions
    #[must_use]
    pub fn supported_extensions() -> Vec<&'static str> {
        let mut extensions = vec!["dot", "gv", "svg", "html", "htm"];
        extensions.extend(GRAPHVIZ_EXTENSIONS);
        extensions
    }

    /// Whether this format needs the external renderer
    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(self, Self::Graphviz(_))
    }

    fn renderer(&self, options: &RenderOptions) -> Box<dyn GraphRenderer> {
        match self {
            Self::Dot => Box::new(DotRenderer::new()),
            Self::Svg => Box::new(SvgRenderer::new()),
            Self::Html => Box::new(HtmlRenderer::new()),
            Self::Graphviz(format) => Box::new(GraphvizRenderer::new(&options.graphviz, format)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dot => write!(f, "dot"),
            Self::Svg => write!(f, "svg"),
            Self::Html => write!(f, "html"),
            Self::Graphviz(format) => write!(f, "{format} (graphviz)"),
        }
    }
}

/// Render `graph` to `output`, choosing the format from the extension
///
/// # Errors
/// Returns `UnsupportedFormat` before doing any work if the extension is not
/// recognised, the renderer's error if drawing fails, and `Output` if the file
/// cannot be written. No file is created on failure.
pub fn render_graph(
    graph: &ImmunizationGraph,
    output: &Path,
    options: &RenderOptions,
) -> Result<OutputFormat, RenderError> {
    let format = OutputFormat::from_path(output)?;
    debug!("Rendering {} as {format}", output.display());

    let ctx = RenderContext::new(graph, options);
    let bytes = format.renderer(options).render(&ctx)?;
    write_atomically(output, &bytes)?;

    info!("Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(format)
}

/// Write through a temporary file in the destination directory, then move it into place
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let output_error = |source| RenderError::Output {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(output_error)?;
    temp.write_all(bytes).map_err(output_error)?;
    temp.flush().map_err(output_error)?;
    temp.persist(path).map_err(|err| output_error(err.error))?;
    Ok(())
}
