//! Raster and print output via the Graphviz `dot` executable
//!
//! DOT source is piped to `dot -T<format>` and the image is read back from
//! stdout. Layout, rasterisation and encoding all happen inside Graphviz.

use super::dot::DotRenderer;
use crate::core::error::RenderError;
use crate::core::render::{GraphRenderer, RenderContext};
use log::debug;
use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Renders through an external Graphviz command
pub struct GraphvizRenderer {
    command: String,
    format: String,
}

impl GraphvizRenderer {
    /// Create a renderer that runs `command -T<format>`
    #[must_use]
    pub fn new(command: &str, format: &str) -> Self {
        Self {
            command: command.to_owned(),
            format: format.to_owned(),
        }
    }

    /// Pipe `dot_source` through Graphviz and collect the image bytes
    fn run(&self, dot_source: &str) -> Result<Vec<u8>, RenderError> {
        debug!("Running {} -T{}", self.command, self.format);

        let mut child = Command::new(&self.command)
            .arg(format!("-T{}", self.format))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.spawn_error(source))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(dot_source.as_bytes())
                .map_err(|source| self.io_error(source))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|source| self.io_error(source))?;

        if !output.status.success() {
            return Err(RenderError::RendererFailed {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(RenderError::RendererFailed {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr: "no output produced".to_string(),
            });
        }

        Ok(output.stdout)
    }

    fn spawn_error(&self, source: io::Error) -> RenderError {
        if source.kind() == io::ErrorKind::NotFound {
            RenderError::RendererNotFound {
                command: self.command.clone(),
            }
        } else {
            self.io_error(source)
        }
    }

    fn io_error(&self, source: io::Error) -> RenderError {
        RenderError::RendererIo {
            command: self.command.clone(),
            source,
        }
    }
}

impl GraphRenderer for GraphvizRenderer {
    fn render(&self, ctx: &RenderContext) -> Result<Vec<u8>, RenderError> {
        self.run(&DotRenderer::generate(ctx))
    }
}
