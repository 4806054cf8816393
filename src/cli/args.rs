//! CLI argument definitions for `immunograph`

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use immunograph::config::ConfigOverrides;
use log::LevelFilter;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to
/// `log::LevelFilter` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `graphviz`, `immunized`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "immunograph",
    about = "Render a vertex immunization graph from CSV",
    long_about = "Load a graph CSV (header `n`, then rows `v,flag,u1,...,uk,-1`) and render it \
                  with immunized vertices in blue and vulnerable vertices in red. The output \
                  format is chosen from the output file's extension.",
    version = env!("CARGO_PKG_VERSION"),
    subcommand_negates_reqs = true
)]
pub struct Cli {
    /// Graph CSV file to load
    #[arg(value_name = "INPUT", required = true)]
    pub input: Option<PathBuf>,

    /// Image file to write (svg, html, dot, png, pdf, ...)
    #[arg(value_name = "OUTPUT", required = true)]
    pub output: Option<PathBuf>,

    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Enable debug-level logging (shorthand for --log-level debug)
    #[arg(long = "debug", global = true)]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Graphviz command used for raster and print formats
    #[arg(long, value_name = "CMD")]
    pub graphviz: Option<String>,

    /// Subcommand to execute instead of rendering
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` means the config value is kept. Overrides apply to this run only.
    ///
    /// # Examples
    /// ```ignore
    /// let args = Cli::parse();
    /// let overrides = args.to_config_overrides();
    /// config.apply_overrides(&overrides);
    /// ```
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.log_level.map(|lvl| lvl.to_string()),
            file: self
                .log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.verbose.then_some(true),
            graphviz: self.graphviz.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_level_filter() {
        assert_eq!(LevelFilter::from(LogLevelArg::Error), LevelFilter::Error);
        assert_eq!(LevelFilter::from(LogLevelArg::Warn), LevelFilter::Warn);
        assert_eq!(LevelFilter::from(LogLevelArg::Info), LevelFilter::Info);
        assert_eq!(LevelFilter::from(LogLevelArg::Debug), LevelFilter::Debug);
    }

    #[test]
    fn test_render_arguments() {
        let cli = Cli::try_parse_from(["immunograph", "graph.csv", "graph.svg"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("graph.csv")));
        assert_eq!(cli.output, Some(PathBuf::from("graph.svg")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_missing_output_is_a_usage_error() {
        let err = Cli::try_parse_from(["immunograph", "graph.csv"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_config_subcommand_needs_no_paths() {
        let cli = Cli::try_parse_from(["immunograph", "config", "get", "level"]).unwrap();
        assert!(cli.input.is_none());
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                subcommand: Some(ConfigSubcommand::Get { key: Some(ref k) })
            }) if k == "level"
        ));
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let cli = Cli::try_parse_from(["immunograph", "in.csv", "out.svg"]).unwrap();

        let overrides = cli.to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.graphviz.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let cli = Cli::try_parse_from([
            "immunograph",
            "--log-level",
            "debug",
            "--log-file",
            "/tmp/test.log",
            "-v",
            "--graphviz",
            "/opt/graphviz/bin/dot",
            "in.csv",
            "out.png",
        ])
        .unwrap();

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(
            overrides.graphviz,
            Some("/opt/graphviz/bin/dot".to_string())
        );
    }
}
