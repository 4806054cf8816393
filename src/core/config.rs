//! Configuration module for `immunograph`

use crate::core::loader::LoaderOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Placeholder expanded to the configuration directory
const DIR_VARIABLE: &str = "$IMMUNOGRAPH";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Rendering configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Graphviz executable used for raster and print formats
    #[serde(default)]
    pub graphviz: String,
    /// Canvas width in pixels for SVG/HTML output
    #[serde(default)]
    pub width: u32,
    /// Canvas height in pixels for SVG/HTML output
    #[serde(default)]
    pub height: u32,
    /// Force-directed layout iterations
    #[serde(default)]
    pub iterations: u32,
    /// Vertex radius in pixels
    #[serde(default)]
    pub vertex_radius: f32,
}

/// Vertex colours by status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorsConfig {
    /// Colour of immunized vertices
    #[serde(default)]
    pub immunized: String,
    /// Colour of vulnerable vertices
    #[serde(default)]
    pub vulnerable: String,
    /// Colour of vertices without a status
    #[serde(default)]
    pub unassigned: String,
}

/// CSV loader configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Maximum number of fields accepted in one row
    #[serde(default)]
    pub max_row_fields: usize,
    /// Maximum vertex count accepted in the header
    #[serde(default)]
    pub max_vertices: usize,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Render settings
    #[serde(default)]
    pub render: RenderConfig,
    /// Colour settings
    #[serde(default)]
    pub colors: ColorsConfig,
    /// Loader settings
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override Graphviz command
    pub graphviz: Option<String>,
}

impl Config {
    /// Get the `$IMMUNOGRAPH` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/immunograph`
    /// - macOS: `~/Library/Application Support/immunograph`
    /// - Windows: `%APPDATA%\immunograph`
    #[must_use]
    pub fn get_immunograph_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("immunograph")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty (or zero) here and set in `defaults` are
    /// updated, so upgrades pick up new keys without losing user settings.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        fn fill_str(target: &mut String, default: &str, changed: &mut bool) {
            if target.is_empty() && !default.is_empty() {
                default.clone_into(target);
                *changed = true;
            }
        }
        fn fill_num<T: Copy + Default + PartialEq>(target: &mut T, default: T, changed: &mut bool) {
            if *target == T::default() && default != T::default() {
                *target = default;
                *changed = true;
            }
        }

        let mut changed = false;

        fill_str(&mut self.logging.level, &defaults.logging.level, &mut changed);
        fill_str(&mut self.logging.file, &defaults.logging.file, &mut changed);

        fill_str(&mut self.render.graphviz, &defaults.render.graphviz, &mut changed);
        fill_num(&mut self.render.width, defaults.render.width, &mut changed);
        fill_num(&mut self.render.height, defaults.render.height, &mut changed);
        fill_num(&mut self.render.iterations, defaults.render.iterations, &mut changed);
        fill_num(&mut self.render.vertex_radius, defaults.render.vertex_radius, &mut changed);

        fill_str(&mut self.colors.immunized, &defaults.colors.immunized, &mut changed);
        fill_str(&mut self.colors.vulnerable, &defaults.colors.vulnerable, &mut changed);
        fill_str(&mut self.colors.unassigned, &defaults.colors.unassigned, &mut changed);

        fill_num(&mut self.loader.max_row_fields, defaults.loader.max_row_fields, &mut changed);
        fill_num(&mut self.loader.max_vertices, defaults.loader.max_vertices, &mut changed);

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for this run only; the configuration file is untouched.
    /// Only non-`None` values replace config values.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut config = Config::load();
    /// let overrides = ConfigOverrides {
    ///     level: Some("debug".to_string()),
    ///     ..Default::default()
    /// };
    /// config.apply_overrides(&overrides);
    /// ```
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(graphviz) = &overrides.graphviz {
            self.render.graphviz.clone_from(graphviz);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, inside
    /// [`get_immunograph_dir`](Self::get_immunograph_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_immunograph_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$IMMUNOGRAPH` in a string to the configuration directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_immunograph_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing sections and fields take their serde defaults (empty or zero);
    /// `$IMMUNOGRAPH` is expanded in path-like values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.render.graphviz = Self::expand_variables(&config.render.graphviz);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create it from defaults if not found
    ///
    /// - If the config file exists: load it, merge missing fields from defaults
    ///   and save the result if anything was added.
    /// - On first run: create the config directory and save the defaults.
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the platform config file
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized, the directory cannot
    /// be created or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Loader options derived from the `[loader]` section
    ///
    /// Zero values fall back to the built-in limits.
    #[must_use]
    pub fn loader_options(&self) -> LoaderOptions {
        let defaults = LoaderOptions::default();
        let or_default = |value: usize, fallback: usize| if value == 0 { fallback } else { value };
        LoaderOptions {
            max_row_fields: or_default(self.loader.max_row_fields, defaults.max_row_fields),
            max_vertices: or_default(self.loader.max_vertices, defaults.max_vertices),
        }
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `graphviz`, `width`,
    /// `height`, `iterations`, `vertex_radius`, `immunized`, `vulnerable`,
    /// `unassigned`, `max_row_fields`, `max_vertices`. Dashes may replace underscores.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize_key(key).as_str() {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "graphviz" => Some(self.render.graphviz.clone()),
            "width" => Some(self.render.width.to_string()),
            "height" => Some(self.render.height.to_string()),
            "iterations" => Some(self.render.iterations.to_string()),
            "vertex_radius" => Some(self.render.vertex_radius.to_string()),
            "immunized" => Some(self.colors.immunized.clone()),
            "vulnerable" => Some(self.colors.vulnerable.clone()),
            "unassigned" => Some(self.colors.unassigned.clone()),
            "max_row_fields" => Some(self.loader.max_row_fields.to_string()),
            "max_vertices" => Some(self.loader.max_vertices.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value does not
    /// parse as the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match normalize_key(key).as_str() {
            "level" => {
                if crate::logger::parse_level(value).is_none() {
                    return Err(format!("Invalid log level: '{value}'"));
                }
                self.logging.level = value.to_ascii_lowercase();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_value(key, value)?,
            "graphviz" => self.render.graphviz = value.to_string(),
            "width" => self.render.width = parse_value(key, value)?,
            "height" => self.render.height = parse_value(key, value)?,
            "iterations" => self.render.iterations = parse_value(key, value)?,
            "vertex_radius" => self.render.vertex_radius = parse_value(key, value)?,
            "immunized" => self.colors.immunized = value.to_string(),
            "vulnerable" => self.colors.vulnerable = value.to_string(),
            "unassigned" => self.colors.unassigned = value.to_string(),
            "max_row_fields" => self.loader.max_row_fields = parse_value(key, value)?,
            "max_vertices" => self.loader.max_vertices = parse_value(key, value)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset a single configuration value to its default
    ///
    /// Updates the in-memory config; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        let value = defaults
            .get(key)
            .ok_or_else(|| format!("Unknown config key: '{key}'"))?;
        self.set(key, &value)
    }

    /// Reset all configuration to defaults by deleting the config file
    ///
    /// The next [`load()`](Config::load) recreates it. Succeeds if the file
    /// does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("Invalid value for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[render]")?;
        writeln!(f, "  graphviz = \"{}\"", self.render.graphviz)?;
        writeln!(f, "  width = {}", self.render.width)?;
        writeln!(f, "  height = {}", self.render.height)?;
        writeln!(f, "  iterations = {}", self.render.iterations)?;
        writeln!(f, "  vertex_radius = {}", self.render.vertex_radius)?;

        writeln!(f, "\n[colors]")?;
        writeln!(f, "  immunized = \"{}\"", self.colors.immunized)?;
        writeln!(f, "  vulnerable = \"{}\"", self.colors.vulnerable)?;
        writeln!(f, "  unassigned = \"{}\"", self.colors.unassigned)?;

        writeln!(f, "\n[loader]")?;
        writeln!(f, "  max_row_fields = {}", self.loader.max_row_fields)?;
        writeln!(f, "  max_vertices = {}", self.loader.max_vertices)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_embedded_defaults_parse() {
        for defaults in [
            include_str!("../../assets/DefaultCLIConfigRelease.toml"),
            include_str!("../../assets/DefaultCLIConfigDebug.toml"),
        ] {
            let config = Config::from_toml(defaults).unwrap();
            assert!(!config.logging.level.is_empty());
            assert_eq!(config.render.graphviz, "dot");
            assert_eq!(config.colors.immunized, "blue");
            assert_eq!(config.colors.vulnerable, "red");
            assert!(config.loader.max_row_fields > 0);
            assert!(config.loader.max_vertices > 0);
        }
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Vertex-Radius"), "vertex_radius");
        assert_eq!(normalize_key(" max_row_fields "), "max_row_fields");
    }

    #[test]
    fn test_expand_variables() {
        let expanded = Config::expand_variables("$IMMUNOGRAPH/app.log");
        assert!(!expanded.contains(DIR_VARIABLE));
        assert!(expanded.ends_with("app.log"));
        assert_eq!(Config::expand_variables("plain"), "plain");
    }

    #[test]
    fn test_loader_options_fall_back_when_zero() {
        let mut config = Config::default();
        assert_eq!(config.loader_options(), LoaderOptions::default());
        config.loader.max_row_fields = 10;
        assert_eq!(config.loader_options().max_row_fields, 10);
        assert_eq!(
            config.loader_options().max_vertices,
            LoaderOptions::default().max_vertices
        );
        config.loader.max_vertices = 100;
        assert_eq!(config.loader_options().max_vertices, 100);
    }
}
