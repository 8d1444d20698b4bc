//! Rendering configuration
//!
//! Settings are read from YAML. Lookup order is an explicit `--config` file,
//! then `.planscope.yaml` in the working directory, then built-in defaults.
//! Command line flags are applied on top by the binary.

use std::path::Path;

use serde::{Deserialize, Serialize};
use terminal_size::{Width, terminal_size};
use tracing::debug;

use crate::error::{PlanError, PlanResult};
use crate::plan::DiffRenderOptions;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".planscope.yaml";

const FALLBACK_TERMINAL_WIDTH: usize = 100;

/// User-facing rendering settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Show unchanged attributes and no-op resources
    pub show_unchanged: bool,

    /// Reveal values marked sensitive
    pub show_sensitive: bool,

    pub compact_mode: bool,

    pub side_by_side: bool,

    /// Values longer than this are truncated
    pub max_value_width: usize,

    pub terminal_width: usize,

    /// Compare against the drift snapshot by default
    pub use_drift: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_unchanged: false,
            show_sensitive: false,
            compact_mode: false,
            side_by_side: false,
            max_value_width: 60,
            terminal_width: detect_terminal_width(),
            use_drift: false,
        }
    }
}

impl RenderConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> PlanResult<Self> {
        // An empty file is a valid, all-defaults configuration
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: RenderConfig = serde_yaml::from_str(content)?;

        if config.max_value_width == 0 {
            return Err(PlanError::Config(
                "max_value_width must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> PlanResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Resolve configuration using the standard lookup order
    pub fn load(explicit: Option<&Path>) -> PlanResult<Self> {
        Self::load_from(explicit, Path::new("."))
    }

    /// Resolve configuration, looking for the default file under `dir`
    pub fn load_from(explicit: Option<&Path>, dir: &Path) -> PlanResult<Self> {
        if let Some(path) = explicit {
            debug!("loading configuration from {}", path.display());
            return Self::from_file(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!("loading configuration from {}", candidate.display());
            return Self::from_file(&candidate);
        }

        debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Convert to the options consumed by renderers
    pub fn to_render_options(&self) -> DiffRenderOptions {
        DiffRenderOptions {
            show_unchanged: self.show_unchanged,
            compact_mode: self.compact_mode,
            side_by_side: self.side_by_side,
            max_value_width: self.max_value_width,
            show_sensitive: self.show_sensitive,
            terminal_width: self.terminal_width,
        }
    }
}

fn detect_terminal_width() -> usize {
    match terminal_size() {
        Some((Width(width), _)) if width > 0 => width as usize,
        _ => FALLBACK_TERMINAL_WIDTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert!(!config.show_sensitive);
        assert!(!config.use_drift);
        assert_eq!(config.max_value_width, 60);
        assert!(config.terminal_width > 0);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = RenderConfig::from_yaml("show_unchanged: true\nmax_value_width: 30\n").unwrap();
        assert!(config.show_unchanged);
        assert_eq!(config.max_value_width, 30);
        assert!(!config.side_by_side);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = RenderConfig::from_yaml("   \n").unwrap();
        assert_eq!(config.max_value_width, 60);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = RenderConfig::from_yaml("show_unchanged: [nope").unwrap_err();
        assert!(matches!(err, PlanError::Config(_)));

        let err = RenderConfig::from_yaml("max_value_width: 0").unwrap_err();
        assert!(matches!(err, PlanError::Config(_)));
    }

    #[test]
    fn test_load_prefers_explicit_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "compact_mode: true\n").unwrap();
        let explicit = dir.path().join("custom.yaml");
        std::fs::write(&explicit, "side_by_side: true\n").unwrap();

        let config = RenderConfig::load_from(Some(&explicit), dir.path()).unwrap();
        assert!(config.side_by_side);
        assert!(!config.compact_mode);
    }

    #[test]
    fn test_load_finds_default_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "use_drift: true\n").unwrap();

        let config = RenderConfig::load_from(None, dir.path()).unwrap();
        assert!(config.use_drift);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = RenderConfig::load_from(None, dir.path()).unwrap();
        assert_eq!(config.max_value_width, 60);
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = RenderConfig::load_from(Some(&dir.path().join("absent.yaml")), dir.path()).unwrap_err();
        assert!(matches!(err, PlanError::Io(_)));
    }

    #[test]
    fn test_to_render_options() {
        let config = RenderConfig {
            show_sensitive: true,
            max_value_width: 20,
            terminal_width: 80,
            ..RenderConfig::from_yaml("").unwrap()
        };
        let options = config.to_render_options();
        assert!(options.show_sensitive);
        assert_eq!(options.max_value_width, 20);
        assert_eq!(options.terminal_width, 80);
    }
}
