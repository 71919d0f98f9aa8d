//! Report configuration shared by the CLI and the WASM entry point.

use clap::ValueEnum;
use serde::Serialize;

/// How a report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// Case-insensitive lookup by name (`text`, `json`).
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name.trim(), true).ok()
    }
}

/// Which report sections to compute and render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportConfig {
    pub format: OutputFormat,
    pub closures: bool,
    pub derived: bool,
    pub decompositions: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            closures: true,
            derived: true,
            decompositions: true,
        }
    }
}

impl ReportConfig {
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_name() {
        assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name(" text "), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_name("svg"), None);
    }

    #[test]
    fn test_default_config_renders_everything() {
        let config = ReportConfig::default();
        assert!(config.closures && config.derived && config.decompositions);
        assert_eq!(config.with_format(OutputFormat::Json).format, OutputFormat::Json);
    }
}
