//! Tincture project configuration (tincture.toml)

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level Tincture configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TinctureConfig {
    #[serde(default)]
    pub tokens: TokensConfig,
    #[serde(default)]
    pub emit: EmitConfig,
}

/// Token and theme source files
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TokensConfig {
    /// DTCG token documents, loaded into the global scope in order
    #[serde(default)]
    pub sources: Vec<String>,
    /// Theme definition files, forming the stack in listed order
    #[serde(default)]
    pub themes: Vec<String>,
    /// Reject all non-compliant tokens (lenient mode is for migration tooling)
    #[serde(default = "default_true")]
    pub strict: bool,
}

fn default_true() -> bool {
    true
}

/// Emission settings
#[derive(Debug, Deserialize, Serialize)]
pub struct EmitConfig {
    /// Output stylesheet path
    #[serde(default = "default_output")]
    pub output: String,
    /// JSON file with component/utility class definitions
    #[serde(default)]
    pub classes: Option<String>,
}

fn default_output() -> String {
    "theme.css".to_string()
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            classes: None,
        }
    }
}

impl TinctureConfig {
    /// Load configuration from a file, or from `tincture.toml` in a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join("tincture.toml")
        } else {
            path.to_path_buf()
        };
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: TinctureConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: TinctureConfig = toml::from_str(
            r#"
            [tokens]
            sources = ["tokens/base.json"]
            themes = ["themes/dark.json"]
            "#,
        )
        .unwrap();
        assert!(config.tokens.strict);
        assert_eq!(config.emit.output, "theme.css");
        assert_eq!(config.tokens.sources, vec!["tokens/base.json"]);
    }

    #[test]
    fn empty_config_is_valid() {
        let config: TinctureConfig = toml::from_str("").unwrap();
        assert!(config.tokens.sources.is_empty());
        assert!(config.emit.classes.is_none());
    }
}
