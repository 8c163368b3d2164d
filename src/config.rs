use crate::synth::{FormatSpec, RenderMode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Format used when nothing else is configured
pub const DEFAULT_FORMAT: &str = "firstname.lastname@company.com";

const CONFIG_DIR: &str = ".emailgen";

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Configuration for clipboard export
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ClipboardConfig {
    /// Command that reads the text to copy from stdin, e.g. "xclip -selection clipboard"
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_clipboard_timeout_ms() -> u64 {
    2_000
}

impl ClipboardConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or_else(default_clipboard_timeout_ms))
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub render_mode: Option<RenderMode>,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

impl Config {
    /// Load configuration from default paths
    /// Priority: local (.emailgen/config.local.toml) > project (.emailgen/config.toml)
    /// > user (~/.emailgen/config.toml) > built-in defaults
    pub fn load() -> Result<Self> {
        Self::load_layered(dirs::home_dir().as_deref(), Path::new("."))
    }

    /// Layered load with explicit home and project roots
    pub fn load_layered(home: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let mut layers = Vec::new();
        if let Some(home) = home {
            layers.push(home.join(CONFIG_DIR).join("config.toml"));
        }
        layers.push(root.join(CONFIG_DIR).join("config.toml"));
        layers.push(root.join(CONFIG_DIR).join("config.local.toml"));

        for path in layers {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config layer");
                let layer = Self::load_from(&path)?;
                config.merge(layer);
            }
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Merge another config into this one (other takes priority where set)
    pub fn merge(&mut self, other: Config) {
        if other.format.is_some() {
            self.format = other.format;
        }
        if other.render_mode.is_some() {
            self.render_mode = other.render_mode;
        }
        if other.clipboard.command.is_some() {
            self.clipboard.command = other.clipboard.command;
        }
        if other.clipboard.timeout_ms.is_some() {
            self.clipboard.timeout_ms = other.clipboard.timeout_ms;
        }
    }

    /// The effective format template
    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_FORMAT)
    }

    /// The effective render mode
    pub fn render_mode(&self) -> RenderMode {
        self.render_mode.unwrap_or_default()
    }

    /// Validate configuration and return any errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if FormatSpec::parse(self.format()).is_none() {
            errors.push(ValidationError {
                field: "format".to_string(),
                message: format!(
                    "Format '{}' has no '@'; generated emails will be empty",
                    self.format()
                ),
            });
        }

        if let Some(command) = &self.clipboard.command {
            match shell_words::split(command) {
                Ok(argv) if argv.is_empty() => errors.push(ValidationError {
                    field: "clipboard.command".to_string(),
                    message: "Command must not be empty".to_string(),
                }),
                Ok(_) => {}
                Err(err) => errors.push(ValidationError {
                    field: "clipboard.command".to_string(),
                    message: format!("Invalid command '{}': {}", command, err),
                }),
            }
        }

        if self.clipboard.timeout_ms == Some(0) {
            errors.push(ValidationError {
                field: "clipboard.timeout_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Save the format to the local config file (.emailgen/config.local.toml)
    /// under `root`, keeping any other settings already in that file.
    pub fn save_local_format(root: &Path, format: &str) -> Result<()> {
        let dir = root.join(CONFIG_DIR);
        if !dir.exists() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let path = dir.join("config.local.toml");
        let mut local = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        local.format = Some(format.to_string());

        let content = toml::to_string_pretty(&local)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.format(), DEFAULT_FORMAT);
        assert_eq!(config.render_mode(), RenderMode::Cascade);
        assert_eq!(config.clipboard.timeout(), Duration::from_millis(2_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
format = "f.lastname@corp.io"
render_mode = "tokenized"

[clipboard]
command = "xclip -selection clipboard"
timeout_ms = 500
"#,
        )
        .unwrap();
        assert_eq!(config.format(), "f.lastname@corp.io");
        assert_eq!(config.render_mode(), RenderMode::Tokenized);
        assert_eq!(
            config.clipboard.command.as_deref(),
            Some("xclip -selection clipboard")
        );
        assert_eq!(config.clipboard.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_layered_load_priority() {
        let home = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();

        write(
            &home.path().join(".emailgen/config.toml"),
            "format = \"user@home.com\"\nrender_mode = \"tokenized\"\n",
        );
        write(
            &root.path().join(".emailgen/config.toml"),
            "format = \"project@corp.com\"\n",
        );

        let config = Config::load_layered(Some(home.path()), root.path()).unwrap();
        assert_eq!(config.format(), "project@corp.com");
        // Not overridden by the project layer
        assert_eq!(config.render_mode(), RenderMode::Tokenized);

        write(
            &root.path().join(".emailgen/config.local.toml"),
            "format = \"local@corp.com\"\n",
        );
        let config = Config::load_layered(Some(home.path()), root.path()).unwrap();
        assert_eq!(config.format(), "local@corp.com");
    }

    #[test]
    fn test_load_invalid_toml() {
        let root = TempDir::new().unwrap();
        write(&root.path().join(".emailgen/config.toml"), "format = [");
        let err = Config::load_layered(None, root.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validate_format_without_at() {
        let config = Config {
            format: Some("firstname.lastname".to_string()),
            ..Config::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "format");
        assert!(errors[0].to_string().contains("no '@'"));
    }

    #[test]
    fn test_validate_clipboard() {
        let mut config = Config::default();
        config.clipboard.command = Some("xclip 'unterminated".to_string());
        config.clipboard.timeout_ms = Some(0);
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].field.contains("clipboard.command"));
        assert!(errors[1].field.contains("timeout_ms"));

        config.clipboard.command = Some("   ".to_string());
        config.clipboard.timeout_ms = None;
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("empty"));
    }

    #[test]
    fn test_save_local_format_keeps_other_settings() {
        let root = TempDir::new().unwrap();
        write(
            &root.path().join(".emailgen/config.local.toml"),
            "render_mode = \"tokenized\"\n",
        );

        Config::save_local_format(root.path(), "f.l@corp.com").unwrap();

        let saved = Config::load_from(&root.path().join(".emailgen/config.local.toml")).unwrap();
        assert_eq!(saved.format(), "f.l@corp.com");
        assert_eq!(saved.render_mode(), RenderMode::Tokenized);
    }
}
