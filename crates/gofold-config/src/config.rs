//! Configuration types (gofold.toml format).

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_FILE_NAME: &str = "gofold.toml";

/// Root configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GofoldConfig {
    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Typing rules and limits for constant folding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluatorConfig {
    pub mode: ModeSetting,

    /// Bit width of `int`, `uint` and `uintptr` (32 or 64).
    pub int_size: u32,

    /// Largest accepted shift count.
    pub max_shift: u32,

    /// Ignored in `go` mode, which always rejects redeclarations.
    pub redeclaration: RedeclarationSetting,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            mode: ModeSetting::Lenient,
            int_size: 64,
            max_shift: 10_000,
            redeclaration: RedeclarationSetting::Warn,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeSetting {
    #[default]
    Lenient,
    Go,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedeclarationSetting {
    #[default]
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Fractional digits printed for floats that do not terminate.
    pub float_digits: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            float_digits: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl GofoldConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GofoldConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// An explicit path must exist; otherwise `gofold.toml` in `dir` is used
    /// when present, and defaults when not.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidate = Self::default_path(dir);
        if candidate.is_file() {
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn default_path(dir: &Path) -> PathBuf {
        dir.join(DEFAULT_FILE_NAME)
    }

    pub fn validate(&self) -> Result<()> {
        if !matches!(self.evaluator.int_size, 32 | 64) {
            return Err(ConfigError::Validation(format!(
                "evaluator.int_size must be 32 or 64, got {}",
                self.evaluator.int_size
            )));
        }
        if self.output.float_digits == 0 {
            return Err(ConfigError::Validation(
                "output.float_digits must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
