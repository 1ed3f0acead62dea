use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScopeError;

/// Top-level configuration loaded from `.gitscope.toml`.
///
/// Every section and field has a default, so an empty or missing file is a
/// valid configuration.
///
/// # Examples
///
/// ```
/// use gitscope_core::ScopeConfig;
///
/// let config = ScopeConfig::default();
/// assert_eq!(config.log.limit, 50);
/// assert!(config.diff.find_renames);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Commit history settings.
    #[serde(default)]
    pub log: LogConfig,
    /// Branch diff settings.
    #[serde(default)]
    pub diff: DiffConfig,
}

impl ScopeConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Io`] if the file cannot be read, or
    /// [`ScopeError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gitscope_core::ScopeConfig;
    /// use std::path::Path;
    ///
    /// let config = ScopeConfig::from_file(Path::new(".gitscope.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, ScopeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitscope_core::ScopeConfig;
    ///
    /// let toml = r#"
    /// [log]
    /// limit = 10
    /// "#;
    /// let config = ScopeConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.log.limit, 10);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, ScopeError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Commit history configuration.
///
/// # Examples
///
/// ```
/// use gitscope_core::LogConfig;
///
/// assert_eq!(LogConfig::default().limit, 50);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Maximum commits returned by a history query (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

/// Branch diff configuration.
///
/// # Examples
///
/// ```
/// use gitscope_core::DiffConfig;
///
/// let config = DiffConfig::default();
/// assert!(config.find_renames);
/// assert!(!config.find_copies);
/// assert_eq!(config.context_lines, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Detect renamed files instead of reporting delete + add (default: true).
    #[serde(default = "default_find_renames")]
    pub find_renames: bool,
    /// Detect copied files (default: false).
    #[serde(default)]
    pub find_copies: bool,
    /// Context lines around each hunk (default: 3).
    #[serde(default = "default_context_lines")]
    pub context_lines: u32,
}

fn default_find_renames() -> bool {
    true
}

fn default_context_lines() -> u32 {
    3
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            find_renames: default_find_renames(),
            find_copies: false,
            context_lines: default_context_lines(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = ScopeConfig::from_toml("").unwrap();
        assert_eq!(config.log.limit, 50);
        assert!(config.diff.find_renames);
        assert_eq!(config.diff.context_lines, 3);
    }

    #[test]
    fn sections_override_independently() {
        let config = ScopeConfig::from_toml(
            r#"
            [diff]
            find_renames = false
            context_lines = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.log.limit, 50);
        assert!(!config.diff.find_renames);
        assert_eq!(config.diff.context_lines, 0);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(ScopeConfig::from_toml("[log\nlimit = 1").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ScopeConfig::from_file(Path::new("/nonexistent/.gitscope.toml")).unwrap_err();
        assert!(matches!(err, ScopeError::Io(_)));
    }
}
