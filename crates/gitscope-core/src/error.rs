/// Errors that can occur across the gitscope crates.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette::Report` at the boundary.
/// The public degrade-to-empty operations in `gitscope-repo` never surface
/// this type at all; it is the currency of the fallible `try_*` layer.
///
/// # Examples
///
/// ```
/// use gitscope_core::ScopeError;
///
/// let err = ScopeError::Git("reference not found".into());
/// assert!(err.to_string().contains("reference not found"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Git operation failure.
    #[error("git error: {0}")]
    Git(String),

    /// Patch or header text that could not be understood.
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
