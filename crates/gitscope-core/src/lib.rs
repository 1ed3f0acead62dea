//! Core types, configuration, and error handling for gitscope.
//!
//! This crate provides the shared foundation used by the other gitscope
//! crates:
//! - [`ScopeError`] — unified error type using `thiserror`
//! - [`ScopeConfig`] — configuration loaded from `.gitscope.toml`
//! - The data model: [`CommitInfo`], [`RepositoryStats`], [`DiffResult`],
//!   [`FileChangeInfo`], [`DiffHunk`], [`DiffLine`], [`FileChangeStatus`],
//!   [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{DiffConfig, LogConfig, ScopeConfig};
pub use error::ScopeError;
pub use types::{
    CommitInfo, DiffHunk, DiffLine, DiffLineKind, DiffResult, FileChangeInfo, FileChangeStatus,
    OutputFormat, RepositoryStats,
};

/// A convenience `Result` type for gitscope operations.
pub type Result<T> = std::result::Result<T, ScopeError>;
