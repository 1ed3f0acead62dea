use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Snapshot of a single commit, created per query and never persisted.
///
/// # Examples
///
/// ```
/// use gitscope_core::CommitInfo;
///
/// let info = CommitInfo {
///     sha: "a".repeat(40),
///     message: "fix: tolerate unborn HEAD".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: 1700000000,
/// };
/// assert_eq!(info.sha.len(), 40);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    /// Full 40-character commit hash.
    pub sha: String,
    /// First line of the commit message.
    pub message: String,
    /// Author name.
    pub author: String,
    /// Author email.
    pub email: String,
    /// Unix timestamp of the commit.
    pub timestamp: i64,
}

/// Aggregate repository statistics, recomputed on demand.
///
/// On a freshly initialized repository with no commits, `commit_count` is 0
/// and `last_commit_timestamp` is `None` while `branch_count` and
/// `size_bytes` are still meaningful.
///
/// # Examples
///
/// ```
/// use gitscope_core::RepositoryStats;
///
/// let stats = RepositoryStats::default();
/// assert_eq!(stats.commit_count, 0);
/// assert!(stats.last_commit_timestamp.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStats {
    /// Commits reachable from HEAD.
    pub commit_count: u64,
    /// Local branches.
    pub branch_count: u64,
    /// Total bytes on disk under the repository storage directory.
    pub size_bytes: u64,
    /// Unix timestamp of the commit HEAD points at, if any.
    pub last_commit_timestamp: Option<i64>,
}

/// Normalized classification of a changed file.
///
/// # Examples
///
/// ```
/// use gitscope_core::FileChangeStatus;
///
/// assert_eq!(FileChangeStatus::Renamed.to_string(), "renamed");
/// let s: FileChangeStatus = serde_json::from_str("\"added\"").unwrap();
/// assert_eq!(s, FileChangeStatus::Added);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileChangeStatus {
    /// New file.
    Added,
    /// Existing file changed in place.
    Modified,
    /// File removed.
    Deleted,
    /// File moved to a new path.
    Renamed,
    /// File duplicated from another path.
    Copied,
}

impl fmt::Display for FileChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileChangeStatus::Added => write!(f, "added"),
            FileChangeStatus::Modified => write!(f, "modified"),
            FileChangeStatus::Deleted => write!(f, "deleted"),
            FileChangeStatus::Renamed => write!(f, "renamed"),
            FileChangeStatus::Copied => write!(f, "copied"),
        }
    }
}

/// Classification of a single line inside a diff hunk.
///
/// # Examples
///
/// ```
/// use gitscope_core::DiffLineKind;
///
/// assert_eq!(DiffLineKind::Addition.marker(), '+');
/// assert_eq!(DiffLineKind::Context.marker(), ' ');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffLineKind {
    /// Unchanged line present in both versions.
    Context,
    /// Line present only in the new version.
    Addition,
    /// Line present only in the old version.
    Deletion,
}

impl DiffLineKind {
    /// The unified-diff marker character for this kind.
    ///
    /// Prepending the marker to a line's content reproduces the original
    /// hunk body text.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitscope_core::DiffLineKind;
    ///
    /// assert_eq!(DiffLineKind::Deletion.marker(), '-');
    /// ```
    pub fn marker(self) -> char {
        match self {
            DiffLineKind::Context => ' ',
            DiffLineKind::Addition => '+',
            DiffLineKind::Deletion => '-',
        }
    }
}

/// One addressable line of a parsed diff hunk.
///
/// Addition lines carry only `new_line`, deletion lines only `old_line`,
/// and context lines carry both.
///
/// # Examples
///
/// ```
/// use gitscope_core::{DiffLine, DiffLineKind};
///
/// let line = DiffLine {
///     kind: DiffLineKind::Addition,
///     content: "let x = 1;".into(),
///     old_line: None,
///     new_line: Some(12),
/// };
/// assert!(line.old_line.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    /// Line classification.
    pub kind: DiffLineKind,
    /// Line text with the leading marker stripped.
    pub content: String,
    /// 1-based line number in the old version, if the line existed there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_line: Option<u32>,
    /// 1-based line number in the new version, if the line exists there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_line: Option<u32>,
}

/// One contiguous change region of a unified diff.
///
/// # Examples
///
/// ```
/// use gitscope_core::DiffHunk;
///
/// let hunk = DiffHunk {
///     old_start: 10,
///     old_lines: 3,
///     new_start: 12,
///     new_lines: 5,
///     header: "@@ -10,3 +12,5 @@ fn main()".into(),
///     lines: Vec::new(),
/// };
/// assert_eq!(hunk.new_start, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHunk {
    /// 1-based starting line in the old version.
    pub old_start: u32,
    /// Line count in the old version (1 when omitted from the header).
    pub old_lines: u32,
    /// 1-based starting line in the new version.
    pub new_start: u32,
    /// Line count in the new version (1 when omitted from the header).
    pub new_lines: u32,
    /// The `@@` header line, verbatim.
    pub header: String,
    /// Parsed lines in order of appearance.
    pub lines: Vec<DiffLine>,
}

/// A single changed file within a branch-to-branch diff.
///
/// # Examples
///
/// ```
/// use gitscope_core::{FileChangeInfo, FileChangeStatus};
///
/// let file = FileChangeInfo {
///     path: "src/server.rs".into(),
///     old_path: None,
///     status: FileChangeStatus::Modified,
///     additions: 4,
///     deletions: 1,
///     patch: String::new(),
///     hunks: Vec::new(),
/// };
/// assert_eq!(file.status, FileChangeStatus::Modified);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChangeInfo {
    /// Path in the new version (old version for deleted files).
    pub path: String,
    /// Previous path, set only for renames where it differs from `path`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    /// Normalized change classification.
    pub status: FileChangeStatus,
    /// Added lines across all hunks.
    pub additions: u64,
    /// Deleted lines across all hunks.
    pub deletions: u64,
    /// Raw unified-diff text for this file.
    pub patch: String,
    /// Parsed hunks in patch order.
    pub hunks: Vec<DiffHunk>,
}

/// Complete branch-to-branch diff with per-file detail and totals.
///
/// `total_files_changed` always equals `files.len()`, and the totals always
/// equal the sums of the per-file counts; construct through
/// [`DiffResult::from_files`] to keep that true.
///
/// # Examples
///
/// ```
/// use gitscope_core::DiffResult;
///
/// let empty = DiffResult::default();
/// assert_eq!(empty.total_files_changed, 0);
/// assert_eq!(empty.total_additions, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    /// Changed files in the order the diff produced them.
    pub files: Vec<FileChangeInfo>,
    /// Sum of per-file additions.
    pub total_additions: u64,
    /// Sum of per-file deletions.
    pub total_deletions: u64,
    /// Number of changed files.
    pub total_files_changed: usize,
}

impl DiffResult {
    /// Build a result from per-file entries, deriving the totals.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitscope_core::{DiffResult, FileChangeInfo, FileChangeStatus};
    ///
    /// let file = FileChangeInfo {
    ///     path: "a.txt".into(),
    ///     old_path: None,
    ///     status: FileChangeStatus::Added,
    ///     additions: 3,
    ///     deletions: 0,
    ///     patch: String::new(),
    ///     hunks: Vec::new(),
    /// };
    /// let result = DiffResult::from_files(vec![file]);
    /// assert_eq!(result.total_files_changed, 1);
    /// assert_eq!(result.total_additions, 3);
    /// ```
    pub fn from_files(files: Vec<FileChangeInfo>) -> Self {
        let total_additions = files.iter().map(|f| f.additions).sum();
        let total_deletions = files.iter().map(|f| f.deletions).sum();
        let total_files_changed = files.len();
        Self {
            files,
            total_additions,
            total_deletions,
            total_files_changed,
        }
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument
/// parsing.
///
/// # Examples
///
/// ```
/// use gitscope_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_info_serializes_camel_case() {
        let info = CommitInfo {
            sha: "b".repeat(40),
            message: "initial".into(),
            author: "bob".into(),
            email: "bob@example.com".into(),
            timestamp: 1700000000,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("timestamp").is_some());
        assert_eq!(json.get("message").unwrap(), "initial");
    }

    #[test]
    fn stats_serialize_camel_case() {
        let stats = RepositoryStats {
            commit_count: 3,
            branch_count: 2,
            size_bytes: 4096,
            last_commit_timestamp: Some(1700000000),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("commitCount").is_some());
        assert!(json.get("lastCommitTimestamp").is_some());
        assert!(json.get("commit_count").is_none());
    }

    #[test]
    fn status_roundtrips_through_json() {
        let json = serde_json::to_string(&FileChangeStatus::Copied).unwrap();
        assert_eq!(json, "\"copied\"");
        let parsed: FileChangeStatus = serde_json::from_str("\"deleted\"").unwrap();
        assert_eq!(parsed, FileChangeStatus::Deleted);
    }

    #[test]
    fn status_display() {
        assert_eq!(FileChangeStatus::Added.to_string(), "added");
        assert_eq!(FileChangeStatus::Modified.to_string(), "modified");
        assert_eq!(FileChangeStatus::Deleted.to_string(), "deleted");
        assert_eq!(FileChangeStatus::Renamed.to_string(), "renamed");
        assert_eq!(FileChangeStatus::Copied.to_string(), "copied");
    }

    #[test]
    fn line_kind_markers() {
        assert_eq!(DiffLineKind::Context.marker(), ' ');
        assert_eq!(DiffLineKind::Addition.marker(), '+');
        assert_eq!(DiffLineKind::Deletion.marker(), '-');
    }

    #[test]
    fn diff_line_omits_absent_numbers_in_json() {
        let line = DiffLine {
            kind: DiffLineKind::Deletion,
            content: "old".into(),
            old_line: Some(7),
            new_line: None,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json.get("oldLine").unwrap(), 7);
        assert!(json.get("newLine").is_none());
    }

    #[test]
    fn from_files_derives_totals() {
        let mk = |adds: u64, dels: u64| FileChangeInfo {
            path: "f".into(),
            old_path: None,
            status: FileChangeStatus::Modified,
            additions: adds,
            deletions: dels,
            patch: String::new(),
            hunks: Vec::new(),
        };
        let result = DiffResult::from_files(vec![mk(2, 1), mk(5, 0)]);
        assert_eq!(result.total_files_changed, 2);
        assert_eq!(result.total_additions, 7);
        assert_eq!(result.total_deletions, 1);
    }

    #[test]
    fn from_files_empty_is_default() {
        assert_eq!(DiffResult::from_files(Vec::new()), DiffResult::default());
    }

    #[test]
    fn old_path_skipped_when_none() {
        let file = FileChangeInfo {
            path: "kept.rs".into(),
            old_path: None,
            status: FileChangeStatus::Modified,
            additions: 0,
            deletions: 0,
            patch: String::new(),
            hunks: Vec::new(),
        };
        let json = serde_json::to_value(&file).unwrap();
        assert!(json.get("oldPath").is_none());
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "md".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_default_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
