//! Branch-to-branch diffing and change classification.
//!
//! Resolves two branch tips, asks git2 for the tree-to-tree patch set with
//! the target tree as base and the source tree as head (the diff a pull
//! request preview needs), and turns every delta into a classified
//! [`FileChangeInfo`] whose hunks come from the unified-diff parser.

use std::path::Path;

use git2::{Delta, DiffFindOptions, DiffOptions, Patch, Repository};

use gitscope_core::{
    DiffConfig, DiffHunk, DiffLineKind, DiffResult, FileChangeInfo, FileChangeStatus, Result,
    ScopeError,
};
use gitscope_patch::parse_patch;

use crate::reader::{branch_tip, open};

/// Map a raw git delta kind to the normalized change status.
///
/// Exhaustive over the kinds this engine reports; anything unrecognized
/// falls back to `Modified` so a changed file is never dropped.
///
/// # Examples
///
/// ```
/// use git2::Delta;
/// use gitscope_core::FileChangeStatus;
/// use gitscope_repo::diff::classify;
///
/// assert_eq!(classify(Delta::Added), FileChangeStatus::Added);
/// assert_eq!(classify(Delta::Typechange), FileChangeStatus::Modified);
/// ```
pub fn classify(delta: Delta) -> FileChangeStatus {
    match delta {
        Delta::Added => FileChangeStatus::Added,
        Delta::Deleted => FileChangeStatus::Deleted,
        Delta::Modified => FileChangeStatus::Modified,
        Delta::Renamed => FileChangeStatus::Renamed,
        Delta::Copied => FileChangeStatus::Copied,
        _ => FileChangeStatus::Modified,
    }
}

/// Structured diff of everything `source` would apply on top of `target`.
///
/// Degrades to the empty [`DiffResult`] when the repository is unavailable,
/// either branch is missing, or anything fails mid-computation; "no diff
/// available" is a valid, representable state.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use gitscope_core::DiffConfig;
/// use gitscope_repo::diff::diff_between;
///
/// let result = diff_between(
///     Path::new("/srv/repos/demo.git"),
///     "feature",
///     "main",
///     &DiffConfig::default(),
/// );
/// println!("+{} -{}", result.total_additions, result.total_deletions);
/// ```
pub fn diff_between(path: &Path, source: &str, target: &str, config: &DiffConfig) -> DiffResult {
    try_diff_between(path, source, target, config).unwrap_or_default()
}

/// Fallible form of [`diff_between`]. Missing branches are still
/// `Ok(empty)`.
///
/// # Errors
///
/// Returns [`ScopeError::Git`] if the repository cannot be opened or the
/// diff cannot be computed.
pub fn try_diff_between(
    path: &Path,
    source: &str,
    target: &str,
    config: &DiffConfig,
) -> Result<DiffResult> {
    let repo = open(path)?;
    let (Some(source_tip), Some(target_tip)) = (branch_tip(&repo, source), branch_tip(&repo, target))
    else {
        return Ok(DiffResult::default());
    };

    let source_tree = tree_of(&repo, source_tip)?;
    let target_tree = tree_of(&repo, target_tip)?;

    let mut diff_opts = DiffOptions::new();
    diff_opts.context_lines(config.context_lines);
    let mut diff = repo
        .diff_tree_to_tree(Some(&target_tree), Some(&source_tree), Some(&mut diff_opts))
        .map_err(|e| ScopeError::Git(format!("failed to compute diff: {e}")))?;

    if config.find_renames || config.find_copies {
        let mut find_opts = DiffFindOptions::new();
        find_opts
            .renames(config.find_renames)
            .copies(config.find_copies);
        diff.find_similar(Some(&mut find_opts))
            .map_err(|e| ScopeError::Git(format!("failed to detect renames: {e}")))?;
    }

    let mut files = Vec::new();
    for idx in 0..diff.deltas().len() {
        let Some(delta) = diff.get_delta(idx) else {
            continue;
        };

        let status = classify(delta.status());
        let file_path = delta
            .new_file()
            .path()
            .or_else(|| delta.old_file().path())
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        if file_path.is_empty() {
            continue;
        }

        let old_path = if status == FileChangeStatus::Renamed {
            delta
                .old_file()
                .path()
                .map(|p| p.to_string_lossy().into_owned())
                .filter(|old| *old != file_path)
        } else {
            None
        };

        // Binary deltas have no text patch; they still count as a changed
        // file with zero line counts.
        let patch = match Patch::from_diff(&diff, idx) {
            Ok(Some(mut patch)) => patch
                .to_buf()
                .ok()
                .and_then(|buf| buf.as_str().map(str::to_string))
                .unwrap_or_default(),
            _ => String::new(),
        };

        let hunks = parse_patch(&patch);
        let additions = count_lines(&hunks, DiffLineKind::Addition);
        let deletions = count_lines(&hunks, DiffLineKind::Deletion);

        files.push(FileChangeInfo {
            path: file_path,
            old_path,
            status,
            additions,
            deletions,
            patch,
            hunks,
        });
    }

    Ok(DiffResult::from_files(files))
}

fn tree_of<'r>(repo: &'r Repository, oid: git2::Oid) -> Result<git2::Tree<'r>> {
    repo.find_commit(oid)
        .and_then(|c| c.tree())
        .map_err(|e| ScopeError::Git(format!("failed to get tree: {e}")))
}

fn count_lines(hunks: &[DiffHunk], kind: DiffLineKind) -> u64 {
    hunks
        .iter()
        .flat_map(|h| &h.lines)
        .filter(|l| l.kind == kind)
        .count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_covers_primary_kinds() {
        assert_eq!(classify(Delta::Added), FileChangeStatus::Added);
        assert_eq!(classify(Delta::Deleted), FileChangeStatus::Deleted);
        assert_eq!(classify(Delta::Modified), FileChangeStatus::Modified);
        assert_eq!(classify(Delta::Renamed), FileChangeStatus::Renamed);
        assert_eq!(classify(Delta::Copied), FileChangeStatus::Copied);
    }

    #[test]
    fn classify_falls_back_to_modified() {
        assert_eq!(classify(Delta::Unmodified), FileChangeStatus::Modified);
        assert_eq!(classify(Delta::Ignored), FileChangeStatus::Modified);
        assert_eq!(classify(Delta::Untracked), FileChangeStatus::Modified);
        assert_eq!(classify(Delta::Typechange), FileChangeStatus::Modified);
        assert_eq!(classify(Delta::Unreadable), FileChangeStatus::Modified);
        assert_eq!(classify(Delta::Conflicted), FileChangeStatus::Modified);
    }

    #[test]
    fn unavailable_repository_degrades_to_empty() {
        let result = diff_between(
            Path::new("/no/such/path"),
            "feature",
            "main",
            &DiffConfig::default(),
        );
        assert_eq!(result, DiffResult::default());
    }
}
