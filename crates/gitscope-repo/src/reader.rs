//! Repository queries via git2.
//!
//! Every operation opens its own repository handle and drops it on return.
//! Each query comes in two forms: a `try_*` function returning a `Result`
//! for callers that need to distinguish failure from emptiness, and a plain
//! form that degrades every error to the empty value. The hosting
//! collaborators rely on the degraded form; a repository that is still
//! being created must not fail a request.

use std::path::Path;

use git2::{BranchType, ErrorCode, Oid, Repository, Sort};

use gitscope_core::{CommitInfo, RepositoryStats, Result, ScopeError};

use crate::stats::dir_size;

/// Whether a readable git repository exists at `path`.
///
/// Never errors; an unreadable or invalid path is simply `false`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use gitscope_repo::reader::repository_exists;
///
/// assert!(!repository_exists(Path::new("/definitely/not/a/repo")));
/// ```
pub fn repository_exists(path: &Path) -> bool {
    Repository::open(path).is_ok()
}

/// Create a bare repository at `path`, creating parent directories as
/// needed. Returns `false` on any failure.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use gitscope_repo::reader::init_repository;
///
/// assert!(init_repository(Path::new("/srv/repos/demo.git")));
/// ```
pub fn init_repository(path: &Path) -> bool {
    try_init_repository(path).is_ok()
}

/// Fallible form of [`init_repository`].
///
/// # Errors
///
/// Returns [`ScopeError::Io`] if the parent directories cannot be created,
/// or [`ScopeError::Git`] if repository initialization fails.
pub fn try_init_repository(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Repository::init_bare(path)
        .map_err(|e| ScopeError::Git(format!("failed to init repository: {e}")))?;
    Ok(())
}

/// Up to `limit` commits reachable from HEAD, newest first.
///
/// Degrades to an empty list for an invalid path, a corrupt repository, or
/// an unborn HEAD.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use gitscope_repo::reader::commits;
///
/// for c in commits(Path::new("/srv/repos/demo.git"), 20) {
///     println!("{} {}", &c.sha[..8], c.message);
/// }
/// ```
pub fn commits(path: &Path, limit: usize) -> Vec<CommitInfo> {
    try_commits(path, limit).unwrap_or_default()
}

/// Fallible form of [`commits`]. An unborn HEAD is still `Ok(empty)`; a
/// repository with no commits yet is not a failure.
///
/// # Errors
///
/// Returns [`ScopeError::Git`] if the repository cannot be opened or walked.
pub fn try_commits(path: &Path, limit: usize) -> Result<Vec<CommitInfo>> {
    let repo = open(path)?;
    let mut revwalk = repo
        .revwalk()
        .map_err(|e| ScopeError::Git(format!("failed to create revwalk: {e}")))?;
    revwalk.set_sorting(Sort::TIME).ok();

    if let Err(e) = revwalk.push_head() {
        if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) {
            return Ok(Vec::new());
        }
        return Err(ScopeError::Git(format!("failed to push HEAD: {e}")));
    }

    collect_commits(&repo, revwalk, limit)
}

/// Friendly names of all local branches; empty on any access failure.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use gitscope_repo::reader::branches;
///
/// let names = branches(Path::new("/srv/repos/demo.git"));
/// assert!(names.iter().all(|n| !n.starts_with("refs/")));
/// ```
pub fn branches(path: &Path) -> Vec<String> {
    try_branches(path).unwrap_or_default()
}

/// Fallible form of [`branches`].
///
/// # Errors
///
/// Returns [`ScopeError::Git`] if the repository or its refs cannot be read.
pub fn try_branches(path: &Path) -> Result<Vec<String>> {
    let repo = open(path)?;
    let mut names = Vec::new();
    let iter = repo
        .branches(Some(BranchType::Local))
        .map_err(|e| ScopeError::Git(format!("failed to list branches: {e}")))?;
    for entry in iter {
        let (branch, _) = entry.map_err(|e| ScopeError::Git(format!("branch entry: {e}")))?;
        let name = branch
            .name()
            .map_err(|e| ScopeError::Git(format!("branch name: {e}")))?;
        if let Some(name) = name {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Commits reachable from `source`'s tip but not from `target`'s tip, the
/// "ahead" set, newest first. Empty if either branch is missing.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use gitscope_repo::reader::commits_between;
///
/// let ahead = commits_between(Path::new("/srv/repos/demo.git"), "feature", "main");
/// println!("{} commits ahead", ahead.len());
/// ```
pub fn commits_between(path: &Path, source: &str, target: &str) -> Vec<CommitInfo> {
    try_commits_between(path, source, target).unwrap_or_default()
}

/// Fallible form of [`commits_between`]. A missing branch is still
/// `Ok(empty)`.
///
/// # Errors
///
/// Returns [`ScopeError::Git`] if the repository cannot be opened or walked.
pub fn try_commits_between(path: &Path, source: &str, target: &str) -> Result<Vec<CommitInfo>> {
    let repo = open(path)?;
    let (Some(source_tip), Some(target_tip)) = (branch_tip(&repo, source), branch_tip(&repo, target))
    else {
        return Ok(Vec::new());
    };

    let mut revwalk = repo
        .revwalk()
        .map_err(|e| ScopeError::Git(format!("failed to create revwalk: {e}")))?;
    revwalk.set_sorting(Sort::TIME).ok();
    revwalk
        .push(source_tip)
        .map_err(|e| ScopeError::Git(format!("failed to push source tip: {e}")))?;
    revwalk
        .hide(target_tip)
        .map_err(|e| ScopeError::Git(format!("failed to hide target tip: {e}")))?;

    collect_commits(&repo, revwalk, usize::MAX)
}

/// Aggregate statistics for the repository at `path`.
///
/// Branch count and on-disk size are always computed; commit count and last
/// commit timestamp only when HEAD resolves to a real commit, so a freshly
/// initialized repository reports zeros instead of failing.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use gitscope_repo::reader::stats;
///
/// let s = stats(Path::new("/srv/repos/demo.git"));
/// println!("{} commits on {} branches", s.commit_count, s.branch_count);
/// ```
pub fn stats(path: &Path) -> RepositoryStats {
    try_stats(path).unwrap_or_default()
}

/// Fallible form of [`stats`].
///
/// # Errors
///
/// Returns [`ScopeError::Git`] if the repository cannot be opened.
pub fn try_stats(path: &Path) -> Result<RepositoryStats> {
    let repo = open(path)?;

    let branch_count = repo
        .branches(Some(BranchType::Local))
        .map(|iter| iter.filter_map(|b| b.ok()).count() as u64)
        .unwrap_or(0);

    let mut result = RepositoryStats {
        commit_count: 0,
        branch_count,
        size_bytes: dir_size(repo.path()),
        last_commit_timestamp: None,
    };

    // HEAD of a repository with no commits yet does not resolve; leave the
    // commit fields at their defaults.
    let Some(head_oid) = repo.head().ok().and_then(|h| h.target()) else {
        return Ok(result);
    };

    if let Ok(commit) = repo.find_commit(head_oid) {
        result.last_commit_timestamp = Some(commit.time().seconds());
    }
    if let Ok(mut revwalk) = repo.revwalk() {
        if revwalk.push(head_oid).is_ok() {
            result.commit_count = revwalk.filter(|oid| oid.is_ok()).count() as u64;
        }
    }

    Ok(result)
}

pub(crate) fn open(path: &Path) -> Result<Repository> {
    Repository::open(path).map_err(|e| ScopeError::Git(format!("failed to open repository: {e}")))
}

pub(crate) fn branch_tip(repo: &Repository, name: &str) -> Option<Oid> {
    repo.find_branch(name, BranchType::Local)
        .ok()?
        .get()
        .target()
}

fn collect_commits(
    repo: &Repository,
    revwalk: git2::Revwalk<'_>,
    limit: usize,
) -> Result<Vec<CommitInfo>> {
    let mut commits = Vec::new();
    for oid_result in revwalk.take(limit) {
        let oid = oid_result.map_err(|e| ScopeError::Git(format!("revwalk error: {e}")))?;
        commits.push(commit_info(repo, oid)?);
    }
    Ok(commits)
}

fn commit_info(repo: &Repository, oid: Oid) -> Result<CommitInfo> {
    let commit = repo
        .find_commit(oid)
        .map_err(|e| ScopeError::Git(format!("failed to find commit: {e}")))?;
    let author = commit.author();
    Ok(CommitInfo {
        sha: oid.to_string(),
        message: commit
            .message()
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .to_string(),
        author: author.name().unwrap_or("unknown").to_string(),
        email: author.email().unwrap_or("unknown").to_string(),
        timestamp: commit.time().seconds(),
    })
}
