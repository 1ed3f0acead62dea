//! On-disk size measurement for repository storage directories.

use std::path::Path;

/// Recursive sum of file byte lengths under `path`.
///
/// Degrades to 0 on any access error (missing directory, permissions) and
/// does not follow symlinks. A bare repository's object store lives
/// directly under its path, so this measures the whole repository.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use gitscope_repo::stats::dir_size;
///
/// assert_eq!(dir_size(Path::new("/no/such/directory")), 0);
/// ```
pub fn dir_size(path: &Path) -> u64 {
    let Ok(entries) = std::fs::read_dir(path) else {
        return 0;
    };

    let mut total = 0;
    for entry in entries.flatten() {
        // DirEntry::metadata does not traverse symlinks.
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if meta.is_dir() {
            total += dir_size(&entry.path());
        } else if meta.is_file() {
            total += meta.len();
        }
    }
    total
}
