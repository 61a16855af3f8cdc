//! Recursive content discovery.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

#[derive(Error, Debug)]
#[error("failed to scan content directory {root:?}")]
pub struct ScanError {
    pub root: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Recursively collect every file under `root` whose name ends with
/// `suffix`, in stable lexicographic per-directory order.
///
/// Symlinks are followed. A symlink cycle is logged and skipped instead of
/// looping forever; any other traversal error aborts the scan.
pub fn scan(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError {
            root: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.loop_ancestor().is_some() => {
                warn!(
                    "Skipping symlink cycle at {:?}",
                    err.path().unwrap_or_else(|| Path::new("?"))
                );
                continue;
            }
            Err(err) => {
                let msg = err.to_string();
                return Err(ScanError {
                    root: root.to_path_buf(),
                    source: err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, msg)),
                });
            }
        };
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(suffix) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_finds_nested_files_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("a")).unwrap();
        fs::write(tmp.path().join("z.md"), "z").unwrap();
        fs::write(tmp.path().join("b.md"), "b").unwrap();
        fs::write(tmp.path().join("a/c.md"), "c").unwrap();
        fs::write(tmp.path().join("notes.txt"), "skip").unwrap();

        let found = scan(tmp.path(), ".md").unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(tmp.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a/c.md", "b.md", "z.md"]);
    }

    #[test]
    fn test_scan_matches_suffix_only_at_end() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("post.md"), "ok").unwrap();
        fs::write(tmp.path().join("post.md.bak"), "no").unwrap();

        let found = scan(tmp.path(), ".md").unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("post.md"));
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = scan(&tmp.path().join("absent"), ".md").unwrap_err();
        assert!(err.root.ends_with("absent"));
    }

    #[test]
    fn test_scan_root_must_be_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("content");
        fs::write(&file, "not a dir").unwrap();
        assert!(scan(&file, ".md").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_skips_symlink_cycles() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("post.md"), "ok").unwrap();
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("sub/loop")).unwrap();

        let found = scan(tmp.path(), ".md").unwrap();
        assert_eq!(found.len(), 1);
    }
}
