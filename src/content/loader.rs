//! Content loader - reads post and page sources from disk

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Read the source text of `id` from `dir`.
///
/// Ids are plain file names; anything that could escape `dir` is treated as
/// not found.
pub fn read_source(dir: &Path, id: &str) -> Result<String> {
    if !is_valid_id(id) {
        return Err(Error::SourceFileMissing { id: id.to_string() });
    }

    let path = dir.join(id);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(Error::SourceFileMissing { id: id.to_string() })
        }
        Err(e) => Err(Error::io(path, e)),
    }
}

/// List post files directly inside `dir`, sorted by file name.
///
/// Hidden files and subdirectories are skipped. The returned order is the
/// scan order the index is built in.
pub fn list_sources(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        return Err(Error::io(
            dir,
            std::io::Error::new(ErrorKind::NotFound, "posts directory not found"),
        ));
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Error::io(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!("Skipping non UTF-8 file name {:?}", entry.path());
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        sources.push((name.to_string(), entry.path().to_path_buf()));
    }

    Ok(sources)
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id.contains(['/', '\\'])
        && Path::new(id).components().count() == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_source() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hello.md"), "hi").unwrap();

        assert_eq!(read_source(dir.path(), "hello.md").unwrap(), "hi");
        assert!(matches!(
            read_source(dir.path(), "missing.md"),
            Err(Error::SourceFileMissing { .. })
        ));
    }

    #[test]
    fn test_read_source_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("posts");
        fs::create_dir(&posts).unwrap();
        fs::write(dir.path().join("secret.md"), "no").unwrap();

        for id in ["../secret.md", "", "..", "sub/x.md"] {
            assert!(
                matches!(read_source(&posts, id), Err(Error::SourceFileMissing { .. })),
                "id {:?} should be rejected",
                id
            );
        }
    }

    #[test]
    fn test_list_sources_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.md"), "").unwrap();
        fs::write(dir.path().join("a.md"), "").unwrap();
        fs::write(dir.path().join(".hidden.md"), "").unwrap();
        fs::create_dir(dir.path().join("drafts")).unwrap();
        fs::write(dir.path().join("drafts").join("c.md"), "").unwrap();

        let names: Vec<_> = list_sources(dir.path())
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[test]
    fn test_list_sources_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            list_sources(&dir.path().join("nope")),
            Err(Error::Io { .. })
        ));
    }
}
