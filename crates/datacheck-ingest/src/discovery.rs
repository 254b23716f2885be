//! Recursive discovery of supported data files.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Extensions the loaders understand.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["json", "jsonl", "csv"];

/// Recursively collect all supported data files under `dir`, sorted by path.
pub fn discover_data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    collect(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect(&path, files)?;
        } else if is_supported(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finds_supported_files_recursively() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir(dir.path().join("nested")).expect("mkdir");
        for name in ["a.json", "b.jsonl", "c.csv", "skip.txt", "nested/d.JSON"] {
            std::fs::write(dir.path().join(name), "[]").expect("write");
        }

        let files = discover_data_files(dir.path()).expect("discover");
        let names: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(dir.path())
                    .expect("prefix")
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, vec!["a.json", "b.jsonl", "c.csv", "nested/d.JSON"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let error = discover_data_files(Path::new("/definitely/not/here")).expect_err("must fail");
        assert!(matches!(error, IngestError::DirectoryNotFound { .. }));
    }
}
