//! Directory traversal for the manifest builder.

use crate::utils::errors::Result;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Options for directory walking
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Descend into subdirectories; otherwise only the root's own files
    pub recursive: bool,

    /// Follow symbolic links to directories
    pub follow_links: bool,
}

impl WalkOptions {
    pub fn recursive(recursive: bool) -> Self {
        Self {
            recursive,
            ..Self::default()
        }
    }
}

/// A regular file discovered during walking
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Root-joined path to the file
    pub path: PathBuf,

    /// Final path component
    pub file_name: String,

    /// File size in bytes
    pub size: u64,

    pub is_symlink: bool,
}

impl FileInfo {
    /// Create FileInfo from a DirEntry.
    /// Symlinks are resolved to their target; links to directories and
    /// broken links yield `None`.
    fn from_entry(entry: &DirEntry) -> std::io::Result<Option<Self>> {
        let raw_metadata = entry.metadata()?;
        let path = entry.path().to_path_buf();
        let is_symlink = raw_metadata.is_symlink();

        let size = if is_symlink {
            match std::fs::metadata(&path) {
                Ok(resolved) if resolved.is_file() => resolved.len(),
                // Symlink to directory or broken link
                _ => return Ok(None),
            }
        } else if raw_metadata.is_file() {
            raw_metadata.len()
        } else {
            return Ok(None);
        };

        Ok(Some(Self {
            file_name: entry.file_name().to_string_lossy().into_owned(),
            path,
            size,
            is_symlink,
        }))
    }
}

/// Walk a directory tree and collect its regular files, sorted by name
/// within each directory.
///
/// # Example
/// ```no_run
/// use swarm_sync::fs::walker::{walk_directory, WalkOptions};
/// use std::path::Path;
///
/// let files = walk_directory(Path::new("/data"), WalkOptions::recursive(true)).unwrap();
/// println!("Found {} files", files.len());
/// ```
pub fn walk_directory(root: &Path, options: WalkOptions) -> Result<Vec<FileInfo>> {
    let mut files = Vec::new();

    let mut walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name();

    if !options.recursive {
        walker = walker.max_depth(1);
    }

    for entry in walker {
        let entry = entry?;

        if entry.file_type().is_dir() {
            continue;
        }

        if let Some(file_info) = FileInfo::from_entry(&entry)? {
            files.push(file_info);
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(files: &[FileInfo]) -> Vec<&str> {
        files.iter().map(|f| f.file_name.as_str()).collect()
    }

    #[test]
    fn test_walk_empty_directory() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let files = walk_directory(temp_dir.path(), WalkOptions::recursive(true))?;
        assert!(files.is_empty());
        Ok(())
    }

    #[test]
    fn test_walk_top_level_only() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;

        fs::create_dir(temp_dir.path().join("subdir"))?;
        fs::write(temp_dir.path().join("b.txt"), b"content2")?;
        fs::write(temp_dir.path().join("a.txt"), b"content1")?;
        fs::write(temp_dir.path().join("subdir/c.txt"), b"content3")?;

        let files = walk_directory(temp_dir.path(), WalkOptions::recursive(false))?;
        assert_eq!(names(&files), vec!["a.txt", "b.txt"]);
        assert_eq!(files[0].path, temp_dir.path().join("a.txt"));
        assert_eq!(files[0].size, 8);

        Ok(())
    }

    #[test]
    fn test_walk_recursive() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;

        fs::create_dir_all(temp_dir.path().join("x/y"))?;
        fs::write(temp_dir.path().join("root.txt"), b"1")?;
        fs::write(temp_dir.path().join("x/mid.txt"), b"22")?;
        fs::write(temp_dir.path().join("x/y/deep.txt"), b"333")?;

        let files = walk_directory(temp_dir.path(), WalkOptions::recursive(true))?;
        let mut found = names(&files);
        found.sort();
        assert_eq!(found, vec!["deep.txt", "mid.txt", "root.txt"]);
        assert_eq!(files.iter().map(|f| f.size).sum::<u64>(), 6);

        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn test_symlinks() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;

        fs::write(temp_dir.path().join("target.txt"), b"12345")?;
        fs::create_dir(temp_dir.path().join("dir"))?;
        std::os::unix::fs::symlink(
            temp_dir.path().join("target.txt"),
            temp_dir.path().join("link.txt"),
        )?;
        std::os::unix::fs::symlink(temp_dir.path().join("dir"), temp_dir.path().join("dirlink"))?;
        std::os::unix::fs::symlink(
            temp_dir.path().join("missing"),
            temp_dir.path().join("broken"),
        )?;

        let files = walk_directory(temp_dir.path(), WalkOptions::recursive(true))?;
        assert_eq!(names(&files), vec!["link.txt", "target.txt"]);
        assert!(files[0].is_symlink);
        assert_eq!(files[0].size, 5);

        Ok(())
    }

    #[test]
    fn test_missing_root_is_an_error() {
        assert!(walk_directory(Path::new("/nonexistent/root"), WalkOptions::default()).is_err());
    }
}
