use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// Abstract interface for the file system reads the tag cache and search engine perform.
pub trait FileSystem: Send + Sync {
    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Modification time as reported by the file system, at full resolution.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// List all files under `root` whose extension (case-insensitive) is in `extensions`.
    /// Recursive; hidden entries and symlinks are skipped, so nothing outside `root` is listed.
    fn list_files(&self, root: &Path, extensions: &[&str]) -> Vec<PathBuf>;
}

/// Standard implementation of FileSystem using std::fs and walkdir.
pub struct PhysicalFileSystem;

impl FileSystem for PhysicalFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }

    fn list_files(&self, root: &Path, extensions: &[&str]) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                files.push(entry.into_path());
            }
        }

        files
    }
}

pub(crate) fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}
