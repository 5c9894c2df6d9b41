//! File helpers for the notes tree
//!
//! Relative path rendering, folder enumeration, note writes, and filename sanitizing.

use chrono::{DateTime, Local};
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::vfs;

pub const NOTE_EXTENSIONS: &[&str] = &["md"];
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp"];

/// Folder holding note templates, relative to the notes root
pub const TEMPLATES_FOLDER: &str = "_templates";

/// Sanitize an uploaded filename stem (e.g. "My Photo (1)" -> "my-photo-1")
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join("-")
}

/// Write a note file (creates parent directories as needed)
pub fn write_note(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Relative path from `root` for a file, always `/`-separated
pub fn relative_path(root: &Path, file_path: &Path) -> Option<String> {
    let rel = file_path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

/// Folder part of a relative path, empty for files at the root
pub fn parent_folder(rel_path: &str) -> String {
    rel_path
        .rsplit_once('/')
        .map(|(folder, _)| folder.to_string())
        .unwrap_or_default()
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn format_time(t: SystemTime) -> String {
    let datetime: DateTime<Local> = t.into();
    datetime.to_rfc3339()
}

/// Every folder under `root` (including empty ones), relative and sorted.
/// Hidden folders and their contents are skipped.
pub fn list_folders(root: &Path) -> Vec<String> {
    let mut folders: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !vfs::is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| relative_path(root, e.path()))
        .collect();
    folders.sort();
    folders
}

/// Remove `dir` if it is empty and not `root` itself
pub fn remove_if_empty(root: &Path, dir: &Path) {
    if dir == root {
        return;
    }
    let is_empty = fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);
    if is_empty {
        // Another writer may have raced a file in; leaving the folder is fine.
        let _ = fs::remove_dir(dir);
    }
}
