//! Filesystem-backed note storage
//!
//! Every path a caller passes is relative to the notes root and goes through
//! [`PathGuard`]. Tags come from the shared [`TagCache`]; structural changes
//! evict cache entries before the filesystem is touched.

use notes_types::{NoteContent, NoteKind, NoteMetadata, NoteRecord, SearchResult, TagCount};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::file_ops::{self, IMAGE_EXTENSIONS, NOTE_EXTENSIONS};
use super::frontmatter;
use super::path_guard::PathGuard;
use super::search::SearchEngine;
use super::tag_cache::TagCache;
use super::templates;
use crate::error::{NotesError, NotesResult};
use crate::vfs::FileSystem;

pub struct NoteStore {
    guard: PathGuard,
    fs: Arc<dyn FileSystem>,
    tags: Arc<TagCache>,
    search: SearchEngine,
}

impl NoteStore {
    /// Open the store rooted at `notes_dir`, creating the directory if needed.
    pub fn new(notes_dir: &Path, fs: Arc<dyn FileSystem>, tags: Arc<TagCache>) -> io::Result<Self> {
        fs::create_dir_all(notes_dir)?;
        let guard = PathGuard::new(notes_dir)?;
        log::info!("[NOTES] Serving notes from {}", guard.root().display());

        Ok(Self {
            guard,
            search: SearchEngine::new(fs.clone()),
            fs,
            tags,
        })
    }

    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    pub fn tag_cache(&self) -> &TagCache {
        &self.tags
    }

    // --- Listing ---

    /// Notes and images under the root, newest first. Notes carry their tags.
    pub fn list_notes(&self) -> Vec<NoteRecord> {
        let mut records = self.records(NOTE_EXTENSIONS, NoteKind::Note);
        records.extend(self.records(IMAGE_EXTENSIONS, NoteKind::Image));
        newest_first(records)
    }

    /// Images under the root, newest first.
    pub fn list_images(&self) -> Vec<NoteRecord> {
        newest_first(self.records(IMAGE_EXTENSIONS, NoteKind::Image))
    }

    fn records(&self, extensions: &[&str], kind: NoteKind) -> Vec<(SystemTime, NoteRecord)> {
        self.fs
            .list_files(self.root(), extensions)
            .into_iter()
            .filter_map(|file| self.record_for(&file, kind))
            .collect()
    }

    fn record_for(&self, file: &Path, kind: NoteKind) -> Option<(SystemTime, NoteRecord)> {
        // Files can vanish between enumeration and stat; skip them.
        let metadata = fs::metadata(file).ok()?;
        let modified = metadata.modified().ok()?;
        let path = file_ops::relative_path(self.root(), file)?;
        let tags = match kind {
            NoteKind::Note => self.tags.get_tags(file),
            NoteKind::Image => Vec::new(),
        };

        let record = NoteRecord {
            name: file_ops::file_stem(file),
            folder: file_ops::parent_folder(&path),
            path,
            modified: file_ops::format_time(modified),
            size: metadata.len(),
            kind,
            tags,
        };
        Some((modified, record))
    }

    // --- Folders ---

    pub fn list_folders(&self) -> Vec<String> {
        file_ops::list_folders(self.root())
    }

    pub fn create_folder(&self, path: &str) -> NotesResult<()> {
        let full = self.guard.resolve(path)?;
        if full == self.root() {
            return Err(NotesError::InvalidName(path.to_string()));
        }
        fs::create_dir_all(&full)?;
        log::info!("[NOTES] Created folder {}", path);
        Ok(())
    }

    /// Move a folder with everything in it. Fails if the target exists.
    pub fn move_folder(&self, old_path: &str, new_path: &str) -> NotesResult<()> {
        let old_full = self.guard.resolve(old_path)?;
        let new_full = self.guard.resolve(new_path)?;

        if old_full == self.root() || new_full == self.root() {
            return Err(NotesError::InvalidName(old_path.to_string()));
        }
        if !old_full.exists() {
            return Err(NotesError::NotFound(old_path.to_string()));
        }
        if !old_full.is_dir() {
            return Err(NotesError::NotADirectory(old_path.to_string()));
        }
        if new_full.exists() {
            return Err(NotesError::AlreadyExists(new_path.to_string()));
        }
        if new_full.starts_with(&old_full) {
            return Err(NotesError::InvalidName(new_path.to_string()));
        }

        self.tags.invalidate_prefix(&old_full);
        create_parent(&new_full)?;
        fs::rename(&old_full, &new_full)?;
        log::info!("[NOTES] Moved folder {} -> {}", old_path, new_path);
        Ok(())
    }

    pub fn rename_folder(&self, old_path: &str, new_path: &str) -> NotesResult<()> {
        self.move_folder(old_path, new_path)
    }

    /// Delete a folder and all of its contents.
    pub fn delete_folder(&self, path: &str) -> NotesResult<()> {
        let full = self.guard.resolve(path)?;
        if full == self.root() {
            return Err(NotesError::InvalidName(path.to_string()));
        }
        if !full.exists() {
            return Err(NotesError::NotFound(path.to_string()));
        }
        if !full.is_dir() {
            return Err(NotesError::NotADirectory(path.to_string()));
        }

        self.tags.invalidate_prefix(&full);
        fs::remove_dir_all(&full)?;
        log::info!("[NOTES] Deleted folder {}", path);
        Ok(())
    }

    // --- Notes ---

    pub fn get_note(&self, path: &str) -> NotesResult<NoteContent> {
        let full = self.existing_file(path)?;
        let content = fs::read_to_string(&full)?;

        Ok(NoteContent {
            path: path.to_string(),
            tags: self.tags.get_tags(&full),
            links: frontmatter::extract_wikilinks(&content),
            content,
        })
    }

    /// Write a note, appending `.md` when missing. Returns the stored relative path.
    pub fn save_note(&self, path: &str, content: &str) -> NotesResult<String> {
        let rel = with_note_extension(path);
        let full = self.guard.resolve(&rel)?;
        if full == self.root() || full.is_dir() {
            return Err(NotesError::InvalidName(path.to_string()));
        }

        file_ops::write_note(&full, content)?;
        log::debug!("[NOTES] Saved {} ({} bytes)", rel, content.len());
        Ok(file_ops::relative_path(self.root(), &full).unwrap_or(rel))
    }

    /// Delete a note; its folder goes too once it is empty.
    pub fn delete_note(&self, path: &str) -> NotesResult<()> {
        let full = self.existing_file(path)?;

        self.tags.invalidate(&full);
        fs::remove_file(&full)?;
        if let Some(parent) = full.parent() {
            file_ops::remove_if_empty(self.root(), parent);
        }
        log::info!("[NOTES] Deleted {}", path);
        Ok(())
    }

    pub fn move_note(&self, old_path: &str, new_path: &str) -> NotesResult<()> {
        let old_full = self.existing_file(old_path)?;
        let new_full = self.guard.resolve(new_path)?;
        if new_full == self.root() {
            return Err(NotesError::InvalidName(new_path.to_string()));
        }
        if new_full.exists() {
            return Err(NotesError::AlreadyExists(new_path.to_string()));
        }

        self.tags.invalidate(&old_full);
        create_parent(&new_full)?;
        fs::rename(&old_full, &new_full)?;
        log::info!("[NOTES] Moved {} -> {}", old_path, new_path);
        Ok(())
    }

    pub fn note_metadata(&self, path: &str) -> NotesResult<NoteMetadata> {
        let full = self.existing_file(path)?;
        let metadata = fs::metadata(&full)?;
        let content = fs::read_to_string(&full)?;
        let modified = metadata.modified()?;

        Ok(NoteMetadata {
            // Not every filesystem records creation time
            created: file_ops::format_time(metadata.created().unwrap_or(modified)),
            modified: file_ops::format_time(modified),
            size: metadata.len(),
            lines: content.lines().count(),
        })
    }

    // --- Images ---

    /// Store an uploaded image under `folder`. The name is sanitized and
    /// suffixed with a timestamp so uploads never overwrite each other.
    pub fn save_image(&self, folder: &str, filename: &str, bytes: &[u8]) -> NotesResult<NoteRecord> {
        let original = Path::new(filename);
        let ext = original
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Err(NotesError::UnsupportedImageType(filename.to_string()));
        }

        let stem = file_ops::slugify(&file_ops::file_stem(original));
        let stem = if stem.is_empty() { "image".to_string() } else { stem };
        let stamp = chrono::Local::now().format("%Y%m%d%H%M%S%3f");
        let name = format!("{}-{}.{}", stem, stamp, ext);

        let rel = if folder.trim_matches('/').is_empty() {
            name
        } else {
            format!("{}/{}", folder.trim_matches('/'), name)
        };
        let full = self.guard.resolve(&rel)?;
        if full.exists() {
            return Err(NotesError::AlreadyExists(rel));
        }

        create_parent(&full)?;
        fs::write(&full, bytes)?;
        log::info!("[NOTES] Stored image {} ({} bytes)", rel, bytes.len());

        self.record_for(&full, NoteKind::Image)
            .map(|(_, record)| record)
            .ok_or(NotesError::NotFound(rel))
    }

    /// Absolute path of an existing image, for streaming.
    pub fn image_path(&self, path: &str) -> NotesResult<PathBuf> {
        let full = self.existing_file(path)?;
        if !crate::vfs::has_extension(&full, IMAGE_EXTENSIONS) {
            return Err(NotesError::UnsupportedImageType(path.to_string()));
        }
        Ok(full)
    }

    // --- Tags ---

    /// Every tag in use with the number of notes carrying it, sorted by tag.
    pub fn list_tags(&self) -> Vec<TagCount> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for file in self.fs.list_files(self.root(), NOTE_EXTENSIONS) {
            for tag in self.tags.get_tags(&file) {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }

        counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect()
    }

    /// Notes carrying `tag` (compared lowercase), newest first.
    pub fn notes_by_tag(&self, tag: &str) -> Vec<NoteRecord> {
        let wanted = tag.trim().to_lowercase();
        let records = self
            .records(NOTE_EXTENSIONS, NoteKind::Note)
            .into_iter()
            .filter(|(_, r)| r.tags.contains(&wanted))
            .collect();
        newest_first(records)
    }

    // --- Search & templates ---

    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        self.search.search(self.root(), query)
    }

    pub fn list_templates(&self) -> Vec<notes_types::TemplateInfo> {
        templates::list_templates(self.root())
    }

    pub fn apply_template(
        &self,
        name: &str,
        title: &str,
        folder: &str,
    ) -> NotesResult<notes_types::RenderedTemplate> {
        templates::apply_template(self.root(), name, title, folder)
    }

    fn existing_file(&self, path: &str) -> NotesResult<PathBuf> {
        let full = self.guard.resolve(path)?;
        if !full.is_file() {
            return Err(NotesError::NotFound(path.to_string()));
        }
        Ok(full)
    }
}

fn with_note_extension(path: &str) -> String {
    if path.ends_with(".md") {
        path.to_string()
    } else {
        format!("{}.md", path)
    }
}

fn create_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

fn newest_first(mut records: Vec<(SystemTime, NoteRecord)>) -> Vec<NoteRecord> {
    records.sort_by(|(ta, a), (tb, b)| tb.cmp(ta).then_with(|| a.path.cmp(&b.path)));
    records.into_iter().map(|(_, record)| record).collect()
}
