//! Note templates stored as markdown under `<notes>/_templates`.
//!
//! Rendering substitutes `{{placeholder}}` tokens; unknown tokens are left as-is.

use chrono::{DateTime, Local};
use notes_types::{RenderedTemplate, TemplateInfo};
use std::fs;
use std::path::Path;

use super::file_ops::{self, TEMPLATES_FOLDER};
use crate::error::{NotesError, NotesResult};

/// Templates available under `notes_root`, sorted by name
pub fn list_templates(notes_root: &Path) -> Vec<TemplateInfo> {
    let dir = notes_root.join(TEMPLATES_FOLDER);
    let Ok(entries) = fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut templates: Vec<TemplateInfo> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|e| crate::vfs::has_extension(&e.path(), file_ops::NOTE_EXTENSIONS))
        .filter_map(|e| {
            let path = e.path();
            let modified = e.metadata().and_then(|m| m.modified()).ok()?;
            Some(TemplateInfo {
                name: file_ops::file_stem(&path),
                path: file_ops::relative_path(notes_root, &path)?,
                modified: file_ops::format_time(modified),
            })
        })
        .collect();

    templates.sort_by(|a, b| a.name.cmp(&b.name));
    templates
}

/// Load template `name` and fill in its placeholders
pub fn apply_template(
    notes_root: &Path,
    name: &str,
    title: &str,
    folder: &str,
) -> NotesResult<RenderedTemplate> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(NotesError::InvalidName(name.to_string()));
    }

    let path = notes_root
        .join(TEMPLATES_FOLDER)
        .join(format!("{}.md", name));
    let raw = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(NotesError::NotFound(format!("template {}", name)));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(RenderedTemplate {
        name: name.to_string(),
        content: render(&raw, title, folder, Local::now()),
    })
}

/// Substitute date/time/title/folder placeholders
pub fn render(template: &str, title: &str, folder: &str, now: DateTime<Local>) -> String {
    let replacements = [
        ("{{date}}", now.format("%Y-%m-%d").to_string()),
        ("{{time}}", now.format("%H:%M:%S").to_string()),
        ("{{datetime}}", now.format("%Y-%m-%d %H:%M:%S").to_string()),
        ("{{timestamp}}", now.timestamp().to_string()),
        ("{{year}}", now.format("%Y").to_string()),
        ("{{month}}", now.format("%m").to_string()),
        ("{{day}}", now.format("%d").to_string()),
        ("{{title}}", title.to_string()),
        ("{{folder}}", folder.to_string()),
    ];

    replacements
        .iter()
        .fold(template.to_string(), |acc, (token, value)| {
            acc.replace(token, value)
        })
}
