//! Shared types for the notes backend and its HTTP clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Response Envelope
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// =====================================================
// Request Types
// =====================================================

/// Body for saving a note
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveNoteRequest {
    pub content: String,
}

/// Body for moving/renaming a note or a folder
#[derive(Debug, Serialize, Deserialize)]
pub struct MoveRequest {
    pub old_path: String,
    pub new_path: String,
}

/// Body for creating a folder
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    pub path: String,
}

// =====================================================
// Domain Types
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Note,
    Image,
}

/// A note or image found under the notes root. Rebuilt from disk on every listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRecord {
    pub name: String,
    /// Path relative to the notes root, `/`-separated
    pub path: String,
    /// Containing folder, empty for the root
    pub folder: String,
    /// RFC 3339 modification time
    pub modified: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Full note payload returned when opening a note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteContent {
    pub path: String,
    pub content: String,
    pub tags: Vec<String>,
    /// Targets of `[[wiki links]]` in the body
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteMetadata {
    pub created: String,
    pub modified: String,
    pub size: u64,
    pub lines: usize,
}

/// One highlighted hit inside a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// 1-based
    pub line_number: usize,
    /// Single-line HTML snippet with the hit wrapped in `<mark>`
    pub context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub path: String,
    pub folder: String,
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub name: String,
    pub path: String,
    pub modified: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedTemplate {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeInfo {
    pub id: String,
    pub name: String,
    /// "light" or "dark"
    #[serde(rename = "type")]
    pub theme_type: String,
    pub builtin: bool,
}
