//! Error types for note storage operations.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use notes_types::ApiResponse;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum NotesError {
    #[error("Access denied: path outside notes directory: {0}")]
    PathOutsideRoot(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Not a directory: {0}")]
    NotADirectory(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type NotesResult<T> = Result<T, NotesError>;

impl ResponseError for NotesError {
    fn status_code(&self) -> StatusCode {
        match self {
            NotesError::PathOutsideRoot(_) => StatusCode::FORBIDDEN,
            NotesError::NotFound(_) => StatusCode::NOT_FOUND,
            NotesError::AlreadyExists(_) => StatusCode::CONFLICT,
            NotesError::NotADirectory(_) | NotesError::InvalidName(_) => StatusCode::BAD_REQUEST,
            NotesError::UnsupportedImageType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            NotesError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let NotesError::Io(e) = self {
            log::error!("[NOTES] {}", e);
        }
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::err(self.to_string()))
    }
}

/// Why a tag lookup produced nothing. Callers that only need tags treat every
/// variant as "no tags".
#[derive(Debug, thiserror::Error)]
pub enum TagLookupError {
    #[error("unreadable: {0}")]
    Unreadable(#[source] io::Error),
    #[error("not valid UTF-8")]
    NotUtf8,
}

impl From<io::Error> for TagLookupError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::InvalidData {
            TagLookupError::NotUtf8
        } else {
            TagLookupError::Unreadable(e)
        }
    }
}
