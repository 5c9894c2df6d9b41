//! Notes module - markdown files on disk, their tags, search and templates.
//!
//! [`NoteStore`] is the entry point; the other submodules are its building
//! blocks and are public for the HTTP layer and tests.

pub mod file_ops;
pub mod frontmatter;
pub mod path_guard;
pub mod search;
pub mod store;
pub mod tag_cache;
pub mod templates;

pub use store::NoteStore;
pub use tag_cache::TagCache;
