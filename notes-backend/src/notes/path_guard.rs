//! Containment check for every path a caller hands us.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{NotesError, NotesResult};

/// Resolves caller-supplied relative paths against the notes root and refuses
/// anything that would land outside it, whether through `..` or a symlink.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// The root must exist; it is canonicalized once here.
    pub fn new(root: &Path) -> io::Result<Self> {
        Ok(Self {
            root: root.canonicalize()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for `relative`. The target itself need not exist.
    pub fn resolve(&self, relative: &str) -> NotesResult<PathBuf> {
        let outside = || NotesError::PathOutsideRoot(relative.to_string());

        let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => parts.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(outside());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(outside()),
            }
        }

        let candidate = parts.iter().fold(self.root.clone(), |acc, p| acc.join(p));

        // Symlinks: the deepest ancestor that exists must really live under the root.
        let existing = candidate
            .ancestors()
            .find(|p| p.exists())
            .unwrap_or(self.root.as_path());
        let real = existing.canonicalize()?;
        if !real.starts_with(&self.root) {
            return Err(outside());
        }

        Ok(candidate)
    }
}
