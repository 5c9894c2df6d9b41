pub mod cache;
pub mod folders;
pub mod health;
pub mod images;
pub mod notes;
pub mod tags;
pub mod templates;
pub mod themes;

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::web;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Instant;

    use crate::config::Config;
    use crate::notes::{NoteStore, TagCache};
    use crate::vfs::{FileSystem, PhysicalFileSystem};
    use crate::AppState;

    /// App state rooted at `dir/notes`, with themes in `dir/themes`
    pub fn state(dir: &Path) -> web::Data<AppState> {
        let mut config = Config::from_lookup(|_| None);
        config.notes_dir = dir.join("notes");
        config.themes_dir = dir.join("themes");
        config.plugins_dir = dir.join("plugins");

        let fs: Arc<dyn FileSystem> = Arc::new(PhysicalFileSystem);
        let tags = Arc::new(TagCache::new(fs.clone()));
        let store = NoteStore::new(&config.notes_dir, fs, tags).expect("Failed to create store");

        web::Data::new(AppState {
            store: Arc::new(store),
            config,
            started_at: Instant::now(),
        })
    }
}
