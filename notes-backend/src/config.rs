use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "NOTES_HOST";
    pub const PORT: &str = "NOTES_PORT";
    pub const NOTES_DIR: &str = "NOTES_DIR";
    pub const THEMES_DIR: &str = "NOTES_THEMES_DIR";
    pub const PLUGINS_DIR: &str = "NOTES_PLUGINS_DIR";
    /// Directory holding the web UI; served at `/` when it exists.
    pub const STATIC_DIR: &str = "NOTES_STATIC_DIR";
    pub const MAX_UPLOAD_MB: &str = "NOTES_MAX_UPLOAD_MB";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8000;
    pub const NOTES_DIR: &str = "./data";
    pub const THEMES_DIR: &str = "./themes";
    pub const PLUGINS_DIR: &str = "./plugins";
    pub const STATIC_DIR: &str = "./frontend";
    pub const MAX_UPLOAD_MB: usize = 10;
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub notes_dir: PathBuf,
    pub themes_dir: PathBuf,
    pub plugins_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let dir = |key: &str, default: &str| {
            PathBuf::from(lookup(key).unwrap_or_else(|| default.to_string()))
        };

        let port = match lookup(env_vars::PORT) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("{} is not a valid port: {:?}, using {}", env_vars::PORT, raw, defaults::PORT);
                defaults::PORT
            }),
            None => defaults::PORT,
        };

        let max_upload_mb = lookup(env_vars::MAX_UPLOAD_MB)
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults::MAX_UPLOAD_MB);

        Self {
            host: lookup(env_vars::HOST).unwrap_or_else(|| defaults::HOST.to_string()),
            port,
            notes_dir: dir(env_vars::NOTES_DIR, defaults::NOTES_DIR),
            themes_dir: dir(env_vars::THEMES_DIR, defaults::THEMES_DIR),
            plugins_dir: dir(env_vars::PLUGINS_DIR, defaults::PLUGINS_DIR),
            static_dir: dir(env_vars::STATIC_DIR, defaults::STATIC_DIR),
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Create the directories the server writes into
pub fn ensure_directories(config: &Config) -> io::Result<()> {
    for dir in [&config.notes_dir, &config.plugins_dir] {
        create_dir(dir)?;
    }
    Ok(())
}

fn create_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        log::info!("Creating directory {}", dir.display());
    }
    std::fs::create_dir_all(dir)
}
