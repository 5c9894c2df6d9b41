//! CSS themes loaded from the themes directory.

use notes_types::ThemeInfo;
use regex::Regex;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

/// Only this many leading lines are scanned for the `@theme-type` marker
const METADATA_SCAN_LINES: usize = 11;
const DEFAULT_THEME_TYPE: &str = "dark";
const FALLBACK_ICON: &str = "🎨";

static THEME_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@theme-type:\s*(light|dark)").unwrap());

fn icon_for(id: &str) -> &'static str {
    match id {
        "light" => "🌞",
        "dark" => "🌙",
        "dracula" => "🧛",
        "nord" => "❄️",
        "monokai" => "🎞️",
        "vue-high-contrast" => "💚",
        "cobalt2" => "🌊",
        "vs-blue" => "🔷",
        _ => FALLBACK_ICON,
    }
}

/// "vue-high_contrast" -> "Vue High Contrast"
fn display_name(id: &str) -> String {
    id.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read `light` or `dark` from a theme's leading comment, defaulting to dark
fn theme_type(path: &Path) -> String {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("[THEMES] Cannot read {}: {}", path.display(), e);
            return DEFAULT_THEME_TYPE.to_string();
        }
    };

    BufReader::new(file)
        .lines()
        .take(METADATA_SCAN_LINES)
        .map_while(Result::ok)
        .find_map(|line| THEME_TYPE_RE.captures(&line).map(|c| c[1].to_string()))
        .unwrap_or_else(|| DEFAULT_THEME_TYPE.to_string())
}

/// Every `*.css` theme in `themes_dir`, sorted by id
pub fn available_themes(themes_dir: &Path) -> Vec<ThemeInfo> {
    let Ok(entries) = fs::read_dir(themes_dir) else {
        return Vec::new();
    };

    let mut themes: Vec<ThemeInfo> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().map(|e| e == "css").unwrap_or(false))
        .filter_map(|path| {
            let id = path.file_stem()?.to_str()?.to_string();
            Some(ThemeInfo {
                name: format!("{} {}", icon_for(&id), display_name(&id)),
                theme_type: theme_type(&path),
                builtin: false,
                id,
            })
        })
        .collect();

    themes.sort_by(|a, b| a.id.cmp(&b.id));
    themes
}

/// CSS for theme `id`, or None when it does not exist or the id is unsafe
pub fn theme_css(themes_dir: &Path, id: &str) -> Option<String> {
    if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
        return None;
    }
    fs::read_to_string(themes_dir.join(format!("{}.css", id))).ok()
}
