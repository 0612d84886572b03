use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::figlet::FontTool;

pub const PREVIEW_ERROR_PREFIX: &str = "Error rendering: ";

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("could not find figlet font directory")]
    NoFontDirectory,
    #[error("error walking font directory {dir}: {source}")]
    Walk {
        dir: String,
        #[source]
        source: walkdir::Error,
    },
    #[error("no .{extension} font files found in {dir} or subdirectories")]
    NoFonts { dir: String, extension: String },
}

/// Anything the selection list can show and filter.
pub trait ListItem {
    fn display_key(&self) -> &str;
    fn filter_key(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontEntry {
    pub name: String,
    pub path: PathBuf,
    pub preview: String,
}

impl FontEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            preview: String::new(),
        }
    }

    pub fn preview_failed(&self) -> bool {
        self.preview.starts_with(PREVIEW_ERROR_PREFIX)
    }
}

impl ListItem for FontEntry {
    fn display_key(&self) -> &str {
        &self.name
    }

    fn filter_key(&self) -> &str {
        &self.name
    }
}

/// Pick the directory to scan: the tool's reported directory (preferring its
/// `fonts` child), else the first existing fallback.
pub fn find_font_dir(reported: Option<PathBuf>, fallbacks: &[PathBuf]) -> Option<PathBuf> {
    if let Some(dir) = reported {
        let nested = dir.join("fonts");
        if nested.is_dir() {
            return Some(nested);
        }
        if dir.is_dir() {
            return Some(dir);
        }
    }
    fallbacks.iter().find(|dir| dir.is_dir()).cloned()
}

/// Recursively collect font files under `dir`, sorted by name.
///
/// Links are listed but never traversed, so a dangling or looping link is
/// just another entry. A broken font link fails later, at render time.
pub fn scan_font_dir(dir: &Path, extension: &str) -> Result<Vec<FontEntry>, DiscoveryError> {
    let mut fonts = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            dir: dir.display().to_string(),
            source,
        })?;
        let file_type = entry.file_type();
        let is_font_candidate =
            file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir());
        if !is_font_candidate {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if let Some(name) = strip_extension(&file_name, extension) {
            fonts.push(FontEntry::new(name, entry.path()));
        }
    }

    if fonts.is_empty() {
        return Err(DiscoveryError::NoFonts {
            dir: dir.display().to_string(),
            extension: extension.to_string(),
        });
    }

    fonts.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    Ok(fonts)
}

pub fn discover_fonts(
    tool: &dyn FontTool,
    fallbacks: &[PathBuf],
    extension: &str,
) -> Result<Vec<FontEntry>, DiscoveryError> {
    let dir = find_font_dir(tool.font_directory(), fallbacks)
        .ok_or(DiscoveryError::NoFontDirectory)?;
    scan_font_dir(&dir, extension)
}

// Case-insensitive suffix match on ".<extension>"; the name keeps its case.
fn strip_extension<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    let suffix_len = extension.len() + 1;
    if file_name.len() <= suffix_len || !file_name.is_char_boundary(file_name.len() - suffix_len)
    {
        return None;
    }
    let (name, suffix) = file_name.split_at(file_name.len() - suffix_len);
    let matches = suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(extension);
    matches.then_some(name)
}

/// Keep at most `max_lines` lines, then drop trailing blank lines from what
/// was kept.
pub fn truncate_preview(text: &str, max_lines: usize) -> String {
    let mut lines: Vec<&str> = text.split('\n').take(max_lines).collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

pub fn preview_placeholder(reason: &str) -> String {
    format!("{PREVIEW_ERROR_PREFIX}{reason}")
}
