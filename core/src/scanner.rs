//! Language-file discovery inside an unpacked mod tree.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

/// On-disk format of a discovered resource file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceFormat {
    /// Modern flat key/value JSON (`assets/<modid>/lang/en_us.json` and the
    /// older bare `lang/en_us.json` layout).
    Json,
    /// Legacy line-based `.lang` file. Discovered but never rewritten.
    Lang,
}

impl ResourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("lang") => Some(Self::Lang),
            _ => None,
        }
    }
}

/// A resource file selected for translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LangFileRef {
    pub path: PathBuf,
    /// Path relative to the mod root, forward-slash separated.
    pub relative_path: String,
    pub format: ResourceFormat,
}

/// Find the source-language resource files under `mod_root`.
///
/// Candidates are files directly inside a `lang` directory with a `.json` or
/// `.lang` extension. A candidate is kept when its stem names the configured
/// source locale (any casing, with or without a region suffix), or when it is
/// the only `.json` file in its `lang` directory. The untagged-file heuristic
/// can misfire on mods that ship a single non-source locale; callers get that
/// file and the eligibility filter decides entry by entry.
///
/// Never fails: unreadable directories are skipped, an empty result means
/// nothing matched. The result is sorted by path for reproducible runs.
pub fn find_lang_files(mod_root: &Path, source_lang: &str) -> Vec<LangFileRef> {
    let mut candidates = Vec::new();
    walk(mod_root, &mut candidates);

    let mut json_per_dir: HashMap<PathBuf, usize> = HashMap::new();
    for (path, format) in &candidates {
        if *format == ResourceFormat::Json {
            if let Some(parent) = path.parent() {
                *json_per_dir.entry(parent.to_path_buf()).or_insert(0) += 1;
            }
        }
    }

    let mut found: Vec<LangFileRef> = candidates
        .into_iter()
        .filter(|(path, format)| {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            if stem_matches_locale(stem, source_lang) {
                return true;
            }
            *format == ResourceFormat::Json
                && path
                    .parent()
                    .map(|parent| json_per_dir.get(parent) == Some(&1))
                    .unwrap_or(false)
        })
        .map(|(path, format)| {
            let relative_path = path
                .strip_prefix(mod_root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            LangFileRef {
                path,
                relative_path,
                format,
            }
        })
        .collect();

    found.sort_by(|a, b| a.path.cmp(&b.path));
    found
}

fn walk(current: &Path, candidates: &mut Vec<(PathBuf, ResourceFormat)>) {
    let entries = match fs::read_dir(current) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("skipping unreadable directory {}: {err}", current.display());
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, candidates);
        } else if path.is_file() && is_in_lang_dir(&path) {
            if let Some(format) = ResourceFormat::from_path(&path) {
                candidates.push((path, format));
            }
        }
    }
}

fn is_in_lang_dir(path: &Path) -> bool {
    path.parent()
        .and_then(|parent| parent.file_name())
        .and_then(|name| name.to_str())
        .map(|name| name == "lang")
        .unwrap_or(false)
}

/// `en` matches `en`, `en_us`, `en_US`, `EN_GB`; it does not match `end` or
/// an unrelated tag.
fn stem_matches_locale(stem: &str, tag: &str) -> bool {
    let stem = stem.to_ascii_lowercase();
    let tag = tag.to_ascii_lowercase();
    if stem == tag {
        return true;
    }
    match stem.strip_prefix(&tag) {
        Some(rest) => {
            let mut chars = rest.chars();
            chars.next() == Some('_') && chars.clone().count() > 0 && chars.all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}
