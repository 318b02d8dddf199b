//! Rewrites one resource file: filter, translate, rename, persist.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::eligibility::should_translate;
use crate::scanner::{LangFileRef, ResourceFormat};
use crate::translate::TranslationInvoker;

#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no rewrite support for {0}")]
    UnsupportedFormat(String),
}

/// What happened to one file. Only attempted entries are counted: values the
/// eligibility filter rejected appear in neither number.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub output_path: PathBuf,
    pub translated: u32,
    pub skipped: u32,
}

/// Translate every eligible entry of `file` and write the result under the
/// derived target-locale name.
///
/// Every key of the source document appears in the output; a value is either
/// the translated text or the original (filtered out, or the backend failed).
/// Key order is preserved.
pub fn rewrite_file(
    file: &LangFileRef,
    output_base: Option<&Path>,
    source_lang: &str,
    target_lang: &str,
    invoker: &mut TranslationInvoker,
) -> Result<FileOutcome, RewriteError> {
    if file.format != ResourceFormat::Json {
        return Err(RewriteError::UnsupportedFormat(file.relative_path.clone()));
    }

    let text = fs::read_to_string(&file.path)?;
    let entries: Map<String, Value> = serde_json::from_str(&text)?;

    let mut translated_count = 0;
    let mut skipped_count = 0;
    let mut rewritten = Map::new();

    for (key, value) in entries {
        let output = match value {
            Value::String(source) if should_translate(&source) => {
                match invoker.try_translate(&source, source_lang, target_lang) {
                    Some(translated) => {
                        translated_count += 1;
                        Value::String(translated)
                    }
                    None => {
                        skipped_count += 1;
                        Value::String(source)
                    }
                }
            }
            other => other,
        };
        rewritten.insert(key, output);
    }

    let output_path = derive_output_path(file, output_base, source_lang, target_lang);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    // serde_json writes UTF-8 literally, so the target script stays readable
    // instead of turning into \u escapes.
    fs::write(&output_path, serde_json::to_string_pretty(&rewritten)?)?;

    Ok(FileOutcome {
        output_path,
        translated: translated_count,
        skipped: skipped_count,
    })
}

/// Where the rewritten file goes: mirrored under `output_base` when given,
/// beside the source otherwise. The filename is rederived in both cases.
pub fn derive_output_path(
    file: &LangFileRef,
    output_base: Option<&Path>,
    source_lang: &str,
    target_lang: &str,
) -> PathBuf {
    let file_name = file
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let target_name = target_file_name(file_name, source_lang, target_lang);

    match output_base {
        Some(base) => base
            .join(Path::new(&file.relative_path))
            .with_file_name(target_name),
        None => file.path.with_file_name(target_name),
    }
}

/// Derive the output filename from the source filename. Pure.
///
/// The source-locale token is replaced case-preservingly: `en_us` becomes
/// `ru_ru`, `en_US` becomes `ru_RU`, a bare `en.json` becomes `ru_ru.json`.
/// A filename with no recognizable token falls back to the target-locale
/// default.
pub fn target_file_name(source_name: &str, source_lang: &str, target_lang: &str) -> String {
    let src = source_lang.to_ascii_lowercase();
    let tgt = target_lang.to_ascii_lowercase();

    if let Some((start, len)) = find_locale_token(source_name, &src) {
        let token = &source_name[start..start + len];
        let region = &token[src.len() + 1..];
        if region.chars().any(|c| c.is_ascii_uppercase()) {
            let replacement = format!("{tgt}_{}", tgt.to_ascii_uppercase());
            return source_name.replacen(token, &replacement, 1);
        }
        let replacement = format!("{tgt}_{tgt}");
        return source_name
            .to_ascii_lowercase()
            .replacen(&token.to_ascii_lowercase(), &replacement, 1);
    }

    // A bare `en.json` and an unrecognized filename both resolve to the
    // fixed target-locale default.
    format!("{tgt}_{tgt}.json")
}

/// Locate `<src>_<region>` in a filename, case-insensitively. Returns byte
/// offset and length of the token.
fn find_locale_token(name: &str, src: &str) -> Option<(usize, usize)> {
    let lower = name.to_ascii_lowercase();
    let needle = format!("{src}_");
    let start = lower.find(&needle)?;

    let rest = &name[start + needle.len()..];
    let region_len = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .count();
    if region_len == 0 {
        return None;
    }
    Some((start, needle.len() + region_len))
}
