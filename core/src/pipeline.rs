//! Pipeline orchestration: discovery → rewrite across one module, with
//! optional archive unpack/repack around the run.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::archive::{self, ArchiveError};
use crate::config::PipelineConfig;
use crate::progress::{NullProgress, ProgressReporter};
use crate::rewriter::{self, RewriteError};
use crate::scanner;
use crate::translate::{TranslationInvoker, Translator};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Module path not found: {0}")]
    NotFound(String),
}

/// Aggregate counters for one run. Translated and skipped count attempted
/// entries only; values the eligibility filter rejected are in neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub files_processed: u32,
    pub translated: u32,
    pub skipped: u32,
}

/// Scratch directory owned by a single archive run.
///
/// Dropped on every exit path, so a failed rewrite or repack never leaves
/// the extracted tree behind.
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn create() -> io::Result<Self> {
        let path = env::temp_dir().join(format!("modlocale-{}", Uuid::new_v4()));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(err) = fs::remove_dir_all(&self.path) {
                warn!(
                    "failed to remove scratch directory {}: {err}",
                    self.path.display()
                );
            }
        }
    }
}

/// Drives one module through the whole pipeline.
pub struct ModTranslator {
    invoker: TranslationInvoker,
    config: PipelineConfig,
    progress: Box<dyn ProgressReporter>,
}

impl ModTranslator {
    pub fn new(backend: Box<dyn Translator>, config: PipelineConfig) -> Self {
        Self {
            invoker: TranslationInvoker::new(backend),
            config,
            progress: Box::new(NullProgress),
        }
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Translate a module given as either a directory or an archive.
    ///
    /// For a directory, `output` (or the configured output root) receives the
    /// mirrored files; for an archive it names the repacked archive.
    pub fn run(&mut self, input: &Path, output: Option<&Path>) -> Result<RunStats, PipelineError> {
        if input.is_file() && archive::is_archive_file(input) {
            return self
                .translate_archive(input, output)
                .map(|(_, stats)| stats);
        }

        let output_base = output
            .map(Path::to_path_buf)
            .or_else(|| self.config.output_dir.clone());
        self.translate_mod(input, output_base.as_deref())
    }

    /// Translate every discovered language file under `mod_root`.
    ///
    /// Single-file failures are logged and skipped; the batch always runs to
    /// the end. `files_processed` counts files that were actually rewritten.
    pub fn translate_mod(
        &mut self,
        mod_root: &Path,
        output_base: Option<&Path>,
    ) -> Result<RunStats, PipelineError> {
        if !mod_root.exists() {
            return Err(PipelineError::NotFound(mod_root.display().to_string()));
        }

        let mut stats = RunStats::default();

        let files = scanner::find_lang_files(mod_root, &self.config.source_lang);
        if files.is_empty() {
            info!("no language files found in {}", mod_root.display());
            self.progress
                .report(&format!("No language files found in {}", mod_root.display()));
            return Ok(stats);
        }

        self.progress
            .report(&format!("Found {} language file(s)", files.len()));

        for file in &files {
            self.progress
                .report(&format!("Translating {}", file.relative_path));
            let result = rewriter::rewrite_file(
                file,
                output_base,
                &self.config.source_lang,
                &self.config.target_lang,
                &mut self.invoker,
            );
            match result {
                Ok(outcome) => {
                    stats.files_processed += 1;
                    stats.translated += outcome.translated;
                    stats.skipped += outcome.skipped;
                    info!("wrote {}", outcome.output_path.display());
                }
                Err(err @ RewriteError::UnsupportedFormat(_)) => {
                    info!("skipping {}: {err}", file.relative_path);
                }
                Err(err) => {
                    warn!("failed to rewrite {}: {err}", file.relative_path);
                }
            }
        }

        Ok(stats)
    }

    /// Unpack an archive, translate the extracted tree in place, repack.
    ///
    /// Returns the written archive path together with the run counters. The
    /// default output lands beside the input with the target tag appended to
    /// the stem.
    pub fn translate_archive(
        &mut self,
        archive_path: &Path,
        output_archive: Option<&Path>,
    ) -> Result<(PathBuf, RunStats), PipelineError> {
        let scratch = ScratchDir::create()?;

        self.progress
            .report(&format!("Unpacking {}", archive_path.display()));
        let extracted = archive::unpack_archive(archive_path, scratch.path())?;

        let stats = self.translate_mod(&extracted, None)?;

        let output_path = match output_archive {
            Some(path) => path.to_path_buf(),
            None => default_archive_output(archive_path, &self.config.target_lang),
        };

        self.progress
            .report(&format!("Packing {}", output_path.display()));
        archive::pack_archive(&extracted, &output_path)?;

        Ok((output_path, stats))
    }
}

/// `mod.jar` translated to `ru` becomes `mod_ru.jar` beside the input.
fn default_archive_output(archive_path: &Path, target_lang: &str) -> PathBuf {
    let stem = archive_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mod");
    let ext = archive_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("jar");
    archive_path.with_file_name(format!("{stem}_{target_lang}.{ext}"))
}
