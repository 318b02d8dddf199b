pub mod archive;
pub mod config;
pub mod eligibility;
pub mod pipeline;
pub mod progress;
pub mod rewriter;
pub mod scanner;
pub mod translate;

pub use archive::{is_archive_file, pack_archive, unpack_archive, ArchiveError};
pub use config::PipelineConfig;
pub use eligibility::should_translate;
pub use pipeline::{ModTranslator, PipelineError, RunStats};
pub use progress::{NullProgress, ProgressReporter};
pub use rewriter::{rewrite_file, target_file_name, FileOutcome, RewriteError};
pub use scanner::{find_lang_files, LangFileRef, ResourceFormat};
pub use translate::{GoogleTranslator, TranslationError, TranslationInvoker, Translator};
