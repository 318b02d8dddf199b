//! Translation backends and the failure-isolating invoker.

pub mod google;

use log::warn;
use thiserror::Error;

pub use google::GoogleTranslator;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translator reported an error: {0}")]
    Service(String),

    #[error("translator returned an empty result")]
    EmptyResult,
}

/// One string in, one string out, synchronously. Backends may fail for any
/// reason; callers treat every failure the same way.
pub trait Translator: Send {
    fn name(&self) -> &'static str;

    fn translate(
        &mut self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationError>;
}

/// Wraps a backend so that a single bad string can never abort a batch.
///
/// Every backend failure is logged with the offending text and swallowed;
/// the caller keeps the original value and moves on to the next entry.
pub struct TranslationInvoker {
    backend: Box<dyn Translator>,
}

impl TranslationInvoker {
    pub fn new(backend: Box<dyn Translator>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// `None` means "keep the original text", never "drop the entry".
    pub fn try_translate(
        &mut self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Option<String> {
        match self.backend.translate(text, source_lang, target_lang) {
            Ok(translated) => Some(translated),
            Err(err) => {
                warn!(
                    "{} failed to translate {text:?}: {err}",
                    self.backend.name()
                );
                None
            }
        }
    }
}
