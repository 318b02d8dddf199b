/// Configuration for one translation run
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Locale tag the source files are named with.
    #[serde(default = "default_source_lang")]
    pub source_lang: String,

    /// Locale tag to translate into.
    #[serde(default = "default_target_lang")]
    pub target_lang: String,

    /// Root to mirror rewritten files under. `None` writes each output
    /// beside its source file.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "ru".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            output_dir: None,
        }
    }
}
