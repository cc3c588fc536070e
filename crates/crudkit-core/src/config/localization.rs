//! Status message catalogs.
//!
//! Each catalog maps a language tag to `code -> text` entries. Codes are
//! stored as strings because TOML table keys are strings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Localization settings for envelope messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizationConfig {
    /// Language used when the request names none or an unknown one.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Per-language overrides, e.g. `catalogs.es."404" = "No encontrado"`.
    #[serde(default)]
    pub catalogs: HashMap<String, HashMap<String, String>>,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            catalogs: HashMap::new(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}
