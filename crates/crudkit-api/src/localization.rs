//! Status message localization.
//!
//! Messages are looked up by status code in a per-language catalog, then
//! in the default language, and finally fall back to the canonical HTTP
//! reason phrase.

use std::collections::HashMap;
use std::fmt;

use axum::http::{HeaderMap, StatusCode, header};
use tracing::warn;

use crudkit_core::config::LocalizationConfig;

/// Resolves a status code to caller-facing text.
pub trait Localizer: fmt::Debug + Send + Sync + 'static {
    /// Text for `code` in `language`.
    fn message(&self, code: u16, language: &str) -> String;

    /// Whether a catalog exists for `language`.
    fn supports(&self, language: &str) -> bool;

    /// Language used when the caller expresses no supported preference.
    fn default_language(&self) -> &str;

    /// Choose the response language from an `Accept-Language` header.
    fn negotiate(&self, headers: &HeaderMap) -> String {
        let header = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        for tag in parse_accept_language(header) {
            if self.supports(&tag) {
                return tag;
            }
            if let Some(primary) = primary_subtag(&tag) {
                if self.supports(primary) {
                    return primary.to_string();
                }
            }
        }
        self.default_language().to_string()
    }
}

/// Built-in English texts; configuration entries override them.
const BUILTIN_EN: &[(u16, &str)] = &[
    (200, "Request completed successfully"),
    (201, "Resource created"),
    (400, "The request was invalid"),
    (404, "The requested resource was not found"),
    (413, "The request body is too large"),
    (422, "The request could not be processed"),
    (500, "An internal server error occurred"),
    (503, "The service is temporarily unavailable"),
];

/// [`Localizer`] backed by in-memory catalogs.
#[derive(Debug, Clone)]
pub struct CatalogLocalizer {
    default_language: String,
    catalogs: HashMap<String, HashMap<u16, String>>,
}

impl CatalogLocalizer {
    /// Build from configuration, layered over the built-in English texts.
    ///
    /// Catalog keys that are not valid status codes are skipped.
    pub fn from_config(config: &LocalizationConfig) -> Self {
        let mut catalogs: HashMap<String, HashMap<u16, String>> = HashMap::new();
        catalogs.insert(
            "en".to_string(),
            BUILTIN_EN
                .iter()
                .map(|(code, text)| (*code, (*text).to_string()))
                .collect(),
        );

        for (language, entries) in &config.catalogs {
            let catalog = catalogs.entry(language.to_ascii_lowercase()).or_default();
            for (key, text) in entries {
                match key.trim().parse::<u16>() {
                    Ok(code) => {
                        catalog.insert(code, text.clone());
                    }
                    Err(_) => warn!(language = %language, key = %key, "Skipping non-numeric catalog key"),
                }
            }
        }

        Self {
            default_language: config.default_language.to_ascii_lowercase(),
            catalogs,
        }
    }

    fn lookup(&self, code: u16, language: &str) -> Option<&str> {
        self.catalogs
            .get(language)
            .and_then(|catalog| catalog.get(&code))
            .map(String::as_str)
    }
}

impl Default for CatalogLocalizer {
    fn default() -> Self {
        Self::from_config(&LocalizationConfig::default())
    }
}

impl Localizer for CatalogLocalizer {
    fn message(&self, code: u16, language: &str) -> String {
        let language = language.to_ascii_lowercase();
        let found = self
            .lookup(code, &language)
            .or_else(|| primary_subtag(&language).and_then(|p| self.lookup(code, p)))
            .or_else(|| self.lookup(code, &self.default_language));

        match found {
            Some(text) => text.to_string(),
            None => StatusCode::from_u16(code)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Status {code}")),
        }
    }

    fn supports(&self, language: &str) -> bool {
        self.catalogs.contains_key(&language.to_ascii_lowercase())
    }

    fn default_language(&self) -> &str {
        &self.default_language
    }
}

/// Language tags from an `Accept-Language` value, highest quality first.
///
/// Wildcards and tags with `q=0` are dropped. Ties keep header order.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut weighted: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim().to_ascii_lowercase();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let quality = pieces
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (quality > 0.0).then_some((tag, quality))
        })
        .collect();

    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
    weighted.into_iter().map(|(tag, _)| tag).collect()
}

fn primary_subtag(tag: &str) -> Option<&str> {
    tag.split_once('-').map(|(primary, _)| primary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn localizer() -> CatalogLocalizer {
        let mut fr = HashMap::new();
        fr.insert("404".to_string(), "Ressource introuvable".to_string());
        fr.insert("oops".to_string(), "ignored".to_string());
        let mut catalogs = HashMap::new();
        catalogs.insert("fr".to_string(), fr);
        CatalogLocalizer::from_config(&LocalizationConfig {
            default_language: "en".to_string(),
            catalogs,
        })
    }

    #[test]
    fn test_message_fallback_chain() {
        let l = localizer();
        assert_eq!(l.message(404, "fr"), "Ressource introuvable");
        assert_eq!(l.message(404, "fr-CA"), "Ressource introuvable");
        assert_eq!(l.message(400, "fr"), "The request was invalid");
        assert_eq!(l.message(418, "fr"), "I'm a teapot");
        assert_eq!(l.message(299, "en"), "Status 299");
    }

    #[test]
    fn test_parse_accept_language_orders_by_quality() {
        assert_eq!(
            parse_accept_language("de;q=0.5, fr-CA, *;q=0.1, en;q=0.8"),
            vec!["fr-ca", "en", "de"]
        );
        assert!(parse_accept_language("").is_empty());
    }

    #[test]
    fn test_negotiate() {
        let l = localizer();
        let mut headers = HeaderMap::new();
        assert_eq!(l.negotiate(&headers), "en");

        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("ja, fr-BE;q=0.9"),
        );
        assert_eq!(l.negotiate(&headers), "fr");
    }
}
