use icu_locale::Locale;
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

/// A translation model for one language direction
///
/// Models are immutable once built and are shared between callers as
/// `Arc<TranslationModel>`; an engine may serve several requests against the
/// same model concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationModel {
    name: String,
    source_language: String,
    target_language: String,
}

impl TranslationModel {
    /// Create a model, normalizing both language tags to their base language
    ///
    /// `"en-US"` becomes `"en"`, `"zh-Hans"` becomes `"zh"`.
    pub fn new(
        name: impl Into<String>,
        source_language: &str,
        target_language: &str,
    ) -> BridgeResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BridgeError::Config("model name cannot be empty".to_string()));
        }
        Ok(Self {
            name,
            source_language: normalize_language(source_language)?,
            target_language: normalize_language(target_language)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }
}

/// Parse a BCP 47 tag and keep only its language subtag
pub fn normalize_language(tag: &str) -> BridgeResult<String> {
    if tag.trim().is_empty() {
        return Err(BridgeError::InvalidLanguage("language tag is empty".to_string()));
    }
    let locale: Locale = tag
        .trim()
        .parse()
        .map_err(|e| BridgeError::InvalidLanguage(format!("'{}': {:?}", tag, e)))?;
    Ok(locale.id.language.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_region_and_script() {
        let model = TranslationModel::new("enfr", "en-US", "zh-Hans").unwrap();
        assert_eq!(model.source_language(), "en");
        assert_eq!(model.target_language(), "zh");
        assert_eq!(model.name(), "enfr");
    }

    #[test]
    fn test_lowercases_language() {
        assert_eq!(normalize_language("DE").unwrap(), "de");
    }

    #[test]
    fn test_rejects_invalid_tag() {
        assert!(matches!(
            normalize_language("not a tag!"),
            Err(BridgeError::InvalidLanguage(_))
        ));
        assert!(matches!(
            normalize_language(""),
            Err(BridgeError::InvalidLanguage(_))
        ));
    }

    #[test]
    fn test_rejects_empty_name() {
        assert!(matches!(
            TranslationModel::new("  ", "en", "fr"),
            Err(BridgeError::Config(_))
        ));
    }
}
