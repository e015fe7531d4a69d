//! Cable category classification from the model designator
//!
//! Control detection runs first: a leading `K` (or one of the compound
//! `ZR-K`, `NH-K`, `WDZ-K` prefixes) or any control keyword marks a control
//! cable. A power keyword only counts when it is not immediately preceded by
//! `K`, so `KYJV`/`KVV` never read as `YJV`/`VV`.

use tracing::debug;

use crate::config::KeywordConfig;
use crate::error::{CableSpecError, Result};
use crate::keywords::{BuiltinKeywords, KeywordSet, KeywordSource};
use crate::spec::CableCategory;

/// Model prefixes that always denote a control cable
pub const CONTROL_PREFIXES: &[&str] = &["ZR-K", "NH-K", "WDZ-K"];

/// Classifies model designators into power / control / unclassified
#[derive(Debug, Clone)]
pub struct CableClassifier {
    keywords: KeywordSet,
}

impl Default for CableClassifier {
    fn default() -> Self {
        Self::new(BuiltinKeywords.keywords().clone())
    }
}

impl CableClassifier {
    pub fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    /// Compose all sources once and build a classifier from the union
    pub fn from_sources<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn KeywordSource>,
    {
        Self::new(KeywordSet::compose(sources))
    }

    pub fn from_config(config: &KeywordConfig) -> Self {
        Self::new(KeywordSet::from_config(config))
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Classify a model designator
    ///
    /// Fails with [`CableSpecError::AmbiguousCategory`] when both power and
    /// control signatures are present.
    pub fn classify(&self, model: &str) -> Result<CableCategory> {
        let upper = model.trim().to_uppercase();
        let is_control = self.is_control(&upper);
        let is_power = self.is_power(&upper);

        let category = match (is_power, is_control) {
            (true, true) => return Err(CableSpecError::ambiguous(model)),
            (true, false) => CableCategory::Power,
            (false, true) => CableCategory::Control,
            (false, false) => CableCategory::Unclassified,
        };
        debug!("Classified model '{}' as {}", model, category);
        Ok(category)
    }

    fn is_control(&self, upper: &str) -> bool {
        if upper.starts_with('K') || CONTROL_PREFIXES.iter().any(|p| upper.starts_with(p)) {
            return true;
        }
        self.keywords
            .control()
            .iter()
            .any(|keyword| upper.contains(keyword.as_str()))
    }

    fn is_power(&self, upper: &str) -> bool {
        self.keywords
            .power()
            .iter()
            .any(|keyword| contains_not_after_k(upper, keyword))
    }
}

/// True if `keyword` occurs in `haystack` at a position not directly after `K`
fn contains_not_after_k(haystack: &str, keyword: &str) -> bool {
    haystack
        .match_indices(keyword)
        .any(|(idx, _)| haystack[..idx].chars().next_back() != Some('K'))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn classify(model: &str) -> Result<CableCategory> {
        CableClassifier::default().classify(model)
    }

    #[test]
    fn test_power_models() {
        assert_eq!(classify("YJV").unwrap(), CableCategory::Power);
        assert_eq!(classify("yjv22").unwrap(), CableCategory::Power);
        assert_eq!(classify("ZR-YJV").unwrap(), CableCategory::Power);
        assert_eq!(classify("NH-VV").unwrap(), CableCategory::Power);
    }

    #[test]
    fn test_control_models() {
        assert_eq!(classify("KVV").unwrap(), CableCategory::Control);
        assert_eq!(classify("KYJV").unwrap(), CableCategory::Control);
        assert_eq!(classify("kvvp").unwrap(), CableCategory::Control);
        assert_eq!(classify("ZR-KVV").unwrap(), CableCategory::Control);
        assert_eq!(classify("WDZ-KYJY").unwrap(), CableCategory::Control);
        assert_eq!(classify("DJYVP").unwrap(), CableCategory::Control);
    }

    #[test]
    fn test_k_adjacency_excludes_power_keyword() {
        // VV inside KVV is preceded by K
        assert_eq!(classify("NH-KVV").unwrap(), CableCategory::Control);
        assert!(contains_not_after_k("YJV", "YJV"));
        assert!(!contains_not_after_k("KYJV", "YJV"));
        assert!(contains_not_after_k("KYJV-YJV", "YJV"));
    }

    #[test]
    fn test_ambiguous_model() {
        assert_eq!(
            classify("YJV KVV"),
            Err(CableSpecError::AmbiguousCategory("YJV KVV".to_string()))
        );
    }

    #[test]
    fn test_unclassified_model() {
        assert_eq!(classify("RVSP").unwrap(), CableCategory::Unclassified);
        assert_eq!(classify("").unwrap(), CableCategory::Unclassified);
    }

    #[test]
    fn test_custom_keywords() {
        let extra = KeywordSet::new(["ABC"], ["XYZ"]);
        let classifier =
            CableClassifier::from_sources([&BuiltinKeywords as &dyn KeywordSource, &extra]);
        assert_eq!(classifier.classify("ABC-1").unwrap(), CableCategory::Power);
        assert_eq!(classifier.classify("XYZ-1").unwrap(), CableCategory::Control);
        assert_eq!(classifier.classify("YJV").unwrap(), CableCategory::Power);

        let empty = CableClassifier::new(KeywordSet::default());
        assert_eq!(empty.classify("YJV").unwrap(), CableCategory::Unclassified);
        // Prefix rule does not depend on keywords
        assert_eq!(empty.classify("KVV").unwrap(), CableCategory::Control);
    }
}
