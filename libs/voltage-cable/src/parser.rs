//! Cable specification parser
//!
//! Pipeline: classify the model, normalize the specification, match the
//! grammars (peeling any bundle wrappers) and allocate roles.

use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

use crate::allocate::allocate;
use crate::classifier::CableClassifier;
use crate::config::{CableConfig, DEFAULT_MATCH_TIMEOUT_MS};
use crate::error::{CableSpecError, Result};
use crate::grammar::{GrammarMatcher, RawFields};
use crate::normalize::normalize;
use crate::spec::{CableCategory, CableSpec};

/// Parses `(model, specification)` pairs into [`CableSpec`] records
///
/// Immutable after construction; share freely across threads.
#[derive(Debug, Clone)]
pub struct CableParser {
    classifier: CableClassifier,
    grammar: GrammarMatcher,
}

impl CableParser {
    /// Parser with the given classifier and the default match budget
    pub fn new(classifier: CableClassifier) -> Result<Self> {
        Self::with_timeout(classifier, Duration::from_millis(DEFAULT_MATCH_TIMEOUT_MS))
    }

    pub fn with_timeout(classifier: CableClassifier, timeout: Duration) -> Result<Self> {
        Ok(Self {
            classifier,
            grammar: GrammarMatcher::new(timeout)?,
        })
    }

    /// Resolve keyword sources and match budget from configuration
    pub fn with_config(config: &CableConfig) -> Result<Self> {
        Self::with_timeout(
            CableClassifier::from_config(&config.keywords),
            config.match_timeout(),
        )
    }

    pub fn classifier(&self) -> &CableClassifier {
        &self.classifier
    }

    /// Parse one cable
    pub fn parse(&self, model: &str, spec: &str) -> Result<CableSpec> {
        if spec.trim().is_empty() {
            return Err(CableSpecError::EmptySpec);
        }
        let category = self.classifier.classify(model)?;
        self.parse_classified(model, category, spec)
    }

    /// Parse many rows, one result per row
    pub fn parse_many<'a, I>(&self, rows: I) -> Vec<Result<CableSpec>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        rows.into_iter()
            .map(|(model, spec)| self.parse(model, spec))
            .collect()
    }

    /// Bundle wrappers are peeled iteratively and the outermost count wins
    fn parse_classified(
        &self,
        model: &str,
        category: CableCategory,
        spec: &str,
    ) -> Result<CableSpec> {
        let normalized = normalize(spec)?;
        let mut text = normalized.as_str();
        let mut bundle_count = None;

        loop {
            let fields = self
                .grammar
                .match_spec(text)?
                .ok_or_else(|| CableSpecError::unsupported(spec))?;

            match fields {
                RawFields::Bundle { count, inner } => {
                    text = inner.trim();
                    if text.is_empty() {
                        return Err(CableSpecError::unsupported(spec));
                    }
                    bundle_count.get_or_insert(count);
                },
                fields => {
                    let parsed = allocate(model, category, &fields)
                        .ok_or_else(|| CableSpecError::unsupported(spec))?;
                    return match bundle_count {
                        Some(count) => {
                            debug!("Bundled {} x '{}' for model '{}'", count, text, model);
                            parsed.with_bundle_count(i64::from(count))
                        },
                        None => Ok(parsed),
                    };
                },
            }
        }
    }
}

static DEFAULT_PARSER: OnceLock<Result<CableParser>> = OnceLock::new();

/// Parse with the built-in keyword tables and the default match budget
///
/// ```
/// use voltage_cable::{parse_cable, CableCategory};
///
/// let spec = parse_cable("YJV", "3x120+1x70").unwrap();
/// assert_eq!(spec.category(), CableCategory::Power);
/// assert_eq!(spec.phase_core_count(), 3);
/// assert_eq!(spec.neutral_core_section(), 70.0);
/// ```
pub fn parse_cable(model: &str, spec: &str) -> Result<CableSpec> {
    DEFAULT_PARSER
        .get_or_init(|| CableParser::new(CableClassifier::default()))
        .as_ref()
        .map_err(Clone::clone)?
        .parse(model, spec)
}
