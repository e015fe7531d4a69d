//! Keyword sources for cable category classification
//!
//! A [`KeywordSet`] holds two case-insensitive keyword lists: one for power
//! cables, one for control cables. Sources are composed once by set union
//! (first occurrence wins, duplicates dropped) before a classifier is built.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::config::KeywordConfig;

/// Built-in power cable keywords
pub const BUILTIN_POWER_KEYWORDS: &[&str] =
    &["YJV", "YJLV", "YJY", "VV", "VLV", "BV", "BVR", "BYJ"];

/// Built-in control cable keywords
pub const BUILTIN_CONTROL_KEYWORDS: &[&str] =
    &["KVV", "KVVP", "KVVR", "KYJV", "KYJY", "DJYVP", "DJYPVP"];

/// Power and control keyword lists, stored trimmed and upper-cased
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    power: Vec<String>,
    control: Vec<String>,
}

impl KeywordSet {
    pub fn new<P, C>(power: P, control: C) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let mut set = KeywordSet::default();
        set.extend_power(power);
        set.extend_control(control);
        set
    }

    pub fn power(&self) -> &[String] {
        &self.power
    }

    pub fn control(&self) -> &[String] {
        &self.control
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty() && self.control.is_empty()
    }

    /// Union with `other`, keeping existing order first
    pub fn union(mut self, other: &KeywordSet) -> Self {
        self.extend_power(&other.power);
        self.extend_control(&other.control);
        self
    }

    /// Union of all sources, in the order given
    pub fn compose<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn KeywordSource>,
    {
        sources
            .into_iter()
            .fold(KeywordSet::default(), |acc, source| {
                acc.union(source.keywords())
            })
    }

    /// Resolve a [`KeywordConfig`]: built-in tables (if enabled) followed by
    /// each external document in listed order
    pub fn from_config(config: &KeywordConfig) -> Self {
        let mut sources: Vec<Box<dyn KeywordSource>> = Vec::new();
        if config.enable_builtin_keywords {
            sources.push(Box::new(BuiltinKeywords));
        }
        for path in &config.external_sources {
            sources.push(Box::new(JsonKeywordFile::new(path)));
        }
        KeywordSet::compose(sources.iter().map(|s| s.as_ref() as &dyn KeywordSource))
    }

    fn extend_power<I>(&mut self, keywords: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        push_unique(&mut self.power, keywords);
    }

    fn extend_control<I>(&mut self, keywords: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        push_unique(&mut self.control, keywords);
    }
}

fn push_unique<I>(target: &mut Vec<String>, keywords: I)
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    for keyword in keywords {
        let keyword = keyword.as_ref().trim().to_uppercase();
        if !keyword.is_empty() && !target.contains(&keyword) {
            target.push(keyword);
        }
    }
}

/// Supplier of classification keywords
pub trait KeywordSource: Send + Sync {
    /// Keywords provided by this source
    fn keywords(&self) -> &KeywordSet;

    /// Source name for diagnostics
    fn name(&self) -> String;
}

/// Static default keyword tables
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinKeywords;

static BUILTIN_SET: OnceLock<KeywordSet> = OnceLock::new();

impl KeywordSource for BuiltinKeywords {
    fn keywords(&self) -> &KeywordSet {
        BUILTIN_SET
            .get_or_init(|| KeywordSet::new(BUILTIN_POWER_KEYWORDS, BUILTIN_CONTROL_KEYWORDS))
    }

    fn name(&self) -> String {
        "builtin".to_string()
    }
}

/// On-disk keyword document
///
/// ```json
/// { "PowerKeywords": ["YJV"], "ControlKeywords": ["KVV"] }
/// ```
#[derive(Debug, Default, Deserialize)]
struct KeywordDocument {
    #[serde(rename = "PowerKeywords", default)]
    power_keywords: Vec<String>,
    #[serde(rename = "ControlKeywords", default)]
    control_keywords: Vec<String>,
}

/// Keyword source backed by a JSON file
///
/// The file is read on the first call to [`KeywordSource::keywords`] and the
/// result is cached for the lifetime of the instance. Concurrent first
/// callers observe a single load. A missing or malformed file yields an
/// empty set.
#[derive(Debug)]
pub struct JsonKeywordFile {
    path: PathBuf,
    loaded: OnceLock<KeywordSet>,
}

impl JsonKeywordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file has already been read
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    fn load(&self) -> KeywordSet {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Failed to read keyword file {}: {}",
                    self.path.display(),
                    e
                );
                return KeywordSet::default();
            },
        };

        match serde_json::from_str::<KeywordDocument>(&content) {
            Ok(doc) => {
                let set = KeywordSet::new(doc.power_keywords, doc.control_keywords);
                info!(
                    "Loaded keyword file {}: {} power, {} control",
                    self.path.display(),
                    set.power().len(),
                    set.control().len()
                );
                set
            },
            Err(e) => {
                warn!(
                    "Failed to parse keyword file {}: {}",
                    self.path.display(),
                    e
                );
                KeywordSet::default()
            },
        }
    }
}

impl KeywordSource for JsonKeywordFile {
    fn keywords(&self) -> &KeywordSet {
        self.loaded.get_or_init(|| self.load())
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

impl KeywordSource for KeywordSet {
    fn keywords(&self) -> &KeywordSet {
        self
    }

    fn name(&self) -> String {
        "inline".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use tracing_test::traced_test;

    fn keyword_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_keyword_set_normalizes_and_dedups() {
        let set = KeywordSet::new(["yjv", " YJV ", "", "vv"], ["kvv", "KVV"]);
        assert_eq!(set.power(), &["YJV".to_string(), "VV".to_string()]);
        assert_eq!(set.control(), &["KVV".to_string()]);
    }

    #[test]
    fn test_union_keeps_first_order() {
        let a = KeywordSet::new(["YJV", "VV"], ["KVV"]);
        let b = KeywordSet::new(["VV", "BV"], ["KVV", "RVVP"]);
        let merged = a.union(&b);
        assert_eq!(merged.power(), &["YJV", "VV", "BV"]);
        assert_eq!(merged.control(), &["KVV", "RVVP"]);
    }

    #[test]
    fn test_builtin_tables_disjoint() {
        let set = BuiltinKeywords.keywords();
        for keyword in set.power() {
            assert!(!set.control().contains(keyword), "{} in both", keyword);
        }
        assert_eq!(BuiltinKeywords.name(), "builtin");
    }

    #[test]
    fn test_json_file_loaded_lazily_once() {
        let file = keyword_file(r#"{"PowerKeywords": ["NHYJV"], "ControlKeywords": ["ZRKVV"]}"#);
        let source = JsonKeywordFile::new(file.path());
        assert!(!source.is_loaded());

        let first = source.keywords() as *const KeywordSet;
        assert!(source.is_loaded());

        // Rewriting the file has no effect once cached
        std::fs::write(file.path(), r#"{"PowerKeywords": ["OTHER"]}"#).unwrap();
        let second = source.keywords();
        assert_eq!(first, second as *const KeywordSet);
        assert_eq!(second.power(), &["NHYJV"]);
        assert_eq!(second.control(), &["ZRKVV"]);
    }

    #[test]
    fn test_json_file_concurrent_first_callers_share_result() {
        let file = keyword_file(r#"{"PowerKeywords": ["YJV"]}"#);
        let source = Arc::new(JsonKeywordFile::new(file.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let source = Arc::clone(&source);
                std::thread::spawn(move || source.keywords() as *const KeywordSet as usize)
            })
            .collect();

        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(source.keywords().power(), &["YJV"]);
        assert!(source.keywords().control().is_empty());
    }

    #[test]
    #[traced_test]
    fn test_missing_file_degrades_to_empty() {
        let source = JsonKeywordFile::new("/nonexistent/cable-keywords.json");
        assert!(source.keywords().is_empty());
        assert!(logs_contain("Failed to read keyword file"));
    }

    #[test]
    #[traced_test]
    fn test_corrupt_file_degrades_to_empty() {
        let file = keyword_file("{ not json");
        let source = JsonKeywordFile::new(file.path());
        assert!(source.keywords().is_empty());
        assert!(logs_contain("Failed to parse keyword file"));
    }

    #[test]
    fn test_from_config_composes_in_order() {
        let file = keyword_file(r#"{"PowerKeywords": ["YJV", "NHYJV"], "ControlKeywords": ["RVVP"]}"#);
        let config = KeywordConfig {
            enable_builtin_keywords: true,
            external_sources: vec![file.path().to_path_buf(), "/missing.json".into()],
        };
        let set = KeywordSet::from_config(&config);
        assert_eq!(set.power()[0], "YJV");
        assert_eq!(set.power().last().map(String::as_str), Some("NHYJV"));
        assert_eq!(
            set.power().iter().filter(|k| k.as_str() == "YJV").count(),
            1
        );
        assert_eq!(set.control().last().map(String::as_str), Some("RVVP"));
    }

    #[test]
    fn test_from_config_without_builtin() {
        let config = KeywordConfig {
            enable_builtin_keywords: false,
            external_sources: vec![],
        };
        assert!(KeywordSet::from_config(&config).is_empty());
    }
}
