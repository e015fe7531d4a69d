//! Keyword composition and configuration loading
//!
//! Uses temporary keyword documents and config files to check that
//! external sources extend the built-in tables and that unreadable sources
//! never break parser construction.

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tempfile::{NamedTempFile, TempDir};
use voltage_cable::{
    BuiltinKeywords, CableCategory, CableClassifier, CableConfig, CableParser, CableSpecError,
    JsonKeywordFile, KeywordConfig, KeywordSet, KeywordSource,
};

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn external_keywords_extend_builtin() {
    let dir = TempDir::new().unwrap();
    let extra = write_file(
        dir.path(),
        "extra.json",
        r#"{"PowerKeywords": ["FS-HV"], "ControlKeywords": ["SIG"]}"#,
    );

    let parser = CableParser::with_config(&CableConfig {
        keywords: KeywordConfig {
            enable_builtin_keywords: true,
            external_sources: vec![extra],
        },
        ..CableConfig::default()
    })
    .unwrap();

    assert_eq!(
        parser.parse("fs-hv-01", "4x35").unwrap().category(),
        CableCategory::Power
    );
    assert_eq!(
        parser.parse("SIG-12", "12x0.75").unwrap().control_core_count(),
        12
    );
    assert_eq!(
        parser.parse("YJV", "4x35").unwrap().category(),
        CableCategory::Power
    );
}

#[test]
fn unreadable_sources_contribute_nothing() {
    let dir = TempDir::new().unwrap();
    let corrupt = write_file(dir.path(), "corrupt.json", "[1, 2");
    let config = KeywordConfig {
        enable_builtin_keywords: false,
        external_sources: vec![corrupt, dir.path().join("missing.json")],
    };

    let classifier = CableClassifier::from_config(&config);
    assert!(classifier.keywords().is_empty());
    assert_eq!(
        classifier.classify("YJV").unwrap(),
        CableCategory::Unclassified
    );
}

#[test]
fn duplicate_keywords_are_removed_across_sources() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{"PowerKeywords": ["yjv", "VV", "NEWPWR"], "ControlKeywords": ["kvv"]}"#)
        .unwrap();
    let external = JsonKeywordFile::new(file.path());

    let set = KeywordSet::compose([&BuiltinKeywords as &dyn KeywordSource, &external]);
    let builtin = BuiltinKeywords.keywords();
    assert_eq!(set.power().len(), builtin.power().len() + 1);
    assert_eq!(set.control().len(), builtin.control().len());
    assert_eq!(set.power().last().map(String::as_str), Some("NEWPWR"));
}

#[test]
fn external_keywords_can_make_model_ambiguous() {
    let dir = TempDir::new().unwrap();
    let extra = write_file(dir.path(), "extra.json", r#"{"ControlKeywords": ["YJV-C"]}"#);
    let parser = CableParser::with_config(&CableConfig {
        keywords: KeywordConfig {
            enable_builtin_keywords: true,
            external_sources: vec![extra],
        },
        ..CableConfig::default()
    })
    .unwrap();

    assert_eq!(
        parser.parse("YJV-C", "4x1.5"),
        Err(CableSpecError::AmbiguousCategory("YJV-C".to_string()))
    );
}

#[test]
fn parser_loaded_from_config_file() {
    let dir = TempDir::new().unwrap();
    let keywords = write_file(
        dir.path(),
        "keywords.json",
        r#"{"PowerKeywords": ["ALPHA"], "ControlKeywords": []}"#,
    );
    let config_path = write_file(
        dir.path(),
        "cable.toml",
        &format!(
            "match_timeout_ms = 2000\n\n[keywords]\nenable_builtin_keywords = false\nexternal_sources = [{:?}]\n",
            keywords.display().to_string()
        ),
    );

    let config = CableConfig::load_from_file(&config_path).unwrap();
    assert_eq!(config.match_timeout_ms, 2000);
    let parser = CableParser::with_config(&config).unwrap();

    assert_eq!(
        parser.parse("ALPHA", "3x95+1x50").unwrap().category(),
        CableCategory::Power
    );
    // Built-in tables disabled
    assert_eq!(
        parser.parse("YJV", "3x95+1x50").unwrap().category(),
        CableCategory::Unclassified
    );
}

#[test]
fn shared_parser_across_threads() {
    let parser = Arc::new(CableParser::new(CableClassifier::default()).unwrap());
    let handles: Vec<_> = (1..=8u32)
        .map(|n| {
            let parser = Arc::clone(&parser);
            std::thread::spawn(move || {
                parser
                    .parse("YJV", &format!("{}(3x{}+1x16)", n, n * 10))
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let spec = handle.join().unwrap();
        let n = u32::try_from(i).unwrap() + 1;
        assert_eq!(spec.bundle_count(), n);
        assert_eq!(spec.phase_core_section(), f64::from(n * 10));
    }
}
