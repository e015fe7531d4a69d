//! voltage-cable - Cable specification parsing for VoltageEMS
//!
//! Turns free-form cable size designations such as `3x120+1x70`,
//! `KVV 4x1.5` or `2(3x50+3x25)` into typed [`CableSpec`] records with
//! conductor roles, and orders collections of them for reporting.
//!
//! # Example
//!
//! ```rust
//! use voltage_cable::{parse_cable, sort_cables, CableCategory};
//!
//! let power = parse_cable("YJV", "4x25").unwrap();
//! assert_eq!(power.category(), CableCategory::Power);
//! assert_eq!(power.phase_core_count(), 3);
//! assert_eq!(power.neutral_core_count(), 1);
//!
//! let control = parse_cable("KVV", "14x1.5").unwrap();
//! assert_eq!(control.control_core_count(), 14);
//!
//! let sorted = sort_cables(vec![control, power]);
//! assert_eq!(sorted[0].model(), "YJV");
//! ```
//!
//! # Supported forms
//!
//! | Form             | Example           | Roles                          |
//! |------------------|-------------------|--------------------------------|
//! | bundle wrapper   | `2(3x25+1x16)`    | inner form, bundled            |
//! | twisted pair     | `2x6x2x1.5`, `6x2x1.5` | pairs of 2 cores          |
//! | plus             | `3x120+1x70`      | phase + neutral / PE           |
//! | extended plus    | `3x25+1x16+1x16`  | phase + neutral + PE           |
//! | simple           | `4x25`, `14x2.5`  | by core count or control cores |
//!
//! `3xS1+3xS2` is always a variable-frequency cable. Bundle wrappers may nest;
//! the outermost count is kept.

pub mod allocate;
pub mod classifier;
pub mod config;
pub mod error;
pub mod grammar;
pub mod keywords;
pub mod normalize;
pub mod parser;
pub mod sorter;
pub mod spec;

// Re-exports for convenience
pub use classifier::CableClassifier;
pub use config::{CableConfig, KeywordConfig};
pub use error::{CableSpecError, Result};
pub use keywords::{BuiltinKeywords, JsonKeywordFile, KeywordSet, KeywordSource};
pub use parser::{parse_cable, CableParser};
pub use sorter::sort_cables;
pub use spec::{CableCategory, CableSpec, CableSpecBuilder, CoreGroup};
