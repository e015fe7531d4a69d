//! Specification grammars
//!
//! Six structural forms are tried in strict priority order against the
//! normalized specification:
//!
//! | # | Grammar               | Form                       |
//! |---|-----------------------|----------------------------|
//! | 1 | bundle wrapper        | `N(expr)`                  |
//! | 2 | bundled twisted pair  | `BxPx2xS`                  |
//! | 3 | twisted pair          | `Px2xS`                    |
//! | 4 | plus                  | `AxS1+BxS2`                |
//! | 5 | extended plus         | `AxS1+BxS2+CxS3`           |
//! | 6 | simple                | `AxS`                      |
//!
//! The first structural match commits the parse. Numeric failures inside a
//! committed grammar are errors, never a reason to try the next grammar.

use regex::{Captures, Regex, RegexBuilder};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::{CableSpecError, Result};
use crate::normalize::strip_whitespace;
use crate::spec::CoreGroup;

/// Compiled program size cap for each grammar
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Opening of a bundle wrapper; the closing `)` is checked on the text end
const BUNDLE_PATTERN: &str = r"^(-?[0-9]+)\s*\(";
const TWISTED_PAIR_BUNDLE_PATTERN: &str = r"^(-?[0-9]+)x([0-9]+)x2x([^x+()]+)$";
const TWISTED_PAIR_PATTERN: &str = r"^([0-9]+)x2x([^x+()]+)$";
const PLUS_PATTERN: &str = r"^([0-9]+)x([^x+()]+)\+([0-9]+)x([^x+()]+)$";
const EXTENDED_PLUS_PATTERN: &str =
    r"^([0-9]+)x([^x+()]+)\+([0-9]+)x([^x+()]+)\+([0-9]+)x([^x+()]+)$";
const SIMPLE_PATTERN: &str = r"^([0-9]+)x([^x+()]+)$";

/// Grammar that structurally matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarKind {
    Bundle,
    TwistedPairBundle,
    TwistedPair,
    Plus,
    ExtendedPlus,
    Simple,
}

impl GrammarKind {
    pub fn name(self) -> &'static str {
        match self {
            GrammarKind::Bundle => "bundle",
            GrammarKind::TwistedPairBundle => "twisted-pair-bundle",
            GrammarKind::TwistedPair => "twisted-pair",
            GrammarKind::Plus => "plus",
            GrammarKind::ExtendedPlus => "extended-plus",
            GrammarKind::Simple => "simple",
        }
    }
}

/// Numeric fields extracted by a committed grammar
#[derive(Debug, Clone, PartialEq)]
pub enum RawFields<'h> {
    /// One bundle wrapper layer; `inner` is matched again by the caller
    Bundle { count: u32, inner: &'h str },
    TwistedPair {
        bundle: u32,
        pairs: u32,
        section: f64,
    },
    Plus {
        first: CoreGroup,
        second: CoreGroup,
        third: Option<CoreGroup>,
    },
    Simple(CoreGroup),
}

/// Priority-ordered grammar set with a per-match time budget
#[derive(Debug, Clone)]
pub struct GrammarMatcher {
    bundle: Regex,
    twisted_pair_bundle: Regex,
    twisted_pair: Regex,
    plus: Regex,
    extended_plus: Regex,
    simple: Regex,
    timeout: Duration,
}

impl GrammarMatcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            bundle: compile(BUNDLE_PATTERN)?,
            twisted_pair_bundle: compile(TWISTED_PAIR_BUNDLE_PATTERN)?,
            twisted_pair: compile(TWISTED_PAIR_PATTERN)?,
            plus: compile(PLUS_PATTERN)?,
            extended_plus: compile(EXTENDED_PLUS_PATTERN)?,
            simple: compile(SIMPLE_PATTERN)?,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Match a first-pass normalized specification
    ///
    /// Returns `Ok(None)` when no grammar matches structurally.
    pub fn match_spec<'h>(&self, normalized: &'h str) -> Result<Option<RawFields<'h>>> {
        if let Some(caps) = self.captures(GrammarKind::Bundle, &self.bundle, normalized)? {
            let open = caps.get(0).map_or(0, |m| m.end());
            if let Some(inner) = normalized
                .strip_suffix(')')
                .and_then(|rest| rest.get(open..))
                .filter(|inner| !inner.is_empty())
            {
                let count = parse_bundle_count(group(&caps, 1))?;
                debug!("Matched bundle grammar, count {}", count);
                return Ok(Some(RawFields::Bundle { count, inner }));
            }
        }

        let compact = strip_whitespace(normalized);

        if let Some(caps) = self.captures(
            GrammarKind::TwistedPairBundle,
            &self.twisted_pair_bundle,
            &compact,
        )? {
            debug!("Spec '{}' matched twisted-pair-bundle grammar", compact);
            return Ok(Some(RawFields::TwistedPair {
                bundle: parse_bundle_count(group(&caps, 1))?,
                pairs: parse_count(group(&caps, 2))?,
                section: parse_section(group(&caps, 3))?,
            }));
        }

        if let Some(caps) =
            self.captures(GrammarKind::TwistedPair, &self.twisted_pair, &compact)?
        {
            debug!("Spec '{}' matched twisted-pair grammar", compact);
            return Ok(Some(RawFields::TwistedPair {
                bundle: 1,
                pairs: parse_count(group(&caps, 1))?,
                section: parse_section(group(&caps, 2))?,
            }));
        }

        if let Some(caps) = self.captures(GrammarKind::Plus, &self.plus, &compact)? {
            debug!("Spec '{}' matched plus grammar", compact);
            return Ok(Some(RawFields::Plus {
                first: core_group(&caps, 1)?,
                second: core_group(&caps, 3)?,
                third: None,
            }));
        }

        if let Some(caps) =
            self.captures(GrammarKind::ExtendedPlus, &self.extended_plus, &compact)?
        {
            debug!("Spec '{}' matched extended-plus grammar", compact);
            return Ok(Some(RawFields::Plus {
                first: core_group(&caps, 1)?,
                second: core_group(&caps, 3)?,
                third: Some(core_group(&caps, 5)?),
            }));
        }

        if let Some(caps) = self.captures(GrammarKind::Simple, &self.simple, &compact)? {
            debug!("Spec '{}' matched simple grammar", compact);
            return Ok(Some(RawFields::Simple(core_group(&caps, 1)?)));
        }

        Ok(None)
    }

    /// Run one pattern, failing if the match exceeds the time budget
    fn captures<'t>(
        &self,
        kind: GrammarKind,
        re: &Regex,
        text: &'t str,
    ) -> Result<Option<Captures<'t>>> {
        let started = Instant::now();
        let caps = re.captures(text);
        let elapsed = started.elapsed();
        if elapsed >= self.timeout {
            warn!(
                "Pattern match in {} grammar took {:?} (budget {:?})",
                kind.name(),
                elapsed,
                self.timeout
            );
            return Err(CableSpecError::MatchTimeout {
                grammar: kind.name(),
                elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            });
        }
        Ok(caps)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()?)
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// `count x section` pair starting at capture `index`
fn core_group(caps: &Captures<'_>, index: usize) -> Result<CoreGroup> {
    Ok(CoreGroup::new(
        parse_count(group(caps, index))?,
        parse_section(group(caps, index + 1))?,
    ))
}

/// Non-negative integer count
pub fn parse_count(token: &str) -> Result<u32> {
    token
        .parse::<u32>()
        .map_err(|_| CableSpecError::invalid_section(token))
}

/// Bundle count, which must be at least 1
///
/// Errors carry the token as written.
pub fn parse_bundle_count(token: &str) -> Result<u32> {
    token
        .parse::<i64>()
        .ok()
        .filter(|value| *value >= 1)
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| CableSpecError::invalid_bundle(token))
}

/// Plain decimal section (`2.5`, `120`), independent of locale
///
/// Exponents, signs and non-finite spellings are rejected.
pub fn parse_section(token: &str) -> Result<f64> {
    let mut digits = 0usize;
    let mut points = 0usize;
    for c in token.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return Err(CableSpecError::invalid_section(token)),
        }
    }
    if digits == 0 || points > 1 {
        return Err(CableSpecError::invalid_section(token));
    }

    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CableSpecError::invalid_section(token))
}
