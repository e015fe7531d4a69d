//! Specification string normalization

use crate::error::{CableSpecError, Result};

/// Multiplication sign variants folded to `x`
const MULTIPLY_SIGNS: &[char] = &['×', '*', 'X'];

/// First pass: unify multiplication signs and brackets, trim the ends
///
/// Fails with [`CableSpecError::EmptySpec`] for empty or whitespace-only input.
///
/// ```
/// use voltage_cable::normalize::normalize;
///
/// assert_eq!(normalize(" 3×120+1X70 ").unwrap(), "3x120+1x70");
/// assert_eq!(normalize("2（3*50）").unwrap(), "2(3x50)");
/// assert!(normalize("   ").is_err());
/// ```
pub fn normalize(spec: &str) -> Result<String> {
    if spec.trim().is_empty() {
        return Err(CableSpecError::EmptySpec);
    }

    let unified: String = spec
        .chars()
        .map(|c| match c {
            c if MULTIPLY_SIGNS.contains(&c) => 'x',
            '（' => '(',
            '）' => ')',
            c => c,
        })
        .collect();

    Ok(unified.trim().to_string())
}

/// Second pass for non-bundle grammars: drop all embedded whitespace
pub fn strip_whitespace(normalized: &str) -> String {
    normalized.chars().filter(|c| !c.is_whitespace()).collect()
}
