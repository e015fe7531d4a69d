//! Engineering display order for parsed cables
//!
//! Power cables first (largest phase section first), then control cables
//! (largest control section first), then everything else in input order.

use std::cmp::Ordering;

use crate::spec::{CableCategory, CableSpec};

/// Sort cable records into display order
///
/// Accepts plain records or optional records; `None` entries are dropped.
/// The sort is stable, so records with equal keys keep their input order.
pub fn sort_cables<I>(specs: I) -> Vec<CableSpec>
where
    I: IntoIterator,
    I::Item: Into<Option<CableSpec>>,
{
    let mut power = Vec::new();
    let mut control = Vec::new();
    let mut other = Vec::new();

    for spec in specs.into_iter().filter_map(Into::<Option<CableSpec>>::into) {
        match spec.category() {
            CableCategory::Power => power.push(spec),
            CableCategory::Control => control.push(spec),
            CableCategory::Unclassified => other.push(spec),
        }
    }

    power.sort_by(compare_power);
    control.sort_by(compare_control);

    power.extend(control);
    power.extend(other);
    power
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

fn compare_power(a: &CableSpec, b: &CableSpec) -> Ordering {
    descending(a.phase_core_section(), b.phase_core_section())
        .then_with(|| descending(a.neutral_core_section(), b.neutral_core_section()))
        .then_with(|| b.protect_core_count().cmp(&a.protect_core_count()))
}

fn compare_control(a: &CableSpec, b: &CableSpec) -> Ordering {
    descending(a.control_core_section(), b.control_core_section())
        .then_with(|| b.control_core_count().cmp(&a.control_core_count()))
        .then_with(|| b.twisted_pair_count().cmp(&a.twisted_pair_count()))
}
