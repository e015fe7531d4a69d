//! Core role allocation
//!
//! Maps the numeric fields of a committed grammar plus the classified
//! category onto conductor roles.

use crate::grammar::RawFields;
use crate::spec::{CableCategory, CableSpec, CableSpecBuilder, CoreGroup};

/// Build the record for a non-bundle grammar match
///
/// Returns `None` for [`RawFields::Bundle`], which the parser peels before
/// allocating the inner expression.
pub fn allocate(model: &str, category: CableCategory, fields: &RawFields<'_>) -> Option<CableSpec> {
    let builder = CableSpec::builder(model).category(category);

    let spec = match *fields {
        RawFields::Bundle { .. } => return None,
        RawFields::TwistedPair {
            bundle,
            pairs,
            section,
        } => builder
            .bundle_count(bundle)
            .twisted_pair(pairs, section)
            .build(),
        RawFields::Plus {
            first,
            second,
            third,
        } => allocate_plus(builder, category, first, second, third),
        RawFields::Simple(group) => allocate_simple(builder, category, group),
    };
    Some(spec)
}

fn allocate_plus(
    builder: CableSpecBuilder,
    category: CableCategory,
    first: CoreGroup,
    second: CoreGroup,
    third: Option<CoreGroup>,
) -> CableSpec {
    // 3+3 is a variable-frequency cable whatever the model says; a control
    // model does not make it a control cable
    if third.is_none() && first.count == 3 && second.count == 3 {
        let category = match category {
            CableCategory::Control => CableCategory::Power,
            other => other,
        };
        return builder
            .category(category)
            .variable_frequency(first.section, second.section)
            .build();
    }

    // Control cables keep the first operand only
    if category == CableCategory::Control {
        return builder.control(first).build();
    }

    if let Some(third) = third {
        return builder.phase(first).neutral(second).protect(third).build();
    }

    match (first.count, second.count) {
        (3, 1) => builder
            .phase(first)
            .neutral(CoreGroup::new(1, second.section))
            .build(),
        (3, 2) => builder
            .phase(first)
            .neutral(CoreGroup::new(1, second.section))
            .protect(CoreGroup::new(1, second.section))
            .build(),
        // 4+1: neutral rides with the large group, PE is the small one
        (4, 1) => builder
            .phase(CoreGroup::new(3, first.section))
            .neutral(CoreGroup::new(1, first.section))
            .protect(CoreGroup::new(1, second.section))
            .build(),
        _ => builder.phase(first).neutral(second).build(),
    }
}

fn allocate_simple(builder: CableSpecBuilder, category: CableCategory, group: CoreGroup) -> CableSpec {
    if category == CableCategory::Control {
        return builder.control(group).build();
    }

    let section = group.section;
    match group.count {
        4 => builder
            .phase(CoreGroup::new(3, section))
            .neutral(CoreGroup::new(1, section))
            .build(),
        5 => builder
            .phase(CoreGroup::new(3, section))
            .neutral(CoreGroup::new(1, section))
            .protect(CoreGroup::new(1, section))
            .build(),
        _ => builder.phase(group).build(),
    }
}
