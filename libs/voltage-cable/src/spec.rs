//! Cable specification record
//!
//! `CableSpec` is the immutable result of a parse. Fields are only written
//! through [`CableSpecBuilder`] during a single construction pass, or through
//! the factory helpers for callers that already know the cable structure.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{CableSpecError, Result};

/// Cores per twisted pair
pub const CORES_PER_PAIR: u32 = 2;

/// Cable category derived from the model designator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CableCategory {
    Power,
    Control,
    #[default]
    Unclassified,
}

impl CableCategory {
    /// Human-readable label used for `cable_type`
    pub fn label(self) -> &'static str {
        match self {
            CableCategory::Power => "Power",
            CableCategory::Control => "Control",
            CableCategory::Unclassified => "Unclassified",
        }
    }
}

impl fmt::Display for CableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CableCategory {
    type Err = CableSpecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "power" => Ok(CableCategory::Power),
            "control" => Ok(CableCategory::Control),
            "unclassified" | "" => Ok(CableCategory::Unclassified),
            other => Err(CableSpecError::config(format!(
                "Unknown cable category: {}",
                other
            ))),
        }
    }
}

/// A group of identical cores: `count` conductors of `section` mm²
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CoreGroup {
    pub count: u32,
    pub section: f64,
}

impl CoreGroup {
    pub const EMPTY: CoreGroup = CoreGroup {
        count: 0,
        section: 0.0,
    };

    pub fn new(count: u32, section: f64) -> Self {
        Self { count, section }
    }

    pub fn is_present(&self) -> bool {
        self.count > 0
    }
}

/// Parsed cable specification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CableSpec {
    model: String,
    category: CableCategory,
    bundle_count: u32,
    phase: CoreGroup,
    neutral: CoreGroup,
    protect: CoreGroup,
    is_variable_frequency: bool,
    vf_shield: CoreGroup,
    is_twisted_pair: bool,
    twisted_pair_count: u32,
    cores_per_pair: u32,
    control: CoreGroup,
    cable_type: String,
}

impl CableSpec {
    /// Start a construction pass for `model`
    pub fn builder(model: impl Into<String>) -> CableSpecBuilder {
        CableSpecBuilder::new(model)
    }

    /// Power cable with known phase/neutral/protect structure
    pub fn power(
        model: impl Into<String>,
        phase: CoreGroup,
        neutral: Option<CoreGroup>,
        protect: Option<CoreGroup>,
    ) -> Self {
        let mut builder = CableSpec::builder(model)
            .category(CableCategory::Power)
            .phase(phase);
        if let Some(neutral) = neutral {
            builder = builder.neutral(neutral);
        }
        if let Some(protect) = protect {
            builder = builder.protect(protect);
        }
        builder.build()
    }

    /// Variable-frequency cable: 3 phase cores plus 3 shield cores
    pub fn variable_frequency(
        model: impl Into<String>,
        phase_section: f64,
        shield_section: f64,
    ) -> Self {
        CableSpec::builder(model)
            .category(CableCategory::Power)
            .variable_frequency(phase_section, shield_section)
            .build()
    }

    /// Twisted-pair cable with `pairs` pairs of `section` mm² cores
    pub fn twisted_pair(
        model: impl Into<String>,
        category: CableCategory,
        pairs: u32,
        section: f64,
    ) -> Self {
        CableSpec::builder(model)
            .category(category)
            .twisted_pair(pairs, section)
            .build()
    }

    /// Copy of this record with a different bundle count
    pub fn with_bundle_count(&self, bundle_count: i64) -> Result<Self> {
        let bundle_count = checked_bundle_count(bundle_count)?;
        Ok(Self {
            bundle_count,
            ..self.clone()
        })
    }

    /// Copy of this record with a different subtype label
    pub fn with_cable_type(&self, cable_type: impl Into<String>) -> Self {
        Self {
            cable_type: cable_type.into(),
            ..self.clone()
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn category(&self) -> CableCategory {
        self.category
    }

    pub fn is_power(&self) -> bool {
        self.category == CableCategory::Power
    }

    pub fn is_control(&self) -> bool {
        self.category == CableCategory::Control
    }

    pub fn bundle_count(&self) -> u32 {
        self.bundle_count
    }

    pub fn phase_core_count(&self) -> u32 {
        self.phase.count
    }

    pub fn phase_core_section(&self) -> f64 {
        self.phase.section
    }

    pub fn neutral_core_count(&self) -> u32 {
        self.neutral.count
    }

    pub fn neutral_core_section(&self) -> f64 {
        self.neutral.section
    }

    pub fn protect_core_count(&self) -> u32 {
        self.protect.count
    }

    pub fn protect_core_section(&self) -> f64 {
        self.protect.section
    }

    pub fn is_variable_frequency(&self) -> bool {
        self.is_variable_frequency
    }

    pub fn vf_shield_core_count(&self) -> u32 {
        self.vf_shield.count
    }

    pub fn vf_shield_core_section(&self) -> f64 {
        self.vf_shield.section
    }

    pub fn is_twisted_pair(&self) -> bool {
        self.is_twisted_pair
    }

    pub fn twisted_pair_count(&self) -> u32 {
        self.twisted_pair_count
    }

    pub fn cores_per_pair(&self) -> u32 {
        self.cores_per_pair
    }

    pub fn control_core_count(&self) -> u32 {
        self.control.count
    }

    pub fn control_core_section(&self) -> f64 {
        self.control.section
    }

    pub fn cable_type(&self) -> &str {
        &self.cable_type
    }

    /// Total conductor count across all roles and bundles
    ///
    /// `None` when the total does not fit in a `u32`.
    pub fn total_core_count(&self) -> Option<u32> {
        let per_bundle = if self.is_twisted_pair {
            self.twisted_pair_count.checked_mul(self.cores_per_pair)?
        } else {
            [self.neutral, self.protect, self.vf_shield, self.control]
                .iter()
                .try_fold(self.phase.count, |total, group| {
                    total.checked_add(group.count)
                })?
        };
        per_bundle.checked_mul(self.bundle_count)
    }

    /// Canonical textual form for display and audit
    ///
    /// Not guaranteed to equal the parsed input byte-for-byte.
    pub fn describe(&self) -> String {
        if self.is_twisted_pair {
            return format!(
                "{}×{}×{}×{}",
                self.bundle_count, self.twisted_pair_count, self.cores_per_pair, self.phase.section
            );
        }

        let mut out = String::new();
        let bundled = self.bundle_count > 1;
        if bundled {
            out.push_str(&format!("{}(", self.bundle_count));
        }
        // Control cables carry their cores in the control group
        let main = if self.control.is_present() && !self.phase.is_present() {
            self.control
        } else {
            self.phase
        };
        out.push_str(&format!("{}×{}", main.count, main.section));
        if self.neutral.is_present() {
            out.push_str(&format!("+{}×{}", self.neutral.count, self.neutral.section));
        }
        if self.protect.is_present() {
            out.push_str(&format!("+{}×{}", self.protect.count, self.protect.section));
        }
        if self.is_variable_frequency {
            out.push_str(&format!(
                "+{}×{}",
                self.vf_shield.count, self.vf_shield.section
            ));
        }
        if bundled {
            out.push(')');
        }
        out
    }
}

impl fmt::Display for CableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn checked_bundle_count(value: i64) -> Result<u32> {
    if value < 1 {
        return Err(CableSpecError::invalid_bundle(value.to_string()));
    }
    u32::try_from(value).map_err(|_| CableSpecError::invalid_bundle(value.to_string()))
}

/// Single-pass constructor for [`CableSpec`]
#[derive(Debug, Clone)]
pub struct CableSpecBuilder {
    spec: CableSpec,
    cable_type: Option<String>,
}

impl CableSpecBuilder {
    fn new(model: impl Into<String>) -> Self {
        Self {
            spec: CableSpec {
                model: model.into(),
                category: CableCategory::Unclassified,
                bundle_count: 1,
                phase: CoreGroup::EMPTY,
                neutral: CoreGroup::EMPTY,
                protect: CoreGroup::EMPTY,
                is_variable_frequency: false,
                vf_shield: CoreGroup::EMPTY,
                is_twisted_pair: false,
                twisted_pair_count: 0,
                cores_per_pair: 0,
                control: CoreGroup::EMPTY,
                cable_type: String::new(),
            },
            cable_type: None,
        }
    }

    pub fn category(mut self, category: CableCategory) -> Self {
        self.spec.category = category;
        self
    }

    /// Bundle count must already be validated (>= 1)
    pub(crate) fn bundle_count(mut self, bundle_count: u32) -> Self {
        self.spec.bundle_count = bundle_count;
        self
    }

    pub fn phase(mut self, group: CoreGroup) -> Self {
        self.spec.phase = group;
        self
    }

    pub fn neutral(mut self, group: CoreGroup) -> Self {
        self.spec.neutral = group;
        self
    }

    pub fn protect(mut self, group: CoreGroup) -> Self {
        self.spec.protect = group;
        self
    }

    pub fn control(mut self, group: CoreGroup) -> Self {
        self.spec.control = group;
        self
    }

    pub fn variable_frequency(mut self, phase_section: f64, shield_section: f64) -> Self {
        self.spec.is_variable_frequency = true;
        self.spec.phase = CoreGroup::new(3, phase_section);
        self.spec.vf_shield = CoreGroup::new(3, shield_section);
        self
    }

    pub fn twisted_pair(mut self, pairs: u32, section: f64) -> Self {
        self.spec.is_twisted_pair = true;
        self.spec.twisted_pair_count = pairs;
        self.spec.cores_per_pair = CORES_PER_PAIR;
        self.spec.phase = CoreGroup::new(0, section);
        self
    }

    pub fn cable_type(mut self, cable_type: impl Into<String>) -> Self {
        self.cable_type = Some(cable_type.into());
        self
    }

    pub fn build(self) -> CableSpec {
        let mut spec = self.spec;
        spec.cable_type = self.cable_type.unwrap_or_else(|| {
            if spec.is_twisted_pair {
                "Twisted pair".to_string()
            } else if spec.is_variable_frequency {
                "Variable frequency".to_string()
            } else {
                spec.category.label().to_string()
            }
        });
        spec
    }
}
