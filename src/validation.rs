//! Plausibility validation of raw attributes
//!
//! Every rule is an independent predicate over the numbers as entered. All
//! rules run on every input and their violations are accumulated in a fixed
//! order, so a caller can surface every problem in one pass.
//!
//! A rule whose inputs are absent does not fire; presence is not a
//! plausibility concern.

use crate::attributes::{names, AttributeValue, RawAttributes};
use serde::{Deserialize, Serialize};

/// Tunable parameters of the plausibility heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Minimum plausible carpet area per bedroom (sq ft)
    pub min_area_per_room: f64,
    /// Bathrooms allowed beyond the bedroom count
    pub max_extra_bathrooms: f64,
    /// Balconies allowed per bedroom
    pub max_balconies_per_room: f64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_area_per_room: 250.0,
            max_extra_bathrooms: 1.0,
            max_balconies_per_room: 1.0,
        }
    }
}

/// Identifier of the rule that produced a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    FloorOrder,
    BathroomRatio,
    BalconyRatio,
    MinimumArea,
    CarpetExceedsSuper,
    PositiveArea,
    NonNegativeCount,
    MinimumOne,
    WholeNumber,
    ValueType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule: RuleId,
    pub message: String,
}

impl Violation {
    fn new(rule: RuleId, message: String) -> Self {
        Self { rule, message }
    }
}

type Rule = fn(&RawAttributes, &ValidationRules, &mut Vec<Violation>);

/// Evaluation order; the first five are the canonical plausibility rules
const RULES: [Rule; 10] = [
    floor_order,
    bathroom_ratio,
    balcony_ratio,
    minimum_area,
    carpet_exceeds_super,
    positive_area,
    non_negative_counts,
    minimum_one,
    whole_numbers,
    value_types,
];

/// Rule checker with fixed parameters
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: ValidationRules,
}

impl Validator {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// All violations, in rule order. Empty means the input may be encoded.
    pub fn validate(&self, raw: &RawAttributes) -> Vec<Violation> {
        let mut violations = Vec::new();
        for rule in RULES {
            rule(raw, &self.rules, &mut violations);
        }
        violations
    }
}

/// Validate with the default rule parameters
pub fn validate(raw: &RawAttributes) -> Vec<Violation> {
    Validator::default().validate(raw)
}

/// One line per violation, in rule order
pub fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("- {}", v.message))
        .collect::<Vec<_>>()
        .join("\n")
}

fn floor_order(raw: &RawAttributes, _: &ValidationRules, out: &mut Vec<Violation>) {
    if let (Some(current), Some(total)) =
        (raw.number(names::CURRENT_FLOOR), raw.number(names::TOTAL_FLOOR))
    {
        if current > total {
            out.push(Violation::new(
                RuleId::FloorOrder,
                format!(
                    "Current floor ({}) cannot be greater than total floors ({})",
                    current, total
                ),
            ));
        }
    }
}

fn bathroom_ratio(raw: &RawAttributes, rules: &ValidationRules, out: &mut Vec<Violation>) {
    if let (Some(bathrooms), Some(bhk)) =
        (raw.number(names::BATHROOM_COUNT), raw.number(names::BHK))
    {
        let limit = bhk + rules.max_extra_bathrooms;
        if bathrooms > limit {
            out.push(Violation::new(
                RuleId::BathroomRatio,
                format!(
                    "Too many bathrooms for declared room count: {} bathrooms for {} BHK (at most {})",
                    bathrooms, bhk, limit
                ),
            ));
        }
    }
}

fn balcony_ratio(raw: &RawAttributes, rules: &ValidationRules, out: &mut Vec<Violation>) {
    if let (Some(balconies), Some(bhk)) =
        (raw.number(names::BALCONY_COUNT), raw.number(names::BHK))
    {
        let limit = bhk * rules.max_balconies_per_room;
        if balconies > limit {
            out.push(Violation::new(
                RuleId::BalconyRatio,
                format!(
                    "Too many balconies for declared room count: {} balconies for {} BHK (at most {})",
                    balconies, bhk, limit
                ),
            ));
        }
    }
}

fn minimum_area(raw: &RawAttributes, rules: &ValidationRules, out: &mut Vec<Violation>) {
    if let (Some(area), Some(bhk)) = (raw.number(names::CARPET_AREA), raw.number(names::BHK)) {
        let minimum = bhk * rules.min_area_per_room;
        if area < minimum {
            out.push(Violation::new(
                RuleId::MinimumArea,
                format!(
                    "Carpet area {} sq ft is below the minimum of {} sq ft for {} BHK",
                    area, minimum, bhk
                ),
            ));
        }
    }
}

fn carpet_exceeds_super(raw: &RawAttributes, _: &ValidationRules, out: &mut Vec<Violation>) {
    if let (Some(carpet), Some(super_area)) =
        (raw.number(names::CARPET_AREA), raw.number(names::SUPER_AREA))
    {
        if carpet > super_area {
            out.push(Violation::new(
                RuleId::CarpetExceedsSuper,
                format!(
                    "Carpet area ({}) cannot exceed super area ({})",
                    carpet, super_area
                ),
            ));
        }
    }
}

fn positive_area(raw: &RawAttributes, _: &ValidationRules, out: &mut Vec<Violation>) {
    for name in [names::CARPET_AREA, names::SUPER_AREA] {
        if let Some(v) = raw.number(name) {
            if !(v.is_finite() && v > 0.0) {
                out.push(Violation::new(
                    RuleId::PositiveArea,
                    format!("{} must be greater than 0 (got {})", name, v),
                ));
            }
        }
    }
}

fn non_negative_counts(raw: &RawAttributes, _: &ValidationRules, out: &mut Vec<Violation>) {
    for name in [names::BATHROOM_COUNT, names::BALCONY_COUNT] {
        if let Some(v) = raw.number(name) {
            if v < 0.0 {
                out.push(Violation::new(
                    RuleId::NonNegativeCount,
                    format!("{} cannot be negative (got {})", name, v),
                ));
            }
        }
    }
}

fn minimum_one(raw: &RawAttributes, _: &ValidationRules, out: &mut Vec<Violation>) {
    for name in [names::TOTAL_FLOOR, names::BHK] {
        if let Some(v) = raw.number(name) {
            if v < 1.0 {
                out.push(Violation::new(
                    RuleId::MinimumOne,
                    format!("{} must be at least 1 (got {})", name, v),
                ));
            }
        }
    }
}

fn whole_numbers(raw: &RawAttributes, _: &ValidationRules, out: &mut Vec<Violation>) {
    for name in names::INTEGER {
        if let Some(v) = raw.number(name) {
            if !v.is_finite() || v.fract() != 0.0 {
                out.push(Violation::new(
                    RuleId::WholeNumber,
                    format!("{} must be a whole number (got {})", name, v),
                ));
            }
        }
    }
}

fn value_types(raw: &RawAttributes, _: &ValidationRules, out: &mut Vec<Violation>) {
    for name in names::NUMERIC {
        if let Some(AttributeValue::Category(s)) = raw.get(name) {
            out.push(Violation::new(
                RuleId::ValueType,
                format!("{} must be a number (got \"{}\")", name, s),
            ));
        }
    }
    for name in names::CATEGORICAL {
        if let Some(AttributeValue::Number(n)) = raw.get(name) {
            out.push(Violation::new(
                RuleId::ValueType,
                format!("{} must be a category label (got {})", name, n),
            ));
        }
    }
}
