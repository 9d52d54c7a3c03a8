//! Price estimate and the units it can be rendered in

use crate::encoder::EncodingDiagnostic;
use serde::{Deserialize, Serialize};

/// Currency unit of one model output unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceUnit {
    /// Base currency unit
    #[default]
    Rupees,
    /// 100,000 rupees
    Lakhs,
    /// 100 rupees
    Hundreds,
}

impl PriceUnit {
    /// Rupees per one unit
    pub fn factor(self) -> f64 {
        match self {
            PriceUnit::Rupees => 1.0,
            PriceUnit::Lakhs => 100_000.0,
            PriceUnit::Hundreds => 100.0,
        }
    }
}

/// Model output plus what is needed to present it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    /// Prediction exactly as returned by the model
    pub value: f64,
    /// Unit the model was fit on
    pub unit: PriceUnit,
    pub diagnostics: Vec<EncodingDiagnostic>,
}

impl Estimate {
    pub fn new(value: f64, unit: PriceUnit) -> Self {
        Self { value, unit, diagnostics: Vec::new() }
    }

    /// Value converted into `target`
    pub fn in_unit(&self, target: PriceUnit) -> f64 {
        self.value * self.unit.factor() / target.factor()
    }

    pub fn in_rupees(&self) -> f64 {
        self.in_unit(PriceUnit::Rupees)
    }

    pub fn in_lakhs(&self) -> f64 {
        self.in_unit(PriceUnit::Lakhs)
    }

    pub fn in_hundreds(&self) -> f64 {
        self.in_unit(PriceUnit::Hundreds)
    }

    /// True when some attribute could not be matched to the schema
    pub fn has_unknown_categories(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, EncodingDiagnostic::UnknownCategory { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lakh_model_renders_in_rupees() {
        let estimate = Estimate::new(85.5, PriceUnit::Lakhs);
        assert_relative_eq!(estimate.in_rupees(), 8_550_000.0, epsilon = 1e-6);
        assert_relative_eq!(estimate.in_lakhs(), 85.5, epsilon = 1e-12);
        assert_relative_eq!(estimate.in_hundreds(), 85_500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rupee_model_renders_in_lakhs() {
        let estimate = Estimate::new(4_200_000.0, PriceUnit::Rupees);
        assert_relative_eq!(estimate.in_lakhs(), 42.0, epsilon = 1e-12);
        assert_relative_eq!(estimate.in_hundreds(), 42_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unit_parses_from_json() {
        let unit: PriceUnit = serde_json::from_str("\"lakhs\"").unwrap();
        assert_eq!(unit, PriceUnit::Lakhs);
    }
}
