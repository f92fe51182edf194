use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Evaluation thresholds, provided once per run and read-only thereafter.
///
/// A partial JSON document merges over the defaults: fields the document
/// omits keep their default value. Unknown keys are rejected so a typoed
/// threshold cannot silently fall back to its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Criteria {
    /// Max allowed days between period end and approval.
    pub timeliness_sla_days: u32,
    /// Absolute dollar tolerance for balance variance.
    pub tieout_tolerance_abs: f64,
    /// Tolerance as a fraction of GL balance magnitude.
    pub tieout_tolerance_pct: f64,
    /// Whether preparer must differ from approver.
    pub require_sod: bool,
    /// Whether an action plan waives the aging check.
    pub allow_items_over_threshold_with_plan: bool,
    /// Threshold used upstream to classify aged items. Carried through for
    /// reporting; aging status reaches the evaluator pre-counted.
    pub aging_threshold_days: u32,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            timeliness_sla_days: 5,
            tieout_tolerance_abs: 1000.0,
            tieout_tolerance_pct: 0.002,
            require_sod: true,
            allow_items_over_threshold_with_plan: true,
            aging_threshold_days: 60,
        }
    }
}

impl Criteria {
    pub fn from_json(input: &str) -> Result<Self, EvalError> {
        let criteria: Criteria =
            serde_json::from_str(input).map_err(|e| EvalError::CriteriaParse(e.to_string()))?;
        criteria.validate()?;
        Ok(criteria)
    }

    pub fn validate(&self) -> Result<(), EvalError> {
        if !self.tieout_tolerance_abs.is_finite() || self.tieout_tolerance_abs < 0.0 {
            return Err(EvalError::CriteriaValidation(format!(
                "tieout_tolerance_abs must be a non-negative number, got {}",
                self.tieout_tolerance_abs
            )));
        }
        if !self.tieout_tolerance_pct.is_finite() || self.tieout_tolerance_pct < 0.0 {
            return Err(EvalError::CriteriaValidation(format!(
                "tieout_tolerance_pct must be a non-negative fraction, got {}",
                self.tieout_tolerance_pct
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Criteria::default();
        assert_eq!(c.timeliness_sla_days, 5);
        assert_eq!(c.tieout_tolerance_abs, 1000.0);
        assert_eq!(c.tieout_tolerance_pct, 0.002);
        assert!(c.require_sod);
        assert!(c.allow_items_over_threshold_with_plan);
        assert_eq!(c.aging_threshold_days, 60);
    }

    #[test]
    fn parse_full_document() {
        let c = Criteria::from_json(
            r#"{
                "timeliness_sla_days": 10,
                "tieout_tolerance_abs": 250.0,
                "tieout_tolerance_pct": 0.001,
                "require_sod": false,
                "allow_items_over_threshold_with_plan": false,
                "aging_threshold_days": 90
            }"#,
        )
        .unwrap();
        assert_eq!(c.timeliness_sla_days, 10);
        assert_eq!(c.tieout_tolerance_abs, 250.0);
        assert!(!c.require_sod);
        assert_eq!(c.aging_threshold_days, 90);
    }

    #[test]
    fn partial_document_merges_over_defaults() {
        let c = Criteria::from_json(r#"{"timeliness_sla_days": 3}"#).unwrap();
        assert_eq!(c.timeliness_sla_days, 3);
        assert_eq!(c.tieout_tolerance_abs, 1000.0);
        assert!(c.require_sod);
    }

    #[test]
    fn reject_unknown_key() {
        let err = Criteria::from_json(r#"{"timelines_sla_days": 3}"#).unwrap_err();
        assert!(err.to_string().contains("parse error"));
    }

    #[test]
    fn reject_negative_tolerance() {
        let err = Criteria::from_json(r#"{"tieout_tolerance_abs": -5.0}"#).unwrap_err();
        assert!(err.to_string().contains("tieout_tolerance_abs"));
    }

    #[test]
    fn reject_negative_pct() {
        let err = Criteria::from_json(r#"{"tieout_tolerance_pct": -0.1}"#).unwrap_err();
        assert!(err.to_string().contains("tieout_tolerance_pct"));
    }
}
