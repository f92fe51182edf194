use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single normalized reconciliation submission.
///
/// Built by the normalizer from a raw tabular row; immutable once read.
/// Absent source fields arrive as their coerced defaults (empty text,
/// `None` dates, zero amounts).
#[derive(Debug, Clone, Default)]
pub struct ReconciliationRecord {
    pub entity: String,
    pub account_id: String,
    pub account_name: String,
    pub period_start_date: Option<NaiveDate>,
    pub period_end_date: Option<NaiveDate>,
    pub gl_ending_balance: f64,
    pub subledger_ending_balance: f64,
    pub preparer: String,
    pub prepared_on: Option<NaiveDate>,
    pub approver: String,
    pub approved_on: Option<NaiveDate>,
    pub reconciling_items_count: i64,
    pub items_over_aging_threshold: i64,
    pub action_plan_present: bool,
    pub documentation_links: String,
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pass,
    Warn,
    Fail,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Warn => write!(f, "warn"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Ordered severity: low < medium < high. Escalation only ever moves up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Raise to at least `floor`. Never downgrades.
    pub fn raise_to(&mut self, floor: Severity) {
        if floor > *self {
            *self = floor;
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Verdict for one record. Pure function output, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub entity: String,
    pub account_id: String,
    pub account_name: String,
    pub period_end_date: Option<NaiveDate>,
    pub status: Status,
    pub severity: Severity,
    /// Failure messages joined with " | ", or the fixed all-passed message.
    pub rationale: String,
    /// gl_ending_balance − subledger_ending_balance, exactly.
    pub variance_amount: f64,
    /// Days past the SLA; 0 when on time or not computable.
    pub sla_days_over: i64,
    pub sod_violation: bool,
    pub aged_items_flag: bool,
    pub evidence_link: String,
}

// ---------------------------------------------------------------------------
// Summary + Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct EvalSummary {
    pub total_records: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
    pub sod_violations: usize,
    pub aged_items: usize,
    pub status_counts: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvalMeta {
    /// UTC timestamp identifier for the batch, `%Y%m%d%H%M%S`.
    pub run_id: String,
    pub checklist_version: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub meta: EvalMeta,
    pub summary: EvalSummary,
    pub results: Vec<EvaluationResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn raise_to_escalates() {
        let mut s = Severity::Low;
        s.raise_to(Severity::Medium);
        assert_eq!(s, Severity::Medium);
        s.raise_to(Severity::High);
        assert_eq!(s, Severity::High);
    }

    #[test]
    fn raise_to_never_downgrades() {
        let mut s = Severity::High;
        s.raise_to(Severity::Medium);
        assert_eq!(s, Severity::High);
        s.raise_to(Severity::Low);
        assert_eq!(s, Severity::High);
    }

    #[test]
    fn display_values() {
        assert_eq!(Status::Warn.to_string(), "warn");
        assert_eq!(Severity::Medium.to_string(), "medium");
    }
}
