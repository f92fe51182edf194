//! The four compliance checks.
//!
//! Each check is a pure function over one record plus the criteria,
//! returning a typed outcome. `engine::evaluate_record` composes them in a
//! fixed order and owns severity escalation and message assembly.

use crate::criteria::Criteria;
use crate::model::ReconciliationRecord;

// ---------------------------------------------------------------------------
// Tie-out
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct TieoutOutcome {
    pub variance: f64,
    /// The resolved tolerance the variance was compared against.
    pub tolerance: f64,
    pub passed: bool,
}

/// GL balance must agree with the subledger within tolerance.
///
/// The absolute tolerance and the percentage-of-GL tolerance are not
/// additive: the larger of the two applies.
pub fn check_tieout(record: &ReconciliationRecord, criteria: &Criteria) -> TieoutOutcome {
    let variance = record.gl_ending_balance - record.subledger_ending_balance;
    let tolerance = criteria
        .tieout_tolerance_abs
        .max(record.gl_ending_balance.abs() * criteria.tieout_tolerance_pct);
    TieoutOutcome {
        variance,
        tolerance,
        passed: variance.abs() <= tolerance,
    }
}

// ---------------------------------------------------------------------------
// Segregation of duties
// ---------------------------------------------------------------------------

/// Preparer must differ from approver when segregation of duties is
/// required. The comparison is exact: no trimming, no case folding.
pub fn check_sod(record: &ReconciliationRecord, criteria: &Criteria) -> bool {
    if !criteria.require_sod {
        return true;
    }
    record.preparer != record.approver
}

// ---------------------------------------------------------------------------
// Timeliness
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct TimelinessOutcome {
    pub passed: bool,
    /// Days past the SLA; 0 when on time or when either date is absent.
    pub days_over: i64,
}

/// Approval must land within the SLA window after period end. A missing
/// date on either side passes vacuously.
pub fn check_timeliness(record: &ReconciliationRecord, criteria: &Criteria) -> TimelinessOutcome {
    let (approved_on, period_end) = match (record.approved_on, record.period_end_date) {
        (Some(a), Some(p)) => (a, p),
        _ => {
            return TimelinessOutcome {
                passed: true,
                days_over: 0,
            }
        }
    };
    // May be negative when approval precedes period end.
    let delta_days = (approved_on - period_end).num_days();
    let sla = i64::from(criteria.timeliness_sla_days);
    TimelinessOutcome {
        passed: delta_days <= sla,
        days_over: (delta_days - sla).max(0),
    }
}

// ---------------------------------------------------------------------------
// Aging
// ---------------------------------------------------------------------------

/// Items over the aging threshold need an action plan, and only when the
/// criteria allow the waiver at all.
pub fn check_aging(record: &ReconciliationRecord, criteria: &Criteria) -> bool {
    record.items_over_aging_threshold == 0
        || (criteria.allow_items_over_threshold_with_plan && record.action_plan_present)
}

// ---------------------------------------------------------------------------
// Currency rendering
// ---------------------------------------------------------------------------

/// Format a dollar amount with thousands separators and two decimals,
/// e.g. -1234.5 → "-1,234.50".
pub fn format_amount(value: f64) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    if value < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('.');
    grouped.push_str(frac_part);
    grouped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
