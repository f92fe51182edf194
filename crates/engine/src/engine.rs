use crate::checks::{check_aging, check_sod, check_tieout, check_timeliness, format_amount};
use crate::criteria::Criteria;
use crate::model::{EvalMeta, EvalReport, EvaluationResult, ReconciliationRecord, Severity, Status};
use crate::summary::compute_summary;

/// Fixed rationale for a record with no failing checks.
pub const ALL_PASSED: &str = "All checks passed within thresholds.";

/// Evaluate one record against the criteria.
///
/// Total: every input has already been coerced, so no check can fail to
/// produce an outcome. The four checks always run, in a fixed order, and
/// severity only ever escalates across them.
pub fn evaluate_record(record: &ReconciliationRecord, criteria: &Criteria) -> EvaluationResult {
    let tieout = check_tieout(record, criteria);
    let sod_pass = check_sod(record, criteria);
    let timeliness = check_timeliness(record, criteria);
    let aging_pass = check_aging(record, criteria);

    let mut failures: Vec<String> = Vec::new();
    let mut severity = Severity::Low;

    if !tieout.passed {
        failures.push(format!(
            "Tie-out variance {} exceeds tolerance {}",
            format_amount(tieout.variance),
            format_amount(tieout.tolerance),
        ));
        severity.raise_to(Severity::High);
    }
    if !sod_pass {
        failures.push("Segregation of duties failed (preparer equals approver)".to_string());
        severity.raise_to(Severity::High);
    }
    if !timeliness.passed {
        failures.push(format!(
            "Approval exceeded SLA by {} day(s)",
            timeliness.days_over
        ));
        severity.raise_to(Severity::Medium);
    }
    if !aging_pass {
        failures.push("Aged items without action plan".to_string());
        severity.raise_to(Severity::Medium);
    }

    let status = if failures.is_empty() {
        Status::Pass
    } else if severity == Severity::High {
        Status::Fail
    } else {
        Status::Warn
    };

    let rationale = if failures.is_empty() {
        ALL_PASSED.to_string()
    } else {
        failures.join(" | ")
    };

    EvaluationResult {
        entity: record.entity.clone(),
        account_id: record.account_id.clone(),
        account_name: record.account_name.clone(),
        period_end_date: record.period_end_date,
        status,
        severity,
        rationale,
        variance_amount: tieout.variance,
        sla_days_over: timeliness.days_over,
        sod_violation: !sod_pass,
        aged_items_flag: !aging_pass,
        evidence_link: record.documentation_links.clone(),
    }
}

/// Evaluate records in input order. One result per record; records are
/// independent, so the pass is a plain map.
pub fn evaluate(records: &[ReconciliationRecord], criteria: &Criteria) -> Vec<EvaluationResult> {
    records
        .iter()
        .map(|record| evaluate_record(record, criteria))
        .collect()
}

/// Evaluate a batch and wrap it with run metadata and summary counts.
pub fn run(
    records: &[ReconciliationRecord],
    criteria: &Criteria,
    checklist_version: &str,
) -> EvalReport {
    let results = evaluate(records, criteria);
    let summary = compute_summary(&results);
    let now = chrono::Utc::now();
    EvalReport {
        meta: EvalMeta {
            run_id: now.format("%Y%m%d%H%M%S").to_string(),
            checklist_version: checklist_version.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: now.to_rfc3339(),
        },
        summary,
        results,
    }
}
