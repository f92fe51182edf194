//! Row and column layout shared by the CSV and workbook sinks.

use chrono::NaiveDate;

use glrecon_engine::model::{EvalMeta, EvaluationResult, ReconciliationRecord};
use glrecon_engine::Criteria;

/// Results columns, in contract order. The trailing run identifier and
/// checklist version tie each row back to the batch that produced it.
pub const RESULT_COLUMNS: &[&str] = &[
    "entity",
    "account_id",
    "account_name",
    "period_end_date",
    "status",
    "severity",
    "rationale",
    "variance_amount",
    "sla_days_over",
    "sod_violation",
    "aged_items_flag",
    "evidence_link",
    "run_id",
    "checklist_version",
];

/// Criteria sheet columns, one value row beneath.
pub const CRITERIA_COLUMNS: &[&str] = &[
    "timeliness_sla_days",
    "tieout_tolerance_abs",
    "tieout_tolerance_pct",
    "require_sod",
    "allow_items_over_threshold_with_plan",
    "aging_threshold_days",
];

pub fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn result_row(result: &EvaluationResult, meta: &EvalMeta) -> Vec<String> {
    vec![
        result.entity.clone(),
        result.account_id.clone(),
        result.account_name.clone(),
        date_cell(result.period_end_date),
        result.status.to_string(),
        result.severity.to_string(),
        result.rationale.clone(),
        result.variance_amount.to_string(),
        result.sla_days_over.to_string(),
        result.sod_violation.to_string(),
        result.aged_items_flag.to_string(),
        result.evidence_link.clone(),
        meta.run_id.clone(),
        meta.checklist_version.clone(),
    ]
}

/// One normalized record in standard column order (see
/// `normalize::STANDARD_COLUMNS`).
pub fn record_row(record: &ReconciliationRecord) -> Vec<String> {
    vec![
        record.entity.clone(),
        record.account_id.clone(),
        record.account_name.clone(),
        date_cell(record.period_start_date),
        date_cell(record.period_end_date),
        record.gl_ending_balance.to_string(),
        record.subledger_ending_balance.to_string(),
        record.preparer.clone(),
        date_cell(record.prepared_on),
        record.approver.clone(),
        date_cell(record.approved_on),
        record.reconciling_items_count.to_string(),
        record.items_over_aging_threshold.to_string(),
        record.action_plan_present.to_string(),
        record.documentation_links.clone(),
    ]
}

pub fn criteria_row(criteria: &Criteria) -> Vec<String> {
    vec![
        criteria.timeliness_sla_days.to_string(),
        criteria.tieout_tolerance_abs.to_string(),
        criteria.tieout_tolerance_pct.to_string(),
        criteria.require_sod.to_string(),
        criteria
            .allow_items_over_threshold_with_plan
            .to_string(),
        criteria.aging_threshold_days.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glrecon_engine::{evaluate, Criteria, ReconciliationRecord};

    #[test]
    fn result_row_matches_column_order() {
        let record = ReconciliationRecord {
            entity: "US01".into(),
            account_id: "1000".into(),
            account_name: "Cash".into(),
            preparer: "A.Kim".into(),
            approver: "B.Osei".into(),
            documentation_links: "https://evidence.example/1".into(),
            ..ReconciliationRecord::default()
        };
        let results = evaluate(&[record], &Criteria::default());
        let meta = glrecon_engine::model::EvalMeta {
            run_id: "20240201120000".into(),
            checklist_version: "v1".into(),
            engine_version: "0.1.0".into(),
            run_at: "2024-02-01T12:00:00Z".into(),
        };

        let row = result_row(&results[0], &meta);
        assert_eq!(row.len(), RESULT_COLUMNS.len());
        assert_eq!(row[0], "US01");
        assert_eq!(row[4], "pass");
        assert_eq!(row[5], "low");
        assert_eq!(row[11], "https://evidence.example/1");
        assert_eq!(row[13], "v1");
    }

    #[test]
    fn record_row_has_standard_width() {
        let row = record_row(&ReconciliationRecord::default());
        assert_eq!(row.len(), crate::normalize::STANDARD_COLUMNS.len());
    }

    #[test]
    fn criteria_row_matches_columns() {
        let row = criteria_row(&Criteria::default());
        assert_eq!(row.len(), CRITERIA_COLUMNS.len());
        assert_eq!(row[0], "5");
        assert_eq!(row[1], "1000");
        assert_eq!(row[3], "true");
    }
}
