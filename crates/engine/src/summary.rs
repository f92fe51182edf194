use std::collections::HashMap;

use crate::model::{EvalSummary, EvaluationResult, Status};

/// Compute summary statistics from evaluated results.
pub fn compute_summary(results: &[EvaluationResult]) -> EvalSummary {
    let mut status_counts: HashMap<String, usize> = HashMap::new();
    let mut passed = 0;
    let mut warned = 0;
    let mut failed = 0;
    let mut sod_violations = 0;
    let mut aged_items = 0;

    for r in results {
        *status_counts.entry(r.status.to_string()).or_insert(0) += 1;

        match r.status {
            Status::Pass => passed += 1,
            Status::Warn => warned += 1,
            Status::Fail => failed += 1,
        }
        if r.sod_violation {
            sod_violations += 1;
        }
        if r.aged_items_flag {
            aged_items += 1;
        }
    }

    EvalSummary {
        total_records: results.len(),
        passed,
        warned,
        failed,
        sod_violations,
        aged_items,
        status_counts,
    }
}
