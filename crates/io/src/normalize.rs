//! Column normalization: arbitrary source headers onto the standard schema.

use std::collections::HashMap;

use glrecon_engine::{coerce, ReconciliationRecord};

use crate::table::RawTable;

/// The standard schema, in column order.
pub const STANDARD_COLUMNS: &[&str] = &[
    "entity",
    "account_id",
    "account_name",
    "period_start_date",
    "period_end_date",
    "gl_ending_balance",
    "subledger_ending_balance",
    "preparer",
    "prepared_on",
    "approver",
    "approved_on",
    "reconciling_items_count",
    "items_over_aging_threshold",
    "action_plan_present",
    "documentation_links",
];

/// Standard-field → source-header mapping. Fields the document does not
/// mention map to themselves.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    overrides: HashMap<String, String>,
}

impl ColumnMap {
    pub fn from_json(input: &str) -> Result<Self, String> {
        let overrides: HashMap<String, String> =
            serde_json::from_str(input).map_err(|e| format!("column map parse error: {e}"))?;
        let map = Self { overrides };
        map.validate()?;
        Ok(map)
    }

    /// Reject keys that are not standard fields: a typo would otherwise
    /// silently map nothing.
    pub fn validate(&self) -> Result<(), String> {
        for key in self.overrides.keys() {
            if !STANDARD_COLUMNS.contains(&key.as_str()) {
                return Err(format!("column map: unknown standard field '{key}'"));
            }
        }
        Ok(())
    }

    /// Number of fields mapped away from their standard name.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Source header for a standard field.
    pub fn source<'a>(&'a self, field: &'a str) -> &'a str {
        self.overrides
            .get(field)
            .map(|s| s.as_str())
            .unwrap_or(field)
    }
}

/// Map a raw table onto the standard schema.
///
/// Absent columns and absent cells normalize to empty text, then coerce per
/// the engine contract: dates to `None`, numbers to zero, flags to false.
/// Identity and link fields are taken verbatim. Never fails.
pub fn normalize(table: &RawTable, map: &ColumnMap) -> Vec<ReconciliationRecord> {
    fn cell_at<'a>(row: &'a [String], indexes: &[Option<usize>], field: usize) -> &'a str {
        indexes[field]
            .and_then(|col| row.get(col))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    // Resolve each standard field to a source column index once.
    let indexes: Vec<Option<usize>> = STANDARD_COLUMNS
        .iter()
        .map(|field| table.column(map.source(field)))
        .collect();

    table
        .rows
        .iter()
        .map(|row| {
            let cell = |field: usize| cell_at(row, &indexes, field);
            ReconciliationRecord {
                entity: cell(0).to_string(),
                account_id: cell(1).to_string(),
                account_name: cell(2).to_string(),
                period_start_date: coerce::parse_date(cell(3)),
                period_end_date: coerce::parse_date(cell(4)),
                gl_ending_balance: coerce::parse_amount(cell(5)),
                subledger_ending_balance: coerce::parse_amount(cell(6)),
                preparer: cell(7).to_string(),
                prepared_on: coerce::parse_date(cell(8)),
                approver: cell(9).to_string(),
                approved_on: coerce::parse_date(cell(10)),
                reconciling_items_count: coerce::parse_count(cell(11)),
                items_over_aging_threshold: coerce::parse_count(cell(12)),
                action_plan_present: coerce::parse_flag(cell(13)),
                documentation_links: cell(14).to_string(),
            }
        })
        .collect()
}
