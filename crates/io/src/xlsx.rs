// Excel workbook import and results-workbook export

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use glrecon_engine::model::{EvalReport, ReconciliationRecord};
use glrecon_engine::Criteria;

use crate::normalize::STANDARD_COLUMNS;
use crate::report::{date_cell, CRITERIA_COLUMNS, RESULT_COLUMNS};
use crate::table::RawTable;
use crate::{SHEET_CRITERIA, SHEET_INPUT, SHEET_RESULTS};

/// Import the first worksheet of an Excel file (xlsx, xls, xlsb, ods) as a
/// raw table. The first row is the header.
pub fn import(path: &Path) -> Result<RawTable, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .ok_or_else(|| "Excel file contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(first)
        .map_err(|e| format!("Failed to read sheet '{}': {}", first, e))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(row) => row.iter().map(cell_text).collect(),
        None => return Ok(RawTable::default()),
    };

    let rows: Vec<Vec<String>> = rows_iter
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

/// Render a calamine cell as text. Integral floats drop the trailing
/// fraction so an account number exported as 1000.0 stays "1000".
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if datetime.time() == chrono::NaiveTime::MIN => {
                datetime.format("%Y-%m-%d").to_string()
            }
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => String::new(),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Write the results workbook: normalized input, criteria, and results as
/// three named sheets.
pub fn export_workbook(
    path: &Path,
    records: &[ReconciliationRecord],
    criteria: &Criteria,
    report: &EvalReport,
) -> Result<(), String> {
    let mut workbook = Workbook::new();

    write_input_sheet(workbook.add_worksheet(), records)?;
    write_criteria_sheet(workbook.add_worksheet(), criteria)?;
    write_results_sheet(workbook.add_worksheet(), report)?;

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;
    Ok(())
}

fn write_input_sheet(
    sheet: &mut Worksheet,
    records: &[ReconciliationRecord],
) -> Result<(), String> {
    sheet.set_name(SHEET_INPUT).map_err(xe)?;
    write_header(sheet, STANDARD_COLUMNS)?;

    for (i, r) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, &r.entity).map_err(xe)?;
        sheet.write_string(row, 1, &r.account_id).map_err(xe)?;
        sheet.write_string(row, 2, &r.account_name).map_err(xe)?;
        sheet
            .write_string(row, 3, date_cell(r.period_start_date))
            .map_err(xe)?;
        sheet
            .write_string(row, 4, date_cell(r.period_end_date))
            .map_err(xe)?;
        sheet.write_number(row, 5, r.gl_ending_balance).map_err(xe)?;
        sheet
            .write_number(row, 6, r.subledger_ending_balance)
            .map_err(xe)?;
        sheet.write_string(row, 7, &r.preparer).map_err(xe)?;
        sheet
            .write_string(row, 8, date_cell(r.prepared_on))
            .map_err(xe)?;
        sheet.write_string(row, 9, &r.approver).map_err(xe)?;
        sheet
            .write_string(row, 10, date_cell(r.approved_on))
            .map_err(xe)?;
        sheet
            .write_number(row, 11, r.reconciling_items_count as f64)
            .map_err(xe)?;
        sheet
            .write_number(row, 12, r.items_over_aging_threshold as f64)
            .map_err(xe)?;
        sheet
            .write_boolean(row, 13, r.action_plan_present)
            .map_err(xe)?;
        sheet
            .write_string(row, 14, &r.documentation_links)
            .map_err(xe)?;
    }
    Ok(())
}

fn write_criteria_sheet(sheet: &mut Worksheet, criteria: &Criteria) -> Result<(), String> {
    sheet.set_name(SHEET_CRITERIA).map_err(xe)?;
    write_header(sheet, CRITERIA_COLUMNS)?;

    sheet
        .write_number(1, 0, f64::from(criteria.timeliness_sla_days))
        .map_err(xe)?;
    sheet
        .write_number(1, 1, criteria.tieout_tolerance_abs)
        .map_err(xe)?;
    sheet
        .write_number(1, 2, criteria.tieout_tolerance_pct)
        .map_err(xe)?;
    sheet.write_boolean(1, 3, criteria.require_sod).map_err(xe)?;
    sheet
        .write_boolean(1, 4, criteria.allow_items_over_threshold_with_plan)
        .map_err(xe)?;
    sheet
        .write_number(1, 5, f64::from(criteria.aging_threshold_days))
        .map_err(xe)?;
    Ok(())
}

fn write_results_sheet(sheet: &mut Worksheet, report: &EvalReport) -> Result<(), String> {
    sheet.set_name(SHEET_RESULTS).map_err(xe)?;
    write_header(sheet, RESULT_COLUMNS)?;

    for (i, r) in report.results.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, &r.entity).map_err(xe)?;
        sheet.write_string(row, 1, &r.account_id).map_err(xe)?;
        sheet.write_string(row, 2, &r.account_name).map_err(xe)?;
        sheet
            .write_string(row, 3, date_cell(r.period_end_date))
            .map_err(xe)?;
        sheet
            .write_string(row, 4, r.status.to_string())
            .map_err(xe)?;
        sheet
            .write_string(row, 5, r.severity.to_string())
            .map_err(xe)?;
        sheet.write_string(row, 6, &r.rationale).map_err(xe)?;
        sheet.write_number(row, 7, r.variance_amount).map_err(xe)?;
        sheet
            .write_number(row, 8, r.sla_days_over as f64)
            .map_err(xe)?;
        sheet
            .write_boolean(row, 9, r.sod_violation)
            .map_err(xe)?;
        sheet
            .write_boolean(row, 10, r.aged_items_flag)
            .map_err(xe)?;
        sheet.write_string(row, 11, &r.evidence_link).map_err(xe)?;
        sheet
            .write_string(row, 12, &report.meta.run_id)
            .map_err(xe)?;
        sheet
            .write_string(row, 13, &report.meta.checklist_version)
            .map_err(xe)?;
    }
    Ok(())
}

fn write_header(sheet: &mut Worksheet, columns: &[&str]) -> Result<(), String> {
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).map_err(xe)?;
    }
    Ok(())
}

fn xe(e: XlsxError) -> String {
    format!("Failed to write cell: {}", e)
}
