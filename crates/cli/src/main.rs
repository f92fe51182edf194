// glrecon CLI - headless GL reconciliation compliance checks

mod exit_codes;
mod fetch;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use glrecon_engine::Criteria;
use glrecon_io::normalize::{normalize, ColumnMap};
use glrecon_io::table::RawTable;

use exit_codes::{
    EXIT_CHECKS_FAILED, EXIT_CHECKS_WARNED, EXIT_ERROR, EXIT_NO_DATA, EXIT_SUCCESS, EXIT_USAGE,
};

/// Error carrying its exit code to `main`.
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

fn cli_err(code: u8, message: impl Into<String>) -> CliError {
    CliError {
        code,
        message: message.into(),
        hint: None,
    }
}

#[derive(Parser)]
#[command(name = "glrecon")]
#[command(about = "GL reconciliation compliance checker (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate reconciliation packages and write a results workbook
    #[command(after_help = "\
Exit code 3 indicates failed records, 4 warnings only, 5 no readable data.
Unreadable inputs are skipped with a note; the run continues.

Examples:
  glrecon run recons/ --output-xlsx gl_recon_results.xlsx
  glrecon run close.xlsx adjustments.csv --criteria criteria.json
  glrecon run recons/ --column-map colmap.json --output-csv results.csv
  glrecon run --sheet-url 'https://docs.google.com/spreadsheets/d/<id>/edit#gid=0' --json")]
    Run {
        /// Input files or directories (.csv/.xlsx)
        inputs: Vec<PathBuf>,

        /// Published spreadsheet URL, fetched as CSV
        #[arg(long)]
        sheet_url: Option<String>,

        /// Criteria JSON document, merged over defaults
        #[arg(long)]
        criteria: Option<PathBuf>,

        /// Column-map JSON document (standard field -> source header)
        #[arg(long)]
        column_map: Option<PathBuf>,

        /// Results workbook path
        #[arg(long)]
        output_xlsx: Option<PathBuf>,

        /// Results CSV path
        #[arg(long)]
        output_csv: Option<PathBuf>,

        /// Checklist version label stamped on results
        #[arg(long, default_value = "v1")]
        checklist_version: String,

        /// Output the full report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate criteria and column-map documents without running
    #[command(after_help = "\
Examples:
  glrecon validate --criteria criteria.json
  glrecon validate --criteria criteria.json --column-map colmap.json")]
    Validate {
        /// Criteria JSON document
        #[arg(long)]
        criteria: Option<PathBuf>,

        /// Column-map JSON document
        #[arg(long)]
        column_map: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            inputs,
            sheet_url,
            criteria,
            column_map,
            output_xlsx,
            output_csv,
            checklist_version,
            json,
        } => cmd_run(
            inputs,
            sheet_url,
            criteria,
            column_map,
            output_xlsx,
            output_csv,
            checklist_version,
            json,
        ),
        Commands::Validate {
            criteria,
            column_map,
        } => cmd_validate(criteria, column_map),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(err.code)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    inputs: Vec<PathBuf>,
    sheet_url: Option<String>,
    criteria_path: Option<PathBuf>,
    column_map_path: Option<PathBuf>,
    output_xlsx: Option<PathBuf>,
    output_csv: Option<PathBuf>,
    checklist_version: String,
    json_output: bool,
) -> Result<(), CliError> {
    if inputs.is_empty() && sheet_url.is_none() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: "no inputs given".into(),
            hint: Some("pass files/directories, or --sheet-url".into()),
        });
    }

    let criteria = load_criteria(criteria_path.as_deref())?;
    let column_map = load_column_map(column_map_path.as_deref())?;

    // Collect raw tables, skipping unreadable sources.
    let mut tables: Vec<RawTable> = Vec::new();
    for path in collect_inputs(&inputs) {
        match load_table(&path) {
            Ok(table) => tables.push(table),
            Err(e) => eprintln!("skipping {}: {e}", path.display()),
        }
    }
    if let Some(ref url) = sheet_url {
        match fetch::fetch_sheet(url) {
            Ok(table) => tables.push(table),
            Err(e) => eprintln!("skipping sheet URL: {e}"),
        }
    }

    let records: Vec<_> = tables
        .iter()
        .flat_map(|table| normalize(table, &column_map))
        .collect();

    if records.is_empty() {
        return Err(cli_err(
            EXIT_NO_DATA,
            "no data: no readable records in any input",
        ));
    }

    let report = glrecon_engine::run(&records, &criteria, &checklist_version);

    if let Some(ref path) = output_xlsx {
        glrecon_io::xlsx::export_workbook(path, &records, &criteria, &report)
            .map_err(|e| cli_err(EXIT_ERROR, e))?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(ref path) = output_csv {
        glrecon_io::csv::export_results(path, &report.results, &report.meta)
            .map_err(|e| cli_err(EXIT_ERROR, e))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| cli_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &report.summary;
    eprintln!(
        "{} record(s): {} pass, {} warn, {} fail ({} SoD violations, {} aged-item flags)",
        s.total_records, s.passed, s.warned, s.failed, s.sod_violations, s.aged_items,
    );

    if s.failed > 0 {
        return Err(cli_err(EXIT_CHECKS_FAILED, "failed records present"));
    }
    if s.warned > 0 {
        return Err(cli_err(EXIT_CHECKS_WARNED, "warnings present"));
    }
    Ok(())
}

fn cmd_validate(
    criteria_path: Option<PathBuf>,
    column_map_path: Option<PathBuf>,
) -> Result<(), CliError> {
    if criteria_path.is_none() && column_map_path.is_none() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: "nothing to validate".into(),
            hint: Some("pass --criteria and/or --column-map".into()),
        });
    }

    if criteria_path.is_some() {
        let criteria = load_criteria(criteria_path.as_deref())?;
        eprintln!(
            "valid: criteria (sla {} days, tolerance abs {} / pct {}, sod {})",
            criteria.timeliness_sla_days,
            criteria.tieout_tolerance_abs,
            criteria.tieout_tolerance_pct,
            if criteria.require_sod {
                "required"
            } else {
                "waived"
            },
        );
    }
    if column_map_path.is_some() {
        let column_map = load_column_map(column_map_path.as_deref())?;
        eprintln!(
            "valid: column map ({} override(s))",
            column_map.override_count(),
        );
    }
    Ok(())
}

fn load_criteria(path: Option<&Path>) -> Result<Criteria, CliError> {
    match path {
        Some(path) => {
            let doc = std::fs::read_to_string(path)
                .map_err(|e| cli_err(EXIT_USAGE, format!("cannot read {}: {e}", path.display())))?;
            Criteria::from_json(&doc).map_err(|e| cli_err(EXIT_USAGE, e.to_string()))
        }
        None => Ok(Criteria::default()),
    }
}

fn load_column_map(path: Option<&Path>) -> Result<ColumnMap, CliError> {
    match path {
        Some(path) => {
            let doc = std::fs::read_to_string(path)
                .map_err(|e| cli_err(EXIT_USAGE, format!("cannot read {}: {e}", path.display())))?;
            ColumnMap::from_json(&doc).map_err(|e| cli_err(EXIT_USAGE, e))
        }
        None => Ok(ColumnMap::default()),
    }
}

/// Expand directories into their spreadsheet files, sorted for a
/// deterministic record order. Unreadable directories are skipped with a
/// note, like any other source.
fn collect_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            match std::fs::read_dir(input) {
                Ok(entries) => {
                    let mut found: Vec<PathBuf> = entries
                        .filter_map(|entry| entry.ok())
                        .map(|entry| entry.path())
                        .filter(|path| is_spreadsheet(path))
                        .collect();
                    found.sort();
                    files.extend(found);
                }
                Err(e) => eprintln!("skipping {}: {e}", input.display()),
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

fn is_spreadsheet(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref(),
        Some("csv" | "tsv" | "xlsx" | "xls" | "xlsb" | "ods")
    )
}

/// Read one source as a raw table, dispatching on extension. Anything that
/// is not an Excel format is treated as delimited text.
fn load_table(path: &Path) -> Result<RawTable, String> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("xlsx" | "xls" | "xlsb" | "ods") => glrecon_io::xlsx::import(path),
        _ => glrecon_io::csv::import(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn spreadsheet_extensions() {
        assert!(is_spreadsheet(Path::new("a.csv")));
        assert!(is_spreadsheet(Path::new("a.XLSX")));
        assert!(is_spreadsheet(Path::new("a.ods")));
        assert!(!is_spreadsheet(Path::new("a.txt")));
        assert!(!is_spreadsheet(Path::new("a")));
    }

    #[test]
    fn collect_expands_directories_sorted() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "entity\nUS01\n").unwrap();
        fs::write(dir.path().join("a.csv"), "entity\nUS02\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let files = collect_inputs(&[dir.path().to_path_buf()]);
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.csv"));
        assert!(files[1].ends_with("b.csv"));
    }

    #[test]
    fn collect_keeps_explicit_files() {
        let files = collect_inputs(&[PathBuf::from("missing.csv")]);
        assert_eq!(files, vec![PathBuf::from("missing.csv")]);
    }

    #[test]
    fn load_table_dispatches_to_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.csv");
        fs::write(&path, "entity,account_id\nUS01,1000\n").unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.headers, vec!["entity", "account_id"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn load_table_reports_unreadable_source() {
        let err = load_table(Path::new("does-not-exist.csv")).unwrap_err();
        assert!(!err.is_empty());
    }
}
