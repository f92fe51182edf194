// CSV/TSV import and results export

use std::io::Read;
use std::path::Path;

use glrecon_engine::model::{EvalMeta, EvaluationResult};

use crate::report;
use crate::table::RawTable;

/// Import a delimited file as a raw table, sniffing the delimiter.
pub fn import(path: &Path) -> Result<RawTable, String> {
    let content = read_file_as_utf8(path)?;
    import_from_str(&content)
}

/// Import delimited text, sniffing the delimiter from the first lines.
pub fn import_from_str(content: &str) -> Result<RawTable, String> {
    import_with_delimiter(content, sniff_delimiter(content))
}

pub fn import_with_delimiter(content: &str, delimiter: u8) -> Result<RawTable, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(result) => result
            .map_err(|e| e.to_string())?
            .iter()
            .map(|h| h.to_string())
            .collect(),
        None => return Ok(RawTable::default()),
    };

    let mut rows = Vec::new();
    for result in records {
        let record = result.map_err(|e| e.to_string())?;
        let mut row: Vec<String> = record.iter().map(|f| f.to_string()).collect();
        // Flexible parsing can yield short rows; pad to the header width so
        // positional lookups stay in range.
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        // Higher field count breaks ties — more columns = more likely real delimiter
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Write evaluated results as CSV, one row per record plus header.
pub fn export_results(
    path: &Path,
    results: &[EvaluationResult],
    meta: &EvalMeta,
) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| e.to_string())?;

    writer
        .write_record(report::RESULT_COLUMNS)
        .map_err(|e| e.to_string())?;
    for result in results {
        writer
            .write_record(report::result_row(result, meta))
            .map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "entity,account_id,gl_ending_balance\nUS01,1000,100000\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "entity;account_id;gl_ending_balance\nUS01;1000;100000\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "entity\taccount_id\nUS01\t1000\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        let content = "entity;account_name\nUS01;\"Cash, Operating\"\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn import_basic() {
        let table = import_from_str("entity,account_id\nUS01,1000\nUS02,2000\n").unwrap();
        assert_eq!(table.headers, vec!["entity", "account_id"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["US01", "1000"]);
    }

    #[test]
    fn import_pads_short_rows() {
        let table = import_from_str("a,b,c\n1,2\n").unwrap();
        assert_eq!(table.rows[0], vec!["1", "2", ""]);
    }

    #[test]
    fn import_empty_content() {
        let table = import_from_str("").unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn import_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "entité,solde\nACMÉ,100\n" in Windows-1252 (0xE9 = é)
        let bytes = b"entit\xe9,solde\nACM\xc9,100\n";
        fs::write(&path, bytes).unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.headers[0], "entité");
        assert_eq!(table.rows[0][0], "ACMÉ");
    }

    #[test]
    fn export_results_roundtrip() {
        use glrecon_engine::{evaluate, Criteria, ReconciliationRecord};

        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let record = ReconciliationRecord {
            entity: "US01".into(),
            account_id: "1000".into(),
            preparer: "A.Kim".into(),
            approver: "B.Osei".into(),
            ..ReconciliationRecord::default()
        };
        let results = evaluate(&[record], &Criteria::default());
        let meta = glrecon_engine::model::EvalMeta {
            run_id: "20240201120000".into(),
            checklist_version: "v1".into(),
            engine_version: "0.1.0".into(),
            run_at: "2024-02-01T12:00:00Z".into(),
        };

        export_results(&path, &results, &meta).unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.headers, report::RESULT_COLUMNS);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], "US01");
        assert_eq!(table.rows[0][4], "pass");
        assert_eq!(table.rows[0][12], "20240201120000");
    }
}
