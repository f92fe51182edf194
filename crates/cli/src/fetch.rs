//! Published-sheet fetch.
//!
//! Translates a Google Sheets URL into its CSV export endpoint and
//! downloads it with a blocking client. A failed fetch is a skipped
//! source, never a fatal error; the run continues with the remaining
//! inputs.

use std::time::Duration;

use glrecon_io::table::RawTable;

const FETCH_TIMEOUT_SECS: u64 = 15;
const USER_AGENT: &str = concat!("glrecon/", env!("CARGO_PKG_VERSION"));

/// CSV export URL for a standard Sheets link, or None when the URL does
/// not carry a spreadsheet id. A `gid` in the query or fragment selects
/// the worksheet; absent, the first worksheet (gid 0) is used.
pub fn csv_export_url(url: &str) -> Option<String> {
    let id_re = regex::Regex::new(r"spreadsheets/d/([a-zA-Z0-9_-]+)").ok()?;
    let gid_re = regex::Regex::new(r"[?#&]gid=([0-9]+)").ok()?;

    let id = id_re.captures(url)?.get(1)?.as_str();
    let gid = gid_re
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("0");

    Some(format!(
        "https://docs.google.com/spreadsheets/d/{id}/export?format=csv&gid={gid}"
    ))
}

/// Fetch a published sheet as a raw table.
pub fn fetch_sheet(url: &str) -> Result<RawTable, String> {
    let export = csv_export_url(url)
        .ok_or_else(|| format!("not a recognizable spreadsheet URL: {url}"))?;
    fetch_csv(&export)
}

/// Download a CSV document and parse it as a raw table.
pub fn fetch_csv(url: &str) -> Result<RawTable, String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| format!("cannot build HTTP client: {e}"))?;

    let resp = client
        .get(url)
        .send()
        .map_err(|e| format!("fetch failed: {e}"))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(format!("fetch failed: HTTP {}", status.as_u16()));
    }

    let body = resp
        .text()
        .map_err(|e| format!("fetch failed reading body: {e}"))?;
    glrecon_io::csv::import_from_str(&body)
}
