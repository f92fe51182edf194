/// A raw tabular source: one header row plus data rows, all text.
///
/// Every record source (delimited file, workbook sheet, fetched export)
/// reduces to this shape before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of a header by exact name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lookup_is_exact() {
        let table = RawTable {
            headers: vec!["entity".into(), "Account_ID".into()],
            rows: vec![],
        };
        assert_eq!(table.column("entity"), Some(0));
        assert_eq!(table.column("account_id"), None);
        assert_eq!(table.column("Account_ID"), Some(1));
    }
}
