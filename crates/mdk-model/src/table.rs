#![deny(unsafe_code)]

use crate::ModelError;

/// The loaded source table: one header row plus string data rows.
///
/// Construction enforces symmetry, so a `RawTable` that exists has every
/// row at exactly the header width. The first asymmetric row fails
/// construction with its 1-based index and both widths.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ModelError> {
        let expected = headers.len();
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(ModelError::AsymmetricRow {
                    row: idx + 1,
                    expected,
                    found: row.len(),
                });
            }
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (the header does not count).
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Case-insensitive header lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.headers.iter().position(|h| h.to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn accepts_symmetric_rows() {
        let table = RawTable::new(
            row(&["id", "age"]),
            vec![row(&["1", "42"]), row(&["2", "39"])],
        )
        .unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn rejects_first_asymmetric_row() {
        let err = RawTable::new(
            row(&["id", "age"]),
            vec![row(&["1", "42"]), row(&["2"]), row(&["3", "4", "5"])],
        )
        .unwrap_err();
        match err {
            ModelError::AsymmetricRow {
                row,
                expected,
                found,
            } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn column_lookup_ignores_case() {
        let table = RawTable::new(row(&["SIDKRG", "Age"]), vec![]).unwrap();
        assert_eq!(table.column_index("sidkrg"), Some(0));
        assert_eq!(table.column_index("AGE"), Some(1));
        assert_eq!(table.column_index("missing"), None);
    }
}
