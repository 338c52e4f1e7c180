//! Historical patient records, held read-only for display.

use std::path::Path;

use serde::Serialize;

use super::AssetError;
use crate::prediction::Field;

/// Largest page the data view or API will return at once.
pub const MAX_PAGE_SIZE: usize = 500;

/// Immutable in-memory table parsed from a delimited text file.
#[derive(Debug)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Position of each prediction field's column, in vector order.
    feature_columns: [usize; 10],
}

/// One window of rows, serialized by the data API.
#[derive(Debug, Serialize)]
pub struct DatasetPage<'a> {
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
    pub headers: &'a [String],
    /// Header positions of the ten model inputs, in vector order.
    pub feature_columns: &'a [usize],
    pub rows: &'a [Vec<String>],
}

impl DatasetPage<'_> {
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    pub fn has_next(&self) -> bool {
        self.offset + self.rows.len() < self.total
    }
}

/// Pick `;`, `\t` or `,` by counting occurrences on the header line.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let count = |d: u8| header.iter().filter(|b| **b == d).count();
    [b';', b'\t']
        .into_iter()
        .filter(|d| count(*d) > count(b','))
        .max_by_key(|d| count(*d))
        .unwrap_or(b',')
}

impl Dataset {
    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let bytes = super::read_asset(path)?;
        Self::parse(path, &bytes)
    }

    /// Parse already-read bytes; `path` is only used in diagnostics.
    pub fn parse(path: &Path, bytes: &[u8]) -> Result<Self, AssetError> {
        let malformed = |reason: String| AssetError::MalformedDataset {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(malformed("file is empty".into()));
        }

        let delimiter = sniff_delimiter(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| malformed(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut feature_columns = [0usize; 10];
        for field in Field::ALL {
            let column = field.column();
            feature_columns[field.index()] = headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(column))
                .ok_or_else(|| AssetError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })?;
        }

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(|e| malformed(format!("row {}: {e}", i + 1)))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::info!(
            path = %path.display(),
            rows = rows.len(),
            columns = headers.len(),
            delimiter = %(delimiter as char).escape_default(),
            "Dataset loaded"
        );

        Ok(Self {
            headers,
            rows,
            feature_columns,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows `[offset, offset + limit)`, with `limit` capped at
    /// [`MAX_PAGE_SIZE`]. An offset past the end yields an empty page.
    pub fn page(&self, offset: usize, limit: usize) -> DatasetPage<'_> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let start = offset.min(self.rows.len());
        let end = start.saturating_add(limit).min(self.rows.len());
        DatasetPage {
            offset: start,
            limit,
            total: self.rows.len(),
            headers: &self.headers,
            feature_columns: &self.feature_columns,
            rows: &self.rows[start..end],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,age,gender,height,weight,ap_hi,ap_lo,cholesterol,gluc,smoke,alco,active,cardio";

    fn csv_with_rows(n: usize) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for i in 0..n {
            out.push_str(&format!("{i},50,1,168,62,110,80,1,1,0,0,1,0\n"));
        }
        out
    }

    #[test]
    fn parses_comma_separated() {
        let ds = Dataset::parse(Path::new("t.csv"), csv_with_rows(3).as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.headers().len(), 13);
        let page = ds.page(0, 10);
        assert_eq!(page.rows[2][0], "2");
        assert_eq!(page.feature_columns, &[1, 2, 3, 4, 5, 6, 7, 8, 10, 11]);
        assert_eq!(page.feature_columns[Field::SystolicBp.index()], 5);
    }

    #[test]
    fn sniffs_semicolons() {
        let text = csv_with_rows(2).replace(',', ";");
        assert_eq!(sniff_delimiter(text.as_bytes()), b';');
        let ds = Dataset::parse(Path::new("t.csv"), text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.page(0, 10).rows[0][1], "50");
    }

    #[test]
    fn column_names_match_case_insensitively() {
        let text = csv_with_rows(1).replacen("ap_hi", "AP_HI", 1);
        let ds = Dataset::parse(Path::new("t.csv"), text.as_bytes()).unwrap();
        assert_eq!(ds.page(0, 1).feature_columns[Field::SystolicBp.index()], 5);
    }

    #[test]
    fn missing_prediction_column_is_fatal() {
        let text = csv_with_rows(1).replacen("gluc", "glucose_mg", 1);
        let err = Dataset::parse(Path::new("t.csv"), text.as_bytes()).unwrap_err();
        assert!(matches!(err, AssetError::MissingColumn { column: "gluc", .. }));
    }

    #[test]
    fn ragged_row_is_malformed() {
        let mut text = csv_with_rows(1);
        text.push_str("9,50,1\n");
        let err = Dataset::parse(Path::new("t.csv"), text.as_bytes()).unwrap_err();
        assert!(matches!(err, AssetError::MalformedDataset { .. }));
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn empty_file_is_malformed() {
        let err = Dataset::parse(Path::new("t.csv"), b"  \n").unwrap_err();
        assert!(matches!(err, AssetError::MalformedDataset { .. }));
    }

    #[test]
    fn header_only_is_an_empty_table() {
        let ds = Dataset::parse(Path::new("t.csv"), HEADER.as_bytes()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.page(0, 10).rows.len(), 0);
    }

    #[test]
    fn utf8_bom_is_ignored() {
        let text = format!("\u{FEFF}{}", csv_with_rows(1));
        let ds = Dataset::parse(Path::new("t.csv"), text.as_bytes()).unwrap();
        assert_eq!(ds.headers()[0], "id");
    }

    #[test]
    fn paging_windows_and_clamps() {
        let ds = Dataset::parse(Path::new("t.csv"), csv_with_rows(25).as_bytes()).unwrap();

        let first = ds.page(0, 10);
        assert_eq!(first.rows.len(), 10);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = ds.page(20, 10);
        assert_eq!(last.rows.len(), 5);
        assert!(last.has_previous());
        assert!(!last.has_next());

        let past = ds.page(1000, 10);
        assert_eq!(past.offset, 25);
        assert!(past.rows.is_empty());

        assert_eq!(ds.page(0, 10_000).limit, MAX_PAGE_SIZE);
        assert_eq!(ds.page(0, 0).limit, 1);
    }
}
