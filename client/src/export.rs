// CSV export of the currently filtered rows

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{SeaBlockError, SeaBlockResult};
use crate::models::{display_value, Row};

/// Renders rows as CSV text.
///
/// The header is the first row's field names. Every value is double-quoted
/// with embedded quotes doubled; missing and null values are empty.
pub fn to_csv(rows: &[Row]) -> SeaBlockResult<String> {
    let first = rows
        .first()
        .ok_or_else(|| SeaBlockError::Validation("No records to download.".to_string()))?;
    let headers: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| h.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        let values: Vec<String> = headers
            .iter()
            .map(|header| {
                let value = row.get(header.as_str()).map(display_value).unwrap_or_default();
                format!("\"{}\"", value.replace('"', "\"\""))
            })
            .collect();
        lines.push(values.join(","));
    }

    Ok(lines.join("\n"))
}

/// Writes the export into `dir` and returns the file path
pub fn write_csv(dir: &Path, file_name: &str, rows: &[Row]) -> SeaBlockResult<PathBuf> {
    let contents = to_csv(rows)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, contents)?;
    info!("Exported {} records to {}", rows.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Row> {
        vec![
            serde_json::from_value(json!({
                "transaction_id": "TX1",
                "comment": "said \"fresh\", honestly",
                "amount": 12.5,
                "expiry_date": null
            }))
            .unwrap(),
            serde_json::from_value(json!({
                "transaction_id": "TX2",
                "comment": "line\nbreak",
                "amount": 3
            }))
            .unwrap(),
        ]
    }

    #[test]
    fn test_header_follows_first_row_order() {
        let csv = to_csv(&rows()).unwrap();
        assert!(csv.starts_with("transaction_id,comment,amount,expiry_date\n"));
    }

    #[test]
    fn test_quotes_are_doubled() {
        let csv = to_csv(&rows()).unwrap();
        assert!(csv.contains(r#""TX1","said ""fresh"", honestly","12.5","""#));
    }

    #[test]
    fn test_standard_parser_recovers_values() {
        let csv_text = to_csv(&rows()).unwrap();
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "said \"fresh\", honestly");
        assert_eq!(&records[0][3], "");
        assert_eq!(&records[1][1], "line\nbreak");
        assert_eq!(&records[1][2], "3");
        assert_eq!(&records[1][3], "");
    }

    #[test]
    fn test_empty_export_is_rejected() {
        assert!(matches!(
            to_csv(&[]),
            Err(SeaBlockError::Validation(msg)) if msg == "No records to download."
        ));
    }
}
