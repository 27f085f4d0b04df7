//! Batch table reading
//!
//! Constituent tables arrive as pre-parsed rows of text cells. The first row
//! is a header; every following non-blank row produces one material. Row
//! numbers in errors are 1-based and count the header.

use tracing::warn;

use crate::errors::{PlyError, PlyResult};

/// Expected layout of a constituent table
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableSchema {
    pub source_name: &'static str,
    pub columns: &'static [&'static str],
}

/// Check the table structure, then build one item per data row.
///
/// Structural problems are `InvalidFormat`; a row whose values are rejected
/// keeps its `InvalidArgument` but gains the row number.
pub(crate) fn read_rows<S, T, F>(rows: &[Vec<S>], schema: &TableSchema, mut build: F) -> PlyResult<Vec<T>>
where
    S: AsRef<str>,
    F: FnMut(&[&str]) -> PlyResult<T>,
{
    let header = rows.first().ok_or_else(|| {
        PlyError::invalid_format(schema.source_name, "Table is empty; expected a header row")
    })?;

    if header.len() != schema.columns.len() {
        return Err(PlyError::invalid_format(
            schema.source_name,
            format!(
                "Header has {} columns, expected {} ({})",
                header.len(),
                schema.columns.len(),
                schema.columns.join(", ")
            ),
        ));
    }

    let mut items = Vec::with_capacity(rows.len().saturating_sub(1));
    for (offset, row) in rows.iter().enumerate().skip(1) {
        let row_number = offset + 1;
        let cells: Vec<&str> = row.iter().map(|c| c.as_ref().trim()).collect();

        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }

        if cells.len() != schema.columns.len() {
            return Err(PlyError::invalid_format(
                schema.source_name,
                format!(
                    "Row {} has {} columns, expected {}",
                    row_number,
                    cells.len(),
                    schema.columns.len()
                ),
            ));
        }

        let item = build(&cells).map_err(|e| {
            warn!(source = schema.source_name, row = row_number, error = %e, "rejected table row");
            with_row(e, row_number)
        })?;
        items.push(item);
    }

    Ok(items)
}

fn with_row(error: PlyError, row_number: usize) -> PlyError {
    match error {
        PlyError::InvalidArgument { field, value, reason } => PlyError::InvalidArgument {
            field,
            value,
            reason: format!("row {}: {}", row_number, reason),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: TableSchema = TableSchema {
        source_name: "pairs",
        columns: &["a", "b"],
    };

    fn concat(cells: &[&str]) -> PlyResult<String> {
        if cells[1] == "bad" {
            return Err(PlyError::invalid_argument("b", "bad", "rejected"));
        }
        Ok(format!("{}{}", cells[0], cells[1]))
    }

    #[test]
    fn test_reads_rows_after_header() {
        let rows = vec![vec!["a", "b"], vec!["x", "1"], vec!["", ""], vec![" y ", "2"]];
        let items = read_rows(&rows, &PAIRS, concat).unwrap();
        assert_eq!(items, vec!["x1".to_string(), "y2".to_string()]);
    }

    #[test]
    fn test_header_only_is_empty_batch() {
        let rows = vec![vec!["a", "b"]];
        assert!(read_rows(&rows, &PAIRS, concat).unwrap().is_empty());
    }

    #[test]
    fn test_structural_errors() {
        let empty: Vec<Vec<&str>> = Vec::new();
        assert_eq!(
            read_rows(&empty, &PAIRS, concat).unwrap_err().error_code(),
            "INVALID_FORMAT"
        );

        let ragged = vec![vec!["a", "b"], vec!["x", "1", "extra"]];
        let err = read_rows(&ragged, &PAIRS, concat).unwrap_err();
        assert!(err.to_string().contains("Row 2"));
    }

    #[test]
    fn test_row_number_added_to_argument_errors() {
        let rows = vec![vec!["a", "b"], vec!["x", "1"], vec!["z", "bad"]];
        match read_rows(&rows, &PAIRS, concat).unwrap_err() {
            PlyError::InvalidArgument { reason, .. } => assert_eq!(reason, "row 3: rejected"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
