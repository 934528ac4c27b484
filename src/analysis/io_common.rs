use std::path::Path;

use crate::analysis::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_name(idx: usize) -> String {
    format!("Alternative {}", idx + 1)
}

/// Turns raw rows of cells into a table.
///
/// `rows` holds the line number of each row (1-based) and its cells. The row
/// just above `first_row` is the header with the criterion names.
pub fn assemble_table(
    rows: &[(usize, Vec<String>)],
    ds: &DataSource,
) -> AnalysisResult<ParsedTable> {
    let first_row = ds.first_value_row_index()?;
    let first_col = ds.first_value_column_index()?;
    let name_col = ds.name_column_index()?;
    ensure!(
        name_col < first_col,
        LayoutSnafu {
            message: "the name column must be before the first value column".to_string()
        }
    );

    let criterion_names: Option<Vec<String>> = if first_row > 0 {
        let (_, header) = rows.get(first_row - 1).context(EmptyInputSnafu {})?;
        debug!("assemble_table: header: {:?}", header);
        Some(
            header
                .iter()
                .skip(first_col)
                .map(|s| s.trim().to_string())
                .collect(),
        )
    } else {
        None
    };

    let mut alternatives: Vec<ParsedAlternative> = Vec::new();
    let mut expected: Option<usize> = criterion_names.as_ref().map(|v| v.len());
    for (idx, (lineno, cells)) in rows.iter().skip(first_row).enumerate() {
        let lineno = *lineno;
        // Fully blank rows are dropped.
        if cells.iter().all(|c| c.trim().is_empty()) {
            debug!("assemble_table: skipping blank line {}", lineno);
            continue;
        }
        let name = match cells.get(name_col).map(|s| s.trim()) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => make_default_name(idx),
        };
        let value_cells: &[String] = cells.get(first_col..).unwrap_or(&[]);
        let num_values = *expected.get_or_insert(value_cells.len());
        ensure!(
            value_cells.len() == num_values,
            RaggedLineSnafu {
                lineno,
                expected: num_values,
                found: value_cells.len(),
            }
        );
        let values = value_cells
            .iter()
            .enumerate()
            .map(|(j, s)| parse_value(s, lineno, first_col + j + 1))
            .collect::<AnalysisResult<Vec<f64>>>()?;
        debug!("assemble_table: line {}: {} {:?}", lineno, name, values);
        alternatives.push(ParsedAlternative { name, values });
    }
    ensure!(!alternatives.is_empty(), EmptyInputSnafu {});

    Ok(ParsedTable {
        criterion_names,
        alternatives,
    })
}

/// `column` is 1-based, for the error messages.
pub fn parse_value(content: &str, lineno: usize, column: usize) -> AnalysisResult<f64> {
    let trimmed = content.trim();
    match trimmed.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x),
        _ => ParsingValueSnafu {
            lineno,
            column,
            content: trimmed.to_string(),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(lineno: usize, cells: &[&str]) -> (usize, Vec<String>) {
        (lineno, cells.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("data/laptops.csv"), "laptops");
        assert_eq!(simplify_file_name("laptops"), "laptops");
    }

    #[test]
    fn values() {
        assert_eq!(parse_value(" 7.5 ", 1, 1).unwrap(), 7.5);
        assert_eq!(parse_value("-3", 1, 1).unwrap(), -3.0);
        assert!(parse_value("", 1, 1).is_err());
        assert!(parse_value("NaN", 1, 1).is_err());
        assert!(parse_value("seven", 1, 1).is_err());
    }

    #[test]
    fn table_with_header() {
        let rows = vec![
            row(1, &["Alternative", "Harga", "Kualitas"]),
            row(2, &["Laptop A", "8", "6"]),
            row(3, &["", "", ""]),
            row(4, &["", "7", "9"]),
        ];
        let table = assemble_table(&rows, &DataSource::from_file("csv", "x.csv")).unwrap();
        assert_eq!(
            table.criterion_names,
            Some(vec!["Harga".to_string(), "Kualitas".to_string()])
        );
        assert_eq!(table.alternatives.len(), 2);
        assert_eq!(table.alternatives[0].name, "Laptop A");
        assert_eq!(table.alternatives[1].name, "Alternative 3");
        assert_eq!(table.alternatives[1].values, vec![7.0, 9.0]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![
            row(1, &["Alternative", "Harga", "Kualitas"]),
            row(2, &["Laptop A", "8"]),
        ];
        let err = assemble_table(&rows, &DataSource::from_file("csv", "x.csv")).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::RaggedLine {
                lineno: 2,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn bad_cell_reports_its_position() {
        let rows = vec![row(1, &["n", "a"]), row(2, &["x", "abc"])];
        let err = assemble_table(&rows, &DataSource::from_file("csv", "x.csv")).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::ParsingValue {
                lineno: 2,
                column: 2,
                ..
            }
        ));
    }

    #[test]
    fn empty_input() {
        let rows = vec![row(1, &["Alternative", "Harga"])];
        assert!(assemble_table(&rows, &DataSource::from_file("csv", "x.csv")).is_err());
    }
}
