// Primitives for reading CSV files.

use crate::analysis::{io_common::assemble_table, *};

pub fn read_csv_matrix(path: &str, ds: &DataSource) -> AnalysisResult<ParsedTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // The index starts at 1 to respect most conventions in the excel world
        let lineno = line_r
            .as_ref()
            .ok()
            .and_then(|r| r.position())
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_matrix: {:?} {:?}", lineno, line);
        rows.push((lineno, line.iter().map(|s| s.to_string()).collect()));
    }
    assemble_table(&rows, ds)
}
