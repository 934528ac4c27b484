// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::analysis::{io_common::assemble_table, *};

pub fn read_xlsx_matrix(path: &str, ds: &DataSource) -> AnalysisResult<ParsedTable> {
    let wrange = get_range(path, ds)?;
    // The range starts at the first used cell. The rows and columns before it
    // are padded so that the indexes of the configuration are sheet positions.
    let (start_row, start_col) = wrange.start().unwrap_or((0, 0));
    let (start_row, start_col) = (start_row as usize, start_col as usize);
    debug!(
        "read_xlsx_matrix: range starts at row {} column {}",
        start_row + 1,
        start_col + 1
    );

    let mut rows: Vec<(usize, Vec<String>)> =
        (0..start_row).map(|idx| (idx + 1, Vec::new())).collect();
    for (idx, row) in wrange.rows().enumerate() {
        let lineno = start_row + idx + 1;
        let mut cells: Vec<String> = vec![String::new(); start_col];
        for cell in row.iter() {
            cells.push(read_cell(cell, lineno)?);
        }
        debug!("read_xlsx_matrix: {:?} {:?}", lineno, cells);
        rows.push((lineno, cells));
    }
    assemble_table(&rows, ds)
}

fn get_range(path: &str, ds: &DataSource) -> AnalysisResult<calamine::Range<DataType>> {
    debug!(
        "read_xlsx_matrix: path: {:?} worksheet: {:?}",
        path, &ds.excel_worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    let wrange = if let Some(worksheet_name) = ds.excel_worksheet_name.as_deref() {
        workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name,
            })?
            .context(OpeningExcelSnafu { path })?
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyInputSnafu {})?
            .context(OpeningExcelSnafu { path })?
    };
    Ok(wrange)
}

// Cells are turned back into text so that CSV and Excel inputs share the same
// table assembly.
fn read_cell(cell: &DataType, lineno: usize) -> AnalysisResult<String> {
    match cell {
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok("".to_string()),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}
