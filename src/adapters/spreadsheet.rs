use crate::adapters::tabular::table_from_rows;
use crate::domain::model::{Table, Value};
use crate::utils::error::{EtlError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::io::Cursor;

/// Reads the first worksheet of an `.xlsx`/`.xls`/`.ods` file. Its first
/// row is the header.
pub fn read_spreadsheet(data: &[u8]) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(EtlError::EmptyTable),
    };

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(|cell| cell.to_string()).collect(),
        None => return Err(EtlError::EmptyTable),
    };
    let rows: Vec<Vec<Value>> = rows
        .map(|cells| cells.iter().map(cell_value).collect::<Vec<_>>())
        .collect();

    table_from_rows(&header, rows)
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(n) => Value::Number(*n as f64),
        Data::Float(n) => Value::Number(*n),
        Data::String(s) => Value::from_raw(s),
        Data::Empty | Data::Error(_) => Value::Null,
        other => Value::Text(other.to_string()),
    }
}

/// Writes one worksheet per `(name, table)` pair, in order, and returns the
/// `.xlsx` bytes.
pub fn write_spreadsheet(sheets: &[(&str, &Table)]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for (name, table) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        write_sheet(worksheet, table, &header)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(worksheet: &mut Worksheet, table: &Table, header: &Format) -> Result<()> {
    for (col, column) in table.columns().iter().enumerate() {
        let col = cell_index(col)?;
        worksheet.write_string_with_format(0, col, column.name(), header)?;

        for (row, value) in column.values().iter().enumerate() {
            if value.is_null() {
                continue;
            }
            let row = cell_index(row + 1)?;
            // numeric text is stored as a number cell so the sheet sorts and sums
            match value.as_number().filter(|n| n.is_finite()) {
                Some(n) => worksheet.write_number(row, col, n)?,
                None => worksheet.write_string(row, col, value.to_string())?,
            };
        }
    }
    Ok(())
}

fn cell_index<T: TryFrom<usize>>(index: usize) -> Result<T> {
    T::try_from(index).map_err(|_| EtlError::ProcessingError {
        message: format!("Sheet position {} is beyond the worksheet limits", index),
    })
}
