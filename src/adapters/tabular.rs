use crate::adapters::spreadsheet::read_spreadsheet;
use crate::domain::model::{Column, Summary, Table, Value};
use crate::utils::error::{EtlError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashSet;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// How an input file is parsed, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited(u8),
    Spreadsheet,
}

impl InputFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(InputFormat::Delimited(b',')),
            "tsv" | "txt" => Ok(InputFormat::Delimited(b'\t')),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputFormat::Spreadsheet),
            _ => Err(EtlError::UnsupportedFormat { extension }),
        }
    }
}

pub fn read_input(data: &[u8], format: InputFormat) -> Result<Table> {
    match format {
        InputFormat::Delimited(delimiter) => read_table(data, delimiter),
        InputFormat::Spreadsheet => read_spreadsheet(data),
    }
}

/// Reads delimited text into a [`Table`]. The first record is the header.
pub fn read_table(data: &[u8], delimiter: u8) -> Result<Table> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(data);
    let mut records = reader.records();

    let header: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(str::to_string).collect(),
        None => return Err(EtlError::EmptyTable),
    };

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for record in records {
        rows.push(record?.iter().map(Value::from_raw).collect());
    }

    table_from_rows(&header, rows)
}

/// Builds a table from a raw header and row-major cells. Short rows are
/// padded with nulls and cells beyond the header are dropped.
pub(crate) fn table_from_rows(header: &[String], rows: Vec<Vec<Value>>) -> Result<Table> {
    let names = normalize_headers(header.iter().map(String::as_str));

    let mut values: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); names.len()];
    for row in rows {
        let mut cells = row.into_iter();
        for column in values.iter_mut() {
            column.push(cells.next().unwrap_or(Value::Null));
        }
    }

    let table = Table::from_columns(
        names
            .into_iter()
            .zip(values)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )?;

    tracing::debug!(
        "Parsed {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

/// Blank headers become `Unnamed: {index}` and repeats get a `.1`, `.2`, ... suffix.
/// Other names are kept exactly as written.
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::new();

    for (index, name) in raw.enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(candidate.clone());
        names.push(candidate);
    }

    names
}

pub fn write_table(table: &Table, delimiter: u8) -> Result<String> {
    if table.column_count() == 0 {
        return Ok(String::new());
    }

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(table.column_names())?;
    for index in 0..table.row_count() {
        if let Some(row) = table.row(index) {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("Output is not valid UTF-8: {}", e),
    })
}

pub fn write_summary(summary: &Summary, delimiter: u8) -> Result<String> {
    write_table(&summary.to_table()?, delimiter)
}
