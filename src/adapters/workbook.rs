use crate::adapters::spreadsheet::write_spreadsheet;
use crate::adapters::tabular::{write_summary, write_table};
use crate::domain::model::{ColumnSelection, EligibilityRun, Summary};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

pub const DEFAULT_WORKBOOK_NAME: &str = "debt_eligibility_results.xlsx";
pub const RESULTS_SHEET: &str = "Results";
pub const SUMMARY_SHEET: &str = "Summary";
pub const REPORT_FILE: &str = "run_report.json";

pub const XLSX_FORMAT: &str = "xlsx";
pub const DEFAULT_OUTPUT_FORMATS: &[&str] = &[XLSX_FORMAT];
pub const OUTPUT_FORMATS: &[&str] = &[XLSX_FORMAT, "csv", "tsv", "json"];
/// Formats that carry the Results and Summary sheets themselves.
pub const SHEET_FORMATS: &[&str] = &[XLSX_FORMAT, "csv", "tsv"];

#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub source: &'a str,
    pub selection: &'a ColumnSelection,
    pub row_count: usize,
    pub summary: &'a Summary,
    pub generated_at: DateTime<Utc>,
}

impl<'a> RunReport<'a> {
    pub fn new(run: &'a EligibilityRun) -> Self {
        Self {
            source: &run.source,
            selection: &run.selection,
            row_count: run.results.row_count(),
            summary: &run.summary,
            generated_at: Utc::now(),
        }
    }
}

/// The two-sheet Excel workbook: Results, then Summary.
pub fn build_workbook(run: &EligibilityRun) -> Result<Vec<u8>> {
    let summary = run.summary.to_table()?;
    write_spreadsheet(&[(RESULTS_SHEET, &run.results), (SUMMARY_SHEET, &summary)])
}

/// Packs the Results and Summary sheets, one file per sheet and delimited
/// format, plus an optional JSON run report, into a zip archive.
pub fn build_bundle(run: &EligibilityRun, formats: &[String]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (extension, delimiter) in [("csv", b','), ("tsv", b'\t')] {
        if !formats.iter().any(|f| f == extension) {
            continue;
        }

        zip.start_file::<_, ()>(
            format!("{}.{}", RESULTS_SHEET, extension),
            FileOptions::default(),
        )?;
        zip.write_all(write_table(&run.results, delimiter)?.as_bytes())?;

        zip.start_file::<_, ()>(
            format!("{}.{}", SUMMARY_SHEET, extension),
            FileOptions::default(),
        )?;
        zip.write_all(write_summary(&run.summary, delimiter)?.as_bytes())?;
    }

    if formats.iter().any(|f| f == "json") {
        zip.start_file::<_, ()>(REPORT_FILE, FileOptions::default())?;
        let report = serde_json::to_string_pretty(&RunReport::new(run))?;
        zip.write_all(report.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Renders every requested output as `(file name, bytes)`. The Excel workbook
/// is `<stem>.xlsx`; the delimited sheets and the run report share `<stem>.zip`.
pub fn render_outputs(
    run: &EligibilityRun,
    formats: &[String],
    workbook_name: &str,
) -> Result<Vec<(String, Vec<u8>)>> {
    let stem = Path::new(workbook_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(workbook_name);

    let mut outputs = Vec::new();
    if formats.iter().any(|f| f == XLSX_FORMAT) {
        outputs.push((format!("{}.xlsx", stem), build_workbook(run)?));
    }
    if formats.iter().any(|f| f != XLSX_FORMAT) {
        outputs.push((format!("{}.zip", stem), build_bundle(run, formats)?));
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Column, SummaryEntry, Table, Value};
    use calamine::{open_workbook_auto_from_rs, Data, Reader};
    use std::io::Read;

    fn sample_run() -> EligibilityRun {
        let results = Table::from_columns(vec![
            Column::new("Member_No", vec![Value::from("1")]),
            Column::new("DebtEligibility", vec![Value::from("Eligible")]),
        ])
        .unwrap();

        EligibilityRun {
            source: "balances.csv".to_string(),
            selection: ColumnSelection {
                member: "Member_No".to_string(),
                route: "Route".to_string(),
                balances: ["Nov", "Dec", "Jan"].map(String::from),
            },
            results,
            summary: Summary {
                entries: vec![SummaryEntry {
                    label: "Eligible".to_string(),
                    count: 1,
                }],
            },
        }
    }

    fn entry_names(data: Vec<u8>) -> Vec<String> {
        let archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn test_csv_bundle_has_two_sheets() {
        let data = build_bundle(&sample_run(), &["csv".to_string()]).unwrap();
        let mut names = entry_names(data.clone());
        names.sort();
        assert_eq!(names, vec!["Results.csv", "Summary.csv"]);

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        let mut summary = String::new();
        archive
            .by_name("Summary.csv")
            .unwrap()
            .read_to_string(&mut summary)
            .unwrap();
        assert_eq!(summary, "DebtEligibility,Count\nEligible,1\n");
    }

    #[test]
    fn test_json_report() {
        let formats = vec!["tsv".to_string(), "json".to_string()];
        let data = build_bundle(&sample_run(), &formats).unwrap();

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        assert!(archive.by_name("Results.tsv").is_ok());
        assert!(archive.by_name("Results.csv").is_err());

        let mut report = String::new();
        archive
            .by_name(REPORT_FILE)
            .unwrap()
            .read_to_string(&mut report)
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(json["row_count"], 1);
        assert_eq!(json["selection"]["balances"][2], "Jan");
        assert_eq!(json["summary"]["entries"][0]["label"], "Eligible");
    }

    #[test]
    fn test_excel_workbook_sheets() {
        let data = build_workbook(&sample_run()).unwrap();
        let mut workbook = open_workbook_auto_from_rs(std::io::Cursor::new(data)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Results", "Summary"]);

        let summary = workbook.worksheet_range("Summary").unwrap();
        assert_eq!(
            summary.get_value((0, 0)),
            Some(&Data::String("DebtEligibility".to_string()))
        );
        assert_eq!(
            summary.get_value((1, 0)),
            Some(&Data::String("Eligible".to_string()))
        );
        assert_eq!(summary.get_value((1, 1)), Some(&Data::Float(1.0)));
    }

    #[test]
    fn test_render_outputs_by_format() {
        let run = sample_run();

        let default = render_outputs(&run, &["xlsx".to_string()], DEFAULT_WORKBOOK_NAME).unwrap();
        let names: Vec<&str> = default.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["debt_eligibility_results.xlsx"]);

        let formats = vec!["xlsx".to_string(), "csv".to_string()];
        let both = render_outputs(&run, &formats, "march").unwrap();
        let names: Vec<&str> = both.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["march.xlsx", "march.zip"]);
    }
}
