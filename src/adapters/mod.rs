// Adapters layer: reading and writing the formats the pipeline exchanges with the outside.

pub mod spreadsheet;
pub mod tabular;
pub mod workbook;
