use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Column not found: '{column}'")]
    ColumnNotFound { column: String },

    #[error("Balance columns must be different, got: {}", .columns.join(", "))]
    DuplicateColumnSelection { columns: Vec<String> },

    #[error("Unsupported input format: '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("Input contains no header row")]
    EmptyTable,

    #[error("Spreadsheet read error: {0}")]
    SpreadsheetReadError(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    SpreadsheetWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: '{field}'")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Selection,
    Configuration,
    Output,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ColumnNotFound { .. } | EtlError::DuplicateColumnSelection { .. } => {
                ErrorCategory::Selection
            }
            EtlError::UnsupportedFormat { .. }
            | EtlError::EmptyTable
            | EtlError::CsvError(_)
            | EtlError::SpreadsheetReadError(_) => ErrorCategory::Input,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::ZipError(_)
            | EtlError::IoError(_)
            | EtlError::SerializationError(_)
            | EtlError::SpreadsheetWriteError(_) => ErrorCategory::Output,
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ConfigError { .. } => ErrorSeverity::Medium,
            _ if self.category() == ErrorCategory::Output => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ColumnNotFound { column } => format!(
                "Check the spelling of '{}' or run with --suggest to list the available columns",
                column
            ),
            EtlError::DuplicateColumnSelection { .. } => {
                "Please select 3 DIFFERENT balance columns (e.g. --months Nov,Dec,Jan)".to_string()
            }
            EtlError::UnsupportedFormat { .. } => {
                "Upload an .xlsx, .xls, .csv or .tsv file".to_string()
            }
            EtlError::EmptyTable | EtlError::CsvError(_) => {
                "Make sure the file is a delimited text export with a header row".to_string()
            }
            EtlError::SpreadsheetReadError(_) => {
                "Make sure the first sheet of the workbook has a header row".to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the command-line flags and the TOML configuration file".to_string()
            }
            EtlError::ZipError(_) | EtlError::IoError(_) | EtlError::SpreadsheetWriteError(_) => {
                "Check that the input exists and the output directory is writable".to_string()
            }
            EtlError::SerializationError(_) => "Retry without the json output format".to_string(),
            EtlError::ProcessingError { .. } => "Correct the input file and run again".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Selection => format!("Column mapping problem: {}", self),
            ErrorCategory::Input => format!("Could not read the uploaded file: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Output => match self {
                EtlError::IoError(_) => format!("File access failed: {}", self),
                _ => format!("Could not write the results: {}", self),
            },
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
