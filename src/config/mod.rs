pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::CliConfig;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";

#[cfg(feature = "cli")]
mod args {
    use super::toml_config::TomlConfig;
    use super::DEFAULT_OUTPUT_PATH;
    use crate::adapters::tabular::InputFormat;
    use crate::adapters::workbook::{
        DEFAULT_OUTPUT_FORMATS, DEFAULT_WORKBOOK_NAME, OUTPUT_FORMATS, SHEET_FORMATS,
    };
    use crate::core::guesser::{GuesserSettings, DEFAULT_NUMERIC_THRESHOLD};
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_exact_len, validate_non_empty_string, validate_one_of, validate_path,
        validate_range, validate_required_field, Validate,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
    #[command(name = "debt-eligibility")]
    #[command(about = "Classify member balances into debt-eligibility categories")]
    pub struct CliConfig {
        /// Excel workbook (.xlsx/.xls) or CSV/TSV export holding the member balances
        pub input: Option<String>,

        #[arg(long)]
        pub output_path: Option<String>,

        #[arg(long)]
        pub member_column: Option<String>,

        #[arg(long)]
        pub route_column: Option<String>,

        /// Three balance columns in chronological order, e.g. Nov,Dec,Jan
        #[arg(long, value_delimiter = ',')]
        pub months: Vec<String>,

        #[arg(long, value_delimiter = ',')]
        pub exclude_keywords: Option<Vec<String>>,

        #[arg(long)]
        pub numeric_threshold: Option<f64>,

        /// Any of xlsx, csv, tsv, json (default xlsx)
        #[arg(long, value_delimiter = ',')]
        pub output_formats: Vec<String>,

        #[arg(long)]
        pub workbook_name: Option<String>,

        /// Optional TOML file; flags given on the command line take precedence
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(long, help = "Only print the guessed column mapping")]
        pub suggest: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log resource usage per phase")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub log_json: bool,
    }

    impl CliConfig {
        /// Fills every setting not given on the command line from `file`.
        pub fn merge_toml(mut self, file: TomlConfig) -> Self {
            self.input = self.input.or(file.input.path);
            self.output_path = self.output_path.or(file.output.path);
            self.member_column = self.member_column.or(file.columns.member);
            self.route_column = self.route_column.or(file.columns.route);
            if self.months.is_empty() {
                self.months = file.columns.months.unwrap_or_default();
            }
            self.exclude_keywords = self.exclude_keywords.or(file.guesser.exclude_keywords);
            self.numeric_threshold = self.numeric_threshold.or(file.guesser.numeric_threshold);
            if self.output_formats.is_empty() {
                self.output_formats = file.output.formats.unwrap_or_default();
            }
            self.workbook_name = self.workbook_name.or(file.output.workbook_name);
            self.monitor |= file.monitoring.enabled;
            self.log_json |= file.monitoring.json_logs;
            self
        }

        /// Loads the TOML file named by `--config`, if any, and applies defaults.
        pub fn resolve(self) -> Result<Self> {
            let mut resolved = match &self.config {
                Some(path) => {
                    let file = TomlConfig::from_file(path)?;
                    file.validate()?;
                    self.merge_toml(file)
                }
                None => self,
            };

            if resolved.output_formats.is_empty() {
                resolved.output_formats = DEFAULT_OUTPUT_FORMATS
                    .iter()
                    .map(|f| f.to_string())
                    .collect();
            }
            Ok(resolved)
        }
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            self.input.as_deref().unwrap_or_default()
        }

        fn output_path(&self) -> &str {
            self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
        }

        fn member_column(&self) -> Option<&str> {
            self.member_column.as_deref()
        }

        fn route_column(&self) -> Option<&str> {
            self.route_column.as_deref()
        }

        fn balance_columns(&self) -> &[String] {
            &self.months
        }

        fn guesser_settings(&self) -> GuesserSettings {
            let defaults = GuesserSettings::default();
            GuesserSettings {
                exclude_keywords: self
                    .exclude_keywords
                    .clone()
                    .unwrap_or(defaults.exclude_keywords),
                numeric_threshold: self.numeric_threshold.unwrap_or(DEFAULT_NUMERIC_THRESHOLD),
            }
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn workbook_name(&self) -> &str {
            self.workbook_name.as_deref().unwrap_or(DEFAULT_WORKBOOK_NAME)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            let input = validate_required_field("input", &self.input)?;
            validate_path("input", input)?;
            InputFormat::from_path(input)?;

            validate_path("output_path", self.output_path())?;
            validate_non_empty_string("workbook_name", self.workbook_name())?;

            if !self.months.is_empty() {
                validate_exact_len("months", &self.months, 3)?;
            }
            if let Some(threshold) = self.numeric_threshold {
                validate_range("numeric_threshold", threshold, 0.0, 1.0)?;
            }

            validate_one_of("output_formats", &self.output_formats, OUTPUT_FORMATS)?;
            if !self
                .output_formats
                .iter()
                .any(|f| SHEET_FORMATS.contains(&f.as_str()))
            {
                return Err(crate::utils::error::EtlError::InvalidConfigValueError {
                    field: "output_formats".to_string(),
                    value: self.output_formats.join(","),
                    reason: format!("At least one of {} is required", SHEET_FORMATS.join(", ")),
                });
            }
            Ok(())
        }
    }

}
