use crate::adapters::workbook::OUTPUT_FORMATS;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_exact_len, validate_non_empty_string, validate_one_of, validate_path, validate_range,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub input: InputConfig,
    pub columns: ColumnsConfig,
    pub guesser: GuesserConfig,
    pub output: OutputConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub member: Option<String>,
    pub route: Option<String>,
    /// Month 1..3 in chronological order.
    pub months: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuesserConfig {
    pub exclude_keywords: Option<Vec<String>>,
    pub numeric_threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub formats: Option<Vec<String>>,
    pub workbook_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.input.path {
            validate_path("input.path", path)?;
        }
        if let Some(path) = &self.output.path {
            validate_path("output.path", path)?;
        }
        if let Some(months) = &self.columns.months {
            validate_exact_len("columns.months", months, 3)?;
        }
        if let Some(threshold) = self.guesser.numeric_threshold {
            validate_range("guesser.numeric_threshold", threshold, 0.0, 1.0)?;
        }
        if let Some(formats) = &self.output.formats {
            validate_one_of("output.formats", formats, OUTPUT_FORMATS)?;
        }
        if let Some(name) = &self.output.workbook_name {
            validate_non_empty_string("output.workbook_name", name)?;
        }
        Ok(())
    }
}
