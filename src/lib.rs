pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::eligibility_pipeline::EligibilityPipeline;
pub use core::classifier::{classify, classify_values};
pub use core::etl::EtlEngine;
pub use core::guesser::{guess_balance_columns, ColumnGuesser, GuesserSettings};
pub use core::summary::summarize;
pub use domain::model::{
    ClassificationResult, Column, ColumnSelection, EligibilityLabel, Summary, Table, Value,
};
pub use utils::error::{EtlError, Result};
