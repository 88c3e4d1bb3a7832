pub mod classifier;
pub mod etl;
pub mod guesser;
pub mod selection;
pub mod summary;

pub use crate::domain::model::{EligibilityRun, Table};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
