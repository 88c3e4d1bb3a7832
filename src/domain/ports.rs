use crate::core::guesser::GuesserSettings;
use crate::domain::model::{EligibilityRun, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn member_column(&self) -> Option<&str>;
    fn route_column(&self) -> Option<&str>;
    /// Month 1, month 2 and month 3 in that order, or empty to guess them.
    fn balance_columns(&self) -> &[String];
    fn guesser_settings(&self) -> GuesserSettings;
    fn output_formats(&self) -> &[String];
    fn workbook_name(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Table>;
    async fn transform(&self, data: Table) -> Result<EligibilityRun>;
    /// Writes the run's outputs and returns their paths.
    async fn load(&self, run: EligibilityRun) -> Result<Vec<String>>;
}
