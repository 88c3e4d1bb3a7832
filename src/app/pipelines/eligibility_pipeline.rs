use crate::adapters::tabular::{read_input, InputFormat};
use crate::adapters::workbook::render_outputs;
use crate::core::classifier::classify;
use crate::core::guesser::ColumnGuesser;
use crate::core::selection::project_results;
use crate::core::summary::summarize;
use crate::core::{ConfigProvider, EligibilityRun, Pipeline, Storage, Table};
use crate::domain::model::{ColumnSelection, ELIGIBILITY_COLUMN};
use crate::utils::error::Result;
use std::path::Path;

/// Reads one balance export, classifies it and writes the results workbook.
pub struct EligibilityPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> EligibilityPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn guesser(&self) -> ColumnGuesser {
        ColumnGuesser::new(self.config.guesser_settings())
    }

    /// The column mapping this pipeline would use for `table`, before validation.
    pub fn resolve_selection(&self, table: &Table) -> Result<ColumnSelection> {
        ColumnSelection::resolve(
            table,
            self.config.member_column(),
            self.config.route_column(),
            self.config.balance_columns(),
            &self.guesser(),
        )
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for EligibilityPipeline<S, C> {
    async fn extract(&self) -> Result<Table> {
        let path = self.config.input_path();
        let format = InputFormat::from_path(path)?;

        tracing::debug!("Reading {:?} input from: {}", format, path);
        let data = self.storage.read_file(path).await?;
        tracing::debug!("Read {} bytes", data.len());

        read_input(&data, format)
    }

    async fn transform(&self, data: Table) -> Result<EligibilityRun> {
        let selection = self.resolve_selection(&data)?;
        tracing::debug!("Column selection: {:?}", selection);
        selection.validate(&data)?;

        let [m1, m2, m3] = &selection.balances;
        let classified = classify(&data, m1, m2, m3)?;
        let results = project_results(&classified, &selection)?;
        let summary = summarize(&results, ELIGIBILITY_COLUMN)?;

        Ok(EligibilityRun {
            source: self.config.input_path().to_string(),
            selection,
            results,
            summary,
        })
    }

    async fn load(&self, run: EligibilityRun) -> Result<Vec<String>> {
        let outputs = render_outputs(
            &run,
            self.config.output_formats(),
            self.config.workbook_name(),
        )?;

        let mut written = Vec::with_capacity(outputs.len());
        for (file_name, data) in outputs {
            let output_path = Path::new(self.config.output_path())
                .join(file_name)
                .to_string_lossy()
                .into_owned();

            tracing::debug!("Writing {} bytes to {}", data.len(), output_path);
            self.storage.write_file(&output_path, &data).await?;
            written.push(output_path);
        }

        Ok(written)
    }
}
