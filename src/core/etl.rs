use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitoring: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitoring: bool) -> Self {
        Self {
            pipeline,
            monitoring,
        }
    }

    pub async fn run(&self) -> Result<Vec<String>> {
        let mut monitor = SystemMonitor::new(self.monitoring);
        tracing::info!("🚀 Starting eligibility run");

        // Extract
        let table = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Extracted {} rows across {} columns",
            table.row_count(),
            table.column_count()
        );
        monitor.log_stats("Extract");

        // Transform
        let run = self.pipeline.transform(table).await?;
        tracing::info!(
            "🧮 Classified {} rows using {} -> {} -> {}",
            run.results.row_count(),
            run.selection.balances[0],
            run.selection.balances[1],
            run.selection.balances[2]
        );
        for entry in &run.summary.entries {
            tracing::info!("   {}: {}", entry.label, entry.count);
        }
        monitor.log_stats("Transform");

        // Load
        let outputs = self.pipeline.load(run).await?;
        for output_path in &outputs {
            tracing::info!("📁 Output saved to: {}", output_path);
        }
        monitor.log_stats("Load");
        monitor.log_final_stats();

        Ok(outputs)
    }
}
