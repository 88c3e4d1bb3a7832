use clap::Parser;
use debt_eligibility::core::{ConfigProvider, Pipeline, Storage};
use debt_eligibility::utils::{logger, validation::Validate};
use debt_eligibility::{CliConfig, EligibilityPipeline, EtlEngine, EtlError, LocalStorage, Result};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match CliConfig::parse().resolve() {
        Ok(config) => config,
        Err(e) => std::process::exit(report_failure(&e)),
    };

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting debt-eligibility CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        std::process::exit(report_failure(&e));
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let suggest_only = config.suggest;

    // Input and output paths are taken relative to the working directory.
    let storage = LocalStorage::new(".".to_string());
    let pipeline = EligibilityPipeline::new(storage, config);

    if suggest_only {
        if let Err(e) = print_suggestion(&pipeline).await {
            tracing::error!("❌ Column suggestion failed: {}", e);
            std::process::exit(report_failure(&e));
        }
        return Ok(());
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    match engine.run().await {
        Ok(outputs) => {
            tracing::info!("✅ Eligibility run completed successfully!");
            println!("✅ Eligibility run completed successfully!");
            for output_path in outputs {
                println!("📁 Output saved to: {}", output_path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Eligibility run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            std::process::exit(report_failure(&e));
        }
    }

    Ok(())
}

/// Prints the error for the user and returns the exit code for its severity.
fn report_failure(e: &EtlError) -> i32 {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    e.exit_code()
}

async fn print_suggestion<S: Storage, C: ConfigProvider>(
    pipeline: &EligibilityPipeline<S, C>,
) -> Result<()> {
    let table = pipeline.extract().await?;
    let candidates = pipeline.guesser().guess(&table);
    let selection = pipeline.resolve_selection(&table)?;

    println!("Columns:            {}", table.column_names().join(", "));
    println!("Balance candidates: {}", candidates.join(", "));
    println!("Member column:      {}", selection.member);
    println!("Route column:       {}", selection.route);
    println!("Months (m1→m3):     {}", selection.balances.join(" → "));

    if let Err(e) = selection.validate(&table) {
        println!("⚠️  {}", e);
        println!("💡 {}", e.recovery_suggestion());
    }

    Ok(())
}
