use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber: compact lines for a terminal, or one JSON
/// object per event. `RUST_LOG` replaces the default filter.
pub fn init_logger(verbose: bool, json: bool) {
    let directive = if verbose {
        "debt_eligibility=debug,info"
    } else {
        "debt_eligibility=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer.compact()).init();
    }
}
