//! Logger setup shared by all binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise the crate named by `bin_name`
/// logs at `default_level` and everything else at `warn`.
///
/// Output goes to stderr so that stdout stays free for the terminal view.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let crate_name = bin_name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&crate_name, default_level)));

    let initialized = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init();

    if initialized.is_err() {
        tracing::debug!("Global subscriber already set, keeping the existing one");
    }
}

fn default_filter(crate_name: &str, level: &str) -> String {
    format!("warn,{crate_name}={level}")
}
