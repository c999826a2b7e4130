// Logging setup
//
// Diagnostics go to stderr through tracing. `RUST_LOG` wins when set;
// otherwise the level comes from `--debug` / `features.debug_logging`.
// reqwest and hyper log through the `log` crate, bridged by tracing-log.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Default filter directive for the given verbosity.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "promptgan=debug,tower_http=debug,info"
    } else {
        "promptgan=info,warn"
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(debug: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_log::LogTracer::init().context("Failed to bridge log records into tracing")?;

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact());

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
