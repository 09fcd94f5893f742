//! Subscriber installation

use anyhow::Context as _;
use folio_conf::LoggingSettings;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// `RUST_LOG` when set, otherwise the configured directive
pub fn env_filter(settings: &LoggingSettings) -> anyhow::Result<EnvFilter> {
	match EnvFilter::try_from_default_env() {
		Ok(filter) => Ok(filter),
		Err(_) => EnvFilter::try_new(&settings.filter)
			.with_context(|| format!("invalid log filter '{}'", settings.filter)),
	}
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(settings: &LoggingSettings) -> anyhow::Result<()> {
	let filter = env_filter(settings)?;
	if settings.json {
		let layer = fmt::layer()
			.json()
			.with_writer(std::io::stderr)
			.with_current_span(true)
			.with_target(true)
			.with_filter(filter);
		tracing_subscriber::registry().with(layer).try_init()?;
	} else {
		let layer = fmt::layer()
			.with_writer(std::io::stderr)
			.with_target(true)
			.with_filter(filter);
		tracing_subscriber::registry().with(layer).try_init()?;
	}
	Ok(())
}
