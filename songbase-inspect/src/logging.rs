//! Tracing setup
//!
//! The subscriber is installed before the config file is read, so config
//! loading diagnostics are visible. Until the config is known the songbase
//! crates log at `info`; [`LogControl::apply_level`] then switches to the
//! configured level unless `RUST_LOG` was given.

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

const STARTUP_LEVEL: &str = "info";

/// Filter enabling `level` for every songbase crate
pub fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!(
        "songbase_common={level},songbase_devices={level},songbase_inspect={level}"
    ))
}

/// Adjusts the installed filter once the configuration is loaded
pub struct LogControl {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogControl {
    /// Switch to the configured level; a `RUST_LOG` filter is left alone
    pub fn apply_level(&self, level: &str) -> Result<()> {
        if self.from_env {
            return Ok(());
        }
        self.handle
            .reload(crate_filter(level))
            .context("Failed to apply configured log level")
    }
}

/// Subscriber writing formatted events to `writer`
///
/// `env_filter` is the filter from `RUST_LOG`, if any.
pub fn subscriber<W>(env_filter: Option<EnvFilter>, writer: W) -> (impl Subscriber + Send + Sync + 'static, LogControl)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let from_env = env_filter.is_some();
    let (filter, handle) = reload::Layer::new(env_filter.unwrap_or_else(|| crate_filter(STARTUP_LEVEL)));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer));
    (subscriber, LogControl { handle, from_env })
}
