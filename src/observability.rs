//! Tracing initialization.
//!
//! The library only emits `tracing` events; hosts that want them on stderr
//! call [`init_tracing`] once at startup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::QreatorConfig;

/// Installs a fmt subscriber filtered by `RUST_LOG`, or by
/// `config.trace_level` (default `"info"`) when the variable is unset.
///
/// Idempotent: if a global subscriber is already installed the call does
/// nothing.
///
/// # Example
///
/// ```rust
/// use qreator::config::QreatorConfig;
/// use qreator::observability::init_tracing;
///
/// init_tracing(&QreatorConfig::default());
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &QreatorConfig) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}
