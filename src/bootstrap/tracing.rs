//! Setup for the application tracing.
//!
//! It redirects the tracing events to the standard output, up to the threshold defined in the configuration:
//!
//! - `Off` (i.e. don't load any subscriber...)
//! - `Error`
//! - `Warn`
//! - `Info`
//! - `Debug`
//! - `Trace`
use std::sync::Once;

use room_service_configuration::{Logging, Threshold};
use tracing::level_filters::LevelFilter;

static INIT: Once = Once::new();

/// Installs the global subscriber. Only the first call has an effect.
pub fn setup(cfg: &Logging) {
    let filter = level_filter(cfg.threshold);

    if filter == LevelFilter::OFF {
        return;
    }

    INIT.call_once(|| {
        stdout_config(filter);
    });
}

fn level_filter(threshold: Threshold) -> LevelFilter {
    match threshold {
        Threshold::Off => LevelFilter::OFF,
        Threshold::Error => LevelFilter::ERROR,
        Threshold::Warn => LevelFilter::WARN,
        Threshold::Info => LevelFilter::INFO,
        Threshold::Debug => LevelFilter::DEBUG,
        Threshold::Trace => LevelFilter::TRACE,
    }
}

fn stdout_config(filter: LevelFilter) {
    let () = tracing_subscriber::fmt().pretty().with_max_level(filter).init();

    tracing::info!("tracing initialized.");
}
