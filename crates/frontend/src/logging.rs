//! Browser console logging

use std::sync::Once;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Pretty;
use tracing_subscriber::prelude::*;
use tracing_web::{MakeWebConsoleWriter, performance_layer};

const DEFAULT_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Install the console subscriber. Later calls are ignored.
///
/// `filter` takes `EnvFilter` directives, e.g. `viewo_core=debug`.
pub fn init(filter: Option<&str>) {
    INIT.call_once(|| {
        let filter = filter
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

        // No clock access on wasm32 for timestamps
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .without_time()
            .with_writer(MakeWebConsoleWriter::new());
        let perf_layer = performance_layer().with_details_from_fields(Pretty::default());

        if tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .with(perf_layer)
            .try_init()
            .is_err()
        {
            web_sys::console::warn_1(&"A tracing subscriber was already installed".into());
        }
    });
}
