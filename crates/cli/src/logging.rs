use anyhow::Result;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use viewo_core::ports::{Notifier, ToastKind};

/// Initialize stderr logging; `RUST_LOG` overrides `log_level`
pub fn init_logging(log_level: Level) -> Result<()> {
    let level_str = log_level.as_str().to_lowercase();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("viewo={level_str},viewo_core={level_str},viewo_http={level_str}").into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

/// Session notifications go to the log; there are no toasts in a terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, kind: ToastKind) {
        match kind {
            ToastKind::Error => error!("{message}"),
            ToastKind::Warning => warn!("{message}"),
            ToastKind::Info | ToastKind::Success => info!("{message}"),
        }
    }
}
