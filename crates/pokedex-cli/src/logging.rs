use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use pokedex_core::config::{AppConfig, LoggingConfig};

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// rendered output. `RUST_LOG` takes precedence over the configured filter.
///
/// Keep the returned guard alive for the life of the process when file
/// logging is on, or buffered lines are lost.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if config.file {
        let appender = tracing_appender::rolling::daily(AppConfig::log_dir(), "pokedex.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr)
            .with(fmt::layer().with_ansi(false).with_writer(writer))
            .init();
        Some(guard)
    } else {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        None
    }
}
