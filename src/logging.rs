use crate::config::Config;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Builds the filter: `RUST_LOG` when set, otherwise the configured level,
/// bumped to debug by `--verbose`.
pub fn filter(config: &Config, verbose: bool) -> EnvFilter {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(from_env.as_deref(), config, verbose)
}

fn filter_from(from_env: Option<&str>, config: &Config, verbose: bool) -> EnvFilter {
    if let Some(filter) = from_env.and_then(|raw| EnvFilter::try_new(raw).ok()) {
        return filter;
    }
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    EnvFilter::try_new(level).unwrap_or_else(|err| {
        eprintln!("ignoring log level `{level}`: {err}");
        EnvFilter::new("warn")
    })
}

/// Installs the global subscriber. Logs go to stderr, and also to a daily
/// rolling file when `log_dir` is configured. Keep the returned guard alive
/// until exit so buffered file lines get flushed.
pub fn init(config: &Config, verbose: bool) -> Option<WorkerGuard> {
    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let (file, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "habits.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer);
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };
    let installed = tracing_subscriber::registry()
        .with(filter(config, verbose))
        .with(stderr)
        .with(file)
        .try_init();
    if let Err(err) = installed {
        eprintln!("logging already initialised: {err}");
    }
    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(level: &str) -> Config {
        Config {
            log_level: level.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn environment_wins_over_verbose_and_config() {
        let filter = filter_from(Some("habits=trace"), &config("error"), true);
        assert_eq!(filter.to_string(), "habits=trace");
    }

    #[test]
    fn verbose_wins_over_the_configured_level() {
        assert_eq!(filter_from(None, &config("error"), true).to_string(), "debug");
        assert_eq!(filter_from(None, &config("error"), false).to_string(), "error");
    }

    #[test]
    fn bad_levels_fall_back_to_warn() {
        assert_eq!(filter_from(None, &config("habits=loud"), false).to_string(), "warn");
        assert_eq!(filter_from(Some("habits=loud"), &config("info"), false).to_string(), "info");
    }
}
