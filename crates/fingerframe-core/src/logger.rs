//! Minimal stderr logger for tools and trace replays.
//!
//! Lines look like `[  1.234s  INFO gesture] message`. Records from the
//! `fingerframe*` crates are shown at the requested level; everything else is
//! capped at `Warn` so dependency chatter stays out of replay output.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const OWN_PREFIX: &str = "fingerframe";

struct FrameLogger {
    level: LevelFilter,
    started: Instant,
}

impl FrameLogger {
    fn limit_for(&self, target: &str) -> LevelFilter {
        if target.starts_with(OWN_PREFIX) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        }
    }
}

/// Last path segment of a module target, e.g.
/// `fingerframe_gesture::pipeline::gate` -> `gate`.
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

impl Log for FrameLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.limit_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = match record.level() {
            Level::Error | Level::Warn => writeln!(
                stderr,
                "[{:7.3}s {:>5} {}] {}",
                elapsed,
                record.level(),
                record.target(),
                record.args()
            ),
            _ => writeln!(
                stderr,
                "[{:7.3}s {:>5} {}] {}",
                elapsed,
                record.level(),
                short_target(record.target()),
                record.args()
            ),
        };
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<FrameLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Only the first call installs anything; later calls are no-ops.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| FrameLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing-subscriber` fmt subscriber driven by `RUST_LOG`
/// (default `fingerframe=info`).
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fingerframe=info"));
    let builder = fmt().with_env_filter(filter).with_target(true);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
