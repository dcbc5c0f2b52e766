//! Log subscriber built from `[log]`.

use std::sync::OnceLock;

use tracing::{Dispatch, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::LogConfig;
use crate::error::{AppError, Result};

static INSTALLED: OnceLock<Level> = OnceLock::new();

/// A configured `fmt` subscriber, not yet installed.
#[derive(Clone)]
pub struct Logger {
    level: Level,
    dispatch: Dispatch,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").field("level", &self.level).finish()
    }
}

impl Logger {
    pub fn new(config: &LogConfig) -> Result<Self> {
        let level: Level = config
            .level
            .parse()
            .map_err(|_| AppError::InvalidConfig(format!("log.level '{}'", config.level)))?;

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(config.with_target)
            .with_ansi(config.ansi)
            .finish();

        Ok(Self {
            level,
            dispatch: Dispatch::new(subscriber),
        })
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Installs this subscriber as the process-wide default.
    ///
    /// Only the first successful call in a process installs anything;
    /// later calls report [`AppError::Logging`]. When some other subscriber
    /// already holds the global slot, every call reports that failure.
    pub fn install_global(&self) -> Result<()> {
        if let Some(level) = INSTALLED.get() {
            return Err(AppError::Logging(format!(
                "a brisk subscriber is already installed at level {level}"
            )));
        }
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|e| AppError::Logging(e.to_string()))?;
        let _ = INSTALLED.set(self.level);
        Ok(())
    }

    /// Runs `f` with this subscriber as the thread's default.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}
