use env_logger::fmt::style::{AnsiColor, Style};
use env_logger::Builder;
use log::{Level, LevelFilter};
use newengine_assert::ASSERT_LOG_TARGET;
use thiserror::Error;

use std::io::Write;

pub const ENV_LEVEL: &str = "NEWENGINE_LOG";
pub const ENV_COLORS: &str = "NEWENGINE_LOG_COLORS";
pub const ENV_MODULE: &str = "NEWENGINE_LOG_MODULE";

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("logger init failed: {0}")]
    Init(#[from] log::SetLoggerError),
}

#[derive(Debug, Clone)]
pub struct ConsoleLoggerConfig {
    pub level: LevelFilter,
    pub colors: bool,
    pub include_module: bool,
}

impl ConsoleLoggerConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let level = var(ENV_LEVEL)
            .and_then(|v| v.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let colors = var(ENV_COLORS).map(|v| v != "0").unwrap_or(true);
        let include_module = var(ENV_MODULE).map(|v| v != "0").unwrap_or(true);

        Self {
            level,
            colors,
            include_module,
        }
    }
}

impl Default for ConsoleLoggerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Label printed in the level column.
///
/// Error records on the assert target get their own `ASSERT` label so a failed
/// assertion never reads like an ordinary error.
pub fn level_label(level: Level, target: &str) -> &'static str {
    if level == Level::Error && is_assert_target(target) {
        return "ASSERT";
    }
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

#[inline]
fn is_assert_target(target: &str) -> bool {
    target
        .strip_prefix(ASSERT_LOG_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

fn label_style(label: &str) -> Style {
    match label {
        "ASSERT" => AnsiColor::Magenta.on_default().bold(),
        "ERROR" => AnsiColor::Red.on_default().bold(),
        "WARN" => AnsiColor::Yellow.on_default().bold(),
        "INFO" => AnsiColor::Green.on_default(),
        "DEBUG" => AnsiColor::Blue.on_default(),
        _ => AnsiColor::Magenta.on_default(),
    }
}

pub struct ConsoleLogger {
    config: ConsoleLoggerConfig,
    initialized: bool,
}

impl ConsoleLogger {
    #[inline]
    pub fn new(config: ConsoleLoggerConfig) -> Self {
        Self {
            config,
            initialized: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &ConsoleLoggerConfig {
        &self.config
    }

    /// Installs the global logger. Calling it again on the same instance is a no-op.
    pub fn init(&mut self) -> Result<(), LoggerError> {
        if self.initialized {
            return Ok(());
        }

        let mut builder = Builder::new();
        builder.filter_level(self.config.level);
        // Assertion lines stay visible even when the global level is turned down.
        builder.filter_module(ASSERT_LOG_TARGET, self.config.level.max(LevelFilter::Warn));

        let config = self.config.clone();
        builder.format(move |buf, record| {
            let label = level_label(record.level(), record.target());
            let style = if config.colors {
                label_style(label)
            } else {
                Style::new()
            };

            if config.include_module {
                writeln!(
                    buf,
                    "[{style}{label:<6}{style:#}] {:<25} {}",
                    record.target(),
                    record.args()
                )
            } else {
                writeln!(buf, "[{style}{label:<6}{style:#}] {}", record.args())
            }
        });

        builder.try_init()?;

        self.initialized = true;
        Ok(())
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(ConsoleLoggerConfig::default())
    }
}
