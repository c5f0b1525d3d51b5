//! Logger setup.
//!
//! The tree itself only talks to the `log` facade: outcomes of public operations go out at
//! `debug`, individual rebalancing steps at `trace`. Nothing is printed unless a logger is
//! installed, either by the application or through [`init_logging`].

use std::fmt;
use std::fs::File;
use std::io;
use std::path::PathBuf;

use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger};

/// Where log output goes and how much of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Level for messages printed to the terminal.
    pub terminal_level: LevelFilter,
    /// If set, messages at `file_level` and above are also written here.
    pub debug_file: Option<PathBuf>,
    /// Level for messages written to `debug_file`. Unused when there's no file.
    pub file_level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            terminal_level: LevelFilter::Warn,
            debug_file: None,
            file_level: LevelFilter::Debug,
        }
    }
}

impl LogConfig {
    /// Reads `RBTREE_LOG` (a level name like `debug` or `trace`) and `RBTREE_LOG_FILE` (a path).
    ///
    /// Anything missing or unparseable keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(level) = lookup("RBTREE_LOG").and_then(|level| level.parse().ok()) {
            config.terminal_level = level;
        }
        config.debug_file = lookup("RBTREE_LOG_FILE").map(PathBuf::from);
        config
    }
}

#[derive(Debug)]
pub enum LogInitError {
    /// The debug file couldn't be created.
    Io(io::Error),
    /// Some other logger was installed first.
    AlreadyInitialized(log::SetLoggerError),
}

impl fmt::Display for LogInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "couldn't open log file: {err}"),
            Self::AlreadyInitialized(err) => write!(f, "couldn't install logger: {err}"),
        }
    }
}

impl std::error::Error for LogInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::AlreadyInitialized(err) => Some(err),
        }
    }
}

impl From<io::Error> for LogInitError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<log::SetLoggerError> for LogInitError {
    fn from(err: log::SetLoggerError) -> Self {
        Self::AlreadyInitialized(err)
    }
}

/// Installs a terminal logger, plus a file logger if `config.debug_file` is set.
pub fn init_logging(config: &LogConfig) -> Result<(), LogInitError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(config.terminal_level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
    ];
    if let Some(path) = &config.debug_file {
        loggers.push(WriteLogger::new(config.file_level, Config::default(), File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

/// Routes log output through the test harness's captured stdout, at `debug` level.
///
/// Every test can call this; only the first call installs anything.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    // another test got there first
    let _ = simplelog::TestLogger::init(LevelFilter::Debug, Config::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_quiet() {
        let config = LogConfig::default();
        assert_eq!(config.terminal_level, LevelFilter::Warn);
        assert_eq!(config.debug_file, None);
    }

    #[test]
    fn config_from_variables() {
        let config = LogConfig::from_lookup(|name| match name {
            "RBTREE_LOG" => Some("trace".to_owned()),
            "RBTREE_LOG_FILE" => Some("rbtree_debug.log".to_owned()),
            _ => None,
        });
        assert_eq!(config.terminal_level, LevelFilter::Trace);
        assert_eq!(config.debug_file, Some(PathBuf::from("rbtree_debug.log")));
    }

    #[test]
    fn bad_level_keeps_default() {
        let config = LogConfig::from_lookup(|name| (name == "RBTREE_LOG").then(|| "loud".to_owned()));
        assert_eq!(config.terminal_level, LevelFilter::Warn);
        assert_eq!(config.debug_file, None);
    }

    #[test]
    fn test_logging_can_be_installed_repeatedly() {
        init_test_logging();
        init_test_logging();
        assert_ne!(log::max_level(), LevelFilter::Off);
        log::debug!("test logger is live");
    }

    #[test]
    fn second_logger_is_refused() {
        init_test_logging();
        let err = init_logging(&LogConfig::default()).unwrap_err();
        assert!(matches!(err, LogInitError::AlreadyInitialized(_)));
    }
}
