use crate::filter::SeverityFilter;
use crate::format::{log_file_name, LineFormatter};
use chrono::Local;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::dispatcher::{self, Dispatch};
use tracing::{debug, warn, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{Filtered, LevelFilter};
use tracing_subscriber::fmt::format::DefaultFields;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, reload, Layer, Registry};

pub mod config;
pub mod filter;
pub mod format;
pub mod severity;

pub use config::{logger_section, ConsoleOutputConfig, FileOutputConfig, LoggerConfig};
pub use severity::Severity;

// Used by the `critical!` macro
#[doc(hidden)]
pub use tracing;

/// Emits an `ERROR` event marked as `CRITICAL`.
/// It accepts the same arguments as the `tracing` event macros.
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => {
        $crate::tracing::error!(critical = true, $($arg)+)
    };
}

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("LoggerConfigurationError: [{message}]")]
    LoggerConfigurationError { message: String },
    #[error("LoggerIoError: [{message}] path: [{}]. err: {source}", .path.display())]
    LoggerIoError { message: String, path: PathBuf, source: std::io::Error },
}

impl From<log::SetLoggerError> for LoggerError {
    fn from(error: log::SetLoggerError) -> Self {
        LoggerError::LoggerConfigurationError { message: format!("{}", error) }
    }
}

/// Builds a logger from the raw logger configuration.
pub struct LoggerBuilder {
    raw_config: Map<String, Value>,
    config: LoggerConfig,
    base_dir: PathBuf,
    console_writer: Box<dyn Write + Send>,
}

impl LoggerBuilder {
    /// Decodes the raw configuration. The returned builder writes the console output
    /// to the standard output and creates the log files relative to the current directory.
    pub fn new(raw_config: &Map<String, Value>) -> Result<Self, LoggerError> {
        Ok(Self {
            raw_config: raw_config.clone(),
            config: LoggerConfig::from_map(raw_config)?,
            base_dir: PathBuf::from("."),
            console_writer: Box::new(std::io::stdout()),
        })
    }

    /// Sets the folder against which the relative `output_directory` is resolved.
    pub fn base_dir<P: Into<PathBuf>>(mut self, base_dir: P) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Replaces the standard output as destination of the console sink.
    pub fn console_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.console_writer = Box::new(writer);
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Creates the sinks and returns a handle to the configured logger.
    /// The logger is not registered globally; see [`LoggerHandle::install_global`].
    pub fn build(self) -> Result<LoggerHandle, LoggerError> {
        let resolved = self.config.resolve();
        let effective_level = resolved.effective_level();

        let (root_filter, reload_handle) = reload::Layer::new(effective_level.to_level_filter());

        let mut guards = vec![];

        let console_sink = match resolved.console {
            Some(level) => {
                let (writer, guard) = tracing_appender::non_blocking(self.console_writer);
                guards.push(guard);
                Some((writer, level))
            }
            None => None,
        };

        let file_sink = match &resolved.file {
            Some(file) => {
                let log_dir = self.base_dir.join(&file.output_directory);
                fs::create_dir_all(&log_dir).map_err(|source| LoggerError::LoggerIoError {
                    message: "Cannot create the log directory".to_owned(),
                    path: log_dir.clone(),
                    source,
                })?;
                let log_file_path = log_dir.join(log_file_name(&file.file_prefix, &Local::now()));
                let log_file =
                    File::create(&log_file_path).map_err(|source| LoggerError::LoggerIoError {
                        message: "Cannot create the log file".to_owned(),
                        path: log_file_path.clone(),
                        source,
                    })?;
                let (writer, guard) = tracing_appender::non_blocking(log_file);
                guards.push(guard);
                Some((writer, file.level, log_file_path))
            }
            None => None,
        };
        let log_file_path = file_sink.as_ref().map(|(_, _, path)| path.clone());

        let subscriber = tracing_subscriber::registry()
            .with(root_filter)
            .with(console_sink.map(|(writer, level)| sink_layer(writer, level)))
            .with(file_sink.map(|(writer, level, _)| sink_layer(writer, level)));

        let handle = LoggerHandle {
            dispatch: Dispatch::new(subscriber),
            reload_handle,
            guards,
            effective_level,
            log_file_path,
            warnings: resolved.warnings.clone(),
        };

        let serialized_config = serde_json::to_string(&self.raw_config).map_err(|err| {
            LoggerError::LoggerConfigurationError {
                message: format!("Cannot serialize the logger configuration. err: {}", err),
            }
        })?;

        handle.in_scope(|| {
            for warning in &resolved.warnings {
                warn!("{}", warning);
            }
            debug!("{}", serialized_config);
            debug!("Logger initialized successfully");
        });

        Ok(handle)
    }
}

fn sink_layer<S>(
    writer: NonBlocking,
    level: Severity,
) -> Filtered<
    tracing_subscriber::fmt::Layer<S, DefaultFields, LineFormatter, NonBlocking>,
    SeverityFilter,
    S,
>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::Layer::new()
        .event_format(LineFormatter)
        .with_writer(writer)
        .with_filter(SeverityFilter::new(level))
}

/// A configured logger.
///
/// Dropping the handle, or calling [`LoggerHandle::close`], flushes the pending records
/// and releases the sinks.
pub struct LoggerHandle {
    dispatch: Dispatch,
    reload_handle: reload::Handle<LevelFilter, Registry>,
    guards: Vec<WorkerGuard>,
    effective_level: Severity,
    log_file_path: Option<PathBuf>,
    warnings: Vec<String>,
}

impl LoggerHandle {
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Runs `f` with this logger as default for the current thread.
    pub fn in_scope<T, F: FnOnce() -> T>(&self, f: F) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }

    /// Registers this logger as the process-wide default and forwards to it
    /// the records of the `log` crate.
    /// It fails if a global logger was already set.
    pub fn install_global(&self) -> Result<(), LoggerError> {
        tracing_log::LogTracer::init()?;
        dispatcher::set_global_default(self.dispatch.clone()).map_err(|err| {
            LoggerError::LoggerConfigurationError {
                message: format!("Cannot start the logger. err: {:?}", err),
            }
        })
    }

    /// The severity applied before any sink-specific filtering.
    pub fn effective_level(&self) -> Severity {
        self.effective_level
    }

    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file_path.as_deref()
    }

    /// The severity names of the configuration that were replaced by a fallback.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Replaces the root severity. The sink thresholds are not changed.
    pub fn reload(&mut self, level: Severity) -> Result<(), LoggerError> {
        self.reload_handle.reload(level.to_level_filter()).map_err(|err| {
            LoggerError::LoggerConfigurationError {
                message: format!("Cannot reload the logger configuration. err: {:?}", err),
            }
        })?;
        self.effective_level = level;
        Ok(())
    }

    /// Flushes the pending records and closes the sinks.
    /// Records emitted after this call are discarded.
    pub fn close(self) {
        drop(self.guards);
    }
}

/// Configures the logger and registers it as the process-wide default.
///
/// A relative `file_output.output_directory` is resolved against `base_dir`.
pub fn setup_logger<P: AsRef<Path>>(
    raw_config: &Map<String, Value>,
    base_dir: P,
) -> Result<LoggerHandle, LoggerError> {
    let handle = LoggerBuilder::new(raw_config)?.base_dir(base_dir.as_ref()).build()?;
    handle.install_global()?;
    Ok(handle)
}
