use crate::severity::Severity;
use crate::LoggerError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_LEVEL: &str = "INFO";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "logs";

/// The keys under which the logger configuration can be found in the application configuration,
/// in order of precedence.
pub const LOGGER_SECTION_KEYS: [&str; 2] = ["logger", "log"];

/// Defines the Logger configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// The root severity name.
    /// Valid values (case insensitive): DEBUG, INFO, WARNING, ERROR, CRITICAL.
    /// Default: INFO
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub console_output: ConsoleOutputConfig,

    #[serde(default)]
    pub file_output: FileOutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleOutputConfig {
    /// Whether the Logger should print to standard output. Default: true
    #[serde(default = "default_console_enabled")]
    pub enabled: bool,

    /// The console severity name. Default: the root level
    #[serde(default)]
    pub level: Option<String>,
}

impl Default for ConsoleOutputConfig {
    fn default() -> Self {
        Self { enabled: default_console_enabled(), level: None }
    }
}

fn default_console_enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileOutputConfig {
    /// Whether the Logger should write to a file. Default: false
    #[serde(default)]
    pub enabled: bool,

    /// The file severity name. Default: the root level
    #[serde(default)]
    pub level: Option<String>,

    /// The folder where the log files are created, relative to the logger base directory.
    /// Default: "logs"
    #[serde(default = "default_output_directory")]
    pub output_directory: String,

    /// The prefix of the log file name. Default: ""
    #[serde(default)]
    pub file_prefix: String,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: None,
            output_directory: default_output_directory(),
            file_prefix: String::new(),
        }
    }
}

fn default_output_directory() -> String {
    DEFAULT_OUTPUT_DIRECTORY.to_owned()
}

/// The configuration of the file sink after the severity names have been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSinkConfig {
    pub level: Severity,
    pub output_directory: String,
    pub file_prefix: String,
}

/// A [`LoggerConfig`] with every default applied and every severity name resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLoggerConfig {
    pub root_level: Severity,
    /// The console severity, if the console sink is enabled
    pub console: Option<Severity>,
    /// The file sink, if enabled
    pub file: Option<FileSinkConfig>,
    /// The severity names that were not recognized and replaced by a fallback
    pub warnings: Vec<String>,
}

impl ResolvedLoggerConfig {
    /// Returns the most verbose severity among the enabled sinks,
    /// or the root level if no sink is enabled.
    pub fn effective_level(&self) -> Severity {
        self.console
            .into_iter()
            .chain(self.file.as_ref().map(|file| file.level))
            .min()
            .unwrap_or(self.root_level)
    }
}

impl LoggerConfig {
    /// Decodes the logger configuration from a raw mapping.
    pub fn from_map(raw_config: &Map<String, Value>) -> Result<Self, LoggerError> {
        serde_path_to_error::deserialize(Value::Object(raw_config.clone())).map_err(|err| {
            LoggerError::LoggerConfigurationError {
                message: format!(
                    "Cannot decode the logger configuration at [{}]. err: {}",
                    err.path(),
                    err.inner()
                ),
            }
        })
    }

    pub fn resolve(&self) -> ResolvedLoggerConfig {
        let mut warnings = vec![];

        let root_level = resolve_level(
            "level",
            self.level.as_deref().unwrap_or(DEFAULT_LEVEL),
            Severity::Info,
            &mut warnings,
        );

        let console = if self.console_output.enabled {
            Some(self.console_output.level.as_deref().map_or(root_level, |name| {
                resolve_level("console_output.level", name, root_level, &mut warnings)
            }))
        } else {
            None
        };

        let file = if self.file_output.enabled {
            let level = self.file_output.level.as_deref().map_or(root_level, |name| {
                resolve_level("file_output.level", name, root_level, &mut warnings)
            });
            Some(FileSinkConfig {
                level,
                output_directory: self.file_output.output_directory.clone(),
                file_prefix: self.file_output.file_prefix.clone(),
            })
        } else {
            None
        };

        ResolvedLoggerConfig { root_level, console, file, warnings }
    }
}

fn resolve_level(key: &str, name: &str, fallback: Severity, warnings: &mut Vec<String>) -> Severity {
    name.parse().unwrap_or_else(|_| {
        warnings.push(format!(
            "Unknown severity [{}] for [{}], falling back to [{}]",
            name, key, fallback
        ));
        fallback
    })
}

/// Returns the logger section of an application configuration.
/// An absent section is returned as an empty mapping, so that every default applies.
pub fn logger_section(config: &Map<String, Value>) -> Result<Map<String, Value>, LoggerError> {
    match LOGGER_SECTION_KEYS.iter().find_map(|key| config.get(*key).map(|value| (key, value))) {
        Some((_, Value::Object(section))) => Ok(section.clone()),
        Some((key, other)) => Err(LoggerError::LoggerConfigurationError {
            message: format!("The [{}] configuration must be an object. Found: [{}]", key, other),
        }),
        None => Ok(Map::new()),
    }
}
