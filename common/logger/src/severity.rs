use crate::LoggerError;
use std::fmt;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing::{Level, Metadata};

/// Name of the field that marks an `ERROR` event as `CRITICAL`.
/// See the [`critical!`](crate::critical) macro.
pub const CRITICAL_FIELD: &str = "critical";

/// The severity of a log record, ordered from the most verbose to the least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 5] =
        [Severity::Debug, Severity::Info, Severity::Warning, Severity::Error, Severity::Critical];

    pub fn name(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Returns the severity of an event given its metadata.
    /// `TRACE` events have no severity and are never admitted by a sink.
    pub fn of(metadata: &Metadata<'_>) -> Option<Severity> {
        let level = *metadata.level();
        if level == Level::TRACE {
            None
        } else if level == Level::DEBUG {
            Some(Severity::Debug)
        } else if level == Level::INFO {
            Some(Severity::Info)
        } else if level == Level::WARN {
            Some(Severity::Warning)
        } else if metadata.fields().field(CRITICAL_FIELD).is_some() {
            Some(Severity::Critical)
        } else {
            Some(Severity::Error)
        }
    }

    /// Whether an event with the given metadata passes this threshold.
    pub fn admits(&self, metadata: &Metadata<'_>) -> bool {
        Severity::of(metadata).map(|severity| severity >= *self).unwrap_or(false)
    }

    /// The closest `tracing` level filter. `CRITICAL` maps to `ERROR`, the finer
    /// distinction is done by the sink filters.
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Severity::Debug => LevelFilter::DEBUG,
            Severity::Info => LevelFilter::INFO,
            Severity::Warning => LevelFilter::WARN,
            Severity::Error | Severity::Critical => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .iter()
            .find(|severity| severity.name().eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| LoggerError::LoggerConfigurationError {
                message: format!("Unknown severity: [{}]", name),
            })
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn should_parse_severity_names_ignoring_case() {
        assert_eq!(Severity::Debug, "debug".parse::<Severity>().unwrap());
        assert_eq!(Severity::Info, "Info".parse::<Severity>().unwrap());
        assert_eq!(Severity::Warning, "WARNING".parse::<Severity>().unwrap());
        assert_eq!(Severity::Error, "error".parse::<Severity>().unwrap());
        assert_eq!(Severity::Critical, "CritiCAL".parse::<Severity>().unwrap());
    }

    #[test]
    fn should_reject_unknown_names() {
        for name in ["", "trace", "warn", "fatal", "NOTSET", " INFO", "verbose"] {
            assert!(name.parse::<Severity>().is_err(), "[{}] should not be a severity", name);
        }
    }

    #[test]
    fn should_be_ordered_from_the_most_verbose() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn should_display_the_level_name() {
        assert_eq!("WARNING", Severity::Warning.to_string());
        assert_eq!("CRITICAL", format!("{}", Severity::Critical));
    }
}
