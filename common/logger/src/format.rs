use crate::severity::{Severity, CRITICAL_FIELD};
use chrono::{DateTime, Local};
use std::fmt::{self, Debug, Write};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const MESSAGE_FIELD: &str = "message";
const LOG_FIELDS_PREFIX: &str = "log.";

/// Formats every event on a single line as:
/// `YYYY-MM-DD HH:MM:SS.mmm LEVELNAME: message key=value ...`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormatter;

impl<S, N> FormatEvent<S, N> for LineFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let level_name = Severity::of(metadata).map(|severity| severity.name()).unwrap_or("TRACE");

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        write!(writer, "{} {}: {}", format_line_timestamp(&Local::now()), level_name, visitor.message)?;
        for (name, value) in &visitor.fields {
            write!(writer, " {}={}", name, value)?;
        }
        writeln!(writer)
    }
}

pub fn format_line_timestamp(now: &DateTime<Local>) -> String {
    now.format(LINE_TIMESTAMP_FORMAT).to_string()
}

/// Returns the log file name: `<prefix><YYYYMMDD_HHMMSS>.log`
pub fn log_file_name(prefix: &str, now: &DateTime<Local>) -> String {
    format!("{}{}.log", prefix, now.format(FILE_TIMESTAMP_FORMAT))
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl LineVisitor {
    fn is_hidden(field: &Field) -> bool {
        field.name() == CRITICAL_FIELD || field.name().starts_with(LOG_FIELDS_PREFIX)
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message.push_str(value);
        } else if !Self::is_hidden(field) {
            self.fields.push((field.name(), value.to_owned()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == MESSAGE_FIELD {
            let _ = write!(self.message, "{:?}", value);
        } else if !Self::is_hidden(field) {
            self.fields.push((field.name(), format!("{:?}", value)));
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use chrono::TimeZone;

    #[test]
    fn should_format_the_line_timestamp_with_milliseconds() {
        let now = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap()
            + chrono::Duration::milliseconds(42);
        assert_eq!("2024-03-07 09:05:01.042", format_line_timestamp(&now));
    }

    #[test]
    fn should_build_the_log_file_name() {
        let now = Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap();
        assert_eq!("app_20241231_235958.log", log_file_name("app_", &now));
        assert_eq!("20241231_235958.log", log_file_name("", &now));
    }
}
