mod common;

use common::SharedBuffer;
use scaffold_common_logger::{LoggerBuilder, Severity};
use serde_json::json;
use tracing::{debug, info};

#[test]
fn should_fall_back_and_warn_on_unknown_levels() {
    // Arrange
    let console = SharedBuffer::default();
    let config = json!({
        "level": "verbose",
        "console_output": { "level": "chatty" }
    });

    // Act
    let logger = LoggerBuilder::new(config.as_object().unwrap())
        .unwrap()
        .console_writer(console.clone())
        .build()
        .unwrap();
    let effective_level = logger.effective_level();
    let warnings = logger.warnings().to_vec();

    logger.in_scope(|| {
        debug!("fallback-debug");
        info!("fallback-info");
    });
    logger.close();

    // Assert
    assert_eq!(Severity::Info, effective_level);
    assert_eq!(2, warnings.len());

    let lines = console.lines();
    assert!(lines.iter().any(|line| line.contains("WARNING: Unknown severity [verbose]")));
    assert!(lines.iter().any(|line| line.contains("WARNING: Unknown severity [chatty]")));
    assert!(lines.iter().all(|line| !line.contains("fallback-debug")));
    assert!(lines.iter().any(|line| line.ends_with("INFO: fallback-info")));
}
