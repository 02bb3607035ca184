use scaffold_common_logger::LoggerBuilder;
use serde_json::json;
use std::fs;
use tracing::{debug, info};

#[test]
fn should_write_to_file_all_the_records_above_the_file_level() {
    // Arrange
    let tempdir = tempfile::tempdir().unwrap();
    let log_dir = tempdir.path().join("logs");
    let config = json!({
        "level": "INFO",
        "console_output": { "enabled": false },
        "file_output": {
            "enabled": true,
            "level": "DEBUG",
            "output_directory": log_dir.to_str().unwrap(),
            "file_prefix": "test_"
        }
    });

    // Act
    let logger = LoggerBuilder::new(config.as_object().unwrap()).unwrap().build().unwrap();
    let log_file_path = logger.log_file_path().unwrap().to_path_buf();

    logger.in_scope(|| {
        debug!("debug-file");
        info!("info-file");
    });
    logger.close();

    // Assert
    let files: Vec<_> = fs::read_dir(&log_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            let filename = path.file_name().unwrap().to_str().unwrap();
            filename.starts_with("test_") && filename.ends_with(".log")
        })
        .collect();
    assert_eq!(vec![log_file_path.clone()], files);

    let content = fs::read_to_string(&log_file_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert!(lines.iter().any(|line| line.ends_with("DEBUG: debug-file")));
    assert!(lines.iter().any(|line| line.ends_with("INFO: info-file")));
    assert!(lines.iter().any(|line| line.ends_with("DEBUG: Logger initialized successfully")));
}

#[test]
fn should_create_the_log_folder_relative_to_the_base_dir() {
    // Arrange
    let tempdir = tempfile::tempdir().unwrap();
    let config = json!({
        "console_output": { "enabled": false },
        "file_output": {
            "enabled": true,
            "output_directory": "nested/logs",
            "file_prefix": "ログ_"
        }
    });

    // Act
    let logger = LoggerBuilder::new(config.as_object().unwrap())
        .unwrap()
        .base_dir(tempdir.path())
        .build()
        .unwrap();
    let log_file_path = logger.log_file_path().unwrap().to_path_buf();
    logger.close();

    // Assert
    assert_eq!(tempdir.path().join("nested").join("logs"), log_file_path.parent().unwrap());
    let filename = log_file_path.file_name().unwrap().to_str().unwrap();
    assert!(filename.starts_with("ログ_"));
    // ログ_YYYYMMDD_HHMMSS.log
    assert_eq!("ログ_".len() + "YYYYMMDD_HHMMSS.log".len(), filename.len());
    assert!(log_file_path.exists());
}
