use log::*;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The raw content of a configuration file: an arbitrary-depth, string-keyed mapping.
pub type ConfigMap = Map<String, Value>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("ConfigurationNotFound: [{}]", .path.display())]
    ConfigurationNotFound { path: PathBuf },
    #[error("ConfigurationParseError: cannot parse [{}]. err: {source}", .path.display())]
    ConfigurationParseError { path: PathBuf, source: serde_json::Error },
    #[error("ConfigurationIoError: cannot read [{}]. err: {source}", .path.display())]
    ConfigurationIoError { path: PathBuf, source: std::io::Error },
}

/// Returns the directory against which relative configuration paths are joined.
/// If `base_path` points to an existing file, its parent directory is used.
pub fn resolution_root<B: AsRef<Path>>(base_path: B) -> PathBuf {
    let base_path = base_path.as_ref();
    if base_path.is_file() {
        if let Some(parent) = base_path.parent() {
            return parent.to_path_buf();
        }
    }
    base_path.to_path_buf()
}

/// Resolves the location of a configuration file.
///
/// - An absolute `config_file` is used as-is.
/// - A relative one is joined onto the [`resolution_root`] of `base_path`, if provided and not empty.
/// - Otherwise it is joined onto the current working directory.
pub fn resolve_config_path<P: AsRef<Path>, B: AsRef<Path>>(
    config_file: P,
    base_path: Option<B>,
) -> Result<PathBuf, ConfigError> {
    let config_file = config_file.as_ref();
    if config_file.is_absolute() {
        return Ok(config_file.to_path_buf());
    }

    match base_path {
        Some(base_path) if !base_path.as_ref().as_os_str().is_empty() => {
            Ok(resolution_root(base_path).join(config_file))
        }
        _ => {
            let current_dir = std::env::current_dir().map_err(|source| {
                ConfigError::ConfigurationIoError { path: config_file.to_path_buf(), source }
            })?;
            Ok(current_dir.join(config_file))
        }
    }
}

/// Loads a JSON configuration file and returns its content as a [`ConfigMap`].
/// The file is read and parsed again on every call.
pub fn load_config<P: AsRef<Path>, B: AsRef<Path>>(
    config_file: P,
    base_path: Option<B>,
) -> Result<ConfigMap, ConfigError> {
    load_config_as(config_file, base_path)
}

/// Like [`load_config`] but decodes the file content into the type `T`.
pub fn load_config_as<T: DeserializeOwned, P: AsRef<Path>, B: AsRef<Path>>(
    config_file: P,
    base_path: Option<B>,
) -> Result<T, ConfigError> {
    let path = resolve_config_path(config_file, base_path)?;
    if !path.exists() {
        return Err(ConfigError::ConfigurationNotFound { path });
    }

    debug!("Loading configuration from file: [{}]", path.display());
    let body = fs::read_to_string(&path)
        .map_err(|source| ConfigError::ConfigurationIoError { path: path.clone(), source })?;
    trace!("Configuration body: \n{}", body);

    serde_json::from_str(&body).map_err(|source| ConfigError::ConfigurationParseError { path, source })
}
