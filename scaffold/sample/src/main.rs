pub mod config;

use crate::config::{Conf, DEFAULT_NAME};
use log::*;
use scaffold_common_config::{load_config, resolution_root, ConfigMap};
use scaffold_common_logger::{logger_section, setup_logger};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use uuid::Uuid;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let conf = Conf::build();

    let (logger_config, base_dir) = read_logger_config(&conf)?;

    // Setup logger
    let logger = setup_logger(&logger_config, base_dir)?;

    debug!("Number of names received as argument: {}", conf.names.len());

    let name = match conf.name() {
        Some(name) => {
            debug!("The name was received as argument");
            name.to_owned()
        }
        None => {
            debug!("No single name received as argument, asking it interactively");
            let stdin = io::stdin();
            prompt_name(&mut stdin.lock(), &mut io::stdout())?
        }
    };

    debug!("Processing started");

    info!("Your UUID is {}", Uuid::now_v7());
    info!("Your name is {}", name);

    debug!("Processing completed");

    logger.close();
    Ok(())
}

/// Returns the logger section of the configuration file
/// together with the folder the log output is relative to.
fn read_logger_config(conf: &Conf) -> Result<(ConfigMap, PathBuf), Box<dyn std::error::Error>> {
    let config = load_config(&conf.config_file, Some(&conf.config_dir))?;
    Ok((logger_section(&config)?, resolution_root(&conf.config_dir)))
}

/// Asks the name on `output` and reads it from `input`.
/// An empty answer, or the end of the input, returns the default name.
fn prompt_name<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    write!(output, "Please enter your name [{}]: ", DEFAULT_NAME)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let name = line.trim_end_matches(&['\r', '\n'][..]);

    if name.is_empty() {
        Ok(DEFAULT_NAME.to_owned())
    } else {
        Ok(name.to_owned())
    }
}
