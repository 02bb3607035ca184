use clap::Parser;

pub const DEFAULT_NAME: &str = "none_name";
pub const CONFIG_DIR_DEFAULT: &str = env!("CARGO_MANIFEST_DIR");

#[derive(Debug, Parser)]
#[clap(rename_all = "kebab-case")]
pub struct Conf {
    /// The name to be logged. Unless exactly one name is given, it is asked interactively
    pub names: Vec<String>,

    /// The configuration file in JSON format; a relative path is resolved against `config-dir`
    #[clap(long, default_value = "config.json")]
    pub config_file: String,

    /// The folder where the configuration file is searched. The log folder is relative to it.
    #[clap(long, default_value = CONFIG_DIR_DEFAULT)]
    pub config_dir: String,
}

impl Conf {
    pub fn build() -> Self {
        Conf::parse()
    }

    pub fn name(&self) -> Option<&str> {
        match self.names.as_slice() {
            [name] => Some(name),
            _ => None,
        }
    }
}
