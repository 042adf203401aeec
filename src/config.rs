use crate::util;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "MCPROPS";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub listen_address: String,
    pub listen_port: u16,
    /// serve the editor from this directory instead of the copy built into the binary
    pub web_dir: Option<PathBuf>,
    /// stop the server after the properties have been saved successfully
    pub exit_after_save: bool,
}

impl Config {
    /// Layers the built-in defaults, the config file and `MCPROPS_*` environment variables.
    ///
    /// The config file is `config_path` if given, otherwise `config.toml` next to the executable.
    /// A missing file is skipped.
    pub fn load(config_path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut config_builder = config::Config::builder().add_source(config::File::from_str(
            include_str!("resources/default_config.toml"),
            config::FileFormat::Toml,
        ));

        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| util::dirs::base_dir().join("config.toml"));

        if config_path.exists() {
            debug!("loading config: {}", config_path.display());
            config_builder = config_builder.add_source(config::File::from(config_path));
        }

        config_builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<Config>()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_address, self.listen_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("resources/default_config.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|config| config.try_deserialize())
            .expect("built-in default config is invalid")
    }
}
