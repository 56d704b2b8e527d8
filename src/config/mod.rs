use crate::error::{Error, Result};

use clap::ArgMatches;
use serde::Deserialize;

use std::path::{Path, PathBuf};

mod general;
mod log;

pub use general::General;
pub use log::Log;

#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    log: Log,
}

impl TryFrom<&ArgMatches> for Config {
    type Error = Error;

    fn try_from(args: &ArgMatches) -> Result<Self> {
        let mut config = match args.get_one::<PathBuf>("CONFIG") {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(dir) = args.get_one::<PathBuf>("DATA_DIR") {
            config.general.data_dir = dir.clone();
        }

        if let Some(file) = args.get_one::<PathBuf>("METADATA") {
            config.general.metadata_file = file.clone();
        }

        config.log.raise(args.get_count("VERBOSE"));

        Ok(config)
    }
}

impl Config {
    pub fn load(path: &dyn AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("unable to open config file {path:?}: {e}"))
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::configuration(format!("failed to parse config file: {e}")))?;

        config.general.check()?;

        Ok(config)
    }

    pub fn general(&self) -> &General {
        &self.general
    }

    pub fn log(&self) -> &Log {
        &self.log
    }
}
