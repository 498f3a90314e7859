use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DEFAULT_WORKER_THREADS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Size of the timer worker pool.
    pub worker_threads: usize,
    /// Directory the persister module keeps its units in.
    pub state_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_threads: DEFAULT_WORKER_THREADS,
            state_dir: PathBuf::from("./data"),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, Error> {
        let text = std::fs::read_to_string(path)?;

        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Config, Error> {
        let config: Config = toml::from_str(text).map_err(|err| Error::Parse(err.to_string()))?;

        if config.worker_threads == 0 {
            return Err(Error::Parse("worker_threads must be at least 1".to_string()));
        }

        Ok(config)
    }
}
