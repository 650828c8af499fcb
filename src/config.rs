use std::{fs::File, io::Read, path::Path};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::options::Args;

pub const MIN_SECRET_LEN: usize = 32;

#[derive(Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub secret_key: Option<String>,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://playlist-app.sqlite?mode=rwc".to_string(),
            secret_key: None,
            bind_addr: "localhost:3000".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("no session secret configured (set SECRET_KEY)")]
    MissingSecret,
    #[error("session secret must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,
}

const DEFAULT_CFG: &str = "playlist-app.toml";
impl Config {
    /// Reads the file at `path`, or the default file if it exists, or falls back to defaults.
    pub fn new(path: Option<&str>) -> Result<Self, Error> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CFG).is_file() => {
                info!("no config file path provided, using default ({DEFAULT_CFG})");
                DEFAULT_CFG
            }
            None => {
                info!("no config file found, using built-in defaults");
                return Ok(Self::default());
            }
        };

        let mut fh = File::open(path)?;
        let mut data = String::new();
        fh.read_to_string(&mut data)?;

        Ok(toml::from_str(&data)?)
    }

    /// File config overridden by command line and environment.
    pub fn load(args: &Args) -> Result<Self, Error> {
        Self::new(args.config.as_deref())?.merge(args)
    }

    fn merge(mut self, args: &Args) -> Result<Self, Error> {
        if let Some(url) = &args.database_url {
            self.database_url = url.clone();
        }
        if let Some(secret) = &args.secret_key {
            self.secret_key = Some(secret.clone());
        }
        if let Some(addr) = &args.address {
            self.bind_addr = addr.clone();
        }
        self.secret()?;
        Ok(self)
    }

    pub fn secret(&self) -> Result<&[u8], Error> {
        let secret = self.secret_key.as_deref().ok_or(Error::MissingSecret)?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(Error::WeakSecret);
        }
        Ok(secret.as_bytes())
    }
}
