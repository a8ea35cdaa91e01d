//! Server configuration read from the environment.
//!
//! Every variable has a default; a missing one is logged and the default is
//! used. A value that is present but cannot be parsed stops the startup.

use log::{info, warn};
use std::{env, fmt::Display, path::PathBuf, str::FromStr};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub fonts_dir: PathBuf,
    /// Base URL of the card payment gateway. Card orders get a redirect link
    /// only when this is set.
    pub payment_gateway_url: Option<String>,
    pub open_browser: bool,
}

impl Config {
    pub fn load() -> Result<Self, String> {
        Ok(Self {
            host: try_load("PORTAL_HOST", "127.0.0.1")?,
            port: try_load("PORTAL_PORT", "8080")?,
            database_path: try_load("PORTAL_DB", "farmacia.sqlite")?,
            fonts_dir: try_load("PORTAL_FONTS_DIR", "./fonts")?,
            payment_gateway_url: var("PORTAL_PAYMENT_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            open_browser: try_load("PORTAL_OPEN_BROWSER", "false")?,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, String>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            format!("Invalid {key} value: {e}")
        })
}
