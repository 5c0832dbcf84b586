//! Environment-driven server configuration.

use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Candidate corpus directories; `None` uses the defaults under the
    /// working directory.
    pub data_dirs: Option<Vec<PathBuf>>,
    /// Base URL of the case-record service; `None` serves the demo records
    /// from memory.
    pub case_record_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dirs: None,
            case_record_url: None,
        }
    }
}

impl ServerConfig {
    /// Read `DIGIMPLANT_HOST`, `DIGIMPLANT_PORT`, `DIGIMPLANT_DATA_DIR` and
    /// `DIGIMPLANT_CASE_RECORD_URL`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty =
            |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = non_empty("DIGIMPLANT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match non_empty("DIGIMPLANT_PORT") {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("DIGIMPLANT_PORT is not a valid port: {value}"))?,
            None => DEFAULT_PORT,
        };
        let data_dirs = non_empty("DIGIMPLANT_DATA_DIR").map(|value| {
            value.split(':').filter(|dir| !dir.is_empty()).map(PathBuf::from).collect()
        });
        let case_record_url = non_empty("DIGIMPLANT_CASE_RECORD_URL")
            .map(|url| url.trim_end_matches('/').to_string());

        Ok(Self { host, port, data_dirs, case_record_url })
    }
}
