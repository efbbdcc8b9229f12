//! Server configuration loaded from the environment.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Runtime settings for the todo server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Upper bound on a single store call.
    pub store_timeout: Duration,
    /// Largest page a read may return; bigger requested sizes are clamped.
    pub max_page_size: usize,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON log lines.
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            store_timeout: DEFAULT_STORE_TIMEOUT,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Reads `HOST`, `PORT`, `STORE_TIMEOUT_MS`, `MAX_PAGE_SIZE`, `LOG_LEVEL`
    /// and `LOG_JSON`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host: IpAddr = parse_var(&lookup, "HOST")?.unwrap_or(defaults.addr.ip());
        let port: u16 = parse_var(&lookup, "PORT")?.unwrap_or(defaults.addr.port());
        let store_timeout = parse_var::<u64>(&lookup, "STORE_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.store_timeout);
        let max_page_size = match parse_var::<usize>(&lookup, "MAX_PAGE_SIZE")? {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    var: "MAX_PAGE_SIZE",
                    value: "0".to_string(),
                })
            }
            Some(n) => n,
            None => defaults.max_page_size,
        };

        Ok(Self {
            addr: SocketAddr::new(host, port),
            store_timeout,
            max_page_size,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            json_logs: parse_var(&lookup, "LOG_JSON")?.unwrap_or(defaults.json_logs),
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

/// Builder for `ServerConfig`.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    store_timeout: Option<Duration>,
    max_page_size: Option<usize>,
}

impl ServerConfigBuilder {
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    pub fn max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = Some(max);
        self
    }

    pub fn build(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            addr: self.addr.unwrap_or(defaults.addr),
            store_timeout: self.store_timeout.unwrap_or(defaults.store_timeout),
            max_page_size: self.max_page_size.unwrap_or(defaults.max_page_size),
            ..defaults
        }
    }
}
