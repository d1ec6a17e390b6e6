//! Environment-driven configuration

use std::env;
use std::net::SocketAddr;

use anyhow::Context;

/// Runtime configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Read configuration from the environment (after `dotenvy::dotenv()`).
    ///
    /// `HOST` defaults to `0.0.0.0`, `PORT` to `3000`.
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = match env::var("PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("invalid PORT value `{}`", value))?,
            Err(_) => 3000,
        };

        let bind_addr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", host, port))?;

        Ok(Self { bind_addr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bind_addr() {
        // No HOST/PORT set in the test environment by default
        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
    }
}
