// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, their defaults, and the [`Config`] loaded from
//! them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Directory holding `ledger.redb` | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LEDGER_ORGS` | Comma separated MSP IDs of the channel members | `Org1MSP,Org2MSP` |
//! | `PEER_NAME` | Peer address reported in rejection details | `peer0.local` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Environment variable name for the ledger data directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
/// Environment variable name for the channel member list.
///
/// Every listed organization gets a private collection and is a member of
/// the shared asset collection.
pub const LEDGER_ORGS_ENV: &str = "LEDGER_ORGS";
pub const PEER_NAME_ENV: &str = "PEER_NAME";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LEDGER_ORGS: &str = "Org1MSP,Org2MSP";
pub const DEFAULT_PEER_NAME: &str = "peer0.local";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// File name of the ledger database inside the data directory.
pub const LEDGER_FILE: &str = "ledger.redb";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub organizations: Vec<String>,
    pub peer_name: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let host = get(HOST_ENV, DEFAULT_HOST);
        let ip: IpAddr = host
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::invalid(HOST_ENV, &host, e.to_string()))?;

        let port_raw = get(PORT_ENV, &DEFAULT_PORT.to_string());
        let port: u16 = port_raw
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::invalid(PORT_ENV, &port_raw, e.to_string()))?;

        let orgs_raw = get(LEDGER_ORGS_ENV, DEFAULT_LEDGER_ORGS);
        let mut organizations: Vec<String> = Vec::new();
        for org in orgs_raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            if org.contains('\u{0}') {
                return Err(ConfigError::invalid(LEDGER_ORGS_ENV, &orgs_raw, "NUL in MSP ID"));
            }
            if !organizations.iter().any(|o| o == org) {
                organizations.push(org.to_string());
            }
        }
        if organizations.is_empty() {
            return Err(ConfigError::invalid(
                LEDGER_ORGS_ENV,
                &orgs_raw,
                "at least one organization is required",
            ));
        }

        let format_raw = get(LOG_FORMAT_ENV, "pretty");
        let log_format = match format_raw.to_ascii_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => {
                return Err(ConfigError::invalid(
                    LOG_FORMAT_ENV,
                    &format_raw,
                    "expected json or pretty",
                ))
            }
        };

        Ok(Self {
            data_dir: PathBuf::from(get(DATA_DIR_ENV, DEFAULT_DATA_DIR)),
            bind_addr: SocketAddr::new(ip, port),
            organizations,
            peer_name: get(PEER_NAME_ENV, DEFAULT_PEER_NAME),
            log_format,
        })
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(LEDGER_FILE)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.organizations, vec!["Org1MSP", "Org2MSP"]);
        assert_eq!(config.peer_name, "peer0.local");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.ledger_path(), PathBuf::from("./data/ledger.redb"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            (DATA_DIR_ENV, "/var/lib/ledger"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9051"),
            (LEDGER_ORGS_ENV, " Org1MSP , Org3MSP,,Org1MSP "),
            (PEER_NAME_ENV, "peer0.org3.example.com:9051"),
            (LOG_FORMAT_ENV, "JSON"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9051".parse().unwrap());
        assert_eq!(config.organizations, vec!["Org1MSP", "Org3MSP"]);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.ledger_path(), PathBuf::from("/var/lib/ledger/ledger.redb"));
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            load(&[(PORT_ENV, "eighty")]),
            Err(ConfigError::Invalid { name: PORT_ENV, .. })
        ));
        assert!(matches!(
            load(&[(HOST_ENV, "not an ip")]),
            Err(ConfigError::Invalid { name: HOST_ENV, .. })
        ));
        assert!(matches!(
            load(&[(LEDGER_ORGS_ENV, " , ")]),
            Err(ConfigError::Invalid { name: LEDGER_ORGS_ENV, .. })
        ));
        assert!(matches!(
            load(&[(LOG_FORMAT_ENV, "xml")]),
            Err(ConfigError::Invalid { name: LOG_FORMAT_ENV, .. })
        ));
    }
}
