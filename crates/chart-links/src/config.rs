// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_HOST: &str = "mako.dev";
pub const SCHEME_ENV: &str = "CHART_LINKS_SCHEME";
pub const HOST_ENV: &str = "CHART_LINKS_HOST";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
        }
    }
}

impl DashboardConfig {
    /// Host may be given with trailing slashes; they are dropped.
    pub fn with_host(mut self, host: impl Into<String>) -> Result<Self> {
        let host = host.into();
        let host = host.trim_end_matches('/');
        if host.is_empty() {
            return Err(DashboardError::InvalidConfig {
                field: "host",
                reason: "must not be empty".to_string(),
            });
        }
        if host.contains("://") {
            return Err(DashboardError::InvalidConfig {
                field: "host",
                reason: format!("'{host}' must not include a scheme"),
            });
        }
        if let Some(c) = host
            .chars()
            .find(|c| c.is_whitespace() || matches!(*c, '/' | '?' | '#' | '@' | '\\'))
        {
            return Err(DashboardError::InvalidConfig {
                field: "host",
                reason: format!("'{host}' must not contain {c:?}"),
            });
        }
        if Url::parse(&format!("{DEFAULT_SCHEME}://{host}/")).is_err() {
            return Err(DashboardError::InvalidConfig {
                field: "host",
                reason: format!("'{host}' is not a valid host[:port]"),
            });
        }
        self.host = host.to_string();
        Ok(self)
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Result<Self> {
        let scheme = scheme.into();
        let valid = scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid {
            return Err(DashboardError::InvalidConfig {
                field: "scheme",
                reason: format!("'{scheme}' is not a valid URL scheme"),
            });
        }
        self.scheme = scheme.to_ascii_lowercase();
        Ok(self)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from a variable lookup, keeping defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(scheme) = lookup(SCHEME_ENV) {
            config = config.with_scheme(scheme)?;
        }
        if let Some(host) = lookup(HOST_ENV) {
            config = config.with_host(host)?;
        }
        Ok(config)
    }

    /// Checks a config that was deserialised rather than built.
    pub fn validate(&self) -> Result<()> {
        Self::default()
            .with_scheme(self.scheme.clone())?
            .with_host(self.host.clone())
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_at_public_dashboard() {
        let config = DashboardConfig::default();
        assert_eq!(config.scheme, "https");
        assert_eq!(config.host, "mako.dev");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = DashboardConfig::default()
            .with_host("perf.example.com//")
            .unwrap();
        assert_eq!(config.host, "perf.example.com");
    }

    #[test]
    fn bad_hosts_and_schemes_are_rejected() {
        assert!(DashboardConfig::default().with_host("/").is_err());
        assert!(DashboardConfig::default()
            .with_host("https://mako.dev")
            .is_err());
        assert!(DashboardConfig::default().with_scheme("").is_err());
        assert!(DashboardConfig::default().with_scheme("1http").is_err());
        assert_eq!(
            DashboardConfig::default().with_scheme("HTTP").unwrap().scheme,
            "http"
        );
    }

    #[test]
    fn hosts_with_path_query_or_spaces_are_rejected() {
        let rejected = [
            "bad host/x",
            "mako.dev/path",
            "a?b",
            "a#b",
            "a b",
            "user@mako.dev",
            "a:port",
        ];
        for host in rejected {
            let err = DashboardConfig::default().with_host(host).unwrap_err();
            assert_eq!(err.category(), "Configuration", "{host}");
        }
        for host in ["localhost:8080", "perf.local:8443", "10.0.0.1", "[::1]:9000"] {
            let config = DashboardConfig::default().with_host(host).unwrap();
            assert_eq!(config.host, host);
        }
    }

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [(HOST_ENV, "localhost:8080"), (SCHEME_ENV, "http")]
            .into_iter()
            .collect();
        let config =
            DashboardConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.scheme, "http");
        assert_eq!(config.host, "localhost:8080");

        let config = DashboardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn deserialises_with_defaults() {
        let config: DashboardConfig = serde_json::from_str(r#"{"host": "perf.local"}"#).unwrap();
        assert_eq!(config.scheme, "https");
        assert_eq!(config.host, "perf.local");
    }
}
