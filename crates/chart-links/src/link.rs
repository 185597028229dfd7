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

use crate::config::DashboardConfig;
use crate::error::{ChartKind, Result};
use crate::query::QueryParams;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

// Same set the URL standard applies to fragments.
const FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// A dashboard link split into its parts. `query` is already encoded;
/// `fragment` is raw and escaped on display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DashboardUrl {
    pub scheme: String,
    pub host: String,
    pub path: String,
    pub query: String,
    pub fragment: Option<String>,
}

impl DashboardUrl {
    pub fn assemble(
        config: &DashboardConfig,
        kind: ChartKind,
        params: &QueryParams,
        fragment: Option<String>,
    ) -> Self {
        Self {
            scheme: config.scheme.clone(),
            host: config.host.clone(),
            path: kind.path().to_string(),
            query: params.encode(),
            fragment: fragment.filter(|f| !f.is_empty()),
        }
    }

    pub fn to_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.to_string())?)
    }
}

impl fmt::Display for DashboardUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.host, self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", utf8_percent_encode(fragment, FRAGMENT))?;
        }
        Ok(())
    }
}

impl TryFrom<&DashboardUrl> for Url {
    type Error = crate::error::DashboardError;
    fn try_from(link: &DashboardUrl) -> Result<Self> {
        link.to_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        let mut params = QueryParams::new();
        for (k, v) in pairs {
            params.add(*k, *v);
        }
        params
    }

    #[test]
    fn query_is_omitted_when_empty() {
        let link = DashboardUrl::assemble(
            &DashboardConfig::default(),
            ChartKind::CompareRun,
            &QueryParams::new(),
            None,
        );
        assert_eq!(link.to_string(), "https://mako.dev/cmprun");
    }

    #[test]
    fn empty_fragment_is_dropped() {
        let link = DashboardUrl::assemble(
            &DashboardConfig::default(),
            ChartKind::VisualizeAnalysis,
            &params(&[("run_key", "r")]),
            Some(String::new()),
        );
        assert_eq!(link.fragment, None);
        assert_eq!(link.to_string(), "https://mako.dev/analysis-results?run_key=r");
    }

    #[test]
    fn fragment_is_escaped() {
        let link = DashboardUrl::assemble(
            &DashboardConfig::default(),
            ChartKind::VisualizeAnalysis,
            &params(&[("run_key", "r")]),
            Some("analysis a<b".to_string()),
        );
        assert_eq!(
            link.to_string(),
            "https://mako.dev/analysis-results?run_key=r#analysis%20a%3Cb"
        );
    }

    #[test]
    fn converts_to_url() {
        let config = DashboardConfig::default().with_host("perf.local:8443").unwrap();
        let link = DashboardUrl::assemble(
            &config,
            ChartKind::Run,
            &params(&[("run_key", "a b"), ("~y", "1")]),
            None,
        );
        let url = link.to_url().unwrap();
        assert_eq!(url.as_str(), link.to_string());
        assert_eq!(url.host_str(), Some("perf.local"));
        assert_eq!(url.port(), Some(8443));
        assert_eq!(url.path(), "/run");
        assert_eq!(url.query(), Some("run_key=a+b&~y=1"));
    }

    #[test]
    fn unparseable_host_fails_conversion() {
        let link = DashboardUrl {
            scheme: "https".to_string(),
            host: "bad host".to_string(),
            path: "/run".to_string(),
            query: String::new(),
            fragment: None,
        };
        assert!(link.to_url().is_err());
    }
}
