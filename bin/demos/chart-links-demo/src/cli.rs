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

use chart_links::{DashboardConfig, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "chart-links-demo",
    version,
    about = "Turn a JSON chart request into a dashboard link"
)]
pub struct Args {
    #[arg(
        value_name = "REQUEST",
        help = "Path to a JSON chart request; reads stdin when omitted or '-'"
    )]
    pub request: Option<PathBuf>,

    #[arg(long, help = "Dashboard host, overrides CHART_LINKS_HOST")]
    pub host: Option<String>,

    #[arg(long, help = "URL scheme, overrides CHART_LINKS_SCHEME")]
    pub scheme: Option<String>,

    #[arg(long, help = "Print the link split into its parts as JSON")]
    pub structured: bool,

    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    pub fn dashboard_config(&self) -> Result<DashboardConfig> {
        let mut config = DashboardConfig::from_env()?;
        if let Some(scheme) = &self.scheme {
            config = config.with_scheme(scheme.clone())?;
        }
        if let Some(host) = &self.host {
            config = config.with_host(host.clone())?;
        }
        Ok(config)
    }

    pub fn reads_stdin(&self) -> bool {
        self.request
            .as_ref()
            .map_or(true, |path| path.as_os_str() == "-")
    }
}
