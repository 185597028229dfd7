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

mod cli;

use anyhow::{Context, Result};
use chart_links::{ChartRequest, Dashboard, StandardDashboard};
use clap::Parser;
use cli::Args;
use std::io::Read;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn read_request(args: &Args) -> Result<String> {
    if args.reads_stdin() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read chart request from stdin")?;
        return Ok(buf);
    }
    let path = args.request.as_deref().context("no request path given")?;
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read chart request '{}'", path.display()))
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = args.dashboard_config()?;
    info!(scheme = %config.scheme, host = %config.host, "Dashboard configured");
    let dashboard = StandardDashboard::with_config(config)?;

    let raw = read_request(&args)?;
    let request = ChartRequest::from_json(&raw)?;
    let link = dashboard.link(&request)?;

    if args.structured {
        println!("{}", serde_json::to_string_pretty(&link)?);
    } else {
        println!("{link}");
    }
    Ok(())
}
