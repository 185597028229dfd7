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

//! Canonical dashboard links for benchmark charts.
//!
//! Each chart request is validated, flattened into multi-valued query
//! parameters and rendered with keys in sorted order, so identical requests
//! always yield byte-identical URLs.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod link;
pub mod logging;
pub mod query;
pub mod request;
pub mod validation;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, StandardDashboard};
pub use error::{ChartKind, DashboardError, Result};
pub use filter::{record_to_query_param, DataFilter, DataFilterRecord};
pub use link::DashboardUrl;
pub use query::QueryParams;
pub use request::{
    AggregateChartInput, ChartRequest, CompareAggregateChartInput, CompareRunChartInput,
    RunChartInput, Series, VisualizeAnalysisInput,
};
pub use validation::Validate;
