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

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Aggregate,
    Run,
    CompareAggregate,
    CompareRun,
    VisualizeAnalysis,
}
impl ChartKind {
    /// Name of the descriptor type, used as the prefix of validation messages.
    pub fn input_name(&self) -> &'static str {
        match self {
            ChartKind::Aggregate => "DashboardAggregateChartInput",
            ChartKind::Run => "DashboardRunChartInput",
            ChartKind::CompareAggregate => "DashboardCompareAggregateChartInput",
            ChartKind::CompareRun => "DashboardCompareRunChartInput",
            ChartKind::VisualizeAnalysis => "DashboardVisualizeAnalysisInput",
        }
    }
    pub fn path(&self) -> &'static str {
        match self {
            ChartKind::Aggregate => "/benchmark",
            ChartKind::Run => "/run",
            ChartKind::CompareAggregate => "/cmpagg",
            ChartKind::CompareRun => "/cmprun",
            ChartKind::VisualizeAnalysis => "/analysis-results",
        }
    }
}
impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_name())
    }
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(
        "{chart_kind}.{}{field_name} {}",
        series_path(.series_index),
        absence(.field_name)
    )]
    MissingRequiredField {
        chart_kind: ChartKind,
        field_name: &'static str,
        series_index: Option<usize>,
    },
    #[error("{chart_kind}.{collection_name} empty")]
    EmptyCollection {
        chart_kind: ChartKind,
        collection_name: &'static str,
    },
    #[error("{}unknown DataFilter.data_type: '{data_type}'", series_context(.series_index))]
    UnrecognizedFilterKind {
        data_type: String,
        series_index: Option<usize>,
    },
    #[error("Invalid dashboard configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("Failed to parse dashboard URL: {source}")]
    InvalidUrl {
        #[from]
        source: url::ParseError,
    },
    #[error("Failed to decode chart request: {source}")]
    InvalidRequest {
        #[from]
        source: serde_json::Error,
    },
}

fn series_path(series_index: &Option<usize>) -> String {
    series_index
        .map(|idx| format!("series_list[{idx}]."))
        .unwrap_or_default()
}

// Filter selections are messages, so they can only be absent.
fn absence(field_name: &str) -> &'static str {
    match field_name {
        "value_selection" => "missing",
        _ => "empty or missing",
    }
}

fn series_context(series_index: &Option<usize>) -> String {
    series_index
        .map(|idx| {
            format!(
                "{}.series_list[{idx}].value_selection err: ",
                ChartKind::CompareAggregate
            )
        })
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, DashboardError>;

impl DashboardError {
    pub fn missing(chart_kind: ChartKind, field_name: &'static str) -> Self {
        DashboardError::MissingRequiredField {
            chart_kind,
            field_name,
            series_index: None,
        }
    }
    pub fn missing_in_series(
        chart_kind: ChartKind,
        field_name: &'static str,
        series_index: usize,
    ) -> Self {
        DashboardError::MissingRequiredField {
            chart_kind,
            field_name,
            series_index: Some(series_index),
        }
    }
    pub fn empty(chart_kind: ChartKind, collection_name: &'static str) -> Self {
        DashboardError::EmptyCollection {
            chart_kind,
            collection_name,
        }
    }
    /// Attaches the series position to a filter error raised outside of a series context.
    pub fn in_series(self, idx: usize) -> Self {
        match self {
            DashboardError::UnrecognizedFilterKind { data_type, .. } => {
                DashboardError::UnrecognizedFilterKind {
                    data_type,
                    series_index: Some(idx),
                }
            }
            other => other,
        }
    }
    pub fn series_index(&self) -> Option<usize> {
        match self {
            DashboardError::MissingRequiredField { series_index, .. }
            | DashboardError::UnrecognizedFilterKind { series_index, .. } => *series_index,
            _ => None,
        }
    }
    /// Request errors can be fixed by the caller; the rest are setup problems.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DashboardError::MissingRequiredField { .. }
                | DashboardError::EmptyCollection { .. }
                | DashboardError::UnrecognizedFilterKind { .. }
                | DashboardError::InvalidRequest { .. }
        )
    }
    pub fn category(&self) -> &'static str {
        match self {
            DashboardError::MissingRequiredField { .. }
            | DashboardError::EmptyCollection { .. } => "Validation",
            DashboardError::UnrecognizedFilterKind { .. } => "Filter",
            DashboardError::InvalidConfig { .. } => "Configuration",
            DashboardError::InvalidUrl { .. } => "URL",
            DashboardError::InvalidRequest { .. } => "Serialisation",
        }
    }
}
