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

use crate::error::{ChartKind, Result};
use crate::filter::DataFilterRecord;
use serde::{Deserialize, Serialize};

/// Aggregate values of a single benchmark over its runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateChartInput {
    #[serde(default)]
    pub benchmark_key: String,
    #[serde(default)]
    pub value_selections: Vec<DataFilterRecord>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub min_timestamp_ms: Option<f64>,
    #[serde(default)]
    pub max_timestamp_ms: Option<f64>,
    #[serde(default)]
    pub max_runs: Option<i32>,
}
impl AggregateChartInput {
    pub fn new(benchmark_key: impl Into<String>) -> Self {
        Self {
            benchmark_key: benchmark_key.into(),
            ..Default::default()
        }
    }
    pub fn with_value_selection(mut self, filter: impl Into<DataFilterRecord>) -> Self {
        self.value_selections.push(filter.into());
        self
    }
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
    pub fn with_time_range(mut self, min_timestamp_ms: Option<f64>, max_timestamp_ms: Option<f64>) -> Self {
        self.min_timestamp_ms = min_timestamp_ms;
        self.max_timestamp_ms = max_timestamp_ms;
        self
    }
    pub fn with_max_runs(mut self, max_runs: i32) -> Self {
        self.max_runs = Some(max_runs);
        self
    }
}

/// Raw sample points of a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunChartInput {
    #[serde(default)]
    pub run_key: String,
    #[serde(default)]
    pub metric_keys: Vec<String>,
}
impl RunChartInput {
    pub fn new(run_key: impl Into<String>) -> Self {
        Self {
            run_key: run_key.into(),
            metric_keys: Vec::new(),
        }
    }
    pub fn with_metric_key(mut self, metric_key: impl Into<String>) -> Self {
        self.metric_keys.push(metric_key.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub series_label: String,
    #[serde(default)]
    pub benchmark_key: String,
    #[serde(default)]
    pub value_selection: Option<DataFilterRecord>,
    #[serde(default)]
    pub tags: Vec<String>,
}
impl Series {
    pub fn new(
        series_label: impl Into<String>,
        benchmark_key: impl Into<String>,
        value_selection: impl Into<DataFilterRecord>,
    ) -> Self {
        Self {
            series_label: series_label.into(),
            benchmark_key: benchmark_key.into(),
            value_selection: Some(value_selection.into()),
            tags: Vec::new(),
        }
    }
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Aggregates of several benchmarks plotted side by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompareAggregateChartInput {
    #[serde(default)]
    pub series_list: Vec<Series>,
    #[serde(default)]
    pub min_timestamp_ms: Option<f64>,
    #[serde(default)]
    pub max_timestamp_ms: Option<f64>,
    #[serde(default)]
    pub max_runs: Option<i32>,
}
impl CompareAggregateChartInput {
    pub fn new(series_list: Vec<Series>) -> Self {
        Self {
            series_list,
            ..Default::default()
        }
    }
    pub fn with_series(mut self, series: Series) -> Self {
        self.series_list.push(series);
        self
    }
    pub fn with_time_range(mut self, min_timestamp_ms: Option<f64>, max_timestamp_ms: Option<f64>) -> Self {
        self.min_timestamp_ms = min_timestamp_ms;
        self.max_timestamp_ms = max_timestamp_ms;
        self
    }
    pub fn with_max_runs(mut self, max_runs: i32) -> Self {
        self.max_runs = Some(max_runs);
        self
    }
}

/// Raw sample points of several runs plotted side by side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareRunChartInput {
    #[serde(default)]
    pub run_keys: Vec<String>,
    #[serde(default)]
    pub metric_keys: Vec<String>,
}
impl CompareRunChartInput {
    pub fn new<I, S>(run_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            run_keys: run_keys.into_iter().map(Into::into).collect(),
            metric_keys: Vec::new(),
        }
    }
    pub fn with_metric_key(mut self, metric_key: impl Into<String>) -> Self {
        self.metric_keys.push(metric_key.into());
        self
    }
}

/// How an analyzer treated a run. `run_key` is passed through unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizeAnalysisInput {
    #[serde(default)]
    pub run_key: String,
    #[serde(default)]
    pub analysis_key: Option<String>,
}
impl VisualizeAnalysisInput {
    pub fn new(run_key: impl Into<String>) -> Self {
        Self {
            run_key: run_key.into(),
            analysis_key: None,
        }
    }
    pub fn with_analysis_key(mut self, analysis_key: impl Into<String>) -> Self {
        self.analysis_key = Some(analysis_key.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum ChartRequest {
    Aggregate(AggregateChartInput),
    Run(RunChartInput),
    CompareAggregate(CompareAggregateChartInput),
    CompareRun(CompareRunChartInput),
    VisualizeAnalysis(VisualizeAnalysisInput),
}
impl ChartRequest {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartRequest::Aggregate(_) => ChartKind::Aggregate,
            ChartRequest::Run(_) => ChartKind::Run,
            ChartRequest::CompareAggregate(_) => ChartKind::CompareAggregate,
            ChartRequest::CompareRun(_) => ChartKind::CompareRun,
            ChartRequest::VisualizeAnalysis(_) => ChartKind::VisualizeAnalysis,
        }
    }
    /// Decodes a request of the form `{"chart": "run", "run_key": "..."}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
impl From<AggregateChartInput> for ChartRequest {
    fn from(input: AggregateChartInput) -> Self {
        ChartRequest::Aggregate(input)
    }
}
impl From<RunChartInput> for ChartRequest {
    fn from(input: RunChartInput) -> Self {
        ChartRequest::Run(input)
    }
}
impl From<CompareAggregateChartInput> for ChartRequest {
    fn from(input: CompareAggregateChartInput) -> Self {
        ChartRequest::CompareAggregate(input)
    }
}
impl From<CompareRunChartInput> for ChartRequest {
    fn from(input: CompareRunChartInput) -> Self {
        ChartRequest::CompareRun(input)
    }
}
impl From<VisualizeAnalysisInput> for ChartRequest {
    fn from(input: VisualizeAnalysisInput) -> Self {
        ChartRequest::VisualizeAnalysis(input)
    }
}
