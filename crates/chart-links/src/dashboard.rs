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
use crate::filter::{record_to_query_param, DataFilterRecord};
use crate::link::DashboardUrl;
use crate::logging::{log_link_error, log_link_generated};
use crate::query::QueryParams;
use crate::request::{
    AggregateChartInput, ChartRequest, CompareAggregateChartInput, CompareRunChartInput,
    RunChartInput, VisualizeAnalysisInput,
};
use crate::validation::Validate;

/// Generates links to dashboard charts. Callers may make any number of calls;
/// implementations hold no per-call state.
pub trait Dashboard: Send + Sync {
    /// Aggregates of one benchmark across its runs.
    fn aggregate_chart(&self, input: &AggregateChartInput) -> Result<DashboardUrl>;

    /// Sample points of one run.
    fn run_chart(&self, input: &RunChartInput) -> Result<DashboardUrl>;

    /// Aggregate chart showing data across multiple benchmarks.
    fn compare_aggregate_chart(&self, input: &CompareAggregateChartInput) -> Result<DashboardUrl>;

    /// Run chart showing data across multiple runs.
    fn compare_run_chart(&self, input: &CompareRunChartInput) -> Result<DashboardUrl>;

    /// How an analyzer operated on a run and any historical runs.
    fn visualize_analysis(&self, input: &VisualizeAnalysisInput) -> Result<DashboardUrl>;

    fn link(&self, request: &ChartRequest) -> Result<DashboardUrl> {
        match request {
            ChartRequest::Aggregate(input) => self.aggregate_chart(input),
            ChartRequest::Run(input) => self.run_chart(input),
            ChartRequest::CompareAggregate(input) => self.compare_aggregate_chart(input),
            ChartRequest::CompareRun(input) => self.compare_run_chart(input),
            ChartRequest::VisualizeAnalysis(input) => self.visualize_analysis(input),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StandardDashboard {
    config: DashboardConfig,
}

impl StandardDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-checks the config so deserialised values get the same host and
    /// scheme normalisation as built ones.
    pub fn with_config(config: DashboardConfig) -> Result<Self> {
        let config = DashboardConfig::default()
            .with_scheme(config.scheme)?
            .with_host(config.host)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn finish(
        &self,
        kind: ChartKind,
        params: &QueryParams,
        fragment: Option<String>,
    ) -> DashboardUrl {
        let link = DashboardUrl::assemble(&self.config, kind, params, fragment);
        log_link_generated(kind, &link);
        link
    }
}

fn add_time_window(
    params: &mut QueryParams,
    min_timestamp_ms: Option<f64>,
    max_timestamp_ms: Option<f64>,
    max_runs: Option<i32>,
) {
    params
        .add_timestamp("tmin", min_timestamp_ms)
        .add_timestamp("tmax", max_timestamp_ms);
    if let Some(max_runs) = max_runs {
        params.add("maxruns", max_runs.to_string());
    }
}

fn add_metric_keys(params: &mut QueryParams, metric_keys: &[String]) {
    for metric_key in metric_keys {
        params.add(format!("~{metric_key}"), "1");
    }
}

fn checked<T: Validate>(kind: ChartKind, input: &T) -> Result<()> {
    input.validate().inspect_err(|err| log_link_error(kind, err))
}

fn mapped(
    kind: ChartKind,
    record: &DataFilterRecord,
    series_index: Option<usize>,
) -> Result<(String, String)> {
    record_to_query_param(record, series_index).inspect_err(|err| log_link_error(kind, err))
}

impl Dashboard for StandardDashboard {
    fn aggregate_chart(&self, input: &AggregateChartInput) -> Result<DashboardUrl> {
        let kind = ChartKind::Aggregate;
        checked(kind, input)?;
        let mut params = QueryParams::new();
        params.add("benchmark_key", input.benchmark_key.as_str());
        for record in &input.value_selections {
            params.add_pair(mapped(kind, record, None)?);
        }
        params.add_all("tag", &input.tags);
        add_time_window(
            &mut params,
            input.min_timestamp_ms,
            input.max_timestamp_ms,
            input.max_runs,
        );
        Ok(self.finish(kind, &params, None))
    }

    fn run_chart(&self, input: &RunChartInput) -> Result<DashboardUrl> {
        let kind = ChartKind::Run;
        checked(kind, input)?;
        let mut params = QueryParams::new();
        params.add("run_key", input.run_key.as_str());
        add_metric_keys(&mut params, &input.metric_keys);
        Ok(self.finish(kind, &params, None))
    }

    fn compare_aggregate_chart(&self, input: &CompareAggregateChartInput) -> Result<DashboardUrl> {
        let kind = ChartKind::CompareAggregate;
        checked(kind, input)?;
        let mut params = QueryParams::new();
        for (idx, series) in input.series_list.iter().enumerate() {
            params
                .add(format!("{idx}n"), series.series_label.as_str())
                .add(format!("{idx}b"), series.benchmark_key.as_str());
            // Validation guarantees a selection is present.
            if let Some(record) = &series.value_selection {
                params.add_pair(mapped(kind, record, Some(idx))?);
            }
            params.add_all(&format!("{idx}t"), &series.tags);
        }
        add_time_window(
            &mut params,
            input.min_timestamp_ms,
            input.max_timestamp_ms,
            input.max_runs,
        );
        Ok(self.finish(kind, &params, None))
    }

    fn compare_run_chart(&self, input: &CompareRunChartInput) -> Result<DashboardUrl> {
        let kind = ChartKind::CompareRun;
        checked(kind, input)?;
        let mut params = QueryParams::new();
        for (idx, run_key) in input.run_keys.iter().enumerate() {
            params.add(format!("{idx}r"), run_key.as_str());
        }
        add_metric_keys(&mut params, &input.metric_keys);
        Ok(self.finish(kind, &params, None))
    }

    fn visualize_analysis(&self, input: &VisualizeAnalysisInput) -> Result<DashboardUrl> {
        let mut params = QueryParams::new();
        params.add("run_key", input.run_key.as_str());
        let fragment = input
            .analysis_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| format!("analysis{key}"));
        Ok(self.finish(ChartKind::VisualizeAnalysis, &params, fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DataFilter;

    #[test]
    fn custom_host_is_used() {
        let config = DashboardConfig::default()
            .with_host("perf.internal/")
            .unwrap();
        let dashboard = StandardDashboard::with_config(config).unwrap();
        let link = dashboard.run_chart(&RunChartInput::new("r1")).unwrap();
        assert_eq!(link.to_string(), "https://perf.internal/run?run_key=r1");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = DashboardConfig {
            scheme: "https".to_string(),
            host: String::new(),
        };
        assert!(StandardDashboard::with_config(config).is_err());

        let config: DashboardConfig =
            serde_json::from_str(r#"{"scheme": "HTTP", "host": "localhost:9000/"}"#).unwrap();
        let dashboard = StandardDashboard::with_config(config).unwrap();
        assert_eq!(dashboard.config().scheme, "http");
        assert_eq!(dashboard.config().host, "localhost:9000");
    }

    #[test]
    fn visualize_analysis_keeps_empty_run_key() {
        let link = StandardDashboard::new()
            .visualize_analysis(&VisualizeAnalysisInput::default())
            .unwrap();
        assert_eq!(link.to_string(), "https://mako.dev/analysis-results?run_key=");
    }

    #[test]
    fn empty_analysis_key_has_no_fragment() {
        let input = VisualizeAnalysisInput::new("r").with_analysis_key("");
        let link = StandardDashboard::new().visualize_analysis(&input).unwrap();
        assert_eq!(link.fragment, None);
    }

    #[test]
    fn link_dispatches_on_request_kind() {
        let dashboard = StandardDashboard::new();
        let request = ChartRequest::from(
            AggregateChartInput::new("b").with_value_selection(DataFilter::BenchmarkScore),
        );
        assert_eq!(
            dashboard.link(&request).unwrap().to_string(),
            "https://mako.dev/benchmark?benchmark-score=1&benchmark_key=b"
        );
    }

    #[test]
    fn series_tags_use_indexed_key() {
        let input = CompareAggregateChartInput::new(vec![
            crate::request::Series::new("a", "1", DataFilter::min("y")),
            crate::request::Series::new("b", "2", DataFilter::max("y"))
                .with_tag("x=1")
                .with_tag("x=2"),
        ]);
        let link = StandardDashboard::new()
            .compare_aggregate_chart(&input)
            .unwrap();
        assert_eq!(
            link.query,
            "0b=1&0n=a&0~y=min&1b=2&1n=b&1t=x%3D1&1t=x%3D2&1~y=max"
        );
    }

    #[test]
    fn unknown_aggregate_filter_kind_is_rejected() {
        let record = DataFilterRecord {
            data_type: "METRIC_AGGREGATE_COUNT".to_string(),
            value_key: Some("y".to_string()),
            ..Default::default()
        };
        let input = AggregateChartInput::new("b").with_value_selection(record);
        let err = StandardDashboard::new().aggregate_chart(&input).unwrap_err();
        assert!(matches!(
            err,
            crate::error::DashboardError::UnrecognizedFilterKind {
                series_index: None,
                ..
            }
        ));
        assert_eq!(err.to_string(), "unknown DataFilter.data_type: 'METRIC_AGGREGATE_COUNT'");
    }
}
