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

//! Data filters select which scalar of a run is plotted, and map onto a
//! single dashboard query parameter.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};

pub const BENCHMARK_SCORE_KEY: &str = "benchmark-score";
pub const ERROR_COUNT_KEY: &str = "error-count";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DataFilterRecord", into = "DataFilterRecord")]
pub enum DataFilter {
    Min { value_key: String },
    Max { value_key: String },
    Mean { value_key: String },
    Median { value_key: String },
    Stddev { value_key: String },
    /// `percentile_milli_rank` is in thousandths of a percentile.
    Percentile {
        value_key: String,
        percentile_milli_rank: i32,
    },
    CustomAggregate { value_key: String },
    BenchmarkScore,
    ErrorCount,
}

impl DataFilter {
    pub fn min(value_key: impl Into<String>) -> Self {
        DataFilter::Min {
            value_key: value_key.into(),
        }
    }
    pub fn max(value_key: impl Into<String>) -> Self {
        DataFilter::Max {
            value_key: value_key.into(),
        }
    }
    pub fn mean(value_key: impl Into<String>) -> Self {
        DataFilter::Mean {
            value_key: value_key.into(),
        }
    }
    pub fn median(value_key: impl Into<String>) -> Self {
        DataFilter::Median {
            value_key: value_key.into(),
        }
    }
    pub fn stddev(value_key: impl Into<String>) -> Self {
        DataFilter::Stddev {
            value_key: value_key.into(),
        }
    }
    pub fn percentile(value_key: impl Into<String>, percentile_milli_rank: i32) -> Self {
        DataFilter::Percentile {
            value_key: value_key.into(),
            percentile_milli_rank,
        }
    }
    pub fn custom_aggregate(value_key: impl Into<String>) -> Self {
        DataFilter::CustomAggregate {
            value_key: value_key.into(),
        }
    }

    pub fn data_type(&self) -> &'static str {
        match self {
            DataFilter::Min { .. } => "METRIC_AGGREGATE_MIN",
            DataFilter::Max { .. } => "METRIC_AGGREGATE_MAX",
            DataFilter::Mean { .. } => "METRIC_AGGREGATE_MEAN",
            DataFilter::Median { .. } => "METRIC_AGGREGATE_MEDIAN",
            DataFilter::Stddev { .. } => "METRIC_AGGREGATE_STDDEV",
            DataFilter::Percentile { .. } => "METRIC_AGGREGATE_PERCENTILE",
            DataFilter::CustomAggregate { .. } => "CUSTOM_AGGREGATE",
            DataFilter::BenchmarkScore => "BENCHMARK_SCORE",
            DataFilter::ErrorCount => "ERROR_COUNT",
        }
    }

    pub fn value_key(&self) -> Option<&str> {
        match self {
            DataFilter::Min { value_key }
            | DataFilter::Max { value_key }
            | DataFilter::Mean { value_key }
            | DataFilter::Median { value_key }
            | DataFilter::Stddev { value_key }
            | DataFilter::Percentile { value_key, .. }
            | DataFilter::CustomAggregate { value_key } => Some(value_key),
            DataFilter::BenchmarkScore | DataFilter::ErrorCount => None,
        }
    }

    /// Query key and value for this filter. `series_index` is `None` for
    /// single-benchmark charts and the 0-based series position otherwise.
    pub fn to_query_param(&self, series_index: Option<usize>) -> (String, String) {
        let prefix = series_index.map(|idx| idx.to_string()).unwrap_or_default();
        let keyed = |value_key: &str, value: String| (format!("{prefix}~{value_key}"), value);
        match self {
            DataFilter::Min { value_key } => keyed(value_key, "min".to_string()),
            DataFilter::Max { value_key } => keyed(value_key, "max".to_string()),
            DataFilter::Mean { value_key } => keyed(value_key, "mean".to_string()),
            DataFilter::Median { value_key } => keyed(value_key, "median".to_string()),
            DataFilter::Stddev { value_key } => keyed(value_key, "stddev".to_string()),
            DataFilter::Percentile {
                value_key,
                percentile_milli_rank,
            } => keyed(value_key, format!("p{percentile_milli_rank}")),
            DataFilter::CustomAggregate { value_key } => keyed(value_key, "1".to_string()),
            DataFilter::BenchmarkScore => match series_index {
                None => (BENCHMARK_SCORE_KEY.to_string(), "1".to_string()),
                Some(_) => (format!("{prefix}s"), "1".to_string()),
            },
            DataFilter::ErrorCount => match series_index {
                None => (ERROR_COUNT_KEY.to_string(), "1".to_string()),
                Some(_) => (format!("{prefix}e"), "1".to_string()),
            },
        }
    }
}

/// Loosely typed filter as it arrives over the wire: the kind is a free-form
/// name and the payload fields may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFilterRecord {
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile_milli_rank: Option<i32>,
}

impl TryFrom<DataFilterRecord> for DataFilter {
    type Error = DashboardError;
    fn try_from(record: DataFilterRecord) -> Result<Self> {
        // Missing keys read as empty, like an unset proto field.
        let value_key = record.value_key.unwrap_or_default();
        let filter = match record.data_type.as_str() {
            "METRIC_AGGREGATE_MIN" => DataFilter::Min { value_key },
            "METRIC_AGGREGATE_MAX" => DataFilter::Max { value_key },
            "METRIC_AGGREGATE_MEAN" => DataFilter::Mean { value_key },
            "METRIC_AGGREGATE_MEDIAN" => DataFilter::Median { value_key },
            "METRIC_AGGREGATE_STDDEV" => DataFilter::Stddev { value_key },
            "METRIC_AGGREGATE_PERCENTILE" => DataFilter::Percentile {
                value_key,
                percentile_milli_rank: record.percentile_milli_rank.unwrap_or_default(),
            },
            "CUSTOM_AGGREGATE" => DataFilter::CustomAggregate { value_key },
            "BENCHMARK_SCORE" => DataFilter::BenchmarkScore,
            "ERROR_COUNT" => DataFilter::ErrorCount,
            _ => {
                return Err(DashboardError::UnrecognizedFilterKind {
                    data_type: record.data_type.clone(),
                    series_index: None,
                })
            }
        };
        Ok(filter)
    }
}

impl From<DataFilter> for DataFilterRecord {
    fn from(filter: DataFilter) -> Self {
        let data_type = filter.data_type().to_string();
        match filter {
            DataFilter::Percentile {
                value_key,
                percentile_milli_rank,
            } => DataFilterRecord {
                data_type,
                value_key: Some(value_key),
                percentile_milli_rank: Some(percentile_milli_rank),
            },
            DataFilter::Min { value_key }
            | DataFilter::Max { value_key }
            | DataFilter::Mean { value_key }
            | DataFilter::Median { value_key }
            | DataFilter::Stddev { value_key }
            | DataFilter::CustomAggregate { value_key } => DataFilterRecord {
                data_type,
                value_key: Some(value_key),
                percentile_milli_rank: None,
            },
            DataFilter::BenchmarkScore | DataFilter::ErrorCount => DataFilterRecord {
                data_type,
                ..Default::default()
            },
        }
    }
}

/// Maps a wire record straight to its query parameter, failing on kinds the
/// dashboard does not know.
pub fn record_to_query_param(
    record: &DataFilterRecord,
    series_index: Option<usize>,
) -> Result<(String, String)> {
    let filter = DataFilter::try_from(record.clone())
        .map_err(|err| match series_index {
            Some(idx) => err.in_series(idx),
            None => err,
        })?;
    Ok(filter.to_query_param(series_index))
}
