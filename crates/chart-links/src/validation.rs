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

use crate::error::{ChartKind, DashboardError, Result};
use crate::request::{
    AggregateChartInput, ChartRequest, CompareAggregateChartInput, CompareRunChartInput,
    RunChartInput,
};

/// Required-field checks per chart kind. The first violation wins.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

impl Validate for AggregateChartInput {
    fn validate(&self) -> Result<()> {
        if self.benchmark_key.is_empty() {
            return Err(DashboardError::missing(ChartKind::Aggregate, "benchmark_key"));
        }
        Ok(())
    }
}

impl Validate for RunChartInput {
    fn validate(&self) -> Result<()> {
        if self.run_key.is_empty() {
            return Err(DashboardError::missing(ChartKind::Run, "run_key"));
        }
        Ok(())
    }
}

impl Validate for CompareAggregateChartInput {
    fn validate(&self) -> Result<()> {
        let kind = ChartKind::CompareAggregate;
        if self.series_list.is_empty() {
            return Err(DashboardError::empty(kind, "series_list"));
        }
        for (idx, series) in self.series_list.iter().enumerate() {
            if series.series_label.is_empty() {
                return Err(DashboardError::missing_in_series(kind, "series_label", idx));
            }
            if series.benchmark_key.is_empty() {
                return Err(DashboardError::missing_in_series(kind, "benchmark_key", idx));
            }
            if series.value_selection.is_none() {
                return Err(DashboardError::missing_in_series(kind, "value_selection", idx));
            }
        }
        Ok(())
    }
}

impl Validate for CompareRunChartInput {
    fn validate(&self) -> Result<()> {
        if self.run_keys.is_empty() {
            return Err(DashboardError::empty(ChartKind::CompareRun, "run_keys"));
        }
        Ok(())
    }
}

impl Validate for ChartRequest {
    fn validate(&self) -> Result<()> {
        match self {
            ChartRequest::Aggregate(input) => input.validate(),
            ChartRequest::Run(input) => input.validate(),
            ChartRequest::CompareAggregate(input) => input.validate(),
            ChartRequest::CompareRun(input) => input.validate(),
            ChartRequest::VisualizeAnalysis(_) => Ok(()),
        }
    }
}
