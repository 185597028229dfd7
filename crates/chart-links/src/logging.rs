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

use crate::error::{ChartKind, DashboardError};
use crate::link::DashboardUrl;
use tracing::{debug, error};

pub fn log_link_generated(kind: ChartKind, link: &DashboardUrl) {
    debug!(
        chart = %kind,
        path = %link.path,
        query_len = link.query.len(),
        has_fragment = link.fragment.is_some(),
        "Dashboard link generated"
    );
}

pub fn log_link_error(kind: ChartKind, err: &DashboardError) {
    error!(
        chart = %kind,
        category = err.category(),
        series_index = ?err.series_index(),
        error = %err,
        "Dashboard link failed"
    );
}
