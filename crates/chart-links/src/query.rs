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

use indexmap::IndexMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// Everything but the unreserved characters is escaped. Space is escaped here
/// too and swapped for `+` afterwards.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, QUERY_COMPONENT)
        .to_string()
        .replace("%20", "+")
}

/// Multi-valued query parameters. Values keep their insertion order within a
/// key; keys are sorted only when rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: IndexMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn add_pair(&mut self, (key, value): (String, String)) -> &mut Self {
        self.add(key, value)
    }

    pub fn add_all<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        for value in values {
            self.add(key, value);
        }
        self
    }

    /// Adds a millisecond timestamp truncated toward zero.
    pub fn add_timestamp(&mut self, key: &str, timestamp_ms: Option<f64>) -> &mut Self {
        if let Some(ts) = timestamp_ms {
            self.add(key, truncate_timestamp(ts).to_string());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn encode(&self) -> String {
        let mut sorted: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, values) in &self.entries {
            sorted
                .entry(encode_component(key))
                .or_default()
                .extend(values.iter().map(|v| encode_component(v)));
        }
        let mut out = String::new();
        for (key, values) in &sorted {
            for value in values {
                if !out.is_empty() {
                    out.push('&');
                }
                out.push_str(key);
                out.push('=');
                out.push_str(value);
            }
        }
        out
    }
}

/// Integer cast semantics: fractions are dropped, non-finite values saturate
/// and NaN becomes zero.
pub fn truncate_timestamp(timestamp_ms: f64) -> i64 {
    timestamp_ms.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_form_style() {
        assert_eq!(encode_component("a=b"), "a%3Db");
        assert_eq!(encode_component("a b"), "a+b");
        assert_eq!(encode_component("~y"), "~y");
        assert_eq!(encode_component("benchmark-score"), "benchmark-score");
        assert_eq!(encode_component("x+y&z"), "x%2By%26z");
        assert_eq!(encode_component("100%"), "100%25");
        assert_eq!(encode_component("é"), "%C3%A9");
    }

    #[test]
    fn values_keep_insertion_order_per_key() {
        let mut params = QueryParams::new();
        params.add("~y", "min").add("b", "1").add("~y", "max").add("a", "2");
        assert_eq!(params.encode(), "a=2&b=1&~y=min&~y=max");
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("~y").unwrap(), ["min", "max"]);
    }

    #[test]
    fn many_series_keys_stay_grouped() {
        let mut params = QueryParams::new();
        for idx in 0..1000 {
            params.add(format!("{idx}n"), "label").add(format!("{idx}t"), "a");
        }
        for idx in 0..1000 {
            params.add(format!("{idx}t"), "b");
        }
        assert_eq!(params.len(), 2000);
        assert_eq!(params.get("999t").unwrap(), ["a", "b"]);
        let rendered = params.encode();
        assert_eq!(rendered.split('&').count(), 3000);
        assert!(rendered.starts_with("0n=label&0t=a&0t=b&100n=label"));
    }

    #[test]
    fn duplicate_pairs_are_kept() {
        let mut params = QueryParams::new();
        params.add_all("tag", ["a", "a"]);
        assert_eq!(params.encode(), "tag=a&tag=a");
    }

    #[test]
    fn keys_sort_by_encoded_bytes() {
        let mut params = QueryParams::new();
        params
            .add("tmin", "1")
            .add("0~y", "mean")
            .add("benchmark_key", "k")
            .add("benchmark-score", "1")
            .add("10b", "x")
            .add("2b", "y");
        assert_eq!(
            params.encode(),
            "0~y=mean&10b=x&2b=y&benchmark-score=1&benchmark_key=k&tmin=1"
        );
    }

    #[test]
    fn empty_params_render_empty() {
        assert_eq!(QueryParams::new().encode(), "");
        assert!(QueryParams::new().is_empty());
    }

    #[test]
    fn timestamps_truncate_toward_zero() {
        assert_eq!(truncate_timestamp(9_999_999_999_999.9), 9_999_999_999_999);
        assert_eq!(truncate_timestamp(5_555_555_555_555.5), 5_555_555_555_555);
        assert_eq!(truncate_timestamp(-1.9), -1);
        assert_eq!(truncate_timestamp(f64::NAN), 0);

        let mut params = QueryParams::new();
        params.add_timestamp("tmin", Some(0.99)).add_timestamp("tmax", None);
        assert_eq!(params.encode(), "tmin=0");
    }

    proptest! {
        #[test]
        fn rendered_keys_are_sorted(pairs in proptest::collection::vec(("[a-z0-9~_ =-]{1,6}", "[a-z0-9 ]{0,4}"), 0..16)) {
            let mut params = QueryParams::new();
            for (k, v) in &pairs {
                params.add(k.as_str(), v.as_str());
            }
            let rendered = params.encode();
            let keys: Vec<&str> = rendered
                .split('&')
                .filter(|s| !s.is_empty())
                .map(|kv| kv.split('=').next().unwrap_or(""))
                .collect();
            let mut sorted = keys.clone();
            sorted.sort();
            prop_assert_eq!(keys.len(), pairs.len());
            prop_assert_eq!(keys, sorted);
            prop_assert_eq!(rendered, params.clone().encode());
        }
    }
}
