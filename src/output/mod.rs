//! Preview reports
//!
//! A preview simulates callers resolving a parameter plan and records every
//! value handed out. The report is printed as a text table or as JSON.

pub mod json;
pub mod text;

use crate::value::{ArgumentValue, CallerId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One resolved invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewRow {
    pub caller: CallerId,
    pub invocation: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<ArgumentValue>,
    /// Set when resolving the invocation failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a preview run produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewReport {
    pub parameters: Vec<String>,
    pub callers: usize,
    pub invocations: usize,
    pub rows: Vec<PreviewRow>,
}

impl PreviewReport {
    pub fn new(parameters: Vec<String>, callers: usize, invocations: usize) -> Self {
        Self {
            parameters,
            callers,
            invocations,
            rows: Vec::new(),
        }
    }

    /// Sort rows by caller, then invocation
    pub fn sort(&mut self) {
        self.rows.sort_by_key(|row| (row.caller, row.invocation));
    }

    /// Number of rows whose resolution failed
    pub fn errors(&self) -> usize {
        self.rows.iter().filter(|row| row.error.is_some()).count()
    }

    /// Number of distinct values handed out per parameter
    pub fn distinct_values(&self) -> BTreeMap<String, usize> {
        let mut distinct: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        for row in &self.rows {
            for arg in &row.values {
                distinct
                    .entry(arg.name.as_str())
                    .or_default()
                    .insert(arg.value.to_string());
            }
        }
        distinct
            .into_iter()
            .map(|(name, values)| (name.to_string(), values.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(caller: u64, invocation: usize, user: &str) -> PreviewRow {
        PreviewRow {
            caller: CallerId(caller),
            invocation,
            values: vec![ArgumentValue::new("user", user)],
            error: None,
        }
    }

    #[test]
    fn test_sort_and_distinct() {
        let mut report = PreviewReport::new(vec!["user".to_string()], 2, 2);
        report.rows = vec![row(2, 1, "b"), row(1, 0, "a"), row(2, 0, "b"), row(1, 1, "c")];
        report.sort();

        let order: Vec<(u64, usize)> = report.rows.iter().map(|r| (r.caller.0, r.invocation)).collect();
        assert_eq!(order, vec![(1, 0), (1, 1), (2, 0), (2, 1)]);
        assert_eq!(report.distinct_values().get("user"), Some(&3));
        assert_eq!(report.errors(), 0);
    }
}
