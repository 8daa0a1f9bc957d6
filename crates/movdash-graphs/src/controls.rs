//! Filter control option lists and selection defaults.
//!
//! Options are always computed from the full, unfiltered record set. A
//! [`SelectionRequest`] carries whatever the user picked; [`FilterOptions::resolve`]
//! fills the gaps with the control defaults.

use crate::filter::FilterSelection;
use chrono::NaiveDate;
use movdash_common::{MovDashError, RecordSet, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Choices offered by the four filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Distinct month buckets, ascending
    pub months: Vec<String>,
    /// Distinct actions, in source row order
    pub actions: Vec<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

impl FilterOptions {
    pub fn from_records(records: &RecordSet) -> Self {
        // Records are timestamp-ordered, so months come out ascending
        let mut months: Vec<String> = records.iter().map(|r| r.month_bucket.clone()).collect();
        months.dedup();

        Self {
            months,
            actions: records.actions().to_vec(),
            min_date: records.min_timestamp().map(|t| t.date()),
            max_date: records.max_timestamp().map(|t| t.date()),
        }
    }

    /// Control values before any user interaction
    pub fn default_selection(&self) -> FilterSelection {
        self.resolve(&SelectionRequest::default())
    }

    /// Fill unset controls with their defaults: the first month, every
    /// action, and the dataset's first and last dates.
    pub fn resolve(&self, request: &SelectionRequest) -> FilterSelection {
        let month = request
            .month
            .clone()
            .or_else(|| self.months.first().cloned())
            .unwrap_or_default();
        if !month.is_empty() && !self.months.contains(&month) {
            warn!("Month {} has no records", month);
        }

        let actions = match &request.actions {
            Some(actions) => actions.clone(),
            None => self.actions.clone(),
        };
        for action in actions.iter().filter(|a| !self.actions.contains(a)) {
            warn!("Action {:?} does not occur in the data", action);
        }

        let start = request
            .start
            .or(self.min_date)
            .unwrap_or(NaiveDate::MIN);
        let end = request.end.or(self.max_date).unwrap_or(NaiveDate::MAX);

        let selection = FilterSelection::new(month, actions, start, end);
        debug!("Resolved selection: {}", selection.summary());
        selection
    }
}

/// Values picked by the user; `None` means "leave at default"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionRequest {
    pub month: Option<String>,
    /// `Some(vec![])` explicitly selects no action
    pub actions: Option<Vec<String>>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl SelectionRequest {
    /// Read a selection from a YAML file such as:
    ///
    /// ```yaml
    /// month: "2024-03"
    /// actions: [RECEBIMENTO, EXPEDICAO]
    /// start: 2024-03-01
    /// end: 2024-03-31
    /// ```
    ///
    /// An empty file selects every default.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| {
            MovDashError::validation(format!("invalid selection file {}: {e}", path.display()))
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let request: Self = serde_yaml::from_str(content)?;
        if let Some(month) = &request.month {
            movdash_common::utils::parse_month(month)?;
        }
        Ok(request)
    }
}
