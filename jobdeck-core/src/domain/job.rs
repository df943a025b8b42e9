//! Job domain types

use serde::{Deserialize, Serialize};

use crate::de::{non_empty, string_or_null};

/// Live status of the job, read on every status poll
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(default)]
    pub running: bool,
    #[serde(default, deserialize_with = "string_or_null")]
    pub activity: String,
}

/// What triggered a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunType {
    Manual,
    #[serde(alias = "schedule")]
    Scheduled,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Snapshot of the current (or most recently finished) run
///
/// `SchedulerOutput` and `SDVNOutput` belong to an older server schema. They
/// are only read, and only used when `output` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    #[serde(rename = "Running", default)]
    pub running: bool,
    #[serde(default, alias = "Output", deserialize_with = "string_or_null")]
    pub output: String,
    #[serde(rename = "RunType", default)]
    pub run_type: RunType,
    #[serde(rename = "Error", default, deserialize_with = "non_empty")]
    pub error: Option<String>,
    #[serde(
        rename = "SchedulerOutput",
        default,
        deserialize_with = "non_empty",
        skip_serializing
    )]
    pub scheduler_output: Option<String>,
    #[serde(
        rename = "SDVNOutput",
        default,
        deserialize_with = "non_empty",
        skip_serializing
    )]
    pub sdvn_output: Option<String>,
}

impl JobResult {
    /// True when the run reported an error payload
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Text shown in the output view for this result
    pub fn display_text(&self) -> String {
        let mut text = if self.output.is_empty() && self.has_legacy_output() {
            format!(
                "Scheduler:\n{}\n\nSDVN:\n{}\n",
                self.scheduler_output.as_deref().unwrap_or_default(),
                self.sdvn_output.as_deref().unwrap_or_default()
            )
        } else {
            self.output.clone()
        };

        if let Some(error) = &self.error {
            if !text.contains(error.as_str()) {
                text.push_str("\nError: ");
                text.push_str(error);
            }
        }

        text
    }

    fn has_legacy_output(&self) -> bool {
        self.scheduler_output.is_some() || self.sdvn_output.is_some()
    }
}
