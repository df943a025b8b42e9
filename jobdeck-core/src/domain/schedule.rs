//! Schedule domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::de::string_or_null;
use crate::domain::job::RunType;

/// Opaque identifier assigned to a schedule by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(String);

impl ScheduleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScheduleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ScheduleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A scheduled invocation of the job
///
/// Owned by the server. Moves `upcoming -> running -> past` and never back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: ScheduleId,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub is_past: bool,
    #[serde(default)]
    pub has_error: bool,
}

/// Where a schedule is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulePhase {
    Upcoming,
    Running,
    Past,
}

impl Schedule {
    pub fn phase(&self) -> SchedulePhase {
        if self.is_running {
            SchedulePhase::Running
        } else if self.is_past {
            SchedulePhase::Past
        } else {
            SchedulePhase::Upcoming
        }
    }
}

/// Stored output of a single schedule's run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReport {
    #[serde(default, deserialize_with = "string_or_null")]
    pub output: String,
    #[serde(rename = "RunType", default)]
    pub run_type: RunType,
}

impl ScheduleReport {
    pub const EMPTY_TEXT: &'static str = "(No report available)\n\n";

    pub fn display_text(&self) -> &str {
        if self.output.is_empty() {
            Self::EMPTY_TEXT
        } else {
            &self.output
        }
    }
}

/// Orders a freshly loaded schedule list for display
///
/// Running entries come first, then entries due at or after `now`, then
/// entries before `now`. Each group is ascending by time. The sort is stable,
/// so the result depends only on `schedules` and `now`.
pub fn order_schedules(mut schedules: Vec<Schedule>, now: DateTime<Utc>) -> Vec<Schedule> {
    schedules.sort_by_key(|s| {
        let group = if s.is_running {
            0
        } else if s.time >= now {
            1
        } else {
            2
        };
        (group, s.time)
    });
    schedules
}
