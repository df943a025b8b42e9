//! Schedule DTOs

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::de::vec_or_null;
use crate::domain::schedule::Schedule;

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// RFC 3339 timestamp in UTC, second precision
    pub time: String,
}

impl ScheduleRequest {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time: time.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Response of the schedule listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleList {
    #[serde(default, deserialize_with = "vec_or_null")]
    pub schedules: Vec<Schedule>,
}

/// Error body returned with a rejected request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
