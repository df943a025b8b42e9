//! jobdeck Core
//!
//! Core types shared by the jobdeck client and console.
//!
//! This crate contains:
//! - Domain types: job status/result snapshots and schedule entries
//! - DTOs: request and acknowledgement bodies exchanged with the job server

pub mod domain;
pub mod dto;

mod de;

pub use domain::job::{JobResult, JobStatus, RunType};
pub use domain::schedule::{Schedule, ScheduleId, SchedulePhase, ScheduleReport, order_schedules};
