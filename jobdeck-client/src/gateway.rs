//! Gateway trait
//!
//! The seam between controllers and transport. Controllers hold an
//! `Arc<dyn JobGateway>`; production code passes a [`JobDeckClient`], tests
//! pass a scripted implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobdeck_core::domain::job::{JobResult, JobStatus};
use jobdeck_core::domain::schedule::{Schedule, ScheduleId, ScheduleReport};
use jobdeck_core::dto::job::{RunAck, StopAck, VersionInfo};

use crate::JobDeckClient;
use crate::error::Result;

/// Typed operations against the job server
#[async_trait]
pub trait JobGateway: Send + Sync {
    /// Fetches the live job status
    async fn job_status(&self) -> Result<JobStatus>;

    /// Fetches the current result snapshot
    async fn job_result(&self) -> Result<JobResult>;

    /// Requests a job start
    async fn run_job(&self) -> Result<RunAck>;

    /// Requests cancellation of the running job
    async fn stop_job(&self) -> Result<StopAck>;

    /// Fetches the server version
    async fn version(&self) -> Result<VersionInfo>;

    /// Fetches the full schedule list
    async fn list_schedules(&self) -> Result<Vec<Schedule>>;

    /// Creates a schedule
    async fn create_schedule(&self, time: DateTime<Utc>) -> Result<Schedule>;

    /// Moves a schedule to a new time
    async fn update_schedule(&self, id: &ScheduleId, time: DateTime<Utc>) -> Result<Schedule>;

    /// Deletes a schedule
    async fn delete_schedule(&self, id: &ScheduleId) -> Result<()>;

    /// Fetches the stored output of a schedule
    async fn schedule_report(&self, id: &ScheduleId) -> Result<ScheduleReport>;
}

#[async_trait]
impl JobGateway for JobDeckClient {
    async fn job_status(&self) -> Result<JobStatus> {
        JobDeckClient::job_status(self).await
    }

    async fn job_result(&self) -> Result<JobResult> {
        JobDeckClient::job_result(self).await
    }

    async fn run_job(&self) -> Result<RunAck> {
        JobDeckClient::run_job(self).await
    }

    async fn stop_job(&self) -> Result<StopAck> {
        JobDeckClient::stop_job(self).await
    }

    async fn version(&self) -> Result<VersionInfo> {
        JobDeckClient::version(self).await
    }

    async fn list_schedules(&self) -> Result<Vec<Schedule>> {
        JobDeckClient::list_schedules(self).await
    }

    async fn create_schedule(&self, time: DateTime<Utc>) -> Result<Schedule> {
        JobDeckClient::create_schedule(self, time).await
    }

    async fn update_schedule(&self, id: &ScheduleId, time: DateTime<Utc>) -> Result<Schedule> {
        JobDeckClient::update_schedule(self, id, time).await
    }

    async fn delete_schedule(&self, id: &ScheduleId) -> Result<()> {
        JobDeckClient::delete_schedule(self, id).await
    }

    async fn schedule_report(&self, id: &ScheduleId) -> Result<ScheduleReport> {
        JobDeckClient::schedule_report(self, id).await
    }
}
