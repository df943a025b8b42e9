//! Job control endpoints

use crate::JobDeckClient;
use crate::error::Result;
use jobdeck_core::domain::job::{JobResult, JobStatus};
use jobdeck_core::dto::job::{RunAck, StopAck, VersionInfo};

impl JobDeckClient {
    // =============================================================================
    // Job Polling
    // =============================================================================

    /// Get the live job status
    ///
    /// # Returns
    /// Whether the job is running and what it is currently doing
    pub async fn job_status(&self) -> Result<JobStatus> {
        let response = self.client.get(self.url("/api/jobstatus")).send().await?;

        self.handle_response(response).await
    }

    /// Get the current (or most recently finished) result snapshot
    pub async fn job_result(&self) -> Result<JobResult> {
        let response = self.client.get(self.url("/api/jobresult")).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Job Control
    // =============================================================================

    /// Ask the server to start the job
    ///
    /// # Returns
    /// The acknowledgement; `running == false` means the start was refused
    pub async fn run_job(&self) -> Result<RunAck> {
        let response = self.client.post(self.url("/api/runjob")).send().await?;

        self.handle_response(response).await
    }

    /// Ask the server to cancel the running job
    ///
    /// A refused stop comes back as an error status with a `{stopped, error}`
    /// body; its `error` field becomes the rejection message.
    pub async fn stop_job(&self) -> Result<StopAck> {
        let response = self.client.post(self.url("/api/stopjob")).send().await?;

        self.handle_response(response).await
    }

    /// Get the server build version
    pub async fn version(&self) -> Result<VersionInfo> {
        let response = self.client.get(self.url("/api/version")).send().await?;

        self.handle_response(response).await
    }
}
