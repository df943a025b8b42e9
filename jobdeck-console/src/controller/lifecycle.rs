//! Job lifecycle controller
//!
//! Tracks the job through `Idle -> Starting -> Running -> Finishing -> Idle`.
//!
//! Two pollers feed it. The status poll runs on a fixed interval in every
//! state and is the only way a job started elsewhere (e.g. by a schedule) is
//! noticed. The result poll runs only while a run is being tracked and is the
//! only place the terminal render happens. The server is the source of truth
//! for both: nothing here assumes a start or stop took effect until a poll
//! says so.

use jobdeck_client::JobGateway;
use jobdeck_core::{JobResult, JobStatus};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::presenter::{ControlState, OutputView, Presenter, Toast};

/// Where the tracked job is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Starting,
    Running { activity: String },
    Finishing,
}

/// What the caller has to schedule after a controller step
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    Nothing,
    /// Poll the result again after the result interval
    PollResult,
    /// The run ended; reload the schedule list before anything else
    JobFinished,
}

/// Run/poll/stop state machine for the single job
pub struct JobLifecycle {
    gateway: Arc<dyn JobGateway>,
    presenter: Arc<dyn Presenter>,
    state: JobState,
    /// At most one result-polling loop is ever active
    result_polling: bool,
}

impl JobLifecycle {
    pub fn new(gateway: Arc<dyn JobGateway>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            gateway,
            presenter,
            state: JobState::Idle,
            result_polling: false,
        }
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    pub fn is_result_polling(&self) -> bool {
        self.result_polling
    }

    // =============================================================================
    // Polling
    // =============================================================================

    /// Periodic status poll
    ///
    /// Adopts a job it finds running, whoever started it. A transport failure
    /// leaves the state as it was; the next tick retries.
    pub async fn refresh_status(&mut self) -> Followup {
        match self.gateway.job_status().await {
            Ok(status) => self.apply_status(status),
            Err(e) => {
                warn!("Status poll failed: {}", e);
                Followup::Nothing
            }
        }
    }

    fn apply_status(&mut self, status: JobStatus) -> Followup {
        if status.running {
            self.presenter
                .render_status(&format!("Status: Job is running...\n{}", status.activity));
            self.adopt_running(status.activity)
        } else {
            self.presenter
                .render_status(&format!("Status: Ready to run job.\n{}", status.activity));

            if !self.result_polling {
                self.state = JobState::Idle;
                self.presenter.render_controls(ControlState::for_running(false));
                return Followup::Nothing;
            }

            if self.state != JobState::Finishing {
                // The result loop owns the terminal render
                self.state = JobState::Finishing;
                return Followup::Nothing;
            }

            // Second idle sighting and still no result: give up on the render
            self.abandon_result_polling()
        }
    }

    fn abandon_result_polling(&mut self) -> Followup {
        warn!("Job ended but its result could not be fetched");
        self.result_polling = false;
        self.state = JobState::Idle;
        self.presenter.render_controls(ControlState::for_running(false));
        self.presenter
            .notify(Toast::error("Job finished, but its result could not be fetched"));
        Followup::JobFinished
    }

    /// Result poll, one step of the sub-loop
    ///
    /// Reschedules itself while the snapshot reports running. On the first
    /// finished snapshot it renders the outcome exactly once and ends the loop.
    pub async fn poll_result(&mut self) -> Followup {
        if !self.result_polling {
            return Followup::Nothing;
        }

        let result = match self.gateway.job_result().await {
            Ok(result) => result,
            Err(e) => {
                warn!("Result poll failed: {}", e);
                return Followup::PollResult;
            }
        };

        if result.running {
            if !matches!(self.state, JobState::Running { .. }) {
                self.state = JobState::Running {
                    activity: String::new(),
                };
            }
            return Followup::PollResult;
        }

        self.state = JobState::Finishing;
        self.render_finished(&result);
        self.state = JobState::Idle;
        self.result_polling = false;

        info!(
            "Job finished with status: {}",
            if result.is_failure() { "failure" } else { "success" }
        );

        Followup::JobFinished
    }

    fn render_finished(&self, result: &JobResult) {
        self.presenter.render_status("Status: Job finished.");
        self.presenter
            .render_output(&OutputView::new(result.display_text(), result.run_type));
        self.presenter.render_controls(ControlState::for_running(false));

        if result.is_failure() {
            self.presenter.notify(Toast::error("Job finished with ERROR!"));
        } else {
            self.presenter.notify(Toast::success("Job completed successfully."));
        }
    }

    fn adopt_running(&mut self, activity: String) -> Followup {
        self.presenter.render_controls(ControlState::for_running(true));
        self.state = JobState::Running { activity };
        self.begin_result_polling()
    }

    fn begin_result_polling(&mut self) -> Followup {
        if self.result_polling {
            return Followup::Nothing;
        }

        debug!("Result polling started");
        self.result_polling = true;
        Followup::PollResult
    }

    // =============================================================================
    // Commands
    // =============================================================================

    /// Start the job
    ///
    /// Re-reads the status first. If the job is already running (here or
    /// elsewhere) no start is sent and the running job is adopted instead.
    pub async fn start(&mut self) -> Followup {
        if self.state != JobState::Idle {
            debug!("Start ignored in state {:?}, refreshing status", self.state);
            return self.refresh_status().await;
        }

        let status = match self.gateway.job_status().await {
            Ok(status) => status,
            Err(e) => {
                warn!("Status check before start failed: {}", e);
                self.fail_start();
                return Followup::Nothing;
            }
        };

        if status.running {
            info!("Job already running, not starting another");
            self.presenter.render_status(&format!(
                "Status: Job is already running!\n{}",
                status.activity
            ));
            return self.adopt_running(status.activity);
        }

        self.state = JobState::Starting;
        self.presenter.render_status("Status: Starting job...");
        self.presenter.render_output(&OutputView::cleared());
        self.presenter.render_controls(ControlState::for_running(true));

        match self.gateway.run_job().await {
            Ok(ack) if ack.running => {
                info!("Job started");
                self.state = JobState::Running {
                    activity: String::new(),
                };
                self.presenter.notify(Toast::success("Job Started!"));
                self.begin_result_polling()
            }
            Ok(_) => {
                warn!("Server refused to start the job");
                self.fail_start();
                Followup::Nothing
            }
            Err(e) => {
                warn!("Start request failed: {}", e);
                self.fail_start();
                Followup::Nothing
            }
        }
    }

    fn fail_start(&mut self) {
        self.state = JobState::Idle;
        self.presenter.render_controls(ControlState::for_running(false));
        self.presenter.notify(Toast::error("Job Failed to start"));
    }

    /// Ask the server to cancel the run
    ///
    /// Advisory only: the state stays put until a poll reports the job ended.
    pub async fn stop(&mut self) {
        if self.state == JobState::Idle {
            self.presenter.notify(Toast::error("No job is running"));
            return;
        }

        match self.gateway.stop_job().await {
            Ok(ack) if ack.stopped => {
                info!("Stop requested");
                self.presenter.notify(Toast::success("Job stopped by user"));
            }
            Ok(ack) => {
                let reason = ack.error.unwrap_or_else(|| "?".to_string());
                warn!("Server refused to stop the job: {}", reason);
                self.presenter
                    .notify(Toast::error(format!("Failed to stop job: {}", reason)));
            }
            Err(e) => {
                warn!("Stop request failed: {}", e);
                let reason = e.rejection().map(str::to_string).unwrap_or_else(|| e.to_string());
                self.presenter
                    .notify(Toast::error(format!("Failed to stop job: {}", reason)));
            }
        }
    }

    /// Show the last result without tracking a run
    pub async fn fetch_last_result(&self) {
        if self.state != JobState::Idle {
            self.presenter
                .notify(Toast::error("Results are available once the job finishes"));
            return;
        }

        match self.gateway.job_result().await {
            Ok(result) => {
                self.presenter
                    .render_output(&OutputView::new(result.display_text(), result.run_type));
                self.presenter.notify(Toast::success("Fetched Previous Results!"));
            }
            Err(e) => {
                warn!("Failed to fetch last result: {}", e);
                self.presenter
                    .notify(Toast::error("Failed to Fetch Previous Results"));
            }
        }
    }

    /// Show the server version
    pub async fn load_version(&self) {
        match self.gateway.version().await {
            Ok(info) => self.presenter.render_version(&format!("v{}", info.version)),
            Err(e) => {
                warn!("Failed to load server version: {}", e);
                self.presenter.render_version("v?");
            }
        }
    }
}
