//! Test doubles for the controllers
//!
//! `FakeGateway` is a scripted in-memory job server; `RecordingPresenter`
//! keeps every render so tests can assert on what the operator saw.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobdeck_client::{ClientError, JobGateway, Result};
use jobdeck_core::dto::job::{RunAck, StopAck, VersionInfo};
use jobdeck_core::{JobResult, JobStatus, Schedule, ScheduleId, ScheduleReport};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::presenter::{ControlState, FormView, OutputView, Presenter, ScheduleCard, Toast};

pub struct FakeGateway {
    status: Mutex<JobStatus>,
    /// Popped front to back; the last one sticks
    results: Mutex<VecDeque<JobResult>>,
    /// `None` makes the start request fail in transport
    run_ack: Mutex<Option<bool>>,
    stop_ack: Mutex<StopAck>,
    schedules: Mutex<Vec<Schedule>>,
    next_id: Mutex<u32>,
    /// One-shot validation rejection for the next mutation
    rejection: Mutex<Option<String>>,
    report: Mutex<ScheduleReport>,
    offline: AtomicBool,
    /// Fails only the result endpoint
    results_offline: AtomicBool,
    /// Applies mutations but answers with an unreadable body
    garbled_acks: AtomicBool,
    calls: Mutex<Vec<&'static str>>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            status: Mutex::new(JobStatus::default()),
            results: Mutex::new(VecDeque::new()),
            run_ack: Mutex::new(Some(true)),
            stop_ack: Mutex::new(StopAck {
                stopped: true,
                error: None,
            }),
            schedules: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
            rejection: Mutex::new(None),
            report: Mutex::new(ScheduleReport::default()),
            offline: AtomicBool::new(false),
            results_offline: AtomicBool::new(false),
            garbled_acks: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeGateway {
    pub fn set_status(&self, running: bool, activity: &str) {
        *self.status.lock().unwrap() = JobStatus {
            running,
            activity: activity.to_string(),
        };
    }

    pub fn push_result(&self, result: JobResult) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn set_run_ack(&self, ack: Option<bool>) {
        *self.run_ack.lock().unwrap() = ack;
    }

    pub fn set_stop_refusal(&self, reason: &str) {
        *self.stop_ack.lock().unwrap() = StopAck {
            stopped: false,
            error: Some(reason.to_string()),
        };
    }

    pub fn set_schedules(&self, schedules: Vec<Schedule>) {
        *self.schedules.lock().unwrap() = schedules;
    }

    pub fn reject_with(&self, message: &str) {
        *self.rejection.lock().unwrap() = Some(message.to_string());
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_results_offline(&self, offline: bool) {
        self.results_offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_garbled_acks(&self, garbled: bool) {
        self.garbled_acks.store(garbled, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, call: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(call);

        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::ParseError("connection refused".to_string()));
        }
        Ok(())
    }

    fn acknowledge(&self, schedule: Schedule) -> Result<Schedule> {
        if self.garbled_acks.load(Ordering::SeqCst) {
            return Err(ClientError::ParseError("expected value at line 1".to_string()));
        }
        Ok(schedule)
    }

    fn mutation(&self, call: &'static str) -> Result<()> {
        self.enter(call)?;

        match self.rejection.lock().unwrap().take() {
            Some(message) => Err(ClientError::api_error(400, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl JobGateway for FakeGateway {
    async fn job_status(&self) -> Result<JobStatus> {
        self.enter("job_status")?;
        Ok(self.status.lock().unwrap().clone())
    }

    async fn job_result(&self) -> Result<JobResult> {
        self.enter("job_result")?;
        if self.results_offline.load(Ordering::SeqCst) {
            return Err(ClientError::ParseError("connection reset".to_string()));
        }

        let mut results = self.results.lock().unwrap();
        let result = if results.len() > 1 {
            results.pop_front()
        } else {
            results.front().cloned()
        };
        Ok(result.unwrap_or_default())
    }

    async fn run_job(&self) -> Result<RunAck> {
        self.enter("run_job")?;

        match *self.run_ack.lock().unwrap() {
            Some(true) => {
                self.status.lock().unwrap().running = true;
                Ok(RunAck { running: true })
            }
            Some(false) => Ok(RunAck { running: false }),
            None => Err(ClientError::ParseError("connection reset".to_string())),
        }
    }

    async fn stop_job(&self) -> Result<StopAck> {
        self.enter("stop_job")?;
        Ok(self.stop_ack.lock().unwrap().clone())
    }

    async fn version(&self) -> Result<VersionInfo> {
        self.enter("version")?;
        Ok(VersionInfo {
            version: "1.4.0".to_string(),
        })
    }

    async fn list_schedules(&self) -> Result<Vec<Schedule>> {
        self.enter("list_schedules")?;
        Ok(self.schedules.lock().unwrap().clone())
    }

    async fn create_schedule(&self, time: DateTime<Utc>) -> Result<Schedule> {
        self.mutation("create_schedule")?;

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        let schedule = Schedule {
            id: ScheduleId::new(format!("sched-{}", next_id)),
            time,
            is_running: false,
            is_past: false,
            has_error: false,
        };
        self.schedules.lock().unwrap().push(schedule.clone());
        self.acknowledge(schedule)
    }

    async fn update_schedule(&self, id: &ScheduleId, time: DateTime<Utc>) -> Result<Schedule> {
        self.mutation("update_schedule")?;

        let mut schedules = self.schedules.lock().unwrap();
        let schedule = schedules
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| ClientError::api_error(404, "Schedule not found"))?;
        schedule.time = time;
        self.acknowledge(schedule.clone())
    }

    async fn delete_schedule(&self, id: &ScheduleId) -> Result<()> {
        self.mutation("delete_schedule")?;
        self.schedules.lock().unwrap().retain(|s| &s.id != id);
        Ok(())
    }

    async fn schedule_report(&self, _id: &ScheduleId) -> Result<ScheduleReport> {
        self.enter("schedule_report")?;
        Ok(self.report.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    statuses: Mutex<Vec<String>>,
    controls: Mutex<Vec<ControlState>>,
    outputs: Mutex<Vec<OutputView>>,
    toasts: Mutex<Vec<Toast>>,
    schedules: Mutex<Vec<Vec<ScheduleCard>>>,
    forms: Mutex<Vec<FormView>>,
    panels: Mutex<Vec<bool>>,
    versions: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
}

impl RecordingPresenter {
    pub fn last_status(&self) -> String {
        self.statuses.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn last_controls(&self) -> Option<ControlState> {
        self.controls.lock().unwrap().last().copied()
    }

    pub fn outputs(&self) -> Vec<OutputView> {
        self.outputs.lock().unwrap().clone()
    }

    pub fn last_toast(&self) -> Option<Toast> {
        self.toasts.lock().unwrap().last().cloned()
    }

    pub fn last_schedules(&self) -> Vec<ScheduleCard> {
        self.schedules.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn schedule_renders(&self) -> usize {
        self.schedules.lock().unwrap().len()
    }

    pub fn last_form(&self) -> Option<FormView> {
        self.forms.lock().unwrap().last().cloned()
    }

    pub fn last_panel(&self) -> Option<bool> {
        self.panels.lock().unwrap().last().copied()
    }

    pub fn versions(&self) -> Vec<String> {
        self.versions.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

impl Presenter for RecordingPresenter {
    fn render_status(&self, text: &str) {
        self.statuses.lock().unwrap().push(text.to_string());
    }

    fn render_controls(&self, controls: ControlState) {
        self.controls.lock().unwrap().push(controls);
    }

    fn render_output(&self, view: &OutputView) {
        self.outputs.lock().unwrap().push(view.clone());
    }

    fn output_text(&self) -> String {
        self.outputs
            .lock()
            .unwrap()
            .last()
            .map(|view| view.text.clone())
            .unwrap_or_default()
    }

    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }

    fn render_schedules(&self, cards: &[ScheduleCard]) {
        self.schedules.lock().unwrap().push(cards.to_vec());
    }

    fn render_form(&self, form: &FormView) {
        self.forms.lock().unwrap().push(form.clone());
    }

    fn render_panel(&self, open: bool) {
        self.panels.lock().unwrap().push(open);
    }

    fn render_version(&self, version: &str) {
        self.versions.lock().unwrap().push(version.to_string());
    }

    fn render_notice(&self, text: &str) {
        self.notices.lock().unwrap().push(text.to_string());
    }
}
