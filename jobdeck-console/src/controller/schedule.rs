//! Schedule synchronizer
//!
//! Keeps the rendered schedule list equal to the server's list as of the last
//! successful load. Mutations never touch the cache directly: every confirmed
//! create, update or delete is followed by a full reload, and the list is
//! re-sorted from scratch each time.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use jobdeck_client::{ClientError, JobGateway};
use jobdeck_core::{Schedule, ScheduleId, SchedulePhase, order_schedules};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::presenter::{DEFAULT_FORM_ERROR, FormView, OutputView, Presenter, ScheduleCard, Toast};

pub struct ScheduleSynchronizer {
    gateway: Arc<dyn JobGateway>,
    presenter: Arc<dyn Presenter>,
    /// Ordered list from the last successful load
    entries: Vec<Schedule>,
    form: FormView,
    panel_open: bool,
}

impl ScheduleSynchronizer {
    pub fn new(gateway: Arc<dyn JobGateway>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            gateway,
            presenter,
            entries: Vec::new(),
            form: FormView::default(),
            panel_open: false,
        }
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[Schedule] {
        &self.entries
    }

    /// Entry currently being edited, if any
    pub fn editing(&self) -> Option<&ScheduleId> {
        self.form.editing.as_ref()
    }

    #[cfg(test)]
    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    // =============================================================================
    // Loading
    // =============================================================================

    /// Fetches the full list, replaces the cache and renders it
    ///
    /// On failure the list renders empty and the cache is emptied with it, so
    /// selectors only ever resolve against what is on screen. Nothing is
    /// retried here; the next reload trigger tries again.
    pub async fn load(&mut self) {
        match self.gateway.list_schedules().await {
            Ok(schedules) => {
                self.entries = order_schedules(schedules, Utc::now());
                debug!("Loaded {} schedules", self.entries.len());
                self.render_entries();
            }
            Err(e) => {
                warn!("Failed to load schedules: {}", e);
                self.entries.clear();
                self.render_entries();
            }
        }
    }

    fn render_entries(&self) {
        let cards: Vec<ScheduleCard> = self.entries.iter().map(ScheduleCard::from).collect();
        self.presenter.render_schedules(&cards);
    }

    // =============================================================================
    // Form
    // =============================================================================

    /// Submits the form: updates the entry being edited, or creates one
    pub async fn submit(&mut self, time: DateTime<Utc>) {
        match self.editing().cloned() {
            Some(id) => self.update(&id, time).await,
            None => self.create(time).await,
        }
    }

    pub async fn create(&mut self, time: DateTime<Utc>) {
        self.begin_submission(time);

        match self.gateway.create_schedule(time).await {
            Ok(schedule) => {
                info!("Created schedule {} at {}", schedule.id, schedule.time);
                self.form = FormView::default();
                self.presenter.render_form(&self.form);
                self.load().await;
            }
            Err(e) => self.reject_submission(e).await,
        }
    }

    /// Moves an entry; a rejection keeps edit mode so the input can be fixed
    pub async fn update(&mut self, id: &ScheduleId, time: DateTime<Utc>) {
        self.begin_submission(time);

        match self.gateway.update_schedule(id, time).await {
            Ok(schedule) => {
                info!("Updated schedule {} to {}", schedule.id, schedule.time);
                self.form = FormView::default();
                self.presenter.render_form(&self.form);
                self.load().await;
            }
            Err(e) => self.reject_submission(e).await,
        }
    }

    fn begin_submission(&mut self, time: DateTime<Utc>) {
        self.form.error = None;
        self.form.value = Some(time);
    }

    /// Shows why a submission failed
    ///
    /// Only a server rejection is known to have left the list untouched. Any
    /// other failure may have been applied, so the list is reloaded.
    async fn reject_submission(&mut self, error: ClientError) {
        warn!("Schedule submission failed: {}", error);

        match error.rejection() {
            Some(message) => {
                let message = message.to_string();
                self.reject_input(message);
            }
            None => {
                self.reject_input(DEFAULT_FORM_ERROR);
                self.load().await;
            }
        }
    }

    /// Shows a form error without contacting the server
    pub fn reject_input(&mut self, message: impl Into<String>) {
        self.form.error = Some(message.into());
        self.presenter.render_form(&self.form);
    }

    /// Enters edit mode for `id`, abandoning any other edit
    pub fn start_edit(&mut self, id: &ScheduleId) {
        let Some(entry) = self.entries.iter().find(|s| &s.id == id) else {
            self.reject_input(format!("Schedule {} not found", id));
            return;
        };

        if entry.phase() != SchedulePhase::Upcoming {
            self.reject_input("Only upcoming schedules can be edited");
            return;
        }

        if let Some(previous) = self.form.editing.as_ref().filter(|p| *p != id) {
            debug!("Abandoning edit of {}", previous);
        }

        self.form = FormView {
            editing: Some(id.clone()),
            value: Some(entry.time),
            error: None,
        };
        self.presenter.render_form(&self.form);
    }

    pub fn cancel_edit(&mut self) {
        self.form = FormView::default();
        self.presenter.render_form(&self.form);
    }

    // =============================================================================
    // Entries
    // =============================================================================

    /// Deletes an entry and reloads, whatever the server answered
    pub async fn delete(&mut self, id: &ScheduleId) {
        match self.gateway.delete_schedule(id).await {
            Ok(()) => info!("Deleted schedule {}", id),
            Err(e) => {
                warn!("Failed to delete schedule {}: {}", id, e);
                let reason = e.rejection().unwrap_or("request failed");
                self.presenter
                    .notify(Toast::error(format!("Failed to delete schedule: {}", reason)));
            }
        }

        if self.form.editing.as_ref() == Some(id) {
            self.cancel_edit();
        }

        self.load().await;
    }

    /// Shows the stored output of one entry in the output view
    pub async fn load_report(&mut self, id: &ScheduleId) {
        match self.gateway.schedule_report(id).await {
            Ok(report) => {
                self.presenter
                    .render_output(&OutputView::new(report.display_text(), report.run_type));
                self.close_panel();
            }
            Err(e) => {
                warn!("Failed to load report for {}: {}", id, e);
                self.presenter.notify(Toast::error("Failed to load schedule report"));
            }
        }
    }

    // =============================================================================
    // Panel
    // =============================================================================

    pub async fn open_panel(&mut self) {
        self.load().await;
        self.panel_open = true;
        self.presenter.render_panel(true);
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
        self.presenter.render_panel(false);
    }

    /// Resolves a 1-based list position or an id prefix to an entry id
    pub fn resolve(&self, selector: &str) -> Result<ScheduleId> {
        let selector = selector.trim();
        if selector.is_empty() {
            bail!("No schedule given");
        }

        if let Ok(position) = selector.parse::<usize>() {
            return match position.checked_sub(1).and_then(|i| self.entries.get(i)) {
                Some(entry) => Ok(entry.id.clone()),
                None => bail!(
                    "No schedule at position {} ({} listed)",
                    position,
                    self.entries.len()
                ),
            };
        }

        let mut matches = self
            .entries
            .iter()
            .filter(|s| s.id.as_str().starts_with(selector));

        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry.id.clone()),
            (None, _) => bail!("No schedule matches '{}'", selector),
            (Some(_), Some(_)) => bail!("'{}' matches more than one schedule", selector),
        }
    }
}
