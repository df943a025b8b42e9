//! Presentation layer
//!
//! Controllers compute what the operator should see and hand it to a
//! [`Presenter`]. The view types here are pure projections of controller
//! state; a presenter only draws them and keeps no business state.
//!
//! All render targets live behind the single injected presenter instance.

mod notifier;
mod terminal;

pub use notifier::{Notifier, ToastPhase, ToastSink};
pub use terminal::TerminalPresenter;

use chrono::{DateTime, Local, Utc};
use jobdeck_core::{RunType, Schedule, ScheduleId, SchedulePhase};

/// Form error shown when a save fails without a server-supplied reason
pub const DEFAULT_FORM_ERROR: &str = "Failed to save schedule. Please try again.";

/// Text shown in place of an empty schedule list
pub const EMPTY_SCHEDULES: &str = "No scheduled jobs.";

/// Render targets for the console
pub trait Presenter: Send + Sync {
    /// Status line under the run controls
    fn render_status(&self, text: &str);

    /// Run/stop/fetch enablement and busy indicators
    fn render_controls(&self, controls: ControlState);

    /// The single output view
    fn render_output(&self, view: &OutputView);

    /// Text currently in the output view
    fn output_text(&self) -> String;

    /// Transient notification
    fn notify(&self, toast: Toast);

    /// Schedule list, already ordered
    fn render_schedules(&self, cards: &[ScheduleCard]);

    /// Schedule form
    fn render_form(&self, form: &FormView);

    /// Schedule panel visibility
    fn render_panel(&self, open: bool);

    /// Server version label
    fn render_version(&self, version: &str);

    /// Free-form console feedback (help, unknown commands)
    fn render_notice(&self, text: &str);
}

/// Enablement of the job controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub run_enabled: bool,
    pub fetch_enabled: bool,
    pub stop_visible: bool,
    /// Spinner and progress beam
    pub busy: bool,
}

impl ControlState {
    pub fn for_running(running: bool) -> Self {
        Self {
            run_enabled: !running,
            fetch_enabled: !running,
            stop_visible: running,
            busy: running,
        }
    }
}

/// Source badge on the output view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Manual,
    Scheduled,
}

impl Badge {
    pub fn for_run_type(run_type: RunType) -> Option<Self> {
        match run_type {
            RunType::Manual => Some(Badge::Manual),
            RunType::Scheduled => Some(Badge::Scheduled),
            RunType::Unknown => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Manual => "Manual Run",
            Badge::Scheduled => "Scheduled Job",
        }
    }
}

/// Contents of the output view
///
/// Copy/save actions and the badge only show for non-blank text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputView {
    pub text: String,
    pub badge: Option<Badge>,
    pub actions_visible: bool,
}

impl OutputView {
    pub fn new(text: impl Into<String>, run_type: RunType) -> Self {
        let text = text.into();
        let has_content = !text.trim().is_empty();

        Self {
            badge: if has_content {
                Badge::for_run_type(run_type)
            } else {
                None
            },
            actions_visible: has_content,
            text,
        }
    }

    pub fn cleared() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
        }
    }
}

/// One row of the schedule list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCard {
    pub id: ScheduleId,
    pub time: DateTime<Utc>,
    /// Local time, e.g. "2026-10-18 09:30 AM"
    pub label: String,
    pub phase: SchedulePhase,
    /// Past run reported an error
    pub failed: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl From<&Schedule> for ScheduleCard {
    fn from(schedule: &Schedule) -> Self {
        let phase = schedule.phase();

        Self {
            id: schedule.id.clone(),
            time: schedule.time,
            label: schedule
                .time
                .with_timezone(&Local)
                .format("%Y-%m-%d %I:%M %p")
                .to_string(),
            phase,
            failed: phase == SchedulePhase::Past && schedule.has_error,
            can_edit: phase == SchedulePhase::Upcoming,
            can_delete: phase != SchedulePhase::Running,
        }
    }
}

/// State of the single schedule form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormView {
    /// Entry being edited; `None` means the form creates
    pub editing: Option<ScheduleId>,
    /// Last submitted or preloaded time
    pub value: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl FormView {
    pub fn submit_label(&self) -> &'static str {
        if self.editing.is_some() {
            "Update"
        } else {
            "Save"
        }
    }

    pub fn cancel_visible(&self) -> bool {
        self.editing.is_some()
    }
}
