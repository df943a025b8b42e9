//! Terminal presenter
//!
//! Draws the console view on stdout. Logging goes to stderr, so the two do
//! not interleave in redirected output.

use chrono::Local;
use colored::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use super::{
    ControlState, EMPTY_SCHEDULES, FormView, Notifier, OutputView, Presenter, ScheduleCard, Toast,
    ToastKind, ToastPhase, ToastSink,
};
use jobdeck_core::SchedulePhase;

/// Presenter writing to the terminal
pub struct TerminalPresenter {
    notifier: Notifier,
    output: Mutex<String>,
    last_status: Mutex<Option<String>>,
    last_controls: Mutex<Option<ControlState>>,
}

impl TerminalPresenter {
    pub fn new(toast_visible: Duration, toast_exit: Duration) -> Self {
        Self {
            notifier: Notifier::new(Arc::new(TerminalToasts), toast_visible, toast_exit),
            output: Mutex::new(String::new()),
            last_status: Mutex::new(None),
            last_controls: Mutex::new(None),
        }
    }
}

impl Presenter for TerminalPresenter {
    fn render_status(&self, text: &str) {
        // Polled every tick; only draw changes
        let mut last = self.last_status.lock().unwrap();
        if last.as_deref() == Some(text) {
            return;
        }
        *last = Some(text.to_string());

        println!("{}", text.trim_end().cyan());
    }

    fn render_controls(&self, controls: ControlState) {
        let mut last = self.last_controls.lock().unwrap();
        if *last == Some(controls) {
            return;
        }
        *last = Some(controls);

        if controls.busy {
            println!("{}", "⟳ job running · stop available".yellow());
        } else {
            println!("{}", "● ready · run and fetch available".green());
        }
    }

    fn render_output(&self, view: &OutputView) {
        *self.output.lock().unwrap() = view.text.clone();

        if !view.actions_visible {
            debug!("Output view cleared");
            return;
        }

        let header = match view.badge {
            Some(badge) => format!("── Output [{}] ──", badge.label()),
            None => "── Output ──".to_string(),
        };
        println!("{}", header.bold());
        println!("{}", view.text.trim_end());
        println!("{}", "── end of output (copy | save) ──".dimmed());
    }

    fn output_text(&self) -> String {
        self.output.lock().unwrap().clone()
    }

    fn notify(&self, toast: Toast) {
        self.notifier.show(toast);
    }

    fn render_schedules(&self, cards: &[ScheduleCard]) {
        println!("{}", "Scheduled jobs:".bold());

        if cards.is_empty() {
            println!("  {}", EMPTY_SCHEDULES.yellow());
            return;
        }

        for (index, card) in cards.iter().enumerate() {
            let marker = match card.phase {
                SchedulePhase::Running => "running".yellow().to_string(),
                SchedulePhase::Past if card.failed => "(Past Job) ✗".red().to_string(),
                SchedulePhase::Past => "(Past Job) ✓".green().to_string(),
                SchedulePhase::Upcoming => "upcoming".normal().to_string(),
            };

            let actions = match (card.can_edit, card.can_delete) {
                (true, _) => "edit · delete",
                (false, true) => "report · delete",
                (false, false) => "report",
            };

            println!(
                "  {:>2}. {}  {}  {}  {}",
                index + 1,
                card.label.bold(),
                marker,
                card.id.as_str().dimmed(),
                actions.dimmed()
            );
        }
    }

    fn render_form(&self, form: &FormView) {
        if let Some(error) = &form.error {
            println!("{} {}", "Schedule form:".bold(), error.red());
            return;
        }

        match (&form.editing, form.value) {
            (Some(id), Some(time)) if form.cancel_visible() => println!(
                "{} editing {} at {} ({} with `schedule <time>`, or `cancel`)",
                "Schedule form:".bold(),
                id.as_str().cyan(),
                time.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                form.submit_label()
            ),
            _ => debug!("Schedule form reset"),
        }
    }

    fn render_panel(&self, open: bool) {
        debug!("Schedule panel {}", if open { "opened" } else { "closed" });
    }

    fn render_version(&self, version: &str) {
        println!("{} {}", "jobdeck · server".bold(), version.cyan());
    }

    fn render_notice(&self, text: &str) {
        println!("{}", text.trim_end());
    }
}

struct TerminalToasts;

impl ToastSink for TerminalToasts {
    fn show(&self, toast: &Toast, phase: ToastPhase) {
        if phase != ToastPhase::Entering {
            debug!("Notification '{}' {:?}", toast.message, phase);
            return;
        }

        match toast.kind {
            ToastKind::Success => println!("{} {}", "✔".green(), toast.message.green()),
            ToastKind::Error => println!("{} {}", "✘".red(), toast.message.red()),
        }
    }
}
