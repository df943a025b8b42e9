//! Console event loop
//!
//! One task multiplexes the status interval, the result-poll deadline and
//! operator commands. Each event is handled to completion before the next is
//! taken, so controller transitions never interleave and the reload after a
//! finished job lands before the next command is read.

use anyhow::{Context, Result};
use jobdeck_client::JobGateway;
use jobdeck_core::ScheduleId;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::command::{ConsoleCommand, PanelAction, help_text, parse_line, parse_time};
use crate::config::Config;
use crate::controller::{Followup, JobLifecycle, OutputActions, ScheduleSynchronizer};
use crate::presenter::{ControlState, OutputView, Presenter, Toast};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console {
    config: Config,
    presenter: Arc<dyn Presenter>,
    lifecycle: JobLifecycle,
    schedules: ScheduleSynchronizer,
    output: OutputActions,
    /// When the next result poll is due; `None` while no run is tracked
    result_due: Option<Instant>,
}

impl Console {
    pub fn new(config: Config, gateway: Arc<dyn JobGateway>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            lifecycle: JobLifecycle::new(gateway.clone(), presenter.clone()),
            schedules: ScheduleSynchronizer::new(gateway, presenter.clone()),
            output: OutputActions::new(&config, presenter.clone()),
            presenter,
            config,
            result_due: None,
        }
    }

    /// Runs until `quit` or end of input
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.startup().await;

        let mut lines = input.lines();
        let mut status_tick = tokio::time::interval(self.config.status_interval);
        status_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // First tick fires immediately: the initial status poll
                _ = status_tick.tick() => self.on_status_tick().await,
                _ = wait_until(self.result_due) => self.on_result_due().await,
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read command")? else {
                        info!("Input closed");
                        break;
                    };

                    if self.handle_line(&line).await == Flow::Quit {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    async fn startup(&mut self) {
        self.lifecycle.load_version().await;
        self.presenter.render_controls(ControlState::for_running(false));
        self.presenter.render_output(&OutputView::cleared());
        self.schedules.load().await;
    }

    pub async fn on_status_tick(&mut self) {
        let followup = self.lifecycle.refresh_status().await;
        self.follow(followup).await;
    }

    pub async fn on_result_due(&mut self) {
        self.result_due = None;
        let followup = self.lifecycle.poll_result().await;
        self.follow(followup).await;
    }

    async fn follow(&mut self, followup: Followup) {
        match followup {
            Followup::Nothing => {}
            Followup::PollResult => {
                debug_assert!(self.lifecycle.is_result_polling());
                self.result_due = Some(Instant::now() + self.config.result_interval);
            }
            Followup::JobFinished => {
                self.result_due = None;
                // A scheduled run may have just completed
                self.schedules.load().await;
            }
        }
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match parse_line(line) {
            Ok(Some(command)) => self.dispatch(command).await,
            Ok(None) => Flow::Continue,
            Err(e) => {
                self.presenter.render_notice(&e.render().to_string());
                Flow::Continue
            }
        }
    }

    pub async fn dispatch(&mut self, command: ConsoleCommand) -> Flow {
        debug!("Command: {:?} (job {:?})", command, self.lifecycle.state());

        match command {
            ConsoleCommand::Run => {
                let followup = self.lifecycle.start().await;
                self.follow(followup).await;
            }
            ConsoleCommand::Stop => self.lifecycle.stop().await,
            ConsoleCommand::Fetch => self.lifecycle.fetch_last_result().await,
            ConsoleCommand::Copy => self.output.copy().await,
            ConsoleCommand::Save => {
                self.output.save().await;
            }
            ConsoleCommand::Panel {
                action: PanelAction::Open,
            } => self.schedules.open_panel().await,
            ConsoleCommand::Panel {
                action: PanelAction::Close,
            } => self.schedules.close_panel(),
            ConsoleCommand::List => self.schedules.load().await,
            ConsoleCommand::Schedule { time } => match parse_time(&time.join(" ")) {
                Ok(time) => self.schedules.submit(time).await,
                Err(e) => self.schedules.reject_input(e.to_string()),
            },
            ConsoleCommand::Edit { selector } => {
                if let Some(id) = self.select(&selector) {
                    self.schedules.start_edit(&id);
                }
            }
            ConsoleCommand::Cancel => self.schedules.cancel_edit(),
            ConsoleCommand::Delete { selector } => {
                if let Some(id) = self.select(&selector) {
                    self.schedules.delete(&id).await;
                }
            }
            ConsoleCommand::Report { selector } => {
                if let Some(id) = self.select(&selector) {
                    self.schedules.load_report(&id).await;
                }
            }
            ConsoleCommand::Help => self.presenter.render_notice(&help_text()),
            ConsoleCommand::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    fn select(&self, selector: &str) -> Option<ScheduleId> {
        match self.schedules.resolve(selector) {
            Ok(id) => Some(id),
            Err(e) => {
                self.presenter.notify(Toast::error(e.to_string()));
                None
            }
        }
    }
}

async fn wait_until(due: Option<Instant>) {
    match due {
        Some(due) => tokio::time::sleep_until(due).await,
        None => std::future::pending().await,
    }
}
