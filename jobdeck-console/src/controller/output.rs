//! Output actions
//!
//! Copy and save act on whatever text the output view currently shows.

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::Config;
use crate::presenter::{Presenter, Toast};

/// Name of the saved output file for a given day
pub fn output_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.txt", prefix, date.format("%Y-%m-%d"))
}

pub struct OutputActions {
    presenter: Arc<dyn Presenter>,
    output_dir: PathBuf,
    file_prefix: String,
    clipboard_command: Option<Vec<String>>,
}

impl OutputActions {
    pub fn new(config: &Config, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            presenter,
            output_dir: config.output_dir.clone(),
            file_prefix: config.file_prefix.clone(),
            clipboard_command: config.clipboard_command.clone(),
        }
    }

    /// Copies the output view to the system clipboard
    pub async fn copy(&self) {
        let text = self.presenter.output_text();

        match self.pipe_to_clipboard(&text).await {
            Ok(()) => {
                info!("Copied {} bytes of output to clipboard", text.len());
                self.presenter.notify(Toast::success("Copied output to clipboard!"));
            }
            Err(e) => {
                warn!("Clipboard copy failed: {:#}", e);
                self.presenter.notify(Toast::error("Failed to copy output."));
            }
        }
    }

    async fn pipe_to_clipboard(&self, text: &str) -> Result<()> {
        let Some((program, args)) = self
            .clipboard_command
            .as_deref()
            .and_then(|command| command.split_first())
        else {
            bail!("No clipboard command configured");
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", program))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .context("Failed to write to clipboard command")?;
        }

        let status = child.wait().await.context("Clipboard command did not finish")?;
        if !status.success() {
            bail!("{} exited with {}", program, status);
        }

        Ok(())
    }

    /// Saves the output view to a dated text file in the output directory
    pub async fn save(&self) -> Option<PathBuf> {
        let text = self.presenter.output_text();
        let path = self
            .output_dir
            .join(output_file_name(&self.file_prefix, Local::now().date_naive()));

        match write_output(&path, &text).await {
            Ok(()) => {
                info!("Saved output to {}", path.display());
                self.presenter.notify(Toast::success("Saved output to file!"));
                Some(path)
            }
            Err(e) => {
                warn!("Saving output failed: {:#}", e);
                self.presenter.notify(Toast::error("Failed to save output."));
                None
            }
        }
    }
}

async fn write_output(path: &Path, text: &str) -> Result<()> {
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
