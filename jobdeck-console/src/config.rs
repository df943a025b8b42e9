//! Console configuration
//!
//! Defines the configurable parameters of the console: where the job server
//! lives, how often it is polled, how long notifications stay up, and where
//! saved output goes.

use std::path::PathBuf;
use std::time::Duration;

/// Clipboard programs tried in order when none is configured
const CLIPBOARD_CANDIDATES: &[&[&str]] = &[
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["pbcopy"],
];

/// Console configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Job server base URL (e.g., "http://localhost:8080")
    pub server_url: String,

    /// How often the live job status is polled, in every state
    pub status_interval: Duration,

    /// How often the result snapshot is polled while a run is tracked
    pub result_interval: Duration,

    /// How long a notification stays fully visible
    pub toast_visible: Duration,

    /// Length of a notification's exit transition
    pub toast_exit: Duration,

    /// Directory receiving saved output files
    pub output_dir: PathBuf,

    /// File name prefix for saved output, followed by `_YYYY-MM-DD.txt`
    pub file_prefix: String,

    /// Program and arguments that receive copied output on stdin
    pub clipboard_command: Option<Vec<String>>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(server_url: String) -> Self {
        Self {
            server_url,
            status_interval: Duration::from_millis(800),
            result_interval: Duration::from_millis(500),
            toast_visible: Duration::from_millis(3200),
            toast_exit: Duration::from_millis(1000),
            output_dir: PathBuf::from("."),
            file_prefix: "JobOutput".to_string(),
            clipboard_command: detect_clipboard(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JOBDECK_SERVER_URL (required)
    /// - JOBDECK_STATUS_INTERVAL_MS (optional, default: 800)
    /// - JOBDECK_RESULT_INTERVAL_MS (optional, default: 500)
    /// - JOBDECK_OUTPUT_DIR (optional, default: .)
    /// - JOBDECK_FILE_PREFIX (optional, default: JobOutput)
    /// - JOBDECK_CLIPBOARD (optional, program and arguments separated by spaces)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(env_var)
    }

    /// Applies the optional environment variables on top of this configuration
    ///
    /// Used when the server URL comes from somewhere other than
    /// JOBDECK_SERVER_URL.
    pub fn apply_env(&mut self) {
        self.apply_vars(env_var);
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let server_url = var("JOBDECK_SERVER_URL")
            .ok_or_else(|| anyhow::anyhow!("JOBDECK_SERVER_URL environment variable not set"))?;

        let mut config = Self::new(server_url);
        config.apply_vars(var);
        Ok(config)
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(interval) = var("JOBDECK_STATUS_INTERVAL_MS").and_then(|v| parse_millis(&v)) {
            self.status_interval = interval;
        }

        if let Some(interval) = var("JOBDECK_RESULT_INTERVAL_MS").and_then(|v| parse_millis(&v)) {
            self.result_interval = interval;
        }

        if let Some(dir) = var("JOBDECK_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }

        if let Some(prefix) = var("JOBDECK_FILE_PREFIX") {
            self.file_prefix = prefix;
        }

        if let Some(command) = var("JOBDECK_CLIPBOARD") {
            self.clipboard_command = parse_command(&command);
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server_url.is_empty() {
            anyhow::bail!("server_url cannot be empty");
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            anyhow::bail!("server_url must start with http:// or https://");
        }

        if self.status_interval.is_zero() {
            anyhow::bail!("status_interval must be greater than 0");
        }

        if self.result_interval.is_zero() {
            anyhow::bail!("result_interval must be greater than 0");
        }

        if self.file_prefix.trim().is_empty() {
            anyhow::bail!("file_prefix cannot be empty");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8080".to_string())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_millis(raw: &str) -> Option<Duration> {
    raw.trim().parse::<u64>().ok().map(Duration::from_millis)
}

fn parse_command(raw: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() { None } else { Some(parts) }
}

/// Picks the first clipboard program found on PATH
fn detect_clipboard() -> Option<Vec<String>> {
    let path = std::env::var_os("PATH")?;
    let dirs: Vec<PathBuf> = std::env::split_paths(&path).collect();

    CLIPBOARD_CANDIDATES
        .iter()
        .find(|candidate| dirs.iter().any(|dir| dir.join(candidate[0]).is_file()))
        .map(|candidate| candidate.iter().map(|s| s.to_string()).collect())
}
