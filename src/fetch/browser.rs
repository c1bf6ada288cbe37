//! Browser executor - wraps agent-browser CLI
//!
//! Provides the async `PageRenderer` interface on top of agent-browser
//! commands, one named session per executor.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::core::config::BrowserConfig;
use crate::core::{Result, SnipsheetError};
use crate::fetch::renderer::PageRenderer;
use crate::fetch::response::{decode_snippets, inner_html_script, CommandOutput};

/// Executor for browser automation via agent-browser CLI
pub struct AgentBrowser {
    /// Executable name or path
    program: String,
    /// Session name for isolation
    session_name: String,
    /// Whether to run in headed mode
    headed: bool,
}

impl AgentBrowser {
    /// Create a new browser executor
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            program: "agent-browser".to_string(),
            session_name: session_name.into(),
            headed: false,
        }
    }

    /// Create an executor from configuration
    pub fn from_config(config: &BrowserConfig) -> Self {
        Self {
            program: config.program.clone(),
            session_name: config.session_name.clone(),
            headed: config.headed,
        }
    }

    /// Check if agent-browser is installed
    pub async fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run an agent-browser command, returning stdout on success and stderr on failure
    async fn run_command(&self, args: &[&str]) -> Result<std::result::Result<String, String>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["--session", &self.session_name]);

        if self.headed {
            cmd.arg("--headed");
        }

        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // A timed-out wait drops this future; take the child down with it
        cmd.kill_on_drop(true);

        debug!(session = %self.session_name, ?args, "agent-browser");

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SnipsheetError::AgentBrowserNotFound
            } else {
                SnipsheetError::browser(format!("Failed to run agent-browser: {}", e))
            }
        })?;

        if output.status.success() {
            Ok(Ok(String::from_utf8_lossy(&output.stdout).into_owned()))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            Ok(Err(message))
        }
    }

    /// Run a command and treat a failing exit status as a browser error
    async fn run_checked(&self, args: &[&str]) -> Result<String> {
        self.run_command(args).await?.map_err(|stderr| {
            SnipsheetError::browser(format!("agent-browser {} failed: {}", args[0], stderr))
        })
    }
}

#[async_trait]
impl PageRenderer for AgentBrowser {
    async fn open(&self, url: &str) -> Result<()> {
        self.run_command(&["open", url])
            .await?
            .map_err(|stderr| SnipsheetError::navigation(url, stderr))?;
        Ok(())
    }

    async fn wait_for_network_idle(&self) -> Result<()> {
        self.run_checked(&["wait", "--load", "networkidle"]).await?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str) -> Result<()> {
        self.run_command(&["wait", selector])
            .await?
            .map_err(|stderr| SnipsheetError::query(selector, stderr))?;
        Ok(())
    }

    async fn inner_html_all(&self, selector: &str) -> Result<Vec<String>> {
        let script = inner_html_script(selector);
        let stdout = self
            .run_command(&["eval", &script, "--json"])
            .await?
            .map_err(|stderr| SnipsheetError::query(selector, stderr))?;

        let output = CommandOutput::parse(&stdout);
        if output.failed() {
            let message = output
                .error
                .unwrap_or_else(|| "agent-browser reported failure".to_string());
            return Err(SnipsheetError::query(selector, message));
        }

        let value = output
            .result()
            .ok_or_else(|| SnipsheetError::query(selector, "eval returned no data"))?;

        decode_snippets(value).map_err(|e| SnipsheetError::query(selector, e))
    }

    async fn close(&self) -> Result<()> {
        self.run_checked(&["close"]).await?;
        Ok(())
    }
}

impl Default for AgentBrowser {
    fn default() -> Self {
        Self::new("snipsheet")
    }
}
