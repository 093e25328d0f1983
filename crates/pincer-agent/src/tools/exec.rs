//! Exec tool — run a command in a subprocess with a wall-clock timeout.
//!
//! The child is spawned with `kill_on_drop`, so a timeout tears it down
//! instead of leaving an orphan behind.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::process::Command;
use tracing::info;

use super::base::{optional_str, require_str, Tool};

/// Maximum captured output length before truncation (characters).
const MAX_OUTPUT_LEN: usize = 10_000;

/// Default command timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Execute shell commands in a subprocess.
///
/// Args: `[command, working_dir?]`.
/// Payload: `{stdout, stderr, exit_code}`.
pub struct ExecTool {
    /// Default working directory for commands.
    working_dir: PathBuf,
    /// Wall-clock timeout.
    timeout: Duration,
}

impl ExecTool {
    /// Create a new `ExecTool`.
    pub fn new(working_dir: PathBuf, timeout_secs: Option<u64>) -> Self {
        Self {
            working_dir,
            timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

#[async_trait]
impl Tool for ExecTool {
    fn name(&self) -> &str {
        "exec"
    }

    fn description(&self) -> &str {
        "Execute a shell command and return its stdout, stderr, and exit code."
    }

    async fn execute(&self, args: &[Value]) -> anyhow::Result<Value> {
        let command = require_str(args, 0, "command")?;
        let cwd = optional_str(args, 1)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.working_dir.clone());

        info!(command = %command, cwd = %cwd.display(), "executing shell command");

        let child = Command::new(if cfg!(target_os = "windows") { "cmd" } else { "sh" })
            .args(if cfg!(target_os = "windows") {
                vec!["/C", &command]
            } else {
                vec!["-c", &command]
            })
            .current_dir(&cwd)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| anyhow::anyhow!("failed to spawn command: {e}"))?;

        // On timeout the output future (owning the child) is dropped, which
        // kills the process.
        let result = tokio::time::timeout(self.timeout, child.wait_with_output()).await;

        match result {
            Ok(Ok(output)) => {
                let stdout = truncate(String::from_utf8_lossy(&output.stdout).to_string());
                let stderr = truncate(String::from_utf8_lossy(&output.stderr).to_string());
                let exit_code = output.status.code().unwrap_or(-1);

                Ok(json!({
                    "stdout": stdout,
                    "stderr": stderr,
                    "exit_code": exit_code,
                }))
            }
            Ok(Err(e)) => anyhow::bail!("command failed: {e}"),
            Err(_) => anyhow::bail!(
                "command timed out after {} seconds",
                self.timeout.as_secs()
            ),
        }
    }
}

fn truncate(mut s: String) -> String {
    if s.len() > MAX_OUTPUT_LEN {
        let remaining = s.len() - MAX_OUTPUT_LEN;
        s.truncate(MAX_OUTPUT_LEN);
        s.push_str(&format!("\n... (truncated, {remaining} more chars)"));
    }
    s
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
