//! Interface service control through ifup/ifdown

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use tokio::process::Command;
use tokio::time::timeout;

/// Brings an interface down and up again.
///
/// Failures are reported as `false`, never as errors; the caller decides
/// whether a failure warrants a rollback.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceController: Send + Sync {
    async fn stop(&self, interface: &str) -> bool;

    async fn start(&self, interface: &str) -> bool;
}

/// Service controller using the initscripts ifup/ifdown commands
pub struct IfUpDownController {
    /// Path to ifup command
    ifup_path: String,
    /// Path to ifdown command
    ifdown_path: String,
    /// Timeout for a single command
    operation_timeout: Duration,
}

impl IfUpDownController {
    pub fn new() -> Self {
        Self {
            ifup_path: "/sbin/ifup".to_string(),
            ifdown_path: "/sbin/ifdown".to_string(),
            operation_timeout: Duration::from_secs(60),
        }
    }

    /// Create with custom paths and timeout
    pub fn with_config(ifup_path: String, ifdown_path: String, operation_timeout: Duration) -> Self {
        Self {
            ifup_path,
            ifdown_path,
            operation_timeout,
        }
    }

    /// Run a command with timeout and logging; true when it exits with status 0
    async fn execute_command(&self, program: &str, interface: &str, operation: &str) -> bool {
        let mut cmd = Command::new(program);
        cmd.arg(interface)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Executing {}: {:?}", operation, cmd);
        let start_time = std::time::Instant::now();

        match timeout(self.operation_timeout, cmd.output()).await {
            Ok(Ok(output)) => {
                let duration_ms = start_time.elapsed().as_millis();
                if output.status.success() {
                    debug!("{} completed successfully in {}ms", operation, duration_ms);
                    true
                } else {
                    warn!(
                        "{} failed with exit code {:?}: {}",
                        operation,
                        output.status.code(),
                        String::from_utf8_lossy(&output.stderr).trim()
                    );
                    false
                }
            }
            Ok(Err(e)) => {
                error!("{} failed to execute: {}", operation, e);
                false
            }
            Err(_) => {
                error!("{} timed out after {:?}", operation, self.operation_timeout);
                false
            }
        }
    }
}

#[async_trait]
impl ServiceController for IfUpDownController {
    async fn stop(&self, interface: &str) -> bool {
        info!("Bringing down interface {}", interface);
        self.execute_command(
            &self.ifdown_path,
            interface,
            &format!("bring down interface {}", interface),
        )
        .await
    }

    async fn start(&self, interface: &str) -> bool {
        info!("Bringing up interface {}", interface);
        self.execute_command(
            &self.ifup_path,
            interface,
            &format!("bring up interface {}", interface),
        )
        .await
    }
}

impl Default for IfUpDownController {
    fn default() -> Self {
        Self::new()
    }
}
