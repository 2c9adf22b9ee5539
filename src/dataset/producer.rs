//! External producer that (re)generates the backing store.
//!
//! The producer is an opaque process: it runs to completion within a bounded
//! timeout and, on success, the CSV exists at the configured path.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::config::ProducerConfig;

#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    #[error("producer is disabled")]
    Disabled,
    #[error("failed to start producer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("producer timed out after {0:?}")]
    Timeout(Duration),
    #[error("producer exited with {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },
    #[error("producer succeeded but {0} was not created")]
    Missing(PathBuf),
}

impl ProducerError {
    fn outcome(&self) -> &'static str {
        match self {
            ProducerError::Disabled => "disabled",
            ProducerError::Spawn { .. } => "spawn_error",
            ProducerError::Timeout(_) => "timeout",
            ProducerError::Failed { .. } => "failed",
            ProducerError::Missing(_) => "missing",
        }
    }
}

/// Runs the configured producer command.
#[derive(Debug, Clone)]
pub struct Producer {
    config: ProducerConfig,
}

impl Producer {
    pub fn new(config: ProducerConfig) -> Self {
        Self { config }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Run once and confirm that `target` exists afterwards.
    pub async fn generate(&self, target: &Path) -> Result<(), ProducerError> {
        let result = self.run(target).await;
        let outcome = match &result {
            Ok(()) => "success",
            Err(e) => e.outcome(),
        };
        metrics::counter!("wimbledon_producer_runs_total", "outcome" => outcome).increment(1);
        result
    }

    async fn run(&self, target: &Path) -> Result<(), ProducerError> {
        if !self.config.enabled {
            return Err(ProducerError::Disabled);
        }

        tracing::info!(
            program = %self.config.program,
            args = ?self.config.args,
            target = %target.display(),
            "Backing store missing, running producer"
        );

        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| ProducerError::Spawn {
            program: self.config.program.clone(),
            source,
        })?;

        let timeout = self.timeout();
        // Dropping the future on timeout kills the child.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(ProducerError::Spawn {
                    program: self.config.program.clone(),
                    source,
                })
            }
            Err(_) => {
                tracing::error!(timeout = ?timeout, "Producer timed out");
                return Err(ProducerError::Timeout(timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(code = ?output.status.code(), stderr = %stderr, "Producer failed");
            return Err(ProducerError::Failed {
                code: output.status.code(),
                stderr,
            });
        }

        if !tokio::fs::try_exists(target).await.unwrap_or(false) {
            tracing::error!(target = %target.display(), "Producer exited cleanly without writing the store");
            return Err(ProducerError::Missing(target.to_path_buf()));
        }

        tracing::info!(target = %target.display(), "Backing store created");
        Ok(())
    }
}
