//! Process runner backed by `tokio::process`

use super::{CommandSpec, ProcessOutput, ProcessRunner};
use crate::error::{SetupError, SetupResult};
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Runs commands on the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).envs(&spec.env);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn exit_code(spec: &CommandSpec, status: ExitStatus) -> SetupResult<i32> {
        status
            .code()
            .ok_or_else(|| SetupError::ProcessSignaled(spec.to_string()))
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn exec(&self, spec: &CommandSpec) -> SetupResult<i32> {
        debug!("Executing: {} (cwd: {:?})", spec, spec.cwd);

        let status = Self::command(spec)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| SetupError::command_failed(spec.to_string(), e))?;

        Self::exit_code(spec, status)
    }

    async fn exec_output(&self, spec: &CommandSpec) -> SetupResult<ProcessOutput> {
        debug!("Executing (captured): {} (cwd: {:?})", spec, spec.cwd);

        let output = Self::command(spec)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| SetupError::command_failed(spec.to_string(), e))?;

        Ok(ProcessOutput {
            code: Self::exit_code(spec, output.status)?,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
