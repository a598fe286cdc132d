// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Idempotent start/stop/status for single processes and batches.

use crate::domain::cluster::process::{Outcome, ProcessSpec, ProcessState};
use crate::domain::config::ToolConf;
use crate::infrastructure::process::{
    CommandRunner, GfshCommand, Launcher, LivenessProbe, NetworkProbe, ProbeTarget, SystemRunner,
};
use crate::shared::error::{ClusterError, ExitCode, LaunchFailure, Result};
use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a batch start that had no failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub started: Vec<String>,
    pub already_running: Vec<String>,
}

pub struct Orchestrator {
    launcher: Launcher,
    probe: Arc<dyn LivenessProbe>,
}

impl Orchestrator {
    pub fn new(runner: Arc<dyn CommandRunner>, probe: Arc<dyn LivenessProbe>) -> Self {
        Self {
            launcher: Launcher::new(runner),
            probe,
        }
    }

    pub fn from_conf(conf: &ToolConf) -> Self {
        Self::new(
            Arc::new(SystemRunner::new(conf.command_timeout())),
            Arc::new(NetworkProbe::new(conf.probe_timeout())),
        )
    }

    pub async fn is_running(&self, target: &ProbeTarget) -> bool {
        self.probe.is_running(target).await
    }

    pub async fn status(&self, spec: &ProcessSpec) -> ProcessState {
        ProcessState::from_running(self.is_running(&spec.probe).await)
    }

    pub async fn start(&self, spec: &ProcessSpec) -> Result<Outcome> {
        if self.is_running(&spec.probe).await {
            info!("{} {} is already running", spec.role, spec.name);
            return Ok(Outcome::AlreadyRunning);
        }

        ensure_dir(&spec.dir).await?;

        let code = self.launcher.invoke(&spec.start).await?;
        if !code.success() {
            return Err(ClusterError::StartFailure {
                name: spec.name.clone(),
                dir: spec.dir.clone(),
                code,
            });
        }

        info!("{} {} started", spec.role, spec.name);
        Ok(Outcome::Started)
    }

    pub async fn stop(&self, spec: &ProcessSpec) -> Result<Outcome> {
        if !self.is_running(&spec.probe).await {
            info!("{} {} is not running", spec.role, spec.name);
            return Ok(Outcome::NotRunning);
        }

        let code = self.launcher.invoke(&spec.stop).await?;
        if !code.success() {
            return Err(ClusterError::StopFailure {
                name: spec.name.clone(),
                dir: spec.dir.clone(),
                code,
            });
        }

        info!("{} {} stopped", spec.role, spec.name);
        Ok(Outcome::Stopped)
    }

    /// Ask the engine itself about the process (`gfsh status ...`).
    pub async fn query(&self, spec: &ProcessSpec) -> Result<ExitCode> {
        self.launcher.invoke(&spec.status).await
    }

    /// Run a command whose exit code is only a hint. Failures are logged,
    /// never returned.
    pub async fn invoke_hint(&self, command: &GfshCommand) -> Option<ExitCode> {
        match self.launcher.invoke(command).await {
            Ok(code) => {
                if !code.success() {
                    warn!("'{}' reported {}, continuing", command, code);
                }
                Some(code)
            }
            Err(e) => {
                warn!("'{}' could not be run: {}, continuing", command, e);
                None
            }
        }
    }

    /// Start every process that is not yet running, concurrently, then wait
    /// for all launches. Members that started are left running even when
    /// others fail; every failure is reported together.
    pub async fn start_batch(&self, specs: &[ProcessSpec]) -> Result<BatchReport> {
        let running = join_all(specs.iter().map(|spec| self.is_running(&spec.probe))).await;

        let mut report = BatchReport::default();
        let mut pending = Vec::new();
        for (spec, running) in specs.iter().zip(running) {
            if running {
                info!("{} {} is already running", spec.role, spec.name);
                report.already_running.push(spec.name.clone());
            } else {
                ensure_dir(&spec.dir).await?;
                pending.push(spec);
            }
        }

        let commands: Vec<GfshCommand> = pending.iter().map(|spec| spec.start.clone()).collect();
        let results = self.launcher.invoke_all(&commands).await;

        let mut failures = Vec::new();
        for (spec, result) in pending.into_iter().zip(results) {
            let reason = match result {
                Ok(code) if code.success() => {
                    report.started.push(spec.name.clone());
                    continue;
                }
                Ok(code) => code.to_string(),
                Err(e) => e.to_string(),
            };
            warn!("{} {} failed to start: {}", spec.role, spec.name, reason);
            failures.push(LaunchFailure {
                name: spec.name.clone(),
                dir: spec.dir.clone(),
                reason,
            });
        }

        if !failures.is_empty() {
            return Err(ClusterError::AggregateBatchFailure { failures });
        }
        Ok(report)
    }
}

async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        ClusterError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to create {}: {}", dir.display(), e),
        ))
    })
}
