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

use crate::domain::config::LaunchEnv;
use crate::domain::topology::Role;
use crate::infrastructure::process::{Action, GfshCommand, ProbeTarget};
use std::fmt;
use std::path::{Path, PathBuf};

/// Everything needed to probe, start, stop and query one engine process.
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    pub name: String,
    pub role: Role,
    pub dir: PathBuf,
    pub probe: ProbeTarget,
    pub start: GfshCommand,
    pub stop: GfshCommand,
    pub status: GfshCommand,
}

impl ProcessSpec {
    pub fn new(
        env: &LaunchEnv,
        role: Role,
        name: &str,
        dir: &Path,
        bind_address: &str,
        port: u16,
    ) -> Self {
        Self {
            name: name.to_string(),
            role,
            dir: dir.to_path_buf(),
            probe: ProbeTarget {
                bind_address: bind_address.to_string(),
                port,
                pid_file: dir.join(role.pid_file_name()),
            },
            start: GfshCommand::lifecycle(env, Action::Start, role, name, dir),
            stop: GfshCommand::lifecycle(env, Action::Stop, role, name, dir),
            status: GfshCommand::lifecycle(env, Action::Status, role, name, dir),
        }
    }

    /// Add role specific options to the start command.
    pub fn map_start(mut self, f: impl FnOnce(GfshCommand) -> GfshCommand) -> Self {
        self.start = f(self.start);
        self
    }
}

/// Liveness as last observed. `Unknown` until the first probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessState {
    #[default]
    Unknown,
    NotRunning,
    Running,
}

impl ProcessState {
    pub fn from_running(running: bool) -> Self {
        if running {
            ProcessState::Running
        } else {
            ProcessState::NotRunning
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessState::Unknown => "unknown",
            ProcessState::NotRunning => "not running",
            ProcessState::Running => "running",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful result of a lifecycle operation. `AlreadyRunning` and
/// `NotRunning` are no-ops, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Started,
    AlreadyRunning,
    Stopped,
    NotRunning,
}

impl Outcome {
    pub fn describe(&self, name: &str) -> String {
        match self {
            Outcome::Started => format!("{} started", name),
            Outcome::AlreadyRunning => format!("{} is already running", name),
            Outcome::Stopped => format!("{} stopped", name),
            Outcome::NotRunning => format!("{} is not running", name),
        }
    }
}
