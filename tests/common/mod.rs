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

#![allow(dead_code)]

use gemfire_cluster::{CommandRunner, ExitCode, GfshCommand, LivenessProbe, ProbeTarget, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory stand-in for gfsh and the probe. A process is "running" while its
/// directory is in the running set; start/stop/shutdown commands update it.
pub struct FakeEngine {
    running: Mutex<HashSet<PathBuf>>,
    commands: Mutex<Vec<GfshCommand>>,
    failing: HashSet<String>,
    shutdown_works: bool,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Self::build(&[], true)
    }

    /// Starts of the named processes exit with code 1.
    pub fn failing(names: &[&str]) -> Arc<Self> {
        Self::build(names, true)
    }

    /// `shutdown` exits non-zero and leaves every process running.
    pub fn broken_shutdown() -> Arc<Self> {
        Self::build(&[], false)
    }

    fn build(failing: &[&str], shutdown_works: bool) -> Arc<Self> {
        Arc::new(Self {
            running: Mutex::new(HashSet::new()),
            commands: Mutex::new(Vec::new()),
            failing: failing.iter().map(|s| s.to_string()).collect(),
            shutdown_works,
        })
    }

    pub fn mark_running(&self, dir: &Path) {
        self.running.lock().unwrap().insert(dir.to_path_buf());
    }

    pub fn is_up(&self, dir: &Path) -> bool {
        self.running.lock().unwrap().contains(dir)
    }

    pub fn commands(&self) -> Vec<GfshCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// First two arguments of every command issued, e.g. `start locator`.
    pub fn verbs(&self) -> Vec<String> {
        self.commands()
            .iter()
            .map(|c| c.args().iter().take(2).cloned().collect::<Vec<_>>().join(" "))
            .collect()
    }

    pub fn clear_commands(&self) {
        self.commands.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl CommandRunner for FakeEngine {
    async fn run(&self, command: &GfshCommand) -> Result<ExitCode> {
        self.commands.lock().unwrap().push(command.clone());
        let mut running = self.running.lock().unwrap();
        let dir = command.dir().to_path_buf();

        let code = match command.args().first().map(String::as_str) {
            Some("start") if self.failing.contains(command.name()) => 1,
            Some("start") => {
                running.insert(dir);
                0
            }
            Some("stop") => {
                running.remove(&dir);
                0
            }
            Some("status") => {
                if running.contains(&dir) {
                    0
                } else {
                    1
                }
            }
            Some("-e") if self.shutdown_works => {
                running.retain(|d| !d.starts_with(&dir));
                0
            }
            _ => 1,
        };
        Ok(ExitCode(Some(code)))
    }
}

#[async_trait::async_trait]
impl LivenessProbe for FakeEngine {
    async fn is_running(&self, target: &ProbeTarget) -> bool {
        match target.pid_file.parent() {
            Some(dir) => self.is_up(dir),
            None => false,
        }
    }
}
