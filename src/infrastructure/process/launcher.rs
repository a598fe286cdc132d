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

use crate::infrastructure::process::command::GfshCommand;
use crate::infrastructure::process::runner::CommandRunner;
use crate::shared::error::{ExitCode, Result};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info};

/// Issues control commands, one at a time or as a concurrent batch.
#[derive(Clone)]
pub struct Launcher {
    runner: Arc<dyn CommandRunner>,
}

impl Launcher {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Run a single command to completion.
    pub async fn invoke(&self, command: &GfshCommand) -> Result<ExitCode> {
        info!("Running {}", command);
        let code = self.runner.run(command).await?;
        debug!("{} finished with {}", command.name(), code);
        Ok(code)
    }

    /// Start every command at once and wait until all of them have exited.
    /// Results come back in the order of `commands`.
    pub async fn invoke_all(&self, commands: &[GfshCommand]) -> Vec<Result<ExitCode>> {
        join_all(commands.iter().map(|command| self.invoke(command))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::LaunchEnv;
    use crate::domain::topology::Role;
    use crate::infrastructure::process::command::Action;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Fails the command for `server_2`; tracks how many run at the same time.
    struct SlowRunner {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CommandRunner for SlowRunner {
        async fn run(&self, command: &GfshCommand) -> Result<ExitCode> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(ExitCode(Some(if command.name() == "server_2" { 1 } else { 0 })))
        }
    }

    #[tokio::test]
    async fn test_invoke_all_runs_concurrently_and_keeps_order() {
        let runner = Arc::new(SlowRunner {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let launcher = Launcher::new(runner.clone());
        let env = LaunchEnv {
            gemfire: PathBuf::from("/opt/gemfire"),
            java_home: None,
        };
        let commands: Vec<_> = (1..=3)
            .map(|i| {
                GfshCommand::lifecycle(
                    &env,
                    Action::Start,
                    Role::Server,
                    &format!("server_{}", i),
                    Path::new("/d"),
                )
            })
            .collect();

        let results = launcher.invoke_all(&commands).await;
        let codes: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(
            codes,
            vec![ExitCode(Some(0)), ExitCode(Some(1)), ExitCode(Some(0))]
        );
        assert_eq!(runner.peak.load(Ordering::SeqCst), 3);
    }
}
