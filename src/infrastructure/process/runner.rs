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
use crate::shared::error::{ClusterError, ExitCode, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Executes control commands and reports their exit status.
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &GfshCommand) -> Result<ExitCode>;
}

/// Runs commands as child processes, inheriting stdout and stderr so the
/// engine's own output reaches the user.
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait::async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &GfshCommand) -> Result<ExitCode> {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .envs(command.env().iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            ClusterError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to run {}: {}", command.program().display(), e),
            ))
        })?;

        let status = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait())
                .await
                .map_err(|_| {
                    ClusterError::Timeout(format!(
                        "'{}' did not finish within {:?} - see the logs in {}",
                        command,
                        limit,
                        command.dir().display()
                    ))
                })??,
            None => child.wait().await?,
        };

        Ok(ExitCode(status.code()))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::domain::config::LaunchEnv;
    use crate::domain::topology::Role;
    use crate::infrastructure::process::command::Action;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Install a fake `bin/gfsh` script under a temp engine home.
    fn fake_gfsh(body: &str) -> (tempfile::TempDir, LaunchEnv) {
        let home = tempfile::tempdir().unwrap();
        let bin = home.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let script = bin.join("gfsh");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let env = LaunchEnv {
            gemfire: home.path().to_path_buf(),
            java_home: None,
        };
        (home, env)
    }

    #[tokio::test]
    async fn test_exit_code_is_captured() {
        let (_home, env) = fake_gfsh("exit 3");
        let cmd = GfshCommand::lifecycle(&env, Action::Stop, Role::Server, "s", Path::new("/tmp"));
        let code = SystemRunner::default().run(&cmd).await.unwrap();
        assert_eq!(code, ExitCode(Some(3)));
        assert!(!code.success());
    }

    #[tokio::test]
    async fn test_environment_is_exported() {
        let (_home, env) = fake_gfsh("test -n \"$GEMFIRE\" && test \"$1\" = stop");
        let cmd = GfshCommand::lifecycle(&env, Action::Stop, Role::Server, "s", Path::new("/tmp"));
        let code = SystemRunner::default().run(&cmd).await.unwrap();
        assert!(code.success());
    }

    #[tokio::test]
    async fn test_watchdog_timeout() {
        let (_home, env) = fake_gfsh("sleep 5");
        let cmd = GfshCommand::lifecycle(&env, Action::Stop, Role::Server, "s", Path::new("/tmp"));
        let runner = SystemRunner::new(Some(Duration::from_millis(100)));
        assert!(matches!(runner.run(&cmd).await, Err(ClusterError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let env = LaunchEnv {
            gemfire: "/nonexistent/gemfire".into(),
            java_home: None,
        };
        let cmd = GfshCommand::lifecycle(&env, Action::Stop, Role::Server, "s", Path::new("/tmp"));
        assert!(matches!(
            SystemRunner::default().run(&cmd).await,
            Err(ClusterError::Io(_))
        ));
    }
}
