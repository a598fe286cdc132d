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

//! Typed `gfsh` command lines.
//!
//! A [`GfshCommand`] is plain data: program, argument list and the environment
//! to export. Building one never touches the system, so every command line can
//! be asserted on directly in tests.

use crate::domain::config::LaunchEnv;
use crate::domain::topology::Role;
use crate::infrastructure::constants::{ENV_GEMFIRE, ENV_JAVA_HOME, GFSH_RELATIVE_PATH};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Status,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Status => "status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfshCommand {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<(String, String)>,
    name: String,
    dir: PathBuf,
}

impl GfshCommand {
    fn base(env: &LaunchEnv, name: &str, dir: &Path) -> Self {
        let mut vars = vec![(
            ENV_GEMFIRE.to_string(),
            env.gemfire.to_string_lossy().into_owned(),
        )];
        if let Some(ref java_home) = env.java_home {
            vars.push((
                ENV_JAVA_HOME.to_string(),
                java_home.to_string_lossy().into_owned(),
            ));
        }

        Self {
            program: env.gemfire.join(GFSH_RELATIVE_PATH),
            args: Vec::new(),
            env: vars,
            name: name.to_string(),
            dir: dir.to_path_buf(),
        }
    }

    /// `gfsh <action> <role> --dir=<dir>`; start commands also carry `--name`.
    pub fn lifecycle(env: &LaunchEnv, action: Action, role: Role, name: &str, dir: &Path) -> Self {
        let mut cmd = Self::base(env, name, dir);
        cmd.args.push(action.as_str().to_string());
        cmd.args.push(role.as_str().to_string());
        cmd.args.push(format!("--dir={}", dir.display()));
        if action == Action::Start {
            cmd.args.push(format!("--name={}", name));
        }
        cmd
    }

    /// Cluster-wide shutdown issued through a running locator.
    pub fn shutdown(env: &LaunchEnv, locator_address: &str, dir: &Path) -> Self {
        let mut cmd = Self::base(env, "shutdown", dir);
        cmd.args.push("-e".to_string());
        cmd.args.push(format!("connect --locator={}", locator_address));
        cmd.args.push("-e".to_string());
        cmd.args.push("shutdown".to_string());
        cmd
    }

    /// Append `--<key>=<value>`.
    pub fn with_option(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.args.push(format!("--{}={}", key, value));
        self
    }

    pub fn with_optional(self, key: &str, value: Option<impl fmt::Display>) -> Self {
        match value {
            Some(value) => self.with_option(key, value),
            None => self,
        }
    }

    /// Append a JVM system property as `--J=-D<key>=<value>`.
    pub fn with_jvm_property(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.args.push(format!("--J=-D{}={}", key, value));
        self
    }

    pub fn with_options<I, K, V>(self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: fmt::Display,
    {
        options
            .into_iter()
            .fold(self, |cmd, (k, v)| cmd.with_option(k.as_ref(), v))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Process the command acts on, used in logs and failures
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding the engine logs for the process
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

impl fmt::Display for GfshCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
