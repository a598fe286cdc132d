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

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClusterError>;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Cluster definition error: {0}")]
    Definition(String),

    #[error("This host ({0}) was not found in the cluster definition")]
    UnknownHost(String),

    #[error("{name} is not defined for host '{host}' or is not a known process type")]
    UnknownProcess { name: String, host: String },

    #[error("Required property '{key}' is not set for process '{process}' on host '{host}'")]
    MissingProperty {
        key: String,
        process: String,
        host: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{name} failed to start ({code}) - see the logs in {}", .dir.display())]
    StartFailure {
        name: String,
        dir: PathBuf,
        code: ExitCode,
    },

    #[error("{name} failed to stop ({code}) - see the logs in {}", .dir.display())]
    StopFailure {
        name: String,
        dir: PathBuf,
        code: ExitCode,
    },

    #[error("{} of the cache server processes failed to start:\n{}", .failures.len(), format_failures(.failures))]
    AggregateBatchFailure { failures: Vec<LaunchFailure> },

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Exit status of an external control command. `None` means the command was
/// terminated by a signal and never produced a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub Option<i32>);

impl ExitCode {
    pub fn success(&self) -> bool {
        self.0 == Some(0)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// One failed member of a concurrent batch start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchFailure {
    pub name: String,
    pub dir: PathBuf,
    /// Exit status or the error that kept the command from completing
    pub reason: String,
}

fn format_failures(failures: &[LaunchFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  - {} ({}) - see the logs in {}", f.name, f.reason, f.dir.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ClusterError {
    pub fn definition(context: impl Into<String>) -> Self {
        Self::Definition(context.into())
    }

    pub fn config_error(context: impl Into<String>) -> Self {
        Self::Config(context.into())
    }

    pub fn unknown_process(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self::UnknownProcess {
            name: name.into(),
            host: host.into(),
        }
    }

    pub fn missing_property(
        key: impl Into<String>,
        process: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self::MissingProperty {
            key: key.into(),
            process: process.into(),
            host: host.into(),
        }
    }

    /// True for errors caused by a malformed or incomplete cluster definition.
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            Self::Definition(_)
                | Self::UnknownHost(_)
                | Self::UnknownProcess { .. }
                | Self::MissingProperty { .. }
                | Self::JsonParse(_)
        )
    }
}
