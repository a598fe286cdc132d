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

//! Tool configuration for site-numbered clusters.
//!
//! Loaded once from an optional TOML file, then treated as immutable and
//! passed explicitly to every component.

use crate::infrastructure::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_PROBE_TIMEOUT_MS, ENV_CONF_FILE, ENV_GEMFIRE, ENV_JAVA_HOME,
};
use crate::shared::error::{ClusterError, Result};
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConf {
    /// Root under which every site directory is created
    pub cluster_home: String,
    /// Engine install path; falls back to `$GEMFIRE`
    pub gemfire: Option<String>,
    /// Java runtime; falls back to `$JAVA_HOME`
    pub java_home: Option<String>,
    pub bind_address: String,
    pub locator_count: u32,
    pub cache_xml_file: Option<String>,
    pub classpath: Option<String>,
    pub probe_timeout_ms: u64,
    /// Watchdog for a single control command, unbounded when unset
    pub command_timeout_secs: Option<u64>,
    pub wan: WanConf,
}

impl Default for ToolConf {
    fn default() -> Self {
        Self {
            cluster_home: "clusters".to_string(),
            gemfire: None,
            java_home: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            locator_count: 1,
            cache_xml_file: None,
            classpath: None,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            command_timeout_secs: None,
            wan: WanConf::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WanConf {
    pub enabled: bool,
    /// The two sites linked to each other
    pub sites: Vec<u32>,
    /// Host the paired sites' locators run on
    pub host: String,
    /// Explicit links, taking precedence over the derived pair
    pub links: Vec<WanLinkConf>,
}

impl Default for WanConf {
    fn default() -> Self {
        Self {
            enabled: true,
            sites: vec![1, 2],
            host: DEFAULT_BIND_ADDRESS.to_string(),
            links: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WanLinkConf {
    pub site: u32,
    pub remote_locators: String,
    pub remote_distributed_system_id: u32,
}

/// Install paths exported to control commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchEnv {
    pub gemfire: PathBuf,
    pub java_home: Option<PathBuf>,
}

impl ToolConf {
    /// Load configuration from TOML file
    pub fn from<T: AsRef<str>>(path: T) -> Result<Self> {
        let content = read_to_string(path.as_ref()).map_err(|e| {
            ClusterError::config_error(format!(
                "Failed to read config file {}: {}",
                path.as_ref(),
                e
            ))
        })?;

        let conf: Self = toml::from_str(&content)?;
        Ok(conf)
    }

    /// Resolve the configuration: explicit path > `GEMFIRE_CLUSTER_CONF` > defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let conf = match path {
            Some(path) => Self::from(path)?,
            None => match std::env::var(ENV_CONF_FILE) {
                Ok(env_path) => Self::from(&env_path)?,
                Err(_) => Self::default(),
            },
        };
        Ok(conf.with_env_fallbacks())
    }

    /// Fill unset install paths from the invoking environment. Called once
    /// at start-up; nothing reads the environment afterwards.
    pub fn with_env_fallbacks(mut self) -> Self {
        if self.gemfire.is_none() {
            self.gemfire = std::env::var(ENV_GEMFIRE).ok();
        }
        if self.java_home.is_none() {
            self.java_home = std::env::var(ENV_JAVA_HOME).ok();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cluster_home.trim().is_empty() {
            return Err(ClusterError::config_error("cluster_home cannot be empty"));
        }
        if self.locator_count == 0 || self.locator_count > 2 {
            return Err(ClusterError::config_error(format!(
                "locator_count must be 1 or 2, got {}",
                self.locator_count
            )));
        }
        if self.probe_timeout_ms == 0 {
            return Err(ClusterError::config_error("probe_timeout_ms must be > 0"));
        }
        Ok(())
    }

    pub fn cluster_home(&self) -> PathBuf {
        PathBuf::from(&self.cluster_home)
    }

    pub fn launch_env(&self) -> Result<LaunchEnv> {
        let gemfire = self.gemfire.as_ref().ok_or_else(|| {
            ClusterError::config_error(
                "GEMFIRE environment variable or 'gemfire' setting must be configured",
            )
        })?;
        Ok(LaunchEnv {
            gemfire: PathBuf::from(gemfire),
            java_home: self.java_home.as_ref().map(PathBuf::from),
        })
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}
