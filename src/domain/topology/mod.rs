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

//! Site topology: process roles, site shape, port/path scheme and WAN links

pub mod scheme;
pub mod wan;

use crate::infrastructure::constants::{
    LOCATOR_DIR_PREFIX, LOCATOR_PID_FILE, MAX_LOCATORS, MAX_NODE, MAX_SITE, SERVER_DIR_PREFIX,
    SERVER_PID_FILE,
};
use crate::shared::error::{ClusterError, Result};
use std::fmt;

pub use self::wan::{RemoteLink, WanTopology};

/// Kind of engine process managed by this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Locator,
    Server,
}

impl Role {
    /// Name used by `gfsh` for this kind of process
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Locator => "locator",
            Role::Server => "server",
        }
    }

    pub fn pid_file_name(&self) -> &'static str {
        match self {
            Role::Locator => LOCATOR_PID_FILE,
            Role::Server => SERVER_PID_FILE,
        }
    }

    pub fn dir_prefix(&self) -> &'static str {
        match self {
            Role::Locator => LOCATOR_DIR_PREFIX,
            Role::Server => SERVER_DIR_PREFIX,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of one site: its number, server count and locator count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteTopology {
    pub site: u32,
    pub node_count: u32,
    pub locator_count: u32,
}

impl SiteTopology {
    pub fn new(site: u32, node_count: u32, locator_count: u32) -> Result<Self> {
        if site == 0 || site > MAX_SITE {
            return Err(ClusterError::config_error(format!(
                "site number must be between 1 and {}, got {}",
                MAX_SITE, site
            )));
        }
        if node_count > MAX_NODE {
            return Err(ClusterError::config_error(format!(
                "a site supports at most {} servers, got {}",
                MAX_NODE, node_count
            )));
        }
        if locator_count == 0 || locator_count > MAX_LOCATORS {
            return Err(ClusterError::config_error(format!(
                "locator count must be 1 or 2, got {}",
                locator_count
            )));
        }
        Ok(Self {
            site,
            node_count,
            locator_count,
        })
    }

    /// Locator indices in startup order (primary first).
    pub fn locators(&self) -> impl DoubleEndedIterator<Item = u32> {
        1..=self.locator_count
    }

    pub fn nodes(&self) -> impl Iterator<Item = u32> {
        1..=self.node_count
    }

    pub fn is_ha(&self) -> bool {
        self.locator_count == 2
    }
}
