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

//! Type definitions for the JSON cluster definition.
//!
//! ```json
//! {
//!   "global-properties": { "gemfire": "/opt/gemfire" },
//!   "hosts": {
//!     "host1": {
//!       "host-properties": { "cluster-home": "/data/cluster" },
//!       "processes": {
//!         "locator1": { "type": "locator", "port": 10334 },
//!         "server1": { "type": "datanode", "server-port": 40404 }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Properties resolve process -> host -> global -> built-in default.

use crate::domain::topology::Role;
use crate::infrastructure::constants::{
    DEFAULT_BIND_ADDRESS, GFSH_OPTION_PREFIX, KEY_BIND_ADDRESS, KEY_SERVER_BIND_ADDRESS,
};
use crate::shared::error::{ClusterError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;

pub type Properties = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessType {
    Locator,
    Datanode,
    #[serde(other)]
    Unknown,
}

impl ProcessType {
    pub fn role(&self) -> Option<Role> {
        match self {
            ProcessType::Locator => Some(Role::Locator),
            ProcessType::Datanode => Some(Role::Server),
            ProcessType::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessDescriptor {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub process_type: ProcessType,
    #[serde(flatten)]
    pub properties: Properties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostDefinition {
    #[serde(default)]
    pub processes: BTreeMap<String, ProcessDescriptor>,
    #[serde(default, rename = "host-properties")]
    pub host_properties: Properties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterDefinition {
    #[serde(default, rename = "global-properties")]
    pub global_properties: Properties,
    pub hosts: BTreeMap<String, HostDefinition>,
}

impl ClusterDefinition {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ClusterError::definition(format!(
                "could not find cluster definition file: {}",
                path.display()
            )));
        }
        let content = read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let mut def: Self = serde_json::from_str(content)?;
        for host in def.hosts.values_mut() {
            for (name, process) in host.processes.iter_mut() {
                process.name = name.clone();
            }
        }
        Ok(def)
    }

    /// View of the definition restricted to one host.
    pub fn for_host<'a>(&'a self, host: &'a str) -> Result<HostView<'a>> {
        let def = self
            .hosts
            .get(host)
            .ok_or_else(|| ClusterError::UnknownHost(host.to_string()))?;
        Ok(HostView {
            host,
            def,
            global: &self.global_properties,
        })
    }
}

/// Built-in values for optional keys.
fn builtin_default(key: &str) -> Option<&'static str> {
    match key {
        KEY_BIND_ADDRESS | KEY_SERVER_BIND_ADDRESS => Some(DEFAULT_BIND_ADDRESS),
        _ => None,
    }
}

fn render_value(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ClusterError::definition(format!(
            "property '{}' must be a string, number or boolean",
            key
        ))),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HostView<'a> {
    host: &'a str,
    def: &'a HostDefinition,
    global: &'a Properties,
}

impl<'a> HostView<'a> {
    pub fn host(&self) -> &str {
        self.host
    }

    pub fn process(&self, name: &str) -> Result<&'a ProcessDescriptor> {
        self.def
            .processes
            .get(name)
            .ok_or_else(|| ClusterError::unknown_process(name, self.host))
    }

    pub fn process_names(&self) -> impl Iterator<Item = &'a str> {
        self.def.processes.keys().map(String::as_str)
    }

    fn is_type(&self, name: &str, process_type: ProcessType) -> bool {
        self.def
            .processes
            .get(name)
            .map(|p| p.process_type == process_type)
            .unwrap_or(false)
    }

    pub fn is_locator(&self, name: &str) -> bool {
        self.is_type(name, ProcessType::Locator)
    }

    pub fn is_datanode(&self, name: &str) -> bool {
        self.is_type(name, ProcessType::Datanode)
    }

    /// Resolve `key` without falling back to built-in defaults.
    pub fn optional_property(&self, name: &str, key: &str) -> Result<Option<String>> {
        let process = self.process(name)?;
        let value = process
            .properties
            .get(key)
            .or_else(|| self.def.host_properties.get(key))
            .or_else(|| self.global.get(key));

        value.map(|v| render_value(key, v)).transpose()
    }

    /// Resolve `key`, failing with `MissingProperty` when no level (including
    /// the built-in defaults) defines it.
    pub fn property(&self, name: &str, key: &str) -> Result<String> {
        if let Some(value) = self.optional_property(name, key)? {
            return Ok(value);
        }
        builtin_default(key)
            .map(str::to_string)
            .ok_or_else(|| ClusterError::missing_property(key, name, self.host))
    }

    pub fn property_as<T: FromStr>(&self, name: &str, key: &str) -> Result<T> {
        let raw = self.property(name, key)?;
        raw.parse::<T>().map_err(|_| {
            ClusterError::definition(format!(
                "property '{}' of process '{}' has invalid value '{}'",
                key, name, raw
            ))
        })
    }

    /// Every `gfsh.<option>` property visible to the process, most specific
    /// level winning, sorted by option name.
    pub fn gfsh_options(&self, name: &str) -> Result<Vec<(String, String)>> {
        let process = self.process(name)?;
        let mut merged: BTreeMap<String, String> = BTreeMap::new();

        for level in [self.global, &self.def.host_properties, &process.properties] {
            for (key, value) in level {
                if let Some(option) = key.strip_prefix(GFSH_OPTION_PREFIX) {
                    if option.is_empty() {
                        continue;
                    }
                    merged.insert(option.to_string(), render_value(key, value)?);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}
