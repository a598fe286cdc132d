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

//! `-D key=value` overrides applied on top of the loaded [`ToolConf`].

use crate::domain::config::ToolConf;
use crate::shared::error::{ClusterError, Result};
use std::collections::HashMap;
use std::str::FromStr;

/// Parse dynamic configuration properties from -D key=value format
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for config in configs {
        let parts: Vec<&str> = config.splitn(2, '=').collect();
        if parts.len() != 2 {
            return Err(ClusterError::config_error(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            )));
        }

        let key = parts[0].trim();
        let value = parts[1].trim();

        if key.is_empty() {
            return Err(ClusterError::config_error(format!(
                "Empty key in config: '{}'",
                config
            )));
        }

        map.insert(key.to_string(), value.to_string());
    }

    Ok(map)
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        ClusterError::config_error(format!("Invalid value '{}' for {}", value, key))
    })
}

pub fn apply_to_tool_conf(configs: &HashMap<String, String>, conf: &mut ToolConf) -> Result<()> {
    for (key, value) in configs {
        match key.as_str() {
            "cluster.home" => conf.cluster_home = value.clone(),
            "gemfire.home" => conf.gemfire = Some(value.clone()),
            "java.home" => conf.java_home = Some(value.clone()),
            "bind-address" => conf.bind_address = value.clone(),
            "locator.count" => conf.locator_count = parse_value(key, value)?,
            "server.cache-xml-file" => conf.cache_xml_file = Some(value.clone()),
            "server.classpath" => conf.classpath = Some(value.clone()),
            "probe.timeout-ms" => conf.probe_timeout_ms = parse_value(key, value)?,
            "command.timeout-secs" => conf.command_timeout_secs = Some(parse_value(key, value)?),
            "wan.enabled" => conf.wan.enabled = parse_value(key, value)?,
            "wan.host" => conf.wan.host = value.clone(),
            "wan.sites" => {
                conf.wan.sites = value
                    .split(',')
                    .map(|s| parse_value::<u32>(key, s.trim()))
                    .collect::<Result<Vec<_>>>()?;
            }
            _ => tracing::warn!("Ignoring unknown configuration property '{}'", key),
        }
    }

    conf.validate()
}
