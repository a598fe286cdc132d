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

//! WAN addressing between paired sites.
//!
//! Replication itself is done by the engine's gateways; this only derives the
//! remote locator list and remote distributed-system id a site must be
//! launched with.

use crate::domain::config::WanConf;
use crate::domain::topology::scheme::{locator_address, locator_port};
use crate::shared::error::{ClusterError, Result};
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLink {
    /// Comma separated `host[port]` list of the remote site's locators
    pub remote_locators: String,
    pub remote_distributed_system_id: u32,
}

#[derive(Debug, Clone)]
pub struct WanTopology {
    pair: Option<(u32, u32)>,
    host: String,
    locator_count: u32,
    links: HashMap<u32, RemoteLink>,
}

impl WanTopology {
    /// A topology with no WAN links at all.
    pub fn standalone() -> Self {
        Self {
            pair: None,
            host: String::new(),
            locator_count: 1,
            links: HashMap::new(),
        }
    }

    /// Two sites on `host`, each linked to the other.
    pub fn paired(first: u32, second: u32, host: impl Into<String>, locator_count: u32) -> Self {
        Self {
            pair: Some((first, second)),
            host: host.into(),
            locator_count,
            links: HashMap::new(),
        }
    }

    pub fn from_conf(conf: &WanConf, locator_count: u32) -> Result<Self> {
        if !conf.enabled {
            return Ok(Self::standalone());
        }

        let mut topology = match conf.sites.as_slice() {
            [] => Self::standalone(),
            [first, second] if first != second => {
                Self::paired(*first, *second, conf.host.clone(), locator_count)
            }
            other => {
                return Err(ClusterError::config_error(format!(
                    "wan.sites must name exactly two distinct sites, got {:?}",
                    other
                )))
            }
        };

        for link in &conf.links {
            parse_locator_list(&link.remote_locators)?;
            topology.links.insert(
                link.site,
                RemoteLink {
                    remote_locators: link.remote_locators.clone(),
                    remote_distributed_system_id: link.remote_distributed_system_id,
                },
            );
        }

        Ok(topology)
    }

    /// Remote addressing for `site`, or `None` when the site has no WAN peer.
    pub fn remote_link_for(&self, site: u32) -> Option<RemoteLink> {
        if let Some(link) = self.links.get(&site) {
            return Some(link.clone());
        }

        let (first, second) = self.pair?;
        let remote = if site == first {
            second
        } else if site == second {
            first
        } else {
            return None;
        };

        let remote_locators = (1..=self.locator_count)
            .map(|locator| locator_address(&self.host, locator_port(remote, locator)))
            .collect::<Vec<_>>()
            .join(",");

        Some(RemoteLink {
            remote_locators,
            remote_distributed_system_id: remote,
        })
    }
}

/// Parse a comma separated `host[port]` locator list.
pub fn parse_locator_list(locators: &str) -> Result<Vec<(String, u16)>> {
    let re = Regex::new(r"^([A-Za-z0-9._\-]+)\[(\d{1,5})\]$")
        .map_err(|e| ClusterError::config_error(e.to_string()))?;

    locators
        .split(',')
        .map(str::trim)
        .map(|entry| {
            let caps = re.captures(entry).ok_or_else(|| {
                ClusterError::config_error(format!(
                    "invalid locator address '{}', expected host[port]",
                    entry
                ))
            })?;
            let port = caps[2].parse::<u16>().map_err(|_| {
                ClusterError::config_error(format!("invalid port in locator address '{}'", entry))
            })?;
            Ok((caps[1].to_string(), port))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::WanLinkConf;

    #[test]
    fn test_paired_sites_point_at_each_other() {
        let wan = WanTopology::paired(1, 2, "localhost", 1);

        let link = wan.remote_link_for(1).unwrap();
        assert_eq!(link.remote_locators, "localhost[20000]");
        assert_eq!(link.remote_distributed_system_id, 2);

        let link = wan.remote_link_for(2).unwrap();
        assert_eq!(link.remote_locators, "localhost[10000]");
        assert_eq!(link.remote_distributed_system_id, 1);

        assert!(wan.remote_link_for(3).is_none());
    }

    #[test]
    fn test_ha_pair_lists_both_remote_locators() {
        let wan = WanTopology::paired(1, 2, "gf-host", 2);
        let link = wan.remote_link_for(1).unwrap();
        assert_eq!(link.remote_locators, "gf-host[20000],gf-host[20001]");
    }

    #[test]
    fn test_explicit_link_overrides_pair() {
        let conf = WanConf {
            links: vec![WanLinkConf {
                site: 1,
                remote_locators: "london[20000]".to_string(),
                remote_distributed_system_id: 7,
            }],
            ..WanConf::default()
        };
        let wan = WanTopology::from_conf(&conf, 1).unwrap();
        let link = wan.remote_link_for(1).unwrap();
        assert_eq!(link.remote_locators, "london[20000]");
        assert_eq!(link.remote_distributed_system_id, 7);
        assert_eq!(wan.remote_link_for(2).unwrap().remote_distributed_system_id, 1);
    }

    #[test]
    fn test_disabled_wan_has_no_links() {
        let conf = WanConf {
            enabled: false,
            ..WanConf::default()
        };
        let wan = WanTopology::from_conf(&conf, 1).unwrap();
        assert!(wan.remote_link_for(1).is_none());
    }

    #[test]
    fn test_invalid_conf_is_rejected() {
        let conf = WanConf {
            sites: vec![1, 1],
            ..WanConf::default()
        };
        assert!(WanTopology::from_conf(&conf, 1).is_err());

        let conf = WanConf {
            links: vec![WanLinkConf {
                site: 1,
                remote_locators: "london:20000".to_string(),
                remote_distributed_system_id: 2,
            }],
            ..WanConf::default()
        };
        assert!(WanTopology::from_conf(&conf, 1).is_err());
    }

    #[test]
    fn test_parse_locator_list() {
        let parsed = parse_locator_list("a[10000], b.example.com[10001]").unwrap();
        assert_eq!(
            parsed,
            vec![
                ("a".to_string(), 10000),
                ("b.example.com".to_string(), 10001)
            ]
        );
        assert!(parse_locator_list("a[70000]").is_err());
        assert!(parse_locator_list("").is_err());
    }
}
