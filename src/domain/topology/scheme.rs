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

//! Port and directory allocation for site-numbered clusters.
//!
//! Every site owns the block `[10000 * site, 10000 * site + 9999]`. Inside a
//! block each port kind lives in its own offset band:
//!
//! | kind              | offset                        |
//! |-------------------|-------------------------------|
//! | locator           | `locator - 1`  (0, 1)         |
//! | server            | `100 * node`   (100 ..= 1900) |
//! | JMX manager       | `1099 - (locator - 1)`        |
//! | gateway receivers | `2000 ..= 2999`               |
//! | HTTP service      | `7070 + (locator - 1)`        |
//!
//! The functions are injective for `1 <= site <= 99`, `1 <= node <= 19` and
//! `locator` in `{1, 2}`. Values are `u32` because the arithmetic is defined
//! for every supported site, while a usable TCP port additionally requires
//! `site <= 5` (see [`tcp_port`]).

use crate::domain::topology::Role;
use crate::infrastructure::constants::{
    GATEWAY_RECEIVER_END_OFFSET, GATEWAY_RECEIVER_START_OFFSET, HTTP_SERVICE_OFFSET,
    JMX_MANAGER_OFFSET, SERVER_PORT_STRIDE, SITE_PORT_STRIDE,
};
use crate::shared::error::{ClusterError, Result};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub type Port = u32;

fn site_base(site: u32) -> Port {
    site.saturating_mul(SITE_PORT_STRIDE)
}

pub fn locator_port(site: u32, locator: u32) -> Port {
    site_base(site).saturating_add(locator.saturating_sub(1))
}

pub fn server_port(site: u32, node: u32) -> Port {
    site_base(site).saturating_add(node.saturating_mul(SERVER_PORT_STRIDE))
}

pub fn jmx_manager_port(site: u32, locator: u32) -> Port {
    site_base(site).saturating_add(JMX_MANAGER_OFFSET.saturating_sub(locator.saturating_sub(1)))
}

pub fn http_service_port(site: u32, locator: u32) -> Port {
    site_base(site).saturating_add(HTTP_SERVICE_OFFSET + locator.saturating_sub(1))
}

pub fn gateway_receiver_ports(site: u32) -> RangeInclusive<Port> {
    let base = site_base(site);
    base.saturating_add(GATEWAY_RECEIVER_START_OFFSET)
        ..=base.saturating_add(GATEWAY_RECEIVER_END_OFFSET)
}

/// Narrow a scheme port to a TCP port, rejecting values above 65535.
pub fn tcp_port(port: Port) -> Result<u16> {
    u16::try_from(port).map_err(|_| {
        ClusterError::config_error(format!(
            "port {} is outside the TCP port range; use a lower site number",
            port
        ))
    })
}

/// Locator address in the engine's `host[port]` notation.
pub fn locator_address(host: &str, port: Port) -> String {
    format!("{}[{}]", host, port)
}

pub fn site_dir(cluster_home: &Path, site: u32) -> PathBuf {
    cluster_home.join(site.to_string())
}

/// `<cluster_home>/<site>/<role>_<index>`
pub fn process_dir(cluster_home: &Path, site: u32, role: Role, index: u32) -> PathBuf {
    site_dir(cluster_home, site).join(format!("{}{}", role.dir_prefix(), index))
}

pub fn locator_dir(cluster_home: &Path, site: u32, locator: u32) -> PathBuf {
    process_dir(cluster_home, site, Role::Locator, locator)
}

pub fn server_dir(cluster_home: &Path, site: u32, node: u32) -> PathBuf {
    process_dir(cluster_home, site, Role::Server, node)
}

/// Process name used for a site-managed process, e.g. `server_3`.
pub fn process_name(role: Role, index: u32) -> String {
    format!("{}{}", role.dir_prefix(), index)
}

/// Parse the index back out of a site process directory name.
pub fn parse_process_index(role: Role, dir_name: &str) -> Option<u32> {
    dir_name
        .strip_prefix(role.dir_prefix())
        .and_then(|rest| rest.parse::<u32>().ok())
        .filter(|index| *index > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::constants::{MAX_LOCATORS, MAX_NODE, MAX_SITE};
    use std::collections::HashSet;

    #[test]
    fn test_example_ports() {
        assert_eq!(server_port(7, 2), 70200);
        assert_eq!(server_port(7, 3), 70300);
        assert_eq!(server_port(8, 2), 80200);
        assert_eq!(server_port(8, 3), 80300);
        assert_eq!(locator_port(1, 1), 10000);
        assert_eq!(locator_port(1, 2), 10001);
        assert_eq!(jmx_manager_port(2, 1), 21099);
        assert_eq!(jmx_manager_port(2, 2), 21098);
        assert_eq!(http_service_port(1, 1), 17070);
        assert_eq!(gateway_receiver_ports(1), 12000..=12999);
    }

    #[test]
    fn test_every_port_is_unique_across_sites() {
        let mut seen = HashSet::new();
        for site in 1..=MAX_SITE {
            for locator in 1..=MAX_LOCATORS {
                assert!(seen.insert(locator_port(site, locator)));
                assert!(seen.insert(jmx_manager_port(site, locator)));
                assert!(seen.insert(http_service_port(site, locator)));
            }
            for node in 1..=MAX_NODE {
                assert!(seen.insert(server_port(site, node)));
            }
            for port in gateway_receiver_ports(site) {
                assert!(seen.insert(port), "gateway port {} collides", port);
            }
        }
    }

    #[test]
    fn test_ports_are_stable() {
        assert_eq!(server_port(3, 4), server_port(3, 4));
        assert_eq!(locator_port(5, 2), locator_port(5, 2));
    }

    #[test]
    fn test_tcp_port_range() {
        assert_eq!(tcp_port(57071).unwrap(), 57071);
        assert!(tcp_port(70200).is_err());
        assert!(tcp_port(http_service_port(5, 2)).is_ok());
        assert!(tcp_port(http_service_port(6, 1)).is_err());
    }

    #[test]
    fn test_directories_are_unique() {
        let home = Path::new("/data/clusters");
        let mut seen = HashSet::new();
        for site in 1..=MAX_SITE {
            for locator in 1..=MAX_LOCATORS {
                assert!(seen.insert(locator_dir(home, site, locator)));
            }
            for node in 1..=MAX_NODE {
                assert!(seen.insert(server_dir(home, site, node)));
            }
        }
        assert_eq!(
            server_dir(home, 3, 2),
            PathBuf::from("/data/clusters/3/server_2")
        );
        assert_eq!(
            locator_dir(home, 3, 1),
            PathBuf::from("/data/clusters/3/locator_1")
        );
    }

    #[test]
    fn test_parse_process_index() {
        assert_eq!(parse_process_index(Role::Server, "server_12"), Some(12));
        assert_eq!(parse_process_index(Role::Server, "server_0"), None);
        assert_eq!(parse_process_index(Role::Server, "locator_1"), None);
        assert_eq!(parse_process_index(Role::Locator, "locator_x"), None);
        assert_eq!(process_name(Role::Locator, 2), "locator_2");
    }

    #[test]
    fn test_locator_address() {
        assert_eq!(locator_address("localhost", 20000), "localhost[20000]");
    }
}
