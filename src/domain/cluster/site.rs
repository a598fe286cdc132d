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

//! Site-numbered clusters: one or two locators plus N servers per site, with
//! ports and directories derived from the site number.

use crate::domain::cluster::orchestrator::{BatchReport, Orchestrator};
use crate::domain::cluster::process::{Outcome, ProcessSpec, ProcessState};
use crate::domain::config::{LaunchEnv, ToolConf};
use crate::domain::topology::scheme::{self, Port};
use crate::domain::topology::{Role, SiteTopology, WanTopology};
use crate::infrastructure::constants::{
    MAX_LOCATORS, MAX_NODE, PROP_DISTRIBUTED_SYSTEM_ID, PROP_GATEWAY_RECEIVER_END_PORT,
    PROP_GATEWAY_RECEIVER_START_PORT, PROP_HTTP_SERVICE_PORT, PROP_JMX_MANAGER_PORT,
    PROP_REMOTE_DISTRIBUTED_SYSTEM_ID, PROP_REMOTE_LOCATORS,
};
use crate::infrastructure::process::GfshCommand;
use crate::shared::error::{ClusterError, Result};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Builds the process specs of a site from the tool configuration.
#[derive(Debug, Clone)]
pub struct SitePlanner {
    cluster_home: PathBuf,
    env: LaunchEnv,
    bind_address: String,
    locator_count: u32,
    cache_xml_file: Option<String>,
    classpath: Option<String>,
    wan: WanTopology,
}

impl SitePlanner {
    pub fn new(conf: &ToolConf) -> Result<Self> {
        conf.validate()?;
        Ok(Self {
            cluster_home: conf.cluster_home(),
            env: conf.launch_env()?,
            bind_address: conf.bind_address.clone(),
            locator_count: conf.locator_count,
            cache_xml_file: conf.cache_xml_file.clone(),
            classpath: conf.classpath.clone(),
            wan: WanTopology::from_conf(&conf.wan, conf.locator_count)?,
        })
    }

    /// Site shape; `locators` falls back to the configured count.
    pub fn topology(&self, site: u32, nodes: u32, locators: Option<u32>) -> Result<SiteTopology> {
        SiteTopology::new(site, nodes, locators.unwrap_or(self.locator_count))
    }

    pub fn site_dir(&self, site: u32) -> PathBuf {
        scheme::site_dir(&self.cluster_home, site)
    }

    /// Comma separated addresses of every locator of the site.
    fn locator_addresses(&self, topology: &SiteTopology) -> String {
        topology
            .locators()
            .map(|l| scheme::locator_address(&self.bind_address, scheme::locator_port(topology.site, l)))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn with_wan(&self, cmd: GfshCommand, site: u32) -> GfshCommand {
        let cmd = cmd.with_jvm_property(PROP_DISTRIBUTED_SYSTEM_ID, site);
        match self.wan.remote_link_for(site) {
            Some(link) => cmd
                .with_jvm_property(PROP_REMOTE_LOCATORS, link.remote_locators)
                .with_jvm_property(
                    PROP_REMOTE_DISTRIBUTED_SYSTEM_ID,
                    link.remote_distributed_system_id,
                ),
            None => cmd,
        }
    }

    pub fn locator_spec(&self, topology: &SiteTopology, locator: u32) -> Result<ProcessSpec> {
        let site = topology.site;
        let port = scheme::tcp_port(scheme::locator_port(site, locator))?;
        let jmx_port = scheme::tcp_port(scheme::jmx_manager_port(site, locator))?;
        let http_port = scheme::tcp_port(scheme::http_service_port(site, locator))?;
        let name = scheme::process_name(Role::Locator, locator);
        let dir = scheme::locator_dir(&self.cluster_home, site, locator);

        let spec = ProcessSpec::new(&self.env, Role::Locator, &name, &dir, &self.bind_address, port)
            .map_start(|cmd| {
                let cmd = cmd
                    .with_option("port", port)
                    .with_option("bind-address", &self.bind_address)
                    .with_option("mcast-port", 0);
                let cmd = if topology.is_ha() {
                    cmd.with_option("locators", self.locator_addresses(topology))
                } else {
                    cmd
                };
                self.with_wan(cmd, site)
                    .with_jvm_property(PROP_JMX_MANAGER_PORT, jmx_port)
                    .with_jvm_property(PROP_HTTP_SERVICE_PORT, http_port)
            });
        Ok(spec)
    }

    pub fn server_spec(&self, topology: &SiteTopology, node: u32) -> Result<ProcessSpec> {
        let site = topology.site;
        let port = scheme::tcp_port(scheme::server_port(site, node))?;
        let gateways = scheme::gateway_receiver_ports(site);
        let gateway_start = scheme::tcp_port(*gateways.start())?;
        let gateway_end = scheme::tcp_port(*gateways.end())?;
        let name = scheme::process_name(Role::Server, node);
        let dir = scheme::server_dir(&self.cluster_home, site, node);

        let spec = ProcessSpec::new(&self.env, Role::Server, &name, &dir, &self.bind_address, port)
            .map_start(|cmd| {
                let cmd = cmd
                    .with_option("server-port", port)
                    .with_option("server-bind-address", &self.bind_address)
                    .with_option("locators", self.locator_addresses(topology))
                    .with_optional("classpath", self.classpath.as_ref())
                    .with_optional("cache-xml-file", self.cache_xml_file.as_ref())
                    .with_option("mcast-port", 0);
                self.with_wan(cmd, site)
                    .with_jvm_property(PROP_GATEWAY_RECEIVER_START_PORT, gateway_start)
                    .with_jvm_property(PROP_GATEWAY_RECEIVER_END_PORT, gateway_end)
            });
        Ok(spec)
    }

    /// `gfsh -e "connect --locator=..." -e shutdown` through the given locator.
    pub fn shutdown_command(&self, site: u32, locator: u32) -> GfshCommand {
        let address = scheme::locator_address(&self.bind_address, scheme::locator_port(site, locator));
        GfshCommand::shutdown(&self.env, &address, &self.site_dir(site))
    }

    /// Indices of the `<role>_<n>` directories present under the site
    /// directory, sorted. A missing site directory yields none.
    pub async fn discover(&self, site: u32, role: Role) -> Result<Vec<u32>> {
        let site_dir = self.site_dir(site);
        let mut entries = match tokio::fs::read_dir(&site_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let max = match role {
            Role::Locator => MAX_LOCATORS,
            Role::Server => MAX_NODE,
        };
        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(index) = scheme::parse_process_index(role, &file_name.to_string_lossy())
            else {
                continue;
            };
            if index > max {
                warn!(
                    "ignoring {} outside the supported range",
                    entry.path().display()
                );
                continue;
            }
            found.push(index);
        }
        found.sort_unstable();
        debug!("site {}: found {} {} directories", site, found.len(), role);
        Ok(found)
    }

    pub async fn discover_servers(&self, site: u32) -> Result<Vec<u32>> {
        self.discover(site, Role::Server).await
    }

    /// Topology covering the configured locators and any locator directory
    /// already on disk, with no servers.
    async fn existing_topology(&self, site: u32) -> Result<SiteTopology> {
        let on_disk = self.discover(site, Role::Locator).await?;
        let count = on_disk
            .last()
            .copied()
            .unwrap_or(0)
            .max(self.locator_count);
        SiteTopology::new(site, 0, count)
    }
}

/// One row of a site status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberStatus {
    pub name: String,
    pub role: Role,
    pub port: Port,
    pub dir: PathBuf,
    pub state: ProcessState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteStartReport {
    pub locators: Vec<(String, Outcome)>,
    pub servers: BatchReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub stop: Outcome,
    pub removed: Option<PathBuf>,
}

/// Site level lifecycle operations.
pub struct SiteManager {
    planner: SitePlanner,
    orchestrator: Orchestrator,
}

impl SiteManager {
    pub fn new(planner: SitePlanner, orchestrator: Orchestrator) -> Self {
        Self {
            planner,
            orchestrator,
        }
    }

    pub fn from_conf(conf: &ToolConf) -> Result<Self> {
        Ok(Self::new(SitePlanner::new(conf)?, Orchestrator::from_conf(conf)))
    }

    /// Start the locators (primary first, one at a time), then every server
    /// concurrently.
    pub async fn start_cluster(
        &self,
        site: u32,
        nodes: u32,
        locators: Option<u32>,
    ) -> Result<SiteStartReport> {
        let topology = self.planner.topology(site, nodes, locators)?;
        info!(
            "Starting site {} with {} locator(s) and {} server(s)",
            site, topology.locator_count, topology.node_count
        );

        let mut report = SiteStartReport::default();
        for locator in topology.locators() {
            let spec = self.planner.locator_spec(&topology, locator)?;
            let outcome = self.orchestrator.start(&spec).await?;
            report.locators.push((spec.name, outcome));
        }

        let servers = topology
            .nodes()
            .map(|node| self.planner.server_spec(&topology, node))
            .collect::<Result<Vec<_>>>()?;
        report.servers = self.orchestrator.start_batch(&servers).await?;

        Ok(report)
    }

    /// Shut the whole site down through a running locator, then stop whatever
    /// is still up one process at a time. Every stop is attempted; the first
    /// failure is returned afterwards.
    pub async fn stop_cluster(&self, site: u32) -> Result<Outcome> {
        let topology = self.planner.existing_topology(site).await?;
        let locators = topology
            .locators()
            .map(|l| self.planner.locator_spec(&topology, l))
            .collect::<Result<Vec<_>>>()?;

        let mut contact = None;
        for (index, spec) in topology.locators().zip(&locators) {
            if self.orchestrator.is_running(&spec.probe).await {
                contact = Some(index);
                break;
            }
        }
        let Some(contact) = contact else {
            info!("site {} is not running", site);
            return Ok(Outcome::NotRunning);
        };

        info!("Shutting down site {} via locator_{}", site, contact);
        let shutdown = self.planner.shutdown_command(site, contact);
        self.orchestrator.invoke_hint(&shutdown).await;

        let mut first_error: Option<ClusterError> = None;
        for node in self.planner.discover_servers(site).await? {
            let spec = self.planner.server_spec(&topology, node)?;
            if let Err(e) = self.orchestrator.stop(&spec).await {
                warn!("{}", e);
                first_error.get_or_insert(e);
            }
        }
        for spec in locators.iter().rev() {
            if let Err(e) = self.orchestrator.stop(spec).await {
                warn!("{}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(Outcome::Stopped),
        }
    }

    /// Stop only the site's locators, secondary first.
    pub async fn stop_locators(&self, site: u32) -> Result<Outcome> {
        let topology = self.planner.existing_topology(site).await?;
        let mut stopped = false;
        for locator in topology.locators().rev() {
            let spec = self.planner.locator_spec(&topology, locator)?;
            if self.orchestrator.stop(&spec).await? == Outcome::Stopped {
                stopped = true;
            }
        }
        Ok(if stopped {
            Outcome::Stopped
        } else {
            Outcome::NotRunning
        })
    }

    /// Stop the site and delete its directory.
    pub async fn remove_cluster(&self, site: u32) -> Result<Removal> {
        let stop = self.stop_cluster(site).await?;
        let dir = self.planner.site_dir(site);
        let removed = match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {
                info!("removed {}", dir.display());
                Some(dir)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Removal { stop, removed })
    }

    /// Probe every locator and every server directory of the site. Members
    /// whose port cannot be probed are reported as unknown.
    pub async fn cluster_status(&self, site: u32) -> Result<Vec<MemberStatus>> {
        let topology = self.planner.existing_topology(site).await?;
        let mut members = Vec::new();

        for locator in topology.locators() {
            let spec = self.planner.locator_spec(&topology, locator);
            members.push(self.member_status(site, Role::Locator, locator, spec).await);
        }
        for node in self.planner.discover_servers(site).await? {
            let spec = self.planner.server_spec(&topology, node);
            members.push(self.member_status(site, Role::Server, node, spec).await);
        }

        Ok(members)
    }

    async fn member_status(
        &self,
        site: u32,
        role: Role,
        index: u32,
        spec: Result<ProcessSpec>,
    ) -> MemberStatus {
        let port = match role {
            Role::Locator => scheme::locator_port(site, index),
            Role::Server => scheme::server_port(site, index),
        };
        match spec {
            Ok(spec) => {
                let state = self.orchestrator.status(&spec).await;
                MemberStatus {
                    name: spec.name,
                    role,
                    port,
                    dir: spec.dir,
                    state,
                }
            }
            Err(e) => {
                debug!("cannot probe {}: {}", scheme::process_name(role, index), e);
                MemberStatus {
                    name: scheme::process_name(role, index),
                    role,
                    port,
                    dir: scheme::process_dir(&self.planner.cluster_home, site, role, index),
                    state: ProcessState::Unknown,
                }
            }
        }
    }
}
