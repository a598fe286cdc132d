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

//! Cluster lifecycle commands

use super::commands::{CliArgs, GlobalArgs};
use super::display::TableRenderer;
use crate::domain::cluster::{
    DefinitionValidator, HostPlanner, Orchestrator, Outcome, SiteManager,
};
use crate::domain::config::{apply_to_tool_conf, parse_dynamic_configs, ToolConf};
use crate::domain::definition::ClusterDefinition;
use crate::infrastructure::host::local_hostname;
use anyhow::Context;
use clap::{Args, CommandFactory, Parser, ValueEnum};
use tracing::{debug, warn};

impl GlobalArgs {
    /// Load the tool configuration and apply `-D` overrides on top of it.
    pub fn tool_conf(&self) -> anyhow::Result<ToolConf> {
        let mut conf = ToolConf::load(self.config.as_deref())
            .context("Failed to load the tool configuration")?;

        if !self.properties.is_empty() {
            let configs = parse_dynamic_configs(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
            apply_to_tool_conf(&configs, &mut conf)?;
        }

        conf.validate()?;
        debug!("effective configuration: {:?}", conf);
        Ok(conf)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessAction {
    Start,
    Stop,
    Status,
}

/// `<definition-file> <start|stop|status> <process-name>`
#[derive(Args, Debug, Clone, Default)]
pub struct ProcessCommand {
    /// Path to the cluster definition file (JSON)
    #[arg(value_name = "DEFINITION")]
    pub definition: Option<String>,

    #[arg(value_enum, value_name = "ACTION")]
    pub action: Option<ProcessAction>,

    /// Process name as defined for this host
    #[arg(value_name = "PROCESS")]
    pub process: Option<String>,

    /// With `status`, also ask gfsh for the process status
    #[arg(long)]
    pub engine: bool,
}

impl ProcessCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let Some(ref definition_path) = self.definition else {
            CliArgs::command().print_help()?;
            return Ok(());
        };
        let (Some(action), Some(name)) = (self.action, self.process.as_deref()) else {
            anyhow::bail!("invalid input, please provide a command and a process name");
        };

        let definition = ClusterDefinition::from_file(definition_path)?;
        let host = match global.host {
            Some(ref host) => host.clone(),
            None => local_hostname()?,
        };
        let planner = HostPlanner::new(definition.for_host(&host)?);

        for issue in DefinitionValidator::new(&planner).validate_host() {
            if !issue.involves(name) {
                warn!("cluster definition: {}", issue);
            }
        }
        let spec = planner.spec_for(name)?;

        let conf = global.tool_conf()?;
        let orchestrator = Orchestrator::from_conf(&conf);

        match action {
            ProcessAction::Start => {
                let outcome = orchestrator.start(&spec).await?;
                println!("{}", outcome.describe(&spec.name));
            }
            ProcessAction::Stop => {
                let outcome = orchestrator.stop(&spec).await?;
                println!("{}", outcome.describe(&spec.name));
            }
            ProcessAction::Status => {
                let state = orchestrator.status(&spec).await;
                println!("{} {} is {}", spec.role, spec.name, state);
                if self.engine {
                    let code = orchestrator.query(&spec).await?;
                    if !code.success() {
                        anyhow::bail!(
                            "gfsh status {} for {} reported {}",
                            spec.role,
                            spec.name,
                            code
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

fn site_manager(global: &GlobalArgs) -> anyhow::Result<SiteManager> {
    let conf = global.tool_conf()?;
    SiteManager::from_conf(&conf).context("Failed to prepare the site")
}

#[derive(Parser, Debug)]
pub struct StartClusterCommand {
    /// Site (cluster) number
    pub site: u32,

    /// Number of cache servers
    pub nodes: u32,

    /// Number of locators (1, or 2 for an HA pair); defaults to the configuration
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=2))]
    pub locators: Option<u32>,
}

impl StartClusterCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let manager = site_manager(global)?;
        let report = manager
            .start_cluster(self.site, self.nodes, self.locators)
            .await?;

        for (name, outcome) in &report.locators {
            println!("{}", outcome.describe(name));
        }
        for name in &report.servers.already_running {
            println!("{}", Outcome::AlreadyRunning.describe(name));
        }
        for name in &report.servers.started {
            println!("{}", Outcome::Started.describe(name));
        }
        println!("Site {} is up", self.site);
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct StopClusterCommand {
    pub site: u32,
}

impl StopClusterCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let outcome = site_manager(global)?.stop_cluster(self.site).await?;
        println!("{}", outcome.describe(&format!("Site {}", self.site)));
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct StopLocatorCommand {
    pub site: u32,
}

impl StopLocatorCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let outcome = site_manager(global)?.stop_locators(self.site).await?;
        let subject = format!("The locators of site {}", self.site);
        match outcome {
            Outcome::NotRunning => println!("{} are not running", subject),
            _ => println!("{} stopped", subject),
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct RemoveClusterCommand {
    pub site: u32,
}

impl RemoveClusterCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let removal = site_manager(global)?.remove_cluster(self.site).await?;
        println!("{}", removal.stop.describe(&format!("Site {}", self.site)));
        match removal.removed {
            Some(dir) => println!("Removed {}", dir.display()),
            None => println!("Site {} has no directory to remove", self.site),
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct StatusClusterCommand {
    pub site: u32,
}

impl StatusClusterCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let members = site_manager(global)?.cluster_status(self.site).await?;
        let output = TableRenderer::new().render_site_status(self.site, &members);
        println!("{}", output);
        Ok(())
    }
}
