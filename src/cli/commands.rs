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

// CLI command definitions

use super::cluster::{
    ProcessCommand, RemoveClusterCommand, StartClusterCommand, StatusClusterCommand,
    StopClusterCommand, StopLocatorCommand,
};
use clap::{Args, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "gemfire-cluster",
    version,
    about = "Idempotent lifecycle control for GemFire locators and cache servers",
    long_about = "Start, stop and inspect the processes of a GemFire cluster.\n\n\
                  Definition mode:  gemfire-cluster <definition-file> <start|stop|status> <process-name>\n\
                  Site mode:        gemfire-cluster start-cluster <site> <nodes>\n\n\
                  All commands are idempotent."
)]
pub struct CliArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub process: ProcessCommand,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to the tool configuration file (TOML)
    /// If not provided, GEMFIRE_CLUSTER_CONF is used, then built-in defaults
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Dynamic configuration properties overriding the configuration file (-D key=value)
    ///
    /// Keys: cluster.home, gemfire.home, java.home, bind-address, locator.count,
    /// server.cache-xml-file, server.classpath, probe.timeout-ms, command.timeout-secs,
    /// wan.enabled, wan.host, wan.sites (format: 1,2)
    ///
    /// Example: -Dcluster.home=/data/gemfire -Dlocator.count=2
    #[arg(short = 'D', global = true, value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Host name to look up in the cluster definition instead of this machine's
    #[arg(long, global = true)]
    pub host: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Start the locator(s) of a site, then its cache servers concurrently
    StartCluster(StartClusterCommand),

    /// Shut a whole site down through its locator, then stop what is left
    StopCluster(StopClusterCommand),

    /// Stop only the locators of a site
    StopLocator(StopLocatorCommand),

    /// Stop a site and delete its directory
    RemoveCluster(RemoveClusterCommand),

    /// Show the state of every member of a site
    StatusCluster(StatusClusterCommand),
}
