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

use clap::Parser;
use gemfire_cluster::cli::{CliArgs, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    match args.command {
        Some(Commands::StartCluster(cmd)) => cmd.execute(&args.global).await,
        Some(Commands::StopCluster(cmd)) => cmd.execute(&args.global).await,
        Some(Commands::StopLocator(cmd)) => cmd.execute(&args.global).await,
        Some(Commands::RemoveCluster(cmd)) => cmd.execute(&args.global).await,
        Some(Commands::StatusCluster(cmd)) => cmd.execute(&args.global).await,
        None => args.process.execute(&args.global).await,
    }
}
