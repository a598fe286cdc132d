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

/// Control executable, relative to the engine install path
pub const GFSH_RELATIVE_PATH: &str = "bin/gfsh";

/// Environment exported to every control command
pub const ENV_GEMFIRE: &str = "GEMFIRE";
pub const ENV_JAVA_HOME: &str = "JAVA_HOME";

/// Environment variable naming the tool configuration file
pub const ENV_CONF_FILE: &str = "GEMFIRE_CLUSTER_CONF";

/// Pid files written by the engine into each process directory
pub const LOCATOR_PID_FILE: &str = "vf.gf.locator.pid";
pub const SERVER_PID_FILE: &str = "vf.gf.server.pid";

/// Default network settings
pub const DEFAULT_BIND_ADDRESS: &str = "localhost";
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 500;

/// Port scheme offsets within a site's 10000-wide block
pub const SITE_PORT_STRIDE: u32 = 10_000;
pub const SERVER_PORT_STRIDE: u32 = 100;
pub const JMX_MANAGER_OFFSET: u32 = 1099;
pub const GATEWAY_RECEIVER_START_OFFSET: u32 = 2000;
pub const GATEWAY_RECEIVER_END_OFFSET: u32 = 2999;
pub const HTTP_SERVICE_OFFSET: u32 = 7070;

/// Supported ranges of the port scheme
pub const MAX_SITE: u32 = 99;
pub const MAX_NODE: u32 = 19;
pub const MAX_LOCATORS: u32 = 2;

/// Directory name prefixes inside a site directory
pub const LOCATOR_DIR_PREFIX: &str = "locator_";
pub const SERVER_DIR_PREFIX: &str = "server_";

/// Definition file keys
pub const KEY_GEMFIRE: &str = "gemfire";
pub const KEY_JAVA_HOME: &str = "java-home";
pub const KEY_CLUSTER_HOME: &str = "cluster-home";
pub const KEY_PORT: &str = "port";
pub const KEY_BIND_ADDRESS: &str = "bind-address";
pub const KEY_SERVER_PORT: &str = "server-port";
pub const KEY_SERVER_BIND_ADDRESS: &str = "server-bind-address";
pub const KEY_DISTRIBUTED_SYSTEM_ID: &str = "distributed-system-id";
pub const KEY_REMOTE_LOCATORS: &str = "remote-locators";
pub const GFSH_OPTION_PREFIX: &str = "gfsh.";

/// JVM system properties understood by the engine and the server cache config
pub const PROP_DISTRIBUTED_SYSTEM_ID: &str = "gemfire.distributed-system-id";
pub const PROP_REMOTE_LOCATORS: &str = "gemfire.remote-locators";
pub const PROP_JMX_MANAGER_PORT: &str = "gemfire.jmx-manager-port";
pub const PROP_HTTP_SERVICE_PORT: &str = "gemfire.http-service-port";
pub const PROP_REMOTE_DISTRIBUTED_SYSTEM_ID: &str = "REMOTE_DISTRIBUTED_SYSTEM_ID";
pub const PROP_GATEWAY_RECEIVER_START_PORT: &str = "GATEWAY_RECEIVER_START_PORT";
pub const PROP_GATEWAY_RECEIVER_END_PORT: &str = "GATEWAY_RECEIVER_END_PORT";
