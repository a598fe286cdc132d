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

//! Process specs for named processes of a cluster definition.

use crate::domain::cluster::process::ProcessSpec;
use crate::domain::config::LaunchEnv;
use crate::domain::definition::HostView;
use crate::domain::topology::Role;
use crate::infrastructure::constants::{
    KEY_BIND_ADDRESS, KEY_CLUSTER_HOME, KEY_DISTRIBUTED_SYSTEM_ID, KEY_GEMFIRE, KEY_JAVA_HOME,
    KEY_PORT, KEY_REMOTE_LOCATORS, KEY_SERVER_BIND_ADDRESS, KEY_SERVER_PORT,
    PROP_DISTRIBUTED_SYSTEM_ID, PROP_REMOTE_LOCATORS,
};
use crate::shared::error::{ClusterError, Result};
use std::path::PathBuf;

pub struct HostPlanner<'a> {
    view: HostView<'a>,
}

impl<'a> HostPlanner<'a> {
    pub fn new(view: HostView<'a>) -> Self {
        Self { view }
    }

    pub fn view(&self) -> &HostView<'a> {
        &self.view
    }

    /// Role of `name`, or `UnknownProcess` when it is absent from this host or
    /// has a type this tool does not manage.
    pub fn role_of(&self, name: &str) -> Result<Role> {
        if self.view.is_locator(name) {
            Ok(Role::Locator)
        } else if self.view.is_datanode(name) {
            Ok(Role::Server)
        } else {
            Err(ClusterError::unknown_process(name, self.view.host()))
        }
    }

    pub fn spec_for(&self, name: &str) -> Result<ProcessSpec> {
        let role = self.role_of(name)?;
        let view = &self.view;

        let env = LaunchEnv {
            gemfire: PathBuf::from(view.property(name, KEY_GEMFIRE)?),
            java_home: Some(PathBuf::from(view.property(name, KEY_JAVA_HOME)?)),
        };
        let dir = PathBuf::from(view.property(name, KEY_CLUSTER_HOME)?).join(name);

        let (port_key, bind_key) = match role {
            Role::Locator => (KEY_PORT, KEY_BIND_ADDRESS),
            Role::Server => (KEY_SERVER_PORT, KEY_SERVER_BIND_ADDRESS),
        };
        let port: u16 = view.property_as(name, port_key)?;
        let bind_address = view.property(name, bind_key)?;

        let ds_id = view.optional_property(name, KEY_DISTRIBUTED_SYSTEM_ID)?;
        let remote_locators = view.optional_property(name, KEY_REMOTE_LOCATORS)?;
        let extra = view.gfsh_options(name)?;

        Ok(
            ProcessSpec::new(&env, role, name, &dir, &bind_address, port).map_start(|cmd| {
                let cmd = cmd
                    .with_option(bind_key, &bind_address)
                    .with_option(port_key, port);
                let cmd = match ds_id {
                    Some(id) => cmd.with_jvm_property(PROP_DISTRIBUTED_SYSTEM_ID, id),
                    None => cmd,
                };
                let cmd = match remote_locators {
                    Some(locators) => cmd.with_jvm_property(PROP_REMOTE_LOCATORS, locators),
                    None => cmd,
                };
                cmd.with_options(extra)
            }),
        )
    }
}
