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

//! Process and site lifecycle orchestration

pub mod host;
pub mod orchestrator;
pub mod process;
pub mod site;
pub mod validator;

pub use self::host::HostPlanner;
pub use self::orchestrator::{BatchReport, Orchestrator};
pub use self::process::{Outcome, ProcessSpec, ProcessState};
pub use self::site::{MemberStatus, Removal, SiteManager, SitePlanner, SiteStartReport};
pub use self::validator::{DefinitionValidator, ValidationIssue};
