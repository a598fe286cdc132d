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

use crate::domain::cluster::host::HostPlanner;
use crate::domain::cluster::process::ProcessSpec;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// A problem found in a host's section of the cluster definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    Unresolvable { process: String, reason: String },
    PortCollision { port: u16, processes: Vec<String> },
    DirCollision { dir: PathBuf, processes: Vec<String> },
}

impl ValidationIssue {
    /// True when `process` is one of the processes the issue is about.
    pub fn involves(&self, process: &str) -> bool {
        match self {
            ValidationIssue::Unresolvable { process: p, .. } => p == process,
            ValidationIssue::PortCollision { processes, .. }
            | ValidationIssue::DirCollision { processes, .. } => {
                processes.iter().any(|p| p == process)
            }
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Unresolvable { process, reason } => {
                write!(f, "{}: {}", process, reason)
            }
            ValidationIssue::PortCollision { port, processes } => {
                write!(f, "port {} is used by {}", port, processes.join(", "))
            }
            ValidationIssue::DirCollision { dir, processes } => write!(
                f,
                "directory {} is used by {}",
                dir.display(),
                processes.join(", ")
            ),
        }
    }
}

pub struct DefinitionValidator<'p, 'a> {
    planner: &'p HostPlanner<'a>,
}

impl<'p, 'a> DefinitionValidator<'p, 'a> {
    pub fn new(planner: &'p HostPlanner<'a>) -> Self {
        Self { planner }
    }

    /// Check every managed process of the host: each must resolve to a
    /// complete spec, and no two may share a port or a directory. Processes
    /// of unmanaged types are skipped.
    pub fn validate_host(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut specs = Vec::new();

        for name in self.planner.view().process_names() {
            if self.planner.role_of(name).is_err() {
                continue;
            }
            match self.planner.spec_for(name) {
                Ok(spec) => specs.push(spec),
                Err(e) => issues.push(ValidationIssue::Unresolvable {
                    process: name.to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        issues.extend(
            collisions(&specs, |s| s.probe.port)
                .into_iter()
                .map(|(port, processes)| ValidationIssue::PortCollision { port, processes }),
        );
        issues.extend(
            collisions(&specs, |s| s.dir.clone())
                .into_iter()
                .map(|(dir, processes)| ValidationIssue::DirCollision { dir, processes }),
        );

        issues
    }
}

fn collisions<K, F>(specs: &[ProcessSpec], key: F) -> Vec<(K, Vec<String>)>
where
    K: std::hash::Hash + Eq + Ord + Clone,
    F: Fn(&ProcessSpec) -> K,
{
    let mut by_key: HashMap<K, Vec<String>> = HashMap::new();
    for spec in specs {
        by_key.entry(key(spec)).or_default().push(spec.name.clone());
    }
    let mut found: Vec<_> = by_key
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .collect();
    found.sort_by(|a, b| a.0.cmp(&b.0));
    found
}
