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

mod common;

#[cfg(test)]
mod tests {
    use super::common::FakeEngine;
    use gemfire_cluster::domain::cluster::DefinitionValidator;
    use gemfire_cluster::infrastructure::process::NetworkProbe;
    use gemfire_cluster::*;
    use std::io::Write;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    fn definition_json(cluster_home: &Path) -> String {
        format!(
            r#"{{
                "global-properties": {{
                    "gemfire": "/opt/gemfire",
                    "java-home": "/opt/java",
                    "cluster-home": "{}"
                }},
                "hosts": {{
                    "gf1": {{
                        "host-properties": {{ "gfsh.log-level": "config" }},
                        "processes": {{
                            "locator": {{ "type": "locator", "port": 10334 }},
                            "server1": {{ "type": "datanode", "server-port": 40404 }},
                            "server2": {{ "type": "datanode", "server-port": 40405 }},
                            "server3": {{ "type": "datanode", "server-port": 40406 }},
                            "monitor": {{ "type": "agent" }}
                        }}
                    }}
                }}
            }}"#,
            cluster_home.display()
        )
    }

    fn load_definition(cluster_home: &Path) -> (tempfile::NamedTempFile, ClusterDefinition) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", definition_json(cluster_home)).unwrap();
        let def = ClusterDefinition::from_file(file.path()).unwrap();
        (file, def)
    }

    fn orchestrator(engine: &Arc<FakeEngine>) -> Orchestrator {
        Orchestrator::new(engine.clone(), engine.clone())
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let home = tempfile::tempdir().unwrap();
        let (_file, def) = load_definition(home.path());
        let planner = HostPlanner::new(def.for_host("gf1").unwrap());
        let spec = planner.spec_for("locator").unwrap();
        let engine = FakeEngine::new();
        let orchestrator = orchestrator(&engine);

        assert_eq!(orchestrator.status(&spec).await, ProcessState::NotRunning);
        assert_eq!(orchestrator.start(&spec).await.unwrap(), Outcome::Started);
        assert!(home.path().join("locator").is_dir());
        assert_eq!(orchestrator.status(&spec).await, ProcessState::Running);

        assert_eq!(orchestrator.start(&spec).await.unwrap(), Outcome::AlreadyRunning);
        assert_eq!(engine.verbs(), vec!["start locator"]);
        assert!(engine.commands()[0].has_arg("--log-level=config"));
    }

    #[tokio::test]
    async fn test_stop_never_started_issues_nothing() {
        let home = tempfile::tempdir().unwrap();
        let (_file, def) = load_definition(home.path());
        let planner = HostPlanner::new(def.for_host("gf1").unwrap());
        let spec = planner.spec_for("server1").unwrap();
        let engine = FakeEngine::new();

        assert_eq!(
            orchestrator(&engine).stop(&spec).await.unwrap(),
            Outcome::NotRunning
        );
        assert!(engine.commands().is_empty());
        assert!(!home.path().join("server1").exists());
    }

    #[tokio::test]
    async fn test_start_then_stop() {
        let home = tempfile::tempdir().unwrap();
        let (_file, def) = load_definition(home.path());
        let planner = HostPlanner::new(def.for_host("gf1").unwrap());
        let spec = planner.spec_for("server1").unwrap();
        let engine = FakeEngine::new();
        let orchestrator = orchestrator(&engine);

        orchestrator.start(&spec).await.unwrap();
        assert_eq!(orchestrator.stop(&spec).await.unwrap(), Outcome::Stopped);
        assert_eq!(orchestrator.stop(&spec).await.unwrap(), Outcome::NotRunning);
        assert_eq!(engine.verbs(), vec!["start server", "stop server"]);
    }

    #[tokio::test]
    async fn test_failed_start_names_the_directory() {
        let home = tempfile::tempdir().unwrap();
        let (_file, def) = load_definition(home.path());
        let planner = HostPlanner::new(def.for_host("gf1").unwrap());
        let spec = planner.spec_for("server2").unwrap();
        let engine = FakeEngine::failing(&["server2"]);

        match orchestrator(&engine).start(&spec).await {
            Err(ClusterError::StartFailure { name, dir, code }) => {
                assert_eq!(name, "server2");
                assert_eq!(dir, home.path().join("server2"));
                assert_eq!(code, ExitCode(Some(1)));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_batch_reports_exactly_the_failing_subset() {
        let home = tempfile::tempdir().unwrap();
        let (_file, def) = load_definition(home.path());
        let planner = HostPlanner::new(def.for_host("gf1").unwrap());
        let specs: Vec<_> = ["server1", "server2", "server3"]
            .iter()
            .map(|name| planner.spec_for(name).unwrap())
            .collect();
        let engine = FakeEngine::failing(&["server2"]);

        match orchestrator(&engine).start_batch(&specs).await {
            Err(ClusterError::AggregateBatchFailure { failures }) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].name, "server2");
                assert_eq!(failures[0].dir, home.path().join("server2"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(engine.is_up(&home.path().join("server1")));
        assert!(engine.is_up(&home.path().join("server3")));
        assert!(!engine.is_up(&home.path().join("server2")));
    }

    #[tokio::test]
    async fn test_batch_skips_running_members() {
        let home = tempfile::tempdir().unwrap();
        let (_file, def) = load_definition(home.path());
        let planner = HostPlanner::new(def.for_host("gf1").unwrap());
        let specs: Vec<_> = ["server1", "server2"]
            .iter()
            .map(|name| planner.spec_for(name).unwrap())
            .collect();
        let engine = FakeEngine::new();
        engine.mark_running(&home.path().join("server1"));

        let report = orchestrator(&engine).start_batch(&specs).await.unwrap();
        assert_eq!(report.already_running, vec!["server1".to_string()]);
        assert_eq!(report.started, vec!["server2".to_string()]);
        assert_eq!(engine.commands().len(), 1);
    }

    #[tokio::test]
    async fn test_engine_status_query() {
        let home = tempfile::tempdir().unwrap();
        let (_file, def) = load_definition(home.path());
        let planner = HostPlanner::new(def.for_host("gf1").unwrap());
        let spec = planner.spec_for("locator").unwrap();
        let engine = FakeEngine::new();
        let orchestrator = orchestrator(&engine);

        assert!(!orchestrator.query(&spec).await.unwrap().success());
        orchestrator.start(&spec).await.unwrap();
        assert!(orchestrator.query(&spec).await.unwrap().success());
    }

    #[test]
    fn test_definition_errors() {
        let home = tempfile::tempdir().unwrap();
        let (_file, def) = load_definition(home.path());

        assert!(matches!(
            def.for_host("elsewhere"),
            Err(ClusterError::UnknownHost(_))
        ));

        let planner = HostPlanner::new(def.for_host("gf1").unwrap());
        let err = planner.spec_for("monitor").unwrap_err();
        assert!(err.is_definition_error());
        assert!(err
            .to_string()
            .contains("is not defined for host 'gf1' or is not a known process type"));

        assert!(DefinitionValidator::new(&planner).validate_host().is_empty());

        let missing = ClusterDefinition::from_file(home.path().join("nope.json")).unwrap_err();
        assert!(missing
            .to_string()
            .contains("could not find cluster definition file"));
    }

    #[tokio::test]
    async fn test_network_probe_uses_pid_file_when_port_is_closed() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("vf.gf.server.pid");
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let target = ProbeTarget {
            bind_address: "127.0.0.1".to_string(),
            port,
            pid_file: pid_file.clone(),
        };
        let probe = NetworkProbe::new(Duration::from_millis(200));

        assert!(!probe.is_running(&target).await);

        std::fs::write(&pid_file, std::process::id().to_string()).unwrap();
        assert!(probe.is_running(&target).await);

        std::fs::write(&pid_file, "not-a-pid").unwrap();
        assert!(!probe.is_running(&target).await);
        assert!(pid_file.exists());
    }
}
