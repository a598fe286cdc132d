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

//! Liveness detection for engine processes.
//!
//! The advertised port is checked first. When nothing answers there, the pid
//! file the engine left in the process directory decides: a process that is
//! still starting, or that crashed mid-start, may hold a pid without
//! listening yet. The pid file is only ever read.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Where to look for a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub bind_address: String,
    pub port: u16,
    pub pid_file: PathBuf,
}

#[async_trait::async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn is_running(&self, target: &ProbeTarget) -> bool;
}

pub struct NetworkProbe {
    timeout: Duration,
}

impl NetworkProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn port_reachable(&self, target: &ProbeTarget) -> bool {
        let connect = TcpStream::connect((target.bind_address.as_str(), target.port));
        match tokio::time::timeout(self.timeout, connect).await {
            // dropping the stream closes it
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                debug!(
                    "{}:{} not reachable: {}",
                    target.bind_address, target.port, e
                );
                false
            }
            Err(_) => {
                debug!(
                    "{}:{} did not answer within {:?}",
                    target.bind_address, target.port, self.timeout
                );
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl LivenessProbe for NetworkProbe {
    async fn is_running(&self, target: &ProbeTarget) -> bool {
        if self.port_reachable(target).await {
            return true;
        }
        pid_file_alive(&target.pid_file).await
    }
}

/// True when `path` names a process that is still alive. Missing, unreadable
/// or stale pid files all count as not running.
pub async fn pid_file_alive(path: &Path) -> bool {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            debug!("no usable pid file at {}: {}", path.display(), e);
            return false;
        }
    };

    match content.trim().parse::<i32>() {
        Ok(pid) => {
            let alive = pid_alive(pid);
            debug!("pid {} from {} alive: {}", pid, path.display(), alive);
            alive
        }
        Err(_) => {
            debug!("pid file {} does not hold a pid", path.display());
            false
        }
    }
}

#[cfg(unix)]
pub fn pid_alive(pid: i32) -> bool {
    // 0 and negative values address process groups, never a single process
    if pid <= 0 {
        return false;
    }
    // SAFETY: signal 0 performs the permission and existence checks only.
    let rc = unsafe { libc::kill(pid, 0) };
    if rc == 0 {
        return true;
    }
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
pub fn pid_alive(pid: i32) -> bool {
    pid > 0 && Path::new("/proc").join(pid.to_string()).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    // Above the kernel's pid_max, so never allocated.
    const DEAD_PID: i32 = 0x7fff_fff0;

    fn probe() -> NetworkProbe {
        NetworkProbe::new(Duration::from_millis(200))
    }

    /// A port nothing listens on: bind, read the port, release it.
    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    fn target(port: u16, pid_file: PathBuf) -> ProbeTarget {
        ProbeTarget {
            bind_address: "127.0.0.1".to_string(),
            port,
            pid_file,
        }
    }

    #[tokio::test]
    async fn test_reachable_port_wins_over_pid_file() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let dir = tempfile::tempdir().unwrap();

        // no pid file
        assert!(probe().is_running(&target(port, dir.path().join("none.pid"))).await);

        // stale pid file
        let pid_file = dir.path().join("vf.gf.server.pid");
        std::fs::write(&pid_file, DEAD_PID.to_string()).unwrap();
        assert!(probe().is_running(&target(port, pid_file)).await);
    }

    #[tokio::test]
    async fn test_live_pid_counts_when_port_closed() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("vf.gf.locator.pid");
        std::fs::write(&pid_file, format!("{}\n", std::process::id())).unwrap();

        let port = closed_port().await;
        assert!(probe().is_running(&target(port, pid_file.clone())).await);
        // the probe never touches the pid file
        assert!(pid_file.exists());
    }

    #[tokio::test]
    async fn test_stale_pid_is_not_running() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("vf.gf.server.pid");
        std::fs::write(&pid_file, DEAD_PID.to_string()).unwrap();

        let port = closed_port().await;
        assert!(!probe().is_running(&target(port, pid_file.clone())).await);
        assert!(pid_file.exists());
    }

    #[tokio::test]
    async fn test_absent_or_garbage_pid_file() {
        let dir = tempfile::tempdir().unwrap();
        let port = closed_port().await;
        assert!(!probe().is_running(&target(port, dir.path().join("missing.pid"))).await);

        let garbage = dir.path().join("garbage.pid");
        std::fs::write(&garbage, "not-a-pid").unwrap();
        assert!(!probe().is_running(&target(port, garbage)).await);
    }

    #[test]
    fn test_pid_alive_edge_cases() {
        assert!(pid_alive(std::process::id() as i32));
        assert!(!pid_alive(0));
        assert!(!pid_alive(-1));
        assert!(!pid_alive(DEAD_PID));
    }
}
