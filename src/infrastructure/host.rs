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

use crate::shared::error::{ClusterError, Result};

/// Name of the machine this tool runs on, as used for definition lookups.
#[cfg(unix)]
pub fn local_hostname() -> Result<String> {
    let mut buf = [0u8; 256];
    // SAFETY: the buffer outlives the call and its length is passed along.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
    if rc != 0 {
        return Err(ClusterError::Io(std::io::Error::last_os_error()));
    }
    let len = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
    let name = String::from_utf8_lossy(&buf[..len]).into_owned();
    if name.is_empty() {
        return Err(ClusterError::config_error("the local hostname is empty"));
    }
    Ok(name)
}

#[cfg(not(unix))]
pub fn local_hostname() -> Result<String> {
    std::env::var("COMPUTERNAME")
        .map_err(|_| ClusterError::config_error("cannot determine the local hostname"))
}
