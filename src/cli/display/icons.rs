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

//! Status icons for CLI output

use crate::domain::cluster::ProcessState;

pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";
    pub const WARNING: &'static str = "⚠";
    pub const ERROR: &'static str = "✗";
    pub const UNKNOWN: &'static str = "?";

    pub fn get_state_icon(state: ProcessState) -> &'static str {
        match state {
            ProcessState::Running => Self::SUCCESS,
            ProcessState::NotRunning => Self::ERROR,
            ProcessState::Unknown => Self::UNKNOWN,
        }
    }

    /// Overall site status from running/total members
    pub fn get_site_text(running: usize, total: usize) -> &'static str {
        if total == 0 {
            "Absent"
        } else if running == total {
            "Running"
        } else if running > 0 {
            "Degraded"
        } else {
            "Stopped"
        }
    }

    pub fn get_site_icon(running: usize, total: usize) -> &'static str {
        if total == 0 {
            Self::UNKNOWN
        } else if running == total {
            Self::SUCCESS
        } else if running > 0 {
            Self::WARNING
        } else {
            Self::ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_state_icon() {
        assert_eq!(StatusIcon::get_state_icon(ProcessState::Running), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::get_state_icon(ProcessState::NotRunning), StatusIcon::ERROR);
        assert_eq!(StatusIcon::get_state_icon(ProcessState::Unknown), StatusIcon::UNKNOWN);
    }

    #[test]
    fn test_get_site_text() {
        assert_eq!(StatusIcon::get_site_text(3, 3), "Running");
        assert_eq!(StatusIcon::get_site_text(1, 3), "Degraded");
        assert_eq!(StatusIcon::get_site_text(0, 3), "Stopped");
        assert_eq!(StatusIcon::get_site_text(0, 0), "Absent");
        assert_eq!(StatusIcon::get_site_icon(1, 3), StatusIcon::WARNING);
    }
}
