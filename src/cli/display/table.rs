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

//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::cluster::{MemberStatus, ProcessState};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render every member of a site with its port, directory and state
    pub fn render_site_status(&self, site: u32, members: &[MemberStatus]) -> String {
        if members.is_empty() {
            return format!("Site {} has no members", site);
        }

        let running = members
            .iter()
            .filter(|m| m.state == ProcessState::Running)
            .count();
        let total = members.len();

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("MEMBER").set_alignment(CellAlignment::Left),
                Cell::new("ROLE").set_alignment(CellAlignment::Left),
                Cell::new("PORT").set_alignment(CellAlignment::Right),
                Cell::new("DIRECTORY").set_alignment(CellAlignment::Left),
                Cell::new("STATE").set_alignment(CellAlignment::Center),
            ]);

        for member in members {
            table.add_row(vec![
                Cell::new(&member.name),
                Cell::new(member.role.as_str()),
                Cell::new(member.port).set_alignment(CellAlignment::Right),
                Cell::new(member.dir.display()),
                Cell::new(format!(
                    "{} {}",
                    StatusIcon::get_state_icon(member.state),
                    member.state
                ))
                .fg(self.theme.get_state_color(member.state)),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Site {} {} ─╮\n",
            site,
            format!(
                "[{} {} {}/{}]",
                StatusIcon::get_site_icon(running, total),
                StatusIcon::get_site_text(running, total),
                running,
                total
            )
            .bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} Running  {} Not running  {} Unknown\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::ERROR.red(),
            StatusIcon::UNKNOWN.bright_black()
        ));

        output
    }
}
