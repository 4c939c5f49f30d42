// SPDX-License-Identifier: MIT

//! `amx task` — assignTask, completeTask, blockTask, takeNextTask,
//! syncTaskStatus (spec §4.9).

use crate::context::CliApi;
use crate::output::{self, OutputFormat};
use crate::table::{self, Column};
use amx_core::project::ProjectId;
use amx_core::registry_entry::RegistryEntryId;
use amx_core::role::Role;
use amx_core::task_frontmatter::Priority;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Move an open task file to in_progress and register it
    Assign {
        project_id: String,
        task_file_path: PathBuf,
        task_name: String,
        role: String,
        #[arg(long)]
        member_id: Option<String>,
        #[arg(long)]
        session_id: Option<String>,
        #[arg(long, default_value = "medium")]
        priority: String,
    },
    /// Move a task file to done and drop its registry entry
    Complete {
        project_id: String,
        entry_id: String,
    },
    /// Move a task file to blocked and record a reason
    Block {
        project_id: String,
        entry_id: String,
        reason: String,
    },
    /// Claim the next open task matching a role, or any open task
    TakeNext {
        project_id: String,
        role: String,
    },
    /// Reconcile the in-progress registry against the task-folder tree
    Sync {
        project_id: String,
    },
    /// List current in-progress registry entries
    List,
}

pub fn handle(cmd: TaskCommand, api: &CliApi, format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TaskCommand::Assign { project_id, task_file_path, task_name, role, member_id, session_id, priority } => {
            let role = Role::parse(&role).ok_or_else(|| anyhow::anyhow!("unknown role: {role}"))?;
            let priority = parse_priority(&priority)?;
            let member_id = member_id.map(amx_core::MemberId::new);
            output::render(api.assign_task(&ProjectId::new(project_id), &task_file_path, &task_name, role, member_id, session_id, priority), format, |entry| {
                println!("assigned {} -> {}", entry.task_name, entry.id);
            })
        }
        TaskCommand::Complete { project_id, entry_id } => output::render(api.complete_task(&ProjectId::new(project_id), &RegistryEntryId::new(entry_id)), format, |_| {
            println!("completed");
        }),
        TaskCommand::Block { project_id, entry_id, reason } => {
            output::render(api.block_task(&ProjectId::new(project_id), &RegistryEntryId::new(entry_id), reason), format, |entry| {
                println!("blocked {} ({})", entry.task_name, entry.block_reason.clone().unwrap_or_default());
            })
        }
        TaskCommand::TakeNext { project_id, role } => {
            let role = Role::parse(&role).ok_or_else(|| anyhow::anyhow!("unknown role: {role}"))?;
            output::render(api.take_next_task(&ProjectId::new(project_id), role), format, |entry| match entry {
                Some(entry) => println!("took {} -> {}", entry.task_name, entry.id),
                None => println!("nothing open"),
            })
        }
        TaskCommand::Sync { project_id } => output::render(api.sync_task_status(&ProjectId::new(project_id)), format, |_| {
            println!("synced");
        }),
        TaskCommand::List => list(api, format),
    }
}

fn parse_priority(s: &str) -> anyhow::Result<Priority> {
    match s {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        other => anyhow::bail!("unknown priority: {other}"),
    }
}

fn list(api: &CliApi, format: OutputFormat) -> anyhow::Result<()> {
    let entries = api.storage().list_registry_entries();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|e| vec![e.id.to_string(), e.task_name.clone(), e.target_role.to_string(), format!("{:?}", e.status), e.task_file_path.display().to_string()])
                .collect();
            table::print(&[Column::left("ID"), Column::left("TASK"), Column::left("ROLE"), Column::left("STATUS"), Column::left("PATH")], &rows);
        }
    }
    Ok(())
}
