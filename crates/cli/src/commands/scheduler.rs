// SPDX-License-Identifier: MIT

//! `amx scheduler` — ad-hoc one-shot/recurring message scheduling and
//! inspection (spec §4.5), useful for poking a running agent session
//! without waiting for its next default check-in.

use crate::context::CliApi;
use crate::output::OutputFormat;
use crate::table::{self, Column};
use amx_core::scheduled_message::ScheduledMessageId;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct SchedulerArgs {
    #[command(subcommand)]
    pub command: SchedulerCommand,
}

#[derive(Subcommand)]
pub enum SchedulerCommand {
    /// List every scheduled message (active and inactive)
    List,
    /// Schedule a one-shot prompt to a tmux session
    ScheduleCheck { session: String, minutes: u64, text: String },
    /// Schedule a recurring prompt to a tmux session
    ScheduleRecurring { session: String, minutes: u64, text: String },
    /// Cancel a scheduled message
    Cancel { id: String },
}

pub fn handle(cmd: SchedulerCommand, api: &CliApi, format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SchedulerCommand::List => list(api, format),
        SchedulerCommand::ScheduleCheck { session, minutes, text } => {
            let id = api.scheduler().schedule_check(session, minutes, text)?;
            println!("scheduled {id}");
            Ok(())
        }
        SchedulerCommand::ScheduleRecurring { session, minutes, text } => {
            let id = api.scheduler().schedule_recurring_check(session, minutes, text)?;
            println!("scheduled {id}");
            Ok(())
        }
        SchedulerCommand::Cancel { id } => {
            api.scheduler().cancel_message(&ScheduledMessageId::new(id))?;
            println!("cancelled");
            Ok(())
        }
    }
}

fn list(api: &CliApi, format: OutputFormat) -> anyhow::Result<()> {
    let messages = api.storage().list_scheduled_messages();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&messages)?),
        OutputFormat::Text => {
            let rows: Vec<Vec<String>> = messages
                .iter()
                .map(|m| vec![m.id.to_string(), m.name.clone(), format!("{:?}", m.target), m.recurring.to_string(), m.active.to_string(), m.next_run.map(|t| t.to_rfc3339()).unwrap_or_default()])
                .collect();
            table::print(&[Column::left("ID"), Column::left("NAME"), Column::left("TARGET"), Column::left("RECURRING"), Column::left("ACTIVE"), Column::left("NEXT RUN")], &rows);
        }
    }
    Ok(())
}
