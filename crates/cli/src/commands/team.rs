// SPDX-License-Identifier: MIT

//! `amx team` — createTeam, startTeam, stopTeam, assignTeamsToProject,
//! startTeamMember/stopTeamMember (spec §4.9).

use crate::context::CliApi;
use crate::output::{self, OutputFormat};
use crate::table::{self, Column};
use amx_api::teams::NewMember;
use amx_core::project::ProjectId;
use amx_core::role::Role;
use amx_core::team::TeamId;
use amx_core::MemberId;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct TeamArgs {
    #[command(subcommand)]
    pub command: TeamCommand,
}

#[derive(Subcommand)]
pub enum TeamCommand {
    /// Create a team. Repeat --member name:role for each slot.
    Create {
        name: String,
        #[arg(long, short, default_value = "")]
        description: String,
        #[arg(long = "member", value_parser = parse_member, required = true)]
        members: Vec<NewMemberArg>,
    },
    List,
    Show {
        id: String,
    },
    /// Batch-create sessions for every member without a live one
    Start {
        id: String,
        #[arg(long)]
        project: Option<String>,
    },
    /// Kill every member session and cancel scheduled messages for the team
    Stop {
        id: String,
    },
    /// Kill every member session and remove the team; refused if the
    /// orchestrator session is bound to it
    Delete {
        id: String,
    },
    AssignProject {
        project_id: String,
        role: String,
        team_id: String,
    },
    StartMember {
        team_id: String,
        member_id: String,
        project_path: std::path::PathBuf,
    },
    StopMember {
        team_id: String,
        member_id: String,
    },
}

#[derive(Clone)]
pub struct NewMemberArg {
    name: String,
    role: Role,
}

fn parse_member(s: &str) -> Result<NewMemberArg, String> {
    let (name, role) = s.split_once(':').ok_or_else(|| format!("expected name:role, got '{s}'"))?;
    let role = Role::parse(role).ok_or_else(|| format!("unknown role: {role}"))?;
    Ok(NewMemberArg { name: name.to_string(), role })
}

pub async fn handle(cmd: TeamCommand, api: &CliApi, format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TeamCommand::Create { name, description, members } => {
            let members = members
                .into_iter()
                .map(|m| NewMember { name: m.name, role: m.role, system_prompt: None })
                .collect();
            output::render(api.create_team(&name, &description, members), format, |team| {
                println!("created team {} ({})", team.id, team.name);
            })
        }
        TeamCommand::List => list(api, format),
        TeamCommand::Show { id } => show(api, &id, format),
        TeamCommand::Start { id, project } => {
            let project_id = project.map(ProjectId::new);
            output::render(api.start_team(&TeamId::new(id), project_id).await, format, |outcomes| {
                for outcome in outcomes {
                    match &outcome.error {
                        Some(e) => println!("  {} FAILED: {e}", outcome.member_id),
                        None => println!("  {} started ({})", outcome.member_id, outcome.session_name.as_deref().unwrap_or("-")),
                    }
                }
            })
        }
        TeamCommand::Stop { id } => output::render(api.stop_team(&TeamId::new(id)).await, format, |outcome| {
            println!("stopped {} session(s)", outcome.sessions_stopped);
        }),
        TeamCommand::Delete { id } => output::render(api.delete_team(&TeamId::new(id)).await, format, |_| {
            println!("deleted");
        }),
        TeamCommand::AssignProject { project_id, role, team_id } => {
            let role = Role::parse(&role).ok_or_else(|| anyhow::anyhow!("unknown role: {role}"))?;
            output::render(api.assign_teams_to_project(&ProjectId::new(project_id), role, &TeamId::new(team_id)), format, |_| {
                println!("assigned");
            })
        }
        TeamCommand::StartMember { team_id, member_id, project_path } => {
            output::render(api.start_team_member(&TeamId::new(team_id), &MemberId::new(member_id), &project_path).await, format, |session| {
                println!("started session {session}");
            })
        }
        TeamCommand::StopMember { team_id, member_id } => {
            output::render(api.stop_team_member(&TeamId::new(team_id), &MemberId::new(member_id)).await, format, |_| {
                println!("stopped");
            })
        }
    }
}

fn list(api: &CliApi, format: OutputFormat) -> anyhow::Result<()> {
    let teams = api.storage().list_teams();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&teams)?),
        OutputFormat::Text => {
            let rows: Vec<Vec<String>> = teams.iter().map(|t| vec![t.id.to_string(), t.name.clone(), t.members.len().to_string(), format!("{:?}", t.status)]).collect();
            table::print(&[Column::left("ID"), Column::left("NAME"), Column::right("MEMBERS"), Column::left("STATUS")], &rows);
        }
    }
    Ok(())
}

fn show(api: &CliApi, id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let team = api.storage().get_team(&TeamId::new(id)).ok_or_else(|| anyhow::anyhow!("no such team: {id}"))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&team)?),
        OutputFormat::Text => {
            println!("{} ({}) [{:?}]", team.name, team.id, team.status);
            let rows: Vec<Vec<String>> = team
                .members
                .iter()
                .map(|m| vec![m.id.to_string(), m.name.clone(), m.role.to_string(), m.session_name.clone(), format!("{:?}", m.agent_status), format!("{:?}", m.working_status)])
                .collect();
            table::print(
                &[Column::left("ID"), Column::left("NAME"), Column::left("ROLE"), Column::left("SESSION"), Column::left("AGENT"), Column::left("WORKING")],
                &rows,
            );
        }
    }
    Ok(())
}
