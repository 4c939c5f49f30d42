// SPDX-License-Identifier: MIT

//! `amx project` — projects have no C9 operation of their own (spec §4.9
//! lists no `registerProject`); the CLI talks to `Storage` directly, the
//! same way the integration tests seed a project.

use crate::context::CliApi;
use crate::output::OutputFormat;
use crate::table::{self, Column};
use amx_core::id::IdGen;
use amx_core::project::{Project, ProjectId};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Register a project at a path on disk
    Add {
        name: String,
        path: PathBuf,
    },
    /// List known projects
    List,
    Show {
        id: String,
    },
}

pub fn handle(cmd: ProjectCommand, api: &CliApi, format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProjectCommand::Add { name, path } => add(api, &name, path, format),
        ProjectCommand::List => list(api, format),
        ProjectCommand::Show { id } => show(api, &id, format),
    }
}

fn add(api: &CliApi, name: &str, path: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let canonical = std::fs::canonicalize(&path).map_err(|e| anyhow::anyhow!("cannot resolve project path '{}': {e}", path.display()))?;
    let project = Project::new(ProjectId::new(api.id_gen().next()), name, canonical, api.clock());
    api.storage().save_project(&project)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&project)?),
        OutputFormat::Text => println!("created project {} ({})", project.id, project.name),
    }
    Ok(())
}

fn list(api: &CliApi, format: OutputFormat) -> anyhow::Result<()> {
    let projects = api.storage().list_projects();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&projects)?),
        OutputFormat::Text => {
            let rows: Vec<Vec<String>> = projects
                .iter()
                .map(|p| vec![p.id.to_string(), p.name.clone(), p.path.display().to_string(), format!("{:?}", p.status)])
                .collect();
            table::print(&[Column::left("ID"), Column::left("NAME"), Column::left("PATH"), Column::left("STATUS")], &rows);
        }
    }
    Ok(())
}

fn show(api: &CliApi, id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let project = api.storage().get_project(&ProjectId::new(id)).ok_or_else(|| anyhow::anyhow!("no such project: {id}"))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&project)?),
        OutputFormat::Text => {
            println!("{} ({})", project.name, project.id);
            println!("  path:   {}", project.path.display());
            println!("  status: {:?}", project.status);
            for (role, teams) in &project.teams {
                println!("  {role}: {}", teams.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "));
            }
        }
    }
    Ok(())
}
