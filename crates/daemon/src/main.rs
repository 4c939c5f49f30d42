// SPDX-License-Identifier: MIT

//! AgentMux Daemon (amxd)
//!
//! Long-running host process for the Orchestration API: owns storage, the
//! session adapter, the Scheduler's boot-time re-arm, and the Activity
//! Monitor loop. `amx` (the CLI) talks to a `Storage` root directly rather
//! than to this process — there is no IPC transport in scope here (spec
//! §6, §9).

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use amx_daemon::{env, Daemon};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("amxd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("amxd {}", env!("CARGO_PKG_VERSION"));
                println!("AgentMux daemon — hosts the orchestration engine's background loops.");
                println!();
                println!("USAGE:");
                println!("    amxd");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: amxd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let _log_guard = setup_logging()?;
    info!("starting agentmux daemon");

    let daemon = match Daemon::start() {
        Ok(d) => d,
        Err(e) => {
            error!(error = %e, "failed to start daemon");
            return Err(e.into());
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("daemon ready");
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    daemon.shutdown();
    info!("daemon stopped");
    Ok(())
}

fn setup_logging() -> Result<tracing_appender::non_blocking::WorkerGuard, std::io::Error> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = env::log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "amxd.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}
