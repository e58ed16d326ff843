// SPDX-License-Identifier: MIT

//! multiclauded: the orchestrator daemon binary.
//!
//! Typically started by the `multiclaude` CLI and not invoked directly. It
//! listens on a Unix socket under its state directory for commands.

use mc_daemon::{Daemon, DaemonConfig};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("multiclauded {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                println!("multiclauded {}", env!("CARGO_PKG_VERSION"));
                println!("Orchestrator daemon for multiclaude. Listens on a Unix socket.");
                return Ok(());
            }
            other => {
                eprintln!("error: unexpected argument '{other}'");
                std::process::exit(1);
            }
        }
    }

    let config = DaemonConfig::default_for_this_host();
    config.ensure_directories()?;
    let log_guard = setup_logging(&config)?;

    info!("starting multiclaude daemon");

    let daemon = match Daemon::start(config.clone()).await {
        Ok(d) => d,
        Err(mc_daemon::DaemonError::LockHeld(path, pid)) => {
            eprintln!("multiclauded is already running (pid {pid}, lock {})", path.display());
            std::process::exit(1);
        }
        Err(e) => {
            error!(error = %e, "failed to start daemon");
            drop(log_guard);
            return Err(e.into());
        }
    };

    println!("READY");
    info!(socket = %config.socket_path.display(), "daemon ready");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut poll = tokio::time::interval(std::time::Duration::from_millis(200));

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
            _ = poll.tick() => {
                if daemon.stop_was_requested() {
                    info!("stop requested over control socket");
                    break;
                }
            }
        }
    }

    daemon.stop().await;
    info!("daemon stopped");
    Ok(())
}

fn setup_logging(config: &DaemonConfig) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let parent = config.log_path.parent().unwrap_or_else(|| std::path::Path::new("."));
    std::fs::create_dir_all(parent)?;
    let file_name = config.log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("daemon.log"));
    let file_appender = tracing_appender::rolling::never(parent, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}
