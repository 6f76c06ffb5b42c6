//! `y1themes` - Innioasis Y1 theme gallery tooling

use clap::Parser;

use y1themes::cli::args::{Cli, Commands};
use y1themes::cli::commands;
use y1themes::error::ExitCode;
use y1themes::observability::{LogFormat, init_logging};

async fn wait_for_signal() -> i32 {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => ExitCode::INTERRUPTED,
                _ = sigterm.recv() => ExitCode::TERMINATED,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to register SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            ExitCode::INTERRUPTED
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(LogFormat::from(cli.log_format), cli.verbose, cli.color);
    }

    let result = if matches!(cli.command, Commands::Serve(_)) {
        // The preview server shuts down on the first Ctrl+C, a second
        // signal forces exit.
        tokio::spawn(async {
            wait_for_signal().await;
            eprintln!("\nShutting down... (press Ctrl+C again to force)");
            let code = wait_for_signal().await;
            std::process::exit(code);
        });
        commands::dispatch(cli).await
    } else {
        tokio::select! {
            result = commands::dispatch(cli) => result,
            code = wait_for_signal() => {
                eprintln!("\nInterrupted");
                std::process::exit(code);
            }
        }
    };

    match result {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
