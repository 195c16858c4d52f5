use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::io;
use std::process::ExitCode;

use deepsweep::cli::Cli;
use deepsweep::commands;
use deepsweep::commands::scan::OutputOptions;
use deepsweep::config::Config;
use deepsweep::scanner::CancelToken;
use deepsweep::{signals, SweepError};

/// Conventional status for a process stopped by SIGINT
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Fatal: {:#}", err);
            let cancelled = err
                .downcast_ref::<SweepError>()
                .is_some_and(SweepError::is_cancelled);
            if cancelled {
                ExitCode::from(EXIT_INTERRUPTED)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "deepsweep", &mut io::stdout());
        return Ok(());
    }

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    tracing::debug!(?config, "Loaded configuration");

    // Command line beats config file
    let mut options = config.scan_options();
    if let Some(targets) = cli.targets() {
        options = options.with_targets(targets);
    }
    if let Some(jobs) = cli.jobs {
        options = options.with_workers(jobs);
    }

    let output = OutputOptions {
        sort: cli.sort || config.output.sort,
        json: cli.json || config.output.json,
        quiet: cli.quiet,
    };

    let cancel = CancelToken::new();
    if let Err(err) = signals::install_cancel_handler(&cancel) {
        tracing::warn!(error = %err, "Could not install signal handlers, Ctrl-C will not drain the scan");
    }

    commands::scan::run(&cli.path, options, output, cancel)
}

fn init_logging(verbosity: u8, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if quiet {
        "warn"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deepsweep={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}
