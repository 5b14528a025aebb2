use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::{env, io, process};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use validate_env::args::Arguments;
use validate_env::checks::Tally;
use validate_env::discovery::{self, RUNTIME_MODE_VAR, SCRIPT_ROOT};
use validate_env::report::Format;
use validate_env::Options;

fn run_app() -> Result<Tally> {
    let arguments = Arguments::parse();
    let log_level = match arguments.verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    debug!("Run with {:?}", arguments);

    if arguments.no_color {
        colored::control::set_override(false);
    }

    let options = Options {
        environment: discovery::resolve_environment(
            arguments.environment,
            env::var(RUNTIME_MODE_VAR).ok(),
        ),
        script_root: (*SCRIPT_ROOT).clone(),
        cwd: env::current_dir()?,
        format: match arguments.json {
            true => Format::Json,
            false => Format::Human,
        },
    };
    debug!("Resolved {:?}", options);

    validate_env::run(&options, io::stdout().lock())
}

fn main() {
    process::exit(match run_app() {
        Ok(tally) if tally.is_success() => 0,
        Ok(_) => 1,
        Err(err) => {
            let message = err.to_string();
            let mut lines = message.lines();
            if let Some(first) = lines.next() {
                eprintln!("{}", format!("✗ Error: {}", first).red());
            }
            for line in lines {
                eprintln!("{}", line.red());
            }
            1
        }
    });
}
