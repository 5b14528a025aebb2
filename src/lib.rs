//! Check that a `.env` file carries a well-formed set of configuration
//! keys before an application starts.

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod args;
pub mod checklist;
pub mod checks;
pub mod discovery;
pub mod envfile;
pub mod report;

use crate::checks::Tally;
use crate::envfile::EnvFile;
use crate::report::{Format, Report};

/// Where to look and what to validate
#[derive(PartialEq, Debug)]
pub struct Options {
    pub environment: String,
    pub script_root: Option<PathBuf>,
    pub cwd: PathBuf,
    pub format: Format,
}

/// Discover, parse, and validate; returns the counters of the finished run.
///
/// Errors are fatal and happen before any section is reported.
pub fn run<W: Write>(options: &Options, out: W) -> Result<Tally> {
    let candidates = discovery::candidate_paths(
        options.script_root.as_deref(),
        &options.cwd,
        &options.environment,
    );
    let env_file = discovery::discover(&candidates, &options.environment)?;
    let env = EnvFile::from_file(&env_file)?;

    validate_file(&env, &options.environment, &env_file, options.format, out)
}

pub fn validate_file<W: Write>(
    env: &EnvFile,
    environment: &str,
    env_file: &Path,
    format: Format,
    out: W,
) -> Result<Tally> {
    let mut report = Report::new(out, format);
    report.header(environment, env_file)?;
    let tally = checklist::validate(env, environment, &mut report)?;
    report.summary(environment, env_file)?;
    debug!("Finished with {:?}", tally);
    Ok(tally)
}
