use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const RUNTIME_MODE_VAR: &str = "NODE_ENV";

/// File names probed under each root, highest priority first
const CANDIDATE_TEMPLATES: [&str; 3] = [".env.local", ".env.<ENV>", ".env"];

lazy_static! {
    /// Parent of the directory holding the running executable
    pub static ref SCRIPT_ROOT: Option<PathBuf> = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(Path::parent).map(Path::to_path_buf));
}

/// Pick the target environment: argument, then runtime mode variable, then default.
pub fn resolve_environment(arg: Option<String>, runtime_mode: Option<String>) -> String {
    arg.into_iter()
        .chain(runtime_mode)
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned())
}

/// Ordered list of candidate files, script root first, then the working directory.
pub fn candidate_paths(script_root: Option<&Path>, cwd: &Path, environment: &str) -> Vec<PathBuf> {
    script_root
        .into_iter()
        .chain(std::iter::once(cwd))
        .flat_map(|root| {
            CANDIDATE_TEMPLATES
                .iter()
                .map(move |name| root.join(name.replace("<ENV>", environment)))
        })
        .collect()
}

/// Return the first candidate which exists; reading it is left to the parser
pub fn discover(candidates: &[PathBuf], environment: &str) -> Result<PathBuf> {
    for path in candidates {
        debug!("Probing `{}`", path.display());
        if path.exists() {
            debug!("Using `{}`", path.display());
            return Ok(path.to_owned());
        }
    }

    let tried: Vec<String> = candidates
        .iter()
        .map(|p| format!("    - {}", p.display()))
        .collect();
    Err(anyhow!(
        "No .env file found for environment: {}\n  Looked for:\n{}",
        environment,
        tried.join("\n")
    ))
}
