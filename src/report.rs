use anyhow::Result;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::checks::{CheckKind, CheckRecord, Outcome, Tally};

const RULE: &str = "==========================================";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Format {
    Human,
    Json,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    section: &'a str,
    kind: CheckKind,
    variable: &'a str,
    outcome: Outcome,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    environment: &'a str,
    config_file: &'a Path,
    #[serde(flatten)]
    tally: Tally,
    success: bool,
}

/// Streams check results as they happen and keeps the counters
pub struct Report<W: Write> {
    out: W,
    format: Format,
    tally: Tally,
    section: &'static str,
}

impl<W: Write> Report<W> {
    pub fn new(out: W, format: Format) -> Report<W> {
        Report {
            out,
            format,
            tally: Tally::default(),
            section: "",
        }
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn header(&mut self, environment: &str, config_file: &Path) -> Result<()> {
        if self.format == Format::Human {
            writeln!(self.out, "{}", RULE.green())?;
            writeln!(self.out, "{}", "Frontend Environment Validation".green())?;
            writeln!(self.out, "{}", RULE.green())?;
            writeln!(self.out, "Environment: {}", environment)?;
            writeln!(self.out, "Config file: {}", config_file.display())?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    pub fn begin_section(&mut self, title: &'static str) -> Result<()> {
        self.section = title;
        if self.format == Format::Human {
            writeln!(self.out, "{}", format!("== {} ==", title).green())?;
        }
        Ok(())
    }

    pub fn end_section(&mut self) -> Result<()> {
        if self.format == Format::Human {
            writeln!(self.out)?;
        }
        Ok(())
    }

    pub fn record(&mut self, record: &CheckRecord) -> Result<()> {
        self.tally.add(record.outcome);
        match self.format {
            Format::Human => writeln!(self.out, "{}", fancy(record))?,
            Format::Json => {
                let line = serde_json::to_string(&JsonRecord {
                    section: self.section,
                    kind: record.kind,
                    variable: &record.variable,
                    outcome: record.outcome,
                    message: &record.message,
                })?;
                writeln!(self.out, "{}", line)?;
            }
        }
        Ok(())
    }

    pub fn summary(&mut self, environment: &str, config_file: &Path) -> Result<()> {
        let tally = self.tally;
        match self.format {
            Format::Human => {
                writeln!(self.out, "{}", RULE.green())?;
                writeln!(self.out, "{}", "Validation Summary".green())?;
                writeln!(self.out, "{}", RULE.green())?;
                writeln!(self.out, "{}", format!("Passed:  {}", tally.passed).green())?;
                writeln!(
                    self.out,
                    "{}",
                    highlight(format!("Failed:  {}", tally.failed), tally.failed, Outcome::Fail)
                )?;
                writeln!(
                    self.out,
                    "{}",
                    highlight(
                        format!("Warnings: {}", tally.warnings),
                        tally.warnings,
                        Outcome::Warn
                    )
                )?;
                writeln!(self.out)?;

                match tally.is_success() {
                    true => writeln!(
                        self.out,
                        "{}",
                        "✓ Validation PASSED - Environment is correctly configured".green()
                    )?,
                    false => writeln!(
                        self.out,
                        "{}",
                        "✗ Validation FAILED - Please fix the issues above".red()
                    )?,
                }
            }
            Format::Json => {
                let line = serde_json::to_string(&JsonSummary {
                    environment,
                    config_file,
                    tally,
                    success: tally.is_success(),
                })?;
                writeln!(self.out, "{}", line)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

fn paint<S: Colorize>(text: S, outcome: Outcome) -> ColoredString {
    match outcome {
        Outcome::Pass => text.green(),
        Outcome::Fail => text.red(),
        Outcome::Warn => text.yellow(),
    }
}

/// Green when zero, otherwise colored as `outcome`
fn highlight(text: String, count: usize, outcome: Outcome) -> ColoredString {
    match count {
        0 => text.green(),
        _ => paint(text.as_str(), outcome),
    }
}

fn fancy(record: &CheckRecord) -> ColoredString {
    paint(
        format!("{} {}: {}", record.outcome, record.kind, record.message).as_str(),
        record.outcome,
    )
}
