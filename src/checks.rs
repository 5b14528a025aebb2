use regex::Regex;
use serde::Serialize;
use std::fmt;
use url::Url;

const BOOLEAN_LITERALS: [&str; 8] = ["true", "false", "True", "False", "TRUE", "FALSE", "0", "1"];
const URL_BASE: &str = "http://localhost/";

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Warn,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Pass => "✓",
            Outcome::Fail => "✗",
            Outcome::Warn => "⚠",
        })
    }
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Required,
    Optional,
    Boolean,
    Url,
    Pattern,
    Length,
    UrlFormat,
    Storage,
    Warning,
    Security,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckKind::Required => "REQUIRED",
            CheckKind::Optional => "OPTIONAL",
            CheckKind::Boolean => "BOOLEAN",
            CheckKind::Url => "URL",
            CheckKind::Pattern => "PATTERN",
            CheckKind::Length => "LENGTH",
            CheckKind::UrlFormat => "URL_FORMAT",
            CheckKind::Storage => "STORAGE",
            CheckKind::Warning => "WARNING",
            CheckKind::Security => "SECURITY",
        })
    }
}

/// Result of a single check, printed as one report line
#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
pub struct CheckRecord {
    pub kind: CheckKind,
    pub variable: String,
    pub outcome: Outcome,
    pub message: String,
}

impl CheckRecord {
    pub fn new<V, M>(kind: CheckKind, variable: V, outcome: Outcome, message: M) -> CheckRecord
    where
        V: Into<String>,
        M: Into<String>,
    {
        CheckRecord {
            kind,
            variable: variable.into(),
            outcome,
            message: message.into(),
        }
    }
}

/// Run-scoped pass/fail/warning counters
#[derive(Serialize, Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl Tally {
    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail => self.failed += 1,
            Outcome::Warn => self.warnings += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.warnings
    }

    /// Warnings never count against success
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn shown(value: Option<&str>) -> &str {
    value.unwrap_or("<unset>")
}

pub fn required(var: &str, value: Option<&str>) -> CheckRecord {
    if is_blank(value) {
        return CheckRecord::new(
            CheckKind::Required,
            var,
            Outcome::Fail,
            format!("{} is not set", var),
        );
    }
    CheckRecord::new(
        CheckKind::Required,
        var,
        Outcome::Pass,
        format!("{} is set", var),
    )
}

pub fn optional(var: &str, value: Option<&str>) -> CheckRecord {
    if is_blank(value) {
        return CheckRecord::new(
            CheckKind::Optional,
            var,
            Outcome::Warn,
            format!("{} is not set (using default)", var),
        );
    }
    CheckRecord::new(
        CheckKind::Optional,
        var,
        Outcome::Pass,
        format!("{} is set", var),
    )
}

pub fn boolean(var: &str, value: Option<&str>) -> CheckRecord {
    match value {
        Some(v) if BOOLEAN_LITERALS.contains(&v) => CheckRecord::new(
            CheckKind::Boolean,
            var,
            Outcome::Pass,
            format!("{} = {}", var, v),
        ),
        _ => CheckRecord::new(
            CheckKind::Boolean,
            var,
            Outcome::Fail,
            format!(
                "{} has invalid value '{}' (must be true/false)",
                var,
                shown(value)
            ),
        ),
    }
}

/// Absolute URLs and paths relative to `http://localhost/` are both accepted
pub fn url(var: &str, value: Option<&str>) -> CheckRecord {
    let parsed = value.map(|v| Url::parse(URL_BASE).and_then(|base| base.join(v)));
    match parsed {
        Some(Ok(_)) => CheckRecord::new(
            CheckKind::Url,
            var,
            Outcome::Pass,
            format!("{} is valid", var),
        ),
        _ => CheckRecord::new(
            CheckKind::Url,
            var,
            Outcome::Fail,
            format!("{} has invalid URL '{}'", var, shown(value)),
        ),
    }
}

pub fn pattern(var: &str, value: Option<&str>, re: &Regex, description: &str) -> CheckRecord {
    match value {
        Some(v) if re.is_match(v) => CheckRecord::new(
            CheckKind::Pattern,
            var,
            Outcome::Pass,
            format!("{} is valid", var),
        ),
        _ => CheckRecord::new(
            CheckKind::Pattern,
            var,
            Outcome::Fail,
            format!("{} doesn't match {}", var, description),
        ),
    }
}

pub fn min_length(var: &str, value: Option<&str>, min: usize) -> CheckRecord {
    let length = value.map_or(0, |v| v.chars().count());
    if value.is_none() || length < min {
        return CheckRecord::new(
            CheckKind::Length,
            var,
            Outcome::Fail,
            format!(
                "{} is too short (minimum {} characters, got {})",
                var, min, length
            ),
        );
    }
    CheckRecord::new(
        CheckKind::Length,
        var,
        Outcome::Pass,
        format!("{} is sufficient ({} chars)", var, length),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required("A", Some("x")).outcome, Outcome::Pass);
        assert_eq!(required("A", None).outcome, Outcome::Fail);
        assert_eq!(required("A", Some("")).outcome, Outcome::Fail);
        assert_eq!(required("A", Some(" \t ")).outcome, Outcome::Fail);
        assert_eq!(required("A", None).message, "A is not set");
    }

    #[test]
    fn test_optional() {
        assert_eq!(optional("A", Some("x")).outcome, Outcome::Pass);
        assert_eq!(optional("A", None).outcome, Outcome::Warn);
        assert_eq!(optional("A", Some("  ")).outcome, Outcome::Warn);
    }

    #[test]
    fn test_boolean() {
        for v in BOOLEAN_LITERALS {
            assert_eq!(boolean("FLAG", Some(v)).outcome, Outcome::Pass, "{}", v);
        }
        for v in ["2", "yes", "tRue", " true", ""] {
            assert_eq!(boolean("FLAG", Some(v)).outcome, Outcome::Fail, "{}", v);
        }

        let record = boolean("FLAG", None);
        assert_eq!(record.outcome, Outcome::Fail);
        assert_eq!(
            record.message,
            "FLAG has invalid value '<unset>' (must be true/false)"
        );
    }

    #[test]
    fn test_url() {
        assert_eq!(
            url("U", Some("https://api.example.com/v1")).outcome,
            Outcome::Pass
        );
        assert_eq!(url("U", Some("/api")).outcome, Outcome::Pass);
        assert_eq!(url("U", Some("relative/path")).outcome, Outcome::Pass);
        assert_eq!(url("U", Some("http://[::1")).outcome, Outcome::Fail);
        assert_eq!(url("U", None).outcome, Outcome::Fail);
    }

    #[test]
    fn test_pattern() {
        let re = Regex::new(r"^G-[A-Z0-9]+$").unwrap();
        assert_eq!(
            pattern("GA", Some("G-ABC123"), &re, "G-XXXX").outcome,
            Outcome::Pass
        );

        let record = pattern("GA", Some("UA-1"), &re, "G-XXXX");
        assert_eq!(record.outcome, Outcome::Fail);
        assert_eq!(record.message, "GA doesn't match G-XXXX");

        assert_eq!(pattern("GA", None, &re, "G-XXXX").outcome, Outcome::Fail);
    }

    #[test]
    fn test_min_length() {
        assert_eq!(min_length("S", Some("abcd"), 4).outcome, Outcome::Pass);
        assert_eq!(min_length("S", Some("héé"), 3).outcome, Outcome::Pass);

        let record = min_length("S", Some("abc"), 4);
        assert_eq!(record.outcome, Outcome::Fail);
        assert_eq!(
            record.message,
            "S is too short (minimum 4 characters, got 3)"
        );

        assert_eq!(min_length("S", None, 0).outcome, Outcome::Fail);
    }

    #[test]
    fn test_tally() {
        let mut tally = Tally::default();
        assert!(tally.is_success());

        tally.add(Outcome::Pass);
        tally.add(Outcome::Warn);
        tally.add(Outcome::Warn);
        assert!(tally.is_success());

        tally.add(Outcome::Fail);
        assert!(!tally.is_success());
        assert_eq!(
            tally,
            Tally {
                passed: 1,
                failed: 1,
                warnings: 2
            }
        );
        assert_eq!(tally.total(), 4);
    }
}
