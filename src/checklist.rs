use anyhow::Result;
use regex::Regex;
use std::io::Write;

use crate::checks::{self, CheckKind, CheckRecord, Outcome, Tally};
use crate::envfile::EnvFile;
use crate::report::Report;

pub const PUBLIC_PREFIX: &str = "NEXT_PUBLIC_";
pub const SECRET_KEYWORDS: [&str; 6] = ["secret", "key", "password", "token", "api_key", "auth"];

/// One check descriptor of the checklist
#[derive(PartialEq, Debug)]
pub enum Rule {
    Required(&'static str),
    Optional(&'static str),
    Boolean(&'static str),
    Url(&'static str),
    Pattern {
        var: &'static str,
        pattern: &'static str,
        description: &'static str,
    },
    MinLength {
        var: &'static str,
        min: usize,
    },
    /// Skipped when the variable is unset
    HasPrefix {
        var: &'static str,
        label: &'static str,
        prefixes: &'static [&'static str],
    },
    WarnIfEquals {
        var: &'static str,
        literal: &'static str,
        environment: &'static str,
        message: &'static str,
    },
    WarnIfUnset {
        var: &'static str,
        environment: &'static str,
        message: &'static str,
    },
    /// Skipped when the variable is unset
    OneOf {
        var: &'static str,
        allowed: &'static [&'static str],
    },
    PublicSecretScan {
        prefix: &'static str,
        keywords: &'static [&'static str],
    },
}

#[derive(PartialEq, Debug)]
pub struct Section {
    pub title: &'static str,
    /// Evaluate only when the resolved environment matches
    pub only_in: Option<&'static str>,
    pub rules: &'static [Rule],
}

impl Section {
    pub fn applies_to(&self, environment: &str) -> bool {
        self.only_in.map_or(true, |only| only == environment)
    }
}

pub static CHECKLIST: &[Section] = &[
    Section {
        title: "API Configuration",
        only_in: None,
        rules: &[
            Rule::Required("NEXT_PUBLIC_API_URL"),
            Rule::Required("NEXT_PUBLIC_API_TIMEOUT"),
            Rule::HasPrefix {
                var: "NEXT_PUBLIC_API_URL",
                label: "API URL",
                prefixes: &["http://", "https://", "/"],
            },
        ],
    },
    Section {
        title: "Application Configuration",
        only_in: None,
        rules: &[
            Rule::Required("NEXT_PUBLIC_APP_NAME"),
            Rule::Required("NEXT_PUBLIC_ENVIRONMENT"),
            Rule::Boolean("NEXT_PUBLIC_DEBUG"),
            Rule::WarnIfEquals {
                var: "NEXT_PUBLIC_DEBUG",
                literal: "true",
                environment: "production",
                message: "DEBUG is enabled in production!",
            },
        ],
    },
    Section {
        title: "Feature Flags",
        only_in: None,
        rules: &[
            Rule::Boolean("NEXT_PUBLIC_FEATURE_SMS"),
            Rule::Boolean("NEXT_PUBLIC_FEATURE_REPORTS"),
            Rule::Boolean("NEXT_PUBLIC_FEATURE_ADVANCED_FILTERS"),
            Rule::Boolean("NEXT_PUBLIC_FEATURE_CUSTOMER_MGMT"),
        ],
    },
    Section {
        title: "UI Configuration",
        only_in: None,
        rules: &[
            Rule::Required("NEXT_PUBLIC_ITEMS_PER_PAGE"),
            Rule::Boolean("NEXT_PUBLIC_EXPERIMENTAL_FEATURES"),
        ],
    },
    Section {
        title: "Analytics Configuration",
        only_in: None,
        rules: &[
            Rule::Optional("NEXT_PUBLIC_GA_ID"),
            Rule::Optional("NEXT_PUBLIC_SENTRY_DSN"),
            Rule::WarnIfUnset {
                var: "NEXT_PUBLIC_GA_ID",
                environment: "production",
                message: "Google Analytics not configured in production",
            },
            Rule::WarnIfUnset {
                var: "NEXT_PUBLIC_SENTRY_DSN",
                environment: "production",
                message: "Sentry error tracking not configured in production",
            },
        ],
    },
    Section {
        title: "Server-Side Configuration",
        only_in: None,
        rules: &[
            Rule::Required("API_SECRET_URL"),
            Rule::Optional("TOKEN_STORAGE"),
            Rule::OneOf {
                var: "TOKEN_STORAGE",
                allowed: &["localStorage", "sessionStorage"],
            },
        ],
    },
    Section {
        title: "Security Configuration",
        only_in: None,
        rules: &[
            Rule::Boolean("CSP_REPORT_ONLY"),
            Rule::Boolean("SECURITY_HEADERS_TEST"),
            Rule::WarnIfEquals {
                var: "CSP_REPORT_ONLY",
                literal: "true",
                environment: "production",
                message: "CSP_REPORT_ONLY is enabled in production (CSP not enforced)",
            },
        ],
    },
    Section {
        title: "Development Tools",
        only_in: Some("development"),
        rules: &[
            Rule::Boolean("ENABLE_REQUEST_LOGGING"),
            Rule::Boolean("ENABLE_QUERY_LOGGING"),
            Rule::Boolean("MOCK_API"),
        ],
    },
    Section {
        title: "Security Validation",
        only_in: None,
        rules: &[Rule::PublicSecretScan {
            prefix: PUBLIC_PREFIX,
            keywords: &SECRET_KEYWORDS,
        }],
    },
];

/// Set and non-empty
fn present<'a>(env: &'a EnvFile, var: &str) -> Option<&'a str> {
    env.get(var).filter(|v| !v.is_empty())
}

/// "a, b, or c"
fn either(items: &[&str], quote: bool) -> String {
    let items: Vec<String> = items
        .iter()
        .map(|i| match quote {
            true => format!("'{}'", i),
            false => i.to_string(),
        })
        .collect();
    match items.len() {
        0 => String::new(),
        1 => items[0].clone(),
        2 => format!("{} or {}", items[0], items[1]),
        n => format!("{}, or {}", items[..n - 1].join(", "), items[n - 1]),
    }
}

impl Rule {
    /// Evaluate against a snapshot; ad-hoc rules may yield no record at all.
    pub fn evaluate(&self, env: &EnvFile, environment: &str) -> Vec<CheckRecord> {
        match *self {
            Rule::Required(var) => vec![checks::required(var, env.get(var))],
            Rule::Optional(var) => vec![checks::optional(var, env.get(var))],
            Rule::Boolean(var) => vec![checks::boolean(var, env.get(var))],
            Rule::Url(var) => vec![checks::url(var, env.get(var))],
            Rule::Pattern {
                var,
                pattern,
                description,
            } => match Regex::new(pattern) {
                Ok(re) => vec![checks::pattern(var, env.get(var), &re, description)],
                Err(err) => vec![CheckRecord::new(
                    CheckKind::Pattern,
                    var,
                    Outcome::Fail,
                    format!("{} cannot be checked, invalid pattern: {}", var, err),
                )],
            },
            Rule::MinLength { var, min } => vec![checks::min_length(var, env.get(var), min)],
            Rule::HasPrefix {
                var,
                label,
                prefixes,
            } => match present(env, var) {
                None => vec![],
                Some(value) if prefixes.iter().any(|p| value.starts_with(p)) => {
                    vec![CheckRecord::new(
                        CheckKind::UrlFormat,
                        var,
                        Outcome::Pass,
                        format!("{} is valid", label),
                    )]
                }
                Some(_) => vec![CheckRecord::new(
                    CheckKind::UrlFormat,
                    var,
                    Outcome::Fail,
                    format!("{} should start with {}", label, either(prefixes, false)),
                )],
            },
            Rule::WarnIfEquals {
                var,
                literal,
                environment: target,
                message,
            } => {
                if environment == target && env.get(var) == Some(literal) {
                    vec![CheckRecord::new(
                        CheckKind::Warning,
                        var,
                        Outcome::Warn,
                        message,
                    )]
                } else {
                    vec![]
                }
            }
            Rule::WarnIfUnset {
                var,
                environment: target,
                message,
            } => {
                if environment == target && present(env, var).is_none() {
                    vec![CheckRecord::new(
                        CheckKind::Warning,
                        var,
                        Outcome::Warn,
                        message,
                    )]
                } else {
                    vec![]
                }
            }
            Rule::OneOf { var, allowed } => match present(env, var) {
                None => vec![],
                Some(value) if allowed.contains(&value) => vec![CheckRecord::new(
                    CheckKind::Storage,
                    var,
                    Outcome::Pass,
                    format!("{} = {}", var, value),
                )],
                Some(_) => vec![CheckRecord::new(
                    CheckKind::Storage,
                    var,
                    Outcome::Fail,
                    format!("{} must be {}", var, either(allowed, true)),
                )],
            },
            Rule::PublicSecretScan { prefix, keywords } => {
                let mut records: Vec<CheckRecord> = env
                    .keys()
                    .filter(|key| key.starts_with(prefix))
                    .filter(|key| {
                        let lower = key.to_lowercase();
                        keywords.iter().any(|k| lower.contains(k))
                    })
                    .map(|key| {
                        CheckRecord::new(
                            CheckKind::Security,
                            key,
                            Outcome::Fail,
                            format!(
                                "Secret '{}' should not be {} (visible to users)",
                                key, prefix
                            ),
                        )
                    })
                    .collect();

                if records.is_empty() {
                    records.push(CheckRecord::new(
                        CheckKind::Security,
                        prefix,
                        Outcome::Pass,
                        format!("No secrets found in {} variables", prefix),
                    ));
                }
                records
            }
        }
    }
}

/// Run every applicable section in order and stream the results into `report`.
///
/// A failing check never stops the run.
pub fn validate<W: Write>(
    env: &EnvFile,
    environment: &str,
    report: &mut Report<W>,
) -> Result<Tally> {
    for section in CHECKLIST.iter().filter(|s| s.applies_to(environment)) {
        report.begin_section(section.title)?;
        for rule in section.rules {
            for record in rule.evaluate(env, environment) {
                report.record(&record)?;
            }
        }
        report.end_section()?;
    }

    Ok(report.tally())
}
