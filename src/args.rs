use clap::Parser;

#[derive(Parser, PartialEq, Debug)]
#[clap(author, version, about)]
pub struct Arguments {
    /// Target environment [default: $NODE_ENV or development]
    pub environment: Option<String>,

    /// Increment verbosity level once per call
    /// [error, -v: warn, -vv: info, -vvv: debug, -vvvv: trace]
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    pub verbose: u8,

    /// Disable colored output
    #[clap(long = "no-color")]
    pub no_color: bool,

    /// Print results as JSON lines
    #[clap(long = "json")]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_flags() {
        assert_eq!(
            Arguments {
                environment: None,
                verbose: 0,
                no_color: false,
                json: false,
            },
            Arguments::parse_from(&["test"])
        );

        assert_eq!(
            Arguments {
                environment: None,
                verbose: 4,
                no_color: false,
                json: false,
            },
            Arguments::parse_from(&["test", "-vvvv"])
        );

        assert_eq!(
            Arguments {
                environment: None,
                verbose: 4,
                no_color: false,
                json: false,
            },
            Arguments::parse_from(&["test", "--verbose", "-v", "-v", "--verbose"])
        );

        assert_eq!(
            Arguments {
                environment: None,
                verbose: 0,
                no_color: true,
                json: true,
            },
            Arguments::parse_from(&["test", "--no-color", "--json"])
        );
    }

    #[test]
    fn test_environment() {
        assert_eq!(
            Arguments {
                environment: Some("production".to_owned()),
                verbose: 1,
                no_color: false,
                json: false,
            },
            Arguments::parse_from(&["test", "-v", "production"])
        );
    }

    #[test]
    fn test_rejects_extra_positional() {
        assert!(Arguments::try_parse_from(&["test", "production", "staging"]).is_err());
    }
}
