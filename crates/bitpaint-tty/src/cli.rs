#![forbid(unsafe_code)]

//! Command-line argument parsing for the `bitpaint` binary.
//!
//! Parses args manually. Session defaults come from `BITPAINT_*`
//! environment variables (see [`SessionConfig::from_env`]); flags override
//! them.

use std::env;
use std::path::PathBuf;
use std::process;

use bitpaint_core::config::SessionConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
bitpaint: paint an 8x8 picture stored in a single number

USAGE:
    bitpaint [OPTIONS] [QUERY]

ARGS:
    QUERY                Startup query, e.g. 'picture=5' or '?picture=0xff'

OPTIONS:
    --no-grid            Start with gridlines hidden
    --link-base=URL      Address shareable links are built on
    --param=KEY          Query key carrying the picture (default: picture)
    --log=PATH           Write JSON logs to PATH
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    mouse drag      Paint (the first cell decides paint or erase)
    Tab             Switch between the grid and the number field
    g               Toggle gridlines
    c               Clear
    q / Esc         Quit (Esc leaves the number field first)

ENVIRONMENT VARIABLES:
    BITPAINT_SHOW_GRID     0/false/off hides gridlines
    BITPAINT_LINK_BASE     Override --link-base
    BITPAINT_PARAM         Override --param
    BITPAINT_LOG           Override --log
    BITPAINT_LOG_FILTER    tracing filter directives (default: debug)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Startup query string.
    pub query: String,
    /// Session configuration.
    pub config: SessionConfig,
    /// JSON log destination.
    pub log_path: Option<PathBuf>,
}

/// Outcome of argument parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse process arguments and environment, exiting on `--help`,
    /// `--version`, or a usage error.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match parse_args(&args, |name| env::var(name).ok()) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("bitpaint {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage.");
                process::exit(2);
            }
        }
    }
}

/// Parse `args` (without the program name) with `lookup` standing in for
/// the environment.
pub fn parse_args(
    args: &[String],
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Parsed, String> {
    let mut opts = Opts {
        query: String::new(),
        config: SessionConfig::from_lookup(&lookup),
        log_path: lookup("BITPAINT_LOG")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from),
    };

    let mut query = None;
    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Parsed::Help),
            "--version" | "-V" => return Ok(Parsed::Version),
            "--no-grid" => opts.config.show_grid = false,
            other => {
                if let Some(val) = other.strip_prefix("--link-base=") {
                    opts.config.link_base = val.to_string();
                } else if let Some(val) = other.strip_prefix("--param=") {
                    if val.is_empty() {
                        return Err("--param needs a key".to_string());
                    }
                    opts.config.param_key = val.to_string();
                } else if let Some(val) = other.strip_prefix("--log=") {
                    opts.log_path = Some(PathBuf::from(val));
                } else if other.starts_with('-') && other.len() > 1 {
                    return Err(format!("Unknown option: {other}"));
                } else if query.replace(other.to_string()).is_some() {
                    return Err(format!("Unexpected argument: {other}"));
                }
            }
        }
    }
    opts.query = query.unwrap_or_default();
    Ok(Parsed::Run(opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn run(list: &[&str]) -> Opts {
        match parse_args(&args(list), no_env) {
            Ok(Parsed::Run(opts)) => opts,
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn defaults() {
        let opts = run(&[]);
        assert_eq!(opts.query, "");
        assert_eq!(opts.config, SessionConfig::default());
        assert_eq!(opts.log_path, None);
    }

    #[test]
    fn query_and_flags() {
        let opts = run(&["--no-grid", "picture=5", "--param=p", "--log=/tmp/bp.log"]);
        assert_eq!(opts.query, "picture=5");
        assert!(!opts.config.show_grid);
        assert_eq!(opts.config.param_key, "p");
        assert_eq!(opts.log_path, Some(PathBuf::from("/tmp/bp.log")));
    }

    #[test]
    fn help_and_version_win() {
        assert_eq!(parse_args(&args(&["x", "-h"]), no_env), Ok(Parsed::Help));
        assert_eq!(parse_args(&args(&["--version"]), no_env), Ok(Parsed::Version));
    }

    #[test]
    fn usage_errors() {
        assert!(parse_args(&args(&["--bogus"]), no_env).is_err());
        assert!(parse_args(&args(&["a", "b"]), no_env).is_err());
        assert!(parse_args(&args(&["--param="]), no_env).is_err());
    }

    #[test]
    fn env_then_flags() {
        let lookup = |name: &str| match name {
            "BITPAINT_SHOW_GRID" => Some("off".to_string()),
            "BITPAINT_LINK_BASE" => Some("https://example.org/".to_string()),
            "BITPAINT_LOG" => Some("env.log".to_string()),
            _ => None,
        };
        let Ok(Parsed::Run(opts)) = parse_args(&args(&["--link-base=file:///x"]), lookup) else {
            panic!("expected Run");
        };
        assert!(!opts.config.show_grid);
        assert_eq!(opts.config.link_base, "file:///x");
        assert_eq!(opts.log_path, Some(PathBuf::from("env.log")));
    }
}
