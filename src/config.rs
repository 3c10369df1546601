use std::path::PathBuf;

use crate::client::DEFAULT_API_BASE;
use crate::error::ConfigError;
use crate::util::default_concurrency;

pub const DEFAULT_OUTPUT: &str = "output.txt";
pub const DEFAULT_LOG_DIR: &str = "logs";

pub const USAGE: &str = "Usage: warranty-scanner <serials to generate> [--output=PATH] [--jobs=N]";

/// Runtime settings assembled from the command line and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub amount: usize,
    pub output: PathBuf,
    pub concurrency: usize,
    pub api_base: String,
    pub log_dir: PathBuf,
}

impl Config {
    /// Parse `args` (without the program name). Environment overrides are read
    /// through `env` so callers decide where they come from.
    pub fn from_args<I, F>(args: I, env: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut amount = None;
        let mut output = PathBuf::from(DEFAULT_OUTPUT);
        let mut concurrency = default_concurrency();

        for arg in args {
            if let Some(path) = arg.strip_prefix("--output=") {
                output = PathBuf::from(path);
            } else if let Some(jobs) = arg.strip_prefix("--jobs=") {
                concurrency = parse_positive(jobs)
                    .ok_or_else(|| ConfigError::InvalidJobs(jobs.to_owned()))?;
            } else if arg.starts_with("--") || amount.is_some() {
                return Err(ConfigError::UnknownArgument(arg));
            } else {
                amount = Some(
                    parse_positive(&arg).ok_or_else(|| ConfigError::InvalidAmount(arg.clone()))?,
                );
            }
        }

        Ok(Self {
            amount: amount.ok_or(ConfigError::MissingAmount)?,
            output,
            concurrency,
            api_base: env("WARRANTY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_owned()),
            log_dir: env("WARRANTY_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_args(std::env::args().skip(1), |key| std::env::var(key).ok())
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_args(args(&["10"]), no_env).unwrap();
        assert_eq!(config.amount, 10);
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.concurrency, default_concurrency());
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.log_dir, PathBuf::from(DEFAULT_LOG_DIR));
    }

    #[test]
    fn flags_override_defaults() {
        let config =
            Config::from_args(args(&["--jobs=3", "5", "--output=scan.txt"]), no_env).unwrap();
        assert_eq!(config.amount, 5);
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.output, PathBuf::from("scan.txt"));
    }

    #[test]
    fn env_overrides_api_base_and_log_dir() {
        let env = |key: &str| match key {
            "WARRANTY_API_BASE" => Some("http://127.0.0.1:3000".to_owned()),
            "WARRANTY_LOG_DIR" => Some("/tmp/scanner".to_owned()),
            _ => None,
        };
        let config = Config::from_args(args(&["1"]), env).unwrap();
        assert_eq!(config.api_base, "http://127.0.0.1:3000");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/scanner"));
    }

    #[test]
    fn missing_amount_is_rejected() {
        assert_eq!(Config::from_args(args(&[]), no_env), Err(ConfigError::MissingAmount));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert_eq!(
            Config::from_args(args(&["ten"]), no_env),
            Err(ConfigError::InvalidAmount("ten".into()))
        );
        assert_eq!(
            Config::from_args(args(&["0"]), no_env),
            Err(ConfigError::InvalidAmount("0".into()))
        );
        assert_eq!(
            Config::from_args(args(&["4", "--jobs=x"]), no_env),
            Err(ConfigError::InvalidJobs("x".into()))
        );
        assert_eq!(
            Config::from_args(args(&["4", "--verbose"]), no_env),
            Err(ConfigError::UnknownArgument("--verbose".into()))
        );
        assert_eq!(
            Config::from_args(args(&["4", "5"]), no_env),
            Err(ConfigError::UnknownArgument("5".into()))
        );
    }
}
