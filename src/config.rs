use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Base URL of the analysis backend API.
    #[arg(long, default_value = "http://localhost:8000/api")]
    api_url: String,

    /// Maximum number of concepts requested for the graph.
    #[arg(long, default_value_t = 150)]
    limit: usize,

    /// Maximum number of reports processed by one bulk extraction.
    #[arg(long, default_value_t = 50)]
    extract_limit: usize,

    /// Seed for the initial node placement. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub graph_limit: usize,
    pub extract_limit: usize,
    pub placement_seed: Option<u64>,
    pub request_timeout: Duration,
}

impl TryFrom<Args> for Config {
    type Error = anyhow::Error;

    fn try_from(args: Args) -> Result<Self> {
        if args.limit == 0 {
            bail!("--limit must be at least 1");
        }
        if args.request_timeout_secs == 0 {
            bail!("--request-timeout-secs must be at least 1");
        }

        Ok(Self {
            api_url: args.api_url,
            graph_limit: args.limit,
            extract_limit: args.extract_limit,
            placement_seed: args.seed,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Result<Config> {
        let args = Args::try_parse_from(std::iter::once("concept-graph").chain(args.iter().copied()))?;
        Config::try_from(args)
    }

    #[test]
    fn defaults_match_backend_conventions() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_url, "http://localhost:8000/api");
        assert_eq!(config.graph_limit, 150);
        assert_eq!(config.extract_limit, 50);
        assert_eq!(config.placement_seed, None);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn flags_override_defaults() {
        let config = config(&[
            "--api-url",
            "http://backend:9000/api",
            "--limit",
            "40",
            "--seed",
            "7",
            "--request-timeout-secs",
            "5",
        ])
        .unwrap();
        assert_eq!(config.api_url, "http://backend:9000/api");
        assert_eq!(config.graph_limit, 40);
        assert_eq!(config.placement_seed, Some(7));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert!(config(&["--limit", "0"]).is_err());
    }
}
