//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutionMode {
    /// Preview (default) - simulate callers resolving every parameter
    Preview,
    /// Validate - parse, validate and initialize every provider
    Validate,
    /// Distribute - split the plan across agents and print per-agent plans
    Distribute,
}

/// paramfeed - parameter data providers for load tests
#[derive(Parser, Debug)]
#[command(name = "paramfeed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Parameter plan (TOML)
    #[arg(value_name = "PLAN")]
    pub plan: PathBuf,

    /// Execution mode: preview, validate, or distribute
    #[arg(long, value_enum, default_value = "preview")]
    pub mode: ExecutionMode,

    /// Number of simulated callers (defaults to the number of CPUs)
    #[arg(short = 'c', long, env = "PARAMFEED_CALLERS")]
    pub callers: Option<usize>,

    /// Invocations resolved by each caller
    #[arg(short = 'n', long, default_value = "5")]
    pub invocations: usize,

    /// Number of agents to split the plan across (distribute mode)
    #[arg(long, default_value = "2")]
    pub agents: usize,

    /// Print the preview as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the JSON preview to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.callers == Some(0) {
            anyhow::bail!("--callers must be at least 1");
        }
        if self.invocations == 0 {
            anyhow::bail!("--invocations must be at least 1");
        }
        if self.mode == ExecutionMode::Distribute && self.agents == 0 {
            anyhow::bail!("--agents must be at least 1");
        }
        Ok(())
    }

    /// Number of simulated callers, falling back to the CPU count
    pub fn effective_callers(&self) -> usize {
        self.callers.unwrap_or_else(num_cpus::get).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["paramfeed", "plan.toml"]).unwrap();
        assert_eq!(cli.mode, ExecutionMode::Preview);
        assert_eq!(cli.invocations, 5);
        assert!(!cli.json);
        assert!(cli.validate().is_ok());
        assert!(cli.effective_callers() >= 1);
    }

    #[test]
    fn test_distribute_mode() {
        let cli = Cli::try_parse_from(["paramfeed", "plan.toml", "--mode", "distribute", "--agents", "3"])
            .unwrap();
        assert_eq!(cli.mode, ExecutionMode::Distribute);
        assert_eq!(cli.agents, 3);
    }

    #[test]
    fn test_validate_rejects_zero() {
        let cli = Cli::try_parse_from(["paramfeed", "plan.toml", "--invocations", "0"]).unwrap();
        assert!(cli.validate().is_err());

        let cli = Cli::try_parse_from(["paramfeed", "plan.toml", "--callers", "0"]).unwrap();
        assert!(cli.validate().is_err());
    }
}
