//! CLI argument parsing using clap

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// stubdelay - response delay distributions for mock servers
#[derive(Parser, Debug)]
#[command(name = "stubdelay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short = 'c', long, env = "STUBDELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory distribution file names are resolved against
    #[arg(long)]
    pub root_dir: Option<PathBuf>,

    /// Distribution config file, repeat in merge order (later files override earlier ones)
    #[arg(long = "distribution-file", value_name = "FILE")]
    pub distribution_files: Vec<String>,

    /// Stub mappings file to check against the distributions
    #[arg(long)]
    pub mappings: Option<PathBuf>,

    /// Skip the startup consistency check
    #[arg(long)]
    pub no_check: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load the distributions and verify every file based reference in the mappings
    Check,
    /// List the loaded distribution keys
    List {
        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sample a distribution key repeatedly and summarize the delays
    Sample {
        /// Distribution key, e.g. "GET:/api/users"
        key: String,

        /// Number of samples
        #[arg(short = 'n', long, default_value = "10000")]
        count: u64,

        /// Seed for reproducible samples
        #[arg(long)]
        seed: Option<u64>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Command::Sample { count, key, .. } = &self.command {
            if *count == 0 {
                anyhow::bail!("count must be at least 1");
            }
            if key.is_empty() {
                anyhow::bail!("key must not be empty");
            }
        }

        if let Some(name) = self.distribution_files.iter().find(|f| f.trim().is_empty()) {
            anyhow::bail!("invalid distribution file name: {:?}", name);
        }

        Ok(())
    }
}
