// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - check : validate one llms.txt URL and print the report
// - serve : start the HTTP API (GET /check)
//
// --log-level is global, so it works before or after the subcommand.
// =============================================================================

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand, ValueEnum};

use llmstxt_check::config::{
    SamplingMode, ValidatorConfig, DEFAULT_HOST, DEFAULT_LINK_LIMIT, DEFAULT_PORT,
};

#[derive(Parser, Debug)]
#[command(
    name = "llmstxt-check",
    version,
    about = "Validate llms.txt files and the documents they link to",
    long_about = "llmstxt-check fetches an llms.txt file, checks its structure, samples the \
                  documents it links to and reports whether they are reachable, plain text \
                  or markdown, and small enough to be useful to a language model."
)]
pub struct Cli {
    /// Log level written to stderr (RUST_LOG is honoured for per-module filters)
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate one llms.txt file
    ///
    /// Example: llmstxt-check check https://example.com/llms.txt --limit 20
    Check {
        /// URL of the file; must be https and end in /llms.txt
        url: String,

        /// How many linked documents to sample and check (clamped to 500)
        #[arg(
            long,
            default_value_t = DEFAULT_LINK_LIMIT,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..)
        )]
        limit: usize,

        /// Fixed seed for link sampling (default: derived from the document)
        #[arg(long, conflicts_with = "random")]
        seed: Option<u64>,

        /// Sample links with a fresh random seed on every run
        #[arg(long)]
        random: bool,

        /// Print the full report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Serve the validation API over HTTP
    ///
    /// Example: llmstxt-check serve --port 8787
    Serve {
        /// Address to bind
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        /// Port to bind
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

// Builds the run configuration from `check` flags
pub fn validator_config(limit: usize, seed: Option<u64>, random: bool) -> ValidatorConfig {
    let sampling = match (seed, random) {
        (Some(seed), _) => SamplingMode::Seeded(seed),
        (None, true) => SamplingMode::Random,
        (None, false) => SamplingMode::ContentHash,
    };
    ValidatorConfig::with_limit(limit).sampling(sampling)
}
