// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, level from --log-level)
// 3. Either validate one llms.txt and print the report, or start the API
// 4. Exit with proper code (0 = valid, 1 = invalid document, 2 = error)
//
// All of the real work lives in the library crate (src/lib.rs).
// =============================================================================

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use llmstxt_check::checker::{FailureKind, HttpFetcher, LinkCheckResult};
use llmstxt_check::logging::init_logger;
use llmstxt_check::validator::{ValidationResult, Validator};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = document is valid (or the server shut down cleanly)
//   Ok(1) = document is invalid
//   Err   = could not run at all
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    init_logger(cli.log_level.into()).context("Failed to initialize logger")?;

    let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;
    let validator = Validator::new(Arc::new(fetcher));

    match cli.command {
        Commands::Check { url, limit, seed, random, json } => {
            let config = cli::validator_config(limit, seed, random);
            handle_check(&validator, &url, &config, json).await
        }
        Commands::Serve { host, port } => {
            llmstxt_check::server::start_server(&host, port, validator).await?;
            Ok(0)
        }
    }
}

// Handles the 'check' subcommand
async fn handle_check(
    validator: &Validator,
    url: &str,
    config: &llmstxt_check::ValidatorConfig,
    json: bool,
) -> Result<i32> {
    if !json {
        println!("🔍 Validating {}", url);
        println!("📊 Sampling up to {} link(s)\n", config.limit);
    }

    let result = validator.validate(url, config).await;

    if json {
        let json_output =
            serde_json::to_string_pretty(&result).context("Failed to serialize report")?;
        println!("{}", json_output);
    } else {
        print_report(&result);
    }

    Ok(if result.valid { 0 } else { 1 })
}

fn print_report(result: &ValidationResult) {
    if !result.link_results.is_empty() {
        print_table(&result.link_results);
    }

    if let Some(metadata) = &result.metadata {
        println!("📊 Summary:");
        println!("   📄 llms.txt size: {} tokens", metadata.size_tokens);
        println!("   🗂  Sections: {}", metadata.section_count);
        println!("   🔗 Links: {}", metadata.link_count);
        println!(
            "   ✅ Valid: {} of {} checked ({}%)",
            metadata.valid_link_count, metadata.checked_link_count, metadata.valid_percentage
        );
        println!("   ⏭️  Ignored: {}", metadata.ignored_link_count);
        if let (Some(min), Some(max), Some(avg)) = (
            metadata.min_linked_doc_tokens,
            metadata.max_linked_doc_tokens,
            metadata.avg_linked_doc_tokens,
        ) {
            println!("   📏 Linked docs: min {} / avg {} / max {} tokens", min, avg, max);
        }
        println!();
    }

    for warning in &result.warnings {
        println!("⚠️  {}", warning);
    }
    for error in &result.errors {
        println!("❌ {}", error);
    }

    if result.valid {
        println!("✅ llms.txt is valid");
    } else {
        println!("❌ llms.txt is invalid");
    }
}

// Prints link results as a human-readable table in the terminal
fn print_table(results: &[LinkCheckResult]) {
    println!("{:<60} {:<15} {:>8}  {:<30}", "URL", "STATUS", "TOKENS", "MESSAGE");
    println!("{}", "=".repeat(115));

    for result in results {
        let url_display = if result.url.chars().count() > 57 {
            let head: String = result.url.chars().take(57).collect();
            format!("{}...", head)
        } else {
            result.url.clone()
        };

        println!(
            "{:<60} {:<15} {:>8}  {:<30}",
            url_display,
            format_status(result),
            result.tokens,
            result.fail_reason
        );
    }

    println!();
}

fn format_status(result: &LinkCheckResult) -> &'static str {
    if result.ignored {
        return "⏭️  IGNORED";
    }
    match &result.failure {
        None => "✅ OK",
        Some(FailureKind::InvalidScheme) => "🚫 BAD SCHEME",
        Some(FailureKind::Timeout { .. }) => "⏱️  TIMEOUT",
        Some(FailureKind::Network { .. }) => "🌐 NETWORK",
        Some(FailureKind::HttpStatus { .. }) => "❌ BROKEN",
        Some(FailureKind::Unexpected { .. }) => "⚠️  ERROR",
        Some(FailureKind::InvalidContentType { .. }) => "📄 WRONG TYPE",
        Some(FailureKind::TooLarge { .. }) => "🐘 TOO LARGE",
    }
}
