//! `license-lookup`: resolve the license of loosely identified dependencies.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialise logging.
//! 2. Load config ([`config::load_config`]) and overlay credentials from the environment.
//! 3. Read the batch ([`batch::read_batch`]).
//! 4. Build the adapters and run the [`pipeline`] over the batch.
//! 5. Render the requested report ([`report`]) or the JSON response envelope.

mod batch;
mod cli;
mod config;
mod error;
mod github;
mod license;
mod models;
mod oracle;
mod pipeline;
mod registry;
mod report;
mod resolver;
mod search;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use config::{load_config, Config};
use github::GithubClient;
use models::{DependencyKind, ProcessResponse};
use oracle::gemini::GeminiGenerator;
use oracle::JsonOracle;
use pipeline::DependencyProcessor;
use registry::crates_io::CratesIo;
use registry::npm::Npm;
use registry::pypi::PyPi;
use registry::PackageRegistry;
use resolver::{LicenseResolver, NameResolver};
use search::brave::BraveSearch;
use search::google::GoogleSearch;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let working_dir = std::env::current_dir()?;
    let mut config = load_config(&working_dir, cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(concurrency) = cli.concurrency {
        config.http.concurrency = concurrency;
    }
    for missing in config.missing_credentials() {
        warn!(credential = missing, "credential not set; affected lookups will be unresolved");
    }

    let kind = DependencyKind::from(cli.kind);
    let batch = batch::read_batch(&cli.input, &kind)?;
    if batch.is_empty() {
        eprintln!("No dependencies to process");
        std::process::exit(1);
    }

    let processor = build_processor(&config)?;

    if !cli.quiet {
        eprintln!(
            "  {} {} dependencies, oracle {}",
            "→".cyan(),
            batch.len(),
            config.oracle.model
        );
    }

    let pb = if !cli.quiet {
        let pb = ProgressBar::new(batch.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let reports = processor
        .process_with(&batch, |report| {
            if let Some(pb) = &pb {
                pb.set_message(report.dep_name.clone());
                pb.inc(1);
            }
        })
        .await;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&reports, cli.show_text, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ProcessResponse::success(reports))?
            );
        }
    }

    Ok(())
}

fn build_processor(config: &Config) -> Result<DependencyProcessor> {
    let client = config.http.client()?;

    let generator = Arc::new(GeminiGenerator::new(client.clone(), config.oracle.clone()));
    let oracle = Arc::new(JsonOracle::new(generator, config.oracle.max_attempts));

    let repository_search = Arc::new(BraveSearch::new(client.clone(), config.search.brave.clone()));
    let registry_search = Arc::new(GoogleSearch::new(client.clone(), config.search.google.clone()));
    let names = NameResolver::new(oracle.clone(), repository_search, registry_search);

    let host = Arc::new(GithubClient::new(client.clone(), config.github.clone()));
    let licenses = LicenseResolver::new(oracle.clone(), host, config.github.tree_depth);

    let registries: Vec<Arc<dyn PackageRegistry>> = vec![
        Arc::new(PyPi::new(client.clone(), config.registry.pypi_url.clone())),
        Arc::new(Npm::new(client.clone(), config.registry.npm_url.clone())),
        Arc::new(CratesIo::new(client, config.registry.crates_io_url.clone())),
    ];

    Ok(DependencyProcessor::new(oracle, names, licenses, registries)
        .with_concurrency(config.http.concurrency)
        .with_item_budget(config.http.item_budget()))
}
