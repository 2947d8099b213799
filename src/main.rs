//! CLI entry point for library-dl.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use library_core::{
    BookDetails, Config, DownloadExecutor, Fetch, HttpFetcher, Identifier, MetadataResolver,
};
use tracing::debug;

mod cli;

use cli::{Args, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries results only.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let mut config =
        Config::from_env().with_timeouts(args.connect_timeout, args.read_timeout);
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url);
    }
    debug!(?config, "configuration loaded");

    let fetcher: Arc<dyn Fetch> = Arc::new(
        HttpFetcher::with_timeouts(config.connect_timeout_secs(), config.read_timeout_secs())
            .context("failed to build HTTP client")?,
    );

    match args.command {
        Command::Info { md5, json } => {
            let identifier = Identifier::parse(&md5)?;
            let details = MetadataResolver::new(config, fetcher)
                .resolve(&identifier)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&details)?);
            } else {
                print_details(&details);
            }
        }
        Command::Download { md5, output_dir } => {
            let identifier = Identifier::parse(&md5)?;
            let path = DownloadExecutor::new(config, fetcher)
                .download(&identifier, &output_dir)
                .await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn print_details(details: &BookDetails) {
    println!("Title: {}", details.title);
    let fields = [
        ("Author", &details.author),
        ("Publisher", &details.publisher),
        ("Year", &details.year),
        ("Language", &details.language),
        ("Format", &details.format),
        ("Size", &details.size),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{label}: {value}");
        }
    }

    let options = &details.download_options;
    println!("Fast mirrors ({}):", options.fast.len());
    for url in &options.fast {
        println!("  {url}");
    }
    println!("Slow mirrors ({}):", options.slow.len());
    for url in &options.slow {
        println!("  {url}");
    }
}
