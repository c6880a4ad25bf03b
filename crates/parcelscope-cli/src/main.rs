//! # parcelscope CLI entry point
//!
//! Parses command-line arguments and dispatches to the four engine
//! operations. Results print as pretty JSON on stdout; diagnostics go
//! to stderr through `tracing`.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use parcelscope_comps::{CompsEngine, ComparablesQuery, PropertyQuery, SalesQuery};
use parcelscope_registry::{RegistryClient, RegistryConfig};

/// Parcelscope — property intelligence from the public registries.
///
/// Resolves properties, searches recorded sales, discovers and scores
/// comparable transactions, and aggregates tax benefits. Registry
/// endpoints and the optional app token come from the environment
/// (`PSCOPE_*` variables).
#[derive(Parser, Debug)]
#[command(name = "parcelscope", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve an address to its canonical parcel record.
    Property(PropertyArgs),

    /// Search recorded sales by address or BBL.
    Sales(SalesArgs),

    /// Discover and rank comparable sales for a subject property.
    Comps(CompsArgs),

    /// Aggregate tax exemptions and abatements for a BBL.
    Benefits(BenefitsArgs),
}

#[derive(Args, Debug)]
struct PropertyArgs {
    /// Street address of the subject property.
    address: String,

    /// Borough name, abbreviation, or digit.
    #[arg(long)]
    borough: Option<String>,

    /// Also assess rent-regulation likelihood.
    #[arg(long)]
    regulation: bool,
}

#[derive(Args, Debug)]
struct SalesArgs {
    /// Street address to search for.
    #[arg(long, conflicts_with = "bbl")]
    address: Option<String>,

    /// Packed 10-digit BBL to search for.
    #[arg(long)]
    bbl: Option<String>,

    /// Borough name, abbreviation, or digit.
    #[arg(long)]
    borough: Option<String>,

    /// Minimum sale price.
    #[arg(long)]
    min_price: Option<f64>,

    /// Maximum sale price.
    #[arg(long)]
    max_price: Option<f64>,

    /// Maximum rows to return.
    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Args, Debug)]
struct CompsArgs {
    /// Street address of the subject property.
    address: String,

    /// Borough name, abbreviation, or digit.
    #[arg(long)]
    borough: Option<String>,

    /// Number of comparables to return (max 50, default 10).
    #[arg(long)]
    count: Option<usize>,

    /// Restrict to the subject's own market area (skip adjacent areas).
    #[arg(long)]
    same_area_only: bool,
}

#[derive(Args, Debug)]
struct BenefitsArgs {
    /// Packed 10-digit BBL (borough + block + lot).
    bbl: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let config = RegistryConfig::from_env()?;
    tracing::debug!(?config, "registry configuration loaded");
    let engine = CompsEngine::new(RegistryClient::new(config)?);

    match command {
        Commands::Property(args) => {
            let report = engine
                .resolve_property(&PropertyQuery {
                    address: args.address,
                    borough: args.borough,
                    assess_regulation: args.regulation,
                })
                .await?;
            print_json(&report)
        }
        Commands::Sales(args) => {
            let records = engine
                .search_sales(&SalesQuery {
                    address: args.address,
                    bbl: args.bbl,
                    borough: args.borough,
                    min_price: args.min_price,
                    max_price: args.max_price,
                    limit: args.limit,
                })
                .await?;
            print_json(&records)
        }
        Commands::Comps(args) => {
            let report = engine
                .find_comparables(&ComparablesQuery {
                    address: args.address,
                    borough: args.borough,
                    count: args.count,
                    include_adjacent: !args.same_area_only,
                })
                .await?;
            print_json(&report)
        }
        Commands::Benefits(args) => {
            let summary = engine.tax_benefits(&args.bbl).await?;
            print_json(&summary)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
