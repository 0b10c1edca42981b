//! GDP Dashboard - CSV reshape, cleaning & aggregation
//!
//! Thin command line entry point: runs the pipeline once and prints the
//! summary page and result tables.

use anyhow::{Context, Result};
use clap::Parser;
use gdp_dashboard::stats::DISPLAY_VALUE;
use gdp_dashboard::{
    CleanOptions, DashboardContext, MissingStrategy, PipelineOptions, StatsCalculator,
};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gdp_dashboard")]
#[command(about = "Reshape, clean and aggregate a wide GDP CSV", long_about = None)]
struct Cli {
    /// Wide GDP CSV (one row per country, one column per year)
    #[arg(short, long, default_value = "gdp_with_continent_filled.csv")]
    data: PathBuf,

    /// JSON config with region, operation, year and output
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Missing-value strategy: mean, median, mode, forward_fill, backward_fill
    #[arg(short, long, default_value = "mean")]
    strategy: String,

    /// Skip duplicate removal
    #[arg(long)]
    no_dedup: bool,

    /// Skip missing-value handling
    #[arg(long)]
    keep_missing: bool,

    /// Column to compare when detecting duplicates (repeatable; default: whole row)
    #[arg(long = "dedup-on")]
    dedup_on: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let strategy: MissingStrategy = cli.strategy.parse()?;

    let options = PipelineOptions {
        data_path: cli.data,
        config_path: cli.config,
        clean: CleanOptions {
            handle_missing: !cli.keep_missing,
            missing_strategy: strategy,
            remove_duplicates: !cli.no_dedup,
            duplicate_subset: (!cli.dedup_on.is_empty()).then_some(cli.dedup_on),
        },
    };

    let context = DashboardContext::run(&options).context("GDP pipeline failed")?;
    print_dashboard(&context);
    Ok(())
}

fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {title}");
    println!("{}", "=".repeat(60));
}

fn print_dashboard(context: &DashboardContext) {
    print_section("DATASET");
    let info = &context.info;
    println!("Countries: {}", info.total_countries);
    println!("Regions:   {}", info.total_regions);
    match info.year_range {
        Some((first, last)) => println!("Years:     {first}-{last} ({} columns)", info.total_years),
        None => println!("Years:     none"),
    }
    println!(
        "Records:   {} wide -> {} long",
        info.total_records_original, info.total_records_long
    );

    print_section("CLEANING SUMMARY");
    println!("{}", context.summary);

    for (name, table) in context.tables.named() {
        match StatsCalculator::with_display_values(table) {
            Ok((scaled, unit)) => {
                print_section(&format!(
                    "{name} ({}, {} in {})",
                    context.config.operation,
                    DISPLAY_VALUE,
                    unit.label()
                ));
                println!("{scaled}");
            }
            Err(err) => {
                warn!(table = name, error = %err, "could not scale table for display");
                print_section(name);
                println!("{table}");
            }
        }
    }

    print_section(&context.config.output.to_uppercase());
    print!("{}", context.executive);
}
