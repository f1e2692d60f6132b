//! basketlens: E-commerce product and review analysis
//!
//! This is the main entrypoint: it loads the dataset once, renders every
//! dashboard view for the requested filters and writes plots and tables.

use anyhow::{Context, Result};
use basketlens::dashboard::BasketReport;
use basketlens::{category_options, load_product_table, viz, Args, Dashboard, ViewOutcome};
use clap::Parser;
use std::time::Instant;
use tracing::{info, warn};

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let filter_params = args.filter_params()?;
    let config = args.dashboard_config()?;

    let start_time = Instant::now();
    info!("Loading dataset from: {}", args.input.display());
    let table = load_product_table(&args.input)?;
    info!("Loaded {} products", table.len());

    if args.list_categories {
        for option in category_options(&table) {
            println!("{}", option);
        }
        return Ok(());
    }

    println!("=== E-Commerce Product & Review Analysis ===\n");

    let dashboard = Dashboard::new(&table, config);
    let report = dashboard.render(&filter_params);

    println!("{}", report.summary);
    viz::print_product_table("Filtered Products", &report.preview);

    // Price vs discount
    match &report.price_points {
        ViewOutcome::Ready(points) => {
            std::fs::create_dir_all(&args.output_dir).with_context(|| {
                format!("creating output directory {}", args.output_dir.display())
            })?;
            let path = args.scatter_path();
            match viz::create_price_scatter(points, &path) {
                Ok(()) => println!("\nPrice vs discount plot saved to: {}", path.display()),
                Err(err) => warn!("Price vs discount plot failed: {:#}", err),
            }
        }
        ViewOutcome::Empty => println!("\nNo products with complete price data to plot."),
        ViewOutcome::Unavailable(reason) => println!("\nWarning: {}", reason),
    }

    // Top rated
    match &report.top_rated {
        ViewOutcome::Ready(rows) => viz::print_product_table("Top Rated Products", rows),
        ViewOutcome::Empty => println!("\nNo products match the current filters."),
        ViewOutcome::Unavailable(reason) => println!("\nWarning: {}", reason),
    }

    // Word cloud
    match &report.word_cloud {
        ViewOutcome::Ready(words) => {
            std::fs::create_dir_all(&args.output_dir).with_context(|| {
                format!("creating output directory {}", args.output_dir.display())
            })?;
            let path = args.word_cloud_path();
            match viz::create_word_cloud(words, &path) {
                Ok(()) => println!("\nReview word cloud saved to: {}", path.display()),
                Err(err) => warn!("Word cloud failed: {:#}", err),
            }
        }
        ViewOutcome::Empty => println!("\nNo review text to build a word cloud from."),
        ViewOutcome::Unavailable(reason) => println!("\nWarning: {}", reason),
    }

    // Market basket
    println!("\n=== Market Basket Analysis ===");
    match &report.basket {
        ViewOutcome::Ready(basket) => print_basket(&args, basket)?,
        ViewOutcome::Empty => println!(
            "No frequent itemsets found with min_support {}.",
            dashboard.config().mining.min_support
        ),
        ViewOutcome::Unavailable(reason) => println!("Warning: {}", reason),
    }

    info!(
        "Total processing time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn print_basket(args: &Args, basket: &BasketReport) -> Result<()> {
    println!(
        "{} users x {} products, {} frequent itemsets",
        basket.n_users, basket.n_products, basket.n_itemsets
    );

    if basket.rules.is_empty() {
        println!("No association rules reach the lift threshold.");
    } else {
        viz::print_rules_table(&basket.rules);
    }

    if let Some(path) = &args.rules_json {
        let json = serde_json::to_string_pretty(&basket.rules)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing rules to {}", path.display()))?;
        println!("Rules written to: {}", path.display());
    }

    Ok(())
}
