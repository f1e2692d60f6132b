//! Command-line interface definitions and argument parsing

use crate::dashboard::DashboardConfig;
use crate::filter::{CategorySelector, FilterParams};
use crate::rules::MiningConfig;
use clap::Parser;
use std::path::PathBuf;

/// E-commerce product analysis: filters, price views, review word cloud and
/// market-basket association rules
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file
    #[arg(short, long, default_value = "amazon.csv")]
    pub input: PathBuf,

    /// Category to show, or "All"
    #[arg(short, long, default_value = "All")]
    pub category: String,

    /// Minimum product rating (0.0 - 5.0, inclusive)
    #[arg(short = 'r', long, default_value = "4.0")]
    pub min_rating: f64,

    /// Number of rows in the top-rated table
    #[arg(long, default_value = "10")]
    pub top_n: usize,

    /// Number of filtered rows to preview
    #[arg(long, default_value = "10")]
    pub preview_rows: usize,

    /// Minimum itemset support for market-basket analysis
    #[arg(long, default_value = "0.005")]
    pub min_support: f64,

    /// Minimum lift for association rules
    #[arg(long, default_value = "1.0")]
    pub min_lift: f64,

    /// Largest itemset size to mine (unbounded when omitted)
    #[arg(long)]
    pub max_len: Option<usize>,

    /// Maximum number of words in the review word cloud
    #[arg(long, default_value = "200")]
    pub max_words: usize,

    /// Directory for the generated plots
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Also write the association rules as JSON to this path
    #[arg(long)]
    pub rules_json: Option<PathBuf>,

    /// Print the available categories and exit
    #[arg(long)]
    pub list_categories: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Validated filter predicates from the category and rating flags
    pub fn filter_params(&self) -> crate::Result<FilterParams> {
        Ok(FilterParams::new(
            CategorySelector::parse(&self.category),
            self.min_rating,
        )?)
    }

    /// Validated render settings
    pub fn dashboard_config(&self) -> crate::Result<DashboardConfig> {
        if self.top_n == 0 {
            anyhow::bail!("--top-n must be at least 1");
        }

        let mining = MiningConfig {
            min_support: self.min_support,
            min_lift: self.min_lift,
            max_len: self.max_len,
        };
        mining.validate()?;

        Ok(DashboardConfig {
            top_n: self.top_n,
            preview_rows: self.preview_rows,
            max_words: self.max_words,
            mining,
        })
    }

    pub fn scatter_path(&self) -> PathBuf {
        self.output_dir.join("price_vs_discount.png")
    }

    pub fn word_cloud_path(&self) -> PathBuf {
        self.output_dir.join("review_wordcloud.png")
    }
}
