//! basketlens: e-commerce product analysis from a CSV export
//!
//! This library loads a product/review dataset with Polars, filters it by
//! category and rating, builds the reporting views (top-rated products,
//! price vs discount, review word frequencies) and runs market-basket
//! analysis with the Apriori algorithm over a user x product incidence matrix.

pub mod basket;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod filter;
pub mod rules;
pub mod text;
pub mod views;
pub mod viz;

// Re-export public items for easier access
pub use basket::{build_incidence_matrix, IncidenceMatrix};
pub use cli::Args;
pub use dashboard::{Dashboard, DashboardConfig, DashboardReport, ViewOutcome};
pub use data::{load_product_table, Column, ProductRecord, ProductTable, Schema};
pub use error::DashboardError;
pub use filter::{apply_filters, category_options, CategorySelector, FilterParams, FilteredView};
pub use rules::{mine_rules, Apriori, AssociationRule, MiningConfig, MiningOutcome};

/// Common result type used by the application layer
pub type Result<T> = anyhow::Result<T>;
