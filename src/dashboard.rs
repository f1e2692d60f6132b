//! One render of the dashboard: every view computed in isolation

use crate::basket::{build_incidence_matrix, IncidenceMatrix};
use crate::data::ProductTable;
use crate::error::Result;
use crate::filter::{apply_filters, FilterParams};
use crate::rules::{mine_rules, AssociationRule, MiningConfig, MiningOutcome};
use crate::text::{word_frequencies, WordCount, DEFAULT_MAX_WORDS};
use crate::views::{
    preview, price_points, review_corpus, summary_line, top_rated, PricePoint, ProductSummary,
    DEFAULT_PREVIEW_ROWS, DEFAULT_TOP_N,
};
use tracing::{info, warn};

/// Tunables for a render
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub top_n: usize,
    pub preview_rows: usize,
    pub max_words: usize,
    pub mining: MiningConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            max_words: DEFAULT_MAX_WORDS,
            mining: MiningConfig::default(),
        }
    }
}

/// What a single view produced
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome<T> {
    Ready(T),
    /// Computed fine but has nothing to show
    Empty,
    /// Skipped, with the reason (usually a missing column)
    Unavailable(String),
}

impl<T> ViewOutcome<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewOutcome::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ViewOutcome::Unavailable(_))
    }

    /// Wrap a view result, treating an empty collection as `Empty` and any
    /// error as `Unavailable`
    fn from_result(view: &str, result: Result<T>, is_empty: impl FnOnce(&T) -> bool) -> Self {
        match result {
            Ok(value) if is_empty(&value) => {
                info!("{}: no rows to show", view);
                ViewOutcome::Empty
            }
            Ok(value) => ViewOutcome::Ready(value),
            Err(err) => {
                warn!("{}", err);
                ViewOutcome::Unavailable(err.to_string())
            }
        }
    }
}

/// Market basket results
#[derive(Debug, Clone, PartialEq)]
pub struct BasketReport {
    pub n_users: usize,
    pub n_products: usize,
    pub n_itemsets: usize,
    pub rules: Vec<AssociationRule>,
}

/// Everything one render produces
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    pub summary: String,
    pub preview: Vec<ProductSummary>,
    pub price_points: ViewOutcome<Vec<PricePoint>>,
    pub top_rated: ViewOutcome<Vec<ProductSummary>>,
    pub word_cloud: ViewOutcome<Vec<WordCount>>,
    /// `Empty` means no itemset reached the support threshold
    pub basket: ViewOutcome<BasketReport>,
}

/// The loaded table and render settings
#[derive(Debug, Clone)]
pub struct Dashboard<'a> {
    table: &'a ProductTable,
    config: DashboardConfig,
}

impl<'a> Dashboard<'a> {
    pub fn new(table: &'a ProductTable, config: DashboardConfig) -> Self {
        Self { table, config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Recompute every view for `params`.
    ///
    /// The filtered subset feeds the preview, price and top-rated views; the
    /// word cloud and basket analysis always use the full table.
    pub fn render(&self, params: &FilterParams) -> DashboardReport {
        let view = apply_filters(self.table, params);
        let summary = summary_line(&view, params);
        info!("{}", summary);

        let price_points = ViewOutcome::from_result(
            crate::views::PRICE_VIEW,
            price_points(&view),
            Vec::is_empty,
        );
        let top_rated = ViewOutcome::from_result(
            crate::views::TOP_RATED_VIEW,
            top_rated(&view, self.config.top_n),
            Vec::is_empty,
        );
        let word_cloud = ViewOutcome::from_result(
            crate::views::REVIEW_TEXT_VIEW,
            review_corpus(self.table).map(|corpus| word_frequencies(&corpus, self.config.max_words)),
            Vec::is_empty,
        );

        DashboardReport {
            summary,
            preview: preview(&view, self.config.preview_rows),
            price_points,
            top_rated,
            word_cloud,
            basket: self.basket(),
        }
    }

    fn basket(&self) -> ViewOutcome<BasketReport> {
        let mined = build_incidence_matrix(self.table).and_then(|matrix| {
            let outcome = mine_rules(&matrix, &self.config.mining)?;
            Ok((matrix, outcome))
        });

        match mined {
            Ok((_, MiningOutcome::NoFrequentItemsets)) => {
                info!(
                    "No frequent itemsets found with min_support {}",
                    self.config.mining.min_support
                );
                ViewOutcome::Empty
            }
            Ok((matrix, MiningOutcome::Rules { itemsets, rules })) => {
                ViewOutcome::Ready(basket_report(&matrix, itemsets.len(), rules))
            }
            Err(err) => {
                warn!("{}", err);
                ViewOutcome::Unavailable(err.to_string())
            }
        }
    }
}

fn basket_report(
    matrix: &IncidenceMatrix,
    n_itemsets: usize,
    rules: Vec<AssociationRule>,
) -> BasketReport {
    BasketReport {
        n_users: matrix.n_users(),
        n_products: matrix.n_products(),
        n_itemsets,
        rules,
    }
}
