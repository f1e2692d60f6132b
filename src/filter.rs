//! Category and rating predicates over the normalized table

use crate::data::{Column, ProductRecord, ProductTable};
use crate::error::{DashboardError, Result};
use std::fmt;

/// Label of the "no restriction" category option
pub const ALL_CATEGORIES: &str = "All";

pub const DEFAULT_MIN_RATING: f64 = 4.0;

/// Category selection: everything, or one exact observed value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelector {
    #[default]
    All,
    Exact(String),
}

impl CategorySelector {
    /// Parse a selector value; "All" (any case) means no restriction
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case(ALL_CATEGORIES) {
            CategorySelector::All
        } else {
            CategorySelector::Exact(value.to_string())
        }
    }

    fn matches(&self, category: Option<&str>) -> bool {
        match self {
            CategorySelector::All => true,
            CategorySelector::Exact(wanted) => category == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategorySelector::All => f.write_str(ALL_CATEGORIES),
            CategorySelector::Exact(name) => f.write_str(name),
        }
    }
}

/// The active predicate set
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    pub category: CategorySelector,
    /// Inclusive lower bound on rating
    pub min_rating: f64,
}

impl FilterParams {
    pub fn new(category: CategorySelector, min_rating: f64) -> Result<Self> {
        if !(0.0..=5.0).contains(&min_rating) {
            return Err(DashboardError::InvalidParameter {
                name: "min_rating",
                value: min_rating.to_string(),
                constraint: "must be between 0.0 and 5.0",
            });
        }
        Ok(Self {
            category,
            min_rating,
        })
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            category: CategorySelector::All,
            min_rating: DEFAULT_MIN_RATING,
        }
    }
}

/// Rows of a `ProductTable` that satisfy a `FilterParams`
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a ProductTable,
    rows: Vec<&'a ProductRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn table(&self) -> &'a ProductTable {
        self.table
    }

    pub fn rows(&self) -> &[&'a ProductRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ProductRecord> + '_ {
        self.rows.iter().copied()
    }
}

/// Options offered by the category selector: "All" then each distinct
/// observed category in first-seen order
pub fn category_options(table: &ProductTable) -> Vec<String> {
    let mut options = vec![ALL_CATEGORIES.to_string()];
    if !table.schema().contains(Column::Category) {
        return options;
    }

    for category in table.records().iter().filter_map(|r| r.category.as_deref()) {
        if !options[1..].iter().any(|seen| seen == category) {
            options.push(category.to_string());
        }
    }
    options
}

/// Apply the category and rating predicates.
///
/// Without a category column the category predicate is skipped. A row with
/// no rating never passes the threshold.
pub fn apply_filters<'a>(table: &'a ProductTable, params: &FilterParams) -> FilteredView<'a> {
    let category_known = table.schema().contains(Column::Category);

    let rows = table
        .records()
        .iter()
        .filter(|record| !category_known || params.category.matches(record.category.as_deref()))
        .filter(|record| record.rating.is_some_and(|rating| rating >= params.min_rating))
        .collect();

    FilteredView { table, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Schema;

    fn record(category: &str, rating: Option<f64>) -> ProductRecord {
        ProductRecord {
            product_name: Some(format!("{}-{:?}", category, rating)),
            category: Some(category.to_string()),
            rating,
            ..Default::default()
        }
    }

    fn sample_table() -> ProductTable {
        ProductTable::new(
            Schema::full(),
            vec![
                record("A", Some(5.0)),
                record("B", Some(5.0)),
                record("A", Some(3.0)),
                record("A", None),
                record("B", Some(4.0)),
            ],
        )
    }

    #[test]
    fn test_category_and_rating() {
        let table = sample_table();
        let params = FilterParams::new(CategorySelector::parse("A"), 4.0).unwrap();
        let view = apply_filters(&table, &params);

        assert_eq!(view.len(), 1);
        assert_eq!(view.rows()[0].category.as_deref(), Some("A"));
        assert_eq!(view.rows()[0].rating, Some(5.0));
    }

    #[test]
    fn test_all_categories_threshold_inclusive() {
        let table = sample_table();
        let view = apply_filters(&table, &FilterParams::default());

        let ratings: Vec<f64> = view.iter().filter_map(|r| r.rating).collect();
        assert_eq!(ratings, vec![5.0, 5.0, 4.0]);
    }

    #[test]
    fn test_missing_rating_never_matches() {
        let table = sample_table();
        let params = FilterParams::new(CategorySelector::All, 0.0).unwrap();
        let view = apply_filters(&table, &params);
        assert_eq!(view.len(), 4);
        assert!(view.iter().all(|r| r.rating.is_some()));
    }

    #[test]
    fn test_category_predicate_skipped_without_column() {
        let schema = Schema::new([Column::ProductName, Column::Rating]);
        let table = ProductTable::new(
            schema,
            vec![ProductRecord {
                rating: Some(4.5),
                ..Default::default()
            }],
        );
        let params = FilterParams::new(CategorySelector::parse("Electronics"), 4.0).unwrap();
        assert_eq!(apply_filters(&table, &params).len(), 1);
    }

    #[test]
    fn test_category_options() {
        let table = sample_table();
        assert_eq!(category_options(&table), vec!["All", "A", "B"]);
    }

    #[test]
    fn test_selector_parse_and_bounds() {
        assert_eq!(CategorySelector::parse("all"), CategorySelector::All);
        assert_eq!(
            CategorySelector::parse("Home"),
            CategorySelector::Exact("Home".to_string())
        );
        assert!(FilterParams::new(CategorySelector::All, 5.1).is_err());
        assert!(FilterParams::new(CategorySelector::All, -0.1).is_err());
        assert!(FilterParams::new(CategorySelector::All, f64::NAN).is_err());
    }
}
