//! Read-only reporting views over the filtered subset and the full table

use crate::data::{Column, ProductRecord, ProductTable};
use crate::error::Result;
use crate::filter::{FilterParams, FilteredView};

pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

pub const TOP_RATED_VIEW: &str = "top rated products";
pub const REVIEW_TEXT_VIEW: &str = "review word cloud";
pub const PRICE_VIEW: &str = "price vs discount";

/// One point of the price-vs-discount scatter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub actual_price: f64,
    pub discounted_price: f64,
    pub discount_percentage: f64,
}

/// Row of the preview and top-rated tables
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub discounted_price: Option<f64>,
    pub actual_price: Option<f64>,
    pub rating: Option<f64>,
    pub rating_count: Option<u64>,
}

impl From<&ProductRecord> for ProductSummary {
    fn from(record: &ProductRecord) -> Self {
        Self {
            product_name: record.product_name.clone(),
            category: record.category.clone(),
            discounted_price: record.discounted_price,
            actual_price: record.actual_price,
            rating: record.rating,
            rating_count: record.rating_count,
        }
    }
}

/// The `n` highest-rated rows, best first.
///
/// Ties keep their original row order.
pub fn top_rated(view: &FilteredView<'_>, n: usize) -> Result<Vec<ProductSummary>> {
    view.table()
        .schema()
        .require(TOP_RATED_VIEW, &[Column::Rating])?;

    let mut rated: Vec<(f64, &ProductRecord)> = view
        .iter()
        .filter_map(|record| record.rating.map(|rating| (rating, record)))
        .collect();

    // sort_by is stable
    rated.sort_by(|a, b| b.0.total_cmp(&a.0));

    Ok(rated
        .into_iter()
        .take(n)
        .map(|(_, record)| ProductSummary::from(record))
        .collect())
}

/// Every non-missing review text of the full table, joined by spaces
pub fn review_corpus(table: &ProductTable) -> Result<String> {
    table
        .schema()
        .require(REVIEW_TEXT_VIEW, &[Column::ReviewContent])?;

    let reviews: Vec<&str> = table
        .records()
        .iter()
        .filter_map(|record| record.review_content.as_deref())
        .collect();
    Ok(reviews.join(" "))
}

/// (actual, discounted, discount %) triples; incomplete rows are dropped
pub fn price_points(view: &FilteredView<'_>) -> Result<Vec<PricePoint>> {
    view.table().schema().require(
        PRICE_VIEW,
        &[
            Column::ActualPrice,
            Column::DiscountedPrice,
            Column::DiscountPercentage,
        ],
    )?;

    Ok(view
        .iter()
        .filter_map(|record| {
            Some(PricePoint {
                actual_price: record.actual_price?,
                discounted_price: record.discounted_price?,
                discount_percentage: record.discount_percentage?,
            })
        })
        .collect())
}

/// First `rows` filtered products, restricted to the preview columns
pub fn preview(view: &FilteredView<'_>, rows: usize) -> Vec<ProductSummary> {
    view.iter().take(rows).map(ProductSummary::from).collect()
}

/// Row-count line shown above the preview
pub fn summary_line(view: &FilteredView<'_>, params: &FilterParams) -> String {
    format!(
        "Showing {} products from category {} with rating >= {:.1}",
        view.len(),
        params.category,
        params.min_rating
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Schema;
    use crate::filter::{apply_filters, CategorySelector};
    use crate::DashboardError;

    fn product(name: &str, rating: f64) -> ProductRecord {
        ProductRecord {
            product_name: Some(name.to_string()),
            category: Some("Electronics".to_string()),
            discounted_price: Some(100.0),
            actual_price: Some(200.0),
            discount_percentage: Some(50.0),
            rating: Some(rating),
            rating_count: Some(10),
            review_content: Some(format!("{} review", name)),
            user_id: Some("U1".to_string()),
        }
    }

    fn all_rows(table: &ProductTable) -> FilteredView<'_> {
        apply_filters(table, &FilterParams::new(CategorySelector::All, 0.0).unwrap())
    }

    #[test]
    fn test_top_rated_stable_descending() {
        let table = ProductTable::new(
            Schema::full(),
            vec![
                product("a", 4.1),
                product("b", 4.8),
                product("c", 4.1),
                product("d", 4.8),
                product("e", 3.0),
            ],
        );
        let view = all_rows(&table);

        let top = top_rated(&view, 4).unwrap();
        let names: Vec<&str> = top.iter().filter_map(|p| p.product_name.as_deref()).collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);

        let everything = top_rated(&view, DEFAULT_TOP_N).unwrap();
        assert_eq!(everything.len(), 5);
    }

    #[test]
    fn test_price_points_drop_incomplete() {
        let mut partial = product("p", 4.0);
        partial.discount_percentage = None;
        let table = ProductTable::new(Schema::full(), vec![product("a", 4.0), partial]);
        let view = all_rows(&table);

        let points = price_points(&view).unwrap();
        assert_eq!(
            points,
            vec![PricePoint {
                actual_price: 200.0,
                discounted_price: 100.0,
                discount_percentage: 50.0,
            }]
        );
    }

    #[test]
    fn test_review_corpus_uses_full_table() {
        let mut silent = product("b", 1.0);
        silent.review_content = None;
        let table = ProductTable::new(
            Schema::full(),
            vec![product("a", 5.0), silent, product("c", 1.0)],
        );

        assert_eq!(review_corpus(&table).unwrap(), "a review c review");
    }

    #[test]
    fn test_review_corpus_unavailable_without_column() {
        let schema = Schema::new([Column::ProductName, Column::Rating]);
        let table = ProductTable::new(schema, vec![product("a", 5.0)]);

        match review_corpus(&table) {
            Err(DashboardError::ColumnMissing { missing, .. }) => {
                assert_eq!(missing, vec!["review_content"])
            }
            other => panic!("expected ColumnMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_and_summary() {
        let table = ProductTable::new(
            Schema::full(),
            (0..15).map(|i| product(&format!("p{}", i), 4.5)).collect(),
        );
        let params = FilterParams::default();
        let view = apply_filters(&table, &params);

        assert_eq!(preview(&view, DEFAULT_PREVIEW_ROWS).len(), 10);
        assert_eq!(
            summary_line(&view, &params),
            "Showing 15 products from category All with rating >= 4.0"
        );
    }
}
