//! Integration tests for basketlens

use basketlens::views::{price_points, review_corpus, top_rated};
use basketlens::{
    apply_filters, build_incidence_matrix, category_options, load_product_table, mine_rules,
    CategorySelector, Column, Dashboard, DashboardConfig, DashboardError, FilterParams,
    MiningConfig, MiningOutcome, ViewOutcome,
};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "product_id,product_name,category,discounted_price,actual_price,discount_percentage,rating,rating_count,about_product,user_id,review_content";

/// Create a test CSV file with sample data
fn create_test_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();

    // user U1 buys the cable and the charger, U2 only the cable
    writeln!(file, "B01,USB Cable,Electronics,399,1099,64,4.2,24269,Durable,U1,Good cable fast charging").unwrap();
    writeln!(file, "B02,Wall Charger,Electronics,199,349,43,4.5,4399,Compact,U1,Charger works great").unwrap();
    writeln!(file, "B01,USB Cable,Electronics,399,1099,64,4.2,24269,Durable,U2,Cable quality great").unwrap();
    writeln!(file, "B03,Coffee Mug,Home&Kitchen,150,300,50,3.9,120,Ceramic,U3,Nice mug").unwrap();
    writeln!(file, "B04,Desk Lamp,Home&Kitchen,899,1499,40,4.8,87,LED,U3,").unwrap();
    writeln!(file, "B05,Mystery Box,Electronics,99,199,50,not rated,10,Surprise,U4,Fun").unwrap();

    file
}

fn create_csv(header: &str, rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", header).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}

#[test]
fn test_end_to_end_pipeline() {
    let test_file = create_test_csv();
    let table = load_product_table(test_file.path()).unwrap();
    assert_eq!(table.len(), 6);

    let mut config = DashboardConfig::default();
    config.mining.min_support = 0.25;
    let dashboard = Dashboard::new(&table, config);
    let report = dashboard.render(&FilterParams::default());

    // ratings >= 4.0: cable x2, charger, lamp
    assert_eq!(report.preview.len(), 4);
    assert!(report.summary.starts_with("Showing 4 products"));

    let top = report.top_rated.ready().unwrap();
    assert_eq!(top[0].product_name.as_deref(), Some("Desk Lamp"));
    assert_eq!(top[1].product_name.as_deref(), Some("Wall Charger"));

    let words = report.word_cloud.ready().unwrap();
    assert!(words.iter().any(|w| w.word == "cable"));

    let basket = report.basket.ready().unwrap();
    assert_eq!(basket.n_users, 4);
    assert_eq!(basket.n_products, 5);
    assert!(basket
        .rules
        .iter()
        .any(|r| r.antecedents == ["Wall Charger"] && r.consequents == ["USB Cable"]));
}

#[test]
fn test_category_and_rating_filter() {
    let file = create_csv(
        "product_name,category,rating",
        &["first,A,5", "second,B,5", "third,A,3"],
    );
    let table = load_product_table(file.path()).unwrap();

    let params = FilterParams::new(CategorySelector::parse("A"), 4.0).unwrap();
    let view = apply_filters(&table, &params);

    assert_eq!(view.len(), 1);
    let row = view.rows()[0];
    assert_eq!(row.category.as_deref(), Some("A"));
    assert_eq!(row.rating, Some(5.0));
    assert_eq!(row.product_name.as_deref(), Some("first"));

    assert_eq!(category_options(&table), vec!["All", "A", "B"]);
}

#[test]
fn test_missing_source_halts() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("amazon.csv");

    match load_product_table(&missing) {
        Err(DashboardError::SourceUnavailable(path)) => assert_eq!(path, missing),
        other => panic!("expected SourceUnavailable, got {:?}", other),
    }
}

#[test]
fn test_without_review_column_other_views_survive() {
    let file = create_csv(
        "product_name,category,discounted_price,actual_price,discount_percentage,rating,rating_count",
        &[
            "Cable,Electronics,399,1099,64,4.2,100",
            "Lamp,Home,899,1499,40,4.8,50",
        ],
    );
    let table = load_product_table(file.path()).unwrap();
    assert!(!table.schema().contains(Column::ReviewContent));

    let err = review_corpus(&table).unwrap_err();
    assert!(err.is_column_missing());

    let view = apply_filters(&table, &FilterParams::default());
    assert_eq!(top_rated(&view, 10).unwrap().len(), 2);
    assert_eq!(price_points(&view).unwrap().len(), 2);

    let report = Dashboard::new(&table, DashboardConfig::default()).render(&FilterParams::default());
    assert!(report.word_cloud.is_unavailable());
    assert!(report.basket.is_unavailable());
    assert!(matches!(report.top_rated, ViewOutcome::Ready(_)));
    assert!(matches!(report.price_points, ViewOutcome::Ready(_)));
}

#[test]
fn test_two_user_basket_rules() {
    let file = create_csv(
        "user_id,product_name,category",
        &["user1,X,A", "user1,Y,A", "user2,X,A"],
    );
    let table = load_product_table(file.path()).unwrap();
    let matrix = build_incidence_matrix(&table).unwrap();
    assert_eq!(matrix.n_users(), 2);
    assert_eq!(matrix.n_products(), 2);

    let config = MiningConfig {
        min_support: 0.5,
        ..Default::default()
    };
    let MiningOutcome::Rules { itemsets, rules } = mine_rules(&matrix, &config).unwrap() else {
        panic!("expected frequent itemsets");
    };

    let support_of = |products: &[&str]| {
        itemsets
            .iter()
            .find(|set| set.products == products)
            .map(|set| set.support)
            .unwrap()
    };
    assert_eq!(support_of(&["X"]), 1.0);
    assert_eq!(support_of(&["Y"]), 0.5);
    assert_eq!(support_of(&["X", "Y"]), 0.5);

    let confidence = |from: &str, to: &str| {
        rules
            .iter()
            .find(|r| r.antecedents == [from] && r.consequents == [to])
            .map(|r| r.confidence)
            .unwrap()
    };
    assert!((confidence("X", "Y") - 0.5).abs() < 1e-9);
    assert!((confidence("Y", "X") - 1.0).abs() < 1e-9);
}

#[test]
fn test_incidence_matrix_shape_and_cells() {
    let file = create_csv(
        "user_id,product_name",
        &["a,P1", "a,P1", "a,P2", "b,P3", ",P4", "c,"],
    );
    let table = load_product_table(file.path()).unwrap();
    let matrix = build_incidence_matrix(&table).unwrap();

    // users with at least one valid product row
    assert_eq!(matrix.users, vec!["a", "b"]);
    // P4 has no user, so it never enters the matrix
    assert_eq!(matrix.products, vec!["P1", "P2", "P3"]);
    assert!(matrix.cells.iter().all(|&c| c == 0 || c == 1));
    assert_eq!(matrix.purchase_counts[[0, 0]], 2);
    assert_eq!(matrix.cells[[0, 0]], 1);
}
