//! Dataset loading and normalization using Polars

use crate::error::{DashboardError, Result};
use polars::prelude::*;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// The columns the dashboard knows how to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    ProductName,
    Category,
    DiscountedPrice,
    ActualPrice,
    DiscountPercentage,
    Rating,
    RatingCount,
    ReviewContent,
    UserId,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::ProductName,
        Column::Category,
        Column::DiscountedPrice,
        Column::ActualPrice,
        Column::DiscountPercentage,
        Column::Rating,
        Column::RatingCount,
        Column::ReviewContent,
        Column::UserId,
    ];

    /// Header name in the CSV file
    pub fn name(self) -> &'static str {
        match self {
            Column::ProductName => "product_name",
            Column::Category => "category",
            Column::DiscountedPrice => "discounted_price",
            Column::ActualPrice => "actual_price",
            Column::DiscountPercentage => "discount_percentage",
            Column::Rating => "rating",
            Column::RatingCount => "rating_count",
            Column::ReviewContent => "review_content",
            Column::UserId => "user_id",
        }
    }

    /// Columns coerced to numbers on load
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Column::DiscountedPrice
                | Column::ActualPrice
                | Column::DiscountPercentage
                | Column::Rating
                | Column::RatingCount
        )
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the known columns the loaded file actually has
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    present: BTreeSet<Column>,
}

impl Schema {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            present: columns.into_iter().collect(),
        }
    }

    /// Schema with every known column present
    pub fn full() -> Self {
        Self::new(Column::ALL)
    }

    pub fn contains(&self, column: Column) -> bool {
        self.present.contains(&column)
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.present.iter().copied()
    }

    /// Fail with `ColumnMissing` unless every column in `required` is present
    pub fn require(&self, view: &'static str, required: &[Column]) -> Result<()> {
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|c| !self.contains(**c))
            .map(|c| c.name())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DashboardError::ColumnMissing { view, missing })
        }
    }
}

/// One product row; every field may be missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRecord {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub discounted_price: Option<f64>,
    pub actual_price: Option<f64>,
    pub discount_percentage: Option<f64>,
    /// Star rating, nominally 0-5
    pub rating: Option<f64>,
    pub rating_count: Option<u64>,
    pub review_content: Option<String>,
    pub user_id: Option<String>,
}

/// Normalized dataset: the schema plus rows in file order
#[derive(Debug, Clone, Default)]
pub struct ProductTable {
    schema: Schema,
    records: Vec<ProductRecord>,
}

impl ProductTable {
    pub fn new(schema: Schema, records: Vec<ProductRecord>) -> Self {
        Self { schema, records }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lift a raw all-text DataFrame into the typed schema.
    ///
    /// Column names are trimmed first. Numeric columns are cast
    /// non-strictly, so unparsable cells become `None` instead of failing.
    pub fn from_dataframe(mut df: DataFrame) -> Result<Self> {
        let trimmed: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        df.set_column_names(trimmed.as_slice())?;

        info!("Available columns: {:?}", trimmed);

        let schema = Schema::new(trimmed.iter().filter_map(|name| Column::from_name(name)));
        let extra: Vec<&String> = trimmed
            .iter()
            .filter(|name| Column::from_name(name).is_none())
            .collect();
        if !extra.is_empty() {
            debug!("Ignoring unrecognised columns: {:?}", extra);
        }

        let height = df.height();
        let mut records = vec![ProductRecord::default(); height];

        for column in schema.columns() {
            if column.is_numeric() {
                let values = numeric_column(&df, column)?;
                for (record, value) in records.iter_mut().zip(values) {
                    match column {
                        Column::DiscountedPrice => record.discounted_price = value,
                        Column::ActualPrice => record.actual_price = value,
                        Column::DiscountPercentage => record.discount_percentage = value,
                        Column::Rating => record.rating = value,
                        Column::RatingCount => record.rating_count = value.and_then(as_count),
                        _ => unreachable!("non-numeric column in numeric branch"),
                    }
                }
            } else {
                let values = text_column(&df, column)?;
                for (record, value) in records.iter_mut().zip(values) {
                    match column {
                        Column::ProductName => record.product_name = value,
                        Column::Category => record.category = value,
                        Column::ReviewContent => record.review_content = value,
                        Column::UserId => record.user_id = value,
                        _ => unreachable!("numeric column in text branch"),
                    }
                }
            }
        }

        Ok(Self { schema, records })
    }
}

/// Load the CSV at `file_path` and normalize it into a `ProductTable`.
///
/// A missing file is reported as `SourceUnavailable`; callers must stop
/// processing in that case.
pub fn load_product_table(file_path: impl AsRef<Path>) -> Result<ProductTable> {
    let path = file_path.as_ref();
    if !path.is_file() {
        return Err(DashboardError::SourceUnavailable(path.to_path_buf()));
    }

    // Everything is read as text; coercion happens per column afterwards
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!("Read {} rows x {} columns from {}", df.height(), df.width(), path.display());

    ProductTable::from_dataframe(df)
}

fn numeric_column(df: &DataFrame, column: Column) -> Result<Vec<Option<f64>>> {
    let series = df.column(column.name())?;
    let trimmed: StringChunked = series
        .cast(&DataType::String)?
        .str()?
        .into_iter()
        .map(|value| value.map(str::trim))
        .collect();

    let parsed = trimmed.into_series().cast(&DataType::Float64)?;
    let values = parsed
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| !v.is_nan()))
        .collect();
    Ok(values)
}

fn text_column(df: &DataFrame, column: Column) -> Result<Vec<Option<String>>> {
    let series = df.column(column.name())?.cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|value| value.filter(|s| !s.trim().is_empty()).map(str::to_string))
        .collect();
    Ok(values)
}

/// Rating counts are whole, non-negative numbers
fn as_count(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Some(value as u64)
    } else {
        None
    }
}
