//! User x product incidence matrix for market-basket analysis

use crate::data::{Column, ProductTable};
use crate::error::Result;
use ndarray::Array2;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub const BASKET_VIEW: &str = "market basket analysis";

/// Binary purchase-presence table: rows are users, columns products
#[derive(Debug, Clone, PartialEq)]
pub struct IncidenceMatrix {
    /// Sorted, unique user ids (row keys)
    pub users: Vec<String>,
    /// Sorted, unique product names (column keys)
    pub products: Vec<String>,
    /// 1 when the user bought the product at least once, else 0
    pub cells: Array2<u8>,
    /// Occurrence counts before binarization
    pub purchase_counts: Array2<u32>,
}

impl IncidenceMatrix {
    pub fn n_users(&self) -> usize {
        self.users.len()
    }

    pub fn n_products(&self) -> usize {
        self.products.len()
    }

    /// Number of users that bought product `column`
    pub fn column_count(&self, column: usize) -> usize {
        self.cells.column(column).iter().filter(|&&cell| cell == 1).count()
    }

    /// Product names for a set of column indices
    pub fn product_names(&self, columns: &[usize]) -> Vec<String> {
        columns.iter().map(|&c| self.products[c].clone()).collect()
    }
}

/// Pivot (user, product) observations of the full table into an
/// `IncidenceMatrix`.
///
/// Requires `user_id` and `product_name`. Rows missing either value are
/// skipped. Counts greater than one collapse to 1.
pub fn build_incidence_matrix(table: &ProductTable) -> Result<IncidenceMatrix> {
    table
        .schema()
        .require(BASKET_VIEW, &[Column::UserId, Column::ProductName])?;

    let mut pair_counts: BTreeMap<(&str, &str), u32> = BTreeMap::new();
    let mut users = BTreeSet::new();
    let mut products = BTreeSet::new();

    for record in table.records() {
        if let (Some(user), Some(product)) = (record.user_id.as_deref(), record.product_name.as_deref()) {
            *pair_counts.entry((user, product)).or_insert(0) += 1;
            users.insert(user);
            products.insert(product);
        }
    }

    let users: Vec<&str> = users.into_iter().collect();
    let products: Vec<&str> = products.into_iter().collect();
    let user_index: BTreeMap<&str, usize> = users.iter().enumerate().map(|(i, &u)| (u, i)).collect();
    let product_index: BTreeMap<&str, usize> =
        products.iter().enumerate().map(|(i, &p)| (p, i)).collect();

    let mut purchase_counts = Array2::<u32>::zeros((users.len(), products.len()));
    for ((user, product), count) in pair_counts {
        purchase_counts[[user_index[user], product_index[product]]] = count;
    }
    let cells = purchase_counts.mapv(|count| u8::from(count > 0));

    debug!(
        "Incidence matrix: {} users x {} products",
        users.len(),
        products.len()
    );

    Ok(IncidenceMatrix {
        users: users.into_iter().map(String::from).collect(),
        products: products.into_iter().map(String::from).collect(),
        cells,
        purchase_counts,
    })
}
