//! Frequent itemset mining and association rules over an incidence matrix
//!
//! Itemsets are mined level by level with the Apriori algorithm: frequent
//! 1-itemsets come from column sums, each larger level joins itemsets that
//! share all but their last item and keeps candidates whose every subset
//! is frequent and whose own support clears the threshold. Rules are then
//! derived from every split of every frequent itemset of size two or more.

use crate::basket::IncidenceMatrix;
use crate::error::{DashboardError, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

pub const DEFAULT_MIN_SUPPORT: f64 = 0.005;
pub const DEFAULT_MIN_LIFT: f64 = 1.0;

/// Thresholds for itemset mining and rule filtering
#[derive(Debug, Clone, PartialEq)]
pub struct MiningConfig {
    /// Minimum fraction of users that must contain an itemset
    pub min_support: f64,
    /// Rules with lift below this are dropped
    pub min_lift: f64,
    /// Largest itemset size to mine; `None` means unbounded
    pub max_len: Option<usize>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            min_lift: DEFAULT_MIN_LIFT,
            max_len: None,
        }
    }
}

impl MiningConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(DashboardError::InvalidParameter {
                name: "min_support",
                value: self.min_support.to_string(),
                constraint: "must be in (0, 1]",
            });
        }
        if !(self.min_lift >= 0.0) {
            return Err(DashboardError::InvalidParameter {
                name: "min_lift",
                value: self.min_lift.to_string(),
                constraint: "must be non-negative",
            });
        }
        if self.max_len == Some(0) {
            return Err(DashboardError::InvalidParameter {
                name: "max_len",
                value: "0".to_string(),
                constraint: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// A frequent itemset as column indices into the incidence matrix
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemset {
    /// Sorted, non-empty
    pub items: Vec<usize>,
    pub support: f64,
}

/// Frequent itemset labelled with product names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemsetSupport {
    pub products: Vec<String>,
    pub support: f64,
}

/// antecedents => consequents with its interest measures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationRule {
    pub antecedents: Vec<String>,
    pub consequents: Vec<String>,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    /// Support of antecedents ∪ consequents
    pub support: f64,
    /// support / antecedent_support
    pub confidence: f64,
    /// confidence / consequent_support
    pub lift: f64,
    /// support - antecedent_support * consequent_support
    pub leverage: f64,
    /// (1 - consequent_support) / (1 - confidence); infinite when confidence is 1
    pub conviction: f64,
}

/// Result of a mining run
#[derive(Debug, Clone, PartialEq)]
pub enum MiningOutcome {
    /// Nothing reached the support threshold
    NoFrequentItemsets,
    /// Itemsets were found; `rules` may still be empty
    Rules {
        itemsets: Vec<ItemsetSupport>,
        rules: Vec<AssociationRule>,
    },
}

/// Level-wise frequent itemset miner
#[derive(Debug, Clone)]
pub struct Apriori {
    min_support: f64,
    max_len: Option<usize>,
}

impl Default for Apriori {
    fn default() -> Self {
        Self::new()
    }
}

/// Bitset of the users containing an itemset
type UserSet = Vec<u64>;

impl Apriori {
    pub fn new() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            max_len: None,
        }
    }

    #[must_use]
    pub fn with_min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    #[must_use]
    pub fn with_max_len(mut self, max_len: Option<usize>) -> Self {
        self.max_len = max_len;
        self
    }

    /// Mine all frequent itemsets, smallest first, each level in
    /// lexicographic item order.
    pub fn fit(&self, matrix: &IncidenceMatrix) -> Vec<FrequentItemset> {
        let n_users = matrix.n_users();
        if n_users == 0 {
            return Vec::new();
        }

        let mut current: Vec<(Vec<usize>, UserSet)> = (0..matrix.n_products())
            .map(|column| (vec![column], column_users(matrix, column)))
            .filter(|(_, users)| self.is_frequent(users, n_users))
            .collect();

        let mut frequent = Vec::new();
        let mut size = 1;

        while !current.is_empty() {
            debug!("{} frequent itemsets of size {}", current.len(), size);
            frequent.extend(current.iter().map(|(items, users)| FrequentItemset {
                items: items.clone(),
                support: support_of(users, n_users),
            }));

            if self.max_len.is_some_and(|max| size >= max) {
                break;
            }
            current = self.next_level(&current, n_users);
            size += 1;
        }

        frequent
    }

    fn is_frequent(&self, users: &UserSet, n_users: usize) -> bool {
        support_of(users, n_users) >= self.min_support
    }

    /// Join itemsets sharing a prefix, prune by subsets and support
    fn next_level(
        &self,
        level: &[(Vec<usize>, UserSet)],
        n_users: usize,
    ) -> Vec<(Vec<usize>, UserSet)> {
        let known: HashSet<&[usize]> = level.iter().map(|(items, _)| items.as_slice()).collect();
        let mut next = Vec::new();

        for (i, (left, left_users)) in level.iter().enumerate() {
            let prefix = &left[..left.len() - 1];
            for (right, right_users) in &level[i + 1..] {
                if &right[..right.len() - 1] != prefix {
                    // Levels are sorted, so no later itemset shares this prefix
                    break;
                }

                let mut candidate = left.clone();
                candidate.push(right[right.len() - 1]);

                if has_infrequent_subset(&candidate, &known) {
                    continue;
                }

                let users: UserSet = left_users
                    .iter()
                    .zip(right_users)
                    .map(|(a, b)| a & b)
                    .collect();
                if self.is_frequent(&users, n_users) {
                    next.push((candidate, users));
                }
            }
        }

        next
    }
}

fn column_users(matrix: &IncidenceMatrix, column: usize) -> UserSet {
    let mut users = vec![0u64; matrix.n_users().div_ceil(64)];
    for (row, &cell) in matrix.cells.column(column).iter().enumerate() {
        if cell == 1 {
            users[row / 64] |= 1 << (row % 64);
        }
    }
    users
}

fn support_of(users: &UserSet, n_users: usize) -> f64 {
    let count: u32 = users.iter().map(|word| word.count_ones()).sum();
    f64::from(count) / n_users as f64
}

fn has_infrequent_subset(candidate: &[usize], known: &HashSet<&[usize]>) -> bool {
    (0..candidate.len()).any(|skip| {
        let subset: Vec<usize> = candidate
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, &item)| item)
            .collect();
        !known.contains(subset.as_slice())
    })
}

/// Derive every rule from the frequent itemsets and keep those with
/// lift >= `min_lift`.
///
/// Ordered by lift, then confidence, then support (all descending), then by
/// product names.
pub fn derive_rules(
    matrix: &IncidenceMatrix,
    itemsets: &[FrequentItemset],
    min_lift: f64,
) -> Vec<AssociationRule> {
    let supports: HashMap<&[usize], f64> = itemsets
        .iter()
        .map(|itemset| (itemset.items.as_slice(), itemset.support))
        .collect();

    let mut rules = Vec::new();
    for itemset in itemsets.iter().filter(|set| set.items.len() >= 2) {
        let items = &itemset.items;
        let full_mask: u64 = (1 << items.len()) - 1;

        for mask in 1..full_mask {
            let (antecedent, consequent): (Vec<(usize, usize)>, Vec<(usize, usize)>) = items
                .iter()
                .copied()
                .enumerate()
                .partition(|(i, _)| mask & (1 << i) != 0);
            let antecedent: Vec<usize> = antecedent.into_iter().map(|(_, item)| item).collect();
            let consequent: Vec<usize> = consequent.into_iter().map(|(_, item)| item).collect();

            // Subsets of a frequent itemset are frequent
            let (Some(&antecedent_support), Some(&consequent_support)) = (
                supports.get(antecedent.as_slice()),
                supports.get(consequent.as_slice()),
            ) else {
                continue;
            };

            let support = itemset.support;
            let confidence = support / antecedent_support;
            let lift = confidence / consequent_support;
            if lift < min_lift {
                continue;
            }

            let conviction = if confidence >= 1.0 {
                f64::INFINITY
            } else {
                (1.0 - consequent_support) / (1.0 - confidence)
            };

            rules.push(AssociationRule {
                antecedents: matrix.product_names(&antecedent),
                consequents: matrix.product_names(&consequent),
                antecedent_support,
                consequent_support,
                support,
                confidence,
                lift,
                leverage: support - antecedent_support * consequent_support,
                conviction,
            });
        }
    }

    rules.sort_by(compare_rules);
    rules
}

fn compare_rules(a: &AssociationRule, b: &AssociationRule) -> Ordering {
    b.lift
        .total_cmp(&a.lift)
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| b.support.total_cmp(&a.support))
        .then_with(|| a.antecedents.cmp(&b.antecedents))
        .then_with(|| a.consequents.cmp(&b.consequents))
}

/// Mine frequent itemsets and association rules from `matrix`.
///
/// An empty itemset collection is reported as
/// `MiningOutcome::NoFrequentItemsets`, not as an error.
pub fn mine_rules(matrix: &IncidenceMatrix, config: &MiningConfig) -> Result<MiningOutcome> {
    config.validate()?;

    let itemsets = Apriori::new()
        .with_min_support(config.min_support)
        .with_max_len(config.max_len)
        .fit(matrix);

    if itemsets.is_empty() {
        info!(
            "No frequent itemsets at min_support {} over {} users",
            config.min_support,
            matrix.n_users()
        );
        return Ok(MiningOutcome::NoFrequentItemsets);
    }

    let rules = derive_rules(matrix, &itemsets, config.min_lift);
    info!(
        "Mined {} frequent itemsets and {} rules (lift >= {})",
        itemsets.len(),
        rules.len(),
        config.min_lift
    );

    let itemsets = itemsets
        .into_iter()
        .map(|itemset| ItemsetSupport {
            products: matrix.product_names(&itemset.items),
            support: itemset.support,
        })
        .collect();

    Ok(MiningOutcome::Rules { itemsets, rules })
}
