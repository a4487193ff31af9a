use crate::values::Token;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Target portfolio weights keyed by token
///
/// When produced by the optimizer with at least one token every weight lies
/// in [0, 1] and the weights sum to 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationWeights(BTreeMap<Token, f64>);

impl AllocationWeights {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Weight for a token; absent tokens weigh 0
    pub fn weight(&self, token: &str) -> f64 {
        self.0.get(token).copied().unwrap_or(0.0)
    }

    pub fn insert(&mut self, token: impl Into<Token>, weight: f64) {
        self.0.insert(token.into(), weight);
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains_key(token)
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, &f64)> {
        self.0.iter()
    }

    /// Weights in [0, 1] summing to 1 within `tolerance`
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        !self.0.is_empty()
            && self.0.values().all(|w| (0.0..=1.0).contains(w))
            && (self.total() - 1.0).abs() <= tolerance
    }

    pub fn into_inner(self) -> BTreeMap<Token, f64> {
        self.0
    }
}

impl FromIterator<(Token, f64)> for AllocationWeights {
    fn from_iter<I: IntoIterator<Item = (Token, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<Token, f64>> for AllocationWeights {
    fn from(map: BTreeMap<Token, f64>) -> Self {
        Self(map)
    }
}
