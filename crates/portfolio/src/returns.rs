//! Return series matrix
//!
//! One row per token, one column per period. Rows of unequal length are
//! aligned on their most recent period: shorter rows are padded at the front
//! with zero returns, as if the token had not moved before its history began.

use barn_core::Token;
use barn_stats::returns;
use ndarray::{Array1, Array2, Axis};

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnMatrix {
    tokens: Vec<Token>,
    data: Array2<f64>,
}

impl ReturnMatrix {
    /// Build from per-token return rows
    ///
    /// An empty row degrades to a single zero-return placeholder.
    pub fn from_returns<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Token, Vec<f64>)>,
    {
        let (tokens, rows): (Vec<Token>, Vec<Vec<f64>>) = rows
            .into_iter()
            .map(|(token, row)| {
                if row.is_empty() {
                    (token, vec![0.0])
                } else {
                    (token, row)
                }
            })
            .unzip();

        let periods = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut data = Array2::zeros((rows.len(), periods));

        for (i, row) in rows.iter().enumerate() {
            let offset = periods - row.len();
            for (j, value) in row.iter().enumerate() {
                data[[i, offset + j]] = *value;
            }
        }

        Self { tokens, data }
    }

    /// Build from per-token price histories
    ///
    /// A history with fewer than 2 prices has no returns and degrades to the
    /// zero placeholder rather than failing.
    pub fn from_prices<'a, I>(histories: I) -> Self
    where
        I: IntoIterator<Item = (Token, &'a [f64])>,
    {
        Self::from_returns(
            histories
                .into_iter()
                .map(|(token, prices)| (token, returns(prices).unwrap_or_default())),
        )
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Number of aligned periods
    pub fn periods(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Mean return per token
    pub fn mean_returns(&self) -> Array1<f64> {
        self.data
            .mean_axis(Axis(1))
            .unwrap_or_else(|| Array1::zeros(self.tokens.len()))
    }

    /// Sample covariance (n - 1) between token rows
    ///
    /// Zero matrix with fewer than 2 aligned periods.
    pub fn covariance(&self) -> Array2<f64> {
        let n = self.tokens.len();
        let periods = self.periods();
        if periods < 2 {
            return Array2::zeros((n, n));
        }

        let means = self.mean_returns().insert_axis(Axis(1));
        let centered = &self.data - &means;
        centered.dot(&centered.t()) / (periods - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_padding() {
        let matrix = ReturnMatrix::from_returns(vec![
            ("A".to_string(), vec![0.1, 0.2, 0.3]),
            ("B".to_string(), vec![0.5]),
        ]);

        assert_eq!(matrix.periods(), 3);
        assert_eq!(matrix.data().row(1).to_vec(), vec![0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_short_history_degrades_to_placeholder() {
        let prices = [100.0];
        let matrix = ReturnMatrix::from_prices(vec![("A".to_string(), &prices[..])]);

        assert_eq!(matrix.periods(), 1);
        assert_eq!(matrix.mean_returns().to_vec(), vec![0.0]);
        assert_eq!(matrix.covariance()[[0, 0]], 0.0);
    }

    #[test]
    fn test_mean_and_covariance() {
        let matrix = ReturnMatrix::from_returns(vec![
            ("A".to_string(), vec![0.01, 0.03]),
            ("B".to_string(), vec![0.02, -0.02]),
        ]);

        let mu = matrix.mean_returns();
        assert!((mu[0] - 0.02).abs() < 1e-12);
        assert!(mu[1].abs() < 1e-12);

        let cov = matrix.covariance();
        // Sample variance of [0.01, 0.03] is 0.0002
        assert!((cov[[0, 0]] - 0.0002).abs() < 1e-12);
        assert!((cov[[1, 1]] - 0.0008).abs() < 1e-12);
        assert!((cov[[0, 1]] + 0.0004).abs() < 1e-12);
        assert!((cov[[0, 1]] - cov[[1, 0]]).abs() < 1e-15);
    }

    #[test]
    fn test_from_prices() {
        let prices = [100.0, 110.0, 99.0];
        let matrix = ReturnMatrix::from_prices(vec![("A".to_string(), &prices[..])]);

        let row = matrix.data().row(0).to_vec();
        assert!((row[0] - 0.1).abs() < 1e-12);
        assert!((row[1] + 0.1).abs() < 1e-12);
    }
}
