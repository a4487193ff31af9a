//! Risk-adjusted return solver
//!
//! Maximizes `(w·μ - r_f) / sqrt(wᵀΣw)` over the capped simplex
//! `{ Σw = 1, lower ≤ w_i ≤ 1 }` by projected gradient ascent with Armijo
//! backtracking, climbing from equal weights and from every vertex.
//!
//! The ratio is undefined for a zero-variance portfolio; the objective is 0
//! there, so such a portfolio converges at the seed.
//!
//! There is no timeout. A solve is bounded only by `max_iterations`.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this portfolio volatility the ratio is treated as 0
const VOL_EPSILON: f64 = 1e-12;
/// Sufficient-increase constant of the Armijo condition
const ARMIJO_C: f64 = 0.3;
const MAX_BACKTRACKS: usize = 60;
const PROJECTION_ROUNDS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// Iteration budget exhausted before the step size settled
    MaxIterations,
    /// Inputs or iterates stopped being finite numbers
    NonFinite,
    /// `n * lower_bound > 1`: no weights satisfy the constraints
    Infeasible,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::MaxIterations => write!(f, "iteration limit reached"),
            FailureReason::NonFinite => write!(f, "non-finite objective"),
            FailureReason::Infeasible => write!(f, "constraints are infeasible"),
        }
    }
}

/// Result of a solve. A failure is never reported as a converged point.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverOutcome {
    Converged {
        weights: Array1<f64>,
        iterations: usize,
        objective: f64,
    },
    Failed {
        reason: FailureReason,
        iterations: usize,
        last_weights: Array1<f64>,
    },
}

impl SolverOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, SolverOutcome::Converged { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub risk_free_rate: f64,
    /// Lower bound for every weight (0 when unset)
    pub lower_bound: f64,
    pub max_iterations: usize,
    /// Convergence threshold on the step and on the objective gain
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            lower_bound: 0.0,
            max_iterations: 1000,
            tolerance: 1e-10,
        }
    }
}

/// Sharpe-style ratio maximizer over mean returns and covariance
#[derive(Debug, Clone)]
pub struct SharpeSolver<'a> {
    mean: &'a Array1<f64>,
    cov: &'a Array2<f64>,
    config: SolverConfig,
}

impl<'a> SharpeSolver<'a> {
    pub fn new(mean: &'a Array1<f64>, cov: &'a Array2<f64>, config: SolverConfig) -> Self {
        Self { mean, cov, config }
    }

    /// Objective at `w`
    pub fn objective(&self, w: &Array1<f64>) -> f64 {
        let variance = w.dot(&self.cov.dot(w));
        let vol = variance.max(0.0).sqrt();
        if vol < VOL_EPSILON {
            return 0.0;
        }
        (w.dot(self.mean) - self.config.risk_free_rate) / vol
    }

    fn gradient(&self, w: &Array1<f64>) -> Array1<f64> {
        let sigma_w = self.cov.dot(w);
        let variance = w.dot(&sigma_w);
        let vol = variance.max(0.0).sqrt();
        if vol < VOL_EPSILON {
            return Array1::zeros(w.len());
        }
        let excess = w.dot(self.mean) - self.config.risk_free_rate;
        (self.mean * vol - &sigma_w * (excess / vol)) / variance
    }

    /// Best converged climb over the equal-weight seed and every vertex
    ///
    /// Below zero excess return the ratio has several local maxima, so a
    /// single climb from the seed can stop at a negative ratio while a
    /// positive one is feasible. Each vertex is projected onto the lower
    /// bound before climbing. If no start converges, the seed's failure is
    /// reported. `iterations` is that of the returned climb.
    pub fn solve(&self) -> SolverOutcome {
        let n = self.mean.len();
        let lower = self.config.lower_bound.max(0.0);
        let seed = Array1::from_elem(n, if n == 0 { 0.0 } else { 1.0 / n as f64 });

        if n == 0 {
            return SolverOutcome::Converged {
                weights: seed,
                iterations: 0,
                objective: 0.0,
            };
        }

        if n as f64 * lower > 1.0 + 1e-12 {
            return SolverOutcome::Failed {
                reason: FailureReason::Infeasible,
                iterations: 0,
                last_weights: seed,
            };
        }

        if self.mean.iter().chain(self.cov.iter()).any(|v| !v.is_finite()) {
            return SolverOutcome::Failed {
                reason: FailureReason::NonFinite,
                iterations: 0,
                last_weights: seed,
            };
        }

        let seed_outcome = self.climb(seed, lower);
        if n == 1 {
            return seed_outcome;
        }

        let mut best: Option<SolverOutcome> = None;
        let vertices = (0..n).map(|i| {
            let mut vertex = Array1::zeros(n);
            vertex[i] = 1.0;
            self.climb(project_capped_simplex(&vertex, lower), lower)
        });

        for outcome in std::iter::once(seed_outcome.clone()).chain(vertices) {
            let SolverOutcome::Converged { objective, .. } = &outcome else {
                continue;
            };
            let improves = match &best {
                Some(SolverOutcome::Converged { objective: top, .. }) => objective > top,
                _ => true,
            };
            if improves {
                best = Some(outcome);
            }
        }

        best.unwrap_or(seed_outcome)
    }

    /// Projected gradient ascent from `start` to the nearest local maximum
    fn climb(&self, start: Array1<f64>, lower: f64) -> SolverOutcome {
        let mut w = start;
        let mut f = self.objective(&w);
        let mut step = 1.0;

        for iteration in 1..=self.config.max_iterations {
            let g = self.gradient(&w);
            if g.iter().any(|v| !v.is_finite()) {
                return SolverOutcome::Failed {
                    reason: FailureReason::NonFinite,
                    iterations: iteration,
                    last_weights: w,
                };
            }

            // Backtrack until the projected step gives sufficient increase
            let mut accepted = None;
            for _ in 0..MAX_BACKTRACKS {
                let candidate = project_capped_simplex(&(&w + &(&g * step)), lower);
                let f_candidate = self.objective(&candidate);
                let predicted = g.dot(&(&candidate - &w));

                if f_candidate.is_finite() && f_candidate >= f + ARMIJO_C * predicted {
                    accepted = Some((candidate, f_candidate));
                    break;
                }
                step *= 0.5;
            }

            let Some((candidate, f_candidate)) = accepted else {
                // No ascent direction left at any step size
                return SolverOutcome::Converged {
                    weights: w,
                    iterations: iteration,
                    objective: f,
                };
            };

            let moved = (&candidate - &w)
                .iter()
                .fold(0.0_f64, |acc, d| acc.max(d.abs()));
            let gain = f_candidate - f;

            w = candidate;
            f = f_candidate;

            if moved < self.config.tolerance || gain <= self.config.tolerance * (1.0 + f.abs()) {
                return SolverOutcome::Converged {
                    weights: w,
                    iterations: iteration,
                    objective: f,
                };
            }

            // Let the step grow back after a successful move
            step = (step * 2.0).min(1e6);
        }

        SolverOutcome::Failed {
            reason: FailureReason::MaxIterations,
            iterations: self.config.max_iterations,
            last_weights: w,
        }
    }
}

/// Euclidean projection onto `{ Σw = 1, lower ≤ w_i ≤ 1 }`
///
/// Finds the shift `tau` with `Σ clamp(v_i - tau, lower, 1) = 1` by bisection.
/// Assumes `n * lower ≤ 1 ≤ n`.
pub fn project_capped_simplex(v: &Array1<f64>, lower: f64) -> Array1<f64> {
    let lower = lower.clamp(0.0, 1.0);
    let clamped_sum = |tau: f64| -> f64 { v.iter().map(|x| (x - tau).clamp(lower, 1.0)).sum() };

    let max = v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = v.iter().copied().fold(f64::INFINITY, f64::min);

    // At tau_lo every weight sits at 1, at tau_hi every weight sits at `lower`
    let mut tau_lo = min - 1.0;
    let mut tau_hi = max - lower;

    for _ in 0..PROJECTION_ROUNDS {
        let mid = 0.5 * (tau_lo + tau_hi);
        if clamped_sum(mid) > 1.0 {
            tau_lo = mid;
        } else {
            tau_hi = mid;
        }
    }

    let tau = 0.5 * (tau_lo + tau_hi);
    v.mapv(|x| (x - tau).clamp(lower, 1.0))
}
