// src/quantum/measurement.rs
//! Measurement and collapse
//!
//! A measurement keeps only the entries whose measured bit matches the
//! outcome. Forced outcomes (`0`, `1`) multiply the cumulative probability by
//! the fraction of weight retained; sampled outcomes (`m`) do not.

use std::fmt;

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::quantum::gate::MeasurementMode;
use crate::quantum::state::{BasisIndex, SparseState};

/// A measurement outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Measurement yielded 0
    Zero,
    /// Measurement yielded 1
    One,
}

impl Outcome {
    pub fn is_one(self) -> bool {
        self == Outcome::One
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Zero => write!(f, "0"),
            Outcome::One => write!(f, "1"),
        }
    }
}

/// Keep the entries whose `mask` bit equals `outcome`
pub fn project(state: &SparseState, mask: BasisIndex, outcome: Outcome) -> Result<SparseState> {
    SparseState::from_amplitudes(
        state
            .iter()
            .filter(|entry| entry.bit(mask) == outcome.is_one())
            .map(|entry| (entry.index, entry.amplitude)),
    )
}

/// Collapses qubits and tracks the probability of forced outcomes
#[derive(Debug, Clone)]
pub struct MeasurementUnit {
    probability: f64,
    rng: StdRng,
}

impl MeasurementUnit {
    /// Seeded for reproducible sampling, or from entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        MeasurementUnit {
            probability: 1.0,
            rng,
        }
    }

    /// Product of the retained weight fractions of every forced outcome so far
    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn reset_probability(&mut self) {
        self.probability = 1.0;
    }

    /// Measure the qubit selected by `mask`.
    ///
    /// An empty state (zero total weight) measures as `Zero`.
    pub fn measure(
        &mut self,
        state: &SparseState,
        mask: BasisIndex,
        mode: MeasurementMode,
    ) -> Result<(SparseState, Outcome)> {
        let outcome = match mode {
            MeasurementMode::Fixed0 => Outcome::Zero,
            MeasurementMode::Fixed1 => Outcome::One,
            MeasurementMode::Random => self.sample(state, mask),
        };

        let projected = project(state, mask, outcome)?;
        if mode != MeasurementMode::Random {
            let total = state.total_weight();
            if total > 0.0 {
                self.probability *= projected.total_weight() / total;
            }
        }
        Ok((projected, outcome))
    }

    /// Draw over the total weight and walk entries in index order until the
    /// accumulated weight passes the draw
    fn sample(&mut self, state: &SparseState, mask: BasisIndex) -> Outcome {
        let total = state.total_weight();
        if total <= 0.0 {
            return Outcome::Zero;
        }

        let draw = self.rng.gen::<f64>() * total;
        let mut accumulated = 0.0;
        let chosen = state
            .iter()
            .find(|entry| {
                accumulated += entry.weight();
                draw < accumulated
            })
            .or_else(|| state.iter().last());
        trace!("measurement draw {:.6} of {:.6}", draw, total);

        match chosen {
            Some(entry) if entry.bit(mask) => Outcome::One,
            _ => Outcome::Zero,
        }
    }
}
