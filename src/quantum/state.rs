// src/quantum/state.rs
//! Sparse quantum state representation
//!
//! A register's superposition is stored as the basis indices that carry a
//! non-zero amplitude, kept in ascending order. Every gate, measurement and
//! oracle builds its output through [`SparseState::insert`], so linear
//! superposition and interference both come from the same merge rule.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{QuicError, Result};

/// Classical value of every qubit in the register, qubit 0 in the high bit
pub type BasisIndex = u64;

/// One basis index with its complex amplitude
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub index: BasisIndex,
    pub amplitude: Complex64,
}

impl StateEntry {
    pub fn new(index: BasisIndex, amplitude: Complex64) -> Self {
        StateEntry { index, amplitude }
    }

    /// Measurement weight of the entry (squared modulus)
    pub fn weight(&self) -> f64 {
        self.amplitude.norm_sqr()
    }

    /// Whether the bit selected by `mask` is set in the index
    pub fn bit(&self, mask: BasisIndex) -> bool {
        self.index & mask != 0
    }
}

/// Amplitudes are only dropped when both components are exactly zero.
fn is_zero(amplitude: Complex64) -> bool {
    amplitude.re == 0.0 && amplitude.im == 0.0
}

/// Canonical sparse superposition: sorted, deduplicated, zero-free
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StateEntry>", into = "Vec<StateEntry>")]
pub struct SparseState {
    entries: Vec<StateEntry>,
}

impl SparseState {
    /// The ground state: index 0 with amplitude 1
    pub fn new() -> Self {
        SparseState {
            entries: vec![StateEntry::new(0, Complex64::new(1.0, 0.0))],
        }
    }

    /// A state with no entries
    pub fn empty() -> Self {
        SparseState { entries: Vec::new() }
    }

    /// Build a state by merging every `(index, amplitude)` pair in order
    pub fn from_amplitudes<I>(amplitudes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (BasisIndex, Complex64)>,
    {
        let mut state = SparseState::empty();
        for (index, amplitude) in amplitudes {
            state.insert(index, amplitude)?;
        }
        Ok(state)
    }

    /// Merge one amplitude into the state.
    ///
    /// A new index is inserted at its sorted position. An existing index has
    /// the amplitude added to it, and is removed when the sum is exactly zero.
    pub fn insert(&mut self, index: BasisIndex, amplitude: Complex64) -> Result<()> {
        match self.entries.binary_search_by_key(&index, |entry| entry.index) {
            Ok(position) => {
                let merged = self.entries[position].amplitude + amplitude;
                if is_zero(merged) {
                    self.entries.remove(position);
                } else {
                    self.entries[position].amplitude = merged;
                }
            }
            Err(position) => {
                if is_zero(amplitude) {
                    return Ok(());
                }
                self.entries
                    .try_reserve(1)
                    .map_err(|_| QuicError::ResourceExhausted {
                        entries: self.entries.len(),
                    })?;
                self.entries.insert(position, StateEntry::new(index, amplitude));
            }
        }
        Ok(())
    }

    /// Number of basis indices present
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending index order
    pub fn iter(&self) -> std::slice::Iter<'_, StateEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[StateEntry] {
        &self.entries
    }

    /// Amplitude of `index`, if present
    pub fn amplitude(&self, index: BasisIndex) -> Option<Complex64> {
        self.entries
            .binary_search_by_key(&index, |entry| entry.index)
            .ok()
            .map(|position| self.entries[position].amplitude)
    }

    /// The distinct basis indices present, ascending
    pub fn indices(&self) -> Vec<BasisIndex> {
        self.entries.iter().map(|entry| entry.index).collect()
    }

    /// Sum of squared amplitude moduli
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(StateEntry::weight).sum()
    }

    /// Check the ordering, uniqueness and zero-free invariants
    pub fn is_canonical(&self) -> bool {
        self.entries.iter().all(|entry| !is_zero(entry.amplitude))
            && self
                .entries
                .windows(2)
                .all(|pair| pair[0].index < pair[1].index)
    }

    /// Render the state with each index as a `width`-digit binary string
    pub fn display(&self, width: usize) -> StateDisplay<'_> {
        StateDisplay { state: self, width }
    }
}

impl TryFrom<Vec<StateEntry>> for SparseState {
    type Error = QuicError;

    fn try_from(entries: Vec<StateEntry>) -> Result<Self> {
        SparseState::from_amplitudes(
            entries
                .into_iter()
                .map(|entry| (entry.index, entry.amplitude)),
        )
    }
}

impl From<SparseState> for Vec<StateEntry> {
    fn from(state: SparseState) -> Self {
        state.entries
    }
}

impl<'a> IntoIterator for &'a SparseState {
    type Item = &'a StateEntry;
    type IntoIter = std::slice::Iter<'a, StateEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Fixed-width rendering of a [`SparseState`]
pub struct StateDisplay<'a> {
    state: &'a SparseState,
    width: usize,
}

impl fmt::Display for StateDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.state.is_empty() {
            return writeln!(f, "Empty state");
        }
        for entry in self.state {
            writeln!(
                f,
                "|{:0width$b}⟩ {:+.4}{:+.4}i",
                entry.index,
                entry.amplitude.re,
                entry.amplitude.im,
                width = self.width
            )?;
        }
        Ok(())
    }
}
