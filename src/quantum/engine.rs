// src/quantum/engine.rs
//! Column-by-column state evolution
//!
//! Positions of a column are applied left to right, and each position sees
//! the state produced by the positions before it. Multi-qubit gates find
//! their controls and partner qubits in the same column: `C` marks controls
//! for `N`, `P`, `T` and `s`. `N`, `P` and `T` act only when the column has
//! at least one control; `s` swaps unconditionally without one. Every `s`
//! belongs to one swap group, `f` and `t` form QFT groups, and the
//! arithmetic oracle roles are read from the column when the first `=` is
//! reached.

use std::f64::consts::PI;
use std::fmt;

use log::{debug, warn};
use num_complex::Complex64;

use crate::error::{QuicError, Result};
use crate::oracle::ArithmeticOracle;
use crate::quantum::gate::{constants, GateCode, GateColumn};
use crate::quantum::measurement::{MeasurementUnit, Outcome};
use crate::quantum::state::{BasisIndex, SparseState, StateEntry};

/// Non-fatal problems found while applying a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Unrecognised code, applied as identity
    UnknownCode { position: usize, code: char },
    /// Arithmetic oracle entries left unchanged because a divisor or modulus was zero
    ZeroDivisor { position: usize, entries: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownCode { position, code } => {
                write!(f, "position {}: `{}` mode not implemented, treated as identity", position, code)
            }
            Diagnostic::ZeroDivisor { position, entries } => {
                write!(f, "position {}: {} entries with a zero divisor left unchanged", position, entries)
            }
        }
    }
}

/// What one column did besides producing the state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnReport {
    /// Measurement outcomes by column position
    pub outcomes: Vec<(usize, Outcome)>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of applying a column
#[derive(Debug, Clone)]
pub struct ColumnResult {
    pub width: usize,
    pub state: SparseState,
    pub report: ColumnReport,
}

/// Applies gate columns to a sparse state
#[derive(Debug, Clone, Copy)]
pub struct GateEngine {
    max_qubits: usize,
}

/// The Hadamard split, without the 1/sqrt(2) normalisation
fn split(entry: &StateEntry, mask: BasisIndex) -> [(BasisIndex, Complex64); 2] {
    if entry.bit(mask) {
        [(entry.index & !mask, entry.amplitude), (entry.index, -entry.amplitude)]
    } else {
        [(entry.index, entry.amplitude), (entry.index | mask, entry.amplitude)]
    }
}

/// exp(±iπ/2^k); k = 1 is exactly ±i
fn rotation(k: usize, sign: f64) -> Complex64 {
    if k == 1 {
        Complex64::new(0.0, sign)
    } else {
        Complex64::from_polar(1.0, sign * PI / 2f64.powi(k as i32))
    }
}

/// Widen the index by duplicating the `mask` bit into a new bit just above it
pub fn clone_bit(index: BasisIndex, mask: BasisIndex) -> BasisIndex {
    let below = index & (mask - 1);
    let bit = index & mask;
    let above = index & !(mask | (mask - 1));
    (above << 1) | (bit << 1) | bit | below
}

/// Narrow the index by removing the `mask` bit; higher bits shift down
pub fn delete_bit(index: BasisIndex, mask: BasisIndex) -> BasisIndex {
    ((index >> 1) & !(mask - 1)) | (index & (mask - 1))
}

fn permute<F>(state: &SparseState, f: F) -> Result<SparseState>
where
    F: Fn(BasisIndex) -> BasisIndex,
{
    SparseState::from_amplitudes(state.iter().map(|entry| (f(entry.index), entry.amplitude)))
}

fn hadamard(state: &SparseState, mask: BasisIndex) -> Result<SparseState> {
    SparseState::from_amplitudes(state.iter().flat_map(|entry| split(entry, mask)))
}

fn controlled_phase(
    state: &SparseState,
    mask: BasisIndex,
    controls: BasisIndex,
    phase: Complex64,
) -> Result<SparseState> {
    SparseState::from_amplitudes(state.iter().map(|entry| {
        if entry.bit(mask) && entry.index & controls == controls {
            (entry.index, entry.amplitude * phase)
        } else {
            (entry.index, entry.amplitude)
        }
    }))
}

/// Reverse the bits of the swap group for every entry whose controls are set
fn swap_group(state: &SparseState, masks: &[BasisIndex], controls: BasisIndex) -> Result<SparseState> {
    permute(state, |index| {
        if index & controls != controls {
            return index;
        }
        let cleared = masks.iter().fold(index, |acc, mask| acc & !mask);
        masks
            .iter()
            .zip(masks.iter().rev())
            .filter(|(from, _)| index & **from != 0)
            .fold(cleared, |acc, (_, to)| acc | to)
    })
}

/// Forward QFT step for one position: split, then rotate by exp(iπ/2^k) for
/// the k-th later `f` position whose qubit is set, when the target bit is set
fn qft(state: &SparseState, mask: BasisIndex, later: &[BasisIndex]) -> Result<SparseState> {
    let mut next = SparseState::empty();
    for entry in state {
        for (index, amplitude) in split(entry, mask) {
            let amplitude = if index & mask != 0 {
                later
                    .iter()
                    .enumerate()
                    .filter(|(_, control)| entry.index & **control != 0)
                    .fold(amplitude, |acc, (k, _)| acc * rotation(k + 1, 1.0))
            } else {
                amplitude
            };
            next.insert(index, amplitude)?;
        }
    }
    Ok(next)
}

/// Inverse QFT step for one position: rotate by exp(-iπ/2^k) for the k-th
/// earlier `t` position (nearest first) whose qubit is set, then split
fn inverse_qft(state: &SparseState, mask: BasisIndex, earlier: &[BasisIndex]) -> Result<SparseState> {
    let mut next = SparseState::empty();
    for entry in state {
        let amplitude = if entry.bit(mask) {
            earlier
                .iter()
                .enumerate()
                .filter(|(_, control)| entry.index & **control != 0)
                .fold(entry.amplitude, |acc, (k, _)| acc * rotation(k + 1, -1.0))
        } else {
            entry.amplitude
        };
        for (index, amplitude) in split(&StateEntry::new(entry.index, amplitude), mask) {
            next.insert(index, amplitude)?;
        }
    }
    Ok(next)
}

/// Apply the arithmetic oracle to every entry; returns how many entries were
/// left unchanged because of a zero divisor
fn arithmetic(state: &SparseState, oracle: &ArithmeticOracle) -> Result<(SparseState, usize)> {
    let mut skipped = 0;
    let mut next = SparseState::empty();
    for entry in state {
        let index = oracle.apply(entry.index).unwrap_or_else(|| {
            skipped += 1;
            entry.index
        });
        next.insert(index, entry.amplitude)?;
    }
    Ok((next, skipped))
}

impl GateEngine {
    pub fn new(max_qubits: usize) -> Self {
        GateEngine { max_qubits }
    }

    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    /// Register width after the column's clones and deletes, checked at
    /// every step so the column is rejected before any position runs
    fn planned_width(&self, width: usize, column: &GateColumn) -> Result<usize> {
        column.codes().iter().try_fold(width, |current, code| {
            let next = match code {
                GateCode::Clone => current + 1,
                GateCode::Delete => current.saturating_sub(1),
                _ => return Ok(current),
            };
            if next == 0 || next > self.max_qubits {
                return Err(QuicError::InvalidWidth {
                    width: next,
                    max: self.max_qubits,
                });
            }
            Ok(next)
        })
    }

    /// Apply one column to `state` for a register of `width` qubits
    pub fn apply(
        &self,
        state: &SparseState,
        width: usize,
        column: &GateColumn,
        meter: &mut MeasurementUnit,
    ) -> Result<ColumnResult> {
        if column.len() != width {
            return Err(QuicError::ColumnLength {
                expected: width,
                actual: column.len(),
            });
        }
        let new_width = self.planned_width(width, column)?;

        let controls = column.mask_of(GateCode::Control);
        let mut report = ColumnReport::default();
        let mut current = state.clone();
        let mut swap_done = false;
        let mut oracle_done = false;

        for (position, code) in column.codes().iter().enumerate() {
            let mask = column.position_mask(position);
            current = match *code {
                GateCode::H => hadamard(&current, mask)?,
                GateCode::I | GateCode::Control | GateCode::Oracle(_) => current,
                GateCode::X => permute(&current, |index| index ^ mask)?,
                // The controlled family needs at least one `C` in the column
                GateCode::Not | GateCode::Phase | GateCode::T if controls == 0 => current,
                GateCode::Not => permute(&current, |index| {
                    if index & controls == controls {
                        index ^ mask
                    } else {
                        index
                    }
                })?,
                GateCode::Phase => controlled_phase(&current, mask, controls, constants::I)?,
                GateCode::T => controlled_phase(&current, mask, controls, constants::T_PHASE)?,
                GateCode::Swap if swap_done => current,
                GateCode::Swap => {
                    swap_done = true;
                    let masks: Vec<BasisIndex> = column
                        .positions_of(GateCode::Swap)
                        .into_iter()
                        .map(|p| column.position_mask(p))
                        .collect();
                    swap_group(&current, &masks, controls)?
                }
                GateCode::Qft => {
                    let later: Vec<BasisIndex> = column
                        .positions_of(GateCode::Qft)
                        .into_iter()
                        .filter(|&p| p > position)
                        .map(|p| column.position_mask(p))
                        .collect();
                    qft(&current, mask, &later)?
                }
                GateCode::InverseQft => {
                    let earlier: Vec<BasisIndex> = column
                        .positions_of(GateCode::InverseQft)
                        .into_iter()
                        .filter(|&p| p < position)
                        .rev()
                        .map(|p| column.position_mask(p))
                        .collect();
                    inverse_qft(&current, mask, &earlier)?
                }
                GateCode::Clone => permute(&current, |index| clone_bit(index, mask))?,
                GateCode::Delete => permute(&current, |index| delete_bit(index, mask))?,
                GateCode::Measure(mode) => {
                    let (next, outcome) = meter.measure(&current, mask, mode)?;
                    report.outcomes.push((position, outcome));
                    next
                }
                GateCode::OracleResult if oracle_done => current,
                GateCode::OracleResult => {
                    oracle_done = true;
                    let oracle = ArithmeticOracle::from_column(column);
                    let (next, skipped) = arithmetic(&current, &oracle)?;
                    if skipped > 0 {
                        let diagnostic = Diagnostic::ZeroDivisor {
                            position,
                            entries: skipped,
                        };
                        warn!("{}", diagnostic);
                        report.diagnostics.push(diagnostic);
                    }
                    next
                }
                GateCode::Unknown(code) => {
                    let diagnostic = Diagnostic::UnknownCode { position, code };
                    warn!("{}", diagnostic);
                    report.diagnostics.push(diagnostic);
                    current
                }
            };
        }

        debug!(
            "column {} -> {} entries over {} qubits",
            column,
            current.len(),
            new_width
        );
        Ok(ColumnResult {
            width: new_width,
            state: current,
            report,
        })
    }
}
