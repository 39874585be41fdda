//! GF(2) linear solver
//!
//! Each observed value is one row of a homogeneous system over GF(2): a
//! solution `x` satisfies `parity(x & row) == 0` for every row. This is how
//! Simon's algorithm turns measured samples into the hidden XOR mask.

use log::debug;

use crate::error::{OracleError, MAX_REGISTER_WIDTH};
use crate::oracle::field::low_mask;
use crate::oracle::ClassicalFunction;

pub const FUNCTION_GAUSSIAN_ELIMINATION: u32 = 10;

/// Reduce `rows` in place to reduced row-echelon form, scanning bit
/// positions from 0 upward. Returns the pivot bit of each leading row.
fn reduce(rows: &mut [u64], bit_width: usize) -> Vec<usize> {
    let mut pivots = Vec::new();
    for bit in 0..bit_width {
        let selector = 1u64 << bit;
        let pivot_row = pivots.len();
        let Some(found) = (pivot_row..rows.len()).find(|&row| rows[row] & selector != 0) else {
            continue;
        };
        rows.swap(pivot_row, found);

        let pivot = rows[pivot_row];
        for (row, value) in rows.iter_mut().enumerate() {
            if row != pivot_row && *value & selector != 0 {
                *value ^= pivot;
            }
        }
        pivots.push(bit);
    }
    pivots
}

/// Solve the homogeneous system given by `observed` over `bit_width` bits.
///
/// After reduction a pivot row with a single bit forces that bit to zero and
/// every non-pivot bit is a free parameter. The non-trivial solutions are
/// enumerated in combination order until `capacity` values are produced. If
/// the only solution is zero, or every observed value is zero, the result is
/// the zero vector.
pub fn solve(bit_width: usize, observed: &[u64], capacity: usize) -> Vec<u64> {
    let width_mask = low_mask(bit_width);
    let mut rows: Vec<u64> = observed.iter().map(|value| value & width_mask).collect();
    if rows.iter().all(|&row| row == 0) {
        return vec![0];
    }

    let pivots = reduce(&mut rows, bit_width);
    let pivot_mask = pivots.iter().fold(0u64, |mask, &bit| mask | (1 << bit));

    // One null-space basis vector per free bit: the free bit itself plus every
    // pivot bit whose row depends on it.
    let basis: Vec<u64> = (0..bit_width)
        .filter(|bit| pivot_mask & (1 << bit) == 0)
        .map(|free| {
            pivots
                .iter()
                .zip(&rows)
                .filter(|(_, row)| *row & (1 << free) != 0)
                .fold(1u64 << free, |vector, (&bit, _)| vector | (1 << bit))
        })
        .collect();
    debug!(
        "GF(2) reduction: {} pivots, {} free bits",
        pivots.len(),
        basis.len()
    );

    if basis.is_empty() {
        return vec![0];
    }

    let combinations = 1u64 << basis.len();
    (1..combinations)
        .map(|combination| {
            basis
                .iter()
                .enumerate()
                .filter(|(k, _)| combination & (1 << k) != 0)
                .fold(0u64, |solution, (_, vector)| solution ^ vector)
        })
        .take(capacity)
        .collect()
}

/// Registry adapter for [`solve`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianElimination;

impl ClassicalFunction for GaussianElimination {
    fn name(&self) -> &'static str {
        "GF(2) Gaussian elimination"
    }

    fn evaluate(
        &self,
        bit_count: usize,
        _params: &[u64],
        observed: &[u64],
        capacity: usize,
    ) -> Result<Vec<u64>, OracleError> {
        if bit_count == 0 || bit_count > MAX_REGISTER_WIDTH {
            return Err(OracleError::BitWidth {
                bits: bit_count,
                max: MAX_REGISTER_WIDTH,
            });
        }
        Ok(solve(bit_count, observed, capacity))
    }
}
