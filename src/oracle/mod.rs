//! Oracle dispatch
//!
//! Named oracles and classical functions are looked up by numeric id and run
//! on the whole state in one pass. Oracles are reversible: the computed value
//! is XORed into the output register. Classical functions analyse the set of
//! basis indices present and replace the state with a fresh set of indices.

pub mod arithmetic;
pub mod builtin;
pub mod chaskey;
pub mod field;
pub mod linear_solver;

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use num_complex::Complex64;

use crate::error::{OracleError, QuicError, Result};
use crate::quantum::state::SparseState;

pub use arithmetic::ArithmeticOracle;
pub use field::{extract_field, low_mask, scatter_field};

/// A function of the input register, combined into the output register by XOR
pub trait Oracle: Send + Sync {
    fn name(&self) -> &'static str;

    /// Compute `f(input)`; bits above `output_bits` are discarded by the caller
    fn evaluate(&self, input: u64, output_bits: usize, params: &[u64]) -> std::result::Result<u64, OracleError>;
}

/// Classical post-processing over the distinct observed values
pub trait ClassicalFunction: Send + Sync {
    fn name(&self) -> &'static str;

    /// Produce at most `capacity` values of `bit_count` bits from `observed`
    fn evaluate(
        &self,
        bit_count: usize,
        params: &[u64],
        observed: &[u64],
        capacity: usize,
    ) -> std::result::Result<Vec<u64>, OracleError>;
}

/// Parse whitespace-separated unsigned integers, at most `max` of them
pub fn parse_parameters(text: &str, max: usize) -> Result<Vec<u64>> {
    let params = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<u64>()
                .map_err(|_| QuicError::InvalidParameter(token.to_string()))
        })
        .collect::<Result<Vec<u64>>>()?;
    if params.len() > max {
        return Err(QuicError::TooManyParameters {
            count: params.len(),
            max,
        });
    }
    Ok(params)
}

/// Registry of oracles and classical functions by id
pub struct OracleRegistry {
    oracles: BTreeMap<u32, Box<dyn Oracle>>,
    functions: BTreeMap<u32, Box<dyn ClassicalFunction>>,
}

impl Default for OracleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for OracleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleRegistry")
            .field("oracles", &self.oracles.keys().collect::<Vec<_>>())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl OracleRegistry {
    /// An empty registry
    pub fn new() -> Self {
        OracleRegistry {
            oracles: BTreeMap::new(),
            functions: BTreeMap::new(),
        }
    }

    /// A registry holding every built-in oracle and function
    pub fn with_builtins() -> Self {
        use builtin::*;

        let mut registry = Self::new();
        registry.register_oracle(ORACLE_MODEXP, Box::new(ModularExponentiation));
        registry.register_oracle(ORACLE_EVEN_MANSOUR_MODEXP, Box::new(EvenMansourModExp));
        registry.register_oracle(ORACLE_SHA256, Box::new(Sha256Oracle));
        registry.register_oracle(ORACLE_EVEN_MANSOUR_SHA256, Box::new(EvenMansourSha256));
        registry.register_oracle(ORACLE_CHASKEY12, Box::new(ChaskeyOracle));
        registry.register_function(
            linear_solver::FUNCTION_GAUSSIAN_ELIMINATION,
            Box::new(linear_solver::GaussianElimination),
        );
        registry
    }

    /// Register an oracle, returning any oracle it replaces
    pub fn register_oracle(&mut self, id: u32, oracle: Box<dyn Oracle>) -> Option<Box<dyn Oracle>> {
        self.oracles.insert(id, oracle)
    }

    /// Register a classical function, returning any function it replaces
    pub fn register_function(
        &mut self,
        id: u32,
        function: Box<dyn ClassicalFunction>,
    ) -> Option<Box<dyn ClassicalFunction>> {
        self.functions.insert(id, function)
    }

    pub fn oracle(&self, id: u32) -> Result<&dyn Oracle> {
        self.oracles
            .get(&id)
            .map(|oracle| &**oracle)
            .ok_or(QuicError::UnknownOracle(id))
    }

    pub fn function(&self, id: u32) -> Result<&dyn ClassicalFunction> {
        self.functions
            .get(&id)
            .map(|function| &**function)
            .ok_or(QuicError::UnknownFunction(id))
    }

    /// Run oracle `id` over every entry of `state`.
    ///
    /// The low `output_bits` of each index form the output register and the
    /// remaining high bits the input `x`. The new index is
    /// `index ^ (f(x) & low_mask(output_bits))`.
    pub fn run_oracle(
        &self,
        id: u32,
        width: usize,
        output_bits: usize,
        params: &[u64],
        state: &SparseState,
    ) -> Result<SparseState> {
        let oracle = self.oracle(id)?;
        if state.is_empty() {
            return Err(QuicError::EmptyState("an oracle"));
        }
        if output_bits == 0 || output_bits > width {
            return Err(OracleError::BitWidth {
                bits: output_bits,
                max: width,
            }
            .into());
        }
        debug!(
            "oracle #{} ({}) over {} entries, {} output qubits",
            id,
            oracle.name(),
            state.len(),
            output_bits
        );

        let output_mask = low_mask(output_bits);
        let mut next = SparseState::empty();
        for entry in state {
            let input = entry.index >> output_bits;
            let value = oracle.evaluate(input, output_bits, params)?;
            next.insert(entry.index ^ (value & output_mask), entry.amplitude)?;
        }
        Ok(next)
    }

    /// Run classical function `id` on the distinct indices of `state`.
    ///
    /// The leading `bit_count` qubits of the register are the observed field.
    /// Each returned value is written back into that field with every other
    /// bit cleared, with unit amplitude. At most as many values are returned
    /// as there are distinct observed field values.
    pub fn run_function(
        &self,
        id: u32,
        width: usize,
        bit_count: usize,
        params: &[u64],
        state: &SparseState,
    ) -> Result<SparseState> {
        let function = self.function(id)?;
        if state.is_empty() {
            return Err(QuicError::EmptyState("a function"));
        }
        if bit_count == 0 || bit_count > width {
            return Err(OracleError::BitWidth {
                bits: bit_count,
                max: width,
            }
            .into());
        }

        let field = low_mask(bit_count) << (width - bit_count);
        let observed: Vec<u64> = state
            .iter()
            .map(|entry| extract_field(field, entry.index))
            .collect::<BTreeSet<u64>>()
            .into_iter()
            .collect();
        debug!(
            "function #{} ({}) over {} observed values",
            id,
            function.name(),
            observed.len()
        );

        let values = function.evaluate(bit_count, params, &observed, observed.len())?;
        SparseState::from_amplitudes(
            values
                .into_iter()
                .map(|value| (scatter_field(field, value), Complex64::new(1.0, 0.0))),
        )
    }
}
