//! Simulator configuration

use serde::{Deserialize, Serialize};

use crate::error::{QuicError, Result, MAX_REGISTER_WIDTH};

/// Configuration for the sparse simulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Largest register width accepted, including widening by clone
    ///
    /// Must be in 1..=63.
    ///
    /// Default: 31
    pub max_qubits: usize,

    /// Random number generator seed for reproducible `m` measurements
    ///
    /// Default: None (seeded from entropy)
    pub seed: Option<u64>,

    /// Longest parameter list accepted by oracle and function instructions
    ///
    /// Default: 64
    pub max_parameters: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: 31,
            seed: None,
            max_parameters: 64,
        }
    }
}

impl SimulatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with a fixed measurement seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_qubits == 0 || self.max_qubits > MAX_REGISTER_WIDTH {
            return Err(QuicError::InvalidWidth {
                width: self.max_qubits,
                max: MAX_REGISTER_WIDTH,
            });
        }
        Ok(())
    }
}
