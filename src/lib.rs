//! Sparse Symbolic Quantum Circuit Emulator
//!
//! This crate simulates small quantum circuits by keeping only the basis
//! states that carry a non-zero amplitude. Circuits are sequences of gate
//! columns, one code per qubit, and can call reversible oracles and classical
//! post-processing functions by numeric id.

pub mod error;
pub mod config;
pub mod quantum;
pub mod oracle;
pub mod simulators;

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::config::SimulatorConfig;
    pub use crate::error::{OracleError, QuicError, Result};
    pub use crate::oracle::{ClassicalFunction, Oracle, OracleRegistry};
    pub use crate::quantum::prelude::*;
    pub use crate::simulators::SparseSimulator;
}

// Version and crate information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
