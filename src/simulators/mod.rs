//! Quantum circuit simulators
//!
//! This module provides the simulation context that runs gate columns,
//! measurements, oracles and classical functions against a sparse state.

pub mod sparse;

pub use sparse::SparseSimulator;
