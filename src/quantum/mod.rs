// src/quantum/mod.rs
//! Sparse state evolution
//!
//! This module implements the sparse superposition, the gate alphabet, the
//! column engine and measurement.

pub mod state;
pub mod gate;
pub mod measurement;
pub mod engine;

pub use state::{BasisIndex, SparseState, StateEntry};
pub use gate::{GateCode, GateColumn, MeasurementMode, OracleRole};
pub use measurement::{MeasurementUnit, Outcome};
pub use engine::{ColumnReport, ColumnResult, Diagnostic, GateEngine};

/// Re-export commonly used types
pub mod prelude {
    pub use super::{BasisIndex, SparseState, StateEntry};
    pub use super::{GateCode, GateColumn, MeasurementMode};
    pub use super::{ColumnReport, Diagnostic, Outcome};
}
