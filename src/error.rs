//! Error types for the emulator
//!
//! Every instruction the simulator accepts returns a [`Result`]. An error
//! means the instruction was skipped and the previous state is still in
//! place; nothing in this crate aborts a run.

use thiserror::Error;

/// Largest register width a basis index can address with room to clone.
pub const MAX_REGISTER_WIDTH: usize = 63;

/// Errors raised by oracles and classical functions while evaluating
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// A positional parameter the oracle needs was not supplied
    #[error("{oracle} needs parameter #{position} ({name})")]
    MissingParameter {
        oracle: &'static str,
        position: usize,
        name: &'static str,
    },

    /// Modular arithmetic with a zero modulus
    #[error("{oracle} called with a zero modulus")]
    ZeroModulus { oracle: &'static str },

    /// Requested bit width cannot be represented
    #[error("bit width {bits} is outside 1..={max}")]
    BitWidth { bits: usize, max: usize },
}

/// Errors that can occur while running a circuit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuicError {
    /// Register width is zero or above the configured maximum
    #[error("register width {width} is outside 1..={max}")]
    InvalidWidth { width: usize, max: usize },

    /// Column does not carry one code per qubit
    #[error("gate column has {actual} codes but the register has {expected} qubits")]
    ColumnLength { expected: usize, actual: usize },

    /// Qubit position outside the register
    #[error("qubit {qubit} is out of range for a {width}-qubit register")]
    QubitOutOfRange { qubit: usize, width: usize },

    /// No oracle registered under this id
    #[error("no oracle registered as #{0}")]
    UnknownOracle(u32),

    /// No classical function registered under this id
    #[error("no function registered as #{0}")]
    UnknownFunction(u32),

    /// Instruction invoked while the state holds no entries
    #[error("cannot run {0} on an empty state")]
    EmptyState(&'static str),

    /// Parameter list token is not an unsigned integer
    #[error("invalid parameter `{0}`")]
    InvalidParameter(String),

    /// Parameter list longer than the configured maximum
    #[error("{count} parameters given, at most {max} accepted")]
    TooManyParameters { count: usize, max: usize },

    /// The sparse state could not grow
    #[error("unable to grow the state beyond {entries} entries")]
    ResourceExhausted { entries: usize },

    /// Oracle or classical function failed
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, QuicError>;
