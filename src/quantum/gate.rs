// src/quantum/gate.rs
//! Gate alphabet and gate columns
//!
//! A column is one simulation step: one gate code per qubit, qubit 0 first.
//! The code at position `p` of an `n`-qubit column acts on bit `n - 1 - p`
//! of the basis index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quantum::state::BasisIndex;

/// Common complex numbers used by the phase gates
pub mod constants {
    use num_complex::Complex64;

    /// The imaginary unit i
    pub const I: Complex64 = Complex64::new(0.0, 1.0);

    /// 1/sqrt(2)
    pub const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;

    /// (1 + i)/sqrt(2), the π/8 phase
    pub const T_PHASE: Complex64 = Complex64::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2);
}

/// Roles a position can take in an in-column arithmetic oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OracleRole {
    /// `n`: seeds the working value
    Number,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`
    Pow,
    /// `%`
    Mod,
}

/// Measurement modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementMode {
    /// `0`: keep only the branch where the qubit is 0
    Fixed0,
    /// `1`: keep only the branch where the qubit is 1
    Fixed1,
    /// `m`: sample the outcome
    Random,
}

/// One gate code of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateCode {
    /// `H` Hadamard split
    H,
    /// `I` identity
    I,
    /// `X` not
    X,
    /// `C` control for N, P, T and s in the same column
    Control,
    /// `N` controlled-not target
    Not,
    /// `P` controlled phase i
    Phase,
    /// `T` controlled phase (1+i)/sqrt(2)
    T,
    /// `s` swap group member
    Swap,
    /// `f` quantum Fourier transform
    Qft,
    /// `t` inverse quantum Fourier transform
    InverseQft,
    /// `c` clone the qubit into a new position below it
    Clone,
    /// `d` delete the qubit
    Delete,
    /// `0`, `1`, `m`
    Measure(MeasurementMode),
    /// `n + - * / ^ %`
    Oracle(OracleRole),
    /// `=` arithmetic oracle result, triggers the oracle
    OracleResult,
    /// Anything else; treated as identity and reported
    Unknown(char),
}

impl GateCode {
    pub fn from_char(code: char) -> Self {
        match code {
            'H' => GateCode::H,
            'I' => GateCode::I,
            'X' => GateCode::X,
            'C' => GateCode::Control,
            'N' => GateCode::Not,
            'P' => GateCode::Phase,
            'T' => GateCode::T,
            's' => GateCode::Swap,
            'f' => GateCode::Qft,
            't' => GateCode::InverseQft,
            'c' => GateCode::Clone,
            'd' => GateCode::Delete,
            '0' => GateCode::Measure(MeasurementMode::Fixed0),
            '1' => GateCode::Measure(MeasurementMode::Fixed1),
            'm' => GateCode::Measure(MeasurementMode::Random),
            'n' => GateCode::Oracle(OracleRole::Number),
            '+' => GateCode::Oracle(OracleRole::Add),
            '-' => GateCode::Oracle(OracleRole::Sub),
            '*' => GateCode::Oracle(OracleRole::Mul),
            '/' => GateCode::Oracle(OracleRole::Div),
            '^' => GateCode::Oracle(OracleRole::Pow),
            '%' => GateCode::Oracle(OracleRole::Mod),
            '=' => GateCode::OracleResult,
            other => GateCode::Unknown(other),
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            GateCode::H => 'H',
            GateCode::I => 'I',
            GateCode::X => 'X',
            GateCode::Control => 'C',
            GateCode::Not => 'N',
            GateCode::Phase => 'P',
            GateCode::T => 'T',
            GateCode::Swap => 's',
            GateCode::Qft => 'f',
            GateCode::InverseQft => 't',
            GateCode::Clone => 'c',
            GateCode::Delete => 'd',
            GateCode::Measure(MeasurementMode::Fixed0) => '0',
            GateCode::Measure(MeasurementMode::Fixed1) => '1',
            GateCode::Measure(MeasurementMode::Random) => 'm',
            GateCode::Oracle(OracleRole::Number) => 'n',
            GateCode::Oracle(OracleRole::Add) => '+',
            GateCode::Oracle(OracleRole::Sub) => '-',
            GateCode::Oracle(OracleRole::Mul) => '*',
            GateCode::Oracle(OracleRole::Div) => '/',
            GateCode::Oracle(OracleRole::Pow) => '^',
            GateCode::Oracle(OracleRole::Mod) => '%',
            GateCode::OracleResult => '=',
            GateCode::Unknown(other) => *other,
        }
    }
}

impl fmt::Display for GateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One simulation step, one code per qubit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateColumn {
    codes: Vec<GateCode>,
}

impl GateColumn {
    pub fn new(codes: Vec<GateCode>) -> Self {
        GateColumn { codes }
    }

    /// Parse a column such as `"HI"` or `"CCN"`, one character per qubit
    pub fn parse(column: &str) -> Self {
        GateColumn {
            codes: column.chars().map(GateCode::from_char).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &[GateCode] {
        &self.codes
    }

    /// Bit selecting the qubit at `position`, or `None` outside the column
    pub fn mask(&self, position: usize) -> Option<BasisIndex> {
        (position < self.codes.len()).then(|| self.position_mask(position))
    }

    /// Unchecked [`mask`](Self::mask) for positions taken from this column
    pub(crate) fn position_mask(&self, position: usize) -> BasisIndex {
        1 << (self.codes.len() - 1 - position)
    }

    /// Union of the masks of every position carrying `code`
    pub fn mask_of(&self, code: GateCode) -> BasisIndex {
        self.codes
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == code)
            .fold(0, |mask, (position, _)| mask | self.position_mask(position))
    }

    /// Positions carrying `code`, left to right
    pub fn positions_of(&self, code: GateCode) -> Vec<usize> {
        self.codes
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == code)
            .map(|(position, _)| position)
            .collect()
    }
}

impl From<&str> for GateColumn {
    fn from(column: &str) -> Self {
        GateColumn::parse(column)
    }
}

impl fmt::Display for GateColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for code in &self.codes {
            write!(f, "{}", code)?;
        }
        Ok(())
    }
}
