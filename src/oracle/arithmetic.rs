//! In-column arithmetic oracle
//!
//! Positions coded `n + - * / ^ %` name operand fields and `=` names the
//! result field. The working value starts from the `n` field and is combined
//! with each operand present, in the fixed order multiply, divide, add,
//! subtract, power, modulo, on a signed 64-bit value. The result is XORed
//! into the `=` field in two's complement, so running the same column twice
//! restores every index.

use crate::oracle::field::{extract_field, scatter_field};
use crate::quantum::gate::{GateCode, GateColumn, OracleRole};
use crate::quantum::state::BasisIndex;

/// Field masks for every oracle role, taken from one column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArithmeticOracle {
    pub number: BasisIndex,
    pub add: BasisIndex,
    pub sub: BasisIndex,
    pub mul: BasisIndex,
    pub div: BasisIndex,
    pub pow: BasisIndex,
    pub modulus: BasisIndex,
    pub result: BasisIndex,
}

impl ArithmeticOracle {
    /// Derive every role mask from the column's layout
    pub fn from_column(column: &GateColumn) -> Self {
        let role = |role| column.mask_of(GateCode::Oracle(role));
        ArithmeticOracle {
            number: role(OracleRole::Number),
            add: role(OracleRole::Add),
            sub: role(OracleRole::Sub),
            mul: role(OracleRole::Mul),
            div: role(OracleRole::Div),
            pow: role(OracleRole::Pow),
            modulus: role(OracleRole::Mod),
            result: column.mask_of(GateCode::OracleResult),
        }
    }

    /// Compute the working value for `index`.
    ///
    /// The working value is a signed 64-bit integer: `+ - * ^` wrap, `/` and
    /// `%` truncate toward zero, so a negative value stays negative through
    /// `%` and reaches the result field in two's complement. Returns `None`
    /// when a present divisor or modulus field reads zero.
    pub fn evaluate(&self, index: BasisIndex) -> Option<u64> {
        // Fields are at most 63 bits wide, so every operand is non-negative
        let operand = |mask| extract_field(mask, index) as i64;
        let mut value = operand(self.number);

        if self.mul != 0 {
            value = value.wrapping_mul(operand(self.mul));
        }
        if self.div != 0 {
            value = value.checked_div(operand(self.div))?;
        }
        if self.add != 0 {
            value = value.wrapping_add(operand(self.add));
        }
        if self.sub != 0 {
            value = value.wrapping_sub(operand(self.sub));
        }
        if self.pow != 0 {
            let exponent = u32::try_from(operand(self.pow)).unwrap_or(u32::MAX);
            value = value.wrapping_pow(exponent);
        }
        if self.modulus != 0 {
            value = value.checked_rem(operand(self.modulus))?;
        }
        Some(value as u64)
    }

    /// New index with the result XORed into the result field, or `None`
    /// when [`evaluate`](Self::evaluate) hits a zero divisor
    pub fn apply(&self, index: BasisIndex) -> Option<BasisIndex> {
        self.evaluate(index)
            .map(|value| index ^ scatter_field(self.result, value))
    }
}
