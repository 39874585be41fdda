//! Built-in named oracles
//!
//! Each oracle computes `f(x)` for the input register `x`; the registry masks
//! the value to the output width and XORs it into the output register.
//! Parameters are positional:
//!
//! | id | oracle | parameters |
//! |----|--------|------------|
//! | 10 | [`ModularExponentiation`] | base, modulus |
//! | 11 | [`EvenMansourModExp`] | base, modulus, k1, k2 |
//! | 22 | [`Sha256Oracle`] | mask |
//! | 25 | [`EvenMansourSha256`] | mask, k1, k2 |
//! | 42 | [`ChaskeyOracle`] | key low, key high, message low |

use sha2::{Digest, Sha256};

use crate::error::OracleError;
use crate::oracle::chaskey::Chaskey;
use crate::oracle::field::low_mask;
use crate::oracle::Oracle;

pub const ORACLE_MODEXP: u32 = 10;
pub const ORACLE_EVEN_MANSOUR_MODEXP: u32 = 11;
pub const ORACLE_SHA256: u32 = 22;
pub const ORACLE_EVEN_MANSOUR_SHA256: u32 = 25;
pub const ORACLE_CHASKEY12: u32 = 42;

fn param(
    params: &[u64],
    position: usize,
    oracle: &'static str,
    name: &'static str,
) -> Result<u64, OracleError> {
    params
        .get(position)
        .copied()
        .ok_or(OracleError::MissingParameter {
            oracle,
            position: position + 1,
            name,
        })
}

/// `base^exponent mod modulus` by square-and-multiply
pub fn mod_pow(base: u64, exponent: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let modulus = u128::from(modulus);
    let mut base = u128::from(base) % modulus;
    let mut exponent = exponent;
    let mut result = 1u128;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result * base % modulus;
        }
        base = base * base % modulus;
        exponent >>= 1;
    }
    result as u64
}

/// SHA-256 over a 32-byte block: `input` little-endian in bytes 0..8 and the
/// output width in byte 31. The first eight digest bytes are read little-endian.
fn hash_block(input: u64, output_bits: usize) -> u64 {
    let mut block = [0u8; 32];
    block[..8].copy_from_slice(&input.to_le_bytes());
    block[31] = output_bits as u8;
    let digest = Sha256::digest(block);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head) & low_mask(output_bits)
}

/// f(x) = base^x mod modulus; the period-finding oracle behind Shor's algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct ModularExponentiation;

impl Oracle for ModularExponentiation {
    fn name(&self) -> &'static str {
        "modular exponentiation"
    }

    fn evaluate(&self, input: u64, _output_bits: usize, params: &[u64]) -> Result<u64, OracleError> {
        let base = param(params, 0, self.name(), "base")?;
        let modulus = param(params, 1, self.name(), "modulus")?;
        if modulus == 0 {
            return Err(OracleError::ZeroModulus { oracle: self.name() });
        }
        Ok(mod_pow(base, input, modulus))
    }
}

/// Modular exponentiation wrapped in Even–Mansour whitening:
/// f(x) = (base^(x ⊕ k1) mod modulus) ⊕ k2
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenMansourModExp;

impl Oracle for EvenMansourModExp {
    fn name(&self) -> &'static str {
        "Even-Mansour modular exponentiation"
    }

    fn evaluate(&self, input: u64, _output_bits: usize, params: &[u64]) -> Result<u64, OracleError> {
        let base = param(params, 0, self.name(), "base")?;
        let modulus = param(params, 1, self.name(), "modulus")?;
        let k1 = param(params, 2, self.name(), "k1")?;
        let k2 = param(params, 3, self.name(), "k2")?;
        if modulus == 0 {
            return Err(OracleError::ZeroModulus { oracle: self.name() });
        }
        Ok(mod_pow(base, input ^ k1, modulus) ^ k2)
    }
}

/// Truncated SHA-256 of `x ⊕ mask`
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Oracle;

impl Oracle for Sha256Oracle {
    fn name(&self) -> &'static str {
        "SHA-256"
    }

    fn evaluate(&self, input: u64, output_bits: usize, params: &[u64]) -> Result<u64, OracleError> {
        let mask = param(params, 0, self.name(), "mask")?;
        Ok(hash_block(input ^ mask, output_bits))
    }
}

/// Truncated SHA-256 with Even–Mansour whitening:
/// f(x) = H((x ⊕ k1) ⊕ mask) ⊕ k2
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenMansourSha256;

impl Oracle for EvenMansourSha256 {
    fn name(&self) -> &'static str {
        "Even-Mansour SHA-256"
    }

    fn evaluate(&self, input: u64, output_bits: usize, params: &[u64]) -> Result<u64, OracleError> {
        let mask = param(params, 0, self.name(), "mask")?;
        let k1 = param(params, 1, self.name(), "k1")?;
        let k2 = param(params, 2, self.name(), "k2")?;
        Ok(hash_block((input ^ k1) ^ mask, output_bits) ^ k2)
    }
}

/// Chaskey-12 tag over the 16-byte message `message_low ‖ x`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaskeyOracle;

impl Oracle for ChaskeyOracle {
    fn name(&self) -> &'static str {
        "Chaskey-12"
    }

    fn evaluate(&self, input: u64, output_bits: usize, params: &[u64]) -> Result<u64, OracleError> {
        let key_low = param(params, 0, self.name(), "key low")?;
        let key_high = param(params, 1, self.name(), "key high")?;
        let message_low = param(params, 2, self.name(), "message low")?;

        let mut message = [0u8; 16];
        message[..8].copy_from_slice(&message_low.to_le_bytes());
        message[8..].copy_from_slice(&input.to_le_bytes());

        let tag = Chaskey::from_halves(key_low, key_high).tag(&message);
        let mut head = [0u8; 8];
        head.copy_from_slice(&tag[..8]);
        Ok(u64::from_le_bytes(head) & low_mask(output_bits))
    }
}
