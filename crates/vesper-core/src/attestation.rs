//! Attestation payloads
//!
//! An attestation is a sparse mapping from field index to a value.
//! Values arrive either as plain numbers or as strings (decimal or
//! `0x` hex), exactly as a form or JSON payload would hand them over.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::VesperError;
use crate::field::parse_biguint;

/// Sparse field-index to value mapping, iterated in ascending index order
pub type AttestationRequest = BTreeMap<usize, AttestationValue>;

/// A numeric-or-string attestation value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttestationValue {
    Number(u64),
    Text(String),
}

impl AttestationValue {
    /// Only the empty string counts as "no value"; `0` is a real value.
    pub fn is_empty(&self) -> bool {
        matches!(self, AttestationValue::Text(s) if s.is_empty())
    }

    pub fn to_biguint(&self) -> Result<BigUint, VesperError> {
        match self {
            AttestationValue::Number(n) => Ok(BigUint::from(*n)),
            AttestationValue::Text(s) => parse_biguint(s).ok_or_else(|| {
                VesperError::InvalidValue(format!("expected a non-negative integer, got {:?}", s))
            }),
        }
    }
}

impl From<u64> for AttestationValue {
    fn from(value: u64) -> Self {
        AttestationValue::Number(value)
    }
}

impl From<&str> for AttestationValue {
    fn from(value: &str) -> Self {
        AttestationValue::Text(value.to_string())
    }
}

impl From<String> for AttestationValue {
    fn from(value: String) -> Self {
        AttestationValue::Text(value)
    }
}

impl fmt::Display for AttestationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttestationValue::Number(n) => write!(f, "{}", n),
            AttestationValue::Text(s) => write!(f, "{}", s),
        }
    }
}
