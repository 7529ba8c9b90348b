//! Field elements of the proving system's scalar field
//!
//! Every value that enters a circuit is an element of the BN254 scalar
//! field. Values are carried as `BigUint` and cross serialization
//! boundaries as canonical decimal strings so no precision is lost.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::VesperError;

/// BN254 scalar field modulus, big-endian hex
pub const SNARK_SCALAR_FIELD_HEX: &str =
    "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001";

/// The scalar field modulus as a big integer
pub fn snark_scalar_field() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| {
        BigUint::parse_bytes(SNARK_SCALAR_FIELD_HEX.as_bytes(), 16)
            .expect("modulus constant is valid hex")
    })
}

/// Parse an unsigned integer written in decimal or `0x`-prefixed hex.
pub fn parse_biguint(s: &str) -> Option<BigUint> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if hex.is_empty() {
            return None;
        }
        BigUint::parse_bytes(hex.as_bytes(), 16)
    } else {
        if s.is_empty() {
            return None;
        }
        BigUint::parse_bytes(s.as_bytes(), 10)
    }
}

/// An element of the scalar field, always reduced
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldElement(BigUint);

impl FieldElement {
    /// Reduce an arbitrary integer into the field
    pub fn new(value: BigUint) -> Self {
        let modulus = snark_scalar_field();
        if &value >= modulus {
            Self(value % modulus)
        } else {
            Self(value)
        }
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn from_u64(value: u64) -> Self {
        Self(BigUint::from(value))
    }

    /// Interpret big-endian bytes as an integer and reduce it
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self::new(BigUint::from_bytes_be(bytes))
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Fixed-width big-endian encoding, left-padded to 32 bytes
    pub fn to_bytes32(&self) -> [u8; 32] {
        let bytes = self.0.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        out
    }

    /// `0x`-prefixed lowercase hex, no padding
    pub fn to_hex(&self) -> String {
        format!("0x{}", self.0.to_str_radix(16))
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<BigUint> for FieldElement {
    fn from(value: BigUint) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldElement {
    type Err = VesperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_biguint(s)
            .map(Self::new)
            .ok_or_else(|| VesperError::InvalidValue(format!("not a field element: {:?}", s)))
    }
}

impl Serialize for FieldElement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_str_radix(10))
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduction() {
        let modulus = snark_scalar_field().clone();
        let element = FieldElement::new(modulus.clone() + BigUint::from(5u8));
        assert_eq!(element, FieldElement::from_u64(5));
        assert!(FieldElement::new(modulus).is_zero());
    }

    #[test]
    fn test_parse_decimal_and_hex() {
        assert_eq!(parse_biguint("255"), Some(BigUint::from(255u32)));
        assert_eq!(parse_biguint("0xff"), Some(BigUint::from(255u32)));
        assert_eq!(parse_biguint(" 12 "), Some(BigUint::from(12u32)));
        assert_eq!(parse_biguint(""), None);
        assert_eq!(parse_biguint("0x"), None);
        assert_eq!(parse_biguint("-5"), None);
        assert_eq!(parse_biguint("abc"), None);
    }

    #[test]
    fn test_serde_uses_decimal_strings() {
        let element: FieldElement = "0x1234".parse().unwrap();
        let json = serde_json::to_string(&element).unwrap();
        assert_eq!(json, "\"4660\"");

        let back: FieldElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_to_bytes32() {
        let bytes = FieldElement::from_u64(0x0102).to_bytes32();
        assert_eq!(&bytes[30..], &[0x01, 0x02]);
        assert_eq!(&bytes[..30], &[0u8; 30]);
    }
}
