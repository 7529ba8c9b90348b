//! User identity
//!
//! An identity is a random trapdoor and nullifier. The secret fed to
//! circuits is `H(nullifier, trapdoor)` and the public commitment is
//! `H(secret)`. The serialized form is a JSON array of the two values
//! as `0x` hex, which is what gets persisted between sessions.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use thiserror::Error;
use vesper_core::FieldElement;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::hash::{hash_fields, hash_pair};

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Malformed identity: {0}")]
    Malformed(String),
}

/// A persistent cryptographic identity
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Identity {
    trapdoor: [u8; 32],
    nullifier: [u8; 32],
}

impl Identity {
    /// Generate a fresh random identity
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut trapdoor = [0u8; 32];
        let mut nullifier = [0u8; 32];
        rng.fill_bytes(&mut trapdoor);
        rng.fill_bytes(&mut nullifier);
        Self::from_parts(trapdoor, nullifier)
    }

    /// Build an identity from known trapdoor and nullifier bytes
    pub fn from_parts(trapdoor: [u8; 32], nullifier: [u8; 32]) -> Self {
        Self {
            trapdoor,
            nullifier,
        }
    }

    pub fn trapdoor(&self) -> FieldElement {
        FieldElement::from_bytes_be(&self.trapdoor)
    }

    pub fn nullifier(&self) -> FieldElement {
        FieldElement::from_bytes_be(&self.nullifier)
    }

    /// The identity secret used as a private circuit input
    pub fn secret(&self) -> FieldElement {
        hash_pair(&self.nullifier(), &self.trapdoor())
    }

    /// Public commitment to the identity
    pub fn commitment(&self) -> FieldElement {
        hash_fields(&[self.secret()])
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("commitment", &self.commitment().to_hex())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[\"0x{}\",\"0x{}\"]",
            hex::encode(self.trapdoor),
            hex::encode(self.nullifier)
        )
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<String> =
            serde_json::from_str(s).map_err(|e| IdentityError::Malformed(e.to_string()))?;
        if parts.len() != 2 {
            return Err(IdentityError::Malformed(format!(
                "expected 2 components, got {}",
                parts.len()
            )));
        }
        Ok(Self::from_parts(
            decode_component(&parts[0])?,
            decode_component(&parts[1])?,
        ))
    }
}

fn decode_component(s: &str) -> Result<[u8; 32], IdentityError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s).map_err(|e| IdentityError::Malformed(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| IdentityError::Malformed("invalid byte length".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_random() {
        let a = Identity::generate();
        let b = Identity::generate();
        assert_ne!(a.secret(), b.secret());
        assert_ne!(a.commitment(), b.commitment());
    }

    #[test]
    fn test_string_roundtrip() {
        let id = Identity::generate();
        let restored: Identity = id.to_string().parse().unwrap();
        assert_eq!(restored, id);
        assert_eq!(restored.secret(), id.secret());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("not json".parse::<Identity>().is_err());
        assert!(r#"["0x01"]"#.parse::<Identity>().is_err());
        assert!(r#"["0x01","0x02"]"#.parse::<Identity>().is_err());
    }

    #[test]
    fn test_debug_hides_secret_material() {
        let id = Identity::from_parts([0xab; 32], [0xcd; 32]);
        let debug = format!("{:?}", id);
        assert!(!debug.contains(&hex::encode([0xab; 32])));
        assert!(debug.contains("commitment"));
    }
}
