//! State-tree leaves and epoch keys
//!
//! Both are deterministic digests over the identity secret, the attester
//! and the epoch. A leaf additionally commits to the user's provable data.

use num_bigint::BigUint;
use vesper_core::field::parse_biguint;
use vesper_core::FieldElement;

use crate::hash::{hash_fields, sha3_256};

/// Map an attester id into the field.
///
/// Numeric ids (decimal or `0x` hex) are used as-is; anything else is
/// hashed.
pub fn attester_field(attester_id: &str) -> FieldElement {
    match parse_biguint(attester_id) {
        Some(value) => FieldElement::new(value),
        None => FieldElement::from_bytes_be(&sha3_256(attester_id.as_bytes())),
    }
}

/// Compute the state-tree leaf for `data` at `epoch`
pub fn state_tree_leaf(
    identity_secret: &FieldElement,
    attester_id: &str,
    epoch: u64,
    data: &[BigUint],
) -> FieldElement {
    let owner = hash_fields(&[
        identity_secret.clone(),
        attester_field(attester_id),
        FieldElement::from_u64(epoch),
    ]);
    let data_fields: Vec<FieldElement> = data.iter().cloned().map(FieldElement::new).collect();
    let data_hash = hash_fields(&data_fields);
    hash_fields(&[owner, data_hash])
}

/// Compute the epoch key for `nonce` at `epoch`
pub fn epoch_key(
    identity_secret: &FieldElement,
    attester_id: &str,
    epoch: u64,
    nonce: u8,
) -> FieldElement {
    hash_fields(&[
        identity_secret.clone(),
        attester_field(attester_id),
        FieldElement::from_u64(epoch),
        FieldElement::from_u64(nonce as u64),
    ])
}
