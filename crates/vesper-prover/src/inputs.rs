//! Circuit input assembly
//!
//! Inputs are keyed by signal name and serialized the way the proving
//! toolchain reads `input.json`: every number a decimal string, arrays
//! as JSON arrays.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use vesper_core::FieldElement;
use vesper_crypto::MerkleWitness;

use crate::circuit::Circuit;

/// A single input signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Scalar(String),
    Array(Vec<String>),
}

/// Named circuit inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircuitInputs(BTreeMap<String, InputValue>);

impl CircuitInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_scalar(&mut self, name: impl Into<String>, value: impl Display) {
        self.0
            .insert(name.into(), InputValue::Scalar(value.to_string()));
    }

    pub fn insert_array<I, T>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let values = values.into_iter().map(|v| v.to_string()).collect();
        self.0.insert(name.into(), InputValue::Array(values));
    }

    pub fn get(&self, name: &str) -> Option<&InputValue> {
        self.0.get(name)
    }

    pub fn scalar(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(InputValue::Scalar(s)) => Some(s),
            _ => None,
        }
    }

    pub fn array(&self, name: &str) -> Option<&[String]> {
        match self.0.get(name) {
            Some(InputValue::Array(values)) => Some(values),
            _ => None,
        }
    }

    /// Required signals of `circuit` that are absent
    pub fn missing(&self, circuit: Circuit) -> Vec<&'static str> {
        circuit
            .required_inputs()
            .iter()
            .copied()
            .filter(|name| !self.0.contains_key(*name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything the data proof circuit needs, before serialization
#[derive(Debug, Clone)]
pub struct DataProofInputs {
    pub identity_secret: FieldElement,
    pub witness: MerkleWitness,
    pub data: Vec<BigUint>,
    pub epoch: u64,
    pub attester_id: FieldElement,
    pub values: Vec<BigUint>,
}

impl DataProofInputs {
    pub fn to_circuit_inputs(&self) -> CircuitInputs {
        let mut inputs = CircuitInputs::new();
        inputs.insert_scalar("identity_secret", &self.identity_secret);
        inputs.insert_array("state_tree_indexes", &self.witness.path_indices);
        inputs.insert_array("state_tree_elements", &self.witness.siblings);
        inputs.insert_array("data", &self.data);
        inputs.insert_scalar("epoch", self.epoch);
        inputs.insert_scalar("attester_id", &self.attester_id);
        inputs.insert_array("value", &self.values);
        inputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_crypto::{CommitmentTree, IncrementalMerkleTree};

    fn sample_inputs() -> DataProofInputs {
        let mut tree = IncrementalMerkleTree::new(3);
        let index = tree.insert(FieldElement::from_u64(77)).unwrap();
        DataProofInputs {
            identity_secret: FieldElement::from_u64(5),
            witness: tree.create_proof(index).unwrap(),
            data: vec![BigUint::from(10u8), BigUint::from(0u8)],
            epoch: 2,
            attester_id: FieldElement::from_u64(1234),
            values: vec![BigUint::from(3u8), BigUint::from(0u8)],
        }
    }

    #[test]
    fn test_data_proof_inputs_complete() {
        let inputs = sample_inputs().to_circuit_inputs();
        assert!(inputs.missing(Circuit::DataProof).is_empty());
        assert_eq!(inputs.scalar("epoch"), Some("2"));
        assert_eq!(inputs.scalar("attester_id"), Some("1234"));
        assert_eq!(inputs.array("state_tree_indexes").unwrap(), &["0", "0", "0"]);
        assert_eq!(inputs.array("value").unwrap(), &["3", "0"]);
    }

    #[test]
    fn test_json_shape() {
        let inputs = sample_inputs().to_circuit_inputs();
        let json = serde_json::to_value(&inputs).unwrap();
        assert_eq!(json["identity_secret"], "5");
        assert_eq!(json["data"], serde_json::json!(["10", "0"]));

        let back: CircuitInputs = serde_json::from_value(json).unwrap();
        assert_eq!(back, inputs);
    }

    #[test]
    fn test_missing_inputs_reported() {
        let mut inputs = CircuitInputs::new();
        inputs.insert_scalar("epoch", 1);
        let missing = inputs.missing(Circuit::DataProof);
        assert_eq!(missing.len(), 6);
        assert!(!missing.contains(&"epoch"));
    }
}
