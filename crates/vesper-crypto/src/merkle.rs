//! Incremental Merkle tree for the state tree
//!
//! Fixed depth, leaves appended left to right, empty slots hold the zero
//! leaf. Only non-default nodes are stored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use vesper_core::FieldElement;

use crate::hash::hash_pair;

/// Maximum depth of the tree
pub const MAX_DEPTH: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("Tree is full ({capacity} leaves)")]
    Full { capacity: u64 },

    #[error("Leaf index {index} out of bounds ({len} leaves)")]
    IndexOutOfBounds { index: u64, len: u64 },
}

/// Membership witness for a leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleWitness {
    /// The leaf being proven
    pub leaf: FieldElement,
    /// Position of the leaf
    pub index: u64,
    /// Path indices from leaf to root (0 = left, 1 = right)
    pub path_indices: Vec<u8>,
    /// Sibling hashes from leaf to root
    pub siblings: Vec<FieldElement>,
}

impl MerkleWitness {
    /// Compute the root from this witness
    pub fn compute_root(&self) -> FieldElement {
        let mut current = self.leaf.clone();

        for (sibling, is_right) in self.siblings.iter().zip(self.path_indices.iter()) {
            current = if *is_right == 1 {
                hash_pair(sibling, &current)
            } else {
                hash_pair(&current, sibling)
            };
        }

        current
    }

    /// Verify this witness against a root
    pub fn verify(&self, root: &FieldElement) -> bool {
        &self.compute_root() == root
    }
}

/// A fixed-depth append-only commitment tree
pub trait CommitmentTree {
    /// Create an empty tree of the given depth
    fn with_depth(depth: usize) -> Self
    where
        Self: Sized;

    fn depth(&self) -> usize;

    fn root(&self) -> FieldElement;

    /// Append a leaf, returning its index
    fn insert(&mut self, leaf: FieldElement) -> Result<u64, TreeError>;

    /// Index of the first occurrence of `leaf`
    fn index_of(&self, leaf: &FieldElement) -> Option<u64>;

    /// Membership witness for the leaf at `index`
    fn create_proof(&self, index: u64) -> Result<MerkleWitness, TreeError>;
}

/// Sparse incremental Merkle tree
pub struct IncrementalMerkleTree {
    /// Tree depth
    depth: usize,
    /// Inserted leaves in order
    leaves: Vec<FieldElement>,
    /// Non-empty internal nodes: (level, index) -> hash
    nodes: HashMap<(usize, u64), FieldElement>,
    /// Default (empty) hashes at each level
    zeros: Vec<FieldElement>,
}

impl IncrementalMerkleTree {
    /// Create a new empty tree
    pub fn new(depth: usize) -> Self {
        assert!(depth > 0 && depth <= MAX_DEPTH, "depth must be in 1..=32");

        let mut zeros = vec![FieldElement::zero(); depth + 1];
        for i in 1..=depth {
            zeros[i] = hash_pair(&zeros[i - 1], &zeros[i - 1]);
        }

        Self {
            depth,
            leaves: Vec::new(),
            nodes: HashMap::new(),
            zeros,
        }
    }

    /// Number of leaves the tree can hold
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    pub fn len(&self) -> u64 {
        self.leaves.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    fn get_node(&self, level: usize, index: u64) -> FieldElement {
        if level == 0 {
            return self
                .leaves
                .get(index as usize)
                .cloned()
                .unwrap_or_else(|| self.zeros[0].clone());
        }
        self.nodes
            .get(&(level, index))
            .cloned()
            .unwrap_or_else(|| self.zeros[level].clone())
    }

    fn update_path(&mut self, leaf_index: u64) {
        let mut current_index = leaf_index;

        for level in 0..self.depth {
            let (left, right) = if current_index % 2 == 0 {
                (
                    self.get_node(level, current_index),
                    self.get_node(level, current_index + 1),
                )
            } else {
                (
                    self.get_node(level, current_index - 1),
                    self.get_node(level, current_index),
                )
            };

            let parent_index = current_index / 2;
            let parent_hash = hash_pair(&left, &right);

            if parent_hash == self.zeros[level + 1] {
                self.nodes.remove(&(level + 1, parent_index));
            } else {
                self.nodes.insert((level + 1, parent_index), parent_hash);
            }

            current_index = parent_index;
        }
    }
}

impl CommitmentTree for IncrementalMerkleTree {
    fn with_depth(depth: usize) -> Self {
        Self::new(depth)
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn root(&self) -> FieldElement {
        self.get_node(self.depth, 0)
    }

    fn insert(&mut self, leaf: FieldElement) -> Result<u64, TreeError> {
        let index = self.len();
        if index >= self.capacity() {
            return Err(TreeError::Full {
                capacity: self.capacity(),
            });
        }
        self.leaves.push(leaf);
        self.update_path(index);
        Ok(index)
    }

    fn index_of(&self, leaf: &FieldElement) -> Option<u64> {
        self.leaves.iter().position(|l| l == leaf).map(|i| i as u64)
    }

    fn create_proof(&self, index: u64) -> Result<MerkleWitness, TreeError> {
        if index >= self.len() {
            return Err(TreeError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }

        let mut siblings = Vec::with_capacity(self.depth);
        let mut path_indices = Vec::with_capacity(self.depth);
        let mut current_index = index;

        for level in 0..self.depth {
            siblings.push(self.get_node(level, current_index ^ 1));
            path_indices.push((current_index % 2) as u8);
            current_index /= 2;
        }

        Ok(MerkleWitness {
            leaf: self.get_node(0, index),
            index,
            path_indices,
            siblings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree() {
        let tree = IncrementalMerkleTree::new(10);
        assert_eq!(tree.root(), tree.zeros[10]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_insert_and_prove() {
        let mut tree = IncrementalMerkleTree::new(17);
        let leaf = FieldElement::from_u64(1);

        let index = tree.insert(leaf.clone()).unwrap();
        assert_eq!(index, 0);
        assert_eq!(tree.index_of(&leaf), Some(0));

        let witness = tree.create_proof(index).unwrap();
        assert_eq!(witness.leaf, leaf);
        assert_eq!(witness.siblings.len(), 17);
        assert_eq!(witness.path_indices, vec![0u8; 17]);
        assert!(witness.verify(&tree.root()));
    }

    #[test]
    fn test_multiple_inserts() {
        let mut tree = IncrementalMerkleTree::new(4);

        for v in 1..=5u64 {
            tree.insert(FieldElement::from_u64(v)).unwrap();
        }

        let root = tree.root();
        for i in 0..5 {
            let witness = tree.create_proof(i).unwrap();
            assert!(witness.verify(&root), "leaf {} should verify", i);
        }

        let witness = tree.create_proof(3).unwrap();
        assert_eq!(witness.path_indices, vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_tampered_witness_fails() {
        let mut tree = IncrementalMerkleTree::new(4);
        tree.insert(FieldElement::from_u64(1)).unwrap();
        tree.insert(FieldElement::from_u64(2)).unwrap();

        let mut witness = tree.create_proof(1).unwrap();
        witness.leaf = FieldElement::from_u64(3);
        assert!(!witness.verify(&tree.root()));
    }

    #[test]
    fn test_full_tree_and_bad_index() {
        let mut tree = IncrementalMerkleTree::new(1);
        tree.insert(FieldElement::from_u64(1)).unwrap();
        tree.insert(FieldElement::from_u64(2)).unwrap();

        assert_eq!(
            tree.insert(FieldElement::from_u64(3)),
            Err(TreeError::Full { capacity: 2 })
        );
        assert!(matches!(
            tree.create_proof(2),
            Err(TreeError::IndexOutOfBounds { index: 2, len: 2 })
        ));
        assert_eq!(tree.index_of(&FieldElement::from_u64(9)), None);
    }
}
