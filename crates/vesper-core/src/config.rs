//! Protocol and user configuration

use serde::{Deserialize, Serialize};

use crate::error::VesperError;

/// Circuit-level constants shared by the client and the circuits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Total number of data fields
    pub field_count: usize,

    /// Fields below this index accumulate by addition; the rest are replaced
    pub sum_field_count: usize,

    /// Low-order bits reserved in replacement fields for a nonce
    pub repl_nonce_bits: u32,

    /// Number of distinct epoch keys a user may derive per epoch
    pub num_epoch_key_nonce_per_epoch: u8,

    /// Depth of the state tree
    pub state_tree_depth: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            field_count: 6,
            sum_field_count: 4,
            repl_nonce_bits: 48,
            num_epoch_key_nonce_per_epoch: 3,
            state_tree_depth: 17,
        }
    }
}

impl ProtocolConfig {
    /// Number of replacement-encoded fields
    pub fn repl_field_count(&self) -> usize {
        self.field_count.saturating_sub(self.sum_field_count)
    }

    /// Whether `index` is an additive field
    pub fn is_sum_field(&self, index: usize) -> bool {
        index < self.sum_field_count
    }

    pub fn validate(&self) -> Result<(), VesperError> {
        if self.field_count == 0 {
            return Err(VesperError::Config("field_count must be positive".into()));
        }
        if self.sum_field_count > self.field_count {
            return Err(VesperError::Config(format!(
                "sum_field_count {} exceeds field_count {}",
                self.sum_field_count, self.field_count
            )));
        }
        if self.state_tree_depth == 0 || self.state_tree_depth > 32 {
            return Err(VesperError::Config(format!(
                "state_tree_depth must be in 1..=32, got {}",
                self.state_tree_depth
            )));
        }
        Ok(())
    }
}

/// Per-session user configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Attester this user's data is scoped to
    pub attester_id: String,

    /// Epoch length in seconds
    pub epoch_length: u64,

    /// Circuit constants
    pub protocol: ProtocolConfig,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            attester_id: "1234".to_string(),
            epoch_length: 300,
            protocol: ProtocolConfig::default(),
        }
    }
}

impl UserConfig {
    /// Create a config for a specific attester
    pub fn with_attester(attester_id: impl Into<String>) -> Self {
        Self {
            attester_id: attester_id.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), VesperError> {
        if self.epoch_length == 0 {
            return Err(VesperError::Config("epoch_length must be positive".into()));
        }
        if self.attester_id.trim().is_empty() {
            return Err(VesperError::Config("attester_id must not be empty".into()));
        }
        self.protocol.validate()
    }
}
