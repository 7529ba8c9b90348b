//! Epoch user state
//!
//! Owns the user's identity, the pending data vector (what has been
//! attested so far) and the provable data vector (the last committed
//! snapshot). Only the provable vector is ever used in proofs.
//!
//! Every operation that depends on time takes `now` (seconds since the
//! Unix epoch) from the caller.

use std::marker::PhantomData;
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{debug, info, warn};
use vesper_core::field::parse_biguint;
use vesper_core::{AttestationRequest, DataProofPayload, UserConfig, VesperError};
use vesper_crypto::{
    attester_field, epoch_key, state_tree_leaf, CommitmentTree, IncrementalMerkleTree, Identity,
};
use vesper_prover::{Circuit, DataProof, DataProofInputs, Prover};

use crate::epoch::EpochClock;
use crate::store::{keys, KeyValueStore};

/// Per-user epoch accounting and proof orchestration
pub struct UserState<S: KeyValueStore, T: CommitmentTree = IncrementalMerkleTree> {
    config: UserConfig,
    store: S,
    prover: Arc<dyn Prover>,
    identity: Identity,
    start_timestamp: Option<u64>,
    has_signed_up: bool,
    latest_transitioned_epoch: u64,
    data: Vec<BigUint>,
    provable_data: Vec<BigUint>,
    _tree: PhantomData<fn() -> T>,
}

impl<S: KeyValueStore, T: CommitmentTree> UserState<S, T> {
    /// Hydrate from `store`, creating and persisting an identity if the
    /// store has none. Missing data fields load as zero.
    pub fn load(config: UserConfig, mut store: S, prover: Arc<dyn Prover>) -> Result<Self, VesperError> {
        config.validate()?;

        let identity = match store.get(keys::IDENTITY)? {
            Some(serialized) => serialized
                .parse::<Identity>()
                .map_err(|e| VesperError::Storage(e.to_string()))?,
            None => {
                let identity = Identity::generate();
                store.set(keys::IDENTITY, &identity.to_string())?;
                info!("Generated new identity {}", identity.commitment().to_hex());
                identity
            }
        };

        let start_timestamp = match store.get(keys::START_TIMESTAMP)? {
            Some(s) => Some(s.trim().parse::<u64>().map_err(|_| {
                VesperError::Storage(format!("invalid {}: {:?}", keys::START_TIMESTAMP, s))
            })?),
            None => None,
        };

        let field_count = config.protocol.field_count;
        let mut data = Vec::with_capacity(field_count);
        let mut provable_data = Vec::with_capacity(field_count);
        for i in 0..field_count {
            data.push(load_field(&store, &keys::data(i))?);
            provable_data.push(load_field(&store, &keys::provable_data(i))?);
        }

        debug!(
            "Loaded user state: attester={}, fields={}, start={:?}",
            config.attester_id, field_count, start_timestamp
        );

        Ok(Self {
            config,
            store,
            prover,
            identity,
            start_timestamp,
            has_signed_up: false,
            latest_transitioned_epoch: 0,
            data,
            provable_data,
            _tree: PhantomData,
        })
    }

    /// The epoch clock, fixing the start timestamp to `now` on first use
    pub fn epoch_clock(&mut self, now: u64) -> Result<EpochClock, VesperError> {
        let start = match self.start_timestamp {
            Some(start) => start,
            None => {
                self.store.set(keys::START_TIMESTAMP, &now.to_string())?;
                self.start_timestamp = Some(now);
                info!("Epoch 0 starts at {}", now);
                now
            }
        };
        Ok(EpochClock::new(start, self.config.epoch_length))
    }

    pub fn current_epoch(&mut self, now: u64) -> Result<u64, VesperError> {
        Ok(self.epoch_clock(now)?.current_epoch(now))
    }

    pub fn remaining_time(&mut self, now: u64) -> Result<u64, VesperError> {
        Ok(self.epoch_clock(now)?.remaining_time(now))
    }

    /// Epoch key for `nonce` in the current epoch, as `0x` hex
    pub fn epoch_key(&mut self, nonce: u8, now: u64) -> Result<String, VesperError> {
        let max = self.config.protocol.num_epoch_key_nonce_per_epoch;
        if nonce >= max {
            return Err(VesperError::InvalidEpochKeyNonce { nonce, max });
        }
        let epoch = self.current_epoch(now)?;
        let key = epoch_key(&self.identity.secret(), &self.config.attester_id, epoch, nonce);
        Ok(key.to_hex())
    }

    pub fn signup(&mut self, now: u64) -> Result<(), VesperError> {
        self.has_signed_up = true;
        self.latest_transitioned_epoch = self.current_epoch(now)?;
        info!("Signed up at epoch {}", self.latest_transitioned_epoch);
        Ok(())
    }

    /// Apply an attestation to the pending data.
    ///
    /// Empty-string entries are ignored. Sum fields accumulate; the other
    /// fields are replaced by the value shifted left by the nonce bits.
    /// Every entry is validated before any field changes.
    pub fn request_data(&mut self, request: &AttestationRequest) -> Result<(), VesperError> {
        let entries: Vec<_> = request.iter().filter(|(_, v)| !v.is_empty()).collect();
        if entries.is_empty() {
            return Err(VesperError::EmptyAttestation);
        }

        let mut updates = Vec::with_capacity(entries.len());
        for (&index, value) in entries {
            self.check_index(index)?;
            updates.push((index, value.to_biguint()?));
        }

        let protocol = &self.config.protocol;
        for (index, value) in updates {
            if protocol.is_sum_field(index) {
                self.data[index] += value;
            } else {
                self.data[index] = value << protocol.repl_nonce_bits;
            }
            self.store
                .set(&keys::data(index), &self.data[index].to_string())?;
            debug!("data[{}] = {}", index, self.data[index]);
        }

        Ok(())
    }

    /// Commit the pending data into the provable snapshot
    pub fn state_transition(&mut self, now: u64) -> Result<(), VesperError> {
        for i in 0..self.config.protocol.field_count {
            self.provable_data[i] = self.data[i].clone();
            self.store
                .set(&keys::provable_data(i), &self.provable_data[i].to_string())?;
        }
        self.latest_transitioned_epoch = self.current_epoch(now)?;
        info!(
            "State transition committed at epoch {}",
            self.latest_transitioned_epoch
        );
        Ok(())
    }

    /// Build the data proof inputs for `claims` against the provable
    /// snapshot at the current epoch. No proving happens here.
    pub fn prepare_data_proof(
        &mut self,
        claims: &AttestationRequest,
        now: u64,
    ) -> Result<DataProofInputs, VesperError> {
        let field_count = self.config.protocol.field_count;
        let mut values = vec![BigUint::zero(); field_count];
        for (&index, value) in claims {
            self.check_index(index)?;
            if !value.is_empty() {
                values[index] = value.to_biguint()?;
            }
        }

        let epoch = self.current_epoch(now)?;
        let data = self.provable_data.clone();
        let identity_secret = self.identity.secret();

        let leaf = state_tree_leaf(&identity_secret, &self.config.attester_id, epoch, &data);
        let mut tree = T::with_depth(self.config.protocol.state_tree_depth);
        tree.insert(leaf.clone())
            .map_err(|e| VesperError::ProofGenerationFailed(e.to_string()))?;
        let index = tree.index_of(&leaf).ok_or_else(|| {
            VesperError::ProofGenerationFailed("state tree leaf missing after insert".into())
        })?;
        let witness = tree
            .create_proof(index)
            .map_err(|e| VesperError::ProofGenerationFailed(e.to_string()))?;

        Ok(DataProofInputs {
            identity_secret,
            witness,
            data,
            epoch,
            attester_id: attester_field(&self.config.attester_id),
            values,
        })
    }

    /// Prove `claims` against the provable snapshot and verify the result
    pub async fn prove_data(
        &mut self,
        claims: &AttestationRequest,
        now: u64,
    ) -> Result<DataProofPayload, VesperError> {
        let inputs = self.prepare_data_proof(claims, now)?;
        let prover = Arc::clone(&self.prover);
        generate_data_proof(prover.as_ref(), &inputs).await
    }

    fn check_index(&self, index: usize) -> Result<(), VesperError> {
        let field_count = self.config.protocol.field_count;
        if index >= field_count {
            return Err(VesperError::FieldOutOfRange { index, field_count });
        }
        Ok(())
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn config(&self) -> &UserConfig {
        &self.config
    }

    pub fn attester_id(&self) -> &str {
        &self.config.attester_id
    }

    pub fn epoch_length(&self) -> u64 {
        self.config.epoch_length
    }

    pub fn field_count(&self) -> usize {
        self.config.protocol.field_count
    }

    pub fn sum_field_count(&self) -> usize {
        self.config.protocol.sum_field_count
    }

    pub fn repl_nonce_bits(&self) -> u32 {
        self.config.protocol.repl_nonce_bits
    }

    pub fn num_epoch_key_nonce_per_epoch(&self) -> u8 {
        self.config.protocol.num_epoch_key_nonce_per_epoch
    }

    pub fn start_timestamp(&self) -> Option<u64> {
        self.start_timestamp
    }

    pub fn has_signed_up(&self) -> bool {
        self.has_signed_up
    }

    pub fn latest_transitioned_epoch(&self) -> u64 {
        self.latest_transitioned_epoch
    }

    /// Pending data, not yet provable
    pub fn data(&self) -> &[BigUint] {
        &self.data
    }

    /// Last committed snapshot
    pub fn provable_data(&self) -> &[BigUint] {
        &self.provable_data
    }

    pub fn prover(&self) -> Arc<dyn Prover> {
        Arc::clone(&self.prover)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Prove and verify prepared data proof inputs.
///
/// Prover failures surface as `ProofGenerationFailed`. A proof that is
/// generated but does not verify is returned with `valid: false`.
pub async fn generate_data_proof(
    prover: &dyn Prover,
    inputs: &DataProofInputs,
) -> Result<DataProofPayload, VesperError> {
    let circuit_inputs = inputs.to_circuit_inputs();

    info!(
        "Generating {} proof with {} backend at epoch {}",
        Circuit::DataProof,
        prover.name(),
        inputs.epoch
    );

    let output = prover
        .generate_proof(Circuit::DataProof, &circuit_inputs)
        .await?;
    let proof = DataProof::from(output);
    let valid = proof.verify(prover).await?;

    if !valid {
        warn!("Generated data proof did not verify");
    }

    Ok(proof.into_payload(valid))
}

fn load_field<S: KeyValueStore>(store: &S, key: &str) -> Result<BigUint, VesperError> {
    match store.get(key)? {
        Some(s) => parse_biguint(&s)
            .ok_or_else(|| VesperError::Storage(format!("invalid {}: {:?}", key, s))),
        None => Ok(BigUint::zero()),
    }
}
