//! End-to-end flows over a file-backed store and custom provers

use std::sync::Arc;

use async_trait::async_trait;
use num_bigint::BigUint;
use vesper_core::{AttestationRequest, AttestationValue, DataProofPayload, SnarkProof, UserConfig, VesperError};
use vesper_prover::{Circuit, CircuitInputs, MockProver, ProofOutput, Prover, ProverError};
use vesper_user::{generate_data_proof, keys, FileStore, KeyValueStore, UserState};

const T0: u64 = 1_700_000_000;

fn request(entries: &[(usize, AttestationValue)]) -> AttestationRequest {
    entries.iter().cloned().collect()
}

/// Prover whose artifacts are missing
struct BrokenProver;

#[async_trait]
impl Prover for BrokenProver {
    async fn generate_proof(
        &self,
        circuit: Circuit,
        _inputs: &CircuitInputs,
    ) -> Result<ProofOutput, ProverError> {
        Err(ProverError::ArtifactNotFound(format!("{}.zkey", circuit.id())))
    }

    async fn verify_proof(
        &self,
        _circuit: Circuit,
        _public_signals: &[String],
        _proof: &SnarkProof,
    ) -> Result<bool, ProverError> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "broken"
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Prover that produces proofs its own verifier rejects
struct RejectingProver(MockProver);

#[async_trait]
impl Prover for RejectingProver {
    async fn generate_proof(
        &self,
        circuit: Circuit,
        inputs: &CircuitInputs,
    ) -> Result<ProofOutput, ProverError> {
        self.0.generate_proof(circuit, inputs).await
    }

    async fn verify_proof(
        &self,
        _circuit: Circuit,
        _public_signals: &[String],
        _proof: &SnarkProof,
    ) -> Result<bool, ProverError> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "rejecting"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user.json");

    let (identity, pending, committed) = {
        let store = FileStore::open(&path).unwrap();
        let mut user: UserState<FileStore> =
            UserState::load(UserConfig::default(), store, Arc::new(MockProver::new())).unwrap();

        user.current_epoch(T0).unwrap();
        user.request_data(&request(&[(0, 3u64.into()), (4, "0x2".into())]))
            .unwrap();
        user.state_transition(T0 + 10).unwrap();
        user.request_data(&request(&[(0, 4u64.into())])).unwrap();

        (
            user.identity().to_string(),
            user.data().to_vec(),
            user.provable_data().to_vec(),
        )
    };

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get(keys::IDENTITY).unwrap(), Some(identity.clone()));

    let mut user: UserState<FileStore> =
        UserState::load(UserConfig::default(), store, Arc::new(MockProver::new())).unwrap();

    assert_eq!(user.identity().to_string(), identity);
    assert_eq!(user.data(), pending.as_slice());
    assert_eq!(user.provable_data(), committed.as_slice());
    assert_eq!(user.data()[0], BigUint::from(7u8));
    assert_eq!(user.provable_data()[4], BigUint::from(2u8) << 48u32);

    // Epoch 0 stays anchored at the first session's start
    assert_eq!(user.start_timestamp(), Some(T0));
    assert_eq!(user.current_epoch(T0 + 900).unwrap(), 3);
}

#[test]
fn test_corrupt_field_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user.json");
    let mut store = FileStore::open(&path).unwrap();
    store.set(&keys::data(2), "not-a-number").unwrap();

    let result: Result<UserState<FileStore>, _> =
        UserState::load(UserConfig::default(), store, Arc::new(MockProver::new()));
    assert!(matches!(result, Err(VesperError::Storage(_))));
}

#[tokio::test]
async fn test_prover_failure_surfaces_as_error() {
    let store = vesper_user::MemoryStore::new();
    let mut user: UserState<_> =
        UserState::load(UserConfig::default(), store, Arc::new(BrokenProver)).unwrap();

    let result = user.prove_data(&AttestationRequest::new(), T0).await;
    match result {
        Err(VesperError::ProofGenerationFailed(msg)) => assert!(msg.contains("dataProof.zkey")),
        other => panic!("expected ProofGenerationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unverified_proof_is_returned_invalid() {
    let store = vesper_user::MemoryStore::new();
    let mut user: UserState<_> = UserState::load(
        UserConfig::default(),
        store,
        Arc::new(RejectingProver(MockProver::new())),
    )
    .unwrap();

    let payload = user.prove_data(&AttestationRequest::new(), T0).await.unwrap();
    assert!(!payload.valid);
    assert!(!payload.public_signals.is_empty());
}

#[tokio::test]
async fn test_payload_json_roundtrip() {
    let store = vesper_user::MemoryStore::new();
    let mut user: UserState<_> =
        UserState::load(UserConfig::default(), store, Arc::new(MockProver::new())).unwrap();

    user.request_data(&request(&[(5, "123456789012345678901234567890".into())]))
        .unwrap();
    user.state_transition(T0).unwrap();

    let payload = user
        .prove_data(&request(&[(1, 0u64.into())]), T0)
        .await
        .unwrap();
    assert!(payload.valid);

    let json = serde_json::to_string(&payload).unwrap();
    let back: DataProofPayload = serde_json::from_str(&json).unwrap();
    assert_eq!(back, payload);
}

#[tokio::test]
async fn test_prepared_snapshot_is_isolated_from_later_transitions() {
    let store = vesper_user::MemoryStore::new();
    let prover = Arc::new(MockProver::new());
    let mut user: UserState<_> =
        UserState::load(UserConfig::default(), store, prover.clone()).unwrap();

    user.request_data(&request(&[(0, 1u64.into())])).unwrap();
    user.state_transition(T0).unwrap();
    let inputs = user.prepare_data_proof(&AttestationRequest::new(), T0).unwrap();

    user.request_data(&request(&[(0, 1u64.into())])).unwrap();
    user.state_transition(T0).unwrap();

    assert_eq!(inputs.data[0], BigUint::from(1u8));
    let payload = generate_data_proof(prover.as_ref(), &inputs).await.unwrap();
    assert!(payload.valid);
}
