//! Vesper User
//!
//! Epoch-scoped user state: accumulates attested data, commits it into a
//! provable snapshot on state transition, and turns that snapshot into
//! data proofs through the prover capability.

pub mod epoch;
pub mod state;
pub mod store;

pub use epoch::{unix_now, EpochClock};
pub use state::{generate_data_proof, UserState};
pub use store::{keys, FileStore, KeyValueStore, MemoryStore, StoreError};
