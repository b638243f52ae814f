//! Checkpoint and resume functionality for machines.
//!
//! A [`Checkpoint`] captures everything about a running [`Machine`] that is
//! data: current state, context, recorded history and metadata. Guards and
//! actions are code and live in the configuration, so resuming needs the
//! same [`MachineConfig`] the checkpoint was taken from.
//!
//! Checkpoints serialize to JSON for readability or to bincode bytes for
//! compactness. In the bincode form the context is embedded as JSON, so
//! self-describing contexts such as `serde_json::Map` round-trip too. Where
//! checkpoints are stored is up to the caller.
//!
//! # Example
//!
//! ```rust
//! use machina::checkpoint::Checkpoint;
//! use machina::config::StateNode;
//! use machina::runtime::Machine;
//! use machina::MachineConfig;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! type Ctx = HashMap<String, u32>;
//!
//! let config = MachineConfig::<String, String, Ctx>::builder()
//!     .initial("draft")
//!     .state("draft", StateNode::new().on("PUBLISH", "live"))
//!     .state("live", StateNode::new())
//!     .build()
//!     .map(Arc::new)
//!     .unwrap();
//!
//! let mut machine = Machine::new(Arc::clone(&config));
//! machine.send("PUBLISH");
//!
//! let json = machine.checkpoint().to_json().unwrap();
//! let restored = Machine::resume(config, Checkpoint::from_json(&json).unwrap()).unwrap();
//! assert!(restored.matches("live"));
//! ```

use crate::config::MachineConfig;
use crate::core::{Context, Event, State, StateHistory};
use crate::runtime::Machine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Metadata tracked by a machine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineMetadata {
    /// When the machine was created
    pub created_at: DateTime<Utc>,

    /// When the last transition was committed
    pub updated_at: DateTime<Utc>,

    /// Number of transitions taken since creation
    pub transition_count: u64,
}

impl Default for MachineMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            transition_count: 0,
        }
    }
}

/// Serializable snapshot of a running machine.
/// Does NOT include guards or actions (not serializable).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "C: Serialize", deserialize = "C: Deserialize<'de>"))]
pub struct Checkpoint<S: State, E: Event, C> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When the checkpoint was taken
    pub timestamp: DateTime<Utc>,

    /// Current state of the machine
    pub current_state: S,

    /// Current context of the machine
    pub context: C,

    /// Recorded transition history
    pub history: StateHistory<S, E>,

    /// Machine metadata
    pub metadata: MachineMetadata,
}

/// Bincode layout of a [`Checkpoint`].
///
/// Bincode cannot decode self-describing values, so the context travels as
/// JSON bytes.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
struct BinaryCheckpoint<S: State, E: Event> {
    version: u32,
    id: Uuid,
    timestamp: DateTime<Utc>,
    current_state: S,
    context: Vec<u8>,
    history: StateHistory<S, E>,
    metadata: MachineMetadata,
}

impl<S: State, E: Event, C: Serialize> Checkpoint<S, E, C> {
    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Encode as compact bincode bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        let context = serde_json::to_vec(&self.context)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))?;
        let binary = BinaryCheckpoint {
            version: self.version,
            id: self.id,
            timestamp: self.timestamp,
            current_state: self.current_state.clone(),
            context,
            history: self.history.clone(),
            metadata: self.metadata.clone(),
        };
        bincode::serialize(&binary).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }
}

impl<S: State, E: Event, C: DeserializeOwned> Checkpoint<S, E, C> {
    /// Decode a checkpoint written by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    /// Decode a checkpoint written by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let binary: BinaryCheckpoint<S, E> = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        let context = serde_json::from_slice(&binary.context)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        Ok(Self {
            version: binary.version,
            id: binary.id,
            timestamp: binary.timestamp,
            current_state: binary.current_state,
            context,
            history: binary.history,
            metadata: binary.metadata,
        })
    }
}

impl<S: State, E: Event, C: Context, P> Machine<S, E, C, P> {
    /// Capture the machine's current data.
    pub fn checkpoint(&self) -> Checkpoint<S, E, C>
    where
        C: Serialize,
    {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            current_state: self.current.clone(),
            context: self.context.clone(),
            history: self.history.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// Rebuild a machine from a checkpoint taken against `config`.
    ///
    /// The checkpoint's history is trimmed to the configuration's history
    /// limit. Fails when the format version is unknown or the checkpointed
    /// state is not part of the configuration.
    pub fn resume(
        config: impl Into<Arc<MachineConfig<S, E, C, P>>>,
        checkpoint: Checkpoint<S, E, C>,
    ) -> Result<Self, CheckpointError> {
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: checkpoint.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        let config = config.into();
        if !config.contains_state(&checkpoint.current_state) {
            return Err(CheckpointError::ValidationFailed(format!(
                "state '{}' is not defined by the configuration",
                checkpoint.current_state.name()
            )));
        }

        tracing::debug!(
            id = %checkpoint.id,
            state = checkpoint.current_state.name(),
            "resuming from checkpoint"
        );

        Ok(Machine::from_parts(
            config,
            checkpoint.current_state,
            checkpoint.context,
            Some(checkpoint.history),
            checkpoint.metadata,
        ))
    }
}
