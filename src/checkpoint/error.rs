//! Checkpoint error types.

use thiserror::Error;

/// Why a checkpoint could not be written, read or resumed.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// `to_json` or `to_bytes` could not encode the checkpoint, usually
    /// because the context's `Serialize` impl failed.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// `from_json` or `from_bytes` got truncated, corrupt or mistyped input,
    /// including a context that no longer matches the context type.
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// `Machine::resume` was given a checkpoint whose `version` differs from
    /// [`CHECKPOINT_VERSION`](super::CHECKPOINT_VERSION).
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// `Machine::resume` was given a checkpoint whose current state is not a
    /// state of the configuration it is resumed against.
    #[error("Checkpoint does not fit the configuration: {0}")]
    ValidationFailed(String),
}
