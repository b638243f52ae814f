//! Identifier traits for machine states and events.
//!
//! States and events are plain values used as map keys in a machine
//! configuration. Both traits provide a display name for diagnostics and
//! are implemented for `String` so machines can be keyed by bare strings.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Identifier of a state in a machine configuration.
///
/// States are compared, hashed and cloned freely: they key the state table,
/// travel in `SendResult`s and history entries, and are written into
/// checkpoints, hence the serde bounds.
///
/// # Example
///
/// ```rust
/// use machina::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Upload {
///     Idle,
///     Uploading,
///     Done,
/// }
///
/// impl State for Upload {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Uploading => "Uploading",
///             Self::Done => "Done",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Done)
///     }
/// }
///
/// assert_eq!(Upload::Uploading.name(), "Uploading");
/// assert!(Upload::Done.is_final());
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Final states are informational only; the runtime still evaluates
    /// events sent while in a final state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

/// Trait for events that drive transitions.
///
/// # Example
///
/// ```rust
/// use machina::core::Event;
///
/// let start = String::from("START");
/// assert_eq!(start.name(), "START");
/// ```
pub trait Event:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}

impl State for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

impl Event for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}
