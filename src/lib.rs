//! Machina: a declarative finite state machine runtime for UI state
//!
//! A machine is described once as data: an initial state, an initial context
//! and, for every state, the events it handles. A transition names its target
//! state and may carry a guard and actions; states may carry entry and exit
//! actions. Actions never mutate context directly. They return a partial
//! update that is shallow-merged into the context, and the new state and
//! context are committed together once every action has run.
//!
//! # Core Concepts
//!
//! - **State / Event**: identifiers via the `State` and `Event` traits
//! - **Context**: extended state with a shallow `merge` of partial updates
//! - **MachineConfig**: validated, immutable description built with
//!   [`MachineBuilder`] or loaded from a [`MachineDefinition`]
//! - **Machine**: the running instance; `send` events, query with `matches`
//! - **Checkpoint**: serializable snapshot for resuming a machine later
//!
//! # Example
//!
//! ```rust
//! use machina::{Machine, MachineConfig, StateNode, Transition};
//! use std::collections::HashMap;
//!
//! type Ctx = HashMap<String, u64>;
//!
//! let config = MachineConfig::<String, String, Ctx>::builder()
//!     .initial("idle")
//!     .state("idle", StateNode::new().on("START", "running"))
//!     .state(
//!         "running",
//!         StateNode::new().on(
//!             "STOP",
//!             Transition::<String, Ctx>::to("idle")
//!                 .action(|_, _| Some(HashMap::from([("stopped_at".to_string(), 42)]))),
//!         ),
//!     )
//!     .build()
//!     .expect("valid configuration");
//!
//! let mut machine = Machine::new(config);
//! assert!(machine.matches("idle"));
//!
//! machine.send("START");
//! assert!(machine.matches("running"));
//!
//! machine.send("STOP");
//! assert!(machine.matches("idle"));
//! assert_eq!(machine.context().get("stopped_at"), Some(&42));
//!
//! // Events the current state does not handle are no-ops.
//! machine.send("STOP");
//! assert!(machine.matches("idle"));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod runtime;

// Re-export commonly used types
pub use builder::{BuildError, ConfigViolation, MachineBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use config::{Implementations, MachineConfig, MachineDefinition, StateNode, Transition};
pub use core::{Action, Context, Event, Guard, State, StateHistory, StateTransition};
pub use runtime::{EventInput, Machine, SendResult, TransitionError};
