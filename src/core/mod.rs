//! Core state machine types.
//!
//! This module contains the pieces a machine is built from:
//! - State keys via the `StateKey` trait
//! - The per-state lifecycle contract, `StateBehavior`
//! - The keyed `StateRegistry` a definition fills at setup
//! - Bounded activation history
//!
//! Nothing in here drives a machine; see [`crate::driver`] for that.

mod behavior;
mod history;
mod key;
mod registry;

pub use behavior::StateBehavior;
pub use history::{StateTransition, TransitionCause, TransitionHistory};
pub use key::StateKey;
pub use registry::{RegistryError, StateRegistry};
