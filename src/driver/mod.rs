//! The machine driver.
//!
//! This module is the runtime half of the crate:
//! - `Fsm` owns the registered states and tracks the active one
//! - `FsmDefinition` is what a concrete machine implements to populate it
//! - `ChangeNotifier` delivers the current key to observers
//! - `FsmFault` lists what the driver recovers from instead of failing
//!
//! # Dispatch order
//!
//! `tick` calls `update` then `conditions` on the active state.
//! `physics_tick` calls `fixed_update`. `request_transition` calls `exit_state`
//! on the active state, `enter_state` on the target, then notifies observers.

mod definition;
mod fault;
mod machine;
mod observer;

pub use definition::FsmDefinition;
pub use fault::FsmFault;
pub use machine::{Fsm, Lifecycle};
pub use observer::{ChangeNotifier, StateObserver, SubscriptionId};
