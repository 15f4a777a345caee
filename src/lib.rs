//! Tickstate: a tick-driven finite state machine driver
//!
//! Tickstate drives one state at a time on behalf of an owning entity in a
//! simulation loop. The host calls `tick` every frame and `physics_tick` every
//! fixed step; the machine forwards them to the active state. States switch
//! the machine by calling `request_transition`, which exits the active state,
//! enters the target and notifies observers before it returns.
//!
//! # Core Concepts
//!
//! - **State key**: closed enum naming each state, via the `StateKey` trait
//! - **State**: behavior bound to a key, via the `StateBehavior` trait
//! - **Definition**: what a concrete machine registers, via `FsmDefinition`
//! - **Driver**: the `Fsm` itself, with its fault log and activation history
//!
//! The driver never panics on misconfiguration. A missing state is logged
//! through `tracing`, recorded as an `FsmFault`, and the machine falls back to
//! its base state or to having no active state.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use tickstate::builder::FsmBuilder;
//! use tickstate::core::StateBehavior;
//! use tickstate::driver::Fsm;
//! use tickstate::state_key;
//!
//! state_key! {
//!     enum Mode {
//!         Idle,
//!         Run,
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Idle {
//!     rested: Cell<u32>,
//! }
//!
//! impl StateBehavior<Mode> for Idle {
//!     fn update(&self, _fsm: &Fsm<Mode>) {
//!         self.rested.set(self.rested.get() + 1);
//!     }
//!
//!     fn conditions(&self, fsm: &Fsm<Mode>) {
//!         if self.rested.get() > 1 {
//!             fsm.request_transition(Mode::Run);
//!         }
//!     }
//! }
//!
//! struct Run;
//! impl StateBehavior<Mode> for Run {}
//!
//! let fsm: Fsm<Mode> = FsmBuilder::new()
//!     .base_state(Mode::Idle)
//!     .state(Mode::Idle, Idle::default())
//!     .state(Mode::Run, Run)
//!     .build()
//!     .unwrap();
//!
//! fsm.tick();
//! fsm.tick();
//! assert_eq!(fsm.current_state_key(), Some(Mode::Run));
//! ```

pub mod builder;
pub mod core;
pub mod driver;

// Re-export commonly used types
pub use builder::{BuildError, FsmBuilder, FsmConfig, RecoveryPolicy};
pub use self::core::{StateBehavior, StateKey, StateRegistry, TransitionHistory};
pub use driver::{Fsm, FsmDefinition, FsmFault, Lifecycle};
