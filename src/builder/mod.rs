//! Builder API for ergonomic machine construction.
//!
//! This module provides the machine configuration, a fluent builder that
//! assembles and sets up a machine without a hand-written
//! [`FsmDefinition`](crate::driver::FsmDefinition), and the `state_key!`
//! macro for declaring keys.

pub mod config;
pub mod error;
pub mod machine;
pub mod macros;

pub use config::{FsmConfig, RecoveryPolicy};
pub use error::BuildError;
pub use machine::FsmBuilder;
