//! Machine configuration.

use crate::core::StateKey;
use serde::{Deserialize, Serialize};

/// What a machine does when a transition names a state it does not have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// Exit the active state and re-enter the base state, even when the
    /// base state is the one that was just exited.
    #[default]
    ReenterBase,

    /// Leave the machine untouched when the base state is already active.
    /// Otherwise behaves like `ReenterBase`.
    StayIfBase,
}

/// Per-machine settings.
///
/// Only `base_state` is required when deserializing; every other field
/// falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct FsmConfig<K: StateKey> {
    /// Initial state, and fallback when a transition target is missing
    pub base_state: K,

    /// Name attached to every log event of the machine
    #[serde(default = "default_label")]
    pub label: String,

    /// Activation records kept in the history (0 disables it)
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Faults kept in the fault log (0 disables it)
    #[serde(default = "default_fault_capacity")]
    pub fault_capacity: usize,

    #[serde(default)]
    pub recovery: RecoveryPolicy,
}

pub const DEFAULT_LABEL: &str = "fsm";
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;
pub const DEFAULT_FAULT_CAPACITY: usize = 32;

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_fault_capacity() -> usize {
    DEFAULT_FAULT_CAPACITY
}

impl<K: StateKey> FsmConfig<K> {
    /// Configuration with default settings around `base_state`.
    pub fn new(base_state: K) -> Self {
        Self {
            base_state,
            label: default_label(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            fault_capacity: DEFAULT_FAULT_CAPACITY,
            recovery: RecoveryPolicy::default(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn fault_capacity(mut self, capacity: usize) -> Self {
        self.fault_capacity = capacity;
        self
    }

    pub fn recovery(mut self, policy: RecoveryPolicy) -> Self {
        self.recovery = policy;
        self
    }
}
