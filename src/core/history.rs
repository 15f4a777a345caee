//! Activation history tracking.
//!
//! Every time a machine activates a state it records a [`StateTransition`].
//! The history is bounded: once full, the oldest record is dropped.

use super::key::StateKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Why a state was activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionCause {
    /// Base state entered at the end of setup.
    Initial,
    /// Target of a successful `request_transition`.
    Requested,
    /// Base state re-entered after a request named a missing state.
    Recovery,
}

/// Record of a single activation.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{StateTransition, TransitionCause};
/// use tickstate::state_key;
/// use chrono::Utc;
///
/// state_key! {
///     enum Mode {
///         Idle,
///         Run,
///     }
/// }
///
/// let transition = StateTransition {
///     from: Some(Mode::Idle),
///     to: Mode::Run,
///     cause: TransitionCause::Requested,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.to, Mode::Run);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<K: StateKey> {
    /// Key active before the transition, if any
    pub from: Option<K>,
    /// Key that was activated
    pub to: K,
    /// What triggered the activation
    pub cause: TransitionCause,
    /// When the activation happened
    pub timestamp: DateTime<Utc>,
}

/// Bounded, ordered history of activations.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{StateTransition, TransitionCause, TransitionHistory};
/// use tickstate::state_key;
/// use chrono::Utc;
///
/// state_key! {
///     enum Phase {
///         One,
///         Two,
///     }
/// }
///
/// let mut history = TransitionHistory::with_capacity(8);
/// history.record(StateTransition {
///     from: None,
///     to: Phase::One,
///     cause: TransitionCause::Initial,
///     timestamp: Utc::now(),
/// });
/// history.record(StateTransition {
///     from: Some(Phase::One),
///     to: Phase::Two,
///     cause: TransitionCause::Requested,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec![Phase::One, Phase::Two]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionHistory<K: StateKey> {
    capacity: usize,
    transitions: VecDeque<StateTransition<K>>,
}

impl<K: StateKey> TransitionHistory<K> {
    /// Create an empty history keeping at most `capacity` records.
    ///
    /// A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity.min(256)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, transition: StateTransition<K>) {
        if self.capacity == 0 {
            return;
        }
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Keys traversed, in order.
    ///
    /// Starts with the `from` key of the oldest retained record when there
    /// is one, followed by the `to` key of every record.
    pub fn get_path(&self) -> Vec<K> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(from) = self.transitions.front().and_then(|t| t.from) {
            path.push(from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the oldest and newest retained records.
    ///
    /// Returns `None` when the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&StateTransition<K>> {
        self.transitions.back()
    }

    /// Retained records, oldest first.
    pub fn transitions(&self) -> Vec<StateTransition<K>> {
        self.transitions.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
