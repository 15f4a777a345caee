//! Faults a machine records instead of failing.

use crate::core::{RegistryError, StateKey};
use std::collections::VecDeque;
use thiserror::Error;

/// Conditions the driver recovers from locally.
///
/// None of these are returned to callers. Each one is logged and appended
/// to the machine's fault log; the machine then falls back to its base
/// state or to having no active state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmFault<K: StateKey> {
    #[error("Could not find base state {key:?}")]
    MissingBaseState { key: K },

    #[error("Could not find state {key:?}")]
    MissingState { key: K },

    #[error("Owner could not be resolved")]
    OwnerUnresolved,

    #[error("State registration failed: {0}")]
    Registration(#[from] RegistryError<K>),
}

/// Bounded log of recorded faults, oldest first.
#[derive(Debug, Clone)]
pub(crate) struct FaultLog<K: StateKey> {
    capacity: usize,
    faults: VecDeque<FsmFault<K>>,
}

impl<K: StateKey> FaultLog<K> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            faults: VecDeque::new(),
        }
    }

    pub(crate) fn push(&mut self, fault: FsmFault<K>) {
        if self.capacity == 0 {
            return;
        }
        if self.faults.len() == self.capacity {
            self.faults.pop_front();
        }
        self.faults.push_back(fault);
    }

    pub(crate) fn to_vec(&self) -> Vec<FsmFault<K>> {
        self.faults.iter().cloned().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.faults.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::state_key! {
        enum TestKey {
            Idle,
            Run,
        }
    }

    #[test]
    fn fault_messages_name_the_key() {
        assert_eq!(
            FsmFault::MissingBaseState { key: TestKey::Idle }.to_string(),
            "Could not find base state Idle"
        );
        assert_eq!(
            FsmFault::MissingState { key: TestKey::Run }.to_string(),
            "Could not find state Run"
        );
    }

    #[test]
    fn registry_errors_convert_into_faults() {
        let fault: FsmFault<TestKey> = RegistryError::DuplicateState { key: TestKey::Run }.into();
        assert_eq!(
            fault,
            FsmFault::Registration(RegistryError::DuplicateState { key: TestKey::Run })
        );
        assert!(fault.to_string().contains("already registered"));
    }

    #[test]
    fn fault_log_is_bounded() {
        let mut log = FaultLog::with_capacity(2);
        log.push(FsmFault::MissingState { key: TestKey::Idle });
        log.push(FsmFault::OwnerUnresolved);
        log.push(FsmFault::MissingState { key: TestKey::Run });

        assert_eq!(
            log.to_vec(),
            vec![
                FsmFault::OwnerUnresolved,
                FsmFault::MissingState { key: TestKey::Run },
            ]
        );

        log.clear();
        assert!(log.to_vec().is_empty());
    }
}
