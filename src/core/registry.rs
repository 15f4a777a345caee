//! Keyed storage of the states a machine can activate.

use super::behavior::StateBehavior;
use super::key::StateKey;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Errors raised while populating a [`StateRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError<K: StateKey> {
    #[error("State {key:?} is already registered")]
    DuplicateState { key: K },
}

/// Mapping from key to the single state instance bound to it.
///
/// Filled once by [`FsmDefinition::setup_states`](crate::driver::FsmDefinition::setup_states)
/// and read-only afterwards.
pub struct StateRegistry<K: StateKey, O: ?Sized + 'static = ()> {
    states: HashMap<K, Rc<dyn StateBehavior<K, O>>>,
}

impl<K: StateKey, O: ?Sized + 'static> StateRegistry<K, O> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    /// Bind `state` to `key`.
    ///
    /// Keys are unique: registering a key twice keeps the first state and
    /// returns [`RegistryError::DuplicateState`].
    pub fn register<B>(&mut self, key: K, state: B) -> Result<(), RegistryError<K>>
    where
        B: StateBehavior<K, O> + 'static,
    {
        self.register_shared(key, Rc::new(state))
    }

    /// Bind an already shared state to `key`.
    pub fn register_shared(
        &mut self,
        key: K,
        state: Rc<dyn StateBehavior<K, O>>,
    ) -> Result<(), RegistryError<K>> {
        if self.states.contains_key(&key) {
            return Err(RegistryError::DuplicateState { key });
        }
        self.states.insert(key, state);
        Ok(())
    }

    /// Look up the state bound to `key`.
    pub fn get(&self, key: &K) -> Option<Rc<dyn StateBehavior<K, O>>> {
        self.states.get(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.states.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Registered keys, in the declaration order of [`StateKey::variants`].
    pub fn keys(&self) -> Vec<K> {
        K::variants()
            .iter()
            .filter(|key| self.states.contains_key(key))
            .copied()
            .collect()
    }

    /// Keys of the closed set that have no state bound to them.
    pub fn missing_keys(&self) -> Vec<K> {
        K::variants()
            .iter()
            .filter(|key| !self.states.contains_key(key))
            .copied()
            .collect()
    }
}

impl<K: StateKey, O: ?Sized + 'static> Default for StateRegistry<K, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateKey, O: ?Sized + 'static> fmt::Debug for StateRegistry<K, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Fsm;
    use std::cell::Cell;

    crate::state_key! {
        enum TestKey {
            Idle,
            Patrol,
            Chase,
        }
    }

    struct Marker {
        id: u8,
        entered: Cell<u32>,
    }

    impl Marker {
        fn new(id: u8) -> Self {
            Self {
                id,
                entered: Cell::new(0),
            }
        }
    }

    impl StateBehavior<TestKey> for Marker {
        fn enter_state(&self, _fsm: &Fsm<TestKey>) {
            self.entered.set(self.entered.get() + u32::from(self.id));
        }
    }

    #[test]
    fn new_registry_is_empty() {
        let registry: StateRegistry<TestKey> = StateRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.missing_keys().len(), 3);
    }

    #[test]
    fn register_binds_key() {
        let mut registry: StateRegistry<TestKey> = StateRegistry::new();
        registry.register(TestKey::Idle, Marker::new(1)).unwrap();

        assert!(registry.contains(&TestKey::Idle));
        assert!(registry.get(&TestKey::Idle).is_some());
        assert!(registry.get(&TestKey::Chase).is_none());
    }

    #[test]
    fn duplicate_key_keeps_first_state() {
        let mut registry: StateRegistry<TestKey> = StateRegistry::new();
        let first = Rc::new(Marker::new(1));
        registry
            .register_shared(TestKey::Idle, first.clone())
            .unwrap();

        let result = registry.register(TestKey::Idle, Marker::new(7));
        assert_eq!(
            result,
            Err(RegistryError::DuplicateState { key: TestKey::Idle })
        );

        let fsm: Fsm<TestKey> = Fsm::new(TestKey::Idle);
        registry.get(&TestKey::Idle).unwrap().enter_state(&fsm);
        assert_eq!(first.entered.get(), 1);
    }

    #[test]
    fn keys_follow_declaration_order() {
        let mut registry: StateRegistry<TestKey> = StateRegistry::new();
        registry.register(TestKey::Chase, Marker::new(3)).unwrap();
        registry.register(TestKey::Idle, Marker::new(1)).unwrap();

        assert_eq!(registry.keys(), vec![TestKey::Idle, TestKey::Chase]);
        assert_eq!(registry.missing_keys(), vec![TestKey::Patrol]);
    }

    #[test]
    fn duplicate_error_names_the_key() {
        let error = RegistryError::DuplicateState { key: TestKey::Patrol };
        assert_eq!(error.to_string(), "State Patrol is already registered");
    }
}
