//! Builder for constructing ready-to-run machines.

use crate::builder::config::{FsmConfig, RecoveryPolicy};
use crate::builder::error::BuildError;
use crate::core::{RegistryError, StateBehavior, StateKey, StateRegistry};
use crate::driver::{Fsm, FsmDefinition};
use std::rc::{Rc, Weak};

type ComponentWiring<O> = Box<dyn FnMut(Option<&Rc<O>>)>;

/// Definition assembled by [`FsmBuilder`] from inline registrations.
struct InlineDefinition<K: StateKey, O: ?Sized + 'static> {
    states: Vec<(K, Rc<dyn StateBehavior<K, O>>)>,
    components: Option<ComponentWiring<O>>,
}

impl<K: StateKey, O: ?Sized + 'static> FsmDefinition<K, O> for InlineDefinition<K, O> {
    fn setup_states(
        &mut self,
        states: &mut StateRegistry<K, O>,
        _owner: Option<&Rc<O>>,
    ) -> Result<(), RegistryError<K>> {
        for (key, state) in self.states.drain(..) {
            states.register_shared(key, state)?;
        }
        Ok(())
    }

    fn setup_components(&mut self, owner: Option<&Rc<O>>) {
        if let Some(wire) = self.components.as_mut() {
            wire(owner);
        }
    }
}

/// Builder for constructing machines with a fluent API.
///
/// `build` creates the machine, registers the states in the order they were
/// added, runs the component wiring and enters the base state.
///
/// # Example
///
/// ```
/// use tickstate::builder::FsmBuilder;
/// use tickstate::core::StateBehavior;
/// use tickstate::driver::Fsm;
/// use tickstate::state_key;
///
/// state_key! {
///     enum Light {
///         Off,
///         On,
///     }
/// }
///
/// struct Off;
/// impl StateBehavior<Light> for Off {}
///
/// struct On;
/// impl StateBehavior<Light> for On {}
///
/// let fsm: Fsm<Light> = FsmBuilder::new()
///     .base_state(Light::Off)
///     .label("porch-light")
///     .state(Light::Off, Off)
///     .state(Light::On, On)
///     .build()
///     .unwrap();
///
/// fsm.request_transition(Light::On);
/// assert_eq!(fsm.current_state_key(), Some(Light::On));
/// ```
pub struct FsmBuilder<K: StateKey, O: ?Sized + 'static = ()> {
    base_state: Option<K>,
    label: Option<String>,
    history_capacity: Option<usize>,
    fault_capacity: Option<usize>,
    recovery: RecoveryPolicy,
    owner: Option<Weak<O>>,
    states: Vec<(K, Rc<dyn StateBehavior<K, O>>)>,
    components: Option<ComponentWiring<O>>,
}

impl<K: StateKey, O: ?Sized + 'static> FsmBuilder<K, O> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_state: None,
            label: None,
            history_capacity: None,
            fault_capacity: None,
            recovery: RecoveryPolicy::default(),
            owner: None,
            states: Vec::new(),
            components: None,
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: FsmConfig<K>) -> Self {
        Self {
            base_state: Some(config.base_state),
            label: Some(config.label),
            history_capacity: Some(config.history_capacity),
            fault_capacity: Some(config.fault_capacity),
            recovery: config.recovery,
            ..Self::new()
        }
    }

    /// Set the base state (required).
    pub fn base_state(mut self, key: K) -> Self {
        self.base_state = Some(key);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    pub fn fault_capacity(mut self, capacity: usize) -> Self {
        self.fault_capacity = Some(capacity);
        self
    }

    pub fn recovery(mut self, policy: RecoveryPolicy) -> Self {
        self.recovery = policy;
        self
    }

    /// Attach the hosting entity (held weakly).
    pub fn owner(mut self, owner: &Rc<O>) -> Self {
        self.owner = Some(Rc::downgrade(owner));
        self
    }

    /// Register a state.
    pub fn state<B>(self, key: K, state: B) -> Self
    where
        B: StateBehavior<K, O> + 'static,
    {
        self.shared_state(key, Rc::new(state))
    }

    /// Register a state the caller keeps a handle to.
    pub fn shared_state(mut self, key: K, state: Rc<dyn StateBehavior<K, O>>) -> Self {
        self.states.push((key, state));
        self
    }

    /// Component wiring run after the states are registered.
    pub fn on_components<F>(mut self, wire: F) -> Self
    where
        F: FnMut(Option<&Rc<O>>) + 'static,
    {
        self.components = Some(Box::new(wire));
        self
    }

    /// Assemble the configuration without building a machine.
    pub fn config(&self) -> Result<FsmConfig<K>, BuildError> {
        let base_state = self.base_state.ok_or(BuildError::MissingBaseState)?;
        let mut config = FsmConfig::new(base_state).recovery(self.recovery);
        if let Some(label) = &self.label {
            config = config.label(label.clone());
        }
        if let Some(capacity) = self.history_capacity {
            config = config.history_capacity(capacity);
        }
        if let Some(capacity) = self.fault_capacity {
            config = config.fault_capacity(capacity);
        }
        Ok(config)
    }

    /// Build and set up the machine.
    /// Returns an error if the base state is missing.
    pub fn build(self) -> Result<Fsm<K, O>, BuildError> {
        let config = self.config()?;

        let mut fsm = Fsm::from_config(config);
        if let Some(owner) = self.owner.as_ref().and_then(Weak::upgrade) {
            fsm = fsm.with_owner(&owner);
        }

        let mut definition = InlineDefinition {
            states: self.states,
            components: self.components,
        };
        fsm.setup(&mut definition);
        Ok(fsm)
    }
}

impl<K: StateKey, O: ?Sized + 'static> Default for FsmBuilder<K, O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::FsmFault;
    use std::cell::{Cell, RefCell};

    crate::state_key! {
        enum TestKey {
            Idle,
            Walk,
            Sleep,
        }
    }

    struct Counting {
        entered: Rc<Cell<u32>>,
    }

    impl StateBehavior<TestKey> for Counting {
        fn enter_state(&self, _fsm: &Fsm<TestKey>) {
            self.entered.set(self.entered.get() + 1);
        }
    }

    struct Quiet;

    impl StateBehavior<TestKey> for Quiet {}

    #[test]
    fn builder_validates_required_fields() {
        let result = FsmBuilder::<TestKey>::new().state(TestKey::Idle, Quiet).build();

        assert!(matches!(result, Err(BuildError::MissingBaseState)));
    }

    #[test]
    fn fluent_api_builds_running_machine() {
        let entered = Rc::new(Cell::new(0));
        let fsm: Fsm<TestKey> = FsmBuilder::new()
            .base_state(TestKey::Idle)
            .state(
                TestKey::Idle,
                Counting {
                    entered: Rc::clone(&entered),
                },
            )
            .state(TestKey::Walk, Quiet)
            .build()
            .unwrap();

        assert_eq!(fsm.current_state_key(), Some(TestKey::Idle));
        assert_eq!(entered.get(), 1);
        assert_eq!(
            fsm.states().map(|states| states.keys()),
            Some(vec![TestKey::Idle, TestKey::Walk])
        );
    }

    #[test]
    fn config_collects_settings() {
        let builder = FsmBuilder::<TestKey>::new()
            .base_state(TestKey::Walk)
            .label("cat")
            .history_capacity(3)
            .fault_capacity(1)
            .recovery(RecoveryPolicy::StayIfBase);

        let config = builder.config().unwrap();
        assert_eq!(config.base_state, TestKey::Walk);
        assert_eq!(config.label, "cat");
        assert_eq!(config.history_capacity, 3);
        assert_eq!(config.fault_capacity, 1);
        assert_eq!(config.recovery, RecoveryPolicy::StayIfBase);
    }

    #[test]
    fn from_config_round_trips_settings() {
        let config = FsmConfig::new(TestKey::Sleep).label("owl").history_capacity(0);
        let rebuilt = FsmBuilder::<TestKey>::from_config(config.clone())
            .config()
            .unwrap();

        assert_eq!(rebuilt, config);
    }

    #[test]
    fn components_are_wired_with_owner() {
        struct Cat {
            name: &'static str,
        }

        struct Napping;

        impl StateBehavior<TestKey, Cat> for Napping {}

        let wired = Rc::new(RefCell::new(None));
        let owner = Rc::new(Cat { name: "tom" });
        let fsm = {
            let wired = Rc::clone(&wired);
            FsmBuilder::new()
                .base_state(TestKey::Sleep)
                .owner(&owner)
                .state(TestKey::Sleep, Napping)
                .on_components(move |owner: Option<&Rc<Cat>>| {
                    *wired.borrow_mut() = owner.map(|cat| cat.name);
                })
                .build()
                .unwrap()
        };

        assert_eq!(*wired.borrow(), Some("tom"));
        assert!(fsm.faults().is_empty());
        assert!(fsm.owner().is_some());
    }

    #[test]
    fn builder_without_owner_records_unresolved_owner() {
        let fsm: Fsm<TestKey> = FsmBuilder::new()
            .base_state(TestKey::Idle)
            .state(TestKey::Idle, Quiet)
            .build()
            .unwrap();

        assert_eq!(fsm.faults(), vec![FsmFault::OwnerUnresolved]);
    }

    #[test]
    fn duplicate_inline_state_is_a_fault() {
        let owner = Rc::new(());
        let fsm: Fsm<TestKey> = FsmBuilder::new()
            .base_state(TestKey::Idle)
            .owner(&owner)
            .state(TestKey::Idle, Quiet)
            .state(TestKey::Idle, Quiet)
            .build()
            .unwrap();

        assert_eq!(
            fsm.faults(),
            vec![FsmFault::Registration(RegistryError::DuplicateState {
                key: TestKey::Idle
            })]
        );
        assert_eq!(fsm.current_state_key(), Some(TestKey::Idle));
    }
}
