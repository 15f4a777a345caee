//! The machine: owns the states, tracks the active one, dispatches ticks.

use crate::builder::{FsmConfig, RecoveryPolicy};
use crate::core::{
    StateBehavior, StateKey, StateRegistry, StateTransition, TransitionCause, TransitionHistory,
};
use crate::driver::definition::FsmDefinition;
use crate::driver::fault::{FaultLog, FsmFault};
use crate::driver::observer::{ChangeNotifier, StateObserver, SubscriptionId};
use chrono::Utc;
use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, error, trace, warn};

/// Where a machine is in its own life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, `setup` not run yet. Ticks are no-ops.
    Uninitialized,
    /// Set up; ticks and transitions are dispatched.
    Running,
    /// Torn down. Ticks and transitions are no-ops.
    TornDown,
}

struct ActiveState<K: StateKey, O: ?Sized + 'static> {
    key: K,
    state: Rc<dyn StateBehavior<K, O>>,
}

impl<K: StateKey, O: ?Sized + 'static> Clone for ActiveState<K, O> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            state: Rc::clone(&self.state),
        }
    }
}

/// Finite state machine driver attached to an owner.
///
/// Call [`setup`](Self::setup) once, then drive the machine from the host
/// loop with [`tick`](Self::tick) and [`physics_tick`](Self::physics_tick).
/// States switch the machine with [`request_transition`](Self::request_transition).
/// Dropping the machine runs [`teardown`](Self::teardown).
///
/// Every operation takes `&self` and no internal borrow is held while a
/// state callback runs, so callbacks may request transitions, subscribe
/// observers or read the machine freely. The machine is single-threaded
/// (`!Send`, `!Sync`).
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use tickstate::core::{RegistryError, StateBehavior, StateRegistry};
/// use tickstate::driver::{Fsm, FsmDefinition};
/// use tickstate::state_key;
///
/// state_key! {
///     enum Mode {
///         Idle,
///         Run,
///     }
/// }
///
/// #[derive(Default)]
/// struct Idle {
///     ticks: Cell<u32>,
/// }
///
/// impl StateBehavior<Mode> for Idle {
///     fn update(&self, _fsm: &Fsm<Mode>) {
///         self.ticks.set(self.ticks.get() + 1);
///     }
///
///     fn conditions(&self, fsm: &Fsm<Mode>) {
///         if self.ticks.get() == 2 {
///             fsm.request_transition(Mode::Run);
///         }
///     }
/// }
///
/// struct Run;
/// impl StateBehavior<Mode> for Run {}
///
/// struct Runner;
///
/// impl FsmDefinition<Mode> for Runner {
///     fn setup_states(
///         &mut self,
///         states: &mut StateRegistry<Mode>,
///         _owner: Option<&Rc<()>>,
///     ) -> Result<(), RegistryError<Mode>> {
///         states.register(Mode::Idle, Idle::default())?;
///         states.register(Mode::Run, Run)
///     }
/// }
///
/// let fsm: Fsm<Mode> = Fsm::new(Mode::Idle);
/// fsm.setup(&mut Runner);
///
/// fsm.tick();
/// assert_eq!(fsm.current_state_key(), Some(Mode::Idle));
/// fsm.tick();
/// assert_eq!(fsm.current_state_key(), Some(Mode::Run));
/// ```
pub struct Fsm<K: StateKey, O: ?Sized + 'static = ()> {
    config: FsmConfig<K>,
    owner: Option<Weak<O>>,
    states: OnceCell<StateRegistry<K, O>>,
    active: RefCell<Option<ActiveState<K, O>>>,
    previous: Cell<Option<K>>,
    activations: Cell<u64>,
    lifecycle: Cell<Lifecycle>,
    notifier: ChangeNotifier<K>,
    history: RefCell<TransitionHistory<K>>,
    faults: RefCell<FaultLog<K>>,
}

impl<K: StateKey, O: ?Sized + 'static> Fsm<K, O> {
    /// Create an uninitialized machine with default settings.
    pub fn new(base_state: K) -> Self {
        Self::from_config(FsmConfig::new(base_state))
    }

    /// Create an uninitialized machine.
    pub fn from_config(config: FsmConfig<K>) -> Self {
        Self {
            history: RefCell::new(TransitionHistory::with_capacity(config.history_capacity)),
            faults: RefCell::new(FaultLog::with_capacity(config.fault_capacity)),
            config,
            owner: None,
            states: OnceCell::new(),
            active: RefCell::new(None),
            previous: Cell::new(None),
            activations: Cell::new(0),
            lifecycle: Cell::new(Lifecycle::Uninitialized),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Attach the hosting entity. The machine keeps a weak reference only.
    pub fn with_owner(mut self, owner: &Rc<O>) -> Self {
        self.owner = Some(Rc::downgrade(owner));
        self
    }

    /// Populate the states, wire components and enter the base state.
    ///
    /// Runs once; later calls are ignored.
    pub fn setup<D>(&self, definition: &mut D)
    where
        D: FsmDefinition<K, O> + ?Sized,
    {
        if self.lifecycle.get() != Lifecycle::Uninitialized {
            warn!(
                fsm = %self.config.label,
                lifecycle = ?self.lifecycle.get(),
                "setup already ran, ignoring"
            );
            return;
        }

        let owner = self.owner();
        if owner.is_none() {
            self.record_fault(FsmFault::OwnerUnresolved);
        }

        let mut states = StateRegistry::new();
        if let Err(err) = definition.setup_states(&mut states, owner.as_ref()) {
            self.record_fault(err.into());
        }
        let missing = states.missing_keys();
        if !missing.is_empty() {
            warn!(fsm = %self.config.label, ?missing, "keys without a registered state");
        }
        debug!(fsm = %self.config.label, count = states.len(), "states registered");
        if self.states.set(states).is_err() {
            return;
        }

        definition.setup_components(owner.as_ref());
        drop(owner);

        self.lifecycle.set(Lifecycle::Running);
        self.activate_base(TransitionCause::Initial, None);
    }

    /// Run the active state's `update`, then its `conditions`.
    ///
    /// `conditions` is skipped when `update` already switched states.
    pub fn tick(&self) {
        let Some(active) = self.active_state() else {
            return;
        };
        let generation = self.activations.get();
        trace!(fsm = %self.config.label, key = ?active.key, "tick");

        active.state.update(self);
        if self.is_still_active(generation) {
            active.state.conditions(self);
        }
    }

    /// Run the active state's `fixed_update`.
    pub fn physics_tick(&self) {
        let Some(active) = self.active_state() else {
            return;
        };
        trace!(fsm = %self.config.label, key = ?active.key, "physics tick");
        active.state.fixed_update(self);
    }

    /// Exit the active state and enter `target`.
    ///
    /// Completes synchronously: exit, enter and the change notification all
    /// run before this returns. When `target` has no registered state a
    /// fault is recorded and the machine falls back to the base state.
    pub fn request_transition(&self, target: K) {
        if self.lifecycle.get() != Lifecycle::Running {
            warn!(
                fsm = %self.config.label,
                ?target,
                lifecycle = ?self.lifecycle.get(),
                "transition requested while not running, ignoring"
            );
            return;
        }
        let Some(states) = self.states.get() else {
            return;
        };

        let from = self.current_state_key();
        let base = self.config.base_state;
        let target_state = states.get(&target);

        if target_state.is_none()
            && self.config.recovery == RecoveryPolicy::StayIfBase
            && from == Some(base)
        {
            self.record_fault(FsmFault::MissingState { key: target });
            debug!(fsm = %self.config.label, ?base, "base state already active, staying");
            return;
        }

        // A request made from an exit callback may have activated another
        // state by the time it returns; that one is exited as well.
        while let Some(active) = self.take_active() {
            debug!(fsm = %self.config.label, key = ?active.key, "exiting state");
            active.state.exit_state(self);
        }
        if self.lifecycle.get() != Lifecycle::Running {
            return;
        }

        match target_state {
            Some(state) => {
                let generation = self.activate(target, state, TransitionCause::Requested, from);
                self.notify_if_current(generation, target);
            }
            None => {
                self.record_fault(FsmFault::MissingState { key: target });
                if let Some(generation) = self.activate_base(TransitionCause::Recovery, from) {
                    if from != Some(base) {
                        self.notify_if_current(generation, base);
                    }
                }
            }
        }
    }

    /// Exit the active state, if any, and stop dispatching.
    ///
    /// Idempotent. Also run when the machine is dropped.
    pub fn teardown(&self) {
        if self.lifecycle.get() == Lifecycle::TornDown {
            return;
        }
        self.lifecycle.set(Lifecycle::TornDown);

        if let Some(active) = self.take_active() {
            debug!(fsm = %self.config.label, key = ?active.key, "exiting state on teardown");
            active.state.exit_state(self);
        }
    }

    /// Register an observer of successful transitions.
    pub fn subscribe<Ob>(&self, observer: Ob) -> SubscriptionId
    where
        Ob: StateObserver<K> + 'static,
    {
        self.notifier.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Key of the active state, `None` when no state is active.
    pub fn current_state_key(&self) -> Option<K> {
        self.active.borrow().as_ref().map(|active| active.key)
    }

    /// The active state itself.
    pub fn current_state(&self) -> Option<Rc<dyn StateBehavior<K, O>>> {
        self.active_state().map(|active| active.state)
    }

    /// Key that was active before the current activation.
    pub fn previous_state_key(&self) -> Option<K> {
        self.previous.get()
    }

    pub fn base_state_key(&self) -> K {
        self.config.base_state
    }

    pub fn is_active(&self) -> bool {
        self.active.borrow().is_some()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    /// The hosting entity, if it was supplied and is still alive.
    pub fn owner(&self) -> Option<Rc<O>> {
        self.owner.as_ref().and_then(Weak::upgrade)
    }

    /// Registered states. `None` before setup.
    pub fn states(&self) -> Option<&StateRegistry<K, O>> {
        self.states.get()
    }

    pub fn config(&self) -> &FsmConfig<K> {
        &self.config
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }

    /// Snapshot of the activation history.
    pub fn history(&self) -> TransitionHistory<K> {
        self.history.borrow().clone()
    }

    /// Recorded faults, oldest first.
    pub fn faults(&self) -> Vec<FsmFault<K>> {
        self.faults.borrow().to_vec()
    }

    pub fn clear_faults(&self) {
        self.faults.borrow_mut().clear();
    }

    fn active_state(&self) -> Option<ActiveState<K, O>> {
        self.active.borrow().clone()
    }

    fn take_active(&self) -> Option<ActiveState<K, O>> {
        self.active.borrow_mut().take()
    }

    fn is_still_active(&self, generation: u64) -> bool {
        self.activations.get() == generation && self.is_active()
    }

    fn activate_base(&self, cause: TransitionCause, from: Option<K>) -> Option<u64> {
        let base = self.config.base_state;
        match self.states.get().and_then(|states| states.get(&base)) {
            Some(state) => Some(self.activate(base, state, cause, from)),
            None => {
                self.record_fault(FsmFault::MissingBaseState { key: base });
                None
            }
        }
    }

    /// Mark `key` current, record it, then enter it. Returns the activation
    /// generation so callers can tell whether a nested request superseded it.
    fn activate(
        &self,
        key: K,
        state: Rc<dyn StateBehavior<K, O>>,
        cause: TransitionCause,
        from: Option<K>,
    ) -> u64 {
        let generation = self.activations.get() + 1;
        self.activations.set(generation);
        *self.active.borrow_mut() = Some(ActiveState {
            key,
            state: Rc::clone(&state),
        });
        self.previous.set(from);
        self.history.borrow_mut().record(StateTransition {
            from,
            to: key,
            cause,
            timestamp: Utc::now(),
        });

        debug!(fsm = %self.config.label, ?from, to = ?key, ?cause, "entering state");
        state.enter_state(self);
        generation
    }

    fn notify_if_current(&self, generation: u64, key: K) {
        if self.is_still_active(generation) {
            self.notifier.notify(&key);
        } else {
            debug!(
                fsm = %self.config.label,
                ?key,
                "transition superseded during enter, not notifying"
            );
        }
    }

    fn record_fault(&self, fault: FsmFault<K>) {
        error!(fsm = %self.config.label, %fault, "fsm fault");
        self.faults.borrow_mut().push(fault);
    }
}

impl<K: StateKey, O: ?Sized + 'static> Drop for Fsm<K, O> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<K: StateKey, O: ?Sized + 'static> fmt::Debug for Fsm<K, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm")
            .field("label", &self.config.label)
            .field("lifecycle", &self.lifecycle.get())
            .field("current", &self.current_state_key())
            .field("previous", &self.previous.get())
            .field("base", &self.config.base_state)
            .finish()
    }
}
