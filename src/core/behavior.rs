//! The lifecycle contract every concrete state implements.

use super::key::StateKey;
use crate::driver::Fsm;

/// A unit of behavior bound to one [`StateKey`].
///
/// The driver never inspects a state's internals; it only calls these
/// methods, always on the thread that drives the machine. Every callback
/// receives the machine itself so a state can read its owner, look at the
/// current key and call [`Fsm::request_transition`].
///
/// Methods take `&self`: a transition requested from inside `conditions`
/// exits this very state before `conditions` returns, so states keep their
/// mutable data in `Cell`/`RefCell` fields.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use tickstate::core::StateBehavior;
/// use tickstate::driver::Fsm;
/// use tickstate::state_key;
///
/// state_key! {
///     enum Mode {
///         Idle,
///         Run,
///     }
/// }
///
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
///         if self.ticks.get() >= 3 {
///             fsm.request_transition(Mode::Run);
///         }
///     }
/// }
/// ```
pub trait StateBehavior<K: StateKey, O: ?Sized + 'static = ()> {
    /// Entry action. Called once per activation, right after the machine
    /// marks this state current.
    fn enter_state(&self, _fsm: &Fsm<K, O>) {}

    /// Per-tick logic.
    fn update(&self, _fsm: &Fsm<K, O>) {}

    /// Per-physics-tick logic, on the fixed cadence.
    fn fixed_update(&self, _fsm: &Fsm<K, O>) {}

    /// Exit action. Called once per deactivation, before the next state's
    /// [`enter_state`](Self::enter_state).
    fn exit_state(&self, _fsm: &Fsm<K, O>) {}

    /// Per-tick transition check, run right after [`update`](Self::update).
    fn conditions(&self, _fsm: &Fsm<K, O>) {}

    /// Attach external event listeners. Never called by the driver.
    fn events_subscriber(&self) {}

    /// Detach external event listeners. Never called by the driver.
    fn events_unsubscriber(&self) {}
}
