//! Extension points a concrete machine implements.

use crate::core::{RegistryError, StateKey, StateRegistry};
use std::rc::Rc;

/// Content of a concrete machine.
///
/// The driver is agnostic of what its states are. During
/// [`Fsm::setup`](crate::driver::Fsm::setup) it calls, in this order,
/// [`setup_states`](Self::setup_states), then
/// [`setup_components`](Self::setup_components), then enters the base
/// state. `owner` is `None` when the owner could not be resolved.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use tickstate::core::{RegistryError, StateBehavior, StateRegistry};
/// use tickstate::driver::{Fsm, FsmDefinition};
/// use tickstate::state_key;
///
/// state_key! {
///     enum Door {
///         Closed,
///         Open,
///     }
/// }
///
/// struct Closed;
/// impl StateBehavior<Door> for Closed {}
///
/// struct Open;
/// impl StateBehavior<Door> for Open {}
///
/// struct DoorMachine;
///
/// impl FsmDefinition<Door> for DoorMachine {
///     fn setup_states(
///         &mut self,
///         states: &mut StateRegistry<Door>,
///         _owner: Option<&Rc<()>>,
///     ) -> Result<(), RegistryError<Door>> {
///         states.register(Door::Closed, Closed)?;
///         states.register(Door::Open, Open)?;
///         Ok(())
///     }
/// }
///
/// let fsm: Fsm<Door> = Fsm::new(Door::Closed);
/// fsm.setup(&mut DoorMachine);
/// assert_eq!(fsm.current_state_key(), Some(Door::Closed));
/// ```
pub trait FsmDefinition<K: StateKey, O: ?Sized + 'static = ()> {
    /// Register every state of the machine.
    ///
    /// An error is recorded as a fault; states registered before it stay
    /// available.
    fn setup_states(
        &mut self,
        states: &mut StateRegistry<K, O>,
        owner: Option<&Rc<O>>,
    ) -> Result<(), RegistryError<K>>;

    /// Wire owner components the states rely on.
    fn setup_components(&mut self, _owner: Option<&Rc<O>>) {}
}
