//! Change notification: observers of a machine's current key.

use crate::core::StateKey;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Listener informed after every successful transition.
///
/// Implemented for any `Fn(&K)` closure.
pub trait StateObserver<K: StateKey> {
    fn on_state_changed(&self, key: &K);
}

impl<K: StateKey, F> StateObserver<K> for F
where
    F: Fn(&K),
{
    fn on_state_changed(&self, key: &K) {
        self(key)
    }
}

/// Handle returned by [`ChangeNotifier::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of observers.
///
/// Observers run in subscription order. The list is snapshotted before
/// each notification, so an observer may subscribe or unsubscribe others
/// (or itself) while being notified; the change applies from the next
/// notification on.
pub struct ChangeNotifier<K: StateKey> {
    next_id: Cell<u64>,
    observers: RefCell<Vec<(SubscriptionId, Rc<dyn StateObserver<K>>)>>,
}

impl<K: StateKey> ChangeNotifier<K> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            observers: RefCell::new(Vec::new()),
        }
    }

    pub fn subscribe<Ob>(&self, observer: Ob) -> SubscriptionId
    where
        Ob: StateObserver<K> + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.borrow().is_empty()
    }

    pub fn notify(&self, key: &K) {
        let snapshot: Vec<Rc<dyn StateObserver<K>>> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in snapshot {
            observer.on_state_changed(key);
        }
    }
}

impl<K: StateKey> Default for ChangeNotifier<K> {
    fn default() -> Self {
        Self::new()
    }
}
