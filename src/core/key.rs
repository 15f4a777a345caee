//! State keys: the closed set of identifiers a machine is indexed by.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Identifier of a state inside an [`Fsm`](crate::driver::Fsm).
///
/// Keys are small, copyable values drawn from a closed set known at compile
/// time, usually a fieldless enum. They index the state registry and are the
/// public "current mode" readout of a machine.
///
/// # Required Traits
///
/// - `Copy` + `Eq` + `Hash`: keys are map indices and get passed around freely
/// - `Debug`: keys appear in log events and fault messages
/// - `Serialize` + `Deserialize`: keys appear in configuration and history
///
/// Most keys are declared with [`state_key!`](crate::state_key) instead of
/// implementing this trait by hand.
///
/// # Example
///
/// ```rust
/// use tickstate::core::StateKey;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Mode {
///     Idle,
///     Run,
/// }
///
/// impl StateKey for Mode {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Run => "Run",
///         }
///     }
///
///     fn variants() -> &'static [Self] {
///         &[Self::Idle, Self::Run]
///     }
/// }
///
/// assert_eq!(Mode::Run.name(), "Run");
/// assert_eq!(Mode::variants().len(), 2);
/// ```
pub trait StateKey:
    Copy + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
    /// Get the key's name for display/logging.
    fn name(&self) -> &str;

    /// Every key in the closed set, in declaration order.
    fn variants() -> &'static [Self];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestKey {
        Idle,
        Walk,
        Attack,
    }

    impl StateKey for TestKey {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Walk => "Walk",
                Self::Attack => "Attack",
            }
        }

        fn variants() -> &'static [Self] {
            &[Self::Idle, Self::Walk, Self::Attack]
        }
    }

    #[test]
    fn key_name_returns_correct_value() {
        assert_eq!(TestKey::Idle.name(), "Idle");
        assert_eq!(TestKey::Walk.name(), "Walk");
        assert_eq!(TestKey::Attack.name(), "Attack");
    }

    #[test]
    fn variants_lists_every_key_once() {
        let variants = TestKey::variants();
        let unique: HashSet<_> = variants.iter().copied().collect();

        assert_eq!(variants.len(), 3);
        assert_eq!(unique.len(), 3);
        assert_eq!(variants[0], TestKey::Idle);
    }

    #[test]
    fn key_serializes_correctly() {
        let key = TestKey::Attack;
        let json = serde_json::to_string(&key).unwrap();
        let deserialized: TestKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, deserialized);
    }

    #[test]
    fn keys_are_comparable() {
        assert_eq!(TestKey::Walk, TestKey::Walk);
        assert_ne!(TestKey::Walk, TestKey::Idle);
    }
}
