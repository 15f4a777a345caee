//! Macros for declaring state keys.

/// Declare a fieldless enum and implement [`StateKey`](crate::core::StateKey) for it.
///
/// The enum derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Debug` and
/// serde's `Serialize`/`Deserialize`, so the calling crate must depend on
/// `serde` with the `derive` feature.
///
/// # Example
///
/// ```
/// use tickstate::core::StateKey;
/// use tickstate::state_key;
///
/// state_key! {
///     pub enum EnemyState {
///         Idle,
///         Patrol,
///         Chase,
///     }
/// }
///
/// assert_eq!(EnemyState::Chase.name(), "Chase");
/// assert_eq!(EnemyState::variants().len(), 3);
/// ```
#[macro_export]
macro_rules! state_key {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateKey for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn variants() -> &'static [Self] {
                &[$(Self::$variant),*]
            }
        }
    };
}
