//! Patrol Guard
//!
//! This example drives a guard's behavior from a simulated game loop.
//!
//! Key concepts:
//! - States reading and writing their owner through a weak reference
//! - Transitions requested from a state's own `conditions`
//! - Separate frame and physics cadences
//! - Observers of state changes
//! - Fault recovery when a state is missing
//!
//! Run with: RUST_LOG=tickstate=debug cargo run --example patrol_guard

use std::cell::Cell;
use std::rc::Rc;
use tickstate::core::{RegistryError, StateBehavior, StateRegistry};
use tickstate::driver::{Fsm, FsmDefinition};
use tickstate::state_key;
use tracing_subscriber::EnvFilter;

state_key! {
    enum GuardState {
        Patrol,
        Chase,
        Search,
    }
}

struct Guard {
    position: Cell<f32>,
    intruder: Cell<Option<f32>>,
}

impl Guard {
    fn distance_to_intruder(&self) -> Option<f32> {
        self.intruder
            .get()
            .map(|intruder| (intruder - self.position.get()).abs())
    }
}

struct Patrol {
    direction: Cell<f32>,
}

impl StateBehavior<GuardState, Guard> for Patrol {
    fn enter_state(&self, _fsm: &Fsm<GuardState, Guard>) {
        println!("  [patrol] back on the beat");
    }

    fn fixed_update(&self, fsm: &Fsm<GuardState, Guard>) {
        let Some(guard) = fsm.owner() else {
            return;
        };
        let next = guard.position.get() + self.direction.get();
        if !(0.0..=10.0).contains(&next) {
            self.direction.set(-self.direction.get());
        }
        guard.position.set(next.clamp(0.0, 10.0));
    }

    fn conditions(&self, fsm: &Fsm<GuardState, Guard>) {
        let spotted = fsm
            .owner()
            .and_then(|guard| guard.distance_to_intruder())
            .is_some_and(|distance| distance < 4.0);
        if spotted {
            fsm.request_transition(GuardState::Chase);
        }
    }
}

struct Chase;

impl StateBehavior<GuardState, Guard> for Chase {
    fn enter_state(&self, _fsm: &Fsm<GuardState, Guard>) {
        println!("  [chase] intruder spotted!");
    }

    fn fixed_update(&self, fsm: &Fsm<GuardState, Guard>) {
        let Some(guard) = fsm.owner() else {
            return;
        };
        if let Some(intruder) = guard.intruder.get() {
            let step = (intruder - guard.position.get()).clamp(-1.5, 1.5);
            guard.position.set(guard.position.get() + step);
        }
    }

    fn conditions(&self, fsm: &Fsm<GuardState, Guard>) {
        let lost = fsm
            .owner()
            .is_some_and(|guard| guard.intruder.get().is_none());
        if lost {
            // Search was never registered: the machine records a fault and
            // falls back to patrolling.
            fsm.request_transition(GuardState::Search);
        }
    }

    fn exit_state(&self, _fsm: &Fsm<GuardState, Guard>) {
        println!("  [chase] giving up");
    }
}

struct GuardMachine;

impl FsmDefinition<GuardState, Guard> for GuardMachine {
    fn setup_states(
        &mut self,
        states: &mut StateRegistry<GuardState, Guard>,
        _owner: Option<&Rc<Guard>>,
    ) -> Result<(), RegistryError<GuardState>> {
        states.register(
            GuardState::Patrol,
            Patrol {
                direction: Cell::new(1.0),
            },
        )?;
        states.register(GuardState::Chase, Chase)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    println!("=== Patrol Guard ===\n");

    let guard = Rc::new(Guard {
        position: Cell::new(0.0),
        intruder: Cell::new(None),
    });

    let fsm = Fsm::new(GuardState::Patrol).with_owner(&guard);
    fsm.subscribe(|key: &GuardState| println!("  -> now {key:?}"));
    fsm.setup(&mut GuardMachine);

    for frame in 0..12 {
        match frame {
            3 => guard.intruder.set(Some(6.0)),
            8 => guard.intruder.set(None),
            _ => {}
        }

        fsm.physics_tick();
        fsm.tick();

        println!(
            "frame {frame:>2}: {:?} at {:.1}",
            fsm.current_state_key(),
            guard.position.get()
        );
    }

    println!("\nPath: {:?}", fsm.history().get_path());
    println!("Faults:");
    for fault in fsm.faults() {
        println!("  - {fault}");
    }

    println!("\n=== Example Complete ===");
}
