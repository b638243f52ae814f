//! Traffic Light State Machine
//!
//! This example demonstrates a cyclic machine with typed states and events.
//!
//! Key concepts:
//! - `state_enum!` / `event_enum!` identifiers
//! - Entry actions counting completed cycles
//! - Unhandled events reported through `tracing`
//!
//! Run with: RUST_LOG=debug cargo run --example traffic_light

use machina::config::StateNode;
use machina::{event_enum, state_enum, Machine, MachineConfig};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Light {
        Red,
        Green,
        Yellow,
    }
}

event_enum! {
    enum Signal {
        Timer,
        Emergency,
    }
}

type Counters = HashMap<&'static str, u32>;
type Node = StateNode<Light, Signal, Counters>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let config = MachineConfig::builder()
        .initial(Light::Red)
        .state(
            Light::Red,
            Node::new().on(Signal::Timer, Light::Green).entry(|counters, _| {
                let cycles = counters.get("cycles").copied().unwrap_or(0);
                Some(HashMap::from([("cycles", cycles + 1)]))
            }),
        )
        .state(
            Light::Green,
            Node::new()
                .on(Signal::Timer, Light::Yellow)
                .on(Signal::Emergency, Light::Red),
        )
        .state(
            Light::Yellow,
            Node::new()
                .on(Signal::Timer, Light::Red)
                .on(Signal::Emergency, Light::Red),
        )
        .build()
        .expect("traffic light configuration is valid");

    let mut light = Machine::new(config);
    println!("Initial state: {:?}\n", light.current_state());

    for _ in 0..6 {
        let result = light.send(Signal::Timer);
        if let Some(to) = result.target() {
            println!("  Timer     -> {:?}", to);
        }
    }

    // Red has no emergency transition; the event is reported and ignored.
    light.send(Signal::Emergency);
    println!("  Emergency -> {:?} (unchanged)", light.current_state());

    println!(
        "\nCompleted cycles: {}",
        light.context().get("cycles").copied().unwrap_or(0)
    );
    println!("\n=== Example Complete ===");
}
