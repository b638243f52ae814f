//! JSON Machine Definition
//!
//! This example demonstrates loading a machine from data and binding its
//! named actions and guards in code, then checkpointing it.
//!
//! Key concepts:
//! - `MachineDefinition` with shorthand and full transitions
//! - `Implementations` registry for actions and guards
//! - Configuration errors reported all at once
//! - Checkpoint to JSON and resume
//!
//! Run with: cargo run --example json_definition

use machina::config::{Implementations, MachineDefinition};
use machina::{Checkpoint, Machine};
use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;

type Json = Map<String, Value>;

const DEFINITION: &str = r#"{
    "initial": "closed",
    "context": { "opened": 0 },
    "history": 20,
    "states": {
        "closed": {
            "on": {
                "OPEN": { "target": "open", "cond": "unlocked" },
                "LOCK": { "target": "closed", "actions": ["lock"] },
                "UNLOCK": { "target": "closed", "actions": ["unlock"] }
            }
        },
        "open": {
            "entry": ["countOpening"],
            "on": { "CLOSE": "closed" }
        }
    }
}"#;

fn set(key: &str, value: Value) -> Option<Json> {
    let mut patch = Map::new();
    patch.insert(key.to_string(), value);
    Some(patch)
}

fn implementations() -> Implementations<Json> {
    Implementations::<Json>::new()
        .action("lock", |_, _| set("locked", json!(true)))
        .action("unlock", |_, _| set("locked", json!(false)))
        .action("countOpening", |ctx, _| {
            let opened = ctx.get("opened").and_then(Value::as_u64).unwrap_or(0);
            set("opened", json!(opened + 1))
        })
        .guard("unlocked", |ctx, _| ctx.get("locked") != Some(&json!(true)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== JSON Machine Definition ===\n");

    let config = MachineDefinition::from_json(DEFINITION)?.into_config(&implementations())?;
    println!("States: {:?}", config.state_ids());

    let mut door = Machine::new(config);
    for event in ["OPEN", "CLOSE", "LOCK", "OPEN", "UNLOCK", "OPEN"] {
        let result = door.send(event);
        println!("  {event:<6} -> {:<6} ({:?})", door.current_state(), result);
    }
    println!("Context: {}", Value::Object(door.context().clone()));

    let saved = door.checkpoint().to_json()?;
    let restored = Machine::resume(
        MachineDefinition::from_json(DEFINITION)?.into_config(&implementations())?,
        Checkpoint::from_json(&saved)?,
    )?;
    println!("\nResumed in state: {}", restored.current_state());

    println!("\nA definition with mistakes:");
    let broken = MachineDefinition::from_json(
        r#"{ "initial": "start", "states": { "begin": { "on": { "GO": { "target": "end", "actions": ["fly"] } } } } }"#,
    )?;
    if let Err(error) = broken.into_config(&implementations()) {
        for violation in error.violations() {
            println!("  - {violation}");
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
