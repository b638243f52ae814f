//! Form Submission Workflow
//!
//! This example demonstrates guards, payloads and async results feeding a
//! machine.
//!
//! Key concepts:
//! - Typed context with `context_struct!` patches
//! - Guards reading the event payload
//! - Awaiting work outside the machine, then sending the outcome
//! - Transition history
//!
//! Run with: RUST_LOG=machina=trace cargo run --example form_submission

use machina::config::StateNode;
use machina::runtime::EventInput;
use machina::{context_struct, Machine, MachineConfig, Transition};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

context_struct! {
    struct Signup {
        email: String,
        attempts: u32,
        error: Option<String>,
    }
    patch: SignupPatch
}

type Node = StateNode<String, String, Signup, String>;
type Edge = Transition<String, Signup, String>;

fn config() -> MachineConfig<String, String, Signup, String> {
    MachineConfig::builder()
        .initial("editing")
        .state(
            "editing",
            Node::new()
                .on(
                    "TYPE",
                    Edge::to("editing").action(|_, email| {
                        Some(SignupPatch {
                            email: email.cloned(),
                            ..Default::default()
                        })
                    }),
                )
                .on(
                    "SUBMIT",
                    Edge::to("submitting").when(|signup, _| signup.email.contains('@')),
                ),
        )
        .state(
            "submitting",
            Node::new()
                .entry(|signup, _| {
                    Some(SignupPatch {
                        attempts: Some(signup.attempts + 1),
                        error: Some(None),
                        ..Default::default()
                    })
                })
                .on("RESOLVE", "welcome")
                .on(
                    "REJECT",
                    Edge::to("editing").action(|_, reason| {
                        Some(SignupPatch {
                            error: Some(reason.cloned()),
                            ..Default::default()
                        })
                    }),
                ),
        )
        .state("welcome", Node::new())
        .record_history(32)
        .build()
        .expect("signup configuration is valid")
}

/// Pretend server that turns away the first attempt.
async fn register(email: &str, attempt: u32) -> Result<(), String> {
    tokio::time::sleep(Duration::from_millis(50)).await;
    if attempt == 1 {
        Err(format!("{email} is temporarily unavailable"))
    } else {
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Form Submission Workflow ===\n");

    let mut form = Machine::new(config());

    let blocked = form.send("SUBMIT");
    println!("Submit with empty email: {:?}", blocked);

    form.send(EventInput::with_payload(
        "TYPE".to_string(),
        "ada@example.com".to_string(),
    ));

    while !form.matches("welcome") {
        form.send("SUBMIT");
        println!(
            "Attempt {} for {}",
            form.context().attempts,
            form.context().email
        );

        let outcome = register(&form.context().email, form.context().attempts).await;
        match outcome {
            Ok(()) => form.send("RESOLVE"),
            Err(reason) => {
                println!("  rejected: {reason}");
                form.send(EventInput::with_payload("REJECT".to_string(), reason))
            }
        };
    }

    println!("\nFinal state: {}", form.current_state());
    println!("Path: {:?}", form.history().get_path());
    if let Some(elapsed) = form.history().duration() {
        println!("Took: {:?}", elapsed);
    }

    println!("\n=== Example Complete ===");
}
