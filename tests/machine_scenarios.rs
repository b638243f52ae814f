//! End-to-end scenarios driving machines through the public API.

use machina::config::{Implementations, MachineDefinition, StateNode};
use machina::runtime::{Diagnostic, EventInput, RecordingSink, SendResult, TransitionError};
use machina::{
    context_struct, BuildError, Checkpoint, ConfigViolation, Machine, MachineConfig, Transition,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

type Json = Map<String, Value>;

fn patch(key: &str, value: Value) -> Option<Json> {
    let mut patch = Map::new();
    patch.insert(key.to_string(), value);
    Some(patch)
}

fn stopwatch() -> MachineConfig<String, String, Json> {
    MachineConfig::builder()
        .initial("idle")
        .state("idle", StateNode::<String, String, Json>::new().on("START", "running"))
        .state(
            "running",
            StateNode::<String, String, Json>::new()
                .on("STOP", "idle")
                .exit(|_, _| patch("stoppedAt", json!(42))),
        )
        .build()
        .unwrap()
}

#[test]
fn start_stop_records_stop_time() {
    let mut machine = Machine::new(stopwatch());

    assert!(machine.matches("idle"));
    machine.send("START");
    assert!(machine.matches("running"));
    machine.send("STOP");
    assert!(machine.matches("idle"));
    assert_eq!(machine.context().get("stoppedAt"), Some(&json!(42)));
}

#[test]
fn unhandled_event_leaves_machine_untouched() {
    let sink = RecordingSink::new();
    let mut machine = Machine::new(stopwatch()).with_diagnostics(sink.clone());

    assert_eq!(machine.send("STOP"), SendResult::Unhandled);
    assert!(machine.matches("idle"));
    assert!(machine.context().is_empty());
    assert_eq!(
        sink.diagnostics(),
        vec![Diagnostic::UnhandledEvent {
            state: "idle".to_string(),
            event: "STOP".to_string(),
        }]
    );
}

#[test]
fn patches_merge_shallowly() {
    let initial: Json = serde_json::from_value(json!({
        "user": { "name": "ada", "role": "admin" },
        "visits": 1
    }))
    .unwrap();

    let config = MachineConfig::<String, String, Json>::builder()
        .initial("a")
        .context(initial)
        .state(
            "a",
            StateNode::<String, String, Json>::new().on(
                "GO",
                Transition::<String, Json>::to("b")
                    .action(|_, _| patch("user", json!({ "name": "grace" })))
                    .action(|_, _| None),
            ),
        )
        .state("b", StateNode::new())
        .build()
        .unwrap();
    let mut machine = Machine::new(config);

    machine.send("GO");

    // Nested values are replaced wholesale, untouched keys survive.
    assert_eq!(machine.context().get("user"), Some(&json!({ "name": "grace" })));
    assert_eq!(machine.context().get("visits"), Some(&json!(1)));
}

#[test]
fn configured_context_defaults_when_absent() {
    let machine = Machine::new(stopwatch());

    assert_eq!(machine.context(), &Json::new());
}

#[test]
fn shared_configuration_drives_independent_machines() {
    let config = Arc::new(stopwatch());
    let mut first = Machine::new(Arc::clone(&config));
    let second = Machine::new(Arc::clone(&config));

    first.send("START");

    assert!(first.matches("running"));
    assert!(second.matches("idle"));
}

#[test]
fn invalid_configuration_lists_every_problem() {
    let error = MachineConfig::<String, String, Json>::builder()
        .initial("nowhere")
        .state("idle", StateNode::new().on("START", "running"))
        .build()
        .unwrap_err();

    assert_eq!(
        error.violations(),
        [
            ConfigViolation::UnknownInitialState {
                initial: "nowhere".to_string(),
            },
            ConfigViolation::UnknownTarget {
                state: "idle".to_string(),
                event: "START".to_string(),
                target: "running".to_string(),
            },
        ]
    );
}

#[test]
fn guarded_transition_with_payload() {
    type Counter = HashMap<String, i64>;

    let config = MachineConfig::<String, String, Counter, i64>::builder()
        .initial("open")
        .state(
            "open",
            StateNode::<String, String, Counter, i64>::new()
                .on(
                    "DEPOSIT",
                    Transition::<String, Counter, i64>::to("open")
                        .when(|_, amount| amount.is_some_and(|amount| *amount > 0))
                        .action(|balance, amount| {
                            let current = balance.get("balance").copied().unwrap_or(0);
                            let amount = amount.copied().unwrap_or(0);
                            Some(HashMap::from([("balance".to_string(), current + amount)]))
                        }),
                )
                .on("CLOSE", "closed"),
        )
        .state("closed", StateNode::new())
        .build()
        .unwrap();
    let mut account = Machine::new(config);

    assert_eq!(
        account.try_send(EventInput::with_payload("DEPOSIT".to_string(), -5)),
        Err(TransitionError::GuardBlocked {
            from: "open".to_string(),
            to: "open".to_string(),
            event: "DEPOSIT".to_string(),
        })
    );
    account.try_send(EventInput::with_payload("DEPOSIT".to_string(), 10)).unwrap();
    account.try_send(EventInput::with_payload("DEPOSIT".to_string(), 5)).unwrap();
    account.try_send("CLOSE").unwrap();

    assert!(account.matches("closed"));
    assert_eq!(account.context().get("balance"), Some(&15));
}

#[test]
fn json_definition_runs_like_builder_configuration() {
    let definition = MachineDefinition::from_json(
        r#"{
            "initial": "idle",
            "context": { "starts": 0 },
            "history": 10,
            "states": {
                "idle": {
                    "on": {
                        "START": { "target": "running", "actions": ["countStart"], "cond": "enabled" }
                    }
                },
                "running": {
                    "on": { "STOP": "idle" },
                    "exit": ["stamp"]
                }
            }
        }"#,
    )
    .unwrap();

    let implementations = Implementations::<Json>::new()
        .action("countStart", |ctx, _| {
            let starts = ctx.get("starts").and_then(Value::as_u64).unwrap_or(0);
            patch("starts", json!(starts + 1))
        })
        .action("stamp", |_, _| patch("stoppedAt", json!(42)))
        .guard("enabled", |ctx, _| ctx.get("disabled").is_none());

    let mut machine = Machine::new(definition.into_config(&implementations).unwrap());
    machine.send("START");
    machine.send("STOP");
    machine.send("START");

    assert!(machine.matches("running"));
    assert_eq!(machine.context().get("starts"), Some(&json!(2)));
    assert_eq!(machine.context().get("stoppedAt"), Some(&json!(42)));
    assert_eq!(
        machine.history().get_path(),
        vec!["idle", "running", "idle", "running"]
    );
}

#[test]
fn json_definition_reports_unbound_names() {
    let definition = MachineDefinition::from_json(
        r#"{
            "initial": "idle",
            "states": {
                "idle": { "on": { "GO": { "target": "done", "cond": "ready" } } },
                "done": { "entry": ["celebrate"] }
            }
        }"#,
    )
    .unwrap();

    let error = definition
        .into_config(&Implementations::<Json>::new())
        .unwrap_err();

    assert!(matches!(error, BuildError::Invalid { .. }));
    assert_eq!(error.violations().len(), 2);
    assert!(error.violations().contains(&ConfigViolation::UnknownGuard {
        state: "idle".to_string(),
        event: "GO".to_string(),
        name: "ready".to_string(),
    }));
    assert!(error.violations().contains(&ConfigViolation::UnknownAction {
        state: "done".to_string(),
        name: "celebrate".to_string(),
    }));
}

#[test]
fn malformed_definition_is_rejected() {
    let error = MachineDefinition::from_json(r#"{ "states": {} }"#).unwrap_err();

    assert!(matches!(error, BuildError::Definition(_)));
}

#[test]
fn checkpoint_survives_a_restart() {
    let config = Arc::new(
        MachineConfig::<String, String, Json>::builder()
            .initial("idle")
            .state("idle", StateNode::new().on("START", "running"))
            .state(
                "running",
                StateNode::<String, String, Json>::new()
                    .on("STOP", "idle")
                    .entry(|_, _| patch("started", json!(true))),
            )
            .record_history(16)
            .build()
            .unwrap(),
    );

    let mut machine = Machine::new(Arc::clone(&config));
    machine.send("START");
    let saved = machine.checkpoint().to_json().unwrap();
    drop(machine);

    let mut restored = Machine::resume(config, Checkpoint::from_json(&saved).unwrap()).unwrap();

    assert!(restored.matches("running"));
    assert_eq!(restored.context().get("started"), Some(&json!(true)));
    restored.send("STOP");
    assert_eq!(restored.history().get_path(), vec!["idle", "running", "idle"]);
}

context_struct! {
    struct Form {
        attempts: u32,
        response: Option<String>,
        error: Option<String>,
    }
    patch: FormPatch
}

fn form() -> MachineConfig<String, String, Form, String> {
    type Node = StateNode<String, String, Form, String>;
    type Edge = Transition<String, Form, String>;

    MachineConfig::builder()
        .initial("editing")
        .state(
            "editing",
            Node::new().on(
                "SUBMIT",
                Edge::to("submitting").action(|form, _| {
                    Some(FormPatch {
                        attempts: Some(form.attempts + 1),
                        error: Some(None),
                        ..Default::default()
                    })
                }),
            ),
        )
        .state(
            "submitting",
            Node::new()
                .on(
                    "RESOLVE",
                    Edge::to("done").action(|_, body| {
                        Some(FormPatch {
                            response: Some(body.cloned()),
                            ..Default::default()
                        })
                    }),
                )
                .on(
                    "REJECT",
                    Edge::to("editing").action(|_, reason| {
                        Some(FormPatch {
                            error: Some(reason.cloned()),
                            ..Default::default()
                        })
                    }),
                ),
        )
        .state("done", Node::new())
        .build()
        .unwrap()
}

async fn submit(attempt: u32) -> Result<String, String> {
    tokio::task::yield_now().await;
    if attempt < 2 {
        Err("server busy".to_string())
    } else {
        Ok("accepted".to_string())
    }
}

#[tokio::test]
async fn async_results_drive_the_machine() {
    let mut machine = Machine::new(form());

    while !machine.matches("done") {
        machine.send("SUBMIT");
        let event = match submit(machine.context().attempts).await {
            Ok(body) => EventInput::with_payload("RESOLVE".to_string(), body),
            Err(reason) => EventInput::with_payload("REJECT".to_string(), reason),
        };
        machine.send(event);
    }

    assert_eq!(machine.context().attempts, 2);
    assert_eq!(machine.context().response.as_deref(), Some("accepted"));
    assert_eq!(machine.context().error, None);
}

#[tokio::test]
async fn machine_can_live_in_a_task() {
    let (events, mut inbox) = tokio::sync::mpsc::channel::<EventInput<String, String>>(8);

    let worker = tokio::spawn(async move {
        let mut machine = Machine::new(form());
        while let Some(event) = inbox.recv().await {
            machine.send(event);
        }
        machine
    });

    events.send("SUBMIT".into()).await.unwrap();
    events
        .send(EventInput::with_payload("REJECT".to_string(), "invalid email".to_string()))
        .await
        .unwrap();
    drop(events);

    let machine = worker.await.unwrap();
    assert!(machine.matches("editing"));
    assert_eq!(machine.context().error.as_deref(), Some("invalid email"));
}
