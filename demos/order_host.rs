//! Order Processing Host
//!
//! This example embeds a state machine in a domain type. Named actions run
//! against the order itself, so they can update its fields.
//!
//! Key concepts:
//! - `machine_host!` composing dispatch into a host struct
//! - Named actions resolved from the machine's registry
//! - Accumulated table validation before building
//! - Action failures reported after the state has switched
//!
//! Run with: cargo run --example order_host

use serde_json::{json, Value};
use statetable::builder::{RawTable, TransitionBuilder};
use statetable::cond;
use statetable::effects::{ActionRegistry, ActionSpec, Machine, MachineHost, TransitionError};
use statetable::machine_host;

struct Order {
    id: u64,
    paid: f64,
    notes: Vec<String>,
    machine: Machine<Order>,
}

machine_host!(Order, machine);

fn order_table() -> RawTable<Order> {
    RawTable::new()
        .initial("draft")
        .state(
            "draft",
            vec![TransitionBuilder::event("submit").to("pending").action("note")],
        )
        .state(
            "pending",
            vec![
                TransitionBuilder::cond(cond! { "payment" => "ok", "amount" => _ })
                    .to("paid")
                    .action(ActionSpec::seq([
                        ActionSpec::named("record_payment"),
                        ActionSpec::named("note").with_args("payment accepted"),
                    ])),
                TransitionBuilder::any_of([
                    cond! { "payment" => "declined" },
                    cond! { "payment" => "expired" },
                ])
                .to("draft")
                .action(ActionSpec::named("note").with_args("payment failed")),
            ],
        )
        .state(
            "paid",
            vec![TransitionBuilder::events(["ship", "ship_express"])
                .to("shipped")
                .action("dispatch")],
        )
        .state("shipped", vec![])
}

fn order_actions() -> ActionRegistry<Order> {
    ActionRegistry::new()
        .with("note", |order: &mut Order, args: &[Value]| {
            let text = args
                .first()
                .and_then(Value::as_str)
                .unwrap_or("submitted");
            order.notes.push(format!("{} ({})", text, order.status()));
            Ok(())
        })
        .with("record_payment", |order: &mut Order, _: &[Value]| {
            order.paid += 1.0;
            Ok(())
        })
        .with("dispatch", |order: &mut Order, _: &[Value]| {
            if order.paid > 0.0 {
                Ok(())
            } else {
                Err(TransitionError::ActionFailed(format!(
                    "order {} shipped unpaid",
                    order.id
                )))
            }
        })
}

fn main() {
    println!("=== Order Processing Host ===\n");

    // A broken table reports every problem at once
    let broken: RawTable<Order> = RawTable::new()
        .initial("start")
        .state(
            "draft",
            vec![
                TransitionBuilder::event("submit").to("nowhere"),
                TransitionBuilder::event("cancel").to("draft").action("refund"),
            ],
        );
    let errors = statetable::builder::validate(&broken, &order_actions());
    if let stillwater::validation::Validation::Failure(errors) = errors {
        println!("Broken table has {} problems:", errors.len());
        for err in errors.iter() {
            println!("  - {err}");
        }
    }

    let table = order_table();
    let mut order = Order {
        id: 42,
        paid: 0.0,
        notes: Vec::new(),
        machine: Machine::new(&table, order_actions()).unwrap(),
    };

    println!("\nOrder {} starts in {}", order.id, order.status());

    order.on_event("submit").unwrap();
    order.on_condition(&json!({"payment": "declined"})).unwrap();
    order.on_event("submit").unwrap();
    order
        .on_condition(&json!({"payment": "ok", "amount": 19.99}))
        .unwrap();
    let shipped = order.on_event("ship_express").unwrap();

    println!("Final dispatch: {shipped:?}");
    println!("Notes:");
    for note in &order.notes {
        println!("  {note}");
    }
    println!("Path: {:?}", order.machine.history().get_path());

    // Two orders from one table never share state
    let other = Order {
        id: 43,
        paid: 0.0,
        notes: Vec::new(),
        machine: Machine::new(&table, order_actions()).unwrap(),
    };
    println!("\nOrder {} is still in {}", other.id, other.status());

    println!("\n=== Example Complete ===");
}
