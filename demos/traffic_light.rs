//! Traffic Light State Machine
//!
//! This example drives a cyclic light with timer events and overrides it
//! with sensor data matched by conditions.
//!
//! Key concepts:
//! - Cyclic event transitions (red -> green -> yellow -> red)
//! - Wildcard and relaxed conditions on sensor readings
//! - Actions running against a separate context
//! - A log sink printing every dispatch
//!
//! Run with: cargo run --example traffic_light

use serde_json::{json, Value};
use statetable::builder::TransitionBuilder;
use statetable::cond;
use statetable::effects::Machine;

#[derive(Debug, Default)]
struct Intersection {
    cycles: u32,
    alerts: Vec<String>,
}

fn count_cycle(ctx: &mut Intersection, _args: &[Value]) -> Result<(), statetable::TransitionError> {
    ctx.cycles += 1;
    Ok(())
}

fn raise_alert(ctx: &mut Intersection, args: &[Value]) -> Result<(), statetable::TransitionError> {
    for arg in args {
        ctx.alerts.push(arg.as_str().unwrap_or_default().to_string());
    }
    Ok(())
}

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let emergency = || {
        TransitionBuilder::cond(cond! { "sensor" => "siren", "lane" => _, .. })
            .to("flashing")
            .action(statetable::ActionSpec::named("alert").with_args("emergency vehicle"))
    };

    let mut machine = Machine::builder()
        .initial("red")
        .state(
            "red",
            vec![
                TransitionBuilder::event("timer").to("green"),
                emergency(),
            ],
        )
        .state(
            "green",
            vec![TransitionBuilder::event("timer").to("yellow"), emergency()],
        )
        .state(
            "yellow",
            vec![
                TransitionBuilder::event("timer").to("red").action("cycle"),
                emergency(),
            ],
        )
        .state(
            "flashing",
            vec![
                TransitionBuilder::cond(cond! { "sensor" => "clear" }).to("red"),
                TransitionBuilder::events(["reset", "power_cycle"]).to("red"),
            ],
        )
        .action("cycle", count_cycle)
        .action("alert", raise_alert)
        .logger(|line| println!("  [log] {line}"))
        .build()
        .unwrap();

    let mut intersection = Intersection::default();

    println!("\nInitial state: {}\n", machine.status());

    println!("Running two full cycles:");
    for _ in 0..6 {
        machine.on_event_with(&mut intersection, "timer").unwrap();
    }
    println!("  now {}, cycles completed: {}\n", machine.status(), intersection.cycles);

    println!("Sensor readings:");
    for reading in [
        json!({"sensor": "loop", "lane": 2}),
        json!({"sensor": "siren", "lane": 1, "speed": 80}),
        json!({"sensor": "clear", "lane": 1}),
        json!({"sensor": "clear"}),
    ] {
        let outcome = machine.on_condition_with(&mut intersection, &reading).unwrap();
        println!("  {reading} -> {outcome:?}");
    }

    println!("\nAlerts raised: {:?}", intersection.alerts);
    println!("Visited: {:?}", machine.history().get_path());

    println!("\n=== Example Complete ===");
}
