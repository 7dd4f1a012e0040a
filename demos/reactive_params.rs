//! Reactive Params Example - change detection over several update cycles
//!
//! This example demonstrates:
//! - Signal-backed parameter slots
//! - Event handlers receiving last/new values
//! - A shared no-arg handler that runs once per cycle
//! - A tolerance comparer driven by a sibling parameter
//! - The two-way `set_value` path
//!
//! Run with: cargo run --example reactive_params

use std::cell::Cell;
use std::rc::Rc;

use futures::executor::block_on;
use spark_params::{
    Comparer, Handler, NoArgHandler, ParameterSlot, ParameterState, ScopeContainer, Tolerance,
};
use spark_signals::{signal, Signal};

/// Live state of a slider widget.
#[derive(Clone)]
struct Slider {
    width: Signal<u16>,
    height: Signal<u16>,
    value: Signal<f64>,
    epsilon: Signal<f64>,
}

/// One incoming batch of slider props.
#[derive(Default)]
struct SliderProps {
    width: Option<u16>,
    height: Option<u16>,
    value: Option<f64>,
    epsilon: Option<f64>,
}

impl Slider {
    fn assign(&self, props: SliderProps) {
        if let Some(width) = props.width {
            self.width.set(width);
        }
        if let Some(height) = props.height {
            self.height.set(height);
        }
        if let Some(value) = props.value {
            self.value.set(value);
        }
        if let Some(epsilon) = props.epsilon {
            self.epsilon.set(epsilon);
        }
    }
}

fn main() -> anyhow::Result<()> {
    println!("=== spark-params Reactive Example ===\n");

    let slider = Slider {
        width: signal(40),
        height: signal(3),
        value: signal(0.0),
        epsilon: signal(0.25),
    };

    let relayouts = Rc::new(Cell::new(0));
    let relayouts_clone = relayouts.clone();
    let relayout = NoArgHandler::new(move || {
        relayouts_clone.set(relayouts_clone.get() + 1);
        println!("  relayout");
    });

    let epsilon_slot = ParameterSlot::builder_from("Epsilon", slider.epsilon.clone()).attach();

    let scope = ScopeContainer::new("slider");
    scope.add(
        ParameterSlot::builder_from("Width", slider.width.clone())
            .shared_handler(&relayout)
            .handler_identity("relayout")
            .attach(),
    )?;
    scope.add(
        ParameterSlot::builder_from("Height", slider.height.clone())
            .shared_handler(&relayout)
            .handler_identity("relayout")
            .attach(),
    )?;
    scope.add(epsilon_slot.clone())?;

    let value_slot = ParameterSlot::builder_from("Value", slider.value.clone())
        .comparer(Comparer::from_parameter(&epsilon_slot, |eps: &f64| Tolerance::new(*eps)))
        .handler(Handler::with_event(|event| {
            println!("  {}: {} -> {}", event.name, event.last_value, event.new_value);
        }))
        .on_write_back(|new_value: &f64| println!("  write-back requested: {new_value}"))
        .attach();
    scope.add(value_slot.clone())?;

    scope.on_initialized();
    println!("Tracking {:?}\n", scope.names());

    let cycles = [
        (
            "resize both dimensions",
            SliderProps {
                width: Some(60),
                height: Some(4),
                ..Default::default()
            },
        ),
        (
            "nudge value inside tolerance",
            SliderProps {
                value: Some(0.1),
                ..Default::default()
            },
        ),
        (
            "tighten tolerance with the same value",
            SliderProps {
                value: Some(0.1),
                epsilon: Some(0.01),
                ..Default::default()
            },
        ),
        (
            "idle",
            SliderProps {
                width: Some(60),
                ..Default::default()
            },
        ),
    ];

    for (label, props) in cycles {
        println!("Cycle: {label}");
        let target = slider.clone();
        block_on(scope.apply_and_notify(
            move |props: SliderProps| target.assign(props),
            props,
        ))?;
    }

    println!("\nTwo-way write:");
    block_on(value_slot.set_value(0.75))?;
    println!("  committed value = {}", slider.value.get());
    println!("  changed since commit: {}", value_slot.has_changed());

    println!("\nRelayout ran {} time(s)", relayouts.get());
    Ok(())
}
