//! Property tests for group uniqueness and handler collapsing.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use futures::executor::block_on;
use proptest::prelude::*;
use spark_params::{
    group_by_handler_identity, Handler, NoArgHandler, ParamError, ParameterGroup, ParameterSlot,
    ParameterState, ScopeContainer, SharedParameter,
};

fn name_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(vec!["A", "B", "C", "D", "E", "F"]), 0..24)
        .prop_map(|names| names.into_iter().map(str::to_string).collect())
}

/// How a generated parameter reacts to change.
#[derive(Debug, Clone, Copy)]
enum Wiring {
    None,
    Own,
    Shared,
    Event,
}

fn wiring_strategy() -> impl Strategy<Value = Vec<(Wiring, bool)>> {
    prop::collection::vec(
        (
            prop_oneof![
                Just(Wiring::None),
                Just(Wiring::Own),
                Just(Wiring::Shared),
                Just(Wiring::Event),
            ],
            any::<bool>(),
        ),
        1..12,
    )
}

proptest! {
    #[test]
    fn group_keeps_first_of_each_name(names in name_strategy()) {
        let mut group = ParameterGroup::new();
        let mut expected: Vec<String> = Vec::new();

        for name in &names {
            let result = group.add(ParameterSlot::attach(name.clone(), || 0u8, None, None));
            if expected.contains(name) {
                let is_duplicate = matches!(result, Err(ParamError::DuplicateName { .. }));
                prop_assert!(is_duplicate);
            } else {
                prop_assert!(result.is_ok());
                expected.push(name.clone());
            }
        }

        let distinct: HashSet<&String> = names.iter().collect();
        prop_assert_eq!(group.len(), distinct.len());
        let expected: Vec<&str> = expected.iter().map(String::as_str).collect();
        prop_assert_eq!(group.names().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn shared_handler_runs_once_per_cycle(wiring in wiring_strategy()) {
        let calls = Rc::new(Cell::new(0usize));
        let counter = calls.clone();
        let shared = NoArgHandler::new(move || counter.set(counter.get() + 1));

        let scope = ScopeContainer::new("generated");
        let mut values = Vec::new();
        for (index, (kind, _)) in wiring.iter().enumerate() {
            let value = Rc::new(Cell::new(0i32));
            let read = value.clone();
            let builder = ParameterSlot::builder(format!("P{index}"), move || read.get());
            let builder = match kind {
                Wiring::None => builder,
                Wiring::Own => {
                    let calls = calls.clone();
                    builder.handler(Handler::no_arg(move || calls.set(calls.get() + 1)))
                }
                Wiring::Shared => builder.shared_handler(&shared).handler_identity("on_change"),
                Wiring::Event => {
                    let calls = calls.clone();
                    builder
                        .handler(Handler::with_event(move |_event| calls.set(calls.get() + 1)))
                        .handler_identity("on_change")
                }
            };
            scope.add(builder.attach()).unwrap();
            values.push(value);
        }
        scope.on_initialized();

        let flips: Vec<bool> = wiring.iter().map(|(_, changed)| *changed).collect();
        let targets = values.clone();
        block_on(scope.apply_and_notify(
            move |flips: Vec<bool>| {
                for (value, flip) in targets.iter().zip(flips) {
                    if flip {
                        value.set(1);
                    }
                }
            },
            flips,
        ))
        .unwrap();

        let individual = wiring
            .iter()
            .filter(|(kind, changed)| *changed && matches!(kind, Wiring::Own | Wiring::Event))
            .count();
        let shared_runs = usize::from(
            wiring.iter().any(|(kind, changed)| *changed && matches!(kind, Wiring::Shared)),
        );
        prop_assert_eq!(calls.get(), individual + shared_runs);

        // Everything advanced: a second identical cycle is idle
        prop_assert!(scope.collect_changes().is_empty());
    }

    #[test]
    fn grouping_preserves_first_member_order(wiring in wiring_strategy()) {
        let shared = NoArgHandler::new(|| ());
        let changed: Vec<SharedParameter> = wiring
            .iter()
            .enumerate()
            .map(|(index, (kind, _))| {
                let builder = ParameterSlot::builder(format!("P{index}"), || 0i32);
                let builder = match kind {
                    Wiring::None => builder,
                    Wiring::Own => builder.handler(Handler::no_arg(|| ())),
                    Wiring::Shared => builder.shared_handler(&shared).handler_identity("on_change"),
                    Wiring::Event => builder.handler(Handler::with_event(|_event| ())),
                };
                builder.attach() as SharedParameter
            })
            .collect();

        let groups = group_by_handler_identity(&changed);
        let positions: Vec<usize> = groups
            .iter()
            .map(|slot| changed.iter().position(|c| Rc::ptr_eq(c, slot)).unwrap())
            .collect();

        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(groups.iter().all(|slot| slot.has_handler()));
    }
}
