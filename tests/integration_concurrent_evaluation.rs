//! Concurrent evaluation while configuration refreshes run

mod utils;

use roxx_engine::registry::extension::bucket;
use roxx_engine::{Context, ExperimentModel, RoxFlag, RoxString};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use utils::TestEnvironment;

#[test]
fn parallel_evaluation_is_deterministic() {
    let env = Arc::new(TestEnvironment::new());
    let rollout = RoxFlag::new(false);
    env.flags.add_flag(Arc::clone(rollout.variant()), "app.rollout");
    env.experiments.set_experiments(vec![ExperimentModel::new(
        "exp-1",
        "rollout",
        r#"isInPercentage(concat(property("user"), ".seed"), 0.5)"#,
        ["app.rollout"],
    )]);
    env.properties.add_custom_property(roxx_engine::CustomProperty::computed(
        "user",
        roxx_engine::CustomPropertyType::String,
        |ctx| ctx.get("user").cloned().unwrap_or_default(),
    ));
    env.setter.set_experiments();

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let rollout = rollout.clone();
            thread::spawn(move || {
                (0..250)
                    .map(|i| {
                        let user = format!("user{}", (worker * 250 + i) % 100);
                        let ctx = Context::builder().with("user", user.as_str()).build();
                        (user, rollout.is_enabled(&ctx))
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for (user, enabled) in handle.join().unwrap() {
            let expected = bucket(&format!("{user}.seed")) < 0.5;
            assert_eq!(enabled, expected, "user {user}");
        }
    }
}

#[test]
fn refresh_during_evaluation_serves_old_or_new_binding() {
    let env = Arc::new(TestEnvironment::new());
    let color = RoxString::new("red", ["blue", "green"]);
    env.flags.add_flag(Arc::clone(color.variant()), "app.color");
    env.experiments.set_experiments(vec![ExperimentModel::new(
        "exp-1",
        "blue",
        r#""blue""#,
        ["app.color"],
    )]);
    env.setter.set_experiments();

    let served = Arc::new(AtomicUsize::new(0));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let color = color.clone();
            let served = Arc::clone(&served);
            thread::spawn(move || {
                for _ in 0..500 {
                    let value = color.value(&Context::empty());
                    assert!(
                        value == "blue" || value == "green",
                        "unexpected value {value}"
                    );
                    served.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    let writer = {
        let env = Arc::clone(&env);
        thread::spawn(move || {
            for round in 0..50 {
                let condition = if round % 2 == 0 { r#""green""# } else { r#""blue""# };
                env.experiments.set_experiments(vec![ExperimentModel::new(
                    "exp-1",
                    "color",
                    condition,
                    ["app.color"],
                )]);
                env.setter.set_experiments();
            }
        })
    };

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(served.load(Ordering::Relaxed), 2_000);
}
