//! Board reset tests.
//!
//! Reset closes every bag and clears the reveal, but the history and
//! the running total survive it.

use luckybag_core::engine::LuckyBagEngine;

fn build(run_id: &str, seed: u64) -> LuckyBagEngine {
    LuckyBagEngine::build_test(run_id.to_string(), seed).expect("build test engine")
}

#[test]
fn reset_closes_bags_but_keeps_history() {
    let mut engine = build("reset-test", 11);

    for bag_id in [0, 5, 11] {
        engine.open_bag(bag_id).unwrap().unwrap();
    }
    let total_before = engine.total().unwrap();
    let history_before = engine.history().unwrap();

    engine.reset().unwrap();

    assert!(engine.bags().iter().all(|b| !b.is_opened && b.content.is_none()));
    assert!(engine.current_reveal().is_none());
    assert_eq!(engine.history().unwrap(), history_before);
    assert_eq!(engine.total().unwrap(), total_before);
}

/// Reset bags can be opened again; history keeps growing.
#[test]
fn reopening_after_reset_adds_to_history() {
    let mut engine = build("reset-reopen-test", 12);

    let first = engine.open_bag(2).unwrap().unwrap();
    engine.reset().unwrap();
    let second = engine.open_bag(2).unwrap().expect("reset bag opens again");

    assert_ne!(first.id, second.id);
    assert_eq!(engine.bag(2).unwrap().content.as_ref(), Some(&second));
    assert_eq!(engine.history_len().unwrap(), 2);
    assert_eq!(engine.total().unwrap(), first.amount + second.amount);
}

#[test]
fn reset_keeps_settings() {
    let mut engine = build("reset-settings-test", 13);
    engine.update_settings(1_000, 2_000).unwrap();
    engine.reset().unwrap();

    assert_eq!(engine.settings().min_amount, 1_000);
    assert_eq!(engine.settings().max_amount, 2_000);
}

#[test]
fn reset_on_fresh_board_is_harmless() {
    let mut engine = build("reset-fresh-test", 14);
    engine.reset().unwrap();

    assert_eq!(engine.opened_count(), 0);
    assert_eq!(engine.history_len().unwrap(), 0);
}
