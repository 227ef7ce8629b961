//! bag-runner: headless driver for the Lucky Bag game.
//!
//! Usage:
//!   bag-runner --seed 12345 --open 5 --wish
//!   bag-runner --config game.json --ipc-mode

use anyhow::Result;
use luckybag_core::{
    config::GameConfig,
    engine::LuckyBagEngine,
    format::{format_time_of_day, format_vnd},
    types::BagId,
    wish::WishService,
};
use std::env;

mod ipc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", wall_clock_seed());
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let want_wish = args.iter().any(|a| a == "--wish");
    let config = match string_arg(&args, "--config") {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let open = parse_arg(&args, "--open", config.bag_count);

    let run_id = format!("run-{seed}-{}", uuid::Uuid::new_v4().simple());
    let wish_service = WishService::from_env(config.wish.clone())?;
    let mut engine = LuckyBagEngine::build(run_id.clone(), seed, config)?;

    if ipc_mode {
        ipc::run_ipc_loop(&mut engine, &wish_service).await?;
    } else {
        println!("Lucky Bag - bag-runner");
        println!("  run_id:    {run_id}");
        println!("  seed:      {seed}");
        println!("  bags:      {}", engine.bags().len());
        let (lo, hi) = engine.settings().bounds();
        println!("  range:     {} - {}", format_vnd(lo), format_vnd(hi));
        println!();

        let ids: Vec<BagId> = engine.bags().iter().map(|b| b.id).take(open as usize).collect();
        for bag_id in ids {
            ipc::open_with_delay(&mut engine, bag_id).await?;
            if want_wish {
                if let Some(reveal) = engine.current_reveal().cloned() {
                    let wish = ipc::deliver_wish(&mut engine, &wish_service, reveal.amount).await?;
                    println!("  bag {bag_id:>2}: {}", wish.text);
                }
            }
            engine.dismiss_reveal()?;
        }
        print_summary(&engine)?;
    }

    Ok(())
}

fn print_summary(engine: &LuckyBagEngine) -> Result<()> {
    let history = engine.history()?;
    let local = chrono::Local;

    println!();
    println!("=== HISTORY (newest first) ===");
    if history.is_empty() {
        println!("  (no bags opened)");
    }
    for session in &history {
        let at = format_time_of_day(session.timestamp, &local).unwrap_or_default();
        println!("  {at}  +{:>12}  [{}]", format_vnd(session.amount), session.id);
    }

    println!();
    println!("=== RUN SUMMARY ===");
    println!("  opened:   {} / {}", engine.opened_count(), engine.bags().len());
    println!("  reveals:  {}", history.len());
    println!("  total:    {}", format_vnd(engine.total()?));
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn wall_clock_seed() -> u64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0) as u64
}
