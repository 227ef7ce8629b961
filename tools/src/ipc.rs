//! JSON-lines IPC: one command per stdin line, one reply per stdout line.
//!
//!   {"type":"get_state"}
//!   {"type":"command","command":{"cmd":"open_bag","bag_id":3}}
//!   {"type":"wish","amount":20000}
//!   {"type":"quit"}
//!
//! State replies are a `GameSnapshot`. Anything that goes wrong becomes
//! `{"error": "..."}` and the loop keeps reading.

use anyhow::Result;
use luckybag_core::{
    command::PlayerCommand,
    engine::LuckyBagEngine,
    types::{Amount, BagId},
    wish::{Wish, WishService},
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Command { command: PlayerCommand },
    Wish { amount: Amount },
    Quit,
}

/// What the loop should do with one input line.
#[derive(Debug, PartialEq)]
pub enum IpcReply {
    Line(String),
    Skip,
    Quit,
}

/// Begin, wait out the cosmetic delay, then reveal.
pub async fn open_with_delay(engine: &mut LuckyBagEngine, bag_id: BagId) -> Result<()> {
    if let Some(ticket) = engine.begin_opening(bag_id)? {
        let delay = engine.config().opening_delay_ms;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        engine.finish_opening(ticket)?;
    }
    Ok(())
}

pub async fn deliver_wish(
    engine: &mut LuckyBagEngine,
    service: &WishService,
    amount: Amount,
) -> Result<Wish> {
    let wish = service.generate_wish(amount).await;
    engine.note_wish(amount, wish.fallback)?;
    Ok(wish)
}

fn error_line(e: impl std::fmt::Display) -> IpcReply {
    IpcReply::Line(serde_json::json!({ "error": e.to_string() }).to_string())
}

fn state_line(engine: &LuckyBagEngine) -> Result<String> {
    Ok(serde_json::to_string(&engine.snapshot()?)?)
}

/// Handle one input line.
pub async fn handle_line(
    engine: &mut LuckyBagEngine,
    wish_service: &WishService,
    line: &str,
) -> IpcReply {
    if line.trim().is_empty() {
        return IpcReply::Skip;
    }

    let cmd: IpcCommand = match serde_json::from_str(line) {
        Ok(c) => c,
        Err(e) => return error_line(e),
    };

    let reply = match cmd {
        IpcCommand::Quit => return IpcReply::Quit,
        IpcCommand::GetState => state_line(engine),
        IpcCommand::Command { command } => {
            let result = match command {
                PlayerCommand::OpenBag { bag_id } => open_with_delay(engine, bag_id).await,
                other => engine.apply(other).map(|_| ()).map_err(Into::into),
            };
            result.and_then(|()| state_line(engine))
        }
        IpcCommand::Wish { amount } => deliver_wish(engine, wish_service, amount)
            .await
            .and_then(|wish| Ok(serde_json::to_string(&wish)?)),
    };

    match reply {
        Ok(line) => IpcReply::Line(line),
        Err(e) => {
            log::warn!("ipc: {e}");
            error_line(e)
        }
    }
}

pub async fn run_ipc_loop(engine: &mut LuckyBagEngine, wish_service: &WishService) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        match handle_line(engine, wish_service, &line).await {
            IpcReply::Quit => break,
            IpcReply::Skip => continue,
            IpcReply::Line(reply) => {
                stdout.write_all(reply.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }
    }
    Ok(())
}
