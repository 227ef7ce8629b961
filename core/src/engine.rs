//! The game engine: owns the board, the settings and the history.
//!
//! RULES:
//!   - One opening in flight at a time (the busy flag).
//!   - A bag, once opened, keeps its content until the board is reset.
//!   - Every reveal is appended to the history; reset never clears it.
//!   - All randomness flows through the RngBank.
//!   - All state changes are recorded in the event log.

use crate::{
    amount,
    bag::{new_board, Bag, LuckyMoneySession},
    clock::{Clock, ManualClock, SystemClock},
    command::PlayerCommand,
    config::{GameConfig, Settings},
    error::{GameError, GameResult},
    event::{EventLogEntry, GameEvent, IgnoreReason},
    rng::{GameRng, RngBank, StreamSlot},
    snapshot::GameSnapshot,
    store::GameStore,
    types::{Amount, BagId, RunId},
};

pub const SESSION_ID_LEN: usize = 9;

/// Proof that an opening was started. Only `begin_opening` creates one,
/// and `finish_opening` consumes it, so each opening finishes once.
/// A ticket only finishes on the engine and the opening that issued it.
#[derive(Debug)]
#[must_use = "an opening stays in flight until the ticket is finished"]
pub struct OpeningTicket {
    run_id:  RunId,
    opening: u64,
    bag_id:  BagId,
}

/// The opening currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    opening: u64,
    bag_id:  BagId,
}

impl OpeningTicket {
    pub fn bag_id(&self) -> BagId {
        self.bag_id
    }
}

pub struct LuckyBagEngine {
    pub run_id:     RunId,
    seed:           u64,
    config:         GameConfig,
    settings:       Settings,
    bags:           Vec<Bag>,
    in_flight:      Option<InFlight>,
    openings:       u64,
    current_reveal: Option<LuckyMoneySession>,
    amount_rng:     GameRng,
    id_rng:         GameRng,
    clock:          Box<dyn Clock>,
    store:          GameStore,
    event_seq:      u64,
}

impl LuckyBagEngine {
    /// The store must already be migrated.
    pub fn new(
        run_id: RunId,
        seed: u64,
        config: GameConfig,
        store: GameStore,
        clock: Box<dyn Clock>,
    ) -> GameResult<Self> {
        let rng_bank = RngBank::new(seed);
        let mut engine = Self {
            seed,
            settings:       config.settings,
            bags:           new_board(config.bag_count),
            in_flight:      None,
            openings:       0,
            current_reveal: None,
            amount_rng:     rng_bank.for_slot(StreamSlot::Amount),
            id_rng:         rng_bank.for_slot(StreamSlot::SessionId),
            clock,
            store,
            event_seq:      0,
            config,
            run_id,
        };

        engine.store.insert_run(
            &engine.run_id,
            seed,
            engine.config.bag_count,
            engine.clock.now_millis(),
        )?;
        engine.record(GameEvent::GameInitialized {
            run_id:    engine.run_id.clone(),
            seed,
            bag_count: engine.config.bag_count,
        })?;
        log::info!(
            "run={} initialized: seed={seed} bags={} range={}..{}",
            engine.run_id,
            engine.config.bag_count,
            engine.settings.min_amount,
            engine.settings.max_amount
        );
        Ok(engine)
    }

    /// Build a fully wired engine: in-memory store and the system clock.
    pub fn build(run_id: RunId, seed: u64, config: GameConfig) -> GameResult<Self> {
        let store = GameStore::in_memory()?;
        store.migrate()?;
        Self::new(run_id, seed, config, store, Box::new(SystemClock))
    }

    /// Default config and a manual clock starting at zero.
    pub fn build_test(run_id: RunId, seed: u64) -> GameResult<Self> {
        Self::build_test_with(run_id, seed, GameConfig::default(), ManualClock::default())
    }

    /// For tests that need their own config or a handle on the clock.
    pub fn build_test_with(
        run_id: RunId,
        seed: u64,
        config: GameConfig,
        clock: ManualClock,
    ) -> GameResult<Self> {
        let store = GameStore::in_memory()?;
        store.migrate()?;
        Self::new(run_id, seed, config, store, Box::new(clock))
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn seed(&self) -> u64 { self.seed }
    pub fn config(&self) -> &GameConfig { &self.config }
    pub fn settings(&self) -> Settings { self.settings }
    pub fn bags(&self) -> &[Bag] { &self.bags }
    pub fn is_opening(&self) -> bool { self.in_flight.is_some() }

    pub fn bag(&self, bag_id: BagId) -> Option<&Bag> {
        self.bags.iter().find(|b| b.id == bag_id)
    }

    pub fn current_reveal(&self) -> Option<&LuckyMoneySession> {
        self.current_reveal.as_ref()
    }

    pub fn opened_count(&self) -> u32 {
        self.bags.iter().filter(|b| b.is_opened).count() as u32
    }

    /// All reveals, newest first.
    pub fn history(&self) -> GameResult<Vec<LuckyMoneySession>> {
        self.store.history(&self.run_id)
    }

    pub fn history_len(&self) -> GameResult<u64> {
        self.store.history_len(&self.run_id)
    }

    /// Sum of every reveal in the history.
    pub fn total(&self) -> GameResult<Amount> {
        self.store.history_total(&self.run_id)
    }

    pub fn events(&self) -> GameResult<Vec<EventLogEntry>> {
        self.store.events(&self.run_id)
    }

    // ── Opening ────────────────────────────────────────────────

    /// Start opening a bag. Returns `None` (and changes nothing) when
    /// another opening is in flight or the bag is already opened.
    pub fn begin_opening(&mut self, bag_id: BagId) -> GameResult<Option<OpeningTicket>> {
        let bag = self.bag(bag_id).ok_or(GameError::BagNotFound { bag_id })?;

        let ignored = if self.is_opening() {
            Some(IgnoreReason::Busy)
        } else if bag.is_opened {
            Some(IgnoreReason::AlreadyOpened)
        } else {
            None
        };

        if let Some(reason) = ignored {
            log::debug!("run={} open bag {bag_id} ignored: {reason:?}", self.run_id);
            self.record(GameEvent::OpenIgnored { bag_id, reason })?;
            return Ok(None);
        }

        self.openings += 1;
        let opening = self.openings;
        self.in_flight = Some(InFlight { opening, bag_id });
        Ok(Some(OpeningTicket { run_id: self.run_id.clone(), opening, bag_id }))
    }

    /// Reveal the bag behind the ticket. The amount is drawn with the
    /// settings in force now, not when the opening began.
    ///
    /// A ticket from another engine, or from an opening that was
    /// cancelled, is rejected with `StaleTicket` and changes nothing.
    pub fn finish_opening(&mut self, ticket: OpeningTicket) -> GameResult<LuckyMoneySession> {
        let bag_id = ticket.bag_id;
        let expected = InFlight { opening: ticket.opening, bag_id };
        if ticket.run_id != self.run_id || self.in_flight != Some(expected) {
            log::warn!("run={} stale ticket for bag {bag_id}", self.run_id);
            return Err(GameError::StaleTicket { bag_id });
        }

        // The busy flag drops whatever happens below.
        self.in_flight = None;

        let index = self
            .bags
            .iter()
            .position(|b| b.id == bag_id)
            .ok_or(GameError::BagNotFound { bag_id })?;
        if self.bags[index].is_opened {
            return Err(GameError::BagAlreadyOpened { bag_id });
        }

        let amount = amount::draw(
            self.config.draw_mode,
            &self.config.denominations,
            &self.settings,
            &mut self.amount_rng,
        );
        let session = LuckyMoneySession {
            id:        self.id_rng.next_token(SESSION_ID_LEN),
            amount,
            timestamp: self.clock.now_millis(),
        };

        // History first: a failed write leaves the bag closed, so the
        // board never shows a reveal the total does not include.
        self.store.append_session(&self.run_id, bag_id, &session)?;
        self.bags[index].open(session.clone())?;
        self.current_reveal = Some(session.clone());
        self.record(GameEvent::BagOpened {
            bag_id,
            session_id: session.id.clone(),
            amount,
            timestamp:  session.timestamp,
        })?;

        log::info!("run={} bag {bag_id} opened: {amount}", self.run_id);
        Ok(session)
    }

    /// Drop the opening in flight without revealing anything. Any
    /// outstanding ticket for it becomes stale.
    pub fn cancel_opening(&mut self) -> GameResult<()> {
        if let Some(InFlight { bag_id, .. }) = self.in_flight.take() {
            self.record(GameEvent::OpeningCancelled { bag_id })?;
            log::info!("run={} opening of bag {bag_id} cancelled", self.run_id);
        }
        Ok(())
    }

    /// Begin and finish in one step, without the cosmetic delay.
    pub fn open_bag(&mut self, bag_id: BagId) -> GameResult<Option<LuckyMoneySession>> {
        match self.begin_opening(bag_id)? {
            Some(ticket) => self.finish_opening(ticket).map(Some),
            None => Ok(None),
        }
    }

    // ── Board and settings ─────────────────────────────────────

    /// Close every bag and clear the reveal. The history is kept.
    pub fn reset(&mut self) -> GameResult<()> {
        let opened_before = self.opened_count();
        for bag in &mut self.bags {
            bag.close();
        }
        self.current_reveal = None;
        self.record(GameEvent::BoardReset { opened_before })?;
        log::info!("run={} board reset ({opened_before} bags were open)", self.run_id);
        Ok(())
    }

    /// Stored as given; the bounds are ordered at draw time.
    pub fn update_settings(&mut self, min_amount: Amount, max_amount: Amount) -> GameResult<()> {
        self.settings = Settings::new(min_amount, max_amount);
        self.record(GameEvent::SettingsUpdated { min_amount, max_amount })?;
        log::info!("run={} settings: {min_amount}..{max_amount}", self.run_id);
        Ok(())
    }

    pub fn dismiss_reveal(&mut self) -> GameResult<()> {
        if self.current_reveal.take().is_some() {
            self.record(GameEvent::RevealDismissed)?;
        }
        Ok(())
    }

    /// Record that a wish was shown for a reveal.
    pub fn note_wish(&mut self, amount: Amount, fallback: bool) -> GameResult<()> {
        self.record(GameEvent::WishDelivered { amount, fallback })
    }

    /// Apply a player command. Returns the events it produced.
    pub fn apply(&mut self, command: PlayerCommand) -> GameResult<Vec<GameEvent>> {
        log::debug!("run={} command: {}", self.run_id, command.name());
        let first_new = self.event_seq;
        match command {
            PlayerCommand::OpenBag { bag_id } => {
                self.open_bag(bag_id)?;
            }
            PlayerCommand::Reset => self.reset()?,
            PlayerCommand::UpdateSettings { min_amount, max_amount } => {
                self.update_settings(min_amount, max_amount)?
            }
            PlayerCommand::DismissReveal => self.dismiss_reveal()?,
        }

        self.events()?
            .into_iter()
            .filter(|e| e.seq >= first_new)
            .map(|e| serde_json::from_str(&e.payload).map_err(GameError::from))
            .collect()
    }

    pub fn snapshot(&self) -> GameResult<GameSnapshot> {
        Ok(GameSnapshot {
            run_id:         self.run_id.clone(),
            bags:           self.bags.clone(),
            history:        self.history()?,
            total:          self.total()?,
            settings:       self.settings,
            is_opening:     self.is_opening(),
            current_reveal: self.current_reveal.clone(),
        })
    }

    fn record(&mut self, event: GameEvent) -> GameResult<()> {
        let entry = EventLogEntry {
            id:         None,
            run_id:     self.run_id.clone(),
            seq:        self.event_seq,
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(&event)?,
        };
        self.store.append_event(&entry)?;
        self.event_seq += 1;
        Ok(())
    }
}
