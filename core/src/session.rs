use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use web_time::Instant;

use crate::*;

pub const DEFAULT_PLAYER_NAME: &str = "Player";
pub const MAX_PLAYER_NAME_LEN: usize = 16;

/// Valid transitions:
/// - Selecting0 -> Selecting1 (first card flipped)
/// - Selecting1 -> Resolving (second card flipped, one move counted)
/// - Resolving -> Selecting0 (pair matched, or mismatched pair flipped back)
/// - Resolving -> Over (last pair matched)
/// - any -> Selecting0 (reset)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    #[default]
    Selecting0,
    Selecting1,
    Resolving,
    Over,
}

impl TurnState {
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Over)
    }

    pub const fn accepts_clicks(self) -> bool {
        matches!(self, Self::Selecting0 | Self::Selecting1)
    }
}

/// Cards flipped during the current, unresolved turn.
pub type TurnBuffer = SmallVec<[Coord2; 2]>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Submission {
    Saved { rank: Option<usize> },
    Failed(String),
}

impl Submission {
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Final numbers of a finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub player_name: String,
    pub moves: u32,
    pub elapsed_secs: u64,
    pub score: u32,
    pub submission: Submission,
}

/// Trims the name and caps its length, empty names become the default.
pub fn normalize_player_name(name: &str) -> String {
    let name: String = name.trim().chars().take(MAX_PLAYER_NAME_LEN).collect();
    let name = name.trim_end();
    if name.is_empty() {
        DEFAULT_PLAYER_NAME.to_owned()
    } else {
        name.to_owned()
    }
}

/// One game from the first flip to the leaderboard submission.
#[derive(Debug)]
pub struct GameSession<S, C = SystemClock> {
    config: GameConfig,
    grid: Grid,
    turn: TurnBuffer,
    state: TurnState,
    conceal_at: Option<Instant>,
    moves: u32,
    started_at: Instant,
    ended_at: Option<Instant>,
    player_name: String,
    result: Option<GameResult>,
    rng: SmallRng,
    store: S,
    clock: C,
}

impl<S: LeaderboardStore> GameSession<S> {
    /// Starts a session on the wall clock with a random deal.
    pub fn new(config: GameConfig, player_name: &str, store: S) -> Result<Self> {
        Self::with_clock(config, player_name, store, SystemClock, rand::random())
    }
}

impl<S: LeaderboardStore, C: Clock> GameSession<S, C> {
    /// Starts a session whose deals are reproducible from `seed`.
    pub fn with_clock(
        config: GameConfig,
        player_name: &str,
        store: S,
        clock: C,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let grid = deal(config.size, &mut rng)?;
        let started_at = clock.now();
        log::debug!("New {}x{} session, seed {}", config.size, config.size, seed);
        Ok(Self {
            config,
            grid,
            turn: TurnBuffer::new(),
            state: TurnState::Selecting0,
            conceal_at: None,
            moves: 0,
            started_at,
            ended_at: None,
            player_name: normalize_player_name(player_name),
            result: None,
            rng,
            store,
            clock,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn turn_buffer(&self) -> &[Coord2] {
        &self.turn
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Applies to the next submission, including the current game's.
    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = normalize_player_name(name);
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Time since the session started, frozen once the game is over.
    pub fn elapsed(&self) -> Duration {
        let until = self.ended_at.unwrap_or_else(|| self.clock.now());
        until.saturating_duration_since(self.started_at)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }

    /// Score the game would get if it ended now.
    pub fn current_score(&self) -> u32 {
        match &self.result {
            Some(result) => result.score,
            None => compute_score(self.moves, self.elapsed_secs()),
        }
    }

    /// Remaining time before a mismatched pair flips back, if one is showing.
    pub fn conceal_remaining(&self) -> Option<Duration> {
        self.conceal_at
            .map(|deadline| deadline.saturating_duration_since(self.clock.now()))
    }

    /// Handles a pointer click at `point`.
    /// Handles a pointer click at `point`. A click that selects nothing still
    /// reports `Concealed` when it settled an expired mismatch.
    pub fn click(&mut self, point: Point) -> ClickOutcome {
        let settled = self.update();
        if !self.state.accepts_clicks() {
            log::trace!("Click ignored in state {:?}", self.state);
            return settled;
        }
        match self.grid.card_at(&self.config.layout, point) {
            Some(coords) => self.select_or(coords, settled),
            None => settled,
        }
    }

    /// Handles a selection of the card at `coords`, bypassing the hit-test.
    pub fn click_card(&mut self, coords: Coord2) -> ClickOutcome {
        let settled = self.update();
        self.select_or(coords, settled)
    }

    fn select_or(&mut self, coords: Coord2, settled: ClickOutcome) -> ClickOutcome {
        match self.select(coords) {
            Ok(ClickOutcome::Ignored) => settled,
            Ok(outcome) => outcome,
            Err(err) => {
                log::trace!("Selection at {:?} ignored: {}", coords, err);
                settled
            }
        }
    }

    fn select(&mut self, coords: Coord2) -> Result<ClickOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        if !self.state.accepts_clicks() {
            return Ok(ClickOutcome::Ignored);
        }
        let selectable = self.grid.card(coords).is_some_and(Card::is_selectable);
        if !selectable {
            log::trace!("Card at {:?} is already face up or matched", coords);
            return Ok(ClickOutcome::Ignored);
        }

        self.grid.flip(coords)?;
        self.turn.push(coords);
        log::debug!("Flipped card at {:?}", coords);

        match self.state {
            TurnState::Selecting0 => {
                self.state = TurnState::Selecting1;
                Ok(ClickOutcome::Flipped)
            }
            _ => {
                self.moves = self.moves.saturating_add(1);
                self.state = TurnState::Resolving;
                self.resolve()
            }
        }
    }

    fn resolve(&mut self) -> Result<ClickOutcome> {
        let (first, second) = match self.turn.as_slice() {
            &[first, second] => (first, second),
            _ => {
                log::warn!("Resolving with {} buffered cards", self.turn.len());
                self.turn.clear();
                self.state = TurnState::Selecting0;
                return Ok(ClickOutcome::Ignored);
            }
        };

        if self.grid.is_pair(first, second) {
            self.grid.mark_matched(first)?;
            self.grid.mark_matched(second)?;
            self.turn.clear();
            self.state = TurnState::Selecting0;
            log::debug!("Matched {:?} and {:?} after {} moves", first, second, self.moves);
            if self.finish().is_some() {
                Ok(ClickOutcome::Completed)
            } else {
                Ok(ClickOutcome::Matched)
            }
        } else {
            self.conceal_at = Some(self.clock.now() + self.config.mismatch_delay);
            log::debug!("Mismatch between {:?} and {:?}", first, second);
            Ok(ClickOutcome::Mismatched)
        }
    }

    /// Flips a mismatched pair back once its display delay has elapsed.
    /// Meant to be called once per frame.
    pub fn update(&mut self) -> ClickOutcome {
        let Some(deadline) = self.conceal_at else {
            return ClickOutcome::Ignored;
        };
        if self.clock.now() < deadline {
            return ClickOutcome::Ignored;
        }

        self.conceal_at = None;
        for coords in self.turn.drain(..) {
            if let Err(err) = self.grid.flip(coords) {
                log::warn!("Could not flip back card at {:?}: {}", coords, err);
            }
        }
        self.state = TurnState::Selecting0;
        log::trace!("Mismatched pair flipped back");
        ClickOutcome::Concealed
    }

    /// Ends the game once every card is matched, scoring it and submitting
    /// the score. Further calls return the same result without resubmitting.
    pub fn finish(&mut self) -> Option<&GameResult> {
        if self.result.is_none() && self.grid.all_matched() {
            let ended_at = self.clock.now();
            self.ended_at = Some(ended_at);
            self.state = TurnState::Over;
            self.conceal_at = None;
            self.turn.clear();

            let elapsed_secs = ended_at.saturating_duration_since(self.started_at).as_secs();
            let score = compute_score(self.moves, elapsed_secs);
            log::debug!(
                "Game over: {} moves in {}s, score {}",
                self.moves,
                elapsed_secs,
                score
            );

            let submission = match self.store.submit(&self.player_name, score) {
                Ok(rank) => Submission::Saved { rank },
                Err(err) => {
                    log::warn!("Score {} was not saved: {}", score, err);
                    Submission::Failed(err.to_string())
                }
            };
            self.result = Some(GameResult {
                player_name: self.player_name.clone(),
                moves: self.moves,
                elapsed_secs,
                score,
                submission,
            });
        }
        self.result.as_ref()
    }

    /// Deals a fresh grid and restarts counters and timer. Legal in any state.
    pub fn reset(&mut self) -> Result<()> {
        self.grid = deal(self.config.size, &mut self.rng)?;
        self.turn.clear();
        self.state = TurnState::Selecting0;
        self.conceal_at = None;
        self.moves = 0;
        self.started_at = self.clock.now();
        self.ended_at = None;
        self.result = None;
        log::debug!("Session reset");
        Ok(())
    }

    /// Switches to another configuration and starts over.
    pub fn reconfigure(&mut self, config: GameConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.reset()
    }
}

fn deal(size: Coord, rng: &mut SmallRng) -> Result<Grid> {
    let mut grid = Grid::new(size)?;
    grid.shuffle(rng);
    Ok(grid)
}
