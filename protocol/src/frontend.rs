use memory_core::{
    ClickOutcome, Clock, DEFAULT_PLAYER_NAME, Difficulty, GameConfig, GameSession, Leaderboard,
    LeaderboardStore, Submission, SystemClock,
};

use crate::*;

pub const INSTRUCTIONS: [&str; 5] = [
    "Click a card to turn it face up, then click a second card.",
    "If the two cards belong together they stay face up.",
    "Otherwise both are turned face down again after a moment.",
    "Every pair of flips counts as one move.",
    "Clear the board quickly and with few moves for a higher score.",
];

/// Screen flow around a game session. Every screen is driven by the same
/// [`InputEvent`] stream and rendered through [`Frontend::frame`].
#[derive(Debug)]
pub struct Frontend<S, C = SystemClock> {
    mode: UiMode,
    session: GameSession<S, C>,
    leaderboard: Leaderboard,
    status: Option<String>,
}

impl<S: LeaderboardStore> Frontend<S> {
    pub fn new(store: S) -> memory_core::Result<Self> {
        let session = GameSession::new(GameConfig::default(), DEFAULT_PLAYER_NAME, store)?;
        Ok(Self::with_session(session))
    }
}

impl<S: LeaderboardStore, C: Clock> Frontend<S, C> {
    pub fn with_session(session: GameSession<S, C>) -> Self {
        let leaderboard = session.store().load();
        Self {
            mode: UiMode::Menu,
            session,
            leaderboard,
            status: None,
        }
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    pub fn session(&self) -> &GameSession<S, C> {
        &self.session
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Applies one event and reports whether the display should redraw.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        use InputEvent::*;

        log::trace!("{:?} in {:?}", event, self.mode);
        match (self.mode, event) {
            (_, Tick) => self.tick(),
            (_, ResetClicked) => {
                self.status = None;
                let reset = self.session.reset();
                self.report(reset);
                true
            }
            (UiMode::Menu, DifficultySelected { size }) => self.select_difficulty(size),
            (UiMode::Menu, ShowInstructions) => self.switch_to(UiMode::Instructions),
            (UiMode::Menu | UiMode::Playing, ShowLeaderboard) => {
                self.leaderboard = self.session.store().load();
                self.switch_to(UiMode::Leaderboard)
            }
            (UiMode::NameEntry, NameEntered { name }) => {
                self.session.set_player_name(&name);
                // the clock starts when the board is first shown
                let reset = self.session.reset();
                self.report(reset);
                self.switch_to(UiMode::Playing)
            }
            (UiMode::Playing, CardClicked { x, y }) => {
                let outcome = self.session.click(memory_core::Point::new(x, y));
                if outcome == ClickOutcome::Completed {
                    self.on_game_over();
                }
                outcome.has_update()
            }
            (UiMode::Menu, Back) => false,
            (_, Back) => self.switch_to(UiMode::Menu),
            (mode, event) => {
                log::trace!("Ignoring {:?} in {:?}", event, mode);
                false
            }
        }
    }

    fn tick(&mut self) -> bool {
        let outcome = self.session.update();
        let finished_now = !self.session.is_over() && self.session.finish().is_some();
        if finished_now {
            self.on_game_over();
        }
        outcome.has_update() || finished_now || self.mode == UiMode::Playing
    }

    fn select_difficulty(&mut self, size: u8) -> bool {
        match Difficulty::from_grid_size(size) {
            Ok(difficulty) => {
                let config = GameConfig {
                    size: difficulty.grid_size(),
                    ..*self.session.config()
                };
                self.status = None;
                let reconfigured = self.session.reconfigure(config);
                self.report(reconfigured);
                log::debug!("Selected {} difficulty", difficulty.name());
                self.switch_to(UiMode::NameEntry)
            }
            Err(err) => {
                log::warn!("Rejected difficulty selection: {}", err);
                self.status = Some(err.to_string());
                true
            }
        }
    }

    fn on_game_over(&mut self) {
        let Some(result) = self.session.result() else {
            return;
        };
        self.status = Some(match &result.submission {
            Submission::Saved { rank: Some(rank) } => {
                format!("Final score {}, rank #{} on the leaderboard", result.score, rank)
            }
            Submission::Saved { rank: None } => format!("Final score {}", result.score),
            Submission::Failed(reason) => {
                format!("Final score {}, but it could not be saved: {}", result.score, reason)
            }
        });
        self.leaderboard = self.session.store().load();
    }

    fn switch_to(&mut self, mode: UiMode) -> bool {
        if self.mode == mode {
            return false;
        }
        log::debug!("Switching from {:?} to {:?}", self.mode, mode);
        if mode != UiMode::Playing {
            self.status = None;
        }
        self.mode = mode;
        true
    }

    fn report(&mut self, outcome: memory_core::Result<()>) {
        if let Err(err) = outcome {
            log::warn!("{}", err);
            self.status = Some(err.to_string());
        }
    }

    /// Draw model for the current screen.
    pub fn frame(&self) -> Frame {
        let mut frame = Frame {
            mode: self.mode,
            player_name: self.session.player_name().to_owned(),
            status: self.status.clone(),
            ..Frame::default()
        };

        match self.mode {
            UiMode::Menu => {
                frame.difficulties = Difficulty::ALL
                    .into_iter()
                    .map(|difficulty| DifficultyOption {
                        name: difficulty.name().to_owned(),
                        size: difficulty.grid_size(),
                    })
                    .collect();
            }
            UiMode::Instructions => {
                frame.instructions = INSTRUCTIONS.iter().map(|line| (*line).to_owned()).collect();
            }
            UiMode::Leaderboard => {
                frame.leaderboard = LeaderboardRow::rows(&self.leaderboard);
            }
            UiMode::NameEntry => {}
            UiMode::Playing => {
                frame.board = Some(self.board_view());
                frame.hud = Some(Hud {
                    moves: self.session.moves(),
                    elapsed_secs: self.session.elapsed_secs(),
                    score: self.session.current_score(),
                });
                if let Some(result) = self.session.result() {
                    frame.result = Some(result.clone());
                    frame.leaderboard = LeaderboardRow::rows(&self.leaderboard);
                }
            }
        }

        frame
    }

    fn board_view(&self) -> BoardView {
        let layout = self.session.config().layout;
        let grid = self.session.grid();
        let (width, height) = layout.board_extent(grid.size());
        BoardView {
            width,
            height,
            cards: grid
                .iter()
                .map(|card| CardView {
                    row: card.row(),
                    col: card.col(),
                    rect: layout.card_rect(card.coords()),
                    face: CardFace::from(card),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use memory_core::{
        Card, Coord2, FileStore, LeaderboardEntry, ManualClock, MemoryStore, TurnState,
    };

    use super::*;

    fn frontend_with(store: MemoryStore) -> (Frontend<MemoryStore, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let session =
            GameSession::with_clock(GameConfig::default(), "", store, clock.clone(), 99).unwrap();
        (Frontend::with_session(session), clock)
    }

    fn frontend() -> (Frontend<MemoryStore, ManualClock>, ManualClock) {
        frontend_with(MemoryStore::new())
    }

    fn click_card<S: LeaderboardStore>(
        frontend: &mut Frontend<S, ManualClock>,
        coords: Coord2,
    ) -> bool {
        let rect = frontend.session().config().layout.card_rect(coords);
        frontend.handle(InputEvent::CardClicked {
            x: rect.x + rect.width / 2,
            y: rect.y + rect.height / 2,
        })
    }

    fn start_game<S: LeaderboardStore>(
        frontend: &mut Frontend<S, ManualClock>,
        size: u8,
        name: &str,
    ) {
        assert!(frontend.handle(InputEvent::DifficultySelected { size }));
        assert_eq!(frontend.mode(), UiMode::NameEntry);
        assert!(frontend.handle(InputEvent::NameEntered { name: name.into() }));
        assert_eq!(frontend.mode(), UiMode::Playing);
    }

    /// Matches every pair in order, two seconds apart.
    fn play_to_completion<S: LeaderboardStore>(
        frontend: &mut Frontend<S, ManualClock>,
        clock: &ManualClock,
    ) {
        let cards: Vec<Coord2> = frontend.session().grid().iter().map(Card::coords).collect();
        for coords in cards {
            let grid = frontend.session().grid();
            if grid.card(coords).unwrap().is_matched() {
                continue;
            }
            let partner = grid.partner_of(coords).unwrap();
            clock.advance_secs(2);
            click_card(frontend, coords);
            click_card(frontend, partner);
        }
    }

    #[test]
    fn menu_leads_to_name_entry_then_playing() {
        let (mut frontend, _clock) = frontend();
        let menu = frontend.frame();
        assert_eq!(menu.mode, UiMode::Menu);
        assert_eq!(menu.difficulties.len(), 3);
        assert_eq!(menu.player_name, DEFAULT_PLAYER_NAME);

        start_game(&mut frontend, 6, "grace");

        let frame = frontend.frame();
        let board = frame.board.unwrap();
        assert_eq!(board.cards.len(), 36);
        assert!(board.cards.iter().all(|card| card.face == CardFace::Down));
        assert_eq!(frame.player_name, "grace");
        assert_eq!(frame.hud.unwrap().moves, 0);
    }

    #[test]
    fn invalid_difficulty_stays_on_menu_with_status() {
        let (mut frontend, _clock) = frontend();

        frontend.handle(InputEvent::DifficultySelected { size: 5 });

        assert_eq!(frontend.mode(), UiMode::Menu);
        assert!(frontend.status().is_some());
        assert_eq!(frontend.session().grid().size(), 4);
    }

    #[test]
    fn instructions_and_back() {
        let (mut frontend, _clock) = frontend();

        assert!(frontend.handle(InputEvent::ShowInstructions));
        assert_eq!(frontend.frame().instructions.len(), INSTRUCTIONS.len());
        assert!(frontend.handle(InputEvent::Back));
        assert_eq!(frontend.mode(), UiMode::Menu);
        assert!(!frontend.handle(InputEvent::Back));
    }

    #[test]
    fn clicks_outside_playing_are_ignored() {
        let (mut frontend, _clock) = frontend();

        assert!(!click_card(&mut frontend, (0, 0)));
        assert_eq!(frontend.session().state(), TurnState::Selecting0);
    }

    #[test]
    fn mismatch_is_shown_until_ticks_pass_the_delay() {
        let (mut frontend, clock) = frontend();
        start_game(&mut frontend, 4, "ada");
        let grid = frontend.session().grid().clone();
        let other = grid
            .iter()
            .map(Card::coords)
            .find(|&c| c != (0, 0) && !grid.is_pair((0, 0), c))
            .unwrap();

        click_card(&mut frontend, (0, 0));
        click_card(&mut frontend, other);
        let up = frontend
            .frame()
            .board
            .unwrap()
            .cards
            .iter()
            .filter(|card| card.face == CardFace::Up)
            .count();
        assert_eq!(up, 2);

        clock.advance(Duration::from_millis(1_200));
        frontend.handle(InputEvent::Tick);

        let frame = frontend.frame();
        assert!(frame.board.unwrap().cards.iter().all(|card| card.face == CardFace::Down));
        assert_eq!(frame.hud.unwrap().moves, 1);
    }

    #[test]
    fn finishing_shows_result_and_leaderboard() {
        let store = MemoryStore::with_board(Leaderboard::from_entries(vec![LeaderboardEntry::new(
            "old", 50,
        )]));
        let (mut frontend, clock) = frontend_with(store);
        start_game(&mut frontend, 4, "ada");
        play_to_completion(&mut frontend, &clock);

        let frame = frontend.frame();
        let result = frame.result.unwrap();
        assert_eq!(result.moves, 8);
        assert_eq!(result.elapsed_secs, 16);
        assert_eq!(frame.leaderboard.len(), 2);
        assert_eq!(frame.leaderboard[0].name, "ada");
        assert_eq!(frame.leaderboard[0].score, result.score);
        assert!(frontend.status().unwrap().contains("rank #1"));

        frontend.handle(InputEvent::Tick);
        frontend.handle(InputEvent::Tick);
        assert_eq!(frontend.session().store().board().len(), 2);

        assert!(frontend.handle(InputEvent::ResetClicked));
        assert_eq!(frontend.session().state(), TurnState::Selecting0);
        assert!(frontend.frame().result.is_none());
    }

    #[test]
    fn leaderboard_screen_lists_stored_rows() {
        let store = MemoryStore::with_board(Leaderboard::from_entries(vec![
            LeaderboardEntry::new("a", 1),
            LeaderboardEntry::new("b", 3),
        ]));
        let (mut frontend, _clock) = frontend_with(store);

        frontend.handle(InputEvent::ShowLeaderboard);

        let frame = frontend.frame();
        assert_eq!(frame.mode, UiMode::Leaderboard);
        let names: Vec<_> = frame.leaderboard.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn failed_save_is_reported_in_status() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = FileStore::new(blocker.join("scores.json"));
        let clock = ManualClock::new();
        let session =
            GameSession::with_clock(GameConfig::default(), "", store, clock.clone(), 7).unwrap();
        let mut frontend = Frontend::with_session(session);
        start_game(&mut frontend, 4, "ada");

        play_to_completion(&mut frontend, &clock);

        let result = frontend.frame().result.unwrap();
        assert!(matches!(result.submission, Submission::Failed(_)));
        assert_eq!(result.score, memory_core::compute_score(8, 16));
        assert!(frontend.session().is_over());
        let status = frontend.status().unwrap();
        assert!(status.contains("could not be saved"), "{status}");
        assert!(status.contains(&result.score.to_string()));
        assert!(frontend.frame().leaderboard.is_empty());
    }
}
