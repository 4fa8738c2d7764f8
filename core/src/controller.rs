use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// A single round.
    Classic,
    /// Two rounds, players swap placer and revealer roles in between.
    Tournament,
}

impl MatchMode {
    pub const fn rounds(self) -> u8 {
        match self {
            Self::Classic => 1,
            Self::Tournament => 2,
        }
    }
}

/// Serialized as its number, `1` or `2`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        player.number()
    }
}

impl TryFrom<u8> for Player {
    type Error = GameError;

    fn try_from(number: u8) -> Result<Self> {
        match number {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(GameError::OutOfRange),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub player1: u32,
    pub player2: u32,
}

impl Scores {
    pub const fn get(&self, player: Player) -> u32 {
        match player {
            Player::One => self.player1,
            Player::Two => self.player2,
        }
    }

    fn add(&mut self, player: Player, score: u32) {
        let slot = match player {
            Player::One => &mut self.player1,
            Player::Two => &mut self.player2,
        };
        *slot = slot.saturating_add(score);
    }

    /// Higher score wins, equal scores tie.
    pub fn standing(&self) -> Standing {
        match self.player1.cmp(&self.player2) {
            core::cmp::Ordering::Greater => Standing::Winner(Player::One),
            core::cmp::Ordering::Less => Standing::Winner(Player::Two),
            core::cmp::Ordering::Equal => Standing::Tie,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standing {
    Winner(Player),
    Tie,
}

/// Turn and score bookkeeping of a running match.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub mode: MatchMode,
    pub current_round: u8,
    pub current_player: Player,
    pub scores: Scores,
}

impl MatchState {
    pub const fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            current_round: 1,
            current_player: Player::One,
            scores: Scores {
                player1: 0,
                player2: 0,
            },
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// The placer fills the mine layout.
    Placing,
    /// The revealer opens cells on the board.
    Revealing,
    /// The board reached a terminal state and the score is recorded.
    Finished,
}

/// What the results screen shows after a round.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u8,
    pub placer: Player,
    pub revealer: Player,
    pub outcome: RoundOutcome,
    pub elapsed_seconds: u32,
    pub opened_count: CellCount,
    pub accuracy_pct: f64,
    pub score: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct ActiveMatch {
    state: MatchState,
    placer: Player,
    phase: RoundPhase,
    layout: MineLayout,
    board: Option<Board>,
    last_round: Option<RoundSummary>,
    timer: RoundTimer,
}

/// Drives a two-player match: placement, reveal, scoring and round changes.
///
/// Without a running match the controller sits at mode selection and every
/// round command fails with [`GameError::InvalidTransition`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchController {
    config: GameConfig,
    current: Option<ActiveMatch>,
}

impl MatchController {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Replaces the board configuration, used from the next placement phase on.
    pub fn set_config(&mut self, config: GameConfig) {
        if config != self.config {
            log::debug!("Board configuration changed to {:?}", config);
            self.config = config;
        }
    }

    pub fn start_match(&mut self, mode: MatchMode) {
        log::debug!("Match started in {:?} mode", mode);
        let mut active = ActiveMatch {
            state: MatchState::new(mode),
            placer: Player::One,
            phase: RoundPhase::Placing,
            layout: MineLayout::new(&self.config),
            board: None,
            last_round: None,
            timer: RoundTimer::default(),
        };
        active.enter_placement(&self.config);
        self.current = Some(active);
    }

    /// Returns to mode selection, discarding the running match.
    pub fn reset_match(&mut self) {
        if self.current.take().is_some() {
            log::debug!("Match reset");
        }
    }

    /// Restarts the placement of the current round with an empty layout.
    pub fn begin_placement_phase(&mut self) -> Result<()> {
        let config = self.config;
        let active = self.active_mut()?;
        active.check_phase(RoundPhase::Placing)?;
        active.enter_placement(&config);
        Ok(())
    }

    pub fn toggle_mine(&mut self, index: CellIndex) -> Result<Placement> {
        let active = self.active_mut()?;
        active.check_phase(RoundPhase::Placing)?;
        active.layout.toggle(index)
    }

    /// Hands the board to the other player once every mine is placed.
    pub fn begin_reveal_phase(&mut self) -> Result<()> {
        let active = self.active_mut()?;
        active.check_phase(RoundPhase::Placing)?;

        let board = Board::new(&active.layout)?;
        active.board = Some(board);
        active.phase = RoundPhase::Revealing;
        active.state.current_player = active.placer.other();
        active.timer.start();
        log::debug!(
            "Round {} reveal by {}",
            active.state.current_round,
            active.state.current_player
        );
        Ok(())
    }

    /// Opens a cell for the revealer, finishing the round when it ends the board.
    pub fn open_cell(&mut self, index: CellIndex) -> Result<OpenOutcome> {
        let active = self.active_mut()?;
        active.check_phase(RoundPhase::Revealing)?;

        let outcome = active.revealing_board_mut()?.open(index)?;
        if let Some(round_outcome) = outcome.round_outcome() {
            self.finish_round(round_outcome)?;
        }
        Ok(outcome)
    }

    /// Advances the round timer by one second while revealing.
    pub fn tick(&mut self) {
        if let Some(active) = self.current.as_mut() {
            active.timer.tick();
        }
    }

    /// Records the score of the revealing player and closes the round.
    ///
    /// A win has to match the board; a loss may also be declared on a board
    /// still in play, which forfeits the round.
    pub fn finish_round(&mut self, outcome: RoundOutcome) -> Result<RoundSummary> {
        let active = self.active_mut()?;
        active.check_phase(RoundPhase::Revealing)?;

        let board = active.board.as_ref().ok_or(GameError::InvalidTransition)?;
        if outcome == RoundOutcome::Won && !board.is_won() {
            return Err(GameError::InvalidTransition);
        }

        let elapsed_seconds = active.timer.elapsed_seconds();
        let opened_count = board.opened_count();
        let score = match outcome {
            RoundOutcome::Won => crate::score(
                elapsed_seconds,
                opened_count,
                board.total_cells(),
                board.mine_count(),
            )?,
            RoundOutcome::Lost => 0,
        };
        let accuracy_pct = accuracy_percent(opened_count, board.total_cells(), board.mine_count())?;

        let revealer = active.state.current_player;
        let summary = RoundSummary {
            round: active.state.current_round,
            placer: active.placer,
            revealer,
            outcome,
            elapsed_seconds,
            opened_count,
            accuracy_pct,
            score,
        };

        active.timer.stop();
        active.state.scores.add(revealer, score);
        active.phase = RoundPhase::Finished;
        active.last_round = Some(summary);
        log::debug!(
            "Round {} finished as {:?}, {} scored {}",
            summary.round,
            outcome,
            revealer,
            score
        );
        Ok(summary)
    }

    /// Moves a tournament from its first to its second round, swapping roles.
    ///
    /// Fails with [`GameError::InvalidTransition`] in classic mode, before the
    /// round is finished, or after the last round; the result is then
    /// available from [`Self::final_standing`].
    pub fn advance_round(&mut self) -> Result<()> {
        let config = self.config;
        let active = self.active_mut()?;
        active.check_phase(RoundPhase::Finished)?;

        if active.state.current_round >= active.state.mode.rounds() {
            log::debug!(
                "No rounds left, final standing: {:?}",
                active.state.scores.standing()
            );
            return Err(GameError::InvalidTransition);
        }

        active.state.current_round += 1;
        active.placer = active.placer.other();
        active.enter_placement(&config);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.current.as_ref().is_some_and(|active| {
            active.phase == RoundPhase::Finished
                && active.state.current_round >= active.state.mode.rounds()
        })
    }

    /// Final result once the last round of the match is finished.
    pub fn final_standing(&self) -> Option<Standing> {
        if self.is_complete() {
            self.state().map(|state| state.scores.standing())
        } else {
            None
        }
    }

    pub fn state(&self) -> Option<&MatchState> {
        self.current.as_ref().map(|active| &active.state)
    }

    pub fn mode(&self) -> Option<MatchMode> {
        self.state().map(|state| state.mode)
    }

    pub fn current_round(&self) -> Option<u8> {
        self.state().map(|state| state.current_round)
    }

    pub fn current_player(&self) -> Option<Player> {
        self.state().map(|state| state.current_player)
    }

    pub fn scores(&self) -> Scores {
        self.state().map(|state| state.scores).unwrap_or_default()
    }

    pub fn phase(&self) -> Option<RoundPhase> {
        self.current.as_ref().map(|active| active.phase)
    }

    pub fn placer(&self) -> Option<Player> {
        self.current.as_ref().map(|active| active.placer)
    }

    pub fn layout(&self) -> Option<&MineLayout> {
        self.current.as_ref().map(|active| &active.layout)
    }

    /// Mines the placer still has to lay, while placing.
    pub fn remaining_capacity(&self) -> Option<CellCount> {
        self.current
            .as_ref()
            .filter(|active| active.phase == RoundPhase::Placing)
            .map(|active| active.layout.remaining_capacity())
    }

    /// The board of the round being revealed or just finished.
    pub fn board(&self) -> Option<&Board> {
        self.current.as_ref().and_then(|active| active.board.as_ref())
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.current
            .as_ref()
            .map(|active| active.timer.elapsed_seconds())
            .unwrap_or(0)
    }

    pub fn last_round(&self) -> Option<&RoundSummary> {
        self.current
            .as_ref()
            .and_then(|active| active.last_round.as_ref())
    }

    fn active_mut(&mut self) -> Result<&mut ActiveMatch> {
        self.current.as_mut().ok_or(GameError::InvalidTransition)
    }
}

impl Default for MatchController {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl ActiveMatch {
    fn enter_placement(&mut self, config: &GameConfig) {
        self.state.current_player = self.placer;
        self.phase = RoundPhase::Placing;
        self.layout = MineLayout::new(config);
        self.board = None;
        self.timer.stop();
        log::debug!(
            "Round {} placement by {}",
            self.state.current_round,
            self.placer
        );
    }

    fn check_phase(&self, expected: RoundPhase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidTransition)
        }
    }

    fn revealing_board_mut(&mut self) -> Result<&mut Board> {
        self.board.as_mut().ok_or(GameError::InvalidTransition)
    }
}
