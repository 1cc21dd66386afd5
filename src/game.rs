//! Game state: board, explosion engine, turn order, win detection, reset.

use crate::board::{Board, PlayerId, Position};
use crate::engine::{ExplosionEngine, StepOutcome};
use crate::event::{GameEvent, RejectReason, WinKind};
use std::collections::BTreeSet;
use thiserror::Error;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("player count must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {0}")]
    InvalidPlayerCount(usize),
}

/// Outcome of a cell activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Rejected(RejectReason),
    /// Orb placed; the cell stayed below critical mass.
    Placed,
    /// Orb placed and the cell went critical; the chain drains over the following ticks.
    ChainStarted,
}

impl MoveResult {
    pub fn accepted(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Win {
    pub winner: PlayerId,
    pub kind: WinKind,
}

/// How a game session ended, as seen by the front end. Quit is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Winner(PlayerId),
    Reset,
    Close,
}

/// What one scheduling tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No chain running.
    Idle,
    /// One explosion step; the chain continues.
    Stepped,
    /// The chain drained and the win check ran.
    ChainCompleted(Option<Win>),
    /// A deferred reset was honoured when the chain drained.
    Reset,
}

/// Whole game aggregate. Owns every piece of mutable game state.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    engine: ExplosionEngine,
    num_players: usize,
    current_player: PlayerId,
    move_count: u32,
    game_started: bool,
    players_who_have_moved: BTreeSet<PlayerId>,
    /// Written by the renderer while its animation list is non-empty.
    animating: bool,
    /// Latched once a win is detected; cleared only by reset.
    winner: Option<Win>,
    reset_pending: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(num_players: usize) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(GameError::InvalidPlayerCount(num_players));
        }
        Ok(Self {
            board: Board::new(),
            engine: ExplosionEngine::new(),
            num_players,
            current_player: 0,
            move_count: 0,
            game_started: false,
            players_who_have_moved: BTreeSet::new(),
            animating: false,
            winner: None,
            reset_pending: false,
            events: Vec::new(),
        })
    }

    /// Rebuild the board and clear every counter and transient flag.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.engine = ExplosionEngine::new();
        self.current_player = 0;
        self.move_count = 0;
        self.game_started = false;
        self.players_who_have_moved.clear();
        self.animating = false;
        self.winner = None;
        self.reset_pending = false;
        self.record(GameEvent::GameReset);
    }

    /// Reset now when idle; otherwise defer until the running chain drains.
    /// Returns true if the reset happened immediately.
    pub fn request_reset(&mut self) -> bool {
        if self.engine.is_idle() {
            self.reset();
            true
        } else {
            log::debug!("reset deferred until chain completes");
            self.reset_pending = true;
            false
        }
    }

    // --- read-only view for the renderer ---

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn game_started(&self) -> bool {
        self.game_started
    }

    pub fn players_who_have_moved(&self) -> &BTreeSet<PlayerId> {
        &self.players_who_have_moved
    }

    pub fn is_processing(&self) -> bool {
        self.engine.is_processing()
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn engine(&self) -> &ExplosionEngine {
        &self.engine
    }

    pub fn winner(&self) -> Option<Win> {
        self.winner
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Hover is a renderer concern; game logic never reads it.
    pub fn set_hover(&mut self, pos: Option<Position>) {
        self.board.set_hover(pos);
    }

    pub fn set_animating(&mut self, animating: bool) {
        self.animating = animating;
    }

    /// Take every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn record(&mut self, event: GameEvent) {
        event.log();
        self.events.push(event);
    }

    /// Validate a move for the current player and apply it.
    ///
    /// Rejections leave the state untouched. On acceptance the turn always passes to the next
    /// player, whether or not a chain started.
    pub fn validate_and_apply_move(&mut self, pos: Position) -> MoveResult {
        let player = self.current_player;
        self.record(GameEvent::MoveAttempted { player, pos });

        let reject = if self.animating || self.engine.is_processing() {
            Some(RejectReason::Busy)
        } else if self.winner.is_some() {
            Some(RejectReason::GameOver)
        } else if !self.board.in_bounds(pos) {
            Some(RejectReason::OutOfBounds)
        } else if self.board.cell(pos).owner().is_some_and(|o| o != player) {
            Some(RejectReason::OpponentCell)
        } else {
            None
        };
        if let Some(reason) = reject {
            self.record(GameEvent::MoveRejected {
                player,
                pos,
                reason,
            });
            return MoveResult::Rejected(reason);
        }

        self.game_started = true;
        self.players_who_have_moved.insert(player);
        self.move_count += 1;
        let cell = self.board.cell_mut(pos);
        let critical = cell.add_orb(player);
        let orbs_after = cell.orb_count();
        self.record(GameEvent::MoveAccepted {
            player,
            pos,
            orbs_after,
        });

        let result = if critical {
            self.engine.start_chain(pos, player);
            self.record(GameEvent::ChainStarted { pos });
            MoveResult::ChainStarted
        } else {
            MoveResult::Placed
        };
        self.current_player = (self.current_player + 1) % self.num_players;
        result
    }

    /// Input entry point: apply the move and, when no chain started, run the win check now.
    pub fn cell_activated(&mut self, pos: Position) -> MoveResult {
        let result = self.validate_and_apply_move(pos);
        if result == MoveResult::Placed {
            self.latch_winner();
        }
        result
    }

    /// Win check on a settled board. Elimination is tried before domination.
    pub fn evaluate_win_condition(&self) -> Option<Win> {
        if !self.game_started || self.players_who_have_moved.len() < self.num_players {
            return None;
        }

        let mut with_orbs = (0..self.num_players).filter(|&p| self.board.has_orbs(p));
        if let (Some(only), None) = (with_orbs.next(), with_orbs.next()) {
            if self.board.total_orbs() > 0 {
                return Some(Win {
                    winner: only,
                    kind: WinKind::Elimination,
                });
            }
        }

        self.board.sole_owner().map(|winner| Win {
            winner,
            kind: WinKind::Domination,
        })
    }

    fn latch_winner(&mut self) -> Option<Win> {
        if self.winner.is_none() {
            if let Some(win) = self.evaluate_win_condition() {
                self.winner = Some(win);
                self.record(GameEvent::WinDetected {
                    winner: win.winner,
                    kind: win.kind,
                });
            }
        }
        self.winner
    }

    /// One scheduling tick: at most one explosion step, then the post-chain win check or a
    /// deferred reset once the queue has drained.
    pub fn tick(&mut self) -> TickOutcome {
        if self.engine.is_idle() {
            return TickOutcome::Idle;
        }
        let first_new = self.events.len();
        let outcome = self.engine.step_once(&mut self.board, &mut self.events);
        self.events[first_new..].iter().for_each(GameEvent::log);

        match outcome {
            StepOutcome::Idle => TickOutcome::Idle,
            StepOutcome::Stepped => TickOutcome::Stepped,
            StepOutcome::Completed { .. } if self.reset_pending => {
                self.reset();
                TickOutcome::Reset
            }
            StepOutcome::Completed { .. } => TickOutcome::ChainCompleted(self.latch_winner()),
        }
    }

    /// Drive the running chain to completion. Returns the number of ticks it took.
    #[cfg(test)]
    pub(crate) fn run_chain(&mut self) -> usize {
        let mut ticks = 0;
        while self.engine.is_processing() {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn player_count_is_validated() {
        assert_eq!(GameState::new(1).unwrap_err(), GameError::InvalidPlayerCount(1));
        assert_eq!(GameState::new(5).unwrap_err(), GameError::InvalidPlayerCount(5));
        for n in MIN_PLAYERS..=MAX_PLAYERS {
            assert_eq!(GameState::new(n).unwrap().num_players(), n);
        }
    }

    #[test]
    fn turn_cycles_on_accepted_moves_only() {
        let mut game = GameState::new(3).unwrap();
        assert_eq!(game.cell_activated(pos(2, 2)), MoveResult::Placed);
        assert_eq!(game.current_player(), 1);
        // player 1 may not touch player 0's cell
        assert_eq!(
            game.cell_activated(pos(2, 2)),
            MoveResult::Rejected(RejectReason::OpponentCell)
        );
        assert_eq!(game.current_player(), 1);
        assert_eq!(
            game.cell_activated(pos(9, 0)),
            MoveResult::Rejected(RejectReason::OutOfBounds)
        );
        assert_eq!(game.current_player(), 1);
        game.cell_activated(pos(3, 3));
        assert_eq!(game.current_player(), 2);
        game.cell_activated(pos(4, 4));
        assert_eq!(game.current_player(), 0);
        assert_eq!(game.move_count(), 3);
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut game = GameState::new(2).unwrap();
        game.cell_activated(pos(1, 1));
        let board_before = game.board().clone();
        let result = game.cell_activated(pos(1, 1));
        assert!(!result.accepted());
        assert_eq!(game.board(), &board_before);
        assert_eq!(game.move_count(), 1);
        assert_eq!(game.players_who_have_moved().len(), 1);
    }

    #[test]
    fn moves_rejected_while_busy() {
        let mut game = GameState::new(2).unwrap();
        game.set_animating(true);
        assert_eq!(
            game.cell_activated(pos(0, 0)),
            MoveResult::Rejected(RejectReason::Busy)
        );
        assert!(!game.game_started());
        assert_eq!(game.current_player(), 0);
        assert_eq!(game.move_count(), 0);
        game.set_animating(false);

        game.cell_activated(pos(0, 0));
        game.cell_activated(pos(5, 5));
        assert_eq!(game.cell_activated(pos(0, 0)), MoveResult::ChainStarted);
        assert!(game.is_processing());
        let (player, moves) = (game.current_player(), game.move_count());
        assert_eq!(
            game.cell_activated(pos(3, 3)),
            MoveResult::Rejected(RejectReason::Busy)
        );
        assert_eq!(game.current_player(), player);
        assert_eq!(game.move_count(), moves);
        assert!(game.board().cell(pos(3, 3)).is_empty());
    }

    #[test]
    fn no_win_before_game_starts() {
        let game = GameState::new(2).unwrap();
        assert!(!game.game_started());
        assert_eq!(game.evaluate_win_condition(), None);
    }

    #[test]
    fn no_win_until_every_player_has_moved() {
        let mut game = GameState::new(2).unwrap();
        game.cell_activated(pos(0, 0));
        // only player 0 holds orbs, but player 1 never moved
        assert_eq!(game.evaluate_win_condition(), None);
        assert_eq!(game.winner(), None);

        let mut game = GameState::new(4).unwrap();
        game.cell_activated(pos(0, 0));
        game.cell_activated(pos(1, 1));
        game.cell_activated(pos(2, 2));
        assert_eq!(game.evaluate_win_condition(), None);
    }

    #[test]
    fn corner_chain_end_to_end() {
        let mut game = GameState::new(2).unwrap();
        assert_eq!(game.cell_activated(pos(0, 0)), MoveResult::Placed);
        let corner = game.board().cell(pos(0, 0));
        assert_eq!((corner.orb_count(), corner.owner()), (1, Some(0)));
        assert_eq!(game.current_player(), 1);

        assert_eq!(game.cell_activated(pos(3, 3)), MoveResult::Placed);
        assert_eq!(game.cell_activated(pos(0, 0)), MoveResult::ChainStarted);
        assert_eq!(game.current_player(), 1);
        assert!(game.is_processing());

        let outcome = game.tick();
        assert_eq!(outcome, TickOutcome::ChainCompleted(None));
        assert!(!game.is_processing());
        assert!(game.board().cell(pos(0, 0)).is_empty());
        assert_eq!(game.board().cell(pos(0, 1)).orbs(), &[0]);
        assert_eq!(game.board().cell(pos(1, 0)).orbs(), &[0]);
        assert_eq!(game.tick(), TickOutcome::Idle);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::ChainStarted { pos: pos(0, 0) }));
        assert!(events.contains(&GameEvent::ChainCompleted { explosions: 1 }));
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn win_is_only_checked_once_the_chain_drains() {
        let mut game = GameState::new(2).unwrap();
        game.cell_activated(pos(0, 0));
        game.cell_activated(pos(0, 2));
        game.cell_activated(pos(0, 1));
        game.cell_activated(pos(0, 2));
        game.board_mut().cell_mut(pos(0, 1)).add_orb(0);
        assert_eq!(game.cell_activated(pos(0, 0)), MoveResult::ChainStarted);

        assert_eq!(game.tick(), TickOutcome::Stepped);
        assert_eq!(game.winner(), None);
        assert!(game.board().cell(pos(0, 1)).is_critical());

        let win = Win {
            winner: 0,
            kind: WinKind::Elimination,
        };
        assert_eq!(game.tick(), TickOutcome::ChainCompleted(Some(win)));
        assert_eq!(game.winner(), Some(win));
        assert_eq!(game.board().cell(pos(0, 2)).owner(), Some(0));
    }

    #[test]
    fn capture_eliminates_opponent() {
        let mut game = GameState::new(2).unwrap();
        game.cell_activated(pos(0, 0));
        game.cell_activated(pos(0, 1));
        assert_eq!(game.cell_activated(pos(0, 0)), MoveResult::ChainStarted);
        let win = Win {
            winner: 0,
            kind: WinKind::Elimination,
        };
        assert_eq!(game.tick(), TickOutcome::ChainCompleted(Some(win)));
        assert_eq!(game.winner(), Some(win));
        assert_eq!(game.board().cell(pos(0, 1)).orbs(), &[0, 0]);
        assert_eq!(
            game.cell_activated(pos(4, 4)),
            MoveResult::Rejected(RejectReason::GameOver)
        );
        assert!(game.drain_events().contains(&GameEvent::WinDetected {
            winner: 0,
            kind: WinKind::Elimination,
        }));
    }

    #[test]
    fn full_board_of_one_player_wins() {
        let mut game = GameState::new(3).unwrap();
        game.cell_activated(pos(0, 0));
        game.cell_activated(pos(2, 2));
        game.cell_activated(pos(4, 4));
        let size = game.board().size();
        *game.board_mut() = Board::new();
        for row in 0..size {
            for col in 0..size {
                game.board_mut().cell_mut(pos(row, col)).add_orb(0);
            }
        }
        let win = game.evaluate_win_condition().unwrap();
        assert_eq!(win.winner, 0);
        assert_eq!(win.kind, WinKind::Elimination);
    }

    #[test]
    fn two_players_with_orbs_means_no_win() {
        let mut game = GameState::new(2).unwrap();
        game.cell_activated(pos(0, 0));
        game.cell_activated(pos(5, 5));
        assert_eq!(game.evaluate_win_condition(), None);
    }

    #[test]
    fn reset_when_idle_is_immediate() {
        let mut game = GameState::new(2).unwrap();
        game.cell_activated(pos(1, 1));
        game.cell_activated(pos(2, 2));
        assert!(game.request_reset());
        assert_eq!(game.board().total_orbs(), 0);
        assert_eq!(game.current_player(), 0);
        assert_eq!(game.move_count(), 0);
        assert!(!game.game_started());
        assert!(game.players_who_have_moved().is_empty());
        assert!(game.drain_events().contains(&GameEvent::GameReset));
    }

    #[test]
    fn reset_mid_chain_waits_for_drain() {
        let mut game = GameState::new(2).unwrap();
        // Row 0: (0,0)=1, (0,1)=2, (0,2)=2 for player 0; player 1 far away.
        game.cell_activated(pos(0, 0));
        game.cell_activated(pos(5, 5));
        game.cell_activated(pos(0, 1));
        game.cell_activated(pos(5, 4));
        game.cell_activated(pos(0, 1));
        game.cell_activated(pos(4, 5));
        game.cell_activated(pos(0, 2));
        game.cell_activated(pos(4, 4));
        game.cell_activated(pos(0, 2));
        game.cell_activated(pos(3, 5));
        assert_eq!(game.cell_activated(pos(0, 0)), MoveResult::ChainStarted);

        assert!(!game.request_reset());
        assert!(game.reset_pending());
        assert_eq!(game.tick(), TickOutcome::Stepped);
        assert!(game.board().total_orbs() > 0);

        let mut last = TickOutcome::Stepped;
        while game.is_processing() {
            last = game.tick();
        }
        assert_eq!(last, TickOutcome::Reset);
        assert_eq!(game.board().total_orbs(), 0);
        assert!(!game.reset_pending());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn run_chain_drains_and_clears_processing() {
        let mut game = GameState::new(2).unwrap();
        game.cell_activated(pos(5, 0));
        game.cell_activated(pos(2, 2));
        game.cell_activated(pos(5, 0));
        let ticks = game.run_chain();
        assert!(ticks >= 1);
        assert!(!game.is_processing());
        assert_eq!(game.engine().pending_len(), 0);
    }
}
