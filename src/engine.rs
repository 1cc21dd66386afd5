//! Explosion engine: iterative chain reaction, one explosion per tick.
//!
//! States: Idle (nothing queued), Queued (initial cell pushed), Draining (consuming the queue).
//! The queue is FIFO and never holds the same position twice.

use crate::board::{Board, PlayerId, Position};
use crate::event::{GameEvent, Spill};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Queued,
    Draining,
}

/// Result of one `step_once` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Called while Idle; nothing happened.
    Idle,
    /// One queued position was processed; more remain.
    Stepped,
    /// The queue drained on this step and the engine returned to Idle.
    Completed { explosions: usize },
}

#[derive(Debug, Clone, Default)]
pub struct ExplosionEngine {
    queue: VecDeque<Position>,
    processing: bool,
    /// Set once the first queued position has been popped.
    draining: bool,
    /// Explosions performed in the running chain.
    explosions: usize,
    /// Player whose move started the running chain.
    chain_owner: Option<PlayerId>,
}

impl ExplosionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EngineState {
        match (self.processing, self.draining) {
            (false, _) => EngineState::Idle,
            (true, false) => EngineState::Queued,
            (true, true) => EngineState::Draining,
        }
    }

    #[inline]
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.processing
    }

    /// Positions waiting to explode, front first.
    pub fn pending(&self) -> impl Iterator<Item = Position> + '_ {
        self.queue.iter().copied()
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_queued(&self, pos: Position) -> bool {
        self.queue.contains(&pos)
    }

    /// Begin a chain at a cell that just reached critical mass. Idle → Queued.
    pub fn start_chain(&mut self, pos: Position, owner: PlayerId) {
        debug_assert!(self.is_idle(), "start_chain on a busy engine");
        debug_assert!(self.queue.is_empty());
        self.queue.clear();
        self.queue.push_back(pos);
        self.processing = true;
        self.draining = false;
        self.explosions = 0;
        self.chain_owner = Some(owner);
    }

    /// Process exactly one queued position.
    ///
    /// The popped cell is re-checked against its critical mass; a cell that is no longer
    /// critical is skipped silently. Neighbours that become critical are appended unless already
    /// queued. Once the chain owner holds every occupied cell the chain settles: the rest of the
    /// queue is dropped, since further explosions can only shuffle that player's own orbs and
    /// a saturated one-owner board would otherwise never drain.
    pub fn step_once(&mut self, board: &mut Board, events: &mut Vec<GameEvent>) -> StepOutcome {
        debug_assert!(self.processing, "step_once on an idle engine");
        if !self.processing {
            return StepOutcome::Idle;
        }
        self.draining = true;

        if let Some(pos) = self.queue.pop_front() {
            let cell = board.cell_mut(pos);
            if let (true, Some(owner)) = (cell.is_critical(), cell.owner()) {
                let orbs_before = cell.orb_count();
                let raw = cell.explode();
                self.explosions += 1;

                let targets: Vec<Position> = raw.into_iter().filter_map(|r| board.clip(r)).collect();
                let mut spills = Vec::with_capacity(targets.len());
                for to in targets {
                    let target = board.cell_mut(to);
                    let previous_owner = target.owner();
                    let orbs_before = target.orb_count();
                    let critical = target.add_orb(owner);
                    spills.push(Spill {
                        to,
                        previous_owner,
                        orbs_before,
                        orbs_after: target.orb_count(),
                    });
                    if critical && !self.queue.contains(&to) {
                        self.queue.push_back(to);
                    }
                }
                events.push(GameEvent::CellExploded {
                    pos,
                    owner,
                    orbs_before,
                    spills,
                });

                if self.chain_owner == Some(owner) && board.sole_owner() == Some(owner) {
                    self.queue.clear();
                }
            }
        }

        if self.queue.is_empty() {
            let explosions = self.explosions;
            self.processing = false;
            self.draining = false;
            self.chain_owner = None;
            self.explosions = 0;
            events.push(GameEvent::ChainCompleted { explosions });
            StepOutcome::Completed { explosions }
        } else {
            events.push(GameEvent::ChainStepped {
                queued: self.queue.len(),
            });
            StepOutcome::Stepped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::critical_mass_for;

    fn fill(board: &mut Board, pos: Position, player: PlayerId, n: usize) {
        for _ in 0..n {
            board.cell_mut(pos).add_orb(player);
        }
    }

    fn drain(engine: &mut ExplosionEngine, board: &mut Board, events: &mut Vec<GameEvent>) -> usize {
        let mut steps = 0;
        while engine.is_processing() {
            engine.step_once(board, events);
            steps += 1;
            assert!(steps < 10_000, "chain did not terminate");
        }
        steps
    }

    #[test]
    fn state_transitions() {
        let mut board = Board::new();
        let mut events = Vec::new();
        let mut engine = ExplosionEngine::new();
        assert_eq!(engine.state(), EngineState::Idle);

        fill(&mut board, Position::new(0, 0), 0, 2);
        engine.start_chain(Position::new(0, 0), 0);
        assert_eq!(engine.state(), EngineState::Queued);
        assert!(engine.is_queued(Position::new(0, 0)));

        let outcome = engine.step_once(&mut board, &mut events);
        assert_eq!(outcome, StepOutcome::Completed { explosions: 1 });
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.pending_len(), 0);
    }

    #[test]
    fn corner_explosion_spills_to_two_neighbours() {
        let mut board = Board::new();
        let mut events = Vec::new();
        let mut engine = ExplosionEngine::new();
        board.cell_mut(Position::new(3, 3)).add_orb(1);
        fill(&mut board, Position::new(0, 1), 1, 1);
        fill(&mut board, Position::new(0, 0), 0, 2);

        engine.start_chain(Position::new(0, 0), 0);
        drain(&mut engine, &mut board, &mut events);

        assert!(board.cell(Position::new(0, 0)).is_empty());
        let right = board.cell(Position::new(0, 1));
        assert_eq!(right.orbs(), &[0, 0]);
        let down = board.cell(Position::new(1, 0));
        assert_eq!(down.orbs(), &[0]);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::CellExploded { pos, owner: 0, orbs_before: 2, spills }
                if *pos == Position::new(0, 0) && spills.len() == 2
        )));
    }

    #[test]
    fn one_explosion_per_step() {
        let mut board = Board::new();
        let mut events = Vec::new();
        let mut engine = ExplosionEngine::new();
        board.cell_mut(Position::new(5, 5)).add_orb(1);
        // (0,0) at 2 triggers (0,1) at 3 which triggers (0,2) at 3
        fill(&mut board, Position::new(0, 0), 0, 2);
        fill(&mut board, Position::new(0, 1), 0, 2);
        fill(&mut board, Position::new(0, 2), 0, 2);

        engine.start_chain(Position::new(0, 0), 0);
        assert_eq!(engine.step_once(&mut board, &mut events), StepOutcome::Stepped);
        let exploded = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CellExploded { .. }))
            .count();
        assert_eq!(exploded, 1);
        assert_eq!(engine.pending().collect::<Vec<_>>(), vec![Position::new(0, 1)]);
        assert_eq!(engine.state(), EngineState::Draining);
    }

    #[test]
    fn queue_never_holds_duplicates() {
        let mut board = Board::new();
        let mut events = Vec::new();
        let mut engine = ExplosionEngine::new();
        board.cell_mut(Position::new(5, 5)).add_orb(1);
        // (1,1) is fed by both (0,1) and (1,0)
        fill(&mut board, Position::new(0, 0), 0, 2);
        fill(&mut board, Position::new(0, 1), 0, 2);
        fill(&mut board, Position::new(1, 0), 0, 2);
        fill(&mut board, Position::new(1, 1), 0, 3);

        engine.start_chain(Position::new(0, 0), 0);
        while engine.is_processing() {
            let pending: Vec<_> = engine.pending().collect();
            let mut dedup = pending.clone();
            dedup.sort();
            dedup.dedup();
            assert_eq!(pending.len(), dedup.len());
            engine.step_once(&mut board, &mut events);
        }
    }

    #[test]
    fn stale_queue_entry_is_skipped() {
        let mut board = Board::new();
        let mut events = Vec::new();
        let mut engine = ExplosionEngine::new();
        board.cell_mut(Position::new(4, 4)).add_orb(1);
        engine.start_chain(Position::new(2, 2), 0);
        // (2,2) is empty: popping it is a no-op that still completes the chain
        let outcome = engine.step_once(&mut board, &mut events);
        assert_eq!(outcome, StepOutcome::Completed { explosions: 0 });
        assert_eq!(board.total_orbs(), 1);
    }

    #[test]
    fn saturated_board_terminates() {
        for n in [3, 4, 6, 8] {
            let mut board = Board::with_size(n);
            let mut events = Vec::new();
            let mut engine = ExplosionEngine::new();
            for row in 0..n {
                for col in 0..n {
                    let pos = Position::new(row, col);
                    let player = usize::from(row == n - 1 && col == n - 1);
                    fill(&mut board, pos, player, critical_mass_for(pos, n) - 1);
                }
            }
            board.cell_mut(Position::new(0, 0)).add_orb(0);
            engine.start_chain(Position::new(0, 0), 0);
            let steps = drain(&mut engine, &mut board, &mut events);
            assert!(steps > 1);
            assert!(engine.is_idle());
            assert!(!board.has_orbs(1));
        }
    }

    #[test]
    fn fully_critical_one_owner_board_terminates() {
        let mut board = Board::new();
        let mut events = Vec::new();
        let mut engine = ExplosionEngine::new();
        for row in 0..6 {
            for col in 0..6 {
                let pos = Position::new(row, col);
                fill(&mut board, pos, 0, critical_mass_for(pos, 6));
            }
        }
        engine.start_chain(Position::new(0, 0), 0);
        drain(&mut engine, &mut board, &mut events);
        assert!(engine.is_idle());
        assert_eq!(board.sole_owner(), Some(0));
    }
}
