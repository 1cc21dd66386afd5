//! Structured game events: recorded by the core, forwarded to `log`, drained by the renderer.

use crate::board::{PlayerId, Position};

/// Why a move was refused. Refusals are normal gameplay, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// An explosion chain or animation is still running.
    Busy,
    OutOfBounds,
    /// Target cell holds another player's orbs.
    OpponentCell,
    /// A winner has already been decided.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinKind {
    /// Only one player still has orbs.
    Elimination,
    /// One player owns every occupied cell.
    Domination,
}

/// Orb count of one neighbour before and after it received an orb from an explosion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spill {
    pub to: Position,
    pub previous_owner: Option<PlayerId>,
    pub orbs_before: usize,
    pub orbs_after: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    MoveAttempted {
        player: PlayerId,
        pos: Position,
    },
    MoveAccepted {
        player: PlayerId,
        pos: Position,
        orbs_after: usize,
    },
    MoveRejected {
        player: PlayerId,
        pos: Position,
        reason: RejectReason,
    },
    ChainStarted {
        pos: Position,
    },
    CellExploded {
        pos: Position,
        owner: PlayerId,
        orbs_before: usize,
        spills: Vec<Spill>,
    },
    ChainStepped {
        queued: usize,
    },
    ChainCompleted {
        explosions: usize,
    },
    WinDetected {
        winner: PlayerId,
        kind: WinKind,
    },
    GameReset,
}

impl GameEvent {
    /// Forward to the `log` facade. Per-step noise goes to debug/trace, outcomes to info.
    pub fn log(&self) {
        match self {
            Self::MoveAttempted { player, pos } => {
                log::trace!("player {player} attempts {pos}");
            }
            Self::MoveAccepted {
                player,
                pos,
                orbs_after,
            } => log::debug!("player {player} placed at {pos} ({orbs_after} orbs)"),
            Self::MoveRejected {
                player,
                pos,
                reason,
            } => log::debug!("player {player} move at {pos} rejected: {reason:?}"),
            Self::ChainStarted { pos } => log::debug!("chain started at {pos}"),
            Self::CellExploded {
                pos,
                owner,
                orbs_before,
                spills,
            } => {
                log::debug!(
                    "{pos} exploded for player {owner}: {orbs_before} -> 0, {} spills",
                    spills.len()
                );
                for s in spills {
                    log::trace!(
                        "  {} {:?}: {} -> {}",
                        s.to,
                        s.previous_owner,
                        s.orbs_before,
                        s.orbs_after
                    );
                }
            }
            Self::ChainStepped { queued } => log::trace!("chain step, {queued} queued"),
            Self::ChainCompleted { explosions } => {
                log::debug!("chain completed after {explosions} explosions");
            }
            Self::WinDetected { winner, kind } => {
                log::info!("player {winner} wins by {kind:?}");
            }
            Self::GameReset => log::info!("game reset"),
        }
    }
}
