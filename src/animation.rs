//! Explosion and orb-flight animations, built only from drained game events.
//!
//! This is renderer-owned visual state; game logic never reads it. The app feeds
//! `is_active()` back into `GameState::set_animating` so moves wait for the visuals.

use crate::board::{PlayerId, Position};
use crate::event::GameEvent;
use std::collections::HashMap;

/// Explosion burst lifetime in seconds (before speed scaling).
pub const EXPLOSION_SECS: f32 = 0.5;
/// Orb flight from an exploding cell to a neighbour, in seconds.
pub const ORB_FLIGHT_SECS: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Explosion { at: Position },
    OrbFlight { from: Position, to: Position },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub kind: AnimationKind,
    pub player: PlayerId,
    elapsed: f32,
    duration: f32,
}

impl Animation {
    fn new(kind: AnimationKind, player: PlayerId, duration: f32) -> Self {
        Self {
            kind,
            player,
            elapsed: 0.0,
            duration,
        }
    }

    /// Linear progress 0.0..=1.0.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    /// Ease-out quadratic, used for orb flights.
    pub fn eased(&self) -> f32 {
        let p = self.progress();
        1.0 - (1.0 - p) * (1.0 - p)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// What the renderer should show on top of a cell right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellFx {
    Exploding { player: PlayerId, progress: f32 },
    /// An orb is in flight towards this cell.
    Incoming { player: PlayerId },
}

#[derive(Debug, Clone)]
pub struct Animations {
    list: Vec<Animation>,
    /// Multiplier on elapsed time; 2.0 plays twice as fast.
    speed: f32,
    enabled: bool,
}

impl Animations {
    pub fn new(speed: f32, enabled: bool) -> Self {
        Self {
            list: Vec::new(),
            speed: speed.max(0.01),
            enabled,
        }
    }

    /// Turn one game event into animations. Returns the exploded cell for a new burst,
    /// so the caller can attach a screen effect to it.
    pub fn observe(&mut self, event: &GameEvent) -> Option<(Position, PlayerId)> {
        match event {
            GameEvent::GameReset => {
                self.list.clear();
                None
            }
            GameEvent::CellExploded {
                pos, owner, spills, ..
            } if self.enabled => {
                self.list.push(Animation::new(
                    AnimationKind::Explosion { at: *pos },
                    *owner,
                    EXPLOSION_SECS,
                ));
                for spill in spills {
                    self.list.push(Animation::new(
                        AnimationKind::OrbFlight {
                            from: *pos,
                            to: spill.to,
                        },
                        *owner,
                        ORB_FLIGHT_SECS,
                    ));
                }
                Some((*pos, *owner))
            }
            _ => None,
        }
    }

    /// Advance every animation by `dt` seconds and drop finished ones.
    pub fn update(&mut self, dt: f32) {
        let dt = dt * self.speed;
        self.list.retain_mut(|a| {
            a.elapsed += dt;
            !a.is_finished()
        });
    }

    pub fn is_active(&self) -> bool {
        !self.list.is_empty()
    }

    pub fn orb_flights(&self) -> impl Iterator<Item = (Position, Position, PlayerId, f32)> + '_ {
        self.list.iter().filter_map(|a| match a.kind {
            AnimationKind::OrbFlight { from, to } => Some((from, to, a.player, a.eased())),
            AnimationKind::Explosion { .. } => None,
        })
    }

    /// Current visual state per position. Explosions win over incoming orbs.
    pub fn cell_states(&self) -> HashMap<Position, CellFx> {
        let mut map = HashMap::new();
        for a in &self.list {
            match a.kind {
                AnimationKind::Explosion { at } => {
                    map.insert(
                        at,
                        CellFx::Exploding {
                            player: a.player,
                            progress: a.progress(),
                        },
                    );
                }
                AnimationKind::OrbFlight { to, .. } => {
                    map.entry(to)
                        .or_insert(CellFx::Incoming { player: a.player });
                }
            }
        }
        map
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}
