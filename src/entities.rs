//! All game entity types and the behaviour shared by every body.
//!
//! Kind-specific rules (player movement, enemy contact, projectile hits) live
//! in `compute`; this module only knows how a body moves, dies, and draws.

use glam::Vec2;

use crate::consts::*;
use crate::controller::Controller;
use crate::display::{DrawSurface, Shade};

/// Process-unique body identity. Allocated by the registry, never reused.
pub type BodyId = u64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerState {
    /// Snapshot for the current tick
    pub controller: Controller,
    /// Seconds survived
    pub time_alive: f32,
    /// Movement speed (units/s)
    pub speed: f32,
    /// Seconds until the next shot is allowed; may go negative while idle
    pub cooldown: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            controller: Controller::default(),
            time_alive: 0.0,
            speed: PLAYER_SPEED,
            cooldown: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BodyKind {
    Player(PlayerState),
    Enemy,
    Projectile,
}

impl BodyKind {
    pub fn is_enemy(&self) -> bool {
        matches!(self, BodyKind::Enemy)
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self, BodyKind::Projectile)
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub id: BodyId,
    /// Top-left corner for collision purposes
    pub position: Vec2,
    /// Units per second
    pub velocity: Vec2,
    /// Width and height
    pub size: Vec2,
    pub health: i32,
    pub kind: BodyKind,
}

impl Body {
    /// A body at rest with default size and health.
    pub fn new(id: BodyId, kind: BodyKind, position: Vec2) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            size: Vec2::splat(BODY_SIZE),
            health: DEFAULT_HEALTH,
            kind,
        }
    }

    /// The player at its spawn point near the bottom centre of the viewport.
    pub fn player(id: BodyId, width: f32, height: f32) -> Self {
        Self::new(
            id,
            BodyKind::Player(PlayerState::default()),
            Vec2::new(width / 2.0, height - PLAYER_SPAWN_BOTTOM_OFFSET),
        )
    }

    /// An enemy just above the top edge at column `x`, falling.
    pub fn enemy(id: BodyId, x: f32) -> Self {
        Self {
            velocity: Vec2::new(0.0, ENEMY_SPEED),
            ..Self::new(id, BodyKind::Enemy, Vec2::new(x, ENEMY_SPAWN_Y))
        }
    }

    /// A projectile leaving `origin`, travelling up.
    pub fn projectile(id: BodyId, origin: Vec2) -> Self {
        Self {
            velocity: Vec2::new(0.0, -PROJECTILE_SPEED),
            ..Self::new(id, BodyKind::Projectile, origin)
        }
    }

    pub fn half_size(&self) -> Vec2 {
        self.size / 2.0
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Linear integration; no clamping at this level.
    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        match &self.kind {
            BodyKind::Player(state) => Some(state),
            _ => None,
        }
    }

    pub fn player_state_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.kind {
            BodyKind::Player(state) => Some(state),
            _ => None,
        }
    }

    /// Draw the body's silhouette followed by a velocity hint line a tenth of
    /// the velocity long.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) -> std::io::Result<()> {
        let shade = match self.kind {
            BodyKind::Player(_) => Shade::Player,
            BodyKind::Enemy => Shade::Enemy,
            BodyKind::Projectile => Shade::Projectile,
        };
        surface.triangle(self.position, self.half_size(), shade)?;
        surface.line(self.position, self.position + self.velocity / 10.0, Shade::Velocity)
    }
}
