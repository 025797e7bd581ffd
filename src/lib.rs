//! Space Shooter - a single-level arcade survival game
//!
//! Core modules:
//! - `entities`: Body data model (player, enemy, projectile)
//! - `registry`: Entity arena with deferred removal
//! - `compute`: Per-kind update rules, collision, spawning
//! - `session`: Game session state machine and tick order
//! - `clock`: Fixed timestep driver
//! - `controller`: Per-tick input snapshot and key translation
//! - `display`: Draw surface and terminal rendering
//! - `config`: Runtime configuration

pub mod clock;
pub mod compute;
pub mod config;
pub mod controller;
pub mod display;
pub mod entities;
pub mod registry;
pub mod session;

pub use clock::FixedTimestep;
pub use config::{ConfigError, GameConfig, Viewport};
pub use controller::{Controller, ControllerSource};
pub use entities::{Body, BodyId, BodyKind};
pub use registry::EntityRegistry;
pub use session::{GamePhase, GameSession, SessionStats};

/// Gameplay tuning constants
pub mod consts {
    /// Default body health
    pub const DEFAULT_HEALTH: i32 = 100;
    /// Width and height shared by every body kind
    pub const BODY_SIZE: f32 = 10.0;

    /// Player movement speed (units/s)
    pub const PLAYER_SPEED: f32 = 100.0;
    /// Distance of the player spawn point above the bottom edge
    pub const PLAYER_SPAWN_BOTTOM_OFFSET: f32 = 100.0;
    /// Seconds between shots
    pub const FIRE_COOLDOWN: f32 = 1.0;
    /// Slack for countdown timers, so rounding left over from summing f32
    /// steps does not push an expiry to the following tick
    pub const TIMER_EPSILON: f32 = 1e-4;

    /// Enemy spawn height (just above the top edge)
    pub const ENEMY_SPAWN_Y: f32 = -5.0;
    /// Enemy fall speed (units/s)
    pub const ENEMY_SPEED: f32 = 50.0;
    /// Health taken from the player on contact
    pub const ENEMY_CONTACT_DAMAGE: i32 = 10;
    /// Seconds between enemy spawns
    pub const SPAWN_INTERVAL: f32 = 1.0;

    /// Projectile speed (units/s, upward)
    pub const PROJECTILE_SPEED: f32 = 50.0;

    /// Points per enemy hit
    pub const POINTS_PER_HIT: f32 = 30.0;

    /// Default simulation rate
    pub const DEFAULT_UPDATE_RATE_HZ: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;
    /// Longest real frame the clock will account for (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.25;

    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 300.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 500.0;
}
