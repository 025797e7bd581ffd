//! Game rules for each body kind.
//!
//! Every update function works on the registry by id. Bodies that need to go
//! are queued for removal, never dropped here, so the caller can keep
//! iterating over the ids it collected at the start of the tick.
//! Randomness only enters through the injected RNG.

use glam::Vec2;
use rand::Rng;

use crate::config::Viewport;
use crate::consts::*;
use crate::controller::Controller;
use crate::entities::{Body, BodyId};
use crate::registry::EntityRegistry;

// ── Collision ─────────────────────────────────────────────────────────────────

/// Axis-aligned box overlap using top-left corners and sizes. Touching edges
/// do not count.
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Velocity for a controller snapshot.
///
/// Each axis maps to ±speed on its own; a diagonal is then rescaled so the
/// total magnitude stays at `speed`.
pub fn player_velocity(controller: &Controller, speed: f32) -> Vec2 {
    let mut velocity = Vec2::new(
        controller.move_x as f32 * speed,
        controller.move_y as f32 * speed,
    );
    if controller.is_diagonal() {
        let component = speed / std::f32::consts::SQRT_2;
        velocity = Vec2::new(
            component.copysign(controller.move_x as f32),
            component.copysign(controller.move_y as f32),
        );
    }
    velocity
}

/// Advance the player one tick. Returns the id of a projectile if one was
/// fired.
///
/// The projectile leaves from the position the player held before this tick's
/// movement.
pub fn update_player(
    registry: &mut EntityRegistry,
    id: BodyId,
    viewport: Viewport,
    dt: f32,
) -> Option<BodyId> {
    let body = registry.get_mut(id)?;
    let dead = body.is_dead();
    let origin = body.position;

    let state = body.player_state_mut()?;
    if !dead {
        state.time_alive += dt;
    }
    let velocity = player_velocity(&state.controller, state.speed);

    state.cooldown -= dt;
    let fire = state.controller.action && state.cooldown <= TIMER_EPSILON;
    if fire {
        state.cooldown = FIRE_COOLDOWN;
    }

    body.velocity = velocity;
    body.update(dt);
    body.position = body
        .position
        .clamp(Vec2::ZERO, Vec2::new(viewport.width, viewport.height));

    if fire {
        let projectile = registry.register(|pid| Body::projectile(pid, origin));
        log::debug!("Projectile {} fired from ({:.1}, {:.1})", projectile, origin.x, origin.y);
        Some(projectile)
    } else {
        None
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

/// Advance an enemy one tick. Returns true if it rammed the player.
///
/// Leaving the bottom of the viewport and hitting the player are checked
/// independently; either one queues the enemy for removal.
pub fn update_enemy(
    registry: &mut EntityRegistry,
    id: BodyId,
    player_id: BodyId,
    viewport: Viewport,
    dt: f32,
) -> bool {
    let Some(enemy) = registry.get_mut(id) else {
        return false;
    };
    enemy.update(dt);
    let (position, size) = (enemy.position, enemy.size);

    if position.y >= viewport.height {
        log::trace!("Enemy {} left the viewport", id);
        registry.queue_removal(id);
    }

    let Some(player) = registry.get_mut(player_id) else {
        return false;
    };
    if !aabb_overlap(position, size, player.position, player.size) {
        return false;
    }

    player.health -= ENEMY_CONTACT_DAMAGE;
    log::debug!("Enemy {} hit the player, health now {}", id, player.health);
    registry.queue_removal(id);
    true
}

// ── Projectile ────────────────────────────────────────────────────────────────

/// Advance a projectile one tick. Returns the id of the enemy it destroyed.
///
/// Enemies already queued for removal this tick are not targets, so a single
/// enemy can only be scored once.
pub fn update_projectile(registry: &mut EntityRegistry, id: BodyId, dt: f32) -> Option<BodyId> {
    let projectile = registry.get_mut(id)?;
    projectile.update(dt);
    let (position, size) = (projectile.position, projectile.size);

    let target = registry
        .iter()
        .filter(|b| b.kind.is_enemy() && !registry.is_pending_removal(b.id))
        .find(|b| aabb_overlap(position, size, b.position, b.size))
        .map(|b| b.id);

    if let Some(enemy_id) = target {
        log::debug!("Projectile {} destroyed enemy {}", id, enemy_id);
        registry.queue_removal(enemy_id);
        registry.queue_removal(id);
        return Some(enemy_id);
    }

    // Fully above the top edge
    if position.y + size.y < 0.0 {
        log::trace!("Projectile {} culled off-screen", id);
        registry.queue_removal(id);
    }
    None
}

// ── Spawner ───────────────────────────────────────────────────────────────────

/// Timed enemy factory.
#[derive(Clone, Debug, PartialEq)]
pub struct Spawner {
    /// Seconds until the next spawn
    pub timer: f32,
    pub interval: f32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            timer: SPAWN_INTERVAL,
            interval: SPAWN_INTERVAL,
        }
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count down and spawn an enemy at a random column once the timer runs
    /// out. Nothing spawns while the player is dead; the timer keeps running.
    pub fn update(
        &mut self,
        registry: &mut EntityRegistry,
        player_alive: bool,
        viewport: Viewport,
        dt: f32,
        rng: &mut impl Rng,
    ) -> Option<BodyId> {
        self.timer -= dt;
        if self.timer > TIMER_EPSILON || !player_alive {
            return None;
        }

        let x = rng.gen_range(0.0..viewport.width);
        let id = registry.register(|id| Body::enemy(id, x));
        self.timer = self.interval;
        log::debug!("Enemy {} spawned at x={:.1}", id, x);
        Some(id)
    }
}
