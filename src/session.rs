//! Game session state and the fixed tick order
//!
//! A `GameSession` owns everything one game needs: the entity registry, the
//! spawner, the counters and the current phase. The front end drives it with
//! one `tick` per fixed step and one `draw` per rendered frame.

use rand::Rng;

use crate::compute::{update_enemy, update_player, update_projectile, Spawner};
use crate::config::Viewport;
use crate::consts::*;
use crate::controller::Controller;
use crate::display::DrawSurface;
use crate::entities::{Body, BodyId, BodyKind};
use crate::registry::EntityRegistry;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    /// Player health reached zero; waiting for the action button
    GameOver,
}

/// Read-only counters for the HUD and the game-over screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStats {
    pub enemies_hit: u32,
    pub enemies_spawned: u32,
    pub time_alive: f32,
    pub score: u32,
}

/// floor(30 × hits + seconds alive)
pub fn compute_score(enemies_hit: u32, time_alive: f32) -> u32 {
    (POINTS_PER_HIT * enemies_hit as f32 + time_alive).floor().max(0.0) as u32
}

#[derive(Debug)]
pub struct GameSession {
    pub registry: EntityRegistry,
    pub spawner: Spawner,
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub enemies_hit: u32,
    pub enemies_spawned: u32,
    player_id: BodyId,
}

impl GameSession {
    pub fn new(viewport: Viewport) -> Self {
        let mut registry = EntityRegistry::new();
        let player_id = registry.register(|id| Body::player(id, viewport.width, viewport.height));
        log::info!(
            "New game: viewport {}x{}, player {}",
            viewport.width,
            viewport.height,
            player_id
        );
        Self {
            registry,
            spawner: Spawner::new(),
            viewport,
            phase: GamePhase::Running,
            enemies_hit: 0,
            enemies_spawned: 0,
            player_id,
        }
    }

    pub fn player_id(&self) -> BodyId {
        self.player_id
    }

    pub fn player(&self) -> Option<&Body> {
        self.registry.get(self.player_id)
    }

    pub fn player_mut(&mut self) -> Option<&mut Body> {
        self.registry.get_mut(self.player_id)
    }

    pub fn player_alive(&self) -> bool {
        self.player().is_some_and(|p| !p.is_dead())
    }

    pub fn time_alive(&self) -> f32 {
        self.player()
            .and_then(Body::player_state)
            .map_or(0.0, |s| s.time_alive)
    }

    pub fn stats(&self) -> SessionStats {
        let time_alive = self.time_alive();
        SessionStats {
            enemies_hit: self.enemies_hit,
            enemies_spawned: self.enemies_spawned,
            time_alive,
            score: compute_score(self.enemies_hit, time_alive),
        }
    }

    /// Count of live bodies of each kind: (enemies, projectiles).
    pub fn census(&self) -> (usize, usize) {
        self.registry.iter().fold((0, 0), |(e, p), b| match b.kind {
            BodyKind::Enemy => (e + 1, p),
            BodyKind::Projectile => (e, p + 1),
            BodyKind::Player(_) => (e, p),
        })
    }

    /// Advance the game by one fixed step.
    ///
    /// Order: controller, body updates, removal flush, spawner, phase check.
    /// Only bodies live at the start of the tick are updated; anything created
    /// during the tick first moves on the next one.
    pub fn tick(&mut self, controller: Controller, dt: f32, rng: &mut impl Rng) {
        // 1. Controller
        if let Some(state) = self.player_mut().and_then(Body::player_state_mut) {
            state.controller = controller;
        }

        // 2. Bodies
        for id in self.registry.ids() {
            if self.registry.is_pending_removal(id) {
                continue;
            }
            self.update_body(id, dt);
        }

        // 3. Removals
        self.registry.flush();

        // 4. Spawner
        let alive = self.player_alive();
        if self
            .spawner
            .update(&mut self.registry, alive, self.viewport, dt, rng)
            .is_some()
        {
            self.enemies_spawned += 1;
        }

        // 5. Phase
        let phase = self.phase;
        match phase {
            GamePhase::GameOver if controller.action => self.restart(),
            GamePhase::Running if !alive => {
                self.phase = GamePhase::GameOver;
                let stats = self.stats();
                log::info!(
                    "Game over: score {}, hits {}, spawned {}, alive {:.1}s",
                    stats.score,
                    stats.enemies_hit,
                    stats.enemies_spawned,
                    stats.time_alive
                );
            }
            _ => {}
        }
    }

    fn update_body(&mut self, id: BodyId, dt: f32) {
        let Some(kind) = self.registry.get(id).map(|b| b.kind.clone()) else {
            return;
        };

        match kind {
            BodyKind::Player(_) => {
                update_player(&mut self.registry, id, self.viewport, dt);
            }
            BodyKind::Enemy => {
                update_enemy(&mut self.registry, id, self.player_id, self.viewport, dt);
            }
            BodyKind::Projectile => {
                if update_projectile(&mut self.registry, id, dt).is_some() {
                    self.enemies_hit += 1;
                }
            }
        }
    }

    /// Throw the current game away and start over with a fresh player,
    /// spawner and counters. Body ids keep counting up.
    pub fn restart(&mut self) {
        self.registry.clear();
        let viewport = self.viewport;
        self.player_id = self
            .registry
            .register(|id| Body::player(id, viewport.width, viewport.height));
        self.spawner = Spawner::new();
        self.enemies_hit = 0;
        self.enemies_spawned = 0;
        self.phase = GamePhase::Running;
        log::info!("Restarted with player {}", self.player_id);
    }

    /// Draw every live body once, in registry order.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) -> std::io::Result<()> {
        for body in self.registry.iter() {
            body.draw(surface)?;
        }
        Ok(())
    }
}
