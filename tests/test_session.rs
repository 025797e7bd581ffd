use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_shooter::display::{DrawSurface, Shade};
use space_shooter::entities::*;
use space_shooter::session::*;
use space_shooter::{Controller, Viewport};

const DT: f32 = 1.0 / 60.0;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

/// Session with the spawner switched off so tests control every enemy.
fn quiet_session() -> GameSession {
    let mut s = GameSession::new(Viewport::default());
    s.spawner.timer = f32::INFINITY;
    s
}

fn place_enemy(s: &mut GameSession, pos: Vec2, velocity: Vec2) -> BodyId {
    let id = s.registry.register(|id| Body::enemy(id, pos.x));
    let e = s.registry.get_mut(id).unwrap();
    e.position = pos;
    e.velocity = velocity;
    id
}

fn idle() -> Controller {
    Controller::default()
}

fn fire() -> Controller {
    Controller::new(0, 0, true)
}

#[derive(Default)]
struct CountingSurface {
    triangles: usize,
}

impl DrawSurface for CountingSurface {
    fn triangle(&mut self, _center: Vec2, _half: Vec2, _shade: Shade) -> std::io::Result<()> {
        self.triangles += 1;
        Ok(())
    }

    fn line(&mut self, _from: Vec2, _to: Vec2, _shade: Shade) -> std::io::Result<()> {
        Ok(())
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn new_session_has_only_the_player() {
    let s = GameSession::new(Viewport::default());
    assert_eq!(s.registry.len(), 1);
    assert_eq!(s.census(), (0, 0));
    assert_eq!(s.phase, GamePhase::Running);
    let p = s.player().unwrap();
    assert_eq!(p.position, Vec2::new(150.0, 400.0));
    assert_eq!(p.health, 100);
    assert_eq!(
        s.stats(),
        SessionStats {
            enemies_hit: 0,
            enemies_spawned: 0,
            time_alive: 0.0,
            score: 0
        }
    );
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn falling_enemy_hits_player_after_eight_seconds() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let enemy = place_enemy(&mut s, Vec2::new(150.0, -5.0), Vec2::new(0.0, 50.0));

    // 7.8s: enemy at y≈385, still clear of the player
    for _ in 0..468 {
        s.tick(idle(), DT, &mut rng);
    }
    assert_eq!(s.player().unwrap().health, 100);
    assert!(s.registry.contains(enemy));

    // 8.1s: enemy would be at y≈400
    for _ in 468..486 {
        s.tick(idle(), DT, &mut rng);
    }
    assert_eq!(s.player().unwrap().health, 90);
    assert!(!s.registry.contains(enemy));
    assert_eq!(s.census(), (0, 0));
    assert_eq!(s.phase, GamePhase::Running);
}

#[test]
fn fire_rate_limited_to_once_per_second() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();

    // t = 0
    s.tick(fire(), 0.5, &mut rng);
    assert_eq!(s.census().1, 1);
    // t = 0.5
    s.tick(fire(), 0.5, &mut rng);
    assert_eq!(s.census().1, 1);
    // t = 1.0
    s.tick(fire(), 0.5, &mut rng);
    assert_eq!(s.census().1, 2);
}

#[test]
fn exact_overlap_scores_one_hit() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let at = Vec2::new(100.0, 100.0);
    let enemy = place_enemy(&mut s, at, Vec2::ZERO);
    let first = s.registry.register(|id| Body::projectile(id, at));
    let second = s.registry.register(|id| Body::projectile(id, at));
    s.registry.get_mut(first).unwrap().velocity = Vec2::ZERO;
    s.registry.get_mut(second).unwrap().velocity = Vec2::ZERO;

    s.tick(idle(), DT, &mut rng);

    assert_eq!(s.enemies_hit, 1);
    assert!(!s.registry.contains(enemy));
    assert!(!s.registry.contains(first));
    // Nothing left for the second projectile to hit
    assert!(s.registry.contains(second));
    assert_eq!(s.census(), (0, 1));
}

#[test]
fn held_fire_at_sixty_hertz_shoots_every_sixty_ticks() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let mut shots = Vec::new();
    for tick in 0..130 {
        let before = s.census().1;
        s.tick(fire(), DT, &mut rng);
        if s.census().1 > before {
            shots.push(tick);
        }
    }
    assert_eq!(shots, vec![0, 60, 120]);
}

#[test]
fn first_enemy_spawns_after_sixty_ticks() {
    let mut s = GameSession::new(Viewport::default());
    let mut rng = seeded_rng();
    for _ in 0..59 {
        s.tick(idle(), DT, &mut rng);
    }
    assert_eq!(s.enemies_spawned, 0);
    s.tick(idle(), DT, &mut rng);
    assert_eq!(s.enemies_spawned, 1);
    assert_eq!(s.census().0, 1);
}

// ── Tick order ────────────────────────────────────────────────────────────────

#[test]
fn new_projectile_waits_a_tick_before_moving() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    s.tick(fire(), 0.5, &mut rng);

    let shot = s
        .registry
        .iter()
        .find(|b| b.kind.is_projectile())
        .map(|b| b.id)
        .unwrap();
    assert_eq!(s.registry.get(shot).unwrap().position, Vec2::new(150.0, 400.0));

    s.tick(idle(), 0.5, &mut rng);
    assert_eq!(s.registry.get(shot).unwrap().position, Vec2::new(150.0, 375.0));
}

#[test]
fn spawner_counts_enemies() {
    let mut s = GameSession::new(Viewport::default());
    let mut rng = seeded_rng();
    for _ in 0..4 {
        s.tick(idle(), 0.5, &mut rng);
    }
    assert_eq!(s.enemies_spawned, 2);
    assert_eq!(s.census().0, 2);
    assert_eq!(s.stats().enemies_spawned, 2);
}

#[test]
fn enemies_leave_through_the_bottom() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let enemy = place_enemy(&mut s, Vec2::new(10.0, 490.0), Vec2::new(0.0, 50.0));
    s.tick(idle(), 0.25, &mut rng);
    assert!(!s.registry.contains(enemy));
    assert_eq!(s.player().unwrap().health, 100);
}

#[test]
fn draw_visits_every_live_body_once() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    place_enemy(&mut s, Vec2::new(10.0, 10.0), Vec2::ZERO);
    place_enemy(&mut s, Vec2::new(60.0, 10.0), Vec2::ZERO);
    s.tick(fire(), DT, &mut rng);

    let mut surface = CountingSurface::default();
    s.draw(&mut surface).unwrap();
    assert_eq!(surface.triangles, s.registry.len());
    assert_eq!(surface.triangles, 4);
}

// ── Game over & restart ───────────────────────────────────────────────────────

fn kill_player(s: &mut GameSession, rng: &mut StdRng) {
    s.player_mut().unwrap().health = 10;
    place_enemy(s, Vec2::new(150.0, 400.0), Vec2::ZERO);
    s.tick(idle(), DT, rng);
}

#[test]
fn player_death_ends_the_game() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    kill_player(&mut s, &mut rng);
    assert!(s.player().unwrap().is_dead());
    assert!(!s.player_alive());
    assert_eq!(s.phase, GamePhase::GameOver);
}

#[test]
fn time_alive_freezes_after_death() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    s.tick(idle(), 0.5, &mut rng);
    kill_player(&mut s, &mut rng);
    let frozen = s.time_alive();
    for _ in 0..10 {
        s.tick(idle(), 0.5, &mut rng);
    }
    assert_eq!(s.time_alive(), frozen);
    assert_eq!(s.phase, GamePhase::GameOver);
}

#[test]
fn no_spawning_after_game_over() {
    let mut s = GameSession::new(Viewport::default());
    let mut rng = seeded_rng();
    s.spawner.timer = 10.0;
    kill_player(&mut s, &mut rng);
    s.spawner.timer = 0.0;
    for _ in 0..5 {
        s.tick(idle(), 1.0, &mut rng);
    }
    assert_eq!(s.enemies_spawned, 0);
}

#[test]
fn action_restarts_after_game_over() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    s.tick(fire(), 0.5, &mut rng);
    s.enemies_hit = 3;
    s.enemies_spawned = 5;
    let old_player = s.player_id();
    kill_player(&mut s, &mut rng);
    assert_eq!(s.phase, GamePhase::GameOver);

    s.tick(fire(), DT, &mut rng);

    assert_eq!(s.phase, GamePhase::Running);
    assert_eq!(s.registry.len(), 1);
    assert_eq!(s.census(), (0, 0));
    assert!(s.player_id() > old_player);
    let p = s.player().unwrap();
    assert_eq!(p.health, 100);
    assert_eq!(p.position, Vec2::new(150.0, 400.0));
    assert_eq!(
        s.stats(),
        SessionStats {
            enemies_hit: 0,
            enemies_spawned: 0,
            time_alive: 0.0,
            score: 0
        }
    );
}

#[test]
fn action_does_not_restart_a_running_game() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    let player = s.player_id();
    s.tick(fire(), DT, &mut rng);
    assert_eq!(s.phase, GamePhase::Running);
    assert_eq!(s.player_id(), player);
    assert_eq!(s.census().1, 1);
}

#[test]
fn game_over_waits_for_action() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    kill_player(&mut s, &mut rng);
    for _ in 0..30 {
        s.tick(idle(), DT, &mut rng);
    }
    assert_eq!(s.phase, GamePhase::GameOver);
}

// ── Score ─────────────────────────────────────────────────────────────────────

#[test]
fn score_weights_hits_and_survival() {
    assert_eq!(compute_score(0, 0.0), 0);
    assert_eq!(compute_score(0, 12.7), 12);
    assert_eq!(compute_score(3, 12.7), 102);
    assert_eq!(compute_score(1, 0.5), 30);
}

#[test]
fn stats_report_running_score() {
    let mut s = quiet_session();
    let mut rng = seeded_rng();
    for _ in 0..4 {
        s.tick(idle(), 0.5, &mut rng);
    }
    s.enemies_hit = 2;
    let stats = s.stats();
    assert_eq!(stats.time_alive, 2.0);
    assert_eq!(stats.score, 62);
}
