//! Rendering layer. All terminal I/O lives here.
//!
//! Bodies draw themselves through the `DrawSurface` trait; the terminal
//! implementation maps world coordinates onto the character grid inside the
//! border. No game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;

use crate::config::Viewport;
use crate::session::{GamePhase, GameSession};

/// What a shape represents, so a surface can pick colours and glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shade {
    Player,
    Enemy,
    Projectile,
    Velocity,
}

/// Abstract 2D drawing context in world coordinates.
pub trait DrawSurface {
    /// Triangle centred on `center`, pointing up for the player and
    /// projectiles and down for enemies.
    fn triangle(&mut self, center: Vec2, half_size: Vec2, shade: Shade) -> std::io::Result<()>;

    fn line(&mut self, from: Vec2, to: Vec2, shade: Shade) -> std::io::Result<()>;
}

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_TIME: Color = Color::Yellow;
const C_HUD_HITS: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Red;
const C_PROJECTILE: Color = Color::Cyan;
const C_VELOCITY: Color = Color::DarkGreen;
const C_HINT: Color = Color::DarkGrey;

// ── Terminal surface ──────────────────────────────────────────────────────────

/// Draws into the area inside the border (columns 1..w-1, rows 2..h-2).
pub struct TerminalSurface<'a, W: Write> {
    out: &'a mut W,
    viewport: Viewport,
    width: u16,
    height: u16,
}

impl<'a, W: Write> TerminalSurface<'a, W> {
    pub fn new(out: &'a mut W, viewport: Viewport, width: u16, height: u16) -> Self {
        Self {
            out,
            viewport,
            width,
            height,
        }
    }

    /// World point → terminal cell, or `None` outside the play area.
    pub fn cell(&self, point: Vec2) -> Option<(u16, u16)> {
        let cols = self.width.saturating_sub(2) as f32;
        let rows = self.height.saturating_sub(4) as f32;
        if cols < 1.0 || rows < 1.0 {
            return None;
        }
        let fx = point.x / self.viewport.width;
        let fy = point.y / self.viewport.height;
        if !(0.0..=1.0).contains(&fx) || !(0.0..=1.0).contains(&fy) {
            return None;
        }
        let col = 1 + ((fx * (cols - 1.0)).round() as u16);
        let row = 2 + ((fy * (rows - 1.0)).round() as u16);
        Some((col, row))
    }
}

impl<W: Write> DrawSurface for TerminalSurface<'_, W> {
    fn triangle(&mut self, center: Vec2, _half_size: Vec2, shade: Shade) -> std::io::Result<()> {
        let Some((col, row)) = self.cell(center) else {
            return Ok(());
        };
        let (glyph, color) = match shade {
            Shade::Player => ("▲", C_PLAYER),
            Shade::Enemy => ("▼", C_ENEMY),
            Shade::Projectile => ("║", C_PROJECTILE),
            Shade::Velocity => ("·", C_VELOCITY),
        };
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(glyph))?;
        Ok(())
    }

    fn line(&mut self, from: Vec2, to: Vec2, _shade: Shade) -> std::io::Result<()> {
        // Only the tip is visible at terminal resolution
        let (Some(start), Some(end)) = (self.cell(from), self.cell(to)) else {
            return Ok(());
        };
        if start == end {
            return Ok(());
        }
        self.out.queue(cursor::MoveTo(end.0, end.1))?;
        self.out.queue(style::SetForegroundColor(C_VELOCITY))?;
        self.out.queue(Print("·"))?;
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame. `loop_count` is the number of simulation ticks
/// run so far.
pub fn render<W: Write>(out: &mut W, session: &GameSession, loop_count: u64) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, session, width)?;

    {
        let mut surface = TerminalSurface::new(out, session.viewport, width, height);
        session.draw(&mut surface)?;
    }

    draw_controls_hint(out, width, height, loop_count)?;

    if session.phase == GamePhase::GameOver {
        draw_game_over(out, session, width, height)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, session: &GameSession, width: u16) -> std::io::Result<()> {
    let stats = session.stats();
    let health = session.player().map_or(0, |p| p.health.max(0));

    // Health, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!("Health: {:>3}", health)))?;

    // Time alive, centre
    let time_str = format!("Time: {:.1}s", stats.time_alive);
    let tx = (width / 2).saturating_sub(time_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(&time_str))?;

    // Hits, right
    let hits_str = format!("Hits: {}", stats.enemies_hit);
    let rx = width.saturating_sub(hits_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HITS))?;
    out.queue(Print(&hits_str))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

pub fn loop_count_label(loop_count: u64) -> String {
    format!("loop count {}", loop_count)
}

fn draw_controls_hint<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    loop_count: u64,
) -> std::io::Result<()> {
    let row = height.saturating_sub(1);
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("W A S D / arrows : Move   SPACE : Shoot   Q : Quit"))?;

    let label = loop_count_label(loop_count);
    let lx = width.saturating_sub(label.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(lx, row))?;
    out.queue(Print(&label))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    session: &GameSession,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let stats = session.stats();
    let hits_line = format!("Enemies Hit: {}", stats.enemies_hit);
    let time_line = format!("Time Alive: {:.2}s", stats.time_alive);
    let spawned_line = format!("Enemies Spawned: {}", stats.enemies_spawned);
    let score_line = format!("Score: {}", stats.score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        ("SPACE - Play Again  Q - Quit", Color::White),
        ("Final Stats", Color::DarkGrey),
        (&hits_line, Color::Green),
        (&time_line, Color::Yellow),
        (&spawned_line, Color::DarkGrey),
        (&score_line, Color::Yellow),
    ];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
