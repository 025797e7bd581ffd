use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_shooter::controller::{Axis, Binding, KeyBindings};
use space_shooter::display;
use space_shooter::{Controller, ControllerSource, FixedTimestep, GameConfig, GameSession};

/// Render pacing; simulation rate comes from the config.
const FRAME: Duration = Duration::from_millis(16);

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈130 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

#[derive(Debug, Parser)]
#[command(author, version, about = "Terminal space shooter")]
struct Cli {
    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation ticks per second (overrides the config file)
    #[arg(long)]
    fps: Option<u32>,

    /// Write log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Input ─────────────────────────────────────────────────────────────────────

fn default_bindings() -> KeyBindings<KeyCode> {
    let left = Binding::Axis { axis: Axis::X, modifier: -1 };
    let right = Binding::Axis { axis: Axis::X, modifier: 1 };
    let up = Binding::Axis { axis: Axis::Y, modifier: -1 };
    let down = Binding::Axis { axis: Axis::Y, modifier: 1 };
    KeyBindings::new()
        .bind(KeyCode::Char(' '), Binding::Action)
        .bind(KeyCode::Char('a'), left)
        .bind(KeyCode::Char('A'), left)
        .bind(KeyCode::Left, left)
        .bind(KeyCode::Char('d'), right)
        .bind(KeyCode::Char('D'), right)
        .bind(KeyCode::Right, right)
        .bind(KeyCode::Char('w'), up)
        .bind(KeyCode::Char('W'), up)
        .bind(KeyCode::Up, up)
        .bind(KeyCode::Char('s'), down)
        .bind(KeyCode::Char('S'), down)
        .bind(KeyCode::Down, down)
}

/// Keyboard state fed by terminal events.
///
/// Maintains a map from each held key to the frame it was last seen. Works
/// with keyboard-enhancement terminals (proper release events) and with
/// classic terminals where keys simply expire after `HOLD_WINDOW` frames of
/// silence.
struct TerminalInput {
    bindings: KeyBindings<KeyCode>,
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

impl TerminalInput {
    fn new(bindings: KeyBindings<KeyCode>) -> Self {
        Self {
            bindings,
            key_frame: HashMap::new(),
            frame: 0,
        }
    }

    /// Drain pending events. Returns true if the player asked to quit.
    fn pump(&mut self, rx: &mpsc::Receiver<Event>) -> bool {
        self.frame += 1;
        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return true;
                        }
                        _ => {}
                    }
                    self.key_frame.insert(code, self.frame);
                }
                KeyEventKind::Repeat => {
                    self.key_frame.insert(code, self.frame);
                }
                KeyEventKind::Release => {
                    self.key_frame.remove(&code);
                }
            }
        }
        let frame = self.frame;
        self.key_frame
            .retain(|_, last| frame.saturating_sub(*last) <= HOLD_WINDOW);
        false
    }
}

impl ControllerSource for TerminalInput {
    fn sample(&mut self) -> Controller {
        let held: HashSet<KeyCode> = self.key_frame.keys().cloned().collect();
        self.bindings.poll(&held)
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = GameSession::new(config.viewport);
    let mut clock = FixedTimestep::new(config.step(), config.max_substeps);
    let mut input = TerminalInput::new(default_bindings());
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        let elapsed = frame_start.duration_since(last).as_secs_f32();
        last = frame_start;

        if input.pump(rx) {
            return Ok(());
        }

        clock.advance(elapsed, |dt| {
            let controller = input.sample();
            session.tick(controller, dt, &mut rng);
        });

        display::render(out, &session, clock.ticks)?;

        let spent = frame_start.elapsed();
        if spent < FRAME {
            thread::sleep(FRAME - spent);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(fps) = cli.fps {
        config.update_rate_hz = fps;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;
    let config = load_config(&cli)?;
    log::info!("Space Shooter starting at {} Hz", config.update_rate_hz);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &config, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("Exited with error: {:#}", e);
    }
    result
}
