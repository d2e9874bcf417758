mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing_subscriber::EnvFilter;

use sky_raider::config::{GameConfig, SpriteGlyphs};
use sky_raider::entities::GameStatus;
use sky_raider::render::GlyphSheet;
use sky_raider::session::{GameEvent, GameSession};

use display::{TerminalSurface, UiView};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "sky_raider", about = "Terminal arcade shooter with upgrades and wingmen")]
struct Args {
    /// JSON config file (defaults to ~/.sky_raider.json when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed the RNG for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write logs (the terminal itself is taken by the game).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Draw every sprite as a plain coloured block.
    #[arg(long)]
    no_sprites: bool,

    /// Keep the enemy spawn rate constant instead of speeding up with score.
    #[arg(long)]
    fixed_spawn: bool,
}

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// Min frames between keyboard movement steps while a direction key is held.
const MOVE_COOLDOWN: u32 = 2;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// at 60 FPS a window of 8 frames (≈133 ms) outlasts the OS repeat interval.
const HOLD_WINDOW: u64 = 8;

/// How long the HUD stays highlighted after one of its values changes.
const HUD_FLASH: Duration = Duration::from_millis(600);

/// How long a purchase / status notice stays on screen.
const NOTICE_TTL: Duration = Duration::from_secs(2);

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Paths, config, logging ────────────────────────────────────────────────────

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

fn load_config(args: &Args) -> anyhow::Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => {
            let default_path = home_dir().join(".sky_raider.json");
            if default_path.exists() {
                GameConfig::load(&default_path).unwrap_or_else(|err| {
                    tracing::warn!(%err, "ignoring config file, using defaults");
                    GameConfig::default()
                })
            } else {
                GameConfig::default()
            }
        }
    };

    if args.no_sprites {
        config.sprites = SpriteGlyphs::none();
    }
    if args.fixed_spawn {
        config.adaptive_spawn = false;
    }
    Ok(config)
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path() -> PathBuf {
    home_dir().join(".sky_raider_score")
}

fn load_high_score() -> u32 {
    std::fs::read_to_string(high_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(score: u32) {
    if let Err(err) = std::fs::write(high_score_path(), score.to_string()) {
        tracing::warn!(%err, "could not save high score");
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: keys with one-shot meaning (menu, purchases, restart, quit)
/// act on their press event.  Movement keys instead record the frame they
/// were last seen in `key_frame`; each frame every still-"fresh" key is
/// applied, so diagonal movement works with two keys held.  Mouse press and
/// drag place the ship directly under the pointer.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut GameSession<GlyphSheet>,
    surface: &mut TerminalSurface,
    rx: &mpsc::Receiver<Event>,
    best_score: &mut u32,
) -> std::io::Result<()> {
    let frame_len = Duration::from_millis(session.config().frame_ms);
    let step = session.config().player_key_step;

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut move_cooldown: u32 = 0;
    let mut frame: u64 = 0;
    let mut hud_flash_until = Instant::now();
    let mut notice: Option<(String, Instant)> = None;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('M') => {
                                if session.state().status.is_paused() {
                                    session.resume_game();
                                } else {
                                    session.open_menu();
                                }
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                session.resume_game();
                            }
                            KeyCode::Char('n') | KeyCode::Char('N') => session.restart_game(),
                            KeyCode::Char('u') | KeyCode::Char('U') => {
                                let outcome = session.upgrade_fire_rate();
                                notice = Some((outcome.to_string(), Instant::now()));
                            }
                            KeyCode::Char('s') | KeyCode::Char('S') => {
                                let outcome = session.buy_shield();
                                notice = Some((outcome.to_string(), Instant::now()));
                            }
                            _ => {}
                        }
                    }
                    // Repeat: refresh timestamp so key stays "held"
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    // Release: remove key immediately (keyboard-enhancement path)
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, row, .. }) => match kind {
                    MouseEventKind::Down(MouseButton::Left)
                    | MouseEventKind::Drag(MouseButton::Left) => {
                        if let Some((x, y)) = surface.cell_to_field(column, row) {
                            session.point_player_at(x, y);
                        }
                    }
                    _ => {}
                },
                Event::Resize(width, height) => {
                    surface.resize(width, height);
                    display::clear_screen(out)?;
                }
                _ => {}
            }
        }

        // ── Apply held-key movement every frame ──────────────────────────────
        if session.state().status == GameStatus::Running && move_cooldown == 0 {
            let left = any_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame);
            let right = any_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame);
            let up = any_held(&key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame);
            let down = any_held(&key_frame, &[KeyCode::Down], frame);

            let dx = (right as i32 - left as i32) as f32 * step;
            let dy = (down as i32 - up as i32) as f32 * step;
            if dx != 0.0 || dy != 0.0 {
                session.nudge_player(dx, dy);
                move_cooldown = MOVE_COOLDOWN;
            }
        }
        move_cooldown = move_cooldown.saturating_sub(1);

        // ── Simulate ─────────────────────────────────────────────────────────
        let now = Instant::now();
        let dt_ms = now.duration_since(last_frame).as_secs_f64() * 1000.0;
        last_frame = now;
        session.advance(dt_ms);

        for ev in session.take_events() {
            match ev {
                GameEvent::HudChanged => hud_flash_until = now + HUD_FLASH,
                GameEvent::Defeated { score } => {
                    if score > *best_score {
                        *best_score = score;
                        save_high_score(score);
                    }
                }
                GameEvent::MenuShown(_) | GameEvent::MenuHidden => {}
            }
        }
        if let Some((_, at)) = &notice {
            if now.duration_since(*at) > NOTICE_TTL {
                notice = None;
            }
        }

        // ── Draw ─────────────────────────────────────────────────────────────
        session.render(surface);
        let ui = UiView {
            best_score: (*best_score).max(session.state().economy.score),
            hud_flash: now < hud_flash_until,
            notice: notice.as_ref().map(|(text, _)| text.as_str()),
        };
        display::render(out, surface, session.state(), session.config(), &ui)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            std::thread::sleep(frame_len - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("sky_raider.log"));
    init_logging(&log_path)?;

    let config = load_config(&args)?;
    let glyphs = GlyphSheet::new(config.sprites.clone());
    tracing::info!(seed = ?args.seed, adaptive_spawn = config.adaptive_spawn, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
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

    let result = run(&mut out, &rx, config, glyphs, args.seed);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: GameConfig,
    glyphs: GlyphSheet,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let mut best_score = load_high_score();
    let (width, height) = terminal::size().context("querying terminal size")?;

    let mut surface = TerminalSurface::new(width, height, &config, glyphs.clone());
    let mut session = GameSession::new(config, glyphs, seed);

    display::clear_screen(out)?;
    game_loop(out, &mut session, &mut surface, rx, &mut best_score)?;

    // Persist new high score if the last run beat it
    let score = session.state().economy.score;
    if score > best_score {
        save_high_score(score);
    }
    tracing::info!(score, best = best_score.max(score), "exiting");
    Ok(())
}
