/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (plus the run's `GameConfig` and, where needed, an RNG handle)
/// and returns a brand-new `GameState`.  Side effects are limited to the
/// injected RNG.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    Bullet, Enemy, GameEconomy, GameState, GameStatus, PauseReason, Player, Rect, SpawnSchedule,
};

// ── Geometry helpers ─────────────────────────────────────────────────────────

pub fn bullet_rect(bullet: &Bullet, config: &GameConfig) -> Rect {
    Rect::new(bullet.x, bullet.y, config.bullet_width, config.bullet_height)
}

pub fn enemy_size(enemy: &Enemy, config: &GameConfig) -> f32 {
    config.enemy_base_size * enemy.scale
}

pub fn enemy_rect(enemy: &Enemy, config: &GameConfig) -> Rect {
    let size = enemy_size(enemy, config);
    Rect::new(enemy.x, enemy.y, size, size)
}

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn initial_economy(config: &GameConfig) -> GameEconomy {
    GameEconomy {
        score: 0,
        currency: 0,
        fire_rate_level: 1,
        bullet_interval_ms: config.bullet_interval_ms,
        shield_count: 0,
        has_wingmen: false,
    }
}

/// Build the initial game state for a run.
pub fn init_state(config: &GameConfig) -> GameState {
    GameState {
        player: Player {
            x: config.player_start_x,
            y: config.player_start_y,
            width: config.player_width,
            height: config.player_height,
        },
        wingmen: Vec::new(),
        bullets: Vec::new(),
        enemies: Vec::new(),
        economy: initial_economy(config),
        spawn: SpawnSchedule {
            interval_ms: config.spawn_interval_ms,
            next_threshold: config.spawn_threshold_step,
        },
        status: GameStatus::Running,
        frame: 0,
        width: config.field_width,
        height: config.field_height,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Pointer input: place the player's top-left corner.  No bounds are
/// enforced; a pointer dragged off the field takes the ship with it.
pub fn set_player_position(state: &GameState, x: f32, y: f32) -> GameState {
    GameState {
        player: Player {
            x,
            y,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Keyboard input: step the player, keeping the whole ship on the field.
pub fn nudge_player(state: &GameState, dx: f32, dy: f32) -> GameState {
    let max_x = (state.width - state.player.width).max(0.0);
    let max_y = (state.height - state.player.height).max(0.0);
    let x = (state.player.x + dx).clamp(0.0, max_x);
    let y = (state.player.y + dy).clamp(0.0, max_y);
    set_player_position(state, x, y)
}

// ── Spawner ──────────────────────────────────────────────────────────────────

/// Drop one enemy in just above the visible area.  `sprite_ready` reports
/// whether a given enemy sprite variant can be drawn; if not, the enemy is
/// flagged for fallback rendering.  No-op while paused.
pub fn spawn_enemy(
    state: &GameState,
    config: &GameConfig,
    rng: &mut impl Rng,
    sprite_ready: impl Fn(usize) -> bool,
) -> GameState {
    if state.status.is_paused() {
        return state.clone();
    }

    // Smaller enemies move faster: speed scales inversely with size.
    let scale = rng.gen_range(config.enemy_min_scale..config.enemy_max_scale);
    let variant = rng.gen_range(0..config.enemy_variants);
    let enemy = Enemy {
        x: rng.gen_range(0.0..state.width),
        y: config.enemy_spawn_y,
        speed: config.enemy_base_speed / scale,
        scale,
        variant,
        fallback: !sprite_ready(variant),
    };

    let mut enemies = state.enemies.clone();
    enemies.push(enemy);
    GameState {
        enemies,
        ..state.clone()
    }
}

/// Speed up spawning once the score passes the current threshold.
/// Runs on every spawner tick, paused or not; score cannot move while
/// paused so this is harmless.
pub fn accelerate_spawn(state: &GameState, config: &GameConfig) -> GameState {
    if !config.adaptive_spawn || state.economy.score < state.spawn.next_threshold {
        return state.clone();
    }

    let current = state.spawn.interval_ms;
    let shortened = (current * config.spawn_speedup_ratio).max(config.spawn_interval_floor_ms);
    if shortened >= current {
        // Already at the floor; the threshold stops advancing too.
        return state.clone();
    }

    tracing::debug!(
        score = state.economy.score,
        from_ms = current,
        to_ms = shortened,
        "enemy spawn cadence increased"
    );
    GameState {
        spawn: SpawnSchedule {
            interval_ms: shortened,
            next_threshold: state.spawn.next_threshold + config.spawn_threshold_step,
        },
        ..state.clone()
    }
}

// ── Weapons ──────────────────────────────────────────────────────────────────

/// Fire one volley: a bullet from the player's nose plus one per wingman
/// once wingmen are unlocked.  No-op while paused.
pub fn fire_volley(state: &GameState, config: &GameConfig) -> GameState {
    if state.status.is_paused() {
        return state.clone();
    }

    let half_bullet = config.bullet_width / 2.0;
    let center = state.player.center_x();

    let mut bullets = state.bullets.clone();
    bullets.push(Bullet {
        x: center - half_bullet,
        y: state.player.y,
    });
    if state.economy.has_wingmen {
        for wingman in &state.wingmen {
            bullets.push(Bullet {
                x: center + wingman.offset_x - half_bullet,
                y: state.player.y + config.wingman_drop,
            });
        }
    }

    GameState {
        bullets,
        ..state.clone()
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// What one collision pass changed; the session turns this into UI events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub kills: u32,
    pub shields_used: u32,
    pub defeated: bool,
}

impl FrameReport {
    /// Whether anything shown on the HUD changed.
    pub fn hud_changed(&self) -> bool {
        self.kills > 0 || self.shields_used > 0
    }
}

/// Move bullets up and enemies down, pruning anything that left the field.
pub fn advance_entities(state: &GameState, config: &GameConfig) -> GameState {
    let bullets: Vec<Bullet> = state
        .bullets
        .iter()
        .filter_map(|b| {
            let y = b.y - config.bullet_speed;
            if y < 0.0 {
                None
            } else {
                Some(Bullet { y, ..b.clone() })
            }
        })
        .collect();

    let enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .filter_map(|e| {
            let y = e.y + e.speed;
            if y > state.height {
                None
            } else {
                Some(Enemy { y, ..e.clone() })
            }
        })
        .collect();

    GameState {
        bullets,
        enemies,
        ..state.clone()
    }
}

/// Resolve bullet↔enemy and player↔enemy overlaps.
///
/// Matches are collected first and pruned once.  Each bullet destroys at
/// most one enemy and each enemy is credited at most once per pass.
pub fn resolve_collisions(state: &GameState, config: &GameConfig) -> (GameState, FrameReport) {
    let mut report = FrameReport::default();

    // ── 1. Bullets ↔ enemies ─────────────────────────────────────────────────
    let mut killed_enemies: Vec<usize> = Vec::new();
    let mut used_bullets: Vec<usize> = Vec::new();

    for (bi, bullet) in state.bullets.iter().enumerate() {
        let b = bullet_rect(bullet, config);
        for (ei, enemy) in state.enemies.iter().enumerate() {
            if !killed_enemies.contains(&ei) && b.overlaps(&enemy_rect(enemy, config)) {
                killed_enemies.push(ei);
                used_bullets.push(bi);
                break;
            }
        }
    }
    report.kills = killed_enemies.len() as u32;

    let mut enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(i, _)| !killed_enemies.contains(i))
        .map(|(_, e)| e.clone())
        .collect();

    let bullets: Vec<Bullet> = state
        .bullets
        .iter()
        .enumerate()
        .filter(|(i, _)| !used_bullets.contains(i))
        .map(|(_, b)| b.clone())
        .collect();

    let reward = report.kills * config.kill_reward;
    let mut economy = GameEconomy {
        score: state.economy.score + reward,
        currency: state.economy.currency + reward,
        ..state.economy.clone()
    };
    if report.kills > 0 {
        tracing::debug!(kills = report.kills, score = economy.score, "enemies destroyed");
    }

    // ── 2. Player ↔ enemies ──────────────────────────────────────────────────
    let player = state.player.rect();
    let mut status = state.status;
    let mut absorbed: Vec<usize> = Vec::new();

    for (ei, enemy) in enemies.iter().enumerate() {
        if !player.overlaps(&enemy_rect(enemy, config)) {
            continue;
        }
        if economy.shield_count > 0 {
            economy.shield_count -= 1;
            report.shields_used += 1;
            absorbed.push(ei);
        } else {
            status = GameStatus::Paused(PauseReason::Defeated);
            report.defeated = true;
            break;
        }
    }

    if !absorbed.is_empty() {
        enemies = enemies
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !absorbed.contains(i))
            .map(|(_, e)| e)
            .collect();
    }

    let next = GameState {
        enemies,
        bullets,
        economy,
        status,
        ..state.clone()
    };
    (next, report)
}

/// Advance the simulation by one frame.  Does nothing while paused.
pub fn tick(state: &GameState, config: &GameConfig) -> (GameState, FrameReport) {
    if state.status.is_paused() {
        return (state.clone(), FrameReport::default());
    }
    let moved = advance_entities(state, config);
    let (mut next, report) = resolve_collisions(&moved, config);
    next.frame = state.frame + 1;
    (next, report)
}

// ── Run control ──────────────────────────────────────────────────────────────

pub fn open_menu(state: &GameState) -> GameState {
    match state.status {
        GameStatus::Running => GameState {
            status: GameStatus::Paused(PauseReason::Menu),
            ..state.clone()
        },
        // Opening the menu over a defeat keeps the defeat.
        GameStatus::Paused(_) => state.clone(),
    }
}

/// Leave the menu.  A defeated run stays paused; only a restart clears it.
pub fn resume_game(state: &GameState) -> GameState {
    match state.status {
        GameStatus::Paused(PauseReason::Menu) => GameState {
            status: GameStatus::Running,
            ..state.clone()
        },
        _ => state.clone(),
    }
}

/// Throw the run away and start over.  Only the simulation is reset; the
/// caller's timers keep their phase.
pub fn restart_game(config: &GameConfig) -> GameState {
    init_state(config)
}
