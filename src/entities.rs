/// All game entity types — pure data, no logic.
///
/// Coordinates are pixels in the play field; `(0, 0)` is the top-left
/// corner and `y` grows downward.

// ── Run state ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseReason {
    /// The player opened the menu; `resume_game` continues the run.
    Menu,
    /// The player was hit with no shield left; only a restart continues.
    Defeated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Paused(PauseReason),
}

impl GameStatus {
    pub fn is_paused(&self) -> bool {
        matches!(self, GameStatus::Paused(_))
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle used for both collision and drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Strict overlap: boxes that only touch along an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

// ── Player & wingmen ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// An auxiliary emitter fixed at a horizontal offset from the player centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wingman {
    pub offset_x: f32,
}

// ── Projectiles & enemies ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    /// Pixels per frame; always `base_speed / scale`.
    pub speed: f32,
    /// Size multiplier in `[1, 3)`; bigger enemies fall slower.
    pub scale: f32,
    /// Which of the enemy sprites this enemy is drawn with.
    pub variant: usize,
    /// Draw a solid block instead of the sprite (sprite was not ready at spawn).
    pub fallback: bool,
}

// ── Cosmetic background ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct StarParticle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
    pub speed_x: f32,
    pub speed_y: f32,
}

// ── Economy ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct GameEconomy {
    /// Kill score (+reward per enemy destroyed).
    pub score: u32,
    pub currency: u32,
    pub fire_rate_level: u32,
    /// Milliseconds between volleys.
    pub bullet_interval_ms: u32,
    pub shield_count: u32,
    pub has_wingmen: bool,
}

/// Adaptive spawn cadence.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnSchedule {
    pub interval_ms: f64,
    /// Score at which the cadence next speeds up.
    pub next_threshold: u32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulated state of one run.  Cloneable so the per-frame
/// update can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub wingmen: Vec<Wingman>,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub economy: GameEconomy,
    pub spawn: SpawnSchedule,
    pub status: GameStatus,
    pub frame: u64,
    pub width: f32,
    pub height: f32,
}
