/// Tuning knobs for a run, loadable from a JSON file.
///
/// Every field has a default matching the stock game, and a config file
/// only needs to name the values it changes.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "malformed config {}: {source}", path.display())
            }
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

// ── Sprite glyphs ─────────────────────────────────────────────────────────────

/// Terminal stand-ins for the sprite images.  A `None` (or a missing enemy
/// entry) means the sprite is unavailable and gets drawn as a solid block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteGlyphs {
    pub player: Option<char>,
    pub wingman: Option<char>,
    pub bullet: Option<char>,
    pub enemies: Vec<char>,
}

impl Default for SpriteGlyphs {
    fn default() -> Self {
        SpriteGlyphs {
            player: Some('▲'),
            wingman: Some('△'),
            bullet: Some('│'),
            enemies: vec!['◆', '◇', '●', '◎', '■', '□', '▼'],
        }
    }
}

impl SpriteGlyphs {
    /// Every sprite missing: the whole scene renders as coloured blocks.
    pub fn none() -> Self {
        SpriteGlyphs {
            player: None,
            wingman: None,
            bullet: None,
            enemies: Vec::new(),
        }
    }
}

// ── Game config ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // Play field (pixels)
    pub field_width: f32,
    pub field_height: f32,

    // Player
    pub player_width: f32,
    pub player_height: f32,
    pub player_start_x: f32,
    pub player_start_y: f32,
    /// Pixels moved per keyboard step.
    pub player_key_step: f32,

    // Bullets
    pub bullet_width: f32,
    pub bullet_height: f32,
    /// Drawn size; may differ from the collision box.
    pub bullet_draw_width: f32,
    pub bullet_draw_height: f32,
    pub bullet_speed: f32,

    // Wingmen
    pub wingman_offsets: Vec<f32>,
    /// Wingman sprite size relative to the player.
    pub wingman_scale: f32,
    /// Vertical offset of wingmen (and their bullets) below the player top.
    pub wingman_drop: f32,

    // Enemies
    pub enemy_base_size: f32,
    pub enemy_base_speed: f32,
    pub enemy_min_scale: f32,
    pub enemy_max_scale: f32,
    pub enemy_spawn_y: f32,
    pub enemy_variants: usize,

    // Spawn cadence
    pub adaptive_spawn: bool,
    pub spawn_interval_ms: f64,
    pub spawn_speedup_ratio: f64,
    pub spawn_interval_floor_ms: f64,
    pub spawn_threshold_step: u32,

    // Economy
    pub kill_reward: u32,
    pub bullet_interval_ms: u32,
    pub bullet_interval_step_ms: u32,
    pub bullet_interval_floor_ms: u32,
    pub max_fire_rate_level: u32,
    pub fire_rate_cost: u32,
    pub shield_cost: u32,

    // Presentation
    pub star_count: usize,
    pub frame_ms: u64,
    pub sprites: SpriteGlyphs,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            field_width: 400.0,
            field_height: 640.0,

            player_width: 80.0,
            player_height: 80.0,
            player_start_x: 160.0,
            player_start_y: 500.0,
            player_key_step: 12.0,

            bullet_width: 4.0,
            bullet_height: 10.0,
            bullet_draw_width: 4.0,
            bullet_draw_height: 10.0,
            bullet_speed: 6.0,

            wingman_offsets: vec![-50.0, 50.0],
            wingman_scale: 0.6,
            wingman_drop: 10.0,

            enemy_base_size: 30.0,
            enemy_base_speed: 5.0,
            enemy_min_scale: 1.0,
            enemy_max_scale: 3.0,
            enemy_spawn_y: -30.0,
            enemy_variants: 7,

            adaptive_spawn: true,
            spawn_interval_ms: 1000.0,
            spawn_speedup_ratio: 0.85,
            spawn_interval_floor_ms: 180.0,
            spawn_threshold_step: 260,

            kill_reward: 10,
            bullet_interval_ms: 300,
            bullet_interval_step_ms: 30,
            bullet_interval_floor_ms: 50,
            max_fire_rate_level: 10,
            fire_rate_cost: 80,
            shield_cost: 50,

            star_count: 300,
            frame_ms: 16, // ≈60 FPS, one animation callback per frame
            sprites: SpriteGlyphs::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(text).map_err(|source| ConfigError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text, path)?;
        tracing::info!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "field must be positive, got {}x{}",
                self.field_width, self.field_height
            )));
        }
        let sizes = [
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("enemy_base_size", self.enemy_base_size),
            // Bullets and enemies are only pruned once they move off the field.
            ("bullet_speed", self.bullet_speed),
            ("enemy_base_speed", self.enemy_base_speed),
        ];
        if let Some((name, value)) = sizes.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "{name} must be positive, got {value}"
            )));
        }
        if self.wingman_offsets.len() != 2 {
            return Err(ConfigError::Invalid(format!(
                "wingman_offsets needs exactly 2 entries, got {}",
                self.wingman_offsets.len()
            )));
        }
        if self.enemy_min_scale <= 0.0|| self.enemy_min_scale >= self.enemy_max_scale {
            return Err(ConfigError::Invalid(format!(
                "enemy scale range [{}, {}) is empty or non-positive",
                self.enemy_min_scale, self.enemy_max_scale
            )));
        }
        if self.enemy_variants == 0 {
            return Err(ConfigError::Invalid("enemy_variants must be at least 1".into()));
        }
        if self.max_fire_rate_level < 1 {
            return Err(ConfigError::Invalid("max_fire_rate_level must be at least 1".into()));
        }
        if self.bullet_interval_floor_ms == 0
            || self.bullet_interval_floor_ms > self.bullet_interval_ms
        {
            return Err(ConfigError::Invalid(format!(
                "bullet interval floor {}ms must be in 1..={}ms",
                self.bullet_interval_floor_ms, self.bullet_interval_ms
            )));
        }
        if self.spawn_interval_floor_ms <= 0.0
            || self.spawn_interval_floor_ms > self.spawn_interval_ms
        {
            return Err(ConfigError::Invalid(format!(
                "spawn interval floor {}ms must be in (0, {}]ms",
                self.spawn_interval_floor_ms, self.spawn_interval_ms
            )));
        }
        if !(self.spawn_speedup_ratio > 0.0 && self.spawn_speedup_ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "spawn_speedup_ratio must be in (0, 1], got {}",
                self.spawn_speedup_ratio
            )));
        }
        if self.frame_ms == 0 {
            return Err(ConfigError::Invalid("frame_ms must be at least 1".into()));
        }
        Ok(())
    }
}
