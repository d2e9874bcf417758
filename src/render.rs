/// Scene drawing against an abstract 2D surface.
///
/// The core never knows what it is drawing on: it issues rectangle, circle
/// and sprite primitives in play-field pixels, and asks the `AssetStore`
/// whether a sprite is available before using it.  Anything unavailable is
/// drawn as a solid rectangle instead.

use crate::config::{GameConfig, SpriteGlyphs};
use crate::entities::{GameState, Rect};
use crate::starfield::Starfield;

// ── Colour palette ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const C_BACKGROUND: Rgb = Rgb(0, 0, 0);
pub const C_BORDER: Rgb = Rgb(0, 255, 255);
pub const C_STAR: Rgb = Rgb(255, 255, 255);
pub const C_PLAYER: Rgb = Rgb(0, 0, 255);
pub const C_WINGMAN: Rgb = Rgb(255, 170, 0);
pub const C_BULLET: Rgb = Rgb(255, 255, 255);
pub const C_ENEMY: Rgb = Rgb(255, 68, 68);

// ── Seams ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    Player,
    Wingman,
    Bullet,
    /// One of the enemy art variants.
    Enemy(usize),
}

/// Answers "is this image ready to draw".
pub trait AssetStore {
    fn is_ready(&self, sprite: Sprite) -> bool;
}

/// A 2D drawing context measured in play-field pixels.
pub trait Surface {
    fn clear(&mut self, color: Rgb);
    fn fill_rect(&mut self, rect: Rect, color: Rgb);
    fn stroke_rect(&mut self, rect: Rect, color: Rgb);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32);
    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect);
}

// ── Glyph sheet ───────────────────────────────────────────────────────────────

/// Asset store backed by the configured sprite glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphSheet {
    glyphs: SpriteGlyphs,
}

impl GlyphSheet {
    pub fn new(glyphs: SpriteGlyphs) -> Self {
        GlyphSheet { glyphs }
    }

    pub fn glyph(&self, sprite: Sprite) -> Option<char> {
        match sprite {
            Sprite::Player => self.glyphs.player,
            Sprite::Wingman => self.glyphs.wingman,
            Sprite::Bullet => self.glyphs.bullet,
            Sprite::Enemy(variant) => self.glyphs.enemies.get(variant).copied(),
        }
    }
}

impl AssetStore for GlyphSheet {
    fn is_ready(&self, sprite: Sprite) -> bool {
        self.glyph(sprite).is_some()
    }
}

// ── Frame ─────────────────────────────────────────────────────────────────────

fn sprite_or_block<S: Surface>(
    surface: &mut S,
    assets: &impl AssetStore,
    sprite: Sprite,
    rect: Rect,
    fallback: Rgb,
) {
    if assets.is_ready(sprite) {
        surface.draw_sprite(sprite, rect);
    } else {
        surface.fill_rect(rect, fallback);
    }
}

/// Draw one complete frame: sky, border, ship, wingmen, bullets, enemies.
pub fn render_frame<S: Surface>(
    surface: &mut S,
    assets: &impl AssetStore,
    state: &GameState,
    starfield: &Starfield,
    config: &GameConfig,
) {
    surface.clear(C_BACKGROUND);

    for star in &starfield.particles {
        surface.fill_circle(star.x, star.y, star.radius, C_STAR, star.alpha);
    }

    surface.stroke_rect(Rect::new(0.0, 0.0, state.width, state.height), C_BORDER);

    let player = &state.player;
    sprite_or_block(surface, assets, Sprite::Player, player.rect(), C_PLAYER);

    if state.economy.has_wingmen {
        let w = player.width * config.wingman_scale;
        let h = player.height * config.wingman_scale;
        for wingman in &state.wingmen {
            let x = player.center_x() + wingman.offset_x - w / 2.0;
            let y = player.y + config.wingman_drop;
            sprite_or_block(surface, assets, Sprite::Wingman, Rect::new(x, y, w, h), C_WINGMAN);
        }
    }

    for bullet in &state.bullets {
        let rect = Rect::new(
            bullet.x,
            bullet.y,
            config.bullet_draw_width,
            config.bullet_draw_height,
        );
        sprite_or_block(surface, assets, Sprite::Bullet, rect, C_BULLET);
    }

    // The enemy's fallback flag was decided at spawn time.
    for enemy in &state.enemies {
        let size = config.enemy_base_size * enemy.scale;
        let rect = Rect::new(enemy.x, enemy.y, size, size);
        if enemy.fallback {
            surface.fill_rect(rect, C_ENEMY);
        } else {
            surface.draw_sprite(Sprite::Enemy(enemy.variant), rect);
        }
    }
}
