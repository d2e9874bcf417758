/// Rendering layer — all terminal I/O lives here.
///
/// The core draws in play-field pixels onto a `Surface`; `TerminalSurface`
/// rasterises those primitives into a grid of character cells and flushes
/// the grid with crossterm.  The HUD row, the controls hint and the menu
/// overlay are drawn straight from the game state.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use sky_raider::config::GameConfig;
use sky_raider::entities::{GameState, GameStatus, PauseReason, Rect};
use sky_raider::render::{GlyphSheet, Rgb, Sprite, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_GOLD: Color = Color::DarkYellow;
const C_HUD_RATE: Color = Color::Cyan;
const C_HUD_SHIELD: Color = Color::Green;
const C_HUD_FLASH: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_MENU: Color = Color::Cyan;
const C_DEFEAT: Color = Color::Red;

/// Sprite glyph colours (the fallback blocks use the core palette).
const C_SPRITE_PLAYER: Color = Color::White;
const C_SPRITE_WINGMAN: Color = Color::Yellow;
const C_SPRITE_BULLET: Color = Color::Cyan;
const C_SPRITE_ENEMIES: [Color; 7] = [
    Color::Grey,
    Color::DarkGrey,
    Color::Grey,
    Color::White,
    Color::Blue,
    Color::Yellow,
    Color::DarkYellow,
];

/// Rows above the play field (HUD) and below it (controls hint).
const TOP_ROWS: u16 = 1;
const BOTTOM_ROWS: u16 = 1;

fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── Cell surface ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::Reset,
};

/// A `Surface` that maps the pixel play field onto terminal cells.
pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    field_w: f32,
    field_h: f32,
    cells: Vec<Cell>,
    glyphs: GlyphSheet,
}

impl TerminalSurface {
    pub fn new(term_width: u16, term_height: u16, config: &GameConfig, glyphs: GlyphSheet) -> Self {
        let mut surface = TerminalSurface {
            cols: 0,
            rows: 0,
            field_w: config.field_width,
            field_h: config.field_height,
            cells: Vec::new(),
            glyphs,
        };
        surface.resize(term_width, term_height);
        surface
    }

    pub fn resize(&mut self, term_width: u16, term_height: u16) {
        self.cols = term_width.max(1);
        self.rows = term_height.saturating_sub(TOP_ROWS + BOTTOM_ROWS).max(1);
        self.cells = vec![BLANK; self.cols as usize * self.rows as usize];
    }

    fn cell_w(&self) -> f32 {
        self.field_w / self.cols as f32
    }

    fn cell_h(&self) -> f32 {
        self.field_h / self.rows as f32
    }

    /// Terminal cell → play-field pixel at the centre of that cell.
    /// `None` when the cell is on the HUD or hint rows.
    pub fn cell_to_field(&self, col: u16, row: u16) -> Option<(f32, f32)> {
        if row < TOP_ROWS || row >= TOP_ROWS + self.rows {
            return None;
        }
        let x = (col as f32 + 0.5) * self.cell_w();
        let y = ((row - TOP_ROWS) as f32 + 0.5) * self.cell_h();
        Some((x, y))
    }

    /// Cell span covered by a pixel rectangle, clipped to the grid.
    /// Every visible rectangle covers at least one cell.
    fn span(&self, rect: Rect) -> Option<(u16, u16, u16, u16)> {
        let c0 = (rect.x / self.cell_w()).floor();
        let r0 = (rect.y / self.cell_h()).floor();
        let c1 = ((rect.x + rect.w) / self.cell_w()).ceil().max(c0 + 1.0);
        let r1 = ((rect.y + rect.h) / self.cell_h()).ceil().max(r0 + 1.0);

        let (cols, rows) = (self.cols as f32, self.rows as f32);
        if c1 <= 0.0 || r1 <= 0.0 || c0 >= cols || r0 >= rows {
            return None;
        }
        Some((
            c0.max(0.0) as u16,
            r0.max(0.0) as u16,
            c1.min(cols) as u16,
            r1.min(rows) as u16,
        ))
    }

    fn put(&mut self, col: u16, row: u16, cell: Cell) {
        if col < self.cols && row < self.rows {
            let idx = row as usize * self.cols as usize + col as usize;
            self.cells[idx] = cell;
        }
    }

    fn get(&self, col: u16, row: u16) -> Cell {
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    fn fill_span(&mut self, rect: Rect, cell: Cell) {
        if let Some((c0, r0, c1, r1)) = self.span(rect) {
            for row in r0..r1 {
                for col in c0..c1 {
                    self.put(col, row, cell);
                }
            }
        }
    }

    fn sprite_color(sprite: Sprite) -> Color {
        match sprite {
            Sprite::Player => C_SPRITE_PLAYER,
            Sprite::Wingman => C_SPRITE_WINGMAN,
            Sprite::Bullet => C_SPRITE_BULLET,
            Sprite::Enemy(v) => C_SPRITE_ENEMIES[v % C_SPRITE_ENEMIES.len()],
        }
    }

    /// Write the play field rows to the terminal.
    pub fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, TOP_ROWS + row))?;
            let mut current: Option<Color> = None;
            let mut line = String::with_capacity(self.cols as usize);
            for col in 0..self.cols {
                let cell = self.get(col, row);
                if current != Some(cell.fg) {
                    if !line.is_empty() {
                        out.queue(Print(&line))?;
                        line.clear();
                    }
                    out.queue(style::SetForegroundColor(cell.fg))?;
                    current = Some(cell.fg);
                }
                line.push(cell.ch);
            }
            out.queue(Print(&line))?;
        }
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn clear(&mut self, _color: Rgb) {
        // The terminal background is the sky.
        self.cells.iter_mut().for_each(|c| *c = BLANK);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.fill_span(rect, Cell { ch: '█', fg: to_color(color) });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb) {
        let Some((c0, r0, c1, r1)) = self.span(rect) else {
            return;
        };
        let fg = to_color(color);
        let (right, bottom) = (c1 - 1, r1 - 1);
        for col in c0..c1 {
            self.put(col, r0, Cell { ch: '─', fg });
            self.put(col, bottom, Cell { ch: '─', fg });
        }
        for row in r0..r1 {
            self.put(c0, row, Cell { ch: '│', fg });
            self.put(right, row, Cell { ch: '│', fg });
        }
        self.put(c0, r0, Cell { ch: '┌', fg });
        self.put(right, r0, Cell { ch: '┐', fg });
        self.put(c0, bottom, Cell { ch: '└', fg });
        self.put(right, bottom, Cell { ch: '┘', fg });
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let col = (x / self.cell_w()) as u16;
        let row = (y / self.cell_h()) as u16;
        if col >= self.cols || row >= self.rows || self.get(col, row) != BLANK {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let shade = |v: u8| (v as f32 * a) as u8;
        let fg = Color::Rgb {
            r: shade(color.0),
            g: shade(color.1),
            b: shade(color.2),
        };
        let ch = if radius >= 1.5 { '•' } else { '·' };
        self.put(col, row, Cell { ch, fg });
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        let ch = self.glyphs.glyph(sprite).unwrap_or('█');
        self.fill_span(rect, Cell { ch, fg: Self::sprite_color(sprite) });
    }
}

// ── UI overlay state (owned by the game loop) ────────────────────────────────

pub struct UiView<'a> {
    pub best_score: u32,
    /// Highlight the HUD (a value on it just changed).
    pub hud_flash: bool,
    /// Last purchase / status message.
    pub notice: Option<&'a str>,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame: play field, HUD, hint and (when paused) menu.
pub fn render<W: Write>(
    out: &mut W,
    surface: &TerminalSurface,
    state: &GameState,
    config: &GameConfig,
    ui: &UiView<'_>,
) -> std::io::Result<()> {
    surface.flush(out)?;
    draw_hud(out, state, surface.cols, ui)?;
    match state.status {
        GameStatus::Paused(reason) => {
            draw_controls_hint(out, TOP_ROWS + surface.rows, None)?;
            draw_menu(out, state, config, reason, surface, ui)?;
        }
        GameStatus::Running => draw_controls_hint(out, TOP_ROWS + surface.rows, ui.notice)?,
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, TOP_ROWS + surface.rows))?;
    out.flush()?;
    Ok(())
}

/// Wipe the screen (used on start-up and after a resize).
pub fn clear_screen<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.flush()
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    ui: &UiView<'_>,
) -> std::io::Result<()> {
    let eco = &state.economy;
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    out.queue(cursor::MoveTo(1, 0))?;

    let shield = if eco.shield_count > 0 {
        format!("Shield:{}", eco.shield_count)
    } else {
        "Shield:off".to_string()
    };
    let parts: [(String, Color); 4] = [
        (format!("Score:{:>6}", eco.score), C_HUD_SCORE),
        (format!("Gold:{:>5}", eco.currency), C_HUD_GOLD),
        (format!("Rate:Lv{:<2}", eco.fire_rate_level), C_HUD_RATE),
        (shield, C_HUD_SHIELD),
    ];
    for (text, color) in parts.iter() {
        let color = if ui.hud_flash { C_HUD_FLASH } else { *color };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(text))?;
        out.queue(Print("  "))?;
    }

    if ui.best_score > 0 {
        let best = format!("Best:{:>6}", ui.best_score);
        let x = width.saturating_sub(best.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(x, 0))?;
        out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
        out.queue(Print(best))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

/// While running, a fresh notice (e.g. a purchase result) replaces the hint.
fn draw_controls_hint<W: Write>(
    out: &mut W,
    row: u16,
    notice: Option<&str>,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, row))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    out.queue(cursor::MoveTo(1, row))?;
    match notice {
        Some(text) => {
            out.queue(style::SetForegroundColor(Color::Yellow))?;
            out.queue(Print(text))?;
        }
        None => {
            out.queue(style::SetForegroundColor(C_HINT))?;
            out.queue(Print(
                "Mouse / ←→↑↓ WAD : Move   U : Upgrade   S : Shield   M : Menu   Q : Quit",
            ))?;
        }
    }
    Ok(())
}

// ── Menu overlay ──────────────────────────────────────────────────────────────

fn draw_menu<W: Write>(
    out: &mut W,
    state: &GameState,
    config: &GameConfig,
    reason: PauseReason,
    surface: &TerminalSurface,
    ui: &UiView<'_>,
) -> std::io::Result<()> {
    let (title, title_color) = match reason {
        PauseReason::Menu => ("║       PAUSED       ║", C_MENU),
        PauseReason::Defeated => ("║   YOU WERE HIT!    ║", C_DEFEAT),
    };
    let upgrade = if state.economy.fire_rate_level >= config.max_fire_rate_level {
        "[U] Fire rate  (MAX)".to_string()
    } else {
        format!("[U] Fire rate  ({} gold)", config.fire_rate_cost)
    };
    let shield = format!("[S] Shield     ({} gold)", config.shield_cost);
    let score = format!("Score: {:>6}", state.economy.score);

    let mut lines: Vec<(String, Color)> = vec![
        ("╔════════════════════╗".to_string(), title_color),
        (title.to_string(), title_color),
        ("╚════════════════════╝".to_string(), title_color),
        (score, C_HUD_SCORE),
    ];
    if reason == PauseReason::Menu {
        lines.push(("[R] Resume".to_string(), Color::White));
    }
    lines.push((upgrade, Color::White));
    lines.push((shield, Color::White));
    lines.push(("[N] New game   [Q] Quit".to_string(), Color::White));
    if let Some(notice) = ui.notice {
        lines.push((notice.to_string(), Color::Yellow));
    }

    let cx = surface.cols / 2;
    let field_mid = TOP_ROWS + surface.rows / 2;
    let start_row = field_mid.saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}
