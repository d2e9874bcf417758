/// One play session: the game state, the timers that feed it, and the
/// command surface the UI calls into.
///
/// Everything runs on the caller's thread.  Each call (`advance` or a
/// command) runs to completion before the next one starts, so the spawn
/// timer, the fire timer and the frame step never see each other
/// mid-update.  To drive a session from several threads, put it behind a
/// single `Mutex` rather than sharing pieces of it.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::compute;
use crate::config::GameConfig;
use crate::economy::{self, Purchase};
use crate::entities::{GameState, GameStatus, PauseReason};
use crate::render::{self, AssetStore, Sprite, Surface};
use crate::starfield::Starfield;
use crate::timer::IntervalTimer;

/// A slow frame (terminal resize, suspended process) is replayed as at most
/// this much time so the timers don't fire a burst of catch-up volleys.
pub const MAX_FRAME_DT_MS: f64 = 250.0;

/// Notifications for the UI layer, drained with `take_events`.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// Score, currency, fire-rate level or shield count changed.
    HudChanged,
    MenuShown(PauseReason),
    MenuHidden,
    /// The player was hit with no shield; the run is over until restart.
    Defeated { score: u32 },
}

pub struct GameSession<A: AssetStore> {
    config: GameConfig,
    state: GameState,
    starfield: Starfield,
    spawn_timer: IntervalTimer,
    fire_timer: IntervalTimer,
    assets: A,
    rng: StdRng,
    events: Vec<GameEvent>,
}

impl<A: AssetStore> GameSession<A> {
    pub fn new(config: GameConfig, assets: A, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, assets, rng)
    }

    pub fn with_rng(config: GameConfig, assets: A, mut rng: StdRng) -> Self {
        let state = compute::init_state(&config);
        let starfield = Starfield::new(
            config.star_count,
            config.field_width,
            config.field_height,
            &mut rng,
        );
        GameSession {
            config,
            state,
            starfield,
            // Both loops run their body once as soon as the game starts.
            spawn_timer: IntervalTimer::primed(),
            fire_timer: IntervalTimer::primed(),
            assets,
            rng,
            events: vec![GameEvent::HudChanged],
        }
    }

    /// Start from a prepared state instead of a fresh run.  Timers and the
    /// starfield are kept as they are.
    pub fn with_state(mut self, state: GameState) -> Self {
        self.state = state;
        self.events.push(GameEvent::HudChanged);
        self
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Scheduling ───────────────────────────────────────────────────────────

    /// Let `dt_ms` of wall time pass: run any due spawner and weapon ticks,
    /// then one frame step.  Timers keep counting while paused; their
    /// ticks just don't do anything.
    pub fn advance(&mut self, dt_ms: f64) {
        let dt = dt_ms.clamp(0.0, MAX_FRAME_DT_MS);

        self.spawn_timer.advance(dt);
        while self.spawn_timer.try_fire(self.state.spawn.interval_ms) {
            self.spawn_tick();
        }

        // Interval is re-read per cycle so an upgrade applies immediately.
        self.fire_timer.advance(dt);
        while self
            .fire_timer
            .try_fire(f64::from(self.state.economy.bullet_interval_ms))
        {
            self.fire_tick();
        }

        self.step_frame();
    }

    pub fn spawn_tick(&mut self) {
        let assets = &self.assets;
        self.state = compute::spawn_enemy(&self.state, &self.config, &mut self.rng, |variant| {
            assets.is_ready(Sprite::Enemy(variant))
        });
        self.state = compute::accelerate_spawn(&self.state, &self.config);
    }

    pub fn fire_tick(&mut self) {
        self.state = compute::fire_volley(&self.state, &self.config);
    }

    /// One animation frame of simulation.  No-op while paused.
    pub fn step_frame(&mut self) {
        if self.state.status.is_paused() {
            return;
        }
        self.starfield.update(&mut self.rng);

        let (next, report) = compute::tick(&self.state, &self.config);
        self.state = next;

        if report.hud_changed() {
            self.events.push(GameEvent::HudChanged);
        }
        if report.defeated {
            let score = self.state.economy.score;
            tracing::info!(score, frame = self.state.frame, "player defeated");
            self.events.push(GameEvent::Defeated { score });
            self.events.push(GameEvent::MenuShown(PauseReason::Defeated));
        }
    }

    pub fn render<S: Surface>(&self, surface: &mut S) {
        render::render_frame(surface, &self.assets, &self.state, &self.starfield, &self.config);
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn set_player_position(&mut self, x: f32, y: f32) {
        self.state = compute::set_player_position(&self.state, x, y);
    }

    /// Centre the ship on a pointer position.
    pub fn point_player_at(&mut self, x: f32, y: f32) {
        let p = &self.state.player;
        let (x, y) = (x - p.width / 2.0, y - p.height / 2.0);
        self.set_player_position(x, y);
    }

    pub fn nudge_player(&mut self, dx: f32, dy: f32) {
        if self.state.status == GameStatus::Running {
            self.state = compute::nudge_player(&self.state, dx, dy);
        }
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    pub fn open_menu(&mut self) {
        if self.state.status == GameStatus::Running {
            self.state = compute::open_menu(&self.state);
            self.events.push(GameEvent::MenuShown(PauseReason::Menu));
        }
    }

    /// Returns whether the run actually resumed (a defeat needs a restart).
    pub fn resume_game(&mut self) -> bool {
        let next = compute::resume_game(&self.state);
        let resumed = next.status != self.state.status;
        self.state = next;
        if resumed {
            self.events.push(GameEvent::MenuHidden);
        }
        resumed
    }

    pub fn restart_game(&mut self) {
        tracing::info!(score = self.state.economy.score, "run restarted");
        self.state = compute::restart_game(&self.config);
        self.events.push(GameEvent::MenuHidden);
        self.events.push(GameEvent::HudChanged);
    }

    pub fn upgrade_fire_rate(&mut self) -> Purchase {
        let (next, outcome) = economy::upgrade_fire_rate(&self.state, &self.config);
        self.apply_purchase(next, outcome)
    }

    pub fn buy_shield(&mut self) -> Purchase {
        let (next, outcome) = economy::buy_shield(&self.state, &self.config);
        self.apply_purchase(next, outcome)
    }

    fn apply_purchase(&mut self, next: GameState, outcome: Purchase) -> Purchase {
        if outcome.is_success() {
            self.state = next;
            self.events.push(GameEvent::HudChanged);
        } else {
            tracing::debug!(%outcome, "purchase rejected");
        }
        outcome
    }
}
