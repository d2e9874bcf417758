/// Currency-gated upgrades.
///
/// Both purchases either fully apply or leave the state untouched, and
/// report what happened through `Purchase` so the UI decides how to show it.

use std::fmt;

use crate::config::GameConfig;
use crate::entities::{GameEconomy, GameState, Wingman};

#[derive(Clone, Debug, PartialEq)]
pub enum Purchase {
    FireRateUpgraded { level: u32, interval_ms: u32 },
    /// Capstone upgrade at max level: wingmen join instead of a faster gun.
    WingmenDeployed,
    ShieldAdded { shields: u32 },
    InsufficientFunds { cost: u32, currency: u32 },
    AlreadyMaxed,
}

impl Purchase {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Purchase::FireRateUpgraded { .. } | Purchase::WingmenDeployed | Purchase::ShieldAdded { .. }
        )
    }
}

impl fmt::Display for Purchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FireRateUpgraded { level, interval_ms } => {
                write!(f, "Fire rate upgraded to level {level} ({interval_ms}ms)")
            }
            Self::WingmenDeployed => write!(f, "Super upgrade! Wingmen deployed"),
            Self::ShieldAdded { shields } => write!(f, "Shield +1 ({shields} total)"),
            Self::InsufficientFunds { cost, currency } => {
                write!(f, "Not enough gold: need {cost}, have {currency}")
            }
            Self::AlreadyMaxed => write!(f, "Fire rate already at max level"),
        }
    }
}

pub fn upgrade_fire_rate(state: &GameState, config: &GameConfig) -> (GameState, Purchase) {
    let eco = &state.economy;
    if eco.fire_rate_level >= config.max_fire_rate_level {
        return (state.clone(), Purchase::AlreadyMaxed);
    }
    if eco.currency < config.fire_rate_cost {
        return (
            state.clone(),
            Purchase::InsufficientFunds {
                cost: config.fire_rate_cost,
                currency: eco.currency,
            },
        );
    }

    let level = eco.fire_rate_level + 1;
    let currency = eco.currency - config.fire_rate_cost;

    if level < config.max_fire_rate_level {
        let interval_ms = eco
            .bullet_interval_ms
            .saturating_sub(config.bullet_interval_step_ms)
            .max(config.bullet_interval_floor_ms);
        tracing::info!(level, interval_ms, "fire rate upgraded");
        let next = GameState {
            economy: GameEconomy {
                fire_rate_level: level,
                currency,
                bullet_interval_ms: interval_ms,
                ..eco.clone()
            },
            ..state.clone()
        };
        return (next, Purchase::FireRateUpgraded { level, interval_ms });
    }

    tracing::info!(level, "wingmen deployed");
    let wingmen = config
        .wingman_offsets
        .iter()
        .map(|&offset_x| Wingman { offset_x })
        .collect();
    let next = GameState {
        economy: GameEconomy {
            fire_rate_level: level,
            currency,
            has_wingmen: true,
            ..eco.clone()
        },
        wingmen,
        ..state.clone()
    };
    (next, Purchase::WingmenDeployed)
}

pub fn buy_shield(state: &GameState, config: &GameConfig) -> (GameState, Purchase) {
    let eco = &state.economy;
    if eco.currency < config.shield_cost {
        return (
            state.clone(),
            Purchase::InsufficientFunds {
                cost: config.shield_cost,
                currency: eco.currency,
            },
        );
    }

    let shields = eco.shield_count + 1;
    tracing::info!(shields, "shield purchased");
    let next = GameState {
        economy: GameEconomy {
            shield_count: shields,
            currency: eco.currency - config.shield_cost,
            ..eco.clone()
        },
        ..state.clone()
    };
    (next, Purchase::ShieldAdded { shields })
}
