//! Decision state machines враждебных акторов (decide pass)
//!
//! Два варианта с одной формой решения:
//! - ground: линейный патруль, melee combo ×3, dash-charge по cooldown
//! - aerial: прямоугольный случайный патруль, combo ×2 + retreat,
//!   hover-цели для физического интегратора
//!
//! Оба — time-gated FSM с re-entrant interrupt handling: hurt-stun и
//! action lock проверяются раньше ветвления и жёстко обрывают tick.

use bevy::prelude::*;

pub mod aerial;
pub mod ground;

// Re-export основных типов
pub use aerial::{spawn_aerial_combatant, AerialCombatant, AerialConfig};
pub use ground::{spawn_ground_combatant, GroundCombatant, GroundConfig};

/// AI Plugin
///
/// Decide pass живёт в Update (per-visual-frame), в отличие от
/// integrate pass'а физики (FixedUpdate). Порядок:
/// 1. tick_hurt_reactions (presentation) — playback двигается до решения
/// 2. ground_decide
/// 3. aerial_decide
pub struct AiPlugin;

impl Plugin for AiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (ground::ground_decide, aerial::aerial_decide)
                .chain()
                .after(crate::presentation::tick_hurt_reactions),
        );
    }
}
