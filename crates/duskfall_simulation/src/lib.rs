//! DUSKFALL Simulation Core
//!
//! Headless ECS-симуляция враждебных акторов на Bevy 0.16.
//! Слой решений (decide pass, Update) + непрерывная hover-физика
//! (integrate pass, FixedUpdate) для двух вариантов комбатантов:
//! наземного и летающего.
//!
//! Архитектура:
//! - ECS = simulation layer (AI state machine, combat rules, damage)
//! - Презентация (анимации, звук) = внешний слой, получает
//!   PresentationSignal события fire-and-forget

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod logger;
pub mod physics;
pub mod presentation;
pub mod shared;

// Re-export базовых типов для удобства
pub use ai::{
    spawn_aerial_combatant, spawn_ground_combatant, AerialCombatant, AerialConfig,
    GroundCombatant, GroundConfig,
};
pub use combat::{ApplyDamage, AttackStage, DamageDealt, Dead, DespawnAfter, EntityDied, HitCheckpoint};
pub use components::*;
pub use logger::{init_logger, log, log_info, log_warning};
pub use physics::{GroundLevel, PhysicsBody};
pub use presentation::PresentationSignal;
pub use shared::census::faction_presence;

pub use logger::log_error;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для integrate pass (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            // Уровень земли для landing detection падающих трупов
            .insert_resource(GroundLevel::default())
            // Подсистемы
            .add_plugins((
                presentation::PresentationPlugin,
                physics::PhysicsPlugin,
                combat::CombatPlugin,
                ai::AiPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// RNG вставляется после plugin'а, чтобы seed не затёрся дефолтным.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}
