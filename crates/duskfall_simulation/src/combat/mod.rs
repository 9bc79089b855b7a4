//! Combat system module
//!
//! ECS ответственность:
//! - Damage contract: ApplyDamage событие (consumed и exposed)
//! - Hit checkpoints: overlap query по якорю атаки (animation-timeline driven)
//! - Death: одна фаза (наземный) / две фазы fall-then-land (летающий)
//! - DespawnAfter: структурное удаление после 2s grace
//!
//! Презентация (animation timing, звук) — внешний слой, ядро лишь
//! эмитит PresentationSignal события.

use bevy::prelude::*;

pub mod damage;
pub mod death;
pub mod hit_check;

// Re-export основных типов
pub use damage::{apply_damage, ApplyDamage, DamageDealt, EntityDied};
pub use death::{Dead, DespawnAfter, DESPAWN_GRACE};
pub use hit_check::{AttackStage, HitCheckpoint, FINISHER_DAMAGE_MULTIPLIER};

/// Combat Plugin
///
/// Порядок выполнения в Update:
/// 1. process_hit_checkpoints — overlap атак → ApplyDamage
/// 2. apply_damage — контракт урона (hurt, combo reset, death trigger)
/// 3. handle_ground_death — одна фаза смерти наземного
/// 4. begin_aerial_fall — фаза 1 смерти летающего (импульс + гравитация)
/// 5. despawn_after_timeout — удаление трупов после grace delay
///
/// detect_fall_landing (фаза 2) живёт в FixedUpdate после интеграции
/// velocity, потому что контакт с землёй — факт физического tick'а.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<ApplyDamage>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<HitCheckpoint>();

        app.add_systems(
            Update,
            (
                hit_check::process_hit_checkpoints,
                damage::apply_damage,
                death::handle_ground_death,
                death::begin_aerial_fall,
                death::despawn_after_timeout,
            )
                .chain(), // Последовательное выполнение
        );

        app.add_systems(
            FixedUpdate,
            death::detect_fall_landing.after(crate::physics::body::integrate_velocity),
        );
    }
}
