//! Death sequences: одна фаза (наземный), две фазы (летающий)
//!
//! Наземный: Dead сразу, despawn через grace delay.
//! Летающий: фаза 1 — falling (импульс вверх + полная гравитация,
//! decide и hover подавлены), фаза 2 — контакт с землёй: Dead, pin,
//! despawn через grace delay.
//!
//! Мёртвый комбатант не решает, не прикладывает силы и не наносит
//! урон; после grace delay он структурно удаляется из мира, чтобы
//! aliveness census (portal gate) перестал его считать.

use crate::ai::aerial::AerialCombatant;
use crate::ai::ground::GroundCombatant;
use crate::combat::damage::EntityDied;
use crate::physics::{GroundLevel, PhysicsBody};
use crate::presentation::PresentationSignal;
use bevy::prelude::*;

/// Grace delay перед despawn — даёт death-визуалу доиграть
pub const DESPAWN_GRACE: f32 = 2.0;

/// Импульс вверх при переходе в falling (последний толчок от добившего удара)
pub const FALL_IMPULSE: f32 = 5.0;

/// Гравитация трупа усилена — падение читается как потеря подъёмной силы
pub const FALL_GRAVITY_SCALE: f32 = 3.0;

/// Fallback: падение без контакта с землёй дольше этого — принудительная
/// финальная фаза (иначе труп навсегда держит census)
pub const MAX_FALL_DURATION: f32 = 10.0;

/// Маркер: entity мертв
///
/// Снимает его с decide pass, hover-интегратора, hit-детекции.
#[derive(Component, Debug, Default)]
pub struct Dead;

/// Компонент: despawn после абсолютного instant'а
///
/// despawn_time — секунды от старта симуляции, не countdown.
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    pub despawn_time: f32,
}

/// Система: одна фаза смерти наземного комбатанта
pub fn handle_ground_death(
    mut died_events: EventReader<EntityDied>,
    mut commands: Commands,
    mut signals: EventWriter<PresentationSignal>,
    time: Res<Time>,
    grounds: Query<(), With<GroundCombatant>>,
) {
    let now = time.elapsed_secs();

    for event in died_events.read() {
        if grounds.get(event.entity).is_err() {
            continue;
        }

        commands.entity(event.entity).insert((
            Dead,
            DespawnAfter {
                despawn_time: now + DESPAWN_GRACE,
            },
        ));
        signals.write(PresentationSignal::PlayDeath {
            actor: event.entity,
        });
        crate::logger::log_info(&format!("Ground combatant {:?} died", event.entity));
    }
}

/// Система: фаза 1 смерти летающего — потеря подъёмной силы
///
/// Dead ещё не ставится: труп падает под гравитацией, decide и hover
/// подавлены флагом falling, урон по нему игнорируется.
pub fn begin_aerial_fall(
    mut died_events: EventReader<EntityDied>,
    mut signals: EventWriter<PresentationSignal>,
    time: Res<Time>,
    mut aerials: Query<(&mut AerialCombatant, &mut PhysicsBody)>,
) {
    let now = time.elapsed_secs();

    for event in died_events.read() {
        let Ok((mut state, mut body)) = aerials.get_mut(event.entity) else {
            continue;
        };

        state.falling = true;
        state.retreating = false;
        state.fall_started_at = now;

        signals.write(PresentationSignal::SetRunning {
            actor: event.entity,
            running: false,
        });

        // Лёгкий толчок вверх + полная гравитация — ragdoll-падение
        body.velocity = Vec2::ZERO;
        body.apply_impulse(Vec2::new(0.0, FALL_IMPULSE));
        body.gravity_scale = FALL_GRAVITY_SCALE;

        crate::logger::log_info(&format!("Aerial combatant {:?} falling", event.entity));
    }
}

/// Система: фаза 2 — приземление трупа (FixedUpdate, после интеграции)
///
/// Контакт с ground-classified поверхностью (или fall timeout) ⇒
/// финальная смерть: pin тела, Dead, despawn через grace delay.
///
/// Часы — virtual clock: fall_started_at ставится в Update, а
/// DespawnAfter читается в Update, поэтому оба timer'а сравниваются
/// с тем же clock'ом, без скоса на fixed step.
pub fn detect_fall_landing(
    time: Res<Time<Virtual>>,
    ground: Res<GroundLevel>,
    mut commands: Commands,
    mut signals: EventWriter<PresentationSignal>,
    mut query: Query<(Entity, &AerialCombatant, &mut PhysicsBody, &Transform), Without<Dead>>,
) {
    let now = time.elapsed_secs();

    for (entity, state, mut body, transform) in query.iter_mut() {
        if !state.falling {
            continue;
        }

        let landed = transform.translation.y <= ground.height;
        let timed_out = now - state.fall_started_at >= MAX_FALL_DURATION;
        if !landed && !timed_out {
            continue;
        }

        // Pin: труп не скользит и не проваливается
        body.velocity = Vec2::ZERO;
        body.pinned = true;

        commands.entity(entity).insert((
            Dead,
            DespawnAfter {
                despawn_time: now + DESPAWN_GRACE,
            },
        ));
        signals.write(PresentationSignal::PlayDeath { actor: entity });
        crate::logger::log_info(&format!(
            "Aerial combatant {:?} landed dead (timed_out: {})",
            entity, timed_out
        ));
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
///
/// Структурное удаление — после него census больше не видит entity.
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::logger::log(&format!("Despawning entity {:?} (grace timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_despawn_after_absolute_instant() {
        let despawn = DespawnAfter { despawn_time: 5.0 };
        assert!(4.99 < despawn.despawn_time);
        assert!(5.0 >= despawn.despawn_time); // now >= instant ⇒ despawn
    }

    #[test]
    fn test_fall_impulse_velocity() {
        let mut body = PhysicsBody::default();
        body.velocity = Vec2::new(3.0, -1.0);

        // Переход в falling: сброс + импульс + усиленная гравитация
        body.velocity = Vec2::ZERO;
        body.apply_impulse(Vec2::new(0.0, FALL_IMPULSE));
        body.gravity_scale = FALL_GRAVITY_SCALE;

        assert_eq!(body.velocity.x, 0.0);
        assert!((body.velocity.y - 5.0).abs() < 1e-5);
        assert_eq!(body.gravity_scale, 3.0);
    }
}
