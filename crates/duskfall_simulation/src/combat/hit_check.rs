//! Hit checkpoints — overlap-проверки из анимационного timeline
//!
//! Два именованных checkpoint'а ("light hit", "finisher hit") приходят
//! НЕ от часов ядра, а от внешнего animation-timeline callback'а.
//! Каждый делает overlap-проверку фиксированного радиуса от якоря
//! атаки против противоположной фракции; одиночное попадание →
//! damage contract с множителем стадии (finisher = 1.5× light).

use crate::ai::aerial::AerialCombatant;
use crate::combat::damage::ApplyDamage;
use crate::combat::death::Dead;
use crate::components::{Actor, Attacker, Facing, Health};
use bevy::prelude::*;

/// Finisher бьёт в полтора раза больнее
pub const FINISHER_DAMAGE_MULTIPLIER: f32 = 1.5;

/// Finisher проверяет чуть больший радиус
pub const FINISHER_RADIUS_BONUS: f32 = 0.2;

/// Стадия атаки в момент checkpoint'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackStage {
    Light,
    Finisher,
}

/// Событие: animation timeline дошёл до hit-кадра
#[derive(Event, Debug, Clone)]
pub struct HitCheckpoint {
    pub attacker: Entity,
    pub stage: AttackStage,
}

/// Система: overlap-проверка checkpoint'ов → ApplyDamage
pub fn process_hit_checkpoints(
    mut checkpoints: EventReader<HitCheckpoint>,
    mut damage_events: EventWriter<ApplyDamage>,
    attackers: Query<(&Actor, &Transform, &Facing, &Attacker), Without<Dead>>,
    aerial_states: Query<&AerialCombatant>,
    targets: Query<(Entity, &Actor, &Transform, &Health), Without<Dead>>,
) {
    for checkpoint in checkpoints.read() {
        // Мёртвый (или падающий) атакующий урона не эмитит
        let Ok((actor, transform, facing, attacker)) = attackers.get(checkpoint.attacker) else {
            continue;
        };
        if aerial_states
            .get(checkpoint.attacker)
            .map_or(false, |state| state.falling)
        {
            continue;
        }

        // Якорь атаки: смещение вдоль facing
        let dir = if facing.right { 1.0 } else { -1.0 };
        let anchor = transform.translation.truncate()
            + Vec2::new(attacker.anchor_offset.x * dir, attacker.anchor_offset.y);

        let (radius, multiplier) = match checkpoint.stage {
            AttackStage::Light => (attacker.hit_radius, 1.0),
            AttackStage::Finisher => (
                attacker.hit_radius + FINISHER_RADIUS_BONUS,
                FINISHER_DAMAGE_MULTIPLIER,
            ),
        };

        // Одиночное попадание: ближайший живой target другой фракции
        let mut nearest: Option<(Entity, f32)> = None;
        for (target_entity, target_actor, target_transform, target_health) in targets.iter() {
            if target_entity == checkpoint.attacker {
                continue;
            }
            if target_actor.faction_id == actor.faction_id {
                continue;
            }
            if !target_health.is_alive() {
                continue;
            }

            let distance = target_transform.translation.truncate().distance(anchor);
            if distance <= radius {
                match nearest {
                    Some((_, best)) if distance >= best => {}
                    _ => nearest = Some((target_entity, distance)),
                }
            }
        }

        if let Some((target, _)) = nearest {
            damage_events.write(ApplyDamage {
                target,
                amount: attacker.base_damage * multiplier,
                source: Some(checkpoint.attacker),
            });
            crate::logger::log(&format!(
                "{:?} hit landed: {:?} → {:?}",
                checkpoint.stage, checkpoint.attacker, target
            ));
        }
    }
}
