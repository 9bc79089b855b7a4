//! Damage contract: ApplyDamage → health, hurt-реакция, death trigger
//!
//! Контракт:
//! - урон по мёртвому/падающему — тихий no-op
//! - amount == 0 — строгий no-op: не трогает health, facing, таймеры
//!   и НЕ триггерит hurt (идемпотентность контракта)
//! - иначе: health − amount, hurt-реакция, сброс combo-очереди,
//!   отмена retreat, при health ≤ 0 — EntityDied

use crate::ai::aerial::AerialCombatant;
use crate::combat::death::Dead;
use crate::components::{ComboCounter, Health, HurtReaction};
use crate::presentation::PresentationSignal;
use bevy::prelude::*;

/// Событие-контракт: нанести урон target'у
///
/// Consumed ядром (комбатанты) и exposed игроку (hit checkpoints
/// эмитят его в обе стороны).
#[derive(Event, Debug, Clone)]
pub struct ApplyDamage {
    pub target: Entity,
    pub amount: f32,
    /// Кто нанёс (для kill-attribution в логах)
    pub source: Option<Entity>,
}

/// Событие: урон применён (для UI, звуков, эффектов)
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub target: Entity,
    pub amount: f32,
    pub target_died: bool,
    pub source: Option<Entity>,
}

/// Событие: entity умер (health ≤ 0)
///
/// Наземный вариант обрабатывает его одной фазой (handle_ground_death),
/// летающий — двумя (begin_aerial_fall → detect_fall_landing).
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Система: применение ApplyDamage событий
pub fn apply_damage(
    mut events: EventReader<ApplyDamage>,
    mut dealt_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
    mut signals: EventWriter<PresentationSignal>,
    mut targets: Query<
        (
            &mut Health,
            Option<&mut ComboCounter>,
            Option<&mut HurtReaction>,
            Option<&mut AerialCombatant>,
        ),
        Without<Dead>,
    >,
) {
    for event in events.read() {
        // Нулевой (и отрицательный) урон — строгий no-op
        if event.amount <= 0.0 {
            continue;
        }

        // Мёртвые уже отфильтрованы Without<Dead>; despawned — get_mut Err
        let Ok((mut health, combo, hurt, mut aerial)) = targets.get_mut(event.target) else {
            continue;
        };

        // Падающий труп неуязвим (фаза 1 смерти летающего)
        if aerial.as_ref().map_or(false, |state| state.falling) {
            continue;
        }
        if !health.is_alive() {
            continue;
        }

        health.take_damage(event.amount);
        crate::logger::log(&format!(
            "Took {:.1} damage, remaining health: {:.1} (entity: {:?})",
            event.amount, health.current, event.target
        ));

        // Hurt-реакция прерывает всё; очередь combo сбрасывается
        if let Some(mut hurt) = hurt {
            hurt.restart();
            signals.write(PresentationSignal::PlayHurtReaction {
                actor: event.target,
            });
        }
        if let Some(mut combo) = combo {
            combo.reset();
        }
        // Урон отменяет текущий retreat
        if let Some(state) = aerial.as_mut() {
            state.retreating = false;
        }

        let target_died = !health.is_alive();
        dealt_events.write(DamageDealt {
            target: event.target,
            amount: event.amount,
            target_died,
            source: event.source,
        });

        if target_died {
            died_events.write(EntityDied {
                entity: event.target,
                killer: event.source,
            });
            crate::logger::log_info(&format!(
                "Entity {:?} killed by {:?}",
                event.target, event.source
            ));
        }
    }
}
