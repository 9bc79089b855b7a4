//! Наземный комбатант: зона-полоса, melee combo ×3, dash-charge, линейный патруль
//!
//! Decide tick (Update):
//! 1. Interrupts: hurt-stun → action lock (каждый — жёсткий early-return)
//! 2. Zone band по x вокруг spawn: in-zone ⇒ combat branch, иначе peace
//! 3. Combat: far ⇒ dash-option (по cooldown) или chase; close ⇒ combo;
//!    mid ⇒ chase со сбросом combo
//! 4. Peace: линейный патруль между границами либо return-to-spawn,
//!    плюс пассивный regen (начинается сразу, без out-of-combat delay)

use crate::combat::death::Dead;
use crate::components::{
    ActionLock, Actor, Attacker, ComboCounter, EngageTarget, Facing, Health, HurtReaction, Player,
    SpawnAnchor,
};
use crate::presentation::PresentationSignal;
use crate::shared::geometry::{face_towards, flip, in_zone_band, move_towards, move_towards_vec};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Cap наземного combo: три light-удара, затем finisher
pub const GROUND_COMBO_CAP: u32 = 3;

/// Фиксированная длительность action lock после dash
pub const DASH_LOCK_DURATION: f32 = 1.0;

/// Tolerance прибытия к spawn point
pub const RETURN_TOLERANCE: f32 = 0.1;

/// Tunables наземного варианта (read-only в runtime)
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct GroundConfig {
    /// Скорость движения (units/sec)
    pub move_speed: f32,
    /// Полуширина зоны/патруля вокруг spawn
    pub patrol_range: f32,
    /// false ⇒ стационарный страж (peace = return-to-spawn)
    pub can_patrol: bool,
    /// Дистанция melee combo
    pub close_range: f32,
    /// Дистанция dash-атаки
    pub far_range: f32,
    /// Recovery после light-удара
    pub combo_interval: f32,
    /// Cooldown dash-скилла
    pub dash_cooldown: f32,
    /// Recovery после полного combo
    pub full_cooldown: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            patrol_range: 10.0,
            can_patrol: true,
            close_range: 0.8,
            far_range: 3.0,
            combo_interval: 0.4,
            dash_cooldown: 3.0,
            full_cooldown: 1.0,
        }
    }
}

/// Mutable state наземного комбатанта
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct GroundCombatant {
    /// Абсолютный instant готовности dash-скилла
    pub next_dash_time: f32,
    /// Текущее направление линейного патруля
    pub moving_left: bool,
}

/// Spawn helper: наземный комбатант со всем набором компонентов
///
/// player == None ⇒ warning и перманентный no-op decide tick'а
/// (остаётся damageable).
pub fn spawn_ground_combatant(
    commands: &mut Commands,
    position: Vec2,
    facing_right: bool,
    config: GroundConfig,
    health: Health,
    attacker: Attacker,
    player: Option<Entity>,
) -> Entity {
    if player.is_none() {
        crate::logger::log_warning("[GroundCombatant] Player not found, AI will not function");
    }

    let scale_x = if facing_right { 1.0 } else { -1.0 };

    commands
        .spawn((
            Actor { faction_id: 1 },
            health,
            attacker,
            // Стартовый facing — из знака x-scale, как его видит сцена
            Facing::from_scale_x(scale_x),
            SpawnAnchor::new(position),
            ComboCounter::new(GROUND_COMBO_CAP),
            ActionLock::default(),
            HurtReaction::default(),
            EngageTarget(player),
            GroundCombatant {
                next_dash_time: 0.0,
                moving_left: !facing_right,
            },
            config,
            Transform::from_translation(position.extend(0.0))
                .with_scale(Vec3::new(scale_x, 1.0, 1.0)),
        ))
        .id()
}

/// Система: decide tick наземного варианта
pub fn ground_decide(
    time: Res<Time>,
    mut signals: EventWriter<PresentationSignal>,
    mut query: Query<
        (
            Entity,
            &GroundConfig,
            &mut GroundCombatant,
            &mut Transform,
            &mut Facing,
            &mut Health,
            &mut ComboCounter,
            &mut ActionLock,
            &HurtReaction,
            &EngageTarget,
            &SpawnAnchor,
        ),
        (Without<Dead>, Without<Player>),
    >,
    players: Query<&Transform, With<Player>>,
) {
    let now = time.elapsed_secs();
    let delta = time.delta_secs();

    for (
        entity,
        config,
        mut state,
        mut transform,
        mut facing,
        mut health,
        mut combo,
        mut lock,
        hurt,
        target,
        spawn,
    ) in query.iter_mut()
    {
        // Без target-актора — перманентно инертен
        let Some(player_entity) = target.0 else {
            continue;
        };
        let Ok(player_transform) = players.get(player_entity) else {
            continue;
        };

        // Interrupt 1: hurt-stun — полностью неуправляем
        if hurt.is_stunning() {
            continue;
        }

        // Interrupt 2: action lock — recovery-стойка
        if lock.is_locked(now) {
            signals.write(PresentationSignal::SetRunning {
                actor: entity,
                running: false,
            });
            continue;
        }

        let player_pos = player_transform.translation.truncate();
        let self_pos = transform.translation.truncate();
        let dist = self_pos.distance(player_pos);
        let player_in_zone = in_zone_band(player_pos.x, spawn.position.x, config.patrol_range);

        if player_in_zone {
            face_towards(&mut facing, &mut transform, player_pos.x);

            if dist > config.far_range {
                combo.reset();

                if now >= state.next_dash_time {
                    // Dash-option: стоп, сигнал, лок действия + cooldown
                    signals.write(PresentationSignal::SetRunning {
                        actor: entity,
                        running: false,
                    });
                    signals.write(PresentationSignal::PlayDashAttack { actor: entity });
                    lock.lock_until(now + DASH_LOCK_DURATION);
                    state.next_dash_time = now + config.dash_cooldown;
                    crate::logger::log(&format!("Dash attack triggered (entity: {:?})", entity));
                } else {
                    chase(entity, config, &mut transform, player_pos.x, delta, &mut signals);
                }
            } else if dist <= config.close_range {
                signals.write(PresentationSignal::SetRunning {
                    actor: entity,
                    running: false,
                });

                // Ровно один сигнал за tick: light ИЛИ finisher
                if !combo.at_cap() {
                    signals.write(PresentationSignal::PlayLightAttack { actor: entity });
                    combo.count += 1;
                    lock.lock_until(now + config.combo_interval);
                } else {
                    signals.write(PresentationSignal::PlayFinisher { actor: entity });
                    combo.reset();
                    lock.lock_until(now + config.full_cooldown);
                }
            } else {
                // Mid-band: преследование, combo принудительно 0
                combo.reset();
                chase(entity, config, &mut transform, player_pos.x, delta, &mut signals);
            }
        } else {
            // Peace branch
            combo.reset();

            if config.can_patrol {
                patrol(
                    entity,
                    config,
                    &mut state,
                    &mut transform,
                    &mut facing,
                    spawn,
                    delta,
                    &mut signals,
                );
            } else {
                return_to_spawn(
                    entity,
                    config,
                    &mut transform,
                    &mut facing,
                    spawn,
                    delta,
                    &mut signals,
                );
            }

            // Пассивный regen, сразу и с clamp; лог на целых границах
            if health.current < health.max {
                let last_whole = health.current as i32;
                health.regenerate(delta);
                if health.current as i32 != last_whole {
                    crate::logger::log(&format!(
                        "Regenerating... current health: {:.1} (entity: {:?})",
                        health.current, entity
                    ));
                }
            }
        }
    }
}

/// Преследование: постоянная скорость по x, без сглаживания
fn chase(
    entity: Entity,
    config: &GroundConfig,
    transform: &mut Transform,
    target_x: f32,
    delta: f32,
    signals: &mut EventWriter<PresentationSignal>,
) {
    signals.write(PresentationSignal::SetRunning {
        actor: entity,
        running: true,
    });
    transform.translation.x = move_towards(
        transform.translation.x,
        target_x,
        config.move_speed * delta,
    );
}

/// Линейный патруль: осцилляция между границами, детерминированный flip
fn patrol(
    entity: Entity,
    config: &GroundConfig,
    state: &mut GroundCombatant,
    transform: &mut Transform,
    facing: &mut Facing,
    spawn: &SpawnAnchor,
    delta: f32,
    signals: &mut EventWriter<PresentationSignal>,
) {
    signals.write(PresentationSignal::SetRunning {
        actor: entity,
        running: true,
    });

    let left_border = spawn.position.x - config.patrol_range;
    let right_border = spawn.position.x + config.patrol_range;

    if state.moving_left {
        transform.translation.x -= config.move_speed * delta;
        if facing.right {
            flip(facing, transform);
        }
        if transform.translation.x <= left_border {
            state.moving_left = false;
        }
    } else {
        transform.translation.x += config.move_speed * delta;
        if !facing.right {
            flip(facing, transform);
        }
        if transform.translation.x >= right_border {
            state.moving_left = true;
        }
    }
}

/// Возврат к spawn; у точки — восстановление стартового facing
/// (единственное место, где initial facing восстанавливается)
fn return_to_spawn(
    entity: Entity,
    config: &GroundConfig,
    transform: &mut Transform,
    facing: &mut Facing,
    spawn: &SpawnAnchor,
    delta: f32,
    signals: &mut EventWriter<PresentationSignal>,
) {
    let self_pos = transform.translation.truncate();
    let dist = self_pos.distance(spawn.position);

    if dist < RETURN_TOLERANCE {
        signals.write(PresentationSignal::SetRunning {
            actor: entity,
            running: false,
        });
        if facing.right != facing.initial_right {
            flip(facing, transform);
        }
    } else {
        signals.write(PresentationSignal::SetRunning {
            actor: entity,
            running: true,
        });
        let next = move_towards_vec(self_pos, spawn.position, config.move_speed * delta);
        transform.translation.x = next.x;
        transform.translation.y = next.y;
        face_towards(facing, transform, spawn.position.x);
    }
}
