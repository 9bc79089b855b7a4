//! Летающий комбатант: зона-бокс, hover-цели, combo ×2 с retreat,
//! прямоугольный случайный патруль, двухфазная смерть
//!
//! Decide tick (Update):
//! 1. Interrupts: falling → hurt-stun → action lock → retreat window
//! 2. Zone box вокруг spawn: in-zone ⇒ combat, иначе peace
//! 3. Combat: far ⇒ chase с hover-подъёмом; close ⇒ combo (finisher
//!    армирует retreat); mid ⇒ chase с низким dive-смещением
//! 4. Peace: случайный патруль внутри бокса либо return-to-spawn + regen
//!
//! Горизонталь всегда через smooth_damp (инерция), вертикаль — через
//! target_height, который подбирает hover-интегратор в FixedUpdate.

use crate::combat::death::Dead;
use crate::components::{
    ActionLock, Actor, Attacker, ComboCounter, EngageTarget, Facing, Health, HurtReaction, Player,
    SpawnAnchor,
};
use crate::physics::PhysicsBody;
use crate::presentation::PresentationSignal;
use crate::shared::geometry::{face_towards, flip, in_zone_box, smooth_damp};
use crate::DeterministicRng;
use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Cap летающего combo: два light-удара, затем finisher
pub const AERIAL_COMBO_CAP: u32 = 2;

/// Recovery после finisher (перед retreat)
pub const FINISHER_RECOVERY: f32 = 1.0;

/// Горизонтальная дистанция retreat-манёвра
pub const RETREAT_DISTANCE: f32 = 5.0;

/// Множитель скорости во время retreat
pub const RETREAT_SPEED_MULTIPLIER: f32 = 1.2;

/// Низкое смещение над игроком при mid-range сближении (анти-clipping)
pub const DIVE_HEIGHT_OFFSET: f32 = 0.5;

/// Tolerance прибытия к патрульной точке
pub const PATROL_TOLERANCE_X: f32 = 0.5;
pub const PATROL_TOLERANCE_Y: f32 = 1.5;

/// Анти-jitter: новая патрульная точка не ближе этой дистанции
pub const MIN_PATROL_HOP: f32 = 3.0;

/// Попыток resample перед принятием последнего кандидата
pub const PATROL_RESAMPLE_ATTEMPTS: u32 = 10;

/// Tolerance прибытия к spawn point
pub const RETURN_TOLERANCE: f32 = 0.5;

/// Tunables летающего варианта (read-only в runtime)
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct AerialConfig {
    /// Скорость полёта на патруле
    pub move_speed: f32,
    /// Множитель скорости при преследовании
    pub chase_speed_multiplier: f32,
    /// Half-extents зоны/патрульного бокса вокруг spawn
    pub patrol_box_x: f32,
    pub patrol_box_y: f32,
    /// false ⇒ peace = return-to-spawn
    pub can_patrol: bool,
    /// Инертность горизонтального движения (smooth_damp)
    pub movement_smooth_time: f32,
    /// Амплитуда hover-покачивания
    pub hover_bob_amount: f32,
    /// Частота hover-покачивания
    pub hover_bob_speed: f32,
    /// Жёсткость hover-пружины
    pub spring_strength: f32,
    /// Демпфирование hover-пружины
    pub spring_damping: f32,
    /// Боевая высота над игроком
    pub hover_height: f32,
    /// Дистанция melee combo
    pub close_range: f32,
    /// Дистанция chase-and-hover
    pub far_range: f32,
    /// Recovery после light-удара
    pub combo_interval: f32,
    /// Длительность retreat после combo
    pub retreat_duration: f32,
}

impl Default for AerialConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            chase_speed_multiplier: 1.5,
            patrol_box_x: 10.0,
            patrol_box_y: 6.0,
            can_patrol: true,
            movement_smooth_time: 0.5,
            hover_bob_amount: 0.5,
            hover_bob_speed: 2.0,
            spring_strength: 1000.0,
            spring_damping: 15.0,
            hover_height: 3.5,
            close_range: 1.0,
            far_range: 7.0,
            combo_interval: 0.4,
            retreat_duration: 2.0,
        }
    }
}

/// Mutable state летающего комбатанта
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AerialCombatant {
    /// Желаемый вертикальный якорь (пишет decide, читает интегратор)
    pub target_height: f32,
    /// Low-pass версия target_height (двигает интегратор)
    pub smoothed_height: f32,
    /// Кэш скорости smooth_damp по x
    pub x_velocity: f32,
    /// Текущая патрульная точка
    pub patrol_target: Vec2,
    /// Абсолютный instant окончания dwell на точке
    pub patrol_wait_until: f32,
    /// Retreat-манёвр активен
    pub retreating: bool,
    /// Абсолютный instant окончания retreat
    pub retreat_end_time: f32,
    /// Фаза 1 смерти: падение без управления и hover-силы
    pub falling: bool,
    /// Когда началось падение (для fall timeout fallback)
    pub fall_started_at: f32,
}

impl AerialCombatant {
    pub fn at_position(position: Vec2) -> Self {
        Self {
            target_height: position.y,
            smoothed_height: position.y,
            x_velocity: 0.0,
            patrol_target: position,
            patrol_wait_until: 0.0,
            retreating: false,
            retreat_end_time: 0.0,
            falling: false,
            fall_started_at: 0.0,
        }
    }
}

/// Spawn helper: летающий комбатант со всем набором компонентов
pub fn spawn_aerial_combatant(
    commands: &mut Commands,
    position: Vec2,
    facing_right: bool,
    config: AerialConfig,
    health: Health,
    attacker: Attacker,
    player: Option<Entity>,
) -> Entity {
    if player.is_none() {
        crate::logger::log_warning("[AerialCombatant] Player not found, AI will not function");
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
            ComboCounter::new(AERIAL_COMBO_CAP),
            ActionLock::default(),
            HurtReaction::default(),
            EngageTarget(player),
            AerialCombatant::at_position(position),
            PhysicsBody::default(),
            config,
            Transform::from_translation(position.extend(0.0))
                .with_scale(Vec3::new(scale_x, 1.0, 1.0)),
        ))
        .id()
}

/// Система: decide tick летающего варианта
pub fn aerial_decide(
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    mut signals: EventWriter<PresentationSignal>,
    mut query: Query<
        (
            Entity,
            &AerialConfig,
            &mut AerialCombatant,
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
        // Падающий труп больше не решает
        if state.falling {
            continue;
        }

        let Some(player_entity) = target.0 else {
            continue;
        };
        let Ok(player_transform) = players.get(player_entity) else {
            continue;
        };

        // Interrupt 1: hurt-stun (гасим накопленную инерцию)
        if hurt.is_stunning() {
            state.x_velocity = 0.0;
            continue;
        }

        // Interrupt 2: action lock
        if lock.is_locked(now) {
            signals.write(PresentationSignal::SetRunning {
                actor: entity,
                running: false,
            });
            continue;
        }

        // Interrupt 3: retreat window; истёкший — проваливается в
        // обычное решение на том же tick'е
        if state.retreating {
            if now > state.retreat_end_time {
                state.retreating = false;
            } else {
                perform_retreat(
                    entity,
                    config,
                    &mut state,
                    &mut transform,
                    &facing,
                    spawn,
                    delta,
                    &mut signals,
                );
                continue;
            }
        }

        let player_pos = player_transform.translation.truncate();
        let self_pos = transform.translation.truncate();
        let player_in_zone = in_zone_box(
            player_pos,
            spawn.position,
            Vec2::new(config.patrol_box_x, config.patrol_box_y),
        );

        if player_in_zone {
            face_towards(&mut facing, &mut transform, player_pos.x);
            let dist = self_pos.distance(player_pos);

            if dist > config.far_range {
                combo.reset();
                chase(
                    entity, config, &mut state, &mut transform, player_pos, true, delta,
                    &mut signals,
                );
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
                    lock.lock_until(now + FINISHER_RECOVERY);
                    // Finisher армирует retreat-манёвр
                    state.retreating = true;
                    state.retreat_end_time = now + config.retreat_duration;
                }
            } else {
                combo.reset();
                chase(
                    entity, config, &mut state, &mut transform, player_pos, false, delta,
                    &mut signals,
                );
            }
        } else {
            // Peace branch
            combo.reset();

            if config.can_patrol {
                patrol_rect(
                    entity,
                    config,
                    &mut state,
                    &mut transform,
                    &mut facing,
                    spawn,
                    now,
                    delta,
                    &mut rng,
                    &mut signals,
                );
            } else {
                return_to_spawn(
                    entity,
                    config,
                    &mut state,
                    &mut transform,
                    &mut facing,
                    spawn,
                    delta,
                    &mut signals,
                );
            }

            if health.current < health.max {
                health.regenerate(delta);
            }
        }
    }
}

/// Горизонтальный шаг со сглаживанием (инерция полёта)
fn smooth_move_x(
    config: &AerialConfig,
    state: &mut AerialCombatant,
    transform: &mut Transform,
    target_x: f32,
    speed: f32,
    delta: f32,
) {
    transform.translation.x = smooth_damp(
        transform.translation.x,
        target_x,
        &mut state.x_velocity,
        config.movement_smooth_time,
        speed,
        delta,
    );
}

/// Преследование: hovering ⇒ парим над игроком, иначе низкий заход
fn chase(
    entity: Entity,
    config: &AerialConfig,
    state: &mut AerialCombatant,
    transform: &mut Transform,
    player_pos: Vec2,
    hovering: bool,
    delta: f32,
    signals: &mut EventWriter<PresentationSignal>,
) {
    signals.write(PresentationSignal::SetRunning {
        actor: entity,
        running: true,
    });

    let speed = config.move_speed * config.chase_speed_multiplier;
    smooth_move_x(config, state, transform, player_pos.x, speed, delta);

    state.target_height = if hovering {
        player_pos.y + config.hover_height
    } else {
        player_pos.y + DIVE_HEIGHT_OFFSET
    };
}

/// Retreat: от текущего facing, с подъёмом hover-цели
fn perform_retreat(
    entity: Entity,
    config: &AerialConfig,
    state: &mut AerialCombatant,
    transform: &mut Transform,
    facing: &Facing,
    spawn: &SpawnAnchor,
    delta: f32,
    signals: &mut EventWriter<PresentationSignal>,
) {
    signals.write(PresentationSignal::SetRunning {
        actor: entity,
        running: true,
    });

    let retreat_dir = if facing.right { -1.0 } else { 1.0 };
    let target_x = transform.translation.x + retreat_dir * RETREAT_DISTANCE;

    smooth_move_x(
        config,
        state,
        transform,
        target_x,
        config.move_speed * RETREAT_SPEED_MULTIPLIER,
        delta,
    );
    state.target_height = spawn.position.y + config.hover_height;
}

/// Прямоугольный случайный патруль с dwell-таймером
fn patrol_rect(
    entity: Entity,
    config: &AerialConfig,
    state: &mut AerialCombatant,
    transform: &mut Transform,
    facing: &mut Facing,
    spawn: &SpawnAnchor,
    now: f32,
    delta: f32,
    rng: &mut DeterministicRng,
    signals: &mut EventWriter<PresentationSignal>,
) {
    let dx = (transform.translation.x - state.patrol_target.x).abs();
    let dy = (transform.translation.y - state.patrol_target.y).abs();

    if dx < PATROL_TOLERANCE_X && dy < PATROL_TOLERANCE_Y {
        signals.write(PresentationSignal::SetRunning {
            actor: entity,
            running: false,
        });

        if now > state.patrol_wait_until {
            state.patrol_target = draw_patrol_target(
                rng,
                spawn.position,
                Vec2::new(config.patrol_box_x, config.patrol_box_y),
                transform.translation.truncate(),
            );
            state.patrol_wait_until = now + rng.rng.gen_range(2.0..4.0);
        }
    } else {
        signals.write(PresentationSignal::SetRunning {
            actor: entity,
            running: true,
        });

        let target = state.patrol_target;
        smooth_move_x(config, state, transform, target.x, config.move_speed, delta);
        state.target_height = target.y;

        face_towards(facing, transform, target.x);
    }
}

/// Розыгрыш патрульной точки с анти-jitter rejection
///
/// До PATROL_RESAMPLE_ATTEMPTS попыток найти точку дальше
/// MIN_PATROL_HOP; после — принимается последний кандидат как есть.
pub fn draw_patrol_target(
    rng: &mut DeterministicRng,
    spawn: Vec2,
    half_extents: Vec2,
    current: Vec2,
) -> Vec2 {
    let mut candidate = spawn;

    for _ in 0..PATROL_RESAMPLE_ATTEMPTS {
        let random_x = if half_extents.x > 0.0 {
            rng.rng.gen_range(-half_extents.x..half_extents.x)
        } else {
            0.0
        };
        let random_y = if half_extents.y > 0.0 {
            rng.rng.gen_range(-half_extents.y..half_extents.y)
        } else {
            0.0
        };
        candidate = spawn + Vec2::new(random_x, random_y);

        if candidate.distance(current) > MIN_PATROL_HOP {
            break;
        }
    }

    candidate
}

/// Возврат к spawn; у точки — восстановление стартового facing
fn return_to_spawn(
    entity: Entity,
    config: &AerialConfig,
    state: &mut AerialCombatant,
    transform: &mut Transform,
    facing: &mut Facing,
    spawn: &SpawnAnchor,
    delta: f32,
    signals: &mut EventWriter<PresentationSignal>,
) {
    let dist = transform.translation.truncate().distance(spawn.position);

    if dist < RETURN_TOLERANCE {
        signals.write(PresentationSignal::SetRunning {
            actor: entity,
            running: false,
        });
        state.target_height = spawn.position.y;

        if facing.right != facing.initial_right {
            flip(facing, transform);
        }
    } else {
        signals.write(PresentationSignal::SetRunning {
            actor: entity,
            running: true,
        });
        smooth_move_x(config, state, transform, spawn.position.x, config.move_speed, delta);
        state.target_height = spawn.position.y;

        face_towards(facing, transform, spawn.position.x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patrol_target_rejects_near_candidates() {
        let mut rng = DeterministicRng::new(7);
        let spawn = Vec2::ZERO;
        let half = Vec2::new(10.0, 6.0);
        let current = Vec2::ZERO;

        // С большим боксом шанс 10 подряд близких кандидатов ничтожен
        for _ in 0..50 {
            let target = draw_patrol_target(&mut rng, spawn, half, current);
            assert!(target.x.abs() < half.x);
            assert!(target.y.abs() < half.y);
        }
    }

    #[test]
    fn test_patrol_target_zero_box_stays_on_spawn() {
        let mut rng = DeterministicRng::new(7);
        let spawn = Vec2::new(3.0, 4.0);

        // Вырожденный бокс: все кандидаты = spawn, принимается последний
        let target = draw_patrol_target(&mut rng, spawn, Vec2::ZERO, spawn);
        assert_eq!(target, spawn);
    }

    #[test]
    fn test_patrol_sampling_deterministic_by_seed() {
        let spawn = Vec2::ZERO;
        let half = Vec2::new(10.0, 6.0);

        let mut rng_a = DeterministicRng::new(42);
        let mut rng_b = DeterministicRng::new(42);

        for _ in 0..10 {
            let a = draw_patrol_target(&mut rng_a, spawn, half, Vec2::ZERO);
            let b = draw_patrol_target(&mut rng_b, spawn, half, Vec2::ZERO);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_retreat_direction_opposes_facing() {
        let facing_right = true;
        let retreat_dir: f32 = if facing_right { -1.0 } else { 1.0 };
        assert_eq!(retreat_dir, -1.0);

        let facing_right = false;
        let retreat_dir: f32 = if facing_right { -1.0 } else { 1.0 };
        assert_eq!(retreat_dir, 1.0);
    }

    #[test]
    fn test_combo_cap_is_two() {
        let mut combo = ComboCounter::new(AERIAL_COMBO_CAP);
        combo.count += 1;
        assert!(!combo.at_cap());
        combo.count += 1;
        assert!(combo.at_cap());
    }
}
