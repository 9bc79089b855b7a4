//! Hover-интегратор летающего комбатанта (spring-damper по вертикали)
//!
//! Каждый fixed tick:
//! 1. smoothed_height двигается к target_height с постоянной скоростью
//!    (low-pass против резких смен цели — тело скользит, не прыгает)
//! 2. Поверх — синусоидальный bobbing (идл-покачивание)
//! 3. Spring force = (final_target − y) × spring_strength
//! 4. Damping force = −v_y × spring_damping (гасит overshoot)
//! 5. Компенсация гравитации = mass × |g| × gravity_scale, чтобы
//!    пружина корректировала отклонение, а не боролась с весом
//!
//! Пока комбатант мёртв или падает — интегратор полностью пропускается,
//! телом управляет одна гравитация.

use crate::ai::aerial::{AerialCombatant, AerialConfig};
use crate::combat::Dead;
use crate::physics::{PhysicsBody, GRAVITY};
use crate::shared::geometry::move_towards;
use bevy::prelude::*;

/// Система: вертикальная spring-damper сила → PhysicsBody
pub fn hover_integrator(
    time: Res<Time<Fixed>>,
    mut query: Query<
        (
            &AerialConfig,
            &mut AerialCombatant,
            &mut PhysicsBody,
            &Transform,
        ),
        Without<Dead>,
    >,
) {
    let delta = time.delta_secs();
    let elapsed = time.elapsed_secs();

    for (config, mut state, mut body, transform) in query.iter_mut() {
        if state.falling {
            continue;
        }

        // Low-pass фильтр цели: постоянная скорость, не snap
        state.smoothed_height = move_towards(
            state.smoothed_height,
            state.target_height,
            config.move_speed * delta,
        );

        // Синусоидальное покачивание — непрерывное движение даже при
        // неподвижном target_height
        let bobbing_offset = (elapsed * config.hover_bob_speed).sin() * config.hover_bob_amount;
        let final_target_y = state.smoothed_height + bobbing_offset;

        let y_difference = final_target_y - transform.translation.y;

        let spring_force = y_difference * config.spring_strength;
        let damping_force = -body.velocity.y * config.spring_damping;
        let gravity_compensation = body.mass * GRAVITY.abs() * body.gravity_scale;

        let force_y = spring_force + damping_force + gravity_compensation;
        body.apply_force(Vec2::new(0.0, force_y), delta);
    }
}
