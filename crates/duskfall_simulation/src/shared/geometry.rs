//! Stateless геометрические предикаты и сглаживание движения
//!
//! Общие для обоих вариантов комбатанта: zone containment, facing,
//! flip, move_towards (постоянная скорость) и smooth_damp
//! (critically-damped приближение с инерцией).

use crate::components::Facing;
use bevy::prelude::*;

/// 1-D zone band: |x − anchor_x| < half_width (наземный вариант)
pub fn in_zone_band(x: f32, anchor_x: f32, half_width: f32) -> bool {
    (x - anchor_x).abs() < half_width
}

/// 2-D zone box: по half-extents вокруг anchor (летающий вариант)
pub fn in_zone_box(point: Vec2, anchor: Vec2, half_extents: Vec2) -> bool {
    (point.x - anchor.x).abs() < half_extents.x && (point.y - anchor.y).abs() < half_extents.y
}

/// Надо ли флипать: текущий facing не совпадает со знаком (target_x − self_x)
///
/// dx == 0 ⇒ false (не дёргаем flip при точном совпадении по x).
pub fn facing_disagrees(facing_right: bool, dx: f32) -> bool {
    (dx > 0.0 && !facing_right) || (dx < 0.0 && facing_right)
}

/// Flip: toggle флага + зеркалирование горизонтального scale
///
/// Вызывается только когда facing реально расходится с намерением,
/// иначе scale зеркалился бы каждый tick.
pub fn flip(facing: &mut Facing, transform: &mut Transform) {
    facing.right = !facing.right;
    transform.scale.x = -transform.scale.x;
}

/// Повернуться к target_x, если ещё не смотрим туда
pub fn face_towards(facing: &mut Facing, transform: &mut Transform, target_x: f32) {
    let dx = target_x - transform.translation.x;
    if facing_disagrees(facing.right, dx) {
        flip(facing, transform);
    }
}

/// Движение с постоянной скоростью, без overshoot
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(delta)
    }
}

/// Векторный move_towards (return-to-spawn двигается по обеим осям)
pub fn move_towards_vec(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance < 1e-6 {
        target
    } else {
        current + delta / distance * max_delta
    }
}

/// Critically-damped сглаживание к target (инерция летающего варианта)
///
/// Семантика SmoothDamp: velocity — кэш между вызовами, smooth_time
/// задаёт инертность, max_speed ограничивает скорость приближения.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    delta_time: f32,
) -> f32 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;

    let x = omega * delta_time;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let max_change = max_speed * smooth_time;
    let change = (current - target).clamp(-max_change, max_change);
    let clamped_target = current - change;

    let temp = (*velocity + omega * change) * delta_time;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = clamped_target + (change + temp) * exp;

    // Защита от overshoot
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / delta_time;
    }

    output
}
