//! Rigid body заглушка: velocity, масса, gravity scale
//!
//! Внешний физический движок вне скоупа — интегрируем velocity сами,
//! fixed timestep 60Hz.

use bevy::prelude::*;

/// Величина гравитации (m/s², знак вниз)
pub const GRAVITY: f32 = -9.81;

/// Физическое тело комбатанта
///
/// Силы аккумулируются в velocity внутри одного FixedUpdate tick,
/// integrate_velocity переносит velocity в Transform.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec2,
    pub mass: f32,
    /// Множитель гравитации (3.0 во время падения трупа)
    pub gravity_scale: f32,
    /// Pinned тело не двигается (труп после приземления)
    pub pinned: bool,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            mass: 1.0,
            gravity_scale: 1.0,
            pinned: false,
        }
    }
}

impl PhysicsBody {
    /// Приложить силу на один fixed tick: Δv = F / m × dt
    pub fn apply_force(&mut self, force: Vec2, delta_time: f32) {
        self.velocity += force / self.mass * delta_time;
    }

    /// Мгновенный импульс: Δv = J / m
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse / self.mass;
    }
}

/// Уровень земли для landing detection падающих трупов
///
/// Stub вместо collision layers: поверхность считается ground-classified
/// когда translation.y ≤ height.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GroundLevel {
    pub height: f32,
}

impl Default for GroundLevel {
    fn default() -> Self {
        Self { height: 0.0 }
    }
}

/// Система: гравитация → velocity
pub fn apply_gravity(mut query: Query<&mut PhysicsBody>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut body in query.iter_mut() {
        if body.pinned {
            continue;
        }
        let dv = GRAVITY * body.gravity_scale * delta;
        body.velocity.y += dv;
    }
}

/// Система: velocity → Transform
pub fn integrate_velocity(
    mut query: Query<(&PhysicsBody, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (body, mut transform) in query.iter_mut() {
        if body.pinned {
            continue;
        }
        transform.translation += body.velocity.extend(0.0) * delta;
    }
}
