//! Continuous-физика (integrate pass, FixedUpdate 60Hz)
//!
//! Собственная velocity-интеграция вместо внешнего физического движка:
//! - PhysicsBody: velocity + mass + gravity_scale
//! - apply_gravity → hover force → integrate, последовательной цепочкой
//!
//! Integrate pass не зависит от decide pass по порядку: он лишь читает
//! target_height, который decide мог перезаписать в любой момент
//! (last-write-wins, оба на одном потоке).

use bevy::prelude::*;

pub mod body;
pub mod hover;

pub use body::{GroundLevel, PhysicsBody, GRAVITY};

/// Physics Plugin
///
/// Порядок выполнения в FixedUpdate:
/// 1. hover_integrator — spring/damping/компенсация для летающих
/// 2. apply_gravity — гравитация для всех тел
/// 3. integrate_velocity — velocity → Transform
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GroundLevel>().add_systems(
            FixedUpdate,
            (
                hover::hover_integrator,
                body::apply_gravity,
                body::integrate_velocity,
            )
                .chain(), // Последовательное выполнение для детерминизма
        );
    }
}
