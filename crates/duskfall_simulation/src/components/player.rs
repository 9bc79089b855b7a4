//! Player collaborator marker
//!
//! Сам контроллер игрока — внешняя система; ядру от него нужны
//! только позиция (Transform) и damage-контракт (Health + ApplyDamage).

use bevy::prelude::*;

/// Маркер игрока — target-актор для комбатантов
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Spawn helper: заглушка игрока для headless симуляции и тестов
pub fn spawn_player_stub(commands: &mut Commands, position: Vec2, max_health: f32) -> Entity {
    use crate::components::{Actor, Health};

    commands
        .spawn((
            Player,
            Actor { faction_id: 0 },
            Health::new(max_health, 0.0),
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}
