//! Базовые компоненты акторов: Actor, Health, Facing, SpawnAnchor

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Актор (комбатант, игрок) — базовый компонент для живых существ
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Actor {
    /// Stable ID фракции (0 = player, 1 = hostiles)
    pub faction_id: u64,
}

/// Здоровье актора
///
/// Инвариант: 0.0 ≤ current ≤ max.
/// Float, потому что passive regen — непрерывное накопление per-tick.
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    /// HP per second в peace state
    pub regen_rate: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(50.0, 5.0)
    }
}

impl Health {
    pub fn new(max: f32, regen_rate: f32) -> Self {
        Self {
            current: max,
            max,
            regen_rate,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Пассивная регенерация, clamped к max на каждом шаге
    pub fn regenerate(&mut self, delta_time: f32) {
        self.current = (self.current + self.regen_rate * delta_time).min(self.max);
    }
}

/// Направление взгляда (горизонтальный флаг)
///
/// Инвариант: пока актор не залочен, facing совпадает со знаком
/// горизонтального намерения движения. `initial_right` запоминается
/// при спавне и восстанавливается только при возврате к spawn point.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Facing {
    pub right: bool,
    pub initial_right: bool,
}

impl Facing {
    /// Читаем стартовое направление из знака x-scale (как его выставил spawn)
    pub fn from_scale_x(scale_x: f32) -> Self {
        let right = scale_x >= 0.0;
        Self {
            right,
            initial_right: right,
        }
    }
}

/// Точка спавна — якорь патруля и return-to-spawn
///
/// Фиксируется при создании, дальше не меняется.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SpawnAnchor {
    pub position: Vec2,
}

impl SpawnAnchor {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }
}
