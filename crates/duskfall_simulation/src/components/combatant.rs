//! Боевой state комбатанта: ComboCounter, ActionLock, HurtReaction, Attacker, EngageTarget

use bevy::prelude::*;

/// Счётчик combo-ударов
///
/// Инвариант: 0 ≤ count ≤ cap (3 для наземного, 2 для летающего).
/// Сбрасывается при любом выходе из melee-ветки: смена дистанции,
/// полученный урон, peace state.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ComboCounter {
    pub count: u32,
    pub cap: u32,
}

impl ComboCounter {
    pub fn new(cap: u32) -> Self {
        Self { count: 0, cap }
    }

    /// Достигнут ли cap — следующий удар будет finisher
    pub fn at_cap(&self) -> bool {
        self.count >= self.cap
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// Action lock: окно восстановления после атаки/скилла
///
/// Хранится как абсолютный instant (секунды от старта симуляции),
/// не countdown. Пока now < next_action_time — никакого движения
/// и новых атак; урон при этом проходит.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ActionLock {
    pub next_action_time: f32,
}

impl ActionLock {
    pub fn is_locked(&self, now: f32) -> bool {
        now < self.next_action_time
    }

    pub fn lock_until(&mut self, instant: f32) {
        self.next_action_time = instant;
    }
}

/// Playback-состояние hurt-реакции (адаптер внешнего аниматора)
///
/// Ядро не ждёт анимацию — оно лишь читает назад "играет ли ещё
/// hurt" через этот компонент. Презентационный слой (или
/// tick_hurt_reactions в headless режиме) двигает progress.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HurtReaction {
    pub playing: bool,
    /// Normalized progress [0, 1]
    pub progress: f32,
    /// Длительность реакции (секунды)
    pub duration: f32,
}

impl Default for HurtReaction {
    fn default() -> Self {
        Self {
            playing: false,
            progress: 0.0,
            duration: 0.3,
        }
    }
}

impl HurtReaction {
    /// Перезапуск реакции (урон прерывает и начинает заново)
    pub fn restart(&mut self) {
        self.playing = true;
        self.progress = 0.0;
    }

    /// Hurt-stun: актор полностью неуправляем пока реакция не доиграла
    pub fn is_stunning(&self) -> bool {
        self.playing && self.progress < 1.0
    }
}

/// Характеристики атакующего: урон и hit-детекция
///
/// Якорь атаки — смещение от позиции актора в сторону facing;
/// overlap query в hit checkpoint идёт из этой точки.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Базовый урон (finisher = 1.5x)
    pub base_damage: f32,
    /// Радиус overlap-проверки
    pub hit_radius: f32,
    /// Смещение якоря атаки от центра актора (x — вдоль facing)
    pub anchor_offset: Vec2,
}

impl Default for Attacker {
    fn default() -> Self {
        Self {
            base_damage: 10.0,
            hit_radius: 0.6,
            anchor_offset: Vec2::new(0.7, 0.0),
        }
    }
}

/// Ссылка на target-актора (игрока), разрешается один раз при спавне
///
/// None ⇒ комбатант перманентно no-op'ит decide tick (но остаётся
/// damageable, а летающий — под hover-интегратором).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct EngageTarget(pub Option<Entity>);
