//! Presentation signals — fire-and-forget команды внешнему слою
//!
//! Ядро никогда не ждёт визуальной длительности сигнала; единственный
//! read-back — HurtReaction (играет ли ещё hurt-анимация), который в
//! headless режиме двигает tick_hurt_reactions.

use crate::components::HurtReaction;
use bevy::prelude::*;

/// Дискретный сигнал презентационному слою (анимация/звук)
///
/// За один decide tick эмитится максимум одна combat-команда
/// (Light/Finisher/Dash) и максимум одна movement-команда (SetRunning).
#[derive(Event, Debug, Clone, PartialEq)]
pub enum PresentationSignal {
    PlayLightAttack { actor: Entity },
    PlayFinisher { actor: Entity },
    PlayDashAttack { actor: Entity },
    PlayHurtReaction { actor: Entity },
    PlayDeath { actor: Entity },
    SetRunning { actor: Entity, running: bool },
}

/// Presentation Plugin
///
/// Регистрирует сигнал-событие и playback hurt-реакций (заглушка
/// внешнего аниматора для headless симуляции).
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PresentationSignal>()
            .add_systems(Update, tick_hurt_reactions);
    }
}

/// Система: продвигает normalized progress hurt-реакций
///
/// Stun снимается чисто по завершению playback, отдельного таймера нет.
pub fn tick_hurt_reactions(mut query: Query<&mut HurtReaction>, time: Res<Time>) {
    let delta = time.delta_secs();

    for mut hurt in query.iter_mut() {
        if !hurt.playing {
            continue;
        }

        hurt.progress += delta / hurt.duration.max(1e-4);
        if hurt.progress >= 1.0 {
            hurt.progress = 1.0;
            hurt.playing = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hurt_playback_completes() {
        let mut hurt = HurtReaction {
            playing: true,
            progress: 0.0,
            duration: 0.3,
        };

        // Вручную прокручиваем playback (логика tick_hurt_reactions)
        let delta = 0.1;
        for _ in 0..4 {
            if hurt.playing {
                hurt.progress += delta / hurt.duration;
                if hurt.progress >= 1.0 {
                    hurt.progress = 1.0;
                    hurt.playing = false;
                }
            }
        }

        assert!(!hurt.playing);
        assert_eq!(hurt.progress, 1.0);
        assert!(!hurt.is_stunning());
    }
}
