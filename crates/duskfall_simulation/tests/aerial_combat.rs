//! Aerial combatant integration tests
//!
//! Headless прогон полного App: hover-стабилизация, combo ×2 + retreat,
//! двухфазная смерть fall-then-land, детерминизм патруля по seed.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use duskfall_simulation::*;
use std::time::Duration;

const DT: f64 = 1.0 / 60.0;

#[derive(Resource, Default)]
struct SignalLog(Vec<PresentationSignal>);

fn capture_signals(mut log: ResMut<SignalLog>, mut events: EventReader<PresentationSignal>) {
    for event in events.read() {
        log.0.push(event.clone());
    }
}

fn create_test_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        DT,
    )))
    .init_resource::<SignalLog>()
    .add_systems(Update, capture_signals);
    app
}

/// Critically damped пружина: damping² ≥ 4·mass·spring — без осцилляций
fn stable_hover_config() -> AerialConfig {
    AerialConfig {
        spring_strength: 100.0,
        spring_damping: 20.0,
        hover_bob_amount: 0.0,
        ..Default::default()
    }
}

fn spawn_flier(
    app: &mut App,
    player_pos: Vec2,
    enemy_pos: Vec2,
    config: AerialConfig,
) -> (Entity, Entity) {
    let mut commands = app.world_mut().commands();
    let player = spawn_player_stub(&mut commands, player_pos, 100.0);
    let enemy = spawn_aerial_combatant(
        &mut commands,
        enemy_pos,
        true,
        config,
        Health::new(30.0, 2.0),
        Attacker::default(),
        Some(player),
    );
    app.world_mut().flush();
    (player, enemy)
}

/// Test: hover-пружина удерживает высоту возле target (+bobbing)
#[test]
fn test_hover_holds_altitude() {
    let mut app = create_test_app(42);
    // Игрок далеко за зоной ⇒ peace, target_height = spawn.y
    let (_, enemy) = spawn_flier(
        &mut app,
        Vec2::new(100.0, 0.0),
        Vec2::new(0.0, 5.0),
        AerialConfig {
            can_patrol: false,
            ..stable_hover_config()
        },
    );

    // 10 sec симуляции: высота стабилизируется около spawn.y
    let mut max_deviation = 0.0f32;
    for tick in 0..600 {
        app.update();
        let y = app.world().get::<Transform>(enemy).unwrap().translation.y;
        // Даём пружине секунду на захват
        if tick > 60 {
            max_deviation = max_deviation.max((y - 5.0).abs());
        }
    }

    assert!(
        max_deviation < 1.0,
        "hover ушёл от цели: max deviation {}",
        max_deviation
    );
}

/// Test: chase-высота — hover над игроком издали, низкий заход вблизи
#[test]
fn test_chase_altitude_targets() {
    let mut app = create_test_app(42);
    let config = stable_hover_config();
    let hover_height = config.hover_height;
    // Игрок в зоне, за far_range (7.0): chase-ветка, hover над игроком
    let (_, enemy) = spawn_flier(&mut app, Vec2::new(9.0, 0.0), Vec2::new(0.0, 1.0), config);

    for _ in 0..5 {
        app.update();
    }
    let state = app.world().get::<AerialCombatant>(enemy).unwrap();
    assert!(
        (state.target_height - hover_height).abs() < 1e-4,
        "издали цель = player.y + hover_height, получили {}",
        state.target_height
    );

    // Сближение переводит в mid-range: низкий dive-заход над игроком
    for _ in 0..300 {
        app.update();
    }
    let state = app.world().get::<AerialCombatant>(enemy).unwrap();
    assert!(
        state.target_height < 1.0,
        "вблизи цель снижается к player.y + 0.5, получили {}",
        state.target_height
    );
    let y = app.world().get::<Transform>(enemy).unwrap().translation.y;
    assert!(y < 2.5, "должен был снизиться к игроку, y = {}", y);
}

/// Test: 2 light-удара, finisher, затем retreat-манёвр от игрока
#[test]
fn test_combo_two_then_finisher_and_retreat() {
    let mut app = create_test_app(42);
    let (_, enemy) = spawn_flier(
        &mut app,
        Vec2::ZERO,
        Vec2::new(0.8, 0.0),
        stable_hover_config(),
    );

    let start_x = 0.8;
    let mut max_x: f32 = start_x;

    // 2 light (0.4s) + finisher (1.0s recovery) + retreat 2s: до t=3.0
    for _ in 0..180 {
        app.update();
        let x = app.world().get::<Transform>(enemy).unwrap().translation.x;
        max_x = max_x.max(x);
    }

    let log = app.world().resource::<SignalLog>();
    let combat: Vec<_> = log
        .0
        .iter()
        .filter(|s| {
            matches!(
                s,
                PresentationSignal::PlayLightAttack { .. } | PresentationSignal::PlayFinisher { .. }
            )
        })
        .collect();

    let first_finisher = combat
        .iter()
        .position(|s| matches!(s, PresentationSignal::PlayFinisher { .. }))
        .expect("finisher должен был сработать");
    assert_eq!(
        first_finisher, 2,
        "у летающего перед finisher'ом ровно 2 light-удара"
    );

    // Retreat: смотрел влево (на игрока) ⇒ отлетает вправо
    assert!(
        max_x > start_x + 1.0,
        "retreat-манёвр должен был отнести от игрока, max_x = {}",
        max_x
    );
}

/// Test: двухфазная смерть — падение (census держится), контакт, despawn
#[test]
fn test_two_phase_death() {
    let mut app = create_test_app(42);
    let (_, enemy) = spawn_flier(
        &mut app,
        Vec2::new(100.0, 0.0),
        Vec2::new(0.0, 4.0),
        AerialConfig {
            can_patrol: false,
            ..stable_hover_config()
        },
    );

    for _ in 0..30 {
        app.update();
    }

    app.world_mut().send_event(ApplyDamage {
        target: enemy,
        amount: 999.0,
        source: None,
    });
    app.update();
    app.update();

    // Фаза 1: падает, но НЕ Dead — census ещё считает
    let state = app.world().get::<AerialCombatant>(enemy).unwrap();
    assert!(state.falling, "летальный урон должен запустить падение");
    assert!(
        app.world().get::<Dead>(enemy).is_none(),
        "Dead ставится только при контакте с землёй"
    );
    assert_eq!(faction_presence(app.world_mut(), 1), 1);

    // Урон по падающему — no-op (health уже 0, реакция не перезапускается)
    app.world_mut().send_event(ApplyDamage {
        target: enemy,
        amount: 10.0,
        source: None,
    });
    app.update();

    // Падение с ~4m при gravity_scale 3.0 — меньше секунды
    for _ in 0..90 {
        app.update();
    }
    assert!(
        app.world().get::<Dead>(enemy).is_some(),
        "после контакта с землёй — финальная фаза"
    );
    let y = app.world().get::<Transform>(enemy).unwrap().translation.y;
    assert!(y <= 0.5, "труп должен был долететь до земли, y = {}", y);

    // Grace delay 2s ⇒ структурное удаление, census падает
    for _ in 0..150 {
        app.update();
    }
    assert_eq!(faction_presence(app.world_mut(), 1), 0);

    let log = app.world().resource::<SignalLog>();
    assert!(log
        .0
        .iter()
        .any(|s| matches!(s, PresentationSignal::PlayDeath { .. })));
}

/// Test: патруль детерминирован по seed (две идентичные вселенные)
#[test]
fn test_patrol_deterministic_by_seed() {
    let run = |seed: u64| -> Vec<Vec2> {
        let mut app = create_test_app(seed);
        // Игрок вне зоны ⇒ чистый патруль по rng
        let (_, enemy) = spawn_flier(
            &mut app,
            Vec2::new(100.0, 0.0),
            Vec2::new(0.0, 5.0),
            stable_hover_config(),
        );

        let mut samples = Vec::new();
        for tick in 0..600 {
            app.update();
            if tick % 100 == 0 {
                let t = app.world().get::<Transform>(enemy).unwrap();
                samples.push(t.translation.truncate());
            }
        }
        samples
    };

    let first = run(7);
    let second = run(7);
    assert_eq!(first, second, "одинаковый seed ⇒ идентичные траектории");

    // Патруль действительно двигался (не стоял на месте все 10 секунд)
    let spawn = Vec2::new(0.0, 5.0);
    assert!(
        first.iter().any(|p| p.distance(spawn) > 1.0),
        "патруль не сдвинулся: {:?}",
        first
    );
}

/// Test: падение без контакта с землёй ⇒ принудительная финальная фаза
/// по timeout'у (10 s), считанная от начала падения по тем же часам
#[test]
fn test_fall_timeout_forces_final_death() {
    let mut app = create_test_app(42);
    // Земля недостижимо глубоко — контакт не случится за timeout
    app.insert_resource(GroundLevel { height: -100_000.0 });
    let (_, enemy) = spawn_flier(
        &mut app,
        Vec2::new(100.0, 0.0),
        Vec2::new(0.0, 5.0),
        AerialConfig {
            can_patrol: false,
            ..stable_hover_config()
        },
    );

    for _ in 0..30 {
        app.update();
    }
    app.world_mut().send_event(ApplyDamage {
        target: enemy,
        amount: 999.0,
        source: None,
    });
    app.update();
    assert!(app.world().get::<AerialCombatant>(enemy).unwrap().falling);

    // 9.5 s падения: ещё не Dead
    for _ in 0..570 {
        app.update();
    }
    assert!(
        app.world().get::<Dead>(enemy).is_none(),
        "до timeout'а труп ещё падает"
    );

    // Ещё секунда — timeout истёк: Dead + pin
    for _ in 0..60 {
        app.update();
    }
    assert!(app.world().get::<Dead>(enemy).is_some());
    assert!(
        app.world().get::<PhysicsBody>(enemy).unwrap().pinned,
        "после timeout'а тело pinned"
    );

    // Grace delay ⇒ структурное удаление
    for _ in 0..150 {
        app.update();
    }
    assert_eq!(faction_presence(app.world_mut(), 1), 0);
}

/// Test: урон отменяет retreat и перезапускает hurt-реакцию
#[test]
fn test_damage_cancels_retreat() {
    let mut app = create_test_app(42);
    let (_, enemy) = spawn_flier(
        &mut app,
        Vec2::ZERO,
        Vec2::new(0.8, 0.0),
        stable_hover_config(),
    );

    // До finisher'а (t≈0.8) + начало retreat
    for _ in 0..70 {
        app.update();
    }
    let state = app.world().get::<AerialCombatant>(enemy).unwrap();
    assert!(state.retreating, "после finisher retreat должен быть armed");

    app.world_mut().send_event(ApplyDamage {
        target: enemy,
        amount: 5.0,
        source: None,
    });
    app.update();
    app.update();

    let state = app.world().get::<AerialCombatant>(enemy).unwrap();
    let hurt = app.world().get::<HurtReaction>(enemy).unwrap();
    assert!(!state.retreating, "урон отменяет retreat");
    assert!(hurt.playing, "урон перезапускает hurt-реакцию");
}
