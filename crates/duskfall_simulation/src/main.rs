//! Headless симуляция DUSKFALL
//!
//! Запускает Bevy App без рендера: игрок-заглушка и два враждебных
//! комбатанта (наземный + летающий), прогон тиков с census-отчётом

use bevy::prelude::*;
use duskfall_simulation::{
    create_headless_app, faction_presence, spawn_aerial_combatant, spawn_ground_combatant,
    spawn_player_stub, AerialConfig, Attacker, GroundConfig, Health,
};

fn main() {
    let seed = 42;
    println!("Starting DUSKFALL headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);

    // Мир: игрок в центре, стражи по бокам
    let player = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player_stub(&mut commands, Vec2::new(0.0, 0.0), 100.0);

        spawn_ground_combatant(
            &mut commands,
            Vec2::new(6.0, 0.0),
            false,
            GroundConfig::default(),
            Health::new(50.0, 2.0),
            Attacker::default(),
            Some(player),
        );
        spawn_aerial_combatant(
            &mut commands,
            Vec2::new(-8.0, 4.0),
            true,
            AerialConfig::default(),
            Health::new(30.0, 2.0),
            Attacker::default(),
            Some(player),
        );
        player
    };
    app.world_mut().flush();

    // Прогон 1000 тиков
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let hostiles = faction_presence(app.world_mut(), 1);
            println!("Tick {}: {} hostiles alive (player: {:?})", tick, hostiles, player);
        }
    }

    println!("Simulation complete!");
}
