//! Aliveness census для portal/gate collaborator
//!
//! Gate считает живых по структурному присутствию entity в мире,
//! не по отдельному API: Dead-но-не-деспавненный труп ещё считается,
//! полностью удалённый (после 2s grace) — нет. Единственная
//! обязанность ядра — действительно despawn'ить, а не прятать.

use crate::components::Actor;
use bevy::prelude::*;

/// Сколько акторов фракции структурно присутствует в мире
pub fn faction_presence(world: &mut World, faction_id: u64) -> usize {
    let mut query = world.query::<&Actor>();
    query
        .iter(world)
        .filter(|actor| actor.faction_id == faction_id)
        .count()
}

/// Остались ли враги (gate открывается когда false)
pub fn any_hostile_present(world: &mut World, hostile_faction: u64) -> bool {
    faction_presence(world, hostile_faction) > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_census_counts_by_faction() {
        let mut world = World::new();
        world.spawn(Actor { faction_id: 1 });
        world.spawn(Actor { faction_id: 1 });
        world.spawn(Actor { faction_id: 0 }); // Игрок не считается врагом

        assert_eq!(faction_presence(&mut world, 1), 2);
        assert!(any_hostile_present(&mut world, 1));
    }

    #[test]
    fn test_census_drops_after_despawn() {
        let mut world = World::new();
        let enemy = world.spawn(Actor { faction_id: 1 }).id();
        assert_eq!(faction_presence(&mut world, 1), 1);

        world.despawn(enemy);
        assert_eq!(faction_presence(&mut world, 1), 0);
        assert!(!any_hostile_present(&mut world, 1));
    }
}
