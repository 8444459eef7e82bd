//! Self-driving animations: explosions, spawns and water.

use xorx_core::{MonsterTier, Phase, Pose, Position, Tile};

use super::{water_delay, EXPLOSION_DELAY, MONSTER_DELAY, PLAYER_IDLE_DELAY, SPAWN_DELAY};
use crate::World;

pub(crate) fn explosion(world: &mut World, position: Position, phase: Phase, over_water: bool) {
    match phase.next() {
        Some(phase) => world.shape(
            position,
            Tile::Explosion { phase, over_water },
            EXPLOSION_DELAY,
        ),
        None if over_water => water(world, position, true),
        None => world.clear(position),
    }
}

pub(crate) fn spawn(world: &mut World, position: Position, phase: Phase) {
    match phase.next() {
        Some(phase) => world.shape(position, Tile::Spawn(phase), SPAWN_DELAY),
        None => {
            let tier = MonsterTier::new(world.random_byte());
            world.shape(position, Tile::Monster(tier), MONSTER_DELAY);
        }
    }
}

pub(crate) fn player_spawn(world: &mut World, position: Position, phase: Phase) {
    match phase.next() {
        Some(phase) => world.shape(position, Tile::PlayerSpawn(phase), SPAWN_DELAY),
        None => world.shape(position, Tile::Player(Pose::Stand), PLAYER_IDLE_DELAY),
    }
}

/// Flips the ripple frame and waits a random while.
pub(crate) fn water(world: &mut World, position: Position, ripple: bool) {
    let delay = water_delay(&mut world.random);
    world.shape(position, Tile::Water { ripple: !ripple }, delay);
}
