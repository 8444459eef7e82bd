//! Monsters chase the player one orthogonal step at a time.

use xorx_core::{Direction, MonsterTier, Position, Tile};

use super::{player, MONSTER_DELAY};
use crate::{random::RandomBytes, World};

pub(crate) fn activate(world: &mut World, position: Position, tier: MonsterTier) {
    let direction = world
        .player
        .and_then(|target| chase(position, target, &mut world.random));
    let Some(direction) = direction else {
        world.shape(position, Tile::Monster(tier), MONSTER_DELAY);
        return;
    };

    let destination = position.step(direction);
    if !world.is_visible(destination) {
        world.shape(position, Tile::Monster(tier), MONSTER_DELAY);
        return;
    }
    match world.tile(destination) {
        Tile::Empty => {
            world.clear(position);
            world.shape(destination, Tile::Monster(tier), MONSTER_DELAY);
        }
        Tile::Player(_) => {
            world.explode(position);
            player::damage(world, u16::from(tier.level()));
        }
        _ => world.shape(position, Tile::Monster(tier), MONSTER_DELAY),
    }
}

/// Picks one orthogonal step toward `target`; diagonal offsets drop an axis at random.
fn chase(from: Position, target: Position, random: &mut RandomBytes) -> Option<Direction> {
    let mut dx = target.x - from.x;
    let dy = target.y - from.y;
    if dx != 0 && dy != 0 && random.next_byte() & 1 == 0 {
        dx = 0;
    }
    if dx > 0 {
        Some(Direction::East)
    } else if dx < 0 {
        Some(Direction::West)
    } else if dy > 0 {
        Some(Direction::South)
    } else if dy < 0 {
        Some(Direction::North)
    } else {
        None
    }
}
