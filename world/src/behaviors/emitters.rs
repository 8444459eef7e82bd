//! Bolt traps and monster shrines.

use xorx_core::{
    Direction, Phase, Position, Projectile, ProjectileKind, SoundEffect, Tile, TrapState,
};

use super::{
    projectile::project, SHRINE_CHARGE_DELAY, SHRINE_COOLDOWN, SPAWN_DELAY, TRAP_ARM_DELAY,
    TRAP_COOLDOWN,
};
use crate::World;

pub(crate) fn activate_trap(world: &mut World, position: Position, state: TrapState) {
    match state {
        TrapState::Idle => {
            world.shape(position, Tile::BoltTrap(TrapState::Armed), TRAP_ARM_DELAY);
        }
        TrapState::Armed => {
            let mut heading = Direction::North;
            for _ in 0..Direction::ALL.len() {
                project(
                    world,
                    position.step(heading),
                    Projectile::new(ProjectileKind::Bolt, heading),
                );
                heading = heading.clockwise();
            }
            world.play(SoundEffect::Bolt);
            world.shape(position, Tile::BoltTrap(TrapState::Idle), TRAP_COOLDOWN);
        }
    }
}

pub(crate) fn activate_shrine(world: &mut World, position: Position, phase: Phase) {
    if let Some(next) = phase.next() {
        world.shape(position, Tile::Shrine(next), SHRINE_CHARGE_DELAY);
        return;
    }

    let direction = Direction::from_bits(world.random_byte());
    let target = position.step(direction);
    if world.is_visible(target) && world.tile(target).is_empty() {
        world.shape(target, Tile::Spawn(Phase::FIRST), SPAWN_DELAY);
        world.play(SoundEffect::Spawn);
    }
    world.shape(position, Tile::Shrine(Phase::FIRST), SHRINE_COOLDOWN);
}
