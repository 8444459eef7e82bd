//! Player input handling, movement and damage.

use xorx_core::{
    Buttons, Direction, Event, Pose, Position, Projectile, ProjectileKind, SoundEffect, Tile,
};

use super::{
    projectile::project, PLAYER_DEFEND_DELAY, PLAYER_IDLE_DELAY, PLAYER_MAGIC_DELAY,
    PLAYER_MOVE_DELAY, PLAYER_SHOOT_DELAY,
};
use crate::World;

/// Result of trying to walk into a neighbouring cell.
enum Walk {
    /// The player now stands on `to`.
    Moved { to: Position, sound: SoundEffect },
    /// The player stays put and re-poses.
    Stopped(SoundEffect),
    /// The destination handled everything, including the player's cell.
    Resolved,
}

pub(crate) fn activate(world: &mut World, position: Position) {
    let input = world.input;
    let direction = input.direction();

    if input.held(Buttons::A) {
        match direction {
            Some(direction) => fire(world, position, direction),
            None => world.shape(position, Tile::Player(Pose::Magic), PLAYER_MAGIC_DELAY),
        }
        return;
    }

    let Some(direction) = direction else {
        world.shape(position, Tile::Player(Pose::Stand), PLAYER_IDLE_DELAY);
        return;
    };

    match walk(world, position, direction) {
        Walk::Moved { to, sound } => {
            relocate(world, position, to);
            world.play(sound);
        }
        Walk::Stopped(sound) => {
            world.shape(position, Tile::Player(Pose::Stand), PLAYER_MOVE_DELAY);
            world.play(sound);
        }
        Walk::Resolved => {}
    }
}

fn fire(world: &mut World, position: Position, direction: Direction) {
    if world.counters.ammo == 0 {
        world.shape(position, Tile::Player(Pose::Stand), PLAYER_MOVE_DELAY);
        world.play(SoundEffect::Blocked);
        return;
    }
    world.counters.ammo -= 1;
    world.shape(position, Tile::Player(Pose::Shoot), PLAYER_SHOOT_DELAY);
    world.play(SoundEffect::Shoot);
    project(
        world,
        position.step(direction),
        Projectile::new(ProjectileKind::Arrow, direction),
    );
}

fn walk(world: &mut World, position: Position, direction: Direction) -> Walk {
    let destination = position.step(direction);
    match world.tile(destination) {
        Tile::Empty => Walk::Moved {
            to: destination,
            sound: SoundEffect::Step,
        },
        Tile::Grass => {
            world.clear(destination);
            Walk::Stopped(SoundEffect::Cut)
        }
        Tile::Monster(tier) => {
            world.explode(destination);
            damage(world, u16::from(tier.level()) + 1);
            Walk::Resolved
        }
        Tile::Teleporter => teleport(world, position, destination, direction),
        Tile::Boulder => {
            if push(world, destination, direction) {
                Walk::Moved {
                    to: destination,
                    sound: SoundEffect::Step,
                }
            } else {
                Walk::Stopped(SoundEffect::Blocked)
            }
        }
        Tile::Pickup(pickup) => {
            world.counters.collect(pickup);
            Walk::Moved {
                to: destination,
                sound: SoundEffect::Pickup,
            }
        }
        Tile::Door if world.counters.keys > 0 => {
            world.counters.keys -= 1;
            world.clear(destination);
            Walk::Stopped(SoundEffect::Door)
        }
        _ => Walk::Stopped(SoundEffect::Blocked),
    }
}

fn relocate(world: &mut World, from: Position, to: Position) {
    world.clear(from);
    world.shape(to, Tile::Player(Pose::Stand), PLAYER_MOVE_DELAY);
    world.player = Some(to);
}

/// Scans past `entry` for the paired pad and lands one cell beyond it.
fn teleport(world: &mut World, from: Position, entry: Position, direction: Direction) -> Walk {
    let mut cursor = entry.step(direction);
    while cursor.in_bounds() {
        if world.tile(cursor) == Tile::Teleporter {
            let landing = cursor.step(direction);
            if !world.tile(landing).is_empty() {
                break;
            }
            relocate(world, from, landing);
            world.teleported = true;
            world.play(SoundEffect::Teleport);
            world.events.push(Event::PlayerTeleported { from, to: landing });
            return Walk::Resolved;
        }
        cursor = cursor.step(direction);
    }
    Walk::Stopped(SoundEffect::Blocked)
}

/// Pushes the boulder at `boulder`. Returns `true` when the boulder moved away.
fn push(world: &mut World, boulder: Position, direction: Direction) -> bool {
    let beyond = boulder.step(direction);
    match world.tile(beyond) {
        Tile::Empty => {
            world.clear(boulder);
            world.place(beyond, Tile::Boulder);
            world.play(SoundEffect::Push);
            true
        }
        Tile::Monster(_) => {
            world.explode(beyond);
            false
        }
        Tile::Water { .. } => {
            world.clear(boulder);
            world.explode(beyond);
            world.play(SoundEffect::Splash);
            false
        }
        _ => false,
    }
}

/// Takes `amount` life from the player, killing it when nothing would remain.
pub(crate) fn damage(world: &mut World, amount: u16) {
    let Some(position) = world.player else {
        return;
    };
    if world.dead {
        return;
    }
    if amount < world.counters.life {
        world.counters.life -= amount;
        world.shape(position, Tile::Player(Pose::Defend), PLAYER_DEFEND_DELAY);
        world.play(SoundEffect::Hurt);
        return;
    }
    world.counters.life = 0;
    world.dead = true;
    world.explode(position);
    world.play(SoundEffect::Death);
    world.events.push(Event::PlayerDied { at: position });
    log::info!("player died at {:?}", position);
}
