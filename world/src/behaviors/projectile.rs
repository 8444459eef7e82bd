//! Arrow and bolt flight.

use xorx_core::{Position, Projectile, ProjectileKind, SoundEffect, Tile};

use super::{player, water_delay, BOLT_DAMAGE, MONSTER_DELAY, PROJECTILE_DELAY};
use crate::World;

pub(crate) fn activate(world: &mut World, position: Position, projectile: Projectile) {
    if projectile.submerged {
        let delay = water_delay(&mut world.random);
        world.shape(position, Tile::Water { ripple: false }, delay);
    } else {
        world.clear(position);
    }
    project(world, position.step(projectile.heading), projectile);
}

/// Moves `projectile` into `target` and resolves whatever it hits there.
pub(crate) fn project(world: &mut World, target: Position, projectile: Projectile) {
    if !world.is_visible(target) {
        return;
    }
    match world.tile(target) {
        Tile::Empty
        | Tile::Explosion {
            over_water: false, ..
        } => fly(world, target, projectile.with_submerged(false)),
        Tile::Water { .. }
        | Tile::Explosion {
            over_water: true, ..
        } => fly(world, target, projectile.with_submerged(true)),
        Tile::Monster(tier) => {
            world.play(SoundEffect::Hit);
            match tier.weaker() {
                Some(weaker) => world.shape(target, Tile::Monster(weaker), MONSTER_DELAY),
                None => world.explode(target),
            }
        }
        Tile::Grass | Tile::Ruin if projectile.kind == ProjectileKind::Arrow => {
            world.explode(target);
        }
        Tile::Player(_) if projectile.kind == ProjectileKind::Bolt => {
            player::damage(world, BOLT_DAMAGE);
        }
        _ => {}
    }
}

fn fly(world: &mut World, target: Position, projectile: Projectile) {
    world.shape(target, Tile::Projectile(projectile), PROJECTILE_DELAY);
}
