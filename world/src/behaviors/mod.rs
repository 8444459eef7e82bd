//! Per-tile activation rules, dispatched by the scheduler when a cell is due.

use crate::random::RandomBytes;

mod animation;
mod emitters;
mod monster;
mod player;
mod projectile;

pub(crate) use animation::{explosion, player_spawn, spawn, water};
pub(crate) use emitters::{activate_shrine, activate_trap};
pub(crate) use monster::activate as activate_monster;
pub(crate) use player::activate as activate_player;
pub(crate) use projectile::activate as activate_projectile;

pub(crate) const PLAYER_IDLE_DELAY: u8 = 1;
pub(crate) const PLAYER_MOVE_DELAY: u8 = 4;
pub(crate) const PLAYER_SHOOT_DELAY: u8 = 8;
pub(crate) const PLAYER_MAGIC_DELAY: u8 = 6;
pub(crate) const PLAYER_DEFEND_DELAY: u8 = 6;
pub(crate) const MONSTER_DELAY: u8 = 10;
pub(crate) const PROJECTILE_DELAY: u8 = 2;
pub(crate) const TRAP_ARM_DELAY: u8 = 15;
pub(crate) const TRAP_COOLDOWN: u8 = 90;
pub(crate) const SHRINE_CHARGE_DELAY: u8 = 20;
pub(crate) const SHRINE_COOLDOWN: u8 = 150;
pub(crate) const EXPLOSION_DELAY: u8 = 3;
pub(crate) const SPAWN_DELAY: u8 = 4;

const BOLT_DAMAGE: u16 = 2;

/// Delay before a water cell swaps its ripple frame.
pub(crate) fn water_delay(random: &mut RandomBytes) -> u8 {
    20 + (random.next_byte() & 31)
}
