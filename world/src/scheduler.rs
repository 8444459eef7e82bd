//! One simulation step: restart and pause handling, camera scrolling, the
//! row-major sweep over the visible screen and screen hibernation.

use xorx_core::{
    Buttons, Event, InputSnapshot, Position, SoundEffect, Tile, VIEW_COLUMNS, VIEW_ROWS,
};

use crate::{behaviors, Tick, World};

pub(crate) fn step(world: &mut World, input: InputSnapshot) {
    world.input = input;

    if world.dead {
        if input.pressed(Buttons::A) {
            world.restart();
            return;
        }
    } else if input.pressed(Buttons::X) {
        world.paused = !world.paused;
        world.play(SoundEffect::Pause);
        world.events.push(Event::PauseToggled {
            paused: world.paused,
        });
    }
    if world.paused {
        return;
    }

    let screen = world.viewport.origin();
    let target = world.player.map_or(screen, Position::block);
    if world.viewport.scroll_toward(target) {
        world.events.push(Event::ViewScrolled {
            origin: world.viewport.origin(),
        });
        return;
    }

    world.teleported = false;
    sweep(world, screen);

    let destination = world.player.map_or(screen, Position::block);
    if destination == screen {
        world.tick = world.tick.next();
        return;
    }

    let resume = world.tick.next();
    world.grid.hibernate_screen(screen, resume);
    if let Some(player) = world.player {
        world.grid.hibernate(player, resume);
    }
    world.tick = Tick::ZERO;
    if world.teleported {
        world.viewport.snap_to(destination);
    }
    world.events.push(Event::ScreenChanged {
        from: screen,
        to: destination,
    });
    log::debug!("screen changed from {:?} to {:?}", screen, destination);
}

/// Dispatches every due cell of the screen anchored at `origin`, row by row.
fn sweep(world: &mut World, origin: Position) {
    let now = world.tick;
    for y in origin.y..origin.y + VIEW_ROWS {
        for x in origin.x..origin.x + VIEW_COLUMNS {
            let position = Position::new(x, y);
            let cell = world.grid.get(position);
            if cell.tile.is_empty() || cell.due != now {
                continue;
            }
            dispatch(world, position, cell.tile);
        }
    }
}

fn dispatch(world: &mut World, position: Position, tile: Tile) {
    match tile {
        Tile::Player(_) => behaviors::activate_player(world, position),
        Tile::Monster(tier) => behaviors::activate_monster(world, position, tier),
        Tile::Projectile(projectile) => {
            behaviors::activate_projectile(world, position, projectile);
        }
        Tile::BoltTrap(state) => behaviors::activate_trap(world, position, state),
        Tile::Shrine(phase) => behaviors::activate_shrine(world, position, phase),
        Tile::Explosion { phase, over_water } => {
            behaviors::explosion(world, position, phase, over_water);
        }
        Tile::Spawn(phase) => behaviors::spawn(world, position, phase),
        Tile::PlayerSpawn(phase) => behaviors::player_spawn(world, position, phase),
        Tile::Water { ripple } => behaviors::water(world, position, ripple),
        Tile::Empty
        | Tile::Wall(_)
        | Tile::SolidWall
        | Tile::Grass
        | Tile::Ruin
        | Tile::Boulder
        | Tile::Teleporter
        | Tile::Door
        | Tile::Pickup(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::testing::world_with_player;
    use crate::query;
    use xorx_core::{Direction, MonsterTier, Projectile, ProjectileKind};

    fn input(down: Buttons) -> InputSnapshot {
        InputSnapshot::new(down, Buttons::empty())
    }

    #[test]
    fn cells_act_only_when_due() {
        let mut world = World::new();
        let arrow = Projectile::new(ProjectileKind::Arrow, Direction::East);
        world.shape(Position::new(1, 1), Tile::Projectile(arrow), 2);

        step(&mut world, input(Buttons::empty()));
        assert_eq!(world.tile(Position::new(1, 1)), Tile::Projectile(arrow));
        step(&mut world, input(Buttons::empty()));
        assert_eq!(world.tile(Position::new(1, 1)), Tile::Projectile(arrow));
        step(&mut world, input(Buttons::empty()));
        assert_eq!(world.tile(Position::new(2, 1)), Tile::Projectile(arrow));
        assert_eq!(query::local_tick(&world), Tick::new(3));
    }

    #[test]
    fn eastward_movers_are_not_dispatched_twice() {
        let mut world = World::new();
        let arrow = Projectile::new(ProjectileKind::Arrow, Direction::East);
        world.shape(Position::new(1, 1), Tile::Projectile(arrow), 1);
        step(&mut world, input(Buttons::empty()));
        step(&mut world, input(Buttons::empty()));
        assert_eq!(world.tile(Position::new(2, 1)), Tile::Projectile(arrow));
    }

    #[test]
    fn pause_freezes_the_local_tick() {
        let mut world = World::new();
        step(&mut world, InputSnapshot::new(Buttons::X, Buttons::empty()));
        assert!(world.paused);
        assert_eq!(world.tick, Tick::ZERO);
        step(&mut world, InputSnapshot::new(Buttons::X, Buttons::X));
        assert_eq!(world.tick, Tick::ZERO);
        step(&mut world, InputSnapshot::new(Buttons::X, Buttons::empty()));
        assert!(!world.paused);
        assert_eq!(world.tick, Tick::new(1));
        assert_eq!(
            world.events,
            vec![
                Event::PauseToggled { paused: true },
                Event::PauseToggled { paused: false }
            ]
        );
    }

    #[test]
    fn leaving_the_screen_hibernates_it_and_resets_the_tick() {
        let start = Position::new(VIEW_COLUMNS - 1, 4);
        let mut world = world_with_player(start);
        let watcher = Position::new(3, 3);
        world.shape(watcher, Tile::Water { ripple: false }, 9);

        step(&mut world, input(Buttons::RIGHT));

        let entered = Position::new(VIEW_COLUMNS, 4);
        assert_eq!(world.player, Some(entered));
        assert_eq!(world.tick, Tick::ZERO);
        assert_eq!(query::cell(&world, watcher).due, Tick::new(8));
        assert_eq!(query::cell(&world, entered).due, Tick::new(3));
        assert_eq!(
            world.events,
            vec![Event::ScreenChanged {
                from: Position::new(0, 0),
                to: Position::new(VIEW_COLUMNS, 0)
            }]
        );

        step(&mut world, input(Buttons::empty()));
        assert_eq!(world.viewport.origin(), Position::new(2, 0));
        assert_eq!(world.tick, Tick::ZERO);
    }

    #[test]
    fn dead_player_ignores_input_until_restart() {
        let start = Position::new(5, 5);
        let mut world = world_with_player(start);
        world.counters.life = 1;
        behaviors::activate_monster(&mut world, Position::new(6, 5), MonsterTier::new(1));
        assert!(world.dead);

        step(&mut world, input(Buttons::X));
        assert!(!world.paused);
        assert_eq!(world.tick, Tick::new(1));

        step(&mut world, input(Buttons::A));
        assert!(!world.dead);
        assert_eq!(world.player, None);
        assert_eq!(world.tile(start), Tile::Empty);
    }
}
