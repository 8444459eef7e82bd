#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Kingdom of Xorx.
//!
//! The world is a cellular automaton: every cell stores a tile and the local
//! tick at which it next acts. Each [`Command::Step`] sweeps the visible screen
//! and dispatches the cells that are due; everything off screen is hibernated
//! until the player returns.

use std::mem;

use xorx_core::{Command, Event, Pickup, Position, SoundEffect, SoundSet, Tile, COUNTER_LIMIT};

mod behaviors;
mod grid;
mod loader;
mod random;
mod scheduler;
mod viewport;

pub use grid::{Cell, Tick};
pub use loader::{LoadError, WorldImage};
pub use random::RandomBytes;

use grid::Grid;
use viewport::Viewport;

const STARTING_LIFE: u16 = 10;
const STARTING_AMMO: u16 = 10;

/// Inventory counters shown in the status bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Counters {
    /// Remaining life points.
    pub life: u16,
    /// Arrows available to fire.
    pub ammo: u16,
    /// Flasks collected.
    pub flasks: u16,
    /// Keys available for locked doors.
    pub keys: u16,
    /// Gold collected.
    pub gold: u16,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            life: STARTING_LIFE,
            ammo: STARTING_AMMO,
            flasks: 0,
            keys: 0,
            gold: 0,
        }
    }
}

impl Counters {
    fn collect(&mut self, pickup: Pickup) {
        let counter = match pickup {
            Pickup::Life => &mut self.life,
            Pickup::Ammo => &mut self.ammo,
            Pickup::Flask => &mut self.flasks,
            Pickup::Key => &mut self.keys,
            Pickup::Gold => &mut self.gold,
        };
        *counter = counter.saturating_add(1).min(COUNTER_LIMIT);
    }
}

/// Represents one running game session.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    viewport: Viewport,
    tick: Tick,
    random: RandomBytes,
    player: Option<Position>,
    counters: Counters,
    paused: bool,
    dead: bool,
    teleported: bool,
    input: xorx_core::InputSnapshot,
    sounds: SoundSet,
    events: Vec<Event>,
    blueprint: Option<WorldImage>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty session: no terrain, no player, default counters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            viewport: Viewport::default(),
            tick: Tick::ZERO,
            random: RandomBytes::new(),
            player: None,
            counters: Counters::default(),
            paused: false,
            dead: false,
            teleported: false,
            input: xorx_core::InputSnapshot::default(),
            sounds: SoundSet::new(),
            events: Vec::new(),
            blueprint: None,
        }
    }

    /// Creates a session from a decoded world image. The image is kept for restarts.
    pub fn from_image(image: WorldImage) -> Result<Self, LoadError> {
        let mut world = Self::new();
        let start = loader::populate(&image, &mut world.grid, &mut world.random)?;
        world.player = start;
        world.viewport = Viewport::showing(start);
        world.blueprint = Some(image);
        Ok(world)
    }

    /// Replaces the whole session with a fresh one built from the same image.
    fn restart(&mut self) {
        let fresh = match self.blueprint.take() {
            Some(image) => match Self::from_image(image) {
                Ok(world) => world,
                Err(error) => {
                    log::error!("failed to rebuild world on restart: {error}");
                    Self::new()
                }
            },
            None => Self::new(),
        };
        let events = mem::take(&mut self.events);
        *self = fresh;
        self.events = events;
        self.events.push(Event::GameRestarted);
        log::info!("new game started");
    }

    pub(crate) fn tile(&self, position: Position) -> Tile {
        self.grid.get(position).tile
    }

    pub(crate) fn is_visible(&self, position: Position) -> bool {
        self.viewport.contains(position)
    }

    /// Stores `tile` so that it becomes active `delay` ticks from now.
    pub(crate) fn shape(&mut self, position: Position, tile: Tile, delay: u8) {
        let due = self.tick.after(delay.max(1));
        self.grid.set(position, Cell::new(tile, due));
    }

    /// Stores an inert tile that never needs to act.
    pub(crate) fn place(&mut self, position: Position, tile: Tile) {
        self.grid.set(position, Cell::new(tile, self.tick));
    }

    pub(crate) fn clear(&mut self, position: Position) {
        self.grid.clear(position);
    }

    /// Starts an explosion; water under it survives the blast.
    pub(crate) fn explode(&mut self, position: Position) {
        let over_water = matches!(self.tile(position), Tile::Water { .. });
        self.shape(
            position,
            Tile::Explosion {
                phase: xorx_core::Phase::FIRST,
                over_water,
            },
            behaviors::EXPLOSION_DELAY,
        );
        self.play(SoundEffect::Explode);
    }

    pub(crate) fn play(&mut self, effect: SoundEffect) {
        self.sounds.insert(effect);
    }

    pub(crate) fn random_byte(&mut self) -> u8 {
        self.random.next_byte()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Step { input } => scheduler::step(world, input),
        Command::Restart => world.restart(),
    }
    out_events.append(&mut world.events);
}

/// Drains the sound effects requested since the previous call.
pub fn take_sounds(world: &mut World) -> SoundSet {
    mem::take(&mut world.sounds)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use xorx_core::{Position, Tile, MAP_COLUMNS, MAP_ROWS};

    use super::{Cell, Counters, Tick, World};

    /// Cell stored at `position`; solid wall outside the grid.
    #[must_use]
    pub fn cell(world: &World, position: Position) -> Cell {
        world.grid.get(position)
    }

    /// Tile stored at `position`; solid wall outside the grid.
    #[must_use]
    pub fn tile(world: &World, position: Position) -> Tile {
        world.tile(position)
    }

    /// Current player location, if the world has a player.
    #[must_use]
    pub fn player(world: &World) -> Option<Position> {
        world.player
    }

    /// Top-left corner of the visible rectangle.
    #[must_use]
    pub fn view_origin(world: &World) -> Position {
        world.viewport.origin()
    }

    /// Reports whether `position` lies on the screen currently shown.
    #[must_use]
    pub fn is_visible(world: &World, position: Position) -> bool {
        world.is_visible(position)
    }

    /// Local tick of the current screen.
    #[must_use]
    pub fn local_tick(world: &World) -> Tick {
        world.tick
    }

    /// Inventory counters.
    #[must_use]
    pub fn counters(world: &World) -> Counters {
        world.counters
    }

    /// Whether the simulation is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Whether the player has died and the game awaits a restart.
    #[must_use]
    pub fn is_dead(world: &World) -> bool {
        world.dead
    }

    /// Iterates over every position whose tile satisfies `predicate`, row-major.
    pub fn positions_where<'a>(
        world: &'a World,
        predicate: impl Fn(Tile) -> bool + 'a,
    ) -> impl Iterator<Item = Position> + 'a {
        (0..MAP_ROWS)
            .flat_map(|y| (0..MAP_COLUMNS).map(move |x| Position::new(x, y)))
            .filter(move |position| predicate(world.tile(*position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xorx_core::{Buttons, InputSnapshot, Phase};

    #[test]
    fn new_world_is_empty_and_idle() {
        let world = World::new();
        assert_eq!(query::player(&world), None);
        assert_eq!(query::view_origin(&world), Position::default());
        assert_eq!(query::counters(&world), Counters::default());
        assert_eq!(query::positions_where(&world, |tile| !tile.is_empty()).count(), 0);
    }

    #[test]
    fn shape_sets_due_relative_to_local_tick() {
        let mut world = World::new();
        world.tick = Tick::new(250);
        let position = Position::new(3, 3);

        world.shape(position, Tile::Grass, 10);

        let cell = query::cell(&world, position);
        assert_eq!(cell.tile, Tile::Grass);
        assert_eq!(cell.due, Tick::new(4));
    }

    #[test]
    fn shape_never_schedules_for_the_current_tick() {
        let mut world = World::new();
        world.tick = Tick::new(7);
        world.shape(Position::new(1, 1), Tile::Grass, 0);
        assert_eq!(query::cell(&world, Position::new(1, 1)).due, Tick::new(8));
    }

    #[test]
    fn counters_cap_at_limit() {
        let mut counters = Counters {
            gold: COUNTER_LIMIT - 1,
            ..Counters::default()
        };
        counters.collect(Pickup::Gold);
        counters.collect(Pickup::Gold);
        assert_eq!(counters.gold, COUNTER_LIMIT);
        counters.collect(Pickup::Key);
        assert_eq!(counters.keys, 1);
    }

    #[test]
    fn explosion_over_water_remembers_the_water() {
        let mut world = World::new();
        let position = Position::new(4, 4);
        world.shape(position, Tile::Water { ripple: false }, 5);

        world.explode(position);

        assert_eq!(
            world.tile(position),
            Tile::Explosion {
                phase: Phase::FIRST,
                over_water: true
            }
        );
        assert!(take_sounds(&mut world).contains(SoundEffect::Explode));
        assert!(take_sounds(&mut world).is_empty());
    }

    #[test]
    fn restart_without_blueprint_resets_to_defaults() {
        let mut world = World::new();
        world.counters.life = 0;
        world.dead = true;
        world.place(Position::new(2, 2), Tile::Boulder);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Step {
                input: InputSnapshot::new(Buttons::A, Buttons::empty()),
            },
            &mut events,
        );

        assert_eq!(events, vec![Event::GameRestarted]);
        assert!(!query::is_dead(&world));
        assert_eq!(query::counters(&world), Counters::default());
        assert_eq!(query::tile(&world, Position::new(2, 2)), Tile::Empty);
    }
}
