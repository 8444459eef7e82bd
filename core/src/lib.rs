#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Kingdom of Xorx engine.
//!
//! This crate defines the vocabulary that connects adapters, the authoritative
//! world, and pure systems. Adapters submit [`Command`] values carrying the
//! latest [`InputSnapshot`], the world executes those commands via its `apply`
//! entry point, and then reports [`Event`] values describing what happened.
//! Systems read immutable world queries and produce presentation data such as
//! the [`DisplayBuffer`].

use std::ops::Add;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

mod tile;

pub use tile::{
    glyph, MonsterTier, Phase, Pickup, Pose, Projectile, ProjectileKind, Tile, TrapState,
    WallTexture,
};

/// Title shown by windowing adapters.
pub const WINDOW_TITLE: &str = "Kingdom of Xorx";

/// Number of cell columns in the world grid.
pub const MAP_COLUMNS: i32 = 512;

/// Number of cell rows in the world grid.
pub const MAP_ROWS: i32 = 256;

/// Number of cell columns visible on one screen.
pub const VIEW_COLUMNS: i32 = 32;

/// Number of cell rows visible on one screen.
pub const VIEW_ROWS: i32 = 16;

/// Width of the display buffer in tiles.
pub const DISPLAY_COLUMNS: usize = 32;

/// Height of the display buffer in tiles, including the status bar.
pub const DISPLAY_ROWS: usize = 18;

/// Upper bound applied to every inventory counter.
pub const COUNTER_LIMIT: u16 = 999;

/// Integer location within the world grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Column index, growing eastwards.
    pub x: i32,
    /// Row index, growing southwards.
    pub y: i32,
}

impl Position {
    /// Creates a position from column and row indices.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position one cell away in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let offset = direction.offset();
        Self::new(self.x + offset.x, self.y + offset.y)
    }

    /// Returns the top-left corner of the screen block containing this position.
    #[must_use]
    pub const fn block(self) -> Self {
        Self::new(
            self.x.div_euclid(VIEW_COLUMNS) * VIEW_COLUMNS,
            self.y.div_euclid(VIEW_ROWS) * VIEW_ROWS,
        )
    }

    /// Reports whether the position lies inside the world grid.
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < MAP_COLUMNS && self.y < MAP_ROWS
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Cardinal directions in clockwise order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset travelled when stepping once in this direction.
    #[must_use]
    pub const fn offset(self) -> Position {
        match self {
            Self::North => Position::new(0, -1),
            Self::East => Position::new(1, 0),
            Self::South => Position::new(0, 1),
            Self::West => Position::new(-1, 0),
        }
    }

    /// Next direction when turning clockwise.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Index of the direction within [`Direction::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Picks a direction from the two low bits of a random byte.
    #[must_use]
    pub const fn from_bits(byte: u8) -> Self {
        Self::ALL[(byte & 3) as usize]
    }
}

bitflags! {
    /// Logical buttons exposed by input adapters.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Buttons: u8 {
        /// Primary action: fire, or restart after death.
        const A = 1;
        /// Unused by the simulation.
        const B = 2;
        /// Secondary action: toggles pause.
        const X = 4;
        /// Unused by the simulation.
        const Y = 8;
        /// Directional up.
        const UP = 16;
        /// Directional down.
        const DOWN = 32;
        /// Directional left.
        const LEFT = 64;
        /// Directional right.
        const RIGHT = 128;
    }
}

/// Buttons held during the current step together with those held on the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Buttons that are down now.
    pub down: Buttons,
    /// Buttons that were down during the previous step.
    pub previous: Buttons,
}

impl InputSnapshot {
    /// Creates a snapshot from the current and previous button states.
    #[must_use]
    pub const fn new(down: Buttons, previous: Buttons) -> Self {
        Self { down, previous }
    }

    /// Reports whether every button in `buttons` is currently held.
    #[must_use]
    pub fn held(&self, buttons: Buttons) -> bool {
        self.down.contains(buttons)
    }

    /// Reports whether `buttons` went down on this step (edge triggered).
    #[must_use]
    pub fn pressed(&self, buttons: Buttons) -> bool {
        self.down.contains(buttons) && !self.previous.intersects(buttons)
    }

    /// Held direction, resolving several held directions as up, down, left, right.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        if self.held(Buttons::UP) {
            Some(Direction::North)
        } else if self.held(Buttons::DOWN) {
            Some(Direction::South)
        } else if self.held(Buttons::LEFT) {
            Some(Direction::West)
        } else if self.held(Buttons::RIGHT) {
            Some(Direction::East)
        } else {
            None
        }
    }
}

/// Sound effects the simulation may request. The discriminant selects the sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SoundEffect {
    /// Player moved one cell.
    Step = 0,
    /// Player bumped into something.
    Blocked = 1,
    /// Player fired an arrow.
    Shoot = 2,
    /// A projectile struck a monster.
    Hit = 3,
    /// An explosion started.
    Explode = 4,
    /// Player collected a pickup.
    Pickup = 5,
    /// Player took damage and survived.
    Hurt = 6,
    /// Player died.
    Death = 7,
    /// Player travelled through a teleporter.
    Teleport = 8,
    /// A boulder was pushed.
    Push = 9,
    /// A boulder sank into water.
    Splash = 10,
    /// A shrine summoned a monster.
    Spawn = 11,
    /// A bolt trap discharged.
    Bolt = 12,
    /// A locked door was opened.
    Door = 13,
    /// Pause was toggled.
    Pause = 14,
    /// Grass was cut down.
    Cut = 15,
}

impl SoundEffect {
    /// Every sound effect in identifier order.
    pub const ALL: [SoundEffect; 16] = [
        Self::Step,
        Self::Blocked,
        Self::Shoot,
        Self::Hit,
        Self::Explode,
        Self::Pickup,
        Self::Hurt,
        Self::Death,
        Self::Teleport,
        Self::Push,
        Self::Splash,
        Self::Spawn,
        Self::Bolt,
        Self::Door,
        Self::Pause,
        Self::Cut,
    ];

    /// Numeric identifier of the effect, used to locate `soundNN.wav`.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// Set of sound effects requested since the last drain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SoundSet(u32);

impl SoundSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Adds an effect to the set. Requesting an effect twice plays it once.
    pub fn insert(&mut self, effect: SoundEffect) {
        self.0 |= 1 << effect.id();
    }

    /// Reports whether the effect was requested.
    #[must_use]
    pub const fn contains(&self, effect: SoundEffect) -> bool {
        self.0 & (1 << effect.id()) != 0
    }

    /// Reports whether no effect was requested.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates over the requested effects in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = SoundEffect> + '_ {
        SoundEffect::ALL
            .into_iter()
            .filter(move |effect| self.contains(*effect))
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Runs one fixed simulation step with the provided input.
    Step {
        /// Button state sampled for this step.
        input: InputSnapshot,
    },
    /// Discards the running session and starts a new game from the loaded world.
    Restart,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The camera moved one notch toward the player's screen.
    ViewScrolled {
        /// View origin after the move.
        origin: Position,
    },
    /// The player left the visible screen; the old screen was hibernated.
    ScreenChanged {
        /// Block the player left.
        from: Position,
        /// Block the player entered.
        to: Position,
    },
    /// The player travelled through a teleporter pair.
    PlayerTeleported {
        /// Cell occupied before the jump.
        from: Position,
        /// Cell occupied after the jump.
        to: Position,
    },
    /// The player ran out of life.
    PlayerDied {
        /// Cell where the player died.
        at: Position,
    },
    /// Pause was switched on or off.
    PauseToggled {
        /// Whether the game is now paused.
        paused: bool,
    },
    /// A new game was started from the loaded world.
    GameRestarted,
}

/// Row-major grid of glyph bytes handed to rendering adapters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayBuffer {
    tiles: [u8; DISPLAY_COLUMNS * DISPLAY_ROWS],
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self {
            tiles: [glyph::FLOOR; DISPLAY_COLUMNS * DISPLAY_ROWS],
        }
    }
}

impl DisplayBuffer {
    /// Creates a buffer filled with floor glyphs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Glyph at the provided column and row, if inside the buffer.
    #[must_use]
    pub fn get(&self, column: usize, row: usize) -> Option<u8> {
        Self::index(column, row).map(|index| self.tiles[index])
    }

    /// Stores a glyph; writes outside the buffer are ignored.
    pub fn set(&mut self, column: usize, row: usize, glyph: u8) {
        if let Some(index) = Self::index(column, row) {
            self.tiles[index] = glyph;
        }
    }

    /// Writes ASCII text starting at the provided cell, clipping at the right edge.
    pub fn write_text(&mut self, column: usize, row: usize, text: &str) {
        for (offset, byte) in text.bytes().enumerate() {
            self.set(column + offset, row, byte);
        }
    }

    /// Fills a whole row with one glyph.
    pub fn fill_row(&mut self, row: usize, glyph: u8) {
        for column in 0..DISPLAY_COLUMNS {
            self.set(column, row, glyph);
        }
    }

    /// Glyphs of a single row.
    #[must_use]
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row.min(DISPLAY_ROWS) * DISPLAY_COLUMNS;
        let end = (start + DISPLAY_COLUMNS).min(self.tiles.len());
        &self.tiles[start..end]
    }

    /// All glyphs in row-major order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.tiles
    }

    fn index(column: usize, row: usize) -> Option<usize> {
        (column < DISPLAY_COLUMNS && row < DISPLAY_ROWS).then(|| row * DISPLAY_COLUMNS + column)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Buttons, Direction, DisplayBuffer, InputSnapshot, Position, SoundEffect, SoundSet,
        DISPLAY_COLUMNS,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn input_snapshot_round_trips_through_bincode() {
        assert_round_trip(&InputSnapshot::new(
            Buttons::A | Buttons::LEFT,
            Buttons::LEFT,
        ));
    }

    #[test]
    fn clockwise_order_cycles_through_all_directions() {
        let mut direction = Direction::North;
        for expected in Direction::ALL.iter().cycle().skip(1).take(4) {
            direction = direction.clockwise();
            assert_eq!(direction, *expected);
        }
        assert_eq!(direction, Direction::North);
    }

    #[test]
    fn stepping_applies_unit_offsets() {
        let origin = Position::new(5, 5);
        assert_eq!(origin.step(Direction::North), Position::new(5, 4));
        assert_eq!(origin.step(Direction::East), Position::new(6, 5));
        assert_eq!(origin.step(Direction::South), Position::new(5, 6));
        assert_eq!(origin.step(Direction::West), Position::new(4, 5));
        assert_eq!(origin + Position::new(2, -3), Position::new(7, 2));
    }

    #[test]
    fn block_snaps_to_view_aligned_corner() {
        assert_eq!(Position::new(0, 0).block(), Position::new(0, 0));
        assert_eq!(Position::new(31, 15).block(), Position::new(0, 0));
        assert_eq!(Position::new(32, 16).block(), Position::new(32, 16));
        assert_eq!(Position::new(100, 40).block(), Position::new(96, 32));
    }

    #[test]
    fn pressed_is_edge_triggered() {
        let held = InputSnapshot::new(Buttons::A, Buttons::A);
        assert!(held.held(Buttons::A));
        assert!(!held.pressed(Buttons::A));

        let fresh = InputSnapshot::new(Buttons::A, Buttons::empty());
        assert!(fresh.pressed(Buttons::A));
    }

    #[test]
    fn direction_prefers_vertical_then_horizontal() {
        let snapshot = InputSnapshot::new(Buttons::RIGHT | Buttons::DOWN, Buttons::empty());
        assert_eq!(snapshot.direction(), Some(Direction::South));
        let none = InputSnapshot::new(Buttons::A | Buttons::X, Buttons::empty());
        assert_eq!(none.direction(), None);
    }

    #[test]
    fn sound_set_deduplicates_and_orders_by_id() {
        let mut sounds = SoundSet::new();
        sounds.insert(SoundEffect::Hurt);
        sounds.insert(SoundEffect::Step);
        sounds.insert(SoundEffect::Hurt);

        let collected: Vec<_> = sounds.iter().collect();
        assert_eq!(collected, vec![SoundEffect::Step, SoundEffect::Hurt]);
        assert!(!sounds.is_empty());
    }

    #[test]
    fn display_text_clips_at_right_edge() {
        let mut buffer = DisplayBuffer::new();
        buffer.write_text(DISPLAY_COLUMNS - 2, 0, "ABCD");
        assert_eq!(buffer.get(DISPLAY_COLUMNS - 2, 0), Some(b'A'));
        assert_eq!(buffer.get(DISPLAY_COLUMNS - 1, 0), Some(b'B'));
        assert_eq!(buffer.get(0, 1), Some(0));
        assert_eq!(buffer.get(DISPLAY_COLUMNS, 0), None);
    }
}
