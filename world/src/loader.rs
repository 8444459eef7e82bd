//! Decodes colour-coded world images into initial cell contents.

use thiserror::Error;
use xorx_core::{
    MonsterTier, Phase, Pickup, Position, Tile, TrapState, WallTexture, MAP_COLUMNS, MAP_ROWS,
};

use crate::{
    behaviors::water_delay,
    grid::{Cell, Grid, Tick},
    random::RandomBytes,
};

const PLAYER_START: u32 = 0xFF_FF_FF;

/// Reasons a world image cannot be turned into a playable map.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The image is not exactly the size of the world grid.
    #[error("world image is {width}x{height}, expected {}x{}", MAP_COLUMNS, MAP_ROWS)]
    Dimensions {
        /// Width of the offending image in pixels.
        width: u32,
        /// Height of the offending image in pixels.
        height: u32,
    },
    /// The pixel buffer does not match the declared dimensions.
    #[error("world image carries {actual} pixels, expected {expected}")]
    PixelCount {
        /// Pixels required by the declared dimensions.
        expected: usize,
        /// Pixels actually supplied.
        actual: usize,
    },
    /// More than one pixel marks the player start.
    #[error("world image has several player starts, at {first:?} and {second:?}")]
    MultiplePlayerStarts {
        /// First start found in row-major order.
        first: Position,
        /// Second start found in row-major order.
        second: Position,
    },
}

/// Decoded world bitmap: one packed `0xRRGGBB` value per cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldImage {
    pixels: Vec<u32>,
}

impl WorldImage {
    /// Validates dimensions and wraps packed pixels given in row-major order.
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, LoadError> {
        if i64::from(width) != i64::from(MAP_COLUMNS) || i64::from(height) != i64::from(MAP_ROWS)
        {
            return Err(LoadError::Dimensions { width, height });
        }
        let expected = cell_count();
        if pixels.len() != expected {
            return Err(LoadError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { pixels })
    }

    /// Builds an image from interleaved 8-bit RGB samples.
    pub fn from_rgb8(width: u32, height: u32, samples: &[u8]) -> Result<Self, LoadError> {
        let pixels = samples
            .chunks_exact(3)
            .map(|rgb| u32::from(rgb[0]) << 16 | u32::from(rgb[1]) << 8 | u32::from(rgb[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// World-sized image where every pixel has the same colour.
    #[must_use]
    pub fn filled(color: u32) -> Self {
        Self {
            pixels: vec![color & 0xFF_FF_FF; cell_count()],
        }
    }

    /// Returns the image with one pixel repainted; positions outside are ignored.
    #[must_use]
    pub fn with_pixel(mut self, position: Position, color: u32) -> Self {
        if let Some(index) = pixel_index(position) {
            self.pixels[index] = color & 0xFF_FF_FF;
        }
        self
    }

    /// Packed colour at `position`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, position: Position) -> Option<u32> {
        pixel_index(position).map(|index| self.pixels[index])
    }
}

/// Fills `grid` from `image` and returns the player start, if any.
pub(crate) fn populate(
    image: &WorldImage,
    grid: &mut Grid,
    random: &mut RandomBytes,
) -> Result<Option<Position>, LoadError> {
    let mut player = None;
    for y in 0..MAP_ROWS {
        for x in 0..MAP_COLUMNS {
            let position = Position::new(x, y);
            let color = image.pixel(position).unwrap_or(0);
            if color == PLAYER_START {
                if let Some(first) = player {
                    return Err(LoadError::MultiplePlayerStarts {
                        first,
                        second: position,
                    });
                }
                player = Some(position);
            }
            if let Some(cell) = decode(color, random) {
                grid.set(position, cell);
            }
        }
    }

    let enclosed = mark_enclosed_walls(grid);
    log::info!(
        "world decoded: player start {:?}, {} enclosed wall cells",
        player,
        enclosed
    );
    Ok(player)
}

fn decode(color: u32, random: &mut RandomBytes) -> Option<Cell> {
    let (tile, delay) = match color {
        PLAYER_START => (Tile::PlayerSpawn(Phase::FIRST), 1),
        0x80_80_80 => (Tile::Wall(WallTexture::from_bits(random.next_byte())), 0),
        0x00_FF_00 => (Tile::Grass, 0),
        0x80_40_00 => (Tile::Ruin, 0),
        0x00_00_FF => {
            let ripple = random.next_byte() & 1 == 1;
            (Tile::Water { ripple }, water_delay(random))
        }
        0xC0_C0_C0 => (Tile::Boulder, 0),
        0xFF_00_FF => (Tile::Teleporter, 0),
        0xFF_00_00 => monster(0, random),
        0xC0_00_00 => monster(1, random),
        0x80_00_00 => monster(2, random),
        0x40_00_00 => monster(3, random),
        0xFF_FF_00 => (Tile::BoltTrap(TrapState::Idle), emitter_jitter(random)),
        0x00_FF_FF => (Tile::Shrine(Phase::FIRST), emitter_jitter(random)),
        0xFF_80_80 => (Tile::Pickup(Pickup::Life), 0),
        0x80_80_FF => (Tile::Pickup(Pickup::Ammo), 0),
        0x80_FF_80 => (Tile::Pickup(Pickup::Flask), 0),
        0xFF_D7_00 => (Tile::Pickup(Pickup::Gold), 0),
        0xFF_A5_00 => (Tile::Pickup(Pickup::Key), 0),
        0x00_80_80 => (Tile::Door, 0),
        _ => return None,
    };
    Some(Cell::new(tile, Tick::ZERO.after(delay)))
}

fn monster(level: u8, random: &mut RandomBytes) -> (Tile, u8) {
    (
        Tile::Monster(MonsterTier::new(level)),
        1 + (random.next_byte() & 15),
    )
}

fn emitter_jitter(random: &mut RandomBytes) -> u8 {
    1 + (random.next_byte() & 63)
}

/// Turns walls surrounded by walls on all eight sides into solid walls.
fn mark_enclosed_walls(grid: &mut Grid) -> usize {
    let mut enclosed = Vec::new();
    for y in 0..MAP_ROWS {
        for x in 0..MAP_COLUMNS {
            let centre = Position::new(x, y);
            let surrounded = (-1..=1).all(|dy| {
                (-1..=1).all(|dx| grid.get(centre + Position::new(dx, dy)).tile.is_wall())
            });
            if surrounded {
                enclosed.push(centre);
            }
        }
    }
    for position in &enclosed {
        let cell = grid.get(*position);
        grid.set(*position, Cell::new(Tile::SolidWall, cell.due));
    }
    enclosed.len()
}

fn cell_count() -> usize {
    usize::try_from(MAP_COLUMNS * MAP_ROWS).unwrap_or(0)
}

fn pixel_index(position: Position) -> Option<usize> {
    if !position.in_bounds() {
        return None;
    }
    usize::try_from(position.y * MAP_COLUMNS + position.x).ok()
}
