#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Kingdom of Xorx adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};
use xorx_core::{glyph, Buttons, DisplayBuffer, SoundSet, DISPLAY_COLUMNS, DISPLAY_ROWS};

mod sound;

pub use sound::{SoundBank, SoundSample, SAMPLE_RATE, VOICES};

/// Edge length of one tile in atlas pixels.
pub const TILE_PIXELS: u32 = 8;

/// Number of tiles along each edge of the atlas.
pub const ATLAS_TILES: u32 = 16;

/// Edge length of the atlas image in pixels.
pub const ATLAS_PIXELS: u32 = TILE_PIXELS * ATLAS_TILES;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Flat color used for a glyph when no tileset is available.
///
/// Returns `None` for glyphs that should not be drawn as a quad: open floor
/// and ASCII text, which backends render with their own font.
#[must_use]
pub fn fallback_color(glyph: u8) -> Option<Color> {
    let variant = f32::from(glyph & 3) * 0.15;
    let base = match glyph {
        glyph::FLOOR | 0x20..=0x7E => return None,
        glyph::WALL..=0x83 => Color::from_rgb_u8(0x80, 0x80, 0x80),
        glyph::SOLID_WALL => Color::from_rgb_u8(0x50, 0x50, 0x50),
        glyph::GRASS => Color::from_rgb_u8(0x00, 0xA0, 0x00),
        glyph::RUIN => Color::from_rgb_u8(0x80, 0x40, 0x00),
        glyph::BOULDER => Color::from_rgb_u8(0xC0, 0xC0, 0xC0),
        glyph::TELEPORTER => Color::from_rgb_u8(0xFF, 0x00, 0xFF),
        glyph::DOOR => Color::from_rgb_u8(0x00, 0x80, 0x80),
        glyph::WATER..=0x8B => Color::from_rgb_u8(0x00, 0x00, 0xC0),
        glyph::MONSTER..=0x93 => Color::from_rgb_u8(0xFF - (glyph & 3) * 0x40, 0x00, 0x00),
        glyph::PLAYER..=0x97 => Color::from_rgb_u8(0xFF, 0xFF, 0xFF),
        glyph::ARROW..=0xA7 => Color::from_rgb_u8(0xFF, 0xE0, 0x80),
        glyph::TRAP_IDLE => Color::from_rgb_u8(0xA0, 0xA0, 0x00),
        glyph::TRAP_ARMED => Color::from_rgb_u8(0xFF, 0xFF, 0x00),
        glyph::SHRINE..=0xAF => Color::from_rgb_u8(0x00, 0xC0, 0xC0).lighten(variant),
        glyph::EXPLOSION..=0xB3 => Color::from_rgb_u8(0xFF, 0x80, 0x00).lighten(variant),
        glyph::SPAWN..=0xBB => Color::from_rgb_u8(0x80, 0x00, 0x80).lighten(variant),
        glyph::PLAYER_SPAWN..=0xBF => Color::from_rgb_u8(0x80, 0x80, 0xFF).lighten(variant),
        glyph::PICKUP..=0xC4 => Color::from_rgb_u8(0xFF, 0xD7, 0x00),
        glyph::MAP_FLOOR => Color::from_rgb_u8(0x20, 0x20, 0x20),
        glyph::MAP_WALL => Color::from_rgb_u8(0x90, 0x90, 0x90),
        glyph::MAP_CURSOR => Color::from_rgb_u8(0xFF, 0xFF, 0xFF),
        glyph::BANNER => Color::from_rgb_u8(0x60, 0x00, 0x00),
        _ => Color::from_rgb_u8(0xFF, 0x00, 0x80),
    };
    Some(base)
}

/// Top-left pixel of `glyph` inside the tile atlas.
#[must_use]
pub fn atlas_source(glyph: u8) -> Vec2 {
    let index = u32::from(glyph);
    Vec2::new(
        ((index % ATLAS_TILES) * TILE_PIXELS) as f32,
        ((index / ATLAS_TILES) * TILE_PIXELS) as f32,
    )
}

/// Decoded tileset: a square RGBA image of 16 x 16 tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileAtlas {
    rgba: Vec<u8>,
}

impl TileAtlas {
    /// Validates the image dimensions and wraps its RGBA bytes.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, RenderingError> {
        if width != ATLAS_PIXELS || height != ATLAS_PIXELS {
            return Err(RenderingError::AtlasDimensions { width, height });
        }
        let expected = (ATLAS_PIXELS * ATLAS_PIXELS * 4) as usize;
        if rgba.len() != expected {
            return Err(RenderingError::AtlasBytes {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self { rgba })
    }

    /// Raw RGBA bytes in row-major order.
    #[must_use]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Colour of the top-left pixel, used to clear the window behind the tiles.
    #[must_use]
    pub fn background(&self) -> Color {
        match self.rgba.get(0..3) {
            Some(&[red, green, blue]) => Color::from_rgb_u8(red, green, blue),
            _ => Color::from_rgb_u8(0, 0, 0),
        }
    }
}

/// Placement of the display buffer inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameLayout {
    /// Screen position of the top-left corner of tile (0, 0).
    pub origin: Vec2,
    /// Edge length of one tile in screen pixels.
    pub tile_size: f32,
}

impl FrameLayout {
    /// Largest whole-number scale of the display that fits into `screen`, centred.
    #[must_use]
    pub fn fit(screen: Vec2) -> Self {
        let native = native_size();
        let scale = (screen / native).min_element().floor().max(1.0);
        let size = native * scale;
        Self {
            origin: ((screen - size) * 0.5).max(Vec2::ZERO),
            tile_size: TILE_PIXELS as f32 * scale,
        }
    }

    /// Screen position of the top-left corner of the tile at `column`, `row`.
    #[must_use]
    pub fn tile_origin(&self, column: usize, row: usize) -> Vec2 {
        self.origin + Vec2::new(column as f32, row as f32) * self.tile_size
    }
}

/// Size in pixels of the display buffer at scale 1.
#[must_use]
pub fn native_size() -> Vec2 {
    Vec2::new(
        (DISPLAY_COLUMNS as u32 * TILE_PIXELS) as f32,
        (DISPLAY_ROWS as u32 * TILE_PIXELS) as f32,
    )
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Buttons currently held.
    pub buttons: Buttons,
}

/// Frame content handed from the simulation to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Scene {
    /// Glyphs to draw.
    pub buffer: DisplayBuffer,
    /// Effects to start on this frame; the backend drains the set after each update.
    pub sounds: SoundSet,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Initial window scale relative to the native display size.
    pub scale: u32,
    /// Tileset to draw glyphs with; flat quads are drawn without one.
    pub atlas: Option<TileAtlas>,
    /// Samples for the sound effects the scene requests.
    pub sounds: SoundBank,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scale: u32, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scale: scale.max(1),
            atlas: None,
            sounds: SoundBank::new(),
            scene,
        }
    }

    /// Attaches the tileset used to draw glyphs.
    #[must_use]
    pub fn with_atlas(mut self, atlas: Option<TileAtlas>) -> Self {
        self.atlas = atlas;
        self
    }

    /// Attaches the sound-effect samples.
    #[must_use]
    pub fn with_sounds(mut self, sounds: SoundBank) -> Self {
        self.sounds = sounds;
        self
    }

    /// Initial window size in pixels.
    #[must_use]
    pub fn window_size(&self) -> Vec2 {
        native_size() * self.scale as f32
    }
}

/// Rendering backend capable of presenting Kingdom of Xorx frames.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// buttons held on this frame, and refreshes the scene before it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The tileset image is not 128 x 128 pixels.
    AtlasDimensions {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
    },
    /// The RGBA buffer does not match the atlas size.
    AtlasBytes {
        /// Bytes required.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
    /// A sound file is not a readable RIFF/WAVE file.
    SampleHeader,
    /// A sound file is not 16-bit mono PCM at the mixing rate.
    SampleFormat {
        /// Format tag found in the file; 1 is PCM.
        tag: u16,
        /// Channel count found in the file.
        channels: u16,
        /// Sample rate found in the file.
        sample_rate: u32,
        /// Bits per sample found in the file.
        bits_per_sample: u16,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtlasDimensions { width, height } => write!(
                f,
                "tileset must be {ATLAS_PIXELS}x{ATLAS_PIXELS} pixels (received {width}x{height})",
                ATLAS_PIXELS = ATLAS_PIXELS
            ),
            Self::AtlasBytes { expected, actual } => {
                write!(f, "tileset carries {actual} bytes, expected {expected}")
            }
            Self::SampleHeader => write!(f, "sound file is not a RIFF/WAVE file"),
            Self::SampleFormat {
                tag,
                channels,
                sample_rate,
                bits_per_sample,
            } => write!(
                f,
                "sound must be 16-bit mono PCM at {SAMPLE_RATE} Hz (received format {tag}, \
                 {channels} channels, {sample_rate} Hz, {bits_per_sample} bits)",
                SAMPLE_RATE = SAMPLE_RATE
            ),
        }
    }
}

impl Error for RenderingError {}
