//! Asset loading: the world map and tileset bitmaps, and the sound effects.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use image::ImageReader;
use xorx_core::SoundEffect;
use xorx_rendering::{SoundBank, SoundSample, TileAtlas};
use xorx_world::{World, WorldImage};

/// Builds the session from the world bitmap. A missing file leaves an empty world.
pub(crate) fn load_world(path: &Path) -> Result<World> {
    if !path.exists() {
        log::warn!("world bitmap {} not found, starting empty", path.display());
        return Ok(World::new());
    }
    let decoded = ImageReader::open(path)
        .with_context(|| format!("failed to open world bitmap {}", path.display()))?
        .decode()
        .with_context(|| format!("failed to decode world bitmap {}", path.display()))?
        .to_rgb8();
    let image = WorldImage::from_rgb8(decoded.width(), decoded.height(), decoded.as_raw())
        .with_context(|| format!("invalid world bitmap {}", path.display()))?;
    let world = World::from_image(image)
        .with_context(|| format!("invalid world bitmap {}", path.display()))?;
    log::info!("loaded world from {}", path.display());
    Ok(world)
}

/// Decodes the tileset. A missing file yields `None`; a malformed one is an error.
pub(crate) fn load_tiles(path: &Path) -> Result<Option<TileAtlas>> {
    if !path.exists() {
        log::warn!("tileset {} not found, drawing flat tiles", path.display());
        return Ok(None);
    }
    let decoded = ImageReader::open(path)
        .with_context(|| format!("failed to open tileset {}", path.display()))?
        .decode()
        .with_context(|| format!("failed to decode tileset {}", path.display()))?
        .to_rgba8();
    let atlas = TileAtlas::new(decoded.width(), decoded.height(), decoded.into_raw())
        .with_context(|| format!("invalid tileset {}", path.display()))?;
    Ok(Some(atlas))
}

/// Reads `soundNN.wav` for every effect from `directory`. Missing files stay
/// silent; a file in the wrong format is an error.
pub(crate) fn load_sounds(directory: &Path) -> Result<SoundBank> {
    let mut bank = SoundBank::new();
    for effect in SoundEffect::ALL {
        let path = directory.join(sound_file(effect));
        if !path.exists() {
            log::debug!("no sample at {}", path.display());
            continue;
        }
        let wav = fs::read(&path)
            .with_context(|| format!("failed to read sound {}", path.display()))?;
        let sample = SoundSample::from_wav(wav)
            .with_context(|| format!("invalid sound {}", path.display()))?;
        bank.insert(effect, sample);
    }
    log::info!(
        "{} of {} sound effects found in {}",
        bank.len(),
        SoundEffect::ALL.len(),
        directory.display()
    );
    Ok(bank)
}

/// File name of the sample for `effect`.
fn sound_file(effect: SoundEffect) -> String {
    format!("sound{:02}.wav", effect.id())
}
