#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Kingdom of Xorx.

mod assets;
mod config;
mod driver;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use xorx_core::{Buttons, WINDOW_TITLE};
use xorx_rendering::{Color, Presentation as Frame, RenderingBackend, Scene, TileAtlas};
use xorx_rendering_macroquad::MacroquadBackend;
use xorx_system_presentation::Presentation;
use xorx_world::query;

use crate::{config::Config, driver::Driver};

/// Command-line arguments; each flag overrides the matching config entry.
#[derive(Debug, Parser)]
#[command(name = "xorx", about = "Kingdom of Xorx", version)]
struct CliArgs {
    /// Settings file (defaults to ./xorx.toml when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// World bitmap to load.
    #[arg(long, value_name = "PATH")]
    world: Option<PathBuf>,
    /// Tileset bitmap to draw with.
    #[arg(long, value_name = "PATH")]
    tiles: Option<PathBuf>,
    /// Directory holding the `soundNN.wav` effect samples.
    #[arg(long, value_name = "DIR")]
    sounds: Option<PathBuf>,
    /// Initial window scale.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=16))]
    scale: Option<u32>,
    /// Runs the given number of steps without a window and prints the final status.
    #[arg(long, value_name = "STEPS")]
    headless: Option<u32>,
}

impl CliArgs {
    fn settings(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(world) = &self.world {
            config.world = world.clone();
        }
        if let Some(tiles) = &self.tiles {
            config.tiles = tiles.clone();
        }
        if let Some(sounds) = &self.sounds {
            config.sounds = sounds.clone();
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        Ok(config)
    }
}

/// Entry point for the Kingdom of Xorx command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();
    let config = args.settings()?;
    let mut world = assets::load_world(&config.world)?;
    let mut driver = Driver::new(config.tick_rate);
    let mut presentation = Presentation::new();

    if let Some(steps) = args.headless {
        for _ in 0..steps {
            driver.step_once(&mut world, Buttons::empty());
        }
        let buffer = presentation.render(&world);
        for row in [16, 17] {
            println!("{}", String::from_utf8_lossy(buffer.row(row)).trim_end_matches('\0'));
        }
        println!(
            "tick {} player {:?}",
            query::local_tick(&world).value(),
            query::player(&world)
        );
        return Ok(());
    }

    let atlas = assets::load_tiles(&config.tiles)?;
    let sounds = assets::load_sounds(&config.sounds)?;
    let background = atlas
        .as_ref()
        .map_or(Color::from_rgb_u8(0, 0, 0), TileAtlas::background);
    let scene = Scene {
        buffer: presentation.render(&world),
        ..Scene::default()
    };
    let frame = Frame::new(WINDOW_TITLE, background, config.scale, scene)
        .with_atlas(atlas)
        .with_sounds(sounds);

    MacroquadBackend::new()
        .with_vsync(config.vsync)
        .run(frame, move |elapsed, input, scene| {
            if driver.advance(&mut world, elapsed, input.buttons) > 0 {
                scene.buffer = presentation.render(&world);
                scene.sounds = driver.take_sounds();
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = CliArgs::parse_from([
            "xorx",
            "--config",
            "does/not/exist.toml",
            "--world",
            "castle.png",
        ]);
        assert!(args.settings().is_err());

        let args = CliArgs::parse_from(["xorx", "--world", "castle.png", "--scale", "2"]);
        assert_eq!(args.world, Some(PathBuf::from("castle.png")));
        assert_eq!(args.sounds, None);
        assert_eq!(args.scale, Some(2));
        assert_eq!(args.headless, None);
    }

    #[test]
    fn scale_outside_range_is_rejected() {
        assert!(CliArgs::try_parse_from(["xorx", "--scale", "0"]).is_err());
    }

    #[test]
    fn sound_directory_flag_overrides_config() {
        let args = CliArgs::parse_from(["xorx", "--sounds", "sfx"]);
        assert_eq!(args.sounds, Some(PathBuf::from("sfx")));
        let config = args.settings().expect("defaults without a config file");
        assert_eq!(config.sounds, PathBuf::from("sfx"));
    }

    #[test]
    fn headless_takes_a_step_count() {
        let args = CliArgs::parse_from(["xorx", "--headless", "120"]);
        assert_eq!(args.headless, Some(120));
    }
}
