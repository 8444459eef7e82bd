//! Optional `xorx.toml` settings with defaults for every field.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// File read when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "xorx.toml";

/// Runtime settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Simulation steps per second.
    pub(crate) tick_rate: u32,
    /// World bitmap, 512 x 256 pixels.
    pub(crate) world: PathBuf,
    /// Tileset bitmap, 128 x 128 pixels.
    pub(crate) tiles: PathBuf,
    /// Directory holding `soundNN.wav` effect samples.
    pub(crate) sounds: PathBuf,
    /// Initial window scale.
    pub(crate) scale: u32,
    /// Whether presentation waits for the display refresh.
    pub(crate) vsync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate: 30,
            world: PathBuf::from("world.png"),
            tiles: PathBuf::from("tiles.png"),
            sounds: PathBuf::from("."),
            scale: 3,
            vsync: true,
        }
    }
}

impl Config {
    /// Reads `path`, or the default path when `None`. A missing default file
    /// yields the defaults; an explicitly named file must exist.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text)
                .with_context(|| format!("failed to parse config at {}", path.display())),
            Err(error) if error.kind() == io::ErrorKind::NotFound && !required => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(error) => {
                Err(error).with_context(|| format!("failed to read config at {}", path.display()))
            }
        }
    }

    pub(crate) fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("invalid config toml")?;
        if config.tick_rate == 0 {
            bail!("tick_rate must be positive");
        }
        if config.scale == 0 {
            bail!("scale must be positive");
        }
        Ok(config)
    }
}
