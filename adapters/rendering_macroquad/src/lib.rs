#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Kingdom of Xorx.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere macroquad is built without audio
//! unless this crate's `audio` feature is enabled. Without it sound requests
//! are only logged.

mod audio;
mod tiles;

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use std::time::Duration;
use xorx_core::{Buttons, DisplayBuffer, DISPLAY_COLUMNS, DISPLAY_ROWS};
use xorx_rendering::{
    fallback_color, Color, FrameInput, FrameLayout, Presentation, RenderingBackend, Scene,
};

use self::{audio::SoundPlayer, tiles::TileTexture};

/// Keys mapped onto each console button. Several keys may drive one button.
const KEY_BINDINGS: [(Buttons, &[KeyCode]); 8] = [
    (Buttons::A, &[KeyCode::I, KeyCode::Enter, KeyCode::KpEnter]),
    (Buttons::B, &[KeyCode::O, KeyCode::Space]),
    (Buttons::X, &[KeyCode::K]),
    (Buttons::Y, &[KeyCode::L]),
    (Buttons::UP, &[KeyCode::Up, KeyCode::W, KeyCode::Key8, KeyCode::Kp8]),
    (Buttons::DOWN, &[KeyCode::Down, KeyCode::S, KeyCode::Key2, KeyCode::Kp2]),
    (Buttons::LEFT, &[KeyCode::Left, KeyCode::A, KeyCode::Key4, KeyCode::Kp4]),
    (Buttons::RIGHT, &[KeyCode::Right, KeyCode::D, KeyCode::Key6, KeyCode::Kp6]),
];

/// Folds the state of the bound keys into a button set.
pub fn buttons_from_keys(is_down: impl Fn(KeyCode) -> bool) -> Buttons {
    KEY_BINDINGS
        .iter()
        .filter(|(_, keys)| keys.iter().any(|key| is_down(*key)))
        .fold(Buttons::empty(), |buttons, (button, _)| buttons | *button)
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let window_size = presentation.window_size();
        let Presentation {
            window_title,
            clear_color,
            atlas,
            sounds,
            scene,
            ..
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.x as i32,
            window_height: window_size.y as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let tiles = atlas.as_ref().map(TileTexture::from_atlas);
            if tiles.is_none() {
                log::info!("no tileset loaded, drawing flat tiles");
            }
            let background = to_macroquad_color(clear_color);
            let player = SoundPlayer::load(sounds).await;

            loop {
                if is_key_pressed(KeyCode::Escape) {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = FrameInput {
                    buttons: buttons_from_keys(is_key_down),
                };
                update_scene(frame_dt, frame_input, &mut scene);
                player.play(std::mem::take(&mut scene.sounds));

                macroquad::window::clear_background(background);
                let layout = FrameLayout::fit(Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                ));
                draw_buffer(&scene.buffer, &layout, tiles.as_ref());

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_buffer(buffer: &DisplayBuffer, layout: &FrameLayout, tiles: Option<&TileTexture>) {
    for row in 0..DISPLAY_ROWS {
        for column in 0..DISPLAY_COLUMNS {
            let Some(glyph) = buffer.get(column, row) else {
                continue;
            };
            let origin = layout.tile_origin(column, row);
            match tiles {
                Some(tiles) => tiles.draw(glyph, origin, layout.tile_size),
                None => draw_flat(glyph, origin, layout.tile_size),
            }
        }
    }
}

fn draw_flat(glyph: u8, origin: Vec2, size: f32) {
    if let Some(color) = fallback_color(glyph) {
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            size,
            size,
            to_macroquad_color(color),
        );
    } else if glyph.is_ascii_graphic() {
        let text = char::from(glyph).to_string();
        let _ = macroquad::text::draw_text(
            &text,
            origin.x,
            origin.y + size,
            size * 1.25,
            macroquad::color::WHITE,
        );
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_toggles_swap_interval() {
        assert_eq!(MacroquadBackend::new().with_vsync(true).swap_interval, Some(1));
        assert_eq!(MacroquadBackend::new().with_vsync(false).swap_interval, Some(0));
        assert_eq!(MacroquadBackend::new().swap_interval, None);
    }

    #[test]
    fn colors_convert_channel_by_channel() {
        let color = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!((color.r, color.g, color.b, color.a), (0.1, 0.2, 0.3, 0.4));
    }

    #[test]
    fn every_button_has_a_binding() {
        let all = KEY_BINDINGS
            .iter()
            .fold(Buttons::empty(), |buttons, (button, _)| buttons | *button);
        assert_eq!(all, Buttons::all());
    }
}
