use glam::Vec2;
use macroquad::{
    color::WHITE,
    math::{Rect, Vec2 as MacroquadVec2},
    texture::{draw_texture_ex, DrawTextureParams, FilterMode, Texture2D},
};
use xorx_rendering::{atlas_source, TileAtlas, ATLAS_PIXELS, TILE_PIXELS};

/// GPU copy of the tileset.
#[derive(Debug)]
pub(crate) struct TileTexture {
    texture: Texture2D,
}

impl TileTexture {
    /// Uploads the atlas. Must run inside the macroquad window context.
    pub(crate) fn from_atlas(atlas: &TileAtlas) -> Self {
        let side = ATLAS_PIXELS as u16;
        let texture = Texture2D::from_rgba8(side, side, atlas.rgba());
        texture.set_filter(FilterMode::Nearest);
        Self { texture }
    }

    pub(crate) fn draw(&self, glyph: u8, origin: Vec2, size: f32) {
        let source = atlas_source(glyph);
        let tile = TILE_PIXELS as f32;
        draw_texture_ex(
            self.texture,
            origin.x,
            origin.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(MacroquadVec2::new(size, size)),
                source: Some(Rect::new(source.x, source.y, tile, tile)),
                ..DrawTextureParams::default()
            },
        );
    }
}
