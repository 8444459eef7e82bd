#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation system that turns world queries into a glyph display buffer.

use xorx_core::{
    glyph, DisplayBuffer, Position, DISPLAY_COLUMNS, MAP_COLUMNS, MAP_ROWS, VIEW_COLUMNS,
    VIEW_ROWS,
};
use xorx_world::{query, World};

/// Side length, in cells, of the square region summarised by one minimap tile.
const MINIMAP_REGION: i32 = 16;
const MINIMAP_COLUMNS: usize = (MAP_COLUMNS / MINIMAP_REGION) as usize;
const MINIMAP_ROWS: usize = (MAP_ROWS / MINIMAP_REGION) as usize;

const STATUS_ROW: usize = VIEW_ROWS as usize;
const INVENTORY_ROW: usize = STATUS_ROW + 1;
const BANNER_ROW: usize = 7;
const DEATH_BANNER: [&str; 2] = ["YOU HAVE DIED", "PRESS A TO RESTART"];
const PAUSED_LABEL: &str = "PAUSED";

/// Renders the visible screen, the status bar and the overlays.
#[derive(Debug, Default)]
pub struct Presentation {
    minimap: Option<Vec<bool>>,
}

impl Presentation {
    /// Creates a presentation system with no cached minimap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces the display buffer for the current world state.
    ///
    /// The minimap is computed the first time a paused world is rendered and
    /// reused until the world is unpaused.
    pub fn render(&mut self, world: &World) -> DisplayBuffer {
        let mut buffer = DisplayBuffer::new();

        if query::is_paused(world) {
            let walls = self.minimap.get_or_insert_with(|| summarise_walls(world));
            draw_minimap(walls, query::player(world), &mut buffer);
        } else {
            self.minimap = None;
            draw_view(world, &mut buffer);
        }

        if query::is_dead(world) {
            draw_banner(&mut buffer);
        }
        draw_status(world, &mut buffer);
        buffer
    }
}

fn draw_view(world: &World, buffer: &mut DisplayBuffer) {
    let origin = query::view_origin(world);
    for (row, y) in (origin.y..origin.y + VIEW_ROWS).enumerate() {
        for (column, x) in (origin.x..origin.x + VIEW_COLUMNS).enumerate() {
            let tile = query::tile(world, Position::new(x, y));
            buffer.set(column, row, tile.glyph());
        }
    }
}

/// One flag per minimap tile: `true` when at least half of its region is wall.
fn summarise_walls(world: &World) -> Vec<bool> {
    let threshold = MINIMAP_REGION * MINIMAP_REGION / 2;
    let mut walls = Vec::with_capacity(MINIMAP_COLUMNS * MINIMAP_ROWS);
    for region_y in (0..MAP_ROWS).step_by(MINIMAP_REGION as usize) {
        for region_x in (0..MAP_COLUMNS).step_by(MINIMAP_REGION as usize) {
            let mut count = 0;
            for y in region_y..region_y + MINIMAP_REGION {
                for x in region_x..region_x + MINIMAP_REGION {
                    if query::tile(world, Position::new(x, y)).is_wall() {
                        count += 1;
                    }
                }
            }
            walls.push(count >= threshold);
        }
    }
    walls
}

fn draw_minimap(walls: &[bool], player: Option<Position>, buffer: &mut DisplayBuffer) {
    for (index, wall) in walls.iter().enumerate() {
        let tile = if *wall { glyph::MAP_WALL } else { glyph::MAP_FLOOR };
        buffer.set(index % MINIMAP_COLUMNS, index / MINIMAP_COLUMNS, tile);
    }

    let Some(block) = player.map(Position::block) else {
        return;
    };
    let row = usize::try_from(block.y / MINIMAP_REGION).unwrap_or(0);
    let first = usize::try_from(block.x / MINIMAP_REGION).unwrap_or(0);
    let width = usize::try_from(VIEW_COLUMNS / MINIMAP_REGION).unwrap_or(1);
    for column in first..first + width {
        buffer.set(column, row, glyph::MAP_CURSOR);
    }
}

fn draw_banner(buffer: &mut DisplayBuffer) {
    for (offset, line) in DEATH_BANNER.iter().enumerate() {
        let row = BANNER_ROW + offset;
        buffer.fill_row(row, glyph::BANNER);
        buffer.write_text(centred(line), row, line);
    }
}

fn draw_status(world: &World, buffer: &mut DisplayBuffer) {
    let counters = query::counters(world);
    buffer.write_text(
        0,
        STATUS_ROW,
        &format!(
            "LIFE {:03}  AMMO {:03}  FLASK {:03}",
            counters.life, counters.ammo, counters.flasks
        ),
    );
    buffer.write_text(
        0,
        INVENTORY_ROW,
        &format!("KEYS {:03}  GOLD {:03}", counters.keys, counters.gold),
    );
    if query::is_paused(world) {
        buffer.write_text(
            DISPLAY_COLUMNS - PAUSED_LABEL.len(),
            INVENTORY_ROW,
            PAUSED_LABEL,
        );
    }
}

fn centred(text: &str) -> usize {
    DISPLAY_COLUMNS.saturating_sub(text.len()) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_lines_are_centred() {
        assert_eq!(centred(DEATH_BANNER[0]), 9);
        assert_eq!(centred(DEATH_BANNER[1]), 7);
        assert_eq!(centred(&"X".repeat(40)), 0);
    }

    #[test]
    fn minimap_covers_the_top_sixteen_rows() {
        assert_eq!(MINIMAP_COLUMNS, DISPLAY_COLUMNS);
        assert_eq!(MINIMAP_ROWS, STATUS_ROW);
    }

    #[test]
    fn cursor_spans_the_player_block() {
        let walls = vec![false; MINIMAP_COLUMNS * MINIMAP_ROWS];
        let mut buffer = DisplayBuffer::new();
        draw_minimap(&walls, Some(Position::new(70, 40)), &mut buffer);

        assert_eq!(buffer.get(4, 2), Some(glyph::MAP_CURSOR));
        assert_eq!(buffer.get(5, 2), Some(glyph::MAP_CURSOR));
        assert_eq!(buffer.get(6, 2), Some(glyph::MAP_FLOOR));
        assert_eq!(buffer.get(4, 1), Some(glyph::MAP_FLOOR));
        assert_eq!(
            buffer
                .as_bytes()
                .iter()
                .filter(|byte| **byte == glyph::MAP_CURSOR)
                .count(),
            2
        );
    }

    #[test]
    fn minimap_without_player_has_no_cursor() {
        let walls = vec![true; MINIMAP_COLUMNS * MINIMAP_ROWS];
        let mut buffer = DisplayBuffer::new();
        draw_minimap(&walls, None, &mut buffer);
        assert!(buffer.row(0).iter().all(|byte| *byte == glyph::MAP_WALL));
        assert!(buffer.row(15).iter().all(|byte| *byte == glyph::MAP_WALL));
    }
}
