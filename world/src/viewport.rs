//! Visible screen tracking and camera scrolling.

use xorx_core::Position;

const SCROLL_STEP_X: i32 = 2;
const SCROLL_STEP_Y: i32 = 1;

/// Top-left corner of the visible rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Viewport {
    origin: Position,
}

impl Viewport {
    /// Viewport showing the block that contains `focus`, or the top-left block.
    pub(crate) fn showing(focus: Option<Position>) -> Self {
        Self {
            origin: focus.map_or(Position::default(), Position::block),
        }
    }

    pub(crate) fn origin(&self) -> Position {
        self.origin
    }

    /// A cell is visible iff its block is the one currently shown.
    pub(crate) fn contains(&self, position: Position) -> bool {
        position.in_bounds() && position.block() == self.origin
    }

    /// Moves one notch toward `target`. Returns `false` when already aligned.
    pub(crate) fn scroll_toward(&mut self, target: Position) -> bool {
        if self.origin == target {
            return false;
        }
        self.origin = Position::new(
            approach(self.origin.x, target.x, SCROLL_STEP_X),
            approach(self.origin.y, target.y, SCROLL_STEP_Y),
        );
        true
    }

    pub(crate) fn snap_to(&mut self, target: Position) {
        self.origin = target;
    }
}

fn approach(current: i32, target: i32, step: i32) -> i32 {
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xorx_core::{VIEW_COLUMNS, VIEW_ROWS};

    #[test]
    fn horizontal_scroll_takes_sixteen_steps() {
        let mut viewport = Viewport::default();
        let target = Position::new(VIEW_COLUMNS, 0);
        let mut steps = 0;
        while viewport.scroll_toward(target) {
            steps += 1;
        }
        assert_eq!(steps, 16);
        assert_eq!(viewport.origin(), target);
    }

    #[test]
    fn vertical_scroll_moves_one_row_per_step() {
        let mut viewport = Viewport::showing(Some(Position::new(5, VIEW_ROWS + 3)));
        assert_eq!(viewport.origin(), Position::new(0, VIEW_ROWS));
        assert!(viewport.scroll_toward(Position::new(0, 0)));
        assert_eq!(viewport.origin(), Position::new(0, VIEW_ROWS - 1));
    }

    #[test]
    fn diagonal_scroll_advances_both_axes() {
        let mut viewport = Viewport::default();
        assert!(viewport.scroll_toward(Position::new(VIEW_COLUMNS, VIEW_ROWS)));
        assert_eq!(viewport.origin(), Position::new(2, 1));
    }

    #[test]
    fn visibility_follows_the_shown_block() {
        let viewport = Viewport::showing(Some(Position::new(40, 3)));
        assert!(viewport.contains(Position::new(VIEW_COLUMNS, 0)));
        assert!(viewport.contains(Position::new(2 * VIEW_COLUMNS - 1, VIEW_ROWS - 1)));
        assert!(!viewport.contains(Position::new(VIEW_COLUMNS - 1, 0)));
        assert!(!viewport.contains(Position::new(VIEW_COLUMNS, VIEW_ROWS)));
    }
}
