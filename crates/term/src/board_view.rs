//! Maps board cells onto a [`Canvas`].
//!
//! Pure (no I/O), so layouts can be asserted line by line in tests.

use match3_core::{tile_char, Board};
use match3_types::{Cell, Coord, TileType};

use crate::fb::{Canvas, Rgb, Style};

const PALETTE: [Rgb; 8] = [
    Rgb::new(230, 70, 70),
    Rgb::new(80, 200, 90),
    Rgb::new(80, 140, 240),
    Rgb::new(240, 200, 60),
    Rgb::new(190, 90, 220),
    Rgb::new(70, 210, 210),
    Rgb::new(240, 140, 50),
    Rgb::new(200, 200, 200),
];

const BG: Rgb = Rgb::new(25, 25, 35);

pub fn tile_color(t: TileType) -> Rgb {
    PALETTE[(t.max(1) as usize - 1) % PALETTE.len()]
}

/// Layout of a board on screen: each cell takes `cell_w` columns and one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardView {
    cell_w: u16,
}

impl Default for BoardView {
    fn default() -> Self {
        // Two columns per cell keeps the grid roughly square in most fonts.
        Self { cell_w: 2 }
    }
}

impl BoardView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Canvas size needed for a `width` x `height` board including the frame.
    pub fn frame_size(&self, width: usize, height: usize) -> (u16, u16) {
        let w = u16::try_from(width).unwrap_or(u16::MAX);
        let h = u16::try_from(height).unwrap_or(u16::MAX);
        (
            w.saturating_mul(self.cell_w).saturating_add(2),
            h.saturating_add(2),
        )
    }

    pub fn draw_board(&self, board: &Board, highlight: &[Coord], canvas: &mut Canvas) {
        self.draw_cells(
            board.width() as usize,
            board.height() as usize,
            board.cells(),
            highlight,
            canvas,
        );
    }

    /// Draw row-major cells (row 0 at the bottom) with the top row on line 1.
    pub fn draw_cells(
        &self,
        width: usize,
        height: usize,
        cells: &[Cell],
        highlight: &[Coord],
        canvas: &mut Canvas,
    ) {
        let (frame_w, frame_h) = self.frame_size(width, height);
        canvas.reset(frame_w, frame_h);

        let border = Style::new(Rgb::new(160, 160, 160), Rgb::new(0, 0, 0));
        for x in 1..frame_w - 1 {
            canvas.put(x, 0, '-', border);
            canvas.put(x, frame_h - 1, '-', border);
        }
        for y in 1..frame_h - 1 {
            canvas.put(0, y, '|', border);
            canvas.put(frame_w - 1, y, '|', border);
        }
        for (x, y) in [(0, 0), (frame_w - 1, 0), (0, frame_h - 1), (frame_w - 1, frame_h - 1)] {
            canvas.put(x, y, '+', border);
        }

        for (i, cell) in cells.iter().enumerate().take(width * height) {
            let col = i % width;
            let row = i / width;
            let x = 1 + col as u16 * self.cell_w;
            let y = 1 + (height - 1 - row) as u16;

            let (ch, mut style) = match *cell {
                Cell::Unwalkable => (' ', Style::new(BG, Rgb::new(0, 0, 0))),
                Cell::Empty => ('.', Style::new(Rgb::new(90, 90, 100), BG)),
                Cell::Tile(t) => (tile_char(t), Style::new(tile_color(t), BG).bold()),
            };
            if highlight.contains(&Coord::new(col as i32, row as i32)) {
                style.bg = Rgb::new(90, 90, 40);
            }
            canvas.put(x, y, ch, style);
            for dx in 1..self.cell_w {
                let pad = if matches!(cell, Cell::Unwalkable) {
                    Style::new(BG, Rgb::new(0, 0, 0))
                } else {
                    Style::new(BG, style.bg)
                };
                canvas.put(x + dx, y, ' ', pad);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match3_core::BoardConfig;
    use std::sync::Arc;

    #[test]
    fn draws_top_row_first_inside_frame() {
        // Row 1: . 3
        // Row 0: # 1   (hole at col 0)
        let config = Arc::new(BoardConfig::new(2, 2, 4, vec![false, true, true, true]).unwrap());
        let board = Board::from_types(config, &[0, 1, 0, 3]).unwrap();

        let mut canvas = Canvas::default();
        BoardView::default().draw_board(&board, &[], &mut canvas);

        assert_eq!((canvas.width(), canvas.height()), (6, 4));
        assert_eq!(canvas.line(0), "+----+");
        assert_eq!(canvas.line(1), "|. 3 |");
        assert_eq!(canvas.line(2), "|  1 |");
        assert_eq!(canvas.line(3), "+----+");
    }

    #[test]
    fn highlight_changes_background_only() {
        let config = Arc::new(BoardConfig::full(1, 1, 3).unwrap());
        let board = Board::from_types(config, &[2]).unwrap();
        let view = BoardView::new(1);

        let mut plain = Canvas::default();
        let mut lit = Canvas::default();
        view.draw_board(&board, &[], &mut plain);
        view.draw_board(&board, &[Coord::new(0, 0)], &mut lit);

        let (a, b) = (plain.get(1, 1).unwrap(), lit.get(1, 1).unwrap());
        assert_eq!(a.ch, '2');
        assert_eq!(a.ch, b.ch);
        assert_eq!(a.style.fg, b.style.fg);
        assert_ne!(a.style.bg, b.style.bg);
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(tile_color(1), tile_color(9));
        assert_ne!(tile_color(1), tile_color(2));
    }
}
