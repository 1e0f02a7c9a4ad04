//! Consumer side of the action queue.
//!
//! A presentation layer keeps its own copy of the board and only learns about
//! engine changes through action groups. `Playback` tracks that copy plus the
//! number of animations still running for the current group; the next group is
//! pulled only once every animation of the previous one has finished.

use match3_core::{Board, GameEngine, TileSource};
use match3_types::{ActionGroup, ActionKind, Cell, Coord};

#[derive(Debug, Clone, Default)]
pub struct Playback {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    in_flight: usize,
    groups_applied: u64,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, pos: Coord) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Animations of the current group that have not reported completion.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    pub fn groups_applied(&self) -> u64 {
        self.groups_applied
    }

    /// Pull and apply the next group, unless one is still animating.
    ///
    /// A `Start` group resynchronises the mirror from the engine's current
    /// board, so it should be consumed before the first swap.
    pub fn begin<S: TileSource>(&mut self, engine: &mut GameEngine<S>) -> Option<ActionGroup> {
        if !self.is_idle() {
            return None;
        }
        let group = engine.pop_action_group()?;
        self.apply(&group, engine.board());
        Some(group)
    }

    /// Apply `group` to the mirror and arm the in-flight counter.
    ///
    /// `board` is only read for `Start`.
    pub fn apply(&mut self, group: &ActionGroup, board: Option<&Board>) {
        for action in group {
            match action.kind {
                ActionKind::Start => {
                    if let Some(board) = board {
                        self.sync(board);
                    }
                }
                ActionKind::Remove => self.write(action.source, Cell::Empty),
                ActionKind::Generate => {
                    self.write(action.source, action.tile_type.map_or(Cell::Empty, Cell::Tile))
                }
                ActionKind::Move => {
                    self.write(action.target, action.tile_type.map_or(Cell::Empty, Cell::Tile))
                }
                // Actions are listed in execution order, so a tile that lands
                // and then moves on within one group is replayed faithfully.
                ActionKind::Autofill => {
                    self.write(action.target, action.tile_type.map_or(Cell::Empty, Cell::Tile));
                    self.write(action.source, Cell::Empty);
                }
            }
        }

        self.in_flight = group.animated_count();
        self.groups_applied += 1;
    }

    /// One animation finished. Returns true when the next group may be pulled.
    pub fn finish_one(&mut self) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.is_idle()
    }

    /// Skip any remaining animations of the current group.
    pub fn finish_all(&mut self) {
        self.in_flight = 0;
    }

    /// Replace the mirror with a copy of `board`.
    pub fn sync(&mut self, board: &Board) {
        self.width = board.width() as usize;
        self.height = board.height() as usize;
        self.cells.clear();
        self.cells.extend_from_slice(board.cells());
    }

    /// Whether the mirror shows exactly what `board` holds.
    pub fn matches(&self, board: &Board) -> bool {
        self.width == board.width() as usize && self.cells == board.cells()
    }

    fn index(&self, pos: Coord) -> Option<usize> {
        if pos.col < 0 || pos.row < 0 {
            return None;
        }
        let (col, row) = (pos.col as usize, pos.row as usize);
        (col < self.width && row < self.height).then(|| row * self.width + col)
    }

    fn write(&mut self, pos: Option<Coord>, cell: Cell) {
        if let Some(i) = pos.and_then(|p| self.index(p)) {
            if self.cells[i].is_walkable() {
                self.cells[i] = cell;
            }
        }
    }
}
