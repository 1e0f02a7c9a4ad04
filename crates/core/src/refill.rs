//! Refill - spawning and gravity after removals
//!
//! One call to [`RefillEngine::step`] is one animation step:
//!
//! 1. Every empty walkable cell on the top line receives a new random tile
//!    (`Generate`). Nothing spawns when the top line is row 0.
//! 2. The search scope is scanned bottom row first, repeatedly, until a pass
//!    moves nothing. A tile falls straight down into an empty cell below it
//!    (`Autofill`). Below the top line, a tile that cannot fall may shift
//!    sideways into an empty neighbour whose cell above is a wall: such a
//!    "dead slot" can never be fed from above.
//!
//! A tile that moved during the step is not moved again until the next step, so
//! each tile travels at most one cell per step. Freshly spawned tiles may still
//! fall once in the step they appear.
//!
//! When a second tile two columns away could also feed the same dead slot, the
//! one closer to the top line (by walkable path length) takes it; on a tie the
//! tile being scanned moves.
//!
//! A lone tile between two dead slots would shift back and forth forever, so a
//! drain also remembers every board state it produced. A step that brings the
//! board back to one of them reports [`RefillStep::cycled`] and the drain stops
//! there.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::board::{Board, SearchScope};
use crate::config::BoardConfig;
use crate::path::PathFinder;
use crate::rng::TileSource;
use crate::types::{Action, ActionGroup, ActionKind, Cell, Coord};

/// Result of one refill step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefillStep {
    /// Cells that received a tile (spawned or moved into).
    pub filled: BTreeSet<Coord>,
    /// `Generate` actions first, then `Autofill` actions in execution order.
    pub group: ActionGroup,
    /// The board ended up in a state already seen during this drain.
    pub cycled: bool,
}

impl RefillStep {
    pub fn is_settled(&self) -> bool {
        self.filled.is_empty()
    }

    pub fn generated(&self) -> usize {
        self.group
            .iter()
            .filter(|a| a.kind == ActionKind::Generate)
            .count()
    }

    pub fn moved(&self) -> usize {
        self.group
            .iter()
            .filter(|a| a.kind == ActionKind::Autofill)
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct RefillEngine {
    path: PathFinder,
    /// Board states seen since the last [`RefillEngine::begin_drain`].
    seen: HashSet<(SearchScope, Vec<Cell>)>,
}

impl RefillEngine {
    pub fn new(config: Arc<BoardConfig>) -> Self {
        Self {
            path: PathFinder::new(config),
            seen: HashSet::new(),
        }
    }

    /// Start a new drain (sequence of steps run to a fixed point) from `board`.
    pub fn begin_drain(&mut self, board: &Board) {
        self.seen.clear();
        self.seen.insert(state_of(board));
    }

    pub fn step<S: TileSource + ?Sized>(&mut self, board: &mut Board, source: &mut S) -> RefillStep {
        let mut step = RefillStep::default();
        self.spawn_top_line(board, source, &mut step);

        let top_line = board.config().top_line();
        let scope = board.scope();
        let mut moved: BTreeSet<Coord> = BTreeSet::new();
        loop {
            let before = moved.len();
            for pos in scope.coords() {
                if !board.has_tile(pos) || moved.contains(&pos) {
                    continue;
                }

                let below = pos.below();
                if board.is_empty_at(below) {
                    shift(board, &mut moved, &mut step.group, pos, below);
                    continue;
                }

                if top_line > pos.row {
                    if self.try_lateral(board, &mut moved, &mut step.group, pos, -1) {
                        continue;
                    }
                    self.try_lateral(board, &mut moved, &mut step.group, pos, 1);
                }
            }
            if moved.len() == before {
                break;
            }
        }

        step.filled.extend(moved);
        for action in step.group.iter() {
            if let Some(src) = action.source {
                board.touch(src);
            }
        }
        if !step.is_settled() {
            step.cycled = !self.seen.insert(state_of(board));
        }
        step
    }

    fn spawn_top_line<S: TileSource + ?Sized>(
        &mut self,
        board: &mut Board,
        source: &mut S,
        step: &mut RefillStep,
    ) {
        let top_line = board.config().top_line();
        if top_line <= 0 {
            return;
        }

        let type_num = board.type_num();
        for col in 0..board.width() {
            let pos = Coord::new(col, top_line);
            if board.is_empty_at(pos) {
                let t = source.next_type(type_num);
                board.set(pos, Cell::Tile(t));
                step.filled.insert(pos);
                step.group.push(Action::generate(t, pos));
            }
        }
    }

    /// Try to feed the dead slot next to `pos` in direction `dir` (-1 left, 1 right).
    fn try_lateral(
        &mut self,
        board: &mut Board,
        moved: &mut BTreeSet<Coord>,
        group: &mut ActionGroup,
        pos: Coord,
        dir: i32,
    ) -> bool {
        let slot = pos.offset(dir, 0);
        if board.is_walkable(slot.above()) || !board.is_empty_at(slot) {
            return false;
        }

        let rival = pos.offset(2 * dir, 0);
        if !board.is_walkable(rival.above()) {
            shift(board, moved, group, pos, slot);
            return true;
        }

        let ours = self.path.distance_to_top(pos).unwrap_or(u32::MAX);
        let theirs = self.path.distance_to_top(rival).unwrap_or(u32::MAX);
        if ours <= theirs {
            shift(board, moved, group, pos, slot);
            true
        } else if board.has_tile(rival) && !moved.contains(&rival) {
            shift(board, moved, group, rival, slot);
            true
        } else {
            false
        }
    }

    pub fn path_finder(&self) -> &PathFinder {
        &self.path
    }
}

fn state_of(board: &Board) -> (SearchScope, Vec<Cell>) {
    (board.scope(), board.cells().to_vec())
}

fn shift(
    board: &mut Board,
    moved: &mut BTreeSet<Coord>,
    group: &mut ActionGroup,
    from: Coord,
    to: Coord,
) {
    if let Some(t) = board.tile_at(from) {
        moved.insert(to);
        group.push(Action::autofill(t, from, to));
        board.swap(from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;

    fn board_from_rows(rows: &[&str], type_num: u8) -> Board {
        // Rows top-first: '#' hole, '.' empty, digits are tiles.
        let height = rows.len();
        let width = rows[0].len();
        let mut layout = vec![false; width * height];
        let mut types = vec![0u8; width * height];
        for (i, line) in rows.iter().enumerate() {
            let row = height - 1 - i;
            for (col, ch) in line.chars().enumerate() {
                let idx = row * width + col;
                layout[idx] = ch != '#';
                types[idx] = ch.to_digit(10).map(|d| d as u8).unwrap_or(0);
            }
        }
        let config = Arc::new(BoardConfig::new(width, height, type_num, layout).unwrap());
        Board::from_types(config, &types).unwrap()
    }

    fn touch_all(board: &mut Board) {
        let (w, h) = (board.width(), board.height());
        board.touch(Coord::new(0, 0));
        board.touch(Coord::new(w - 1, h - 1));
    }

    #[test]
    fn spawns_on_top_line_and_falls_one_cell_per_step() {
        let mut board = board_from_rows(&["...", "1..", "2.."], 3);
        touch_all(&mut board);
        let mut refill = RefillEngine::new(board.config().clone());
        let mut src = ScriptedSource::new(vec![3]);

        let step = refill.step(&mut board, &mut src);
        assert_eq!(step.generated(), 3);
        // Each column's spawned tile falls once; column 0 is already settled.
        assert_eq!(step.moved(), 2);
        assert_eq!(step.group.as_slice()[0].kind, ActionKind::Generate);
        assert_eq!(board.to_string(), "3..\n133\n2..");
    }

    #[test]
    fn repeated_steps_reach_fixed_point() {
        let mut board = board_from_rows(&["....", "....", "...."], 4);
        touch_all(&mut board);
        let mut refill = RefillEngine::new(board.config().clone());
        let mut src = ScriptedSource::new(vec![1, 2, 3, 4]);

        refill.begin_drain(&board);
        let mut steps = 0;
        while !refill.step(&mut board, &mut src).is_settled() {
            steps += 1;
            assert!(steps < 50);
        }
        assert_eq!(board.empty_count(), 0);
    }

    #[test]
    fn no_spawn_when_top_line_is_row_zero() {
        let mut board = board_from_rows(&["1.2"], 3);
        touch_all(&mut board);
        let mut refill = RefillEngine::new(board.config().clone());
        let step = refill.step(&mut board, &mut ScriptedSource::new(vec![1]));
        assert!(step.is_settled());
        assert_eq!(board.empty_count(), 1);
    }

    #[test]
    fn lateral_shift_feeds_dead_slot() {
        // top: . . .
        //      1 # .      (hole above the dead slot at (1, 0))
        // bot: 2 . 3
        let mut board = board_from_rows(&["...", "1#.", "2.3"], 3);
        let mut refill = RefillEngine::new(board.config().clone());
        // Scope covers rows 0..=1, so tiles spawned on row 2 stay put.
        board.touch(Coord::new(1, 0));

        let mut src = ScriptedSource::new(vec![1]);
        let step = refill.step(&mut board, &mut src);
        let autofill: Vec<_> = step
            .group
            .iter()
            .filter(|a| a.kind == ActionKind::Autofill)
            .copied()
            .collect();
        assert!(autofill.contains(&Action::autofill(2, Coord::new(0, 0), Coord::new(1, 0))));
        assert_eq!(board.tile_at(Coord::new(1, 0)), Some(2));
    }

    #[test]
    fn closer_rival_takes_the_dead_slot() {
        // top: # . .
        //      # # .
        // bot: 1 . 2
        //
        // The dead slot (1, 0) has a wall above it. The tile at (0, 0) is only
        // reachable through the bottom row; the rival at (2, 0) is closer to the
        // top line, so the rival is pulled in instead.
        let mut board = board_from_rows(&["#..", "##.", "1.2"], 3);
        board.touch(Coord::new(1, 0));
        let mut refill = RefillEngine::new(board.config().clone());

        assert_eq!(refill.path.distance_to_top(Coord::new(0, 0)), Some(4));
        assert_eq!(refill.path.distance_to_top(Coord::new(2, 0)), Some(2));
        // Both distances are realised by an actual walk to the top line.
        let exit = Coord::new(2, 2);
        for (from, dist) in [(Coord::new(0, 0), 4), (Coord::new(2, 0), 2)] {
            let path = refill.path_finder().shortest_path(from, exit).unwrap();
            assert_eq!(path.len(), dist + 1);
            assert_eq!(path.last(), Some(&exit));
        }

        let step = refill.step(&mut board, &mut ScriptedSource::new(vec![3]));
        assert!(step
            .group
            .iter()
            .any(|a| *a == Action::autofill(2, Coord::new(2, 0), Coord::new(1, 0))));
        assert_eq!(board.tile_at(Coord::new(0, 0)), Some(1));
        assert!(board.is_empty_at(Coord::new(2, 0)));
    }

    #[test]
    fn equal_distance_moves_the_scanned_tile() {
        //      . . .
        //      . # .
        // bot: 1 . 2
        let mut board = board_from_rows(&["...", ".#.", "1.2"], 3);
        board.touch(Coord::new(1, 0));
        let mut refill = RefillEngine::new(board.config().clone());

        let step = refill.step(&mut board, &mut ScriptedSource::new(vec![3]));
        assert!(step
            .group
            .iter()
            .any(|a| *a == Action::autofill(1, Coord::new(0, 0), Coord::new(1, 0))));
        assert_eq!(board.tile_at(Coord::new(2, 0)), Some(2));
    }

    #[test]
    fn vacated_dead_slot_is_refilled() {
        // Row 1 is a line of dead slots under walls, fed only from column 3.
        // The tile at (0, 1) first shifts out to (1, 1) and drops; the next
        // tile arriving at (1, 1) must be allowed back into (0, 1).
        let mut board = board_from_rows(&["###7", "4.56", "1.23"], 9);
        touch_all(&mut board);
        let mut refill = RefillEngine::new(board.config().clone());
        let mut src = ScriptedSource::new(vec![8, 9]);

        refill.begin_drain(&board);
        let mut steps = 0;
        loop {
            let step = refill.step(&mut board, &mut src);
            if step.is_settled() {
                break;
            }
            assert!(!step.cycled);
            steps += 1;
            assert!(steps < 20);
        }
        assert_eq!(board.to_string(), "###9\n5678\n1423");
        assert_eq!(board.empty_count(), 0);
    }

    #[test]
    fn lone_tile_between_dead_slots_reports_a_cycle() {
        let mut board = board_from_rows(&["12", "##", "3.", "12"], 3);
        touch_all(&mut board);
        let start = board.clone();
        let mut refill = RefillEngine::new(board.config().clone());
        let mut src = ScriptedSource::new(vec![1]);

        refill.begin_drain(&board);
        let first = refill.step(&mut board, &mut src);
        assert_eq!(first.moved(), 1);
        assert!(!first.cycled);
        assert_eq!(board.tile_at(Coord::new(1, 1)), Some(3));

        let second = refill.step(&mut board, &mut src);
        assert!(second.cycled);
        assert_eq!(board, start);

        refill.begin_drain(&board);
        assert!(!refill.step(&mut board, &mut src).cycled);
    }
}
