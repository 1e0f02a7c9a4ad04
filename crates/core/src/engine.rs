//! Game engine - the public state machine
//!
//! [`GameEngine`] owns the board, the refill machinery, the tile source and the
//! [`ActionQueue`]. It is the only entry point that mutates a board:
//!
//! - [`GameEngine::start_game`] fills a fresh board and emits one `Start` group.
//! - [`GameEngine::swap_and_eliminate`] swaps two tiles, and either reverts the
//!   swap or runs the whole cascade (remove, refill, re-match) before returning.
//!
//! Every call runs to completion synchronously. Consumers pull the resulting
//! action groups from the queue at their own pace.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::board::Board;
use crate::config::BoardConfig;
use crate::matcher::{find_match, find_matches};
use crate::queue::ActionQueue;
use crate::refill::RefillEngine;
use crate::rng::{SimpleRng, TileSource};
use crate::types::{Action, ActionGroup, Cell, Coord};

/// Upper bound on remove/refill rounds in one cascade.
///
/// Only a degenerate tile source (e.g. one that always returns the same type)
/// can keep producing matches this long.
pub const MAX_CASCADE_ROUNDS: u32 = 10_000;

/// Summary of the last successful swap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Remove rounds (the swap's own match counts as the first round).
    pub rounds: u32,
    pub removed: u32,
    pub generated: u32,
    /// Refill steps that changed the board.
    pub refill_steps: u32,
}

#[derive(Debug, Clone)]
struct Session {
    board: Board,
    refill: RefillEngine,
}

impl Session {
    fn new(board: Board) -> Self {
        let refill = RefillEngine::new(board.config().clone());
        Self { board, refill }
    }
}

pub struct GameEngine<S: TileSource = SimpleRng> {
    source: S,
    session: Option<Session>,
    queue: ActionQueue,
    last_cascade: Option<CascadeReport>,
}

impl GameEngine<SimpleRng> {
    /// Create an engine drawing tiles from a seeded [`SimpleRng`].
    pub fn new(seed: u32) -> Self {
        Self::with_source(SimpleRng::new(seed))
    }
}

impl<S: TileSource> GameEngine<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            session: None,
            queue: ActionQueue::new(),
            last_cascade: None,
        }
    }

    /// Build a new board from `config`, fill every walkable cell and emit `Start`.
    ///
    /// Pending groups from a previous session stay queued ahead of `Start`.
    pub fn start_game(&mut self, config: Arc<BoardConfig>) {
        let mut board = Board::new(config);
        board.fill(&mut self.source);
        self.install(board);
    }

    /// Begin a session from an existing board (fixtures, saved games).
    pub fn restore_game(&mut self, board: Board) {
        self.install(board);
    }

    fn install(&mut self, mut board: Board) {
        board.reset_scope();
        self.session = Some(Session::new(board));
        self.last_cascade = None;

        let mut group = ActionGroup::new();
        group.push(Action::start());
        self.queue.push(group);
    }

    pub fn is_started(&self) -> bool {
        self.session.is_some()
    }

    pub fn board(&self) -> Option<&Board> {
        self.session.as_ref().map(|s| &s.board)
    }

    pub fn config(&self) -> Option<&Arc<BoardConfig>> {
        self.board().map(Board::config)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Board width, or 0 before the first game.
    pub fn width(&self) -> i32 {
        self.board().map_or(0, Board::width)
    }

    /// Board height, or 0 before the first game.
    pub fn height(&self) -> i32 {
        self.board().map_or(0, Board::height)
    }

    pub fn to_index(&self, pos: Coord) -> Option<usize> {
        self.board().and_then(|b| b.to_index(pos))
    }

    pub fn in_bounds(&self, pos: Coord) -> bool {
        self.board().is_some_and(|b| b.in_bounds(pos))
    }

    pub fn has_tile(&self, pos: Coord) -> bool {
        self.board().is_some_and(|b| b.has_tile(pos))
    }

    pub fn is_adjacent(&self, a: Coord, b: Coord) -> bool {
        self.board().is_some_and(|board| board.is_adjacent(a, b))
    }

    /// Call `f` for every cell in storage order. Does nothing before the first game.
    pub fn visit_board<F: FnMut(Coord, Cell)>(&self, f: F) {
        if let Some(board) = self.board() {
            board.visit(f);
        }
    }

    pub fn find_match(&self, pos: Coord) -> BTreeSet<Coord> {
        self.board()
            .map(|b| find_match(b, pos))
            .unwrap_or_default()
    }

    pub fn last_cascade(&self) -> Option<CascadeReport> {
        self.last_cascade
    }

    pub fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    pub fn pending_group_count(&self) -> usize {
        self.queue.pending_group_count()
    }

    pub fn pop_action_group(&mut self) -> Option<ActionGroup> {
        self.queue.pop_group()
    }

    /// # Panics
    ///
    /// Panics when no group is pending.
    pub fn take_action_group(&mut self) -> ActionGroup {
        self.queue.take_group()
    }

    pub fn on_group_enqueued<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.queue.subscribe(callback);
    }

    /// Swap the tiles at `a` and `b` and resolve the result.
    ///
    /// Returns false without touching anything when either cell holds no tile.
    /// Otherwise a `Move` group for the swap is always emitted. If the swap
    /// creates no match through `a` or `b`, it is reverted with a second `Move`
    /// group and false is returned. If it does, the full cascade runs before
    /// this returns true.
    ///
    /// Adjacency is the caller's check ([`GameEngine::is_adjacent`]).
    pub fn swap_and_eliminate(&mut self, a: Coord, b: Coord) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let board = &mut session.board;
        if !board.has_tile(a) || !board.has_tile(b) {
            return false;
        }

        board.swap(a, b);
        self.queue.push(swap_group(board, a, b));

        let mut matched = find_match(board, a);
        matched.extend(find_match(board, b));

        if matched.is_empty() {
            board.swap(a, b);
            self.queue.push(swap_group(board, a, b));
            return false;
        }

        board.reset_scope();
        board.touch(a);
        board.touch(b);
        let report = run_cascade(session, &mut self.source, &mut self.queue, matched);
        self.last_cascade = Some(report);
        true
    }
}

/// Two `Move` actions describing the board after `a` and `b` were exchanged.
fn swap_group(board: &Board, a: Coord, b: Coord) -> ActionGroup {
    let mut group = ActionGroup::new();
    if let Some(t) = board.tile_at(b) {
        group.push(Action::moved(t, a, b));
    }
    if let Some(t) = board.tile_at(a) {
        group.push(Action::moved(t, b, a));
    }
    group
}

/// Remove every matched tile as one group. Returns the number removed.
fn eliminate(board: &mut Board, matched: &BTreeSet<Coord>, queue: &mut ActionQueue) -> u32 {
    let mut group = ActionGroup::new();
    for &pos in matched {
        let Some(t) = board.tile_at(pos) else {
            debug_assert!(false, "matched cell {} holds no tile", pos);
            continue;
        };
        board.touch(pos);
        group.push(Action::remove(t, pos));
        board.set(pos, Cell::Empty);
    }
    let removed = group.len() as u32;
    queue.push(group);
    removed
}

/// Run refill steps until one changes nothing. Returns every cell that
/// received a tile.
fn drain<S: TileSource>(
    session: &mut Session,
    source: &mut S,
    queue: &mut ActionQueue,
    report: &mut CascadeReport,
) -> BTreeSet<Coord> {
    let mut filled = BTreeSet::new();
    // A tile falls at most `height` rows and shifts at most `width` columns,
    // and at most one tile spawns per cell.
    let config = session.board.config().clone();
    let max_steps = config.len() * (config.width() + config.height() + 1);

    session.refill.begin_drain(&session.board);
    for _ in 0..max_steps {
        let step = session.refill.step(&mut session.board, source);
        if step.is_settled() {
            break;
        }
        report.refill_steps += 1;
        report.generated += step.generated() as u32;
        filled.extend(step.filled.iter().copied());
        queue.push(step.group);
        if step.cycled {
            break;
        }
    }
    filled
}

fn run_cascade<S: TileSource>(
    session: &mut Session,
    source: &mut S,
    queue: &mut ActionQueue,
    mut matched: BTreeSet<Coord>,
) -> CascadeReport {
    let mut report = CascadeReport::default();
    loop {
        report.rounds += 1;
        report.removed += eliminate(&mut session.board, &matched, queue);

        let filled = drain(session, source, queue, &mut report);
        session.board.reset_scope();

        matched = find_matches(&session.board, &filled);
        if matched.is_empty() || report.rounds >= MAX_CASCADE_ROUNDS {
            break;
        }
    }
    report
}
