//! Path finding over the walkable mask
//!
//! Movement is 4-neighbour and ignores cell contents: only the layout mask
//! matters. The refill step uses [`PathFinder::distance_to_top`] to decide
//! which of two tiles competing for the same dead slot should move first.

use std::collections::VecDeque;
use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::config::BoardConfig;
use crate::types::Coord;

const DIRS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

#[derive(Debug, Clone)]
pub struct PathFinder {
    config: Arc<BoardConfig>,
    /// Steps from the nearest walkable top-line cell, per cell index.
    /// Computed on first use; the mask never changes.
    top_distance: Option<Vec<Option<u32>>>,
}

impl PathFinder {
    pub fn new(config: Arc<BoardConfig>) -> Self {
        Self {
            config,
            top_distance: None,
        }
    }

    pub fn config(&self) -> &Arc<BoardConfig> {
        &self.config
    }

    fn neighbors(&self, pos: Coord) -> ArrayVec<Coord, 4> {
        DIRS.iter()
            .map(|&(dc, dr)| pos.offset(dc, dr))
            .filter(|&n| self.config.is_walkable(n))
            .collect()
    }

    /// Breadth-first distances from every `start` cell.
    fn flood(&self, starts: impl IntoIterator<Item = Coord>) -> Vec<Option<u32>> {
        let mut dist = vec![None; self.config.len()];
        let mut open = VecDeque::new();

        for start in starts {
            if let Some(idx) = self.config.to_index(start) {
                if self.config.layout()[idx] && dist[idx].is_none() {
                    dist[idx] = Some(0);
                    open.push_back(start);
                }
            }
        }

        while let Some(pos) = open.pop_front() {
            let Some(d) = self.config.to_index(pos).and_then(|i| dist[i]) else {
                continue;
            };
            for n in self.neighbors(pos) {
                if let Some(ni) = self.config.to_index(n) {
                    if dist[ni].is_none() {
                        dist[ni] = Some(d + 1);
                        open.push_back(n);
                    }
                }
            }
        }

        dist
    }

    /// Shortest walkable path from `from` to `to`, both ends included.
    ///
    /// Returns None when either end is not walkable or no path exists.
    pub fn shortest_path(&self, from: Coord, to: Coord) -> Option<Vec<Coord>> {
        if !self.config.is_walkable(from) || !self.config.is_walkable(to) {
            return None;
        }

        // Flood from the goal, then walk downhill from the start.
        let dist = self.flood([to]);
        let mut d = dist[self.config.to_index(from)?]?;
        let mut path = Vec::with_capacity(d as usize + 1);
        let mut cur = from;
        path.push(cur);
        while d > 0 {
            cur = self.neighbors(cur).into_iter().find(|&n| {
                self.config
                    .to_index(n)
                    .and_then(|i| dist[i])
                    .is_some_and(|nd| nd + 1 == d)
            })?;
            d -= 1;
            path.push(cur);
        }
        Some(path)
    }

    /// Walkable steps between the top line and `pos`, or None if unreachable.
    pub fn distance_to_top(&mut self, pos: Coord) -> Option<u32> {
        let idx = self.config.to_index(pos)?;
        if self.top_distance.is_none() {
            let top = self.config.top_line();
            let width = self.config.width() as i32;
            let starts: Vec<Coord> = (0..width).map(|col| Coord::new(col, top)).collect();
            self.top_distance = Some(self.flood(starts));
        }
        self.top_distance.as_ref().and_then(|d| d[idx])
    }
}
