//! Resumable A* over a [Grid].
//!
//! The search state ([AstarSearch]) holds the frontier and the phase; per-cell data
//! (`g`, `h`, `f`, membership, predecessor) lives in the grid itself so a caller can
//! draw it between steps. Each call to [AstarSearch::step] expands at most one cell.
use log::{debug, info, trace, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use grid_util::point::Point;

use crate::cell::Membership;
use crate::error::Error;
use crate::grid::Grid;
use crate::heuristic::{Heuristic, Manhattan};
use crate::path::{reconstruct_from, Path};
use crate::UNIT_COST;

/// Frontier entry. Improving an open cell pushes a new entry instead of updating
/// the old one, so an entry whose `cost` no longer matches the cell's `g` is stale
/// and skipped when popped.
struct SmallestCostHolder {
    estimated_cost: i32,
    heuristic: i32,
    cost: i32,
    sequence: u64,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: reverse every key so the smallest f comes out
        // first, then the smallest h, then the entry pushed earliest.
        other
            .estimated_cost
            .cmp(&self.estimated_cost)
            .then_with(|| other.heuristic.cmp(&self.heuristic))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Searching,
    Found(usize),
    Exhausted,
}

/// Result of a single [AstarSearch::step].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The given cell was expanded and closed; more work remains.
    Continue(Point),
    /// The end cell was reached.
    Done(Path),
}

/// A* search in progress. Created against a grid with both endpoints designated,
/// then driven with [step](Self::step) or [run](Self::run). The grid must be passed
/// back in on every call; the search keeps no reference to it.
pub struct AstarSearch<H = Manhattan> {
    heuristic: H,
    frontier: BinaryHeap<SmallestCostHolder>,
    goal: usize,
    goal_point: Point,
    phase: Phase,
    sequence: u64,
    expansions: usize,
}

impl AstarSearch<Manhattan> {
    /// Prepares a Manhattan-guided search. See [with_heuristic](Self::with_heuristic).
    pub fn new(grid: &mut Grid) -> Result<Self, Error> {
        Self::with_heuristic(grid, Manhattan)
    }
}

impl<H: Heuristic> AstarSearch<H> {
    /// Clears any previous search data from `grid`, seeds the frontier with the start
    /// cell and returns the ready-to-step search. Fails with
    /// [Error::MissingEndpoints] unless the grid has both a start and an end.
    pub fn with_heuristic(grid: &mut Grid, heuristic: H) -> Result<Self, Error> {
        let (start, goal) = grid.endpoints()?;
        grid.clear_search();
        let start_point = grid.point(start);
        let goal_point = grid.point(goal);
        debug!("Starting search from {} to {}", start_point, goal_point);

        let mut search = AstarSearch {
            heuristic,
            frontier: BinaryHeap::new(),
            goal,
            goal_point,
            phase: Phase::Searching,
            sequence: 0,
            expansions: 0,
        };
        let h = search.heuristic.estimate(&start_point, &goal_point);
        let cell = grid.cell_at_mut(start);
        cell.g = 0;
        cell.h = h;
        cell.f = h;
        cell.membership = Membership::Open;
        search.push(0, h, start);
        Ok(search)
    }

    fn push(&mut self, cost: i32, heuristic: i32, index: usize) {
        self.frontier.push(SmallestCostHolder {
            estimated_cost: cost.saturating_add(heuristic),
            heuristic,
            cost,
            sequence: self.sequence,
            index,
        });
        self.sequence += 1;
    }

    /// Pops entries until one refers to an open cell at its current cost. Cells turned
    /// into barriers since they were pushed are skipped as well.
    fn pop_current(&mut self, grid: &Grid) -> Option<usize> {
        while let Some(SmallestCostHolder { cost, index, .. }) = self.frontier.pop() {
            let cell = grid.cell_at(index);
            if cell.membership == Membership::Open && cell.g == cost && !cell.is_barrier() {
                return Some(index);
            }
            trace!("Skipping stale frontier entry for {}", cell.point());
        }
        None
    }

    /// Performs one expansion: takes the best frontier cell, finishes if it is the
    /// end, otherwise relaxes its neighbours and closes it.
    ///
    /// Once the search has finished, further calls repeat the final outcome.
    /// Exhausting the frontier yields [Error::NoPathFound].
    pub fn step(&mut self, grid: &mut Grid) -> Result<Step, Error> {
        match self.phase {
            Phase::Found(goal) => return reconstruct_from(grid, goal).map(Step::Done),
            Phase::Exhausted => return Err(Error::NoPathFound),
            Phase::Searching => {}
        }
        let Some(current) = self.pop_current(grid) else {
            warn!(
                "Frontier exhausted after {} expansions without reaching {}",
                self.expansions, self.goal_point
            );
            self.phase = Phase::Exhausted;
            return Err(Error::NoPathFound);
        };

        if current == self.goal {
            self.phase = Phase::Found(current);
            let path = reconstruct_from(grid, current)?;
            info!(
                "Reached {} after {} expansions, path has {} cells",
                self.goal_point,
                self.expansions,
                path.len()
            );
            return Ok(Step::Done(path));
        }

        let current_g = grid.cell_at(current).g;
        let tentative_g = current_g + UNIT_COST;
        for neighbour in grid.neighbour_indices(current) {
            let cell = grid.cell_at(neighbour);
            let membership = cell.membership;
            if membership == Membership::Closed {
                continue;
            }
            if membership == Membership::Open && tentative_g >= cell.g {
                continue;
            }
            let h = self.heuristic.estimate(&cell.point(), &self.goal_point);
            let cell = grid.cell_at_mut(neighbour);
            cell.g = tentative_g;
            cell.h = h;
            cell.f = tentative_g.saturating_add(h);
            cell.previous = Some(current);
            cell.membership = Membership::Open;
            self.push(tentative_g, h, neighbour);
        }

        grid.cell_at_mut(current).membership = Membership::Closed;
        self.expansions += 1;
        let point = grid.point(current);
        trace!("Expanded {} (g = {})", point, current_g);
        Ok(Step::Continue(point))
    }

    /// Steps until the search finishes.
    pub fn run(&mut self, grid: &mut Grid) -> Result<Path, Error> {
        loop {
            if let Step::Done(path) = self.step(grid)? {
                return Ok(path);
            }
        }
    }

    /// Number of cells expanded and closed so far.
    pub fn expansions(&self) -> usize {
        self.expansions
    }
    /// Number of frontier entries, stale ones included.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
    pub fn is_finished(&self) -> bool {
        self.phase != Phase::Searching
    }
    /// Position the search is heading for.
    pub fn goal(&self) -> Point {
        self.goal_point
    }
}

/// Runs a Manhattan-guided search on `grid` to completion.
pub fn run(grid: &mut Grid) -> Result<Path, Error> {
    AstarSearch::new(grid)?.run(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Role;
    use crate::heuristic::Dijkstra;
    use crate::INFINITE_COST;

    fn p(row: i32, col: i32) -> Point {
        Point::new(col, row)
    }

    fn grid_with(size: i32, start: Point, end: Point, barriers: &[Point]) -> Grid {
        let mut grid = Grid::new(size).unwrap();
        grid.set_role(start, Role::Start).unwrap();
        grid.set_role(end, Role::End).unwrap();
        for b in barriers {
            grid.set_role(*b, Role::Barrier).unwrap();
        }
        grid
    }

    #[test]
    fn frontier_orders_by_f_then_h_then_age() {
        let mut heap = BinaryHeap::new();
        let entry = |f: i32, h: i32, sequence: u64| SmallestCostHolder {
            estimated_cost: f,
            heuristic: h,
            cost: f - h,
            sequence,
            index: sequence as usize,
        };
        heap.push(entry(5, 3, 0));
        heap.push(entry(5, 1, 1));
        heap.push(entry(4, 4, 2));
        heap.push(entry(5, 1, 3));
        let order = std::iter::from_fn(|| heap.pop().map(|e| e.index)).collect::<Vec<_>>();
        assert_eq!(order, vec![2, 1, 3, 0]);
    }

    #[test]
    fn missing_endpoints() {
        let mut grid = Grid::new(3).unwrap();
        assert_eq!(
            run(&mut grid).unwrap_err(),
            Error::MissingEndpoints {
                start: false,
                end: false
            }
        );
        grid.set_role(p(0, 0), Role::Start).unwrap();
        assert_eq!(
            AstarSearch::new(&mut grid).err(),
            Some(Error::MissingEndpoints {
                start: true,
                end: false
            })
        );
    }

    /// Asserts that the optimal 4 step solution is found on an open 3x3 grid.
    #[test]
    fn solve_open_grid() {
        let mut grid = grid_with(3, p(0, 0), p(2, 2), &[]);
        let path = run(&mut grid).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(p(0, 0)));
        assert_eq!(path.last(), Some(p(2, 2)));
        for pair in path.points().windows(2) {
            assert_eq!(pair[0].manhattan_distance(&pair[1]), 1);
        }
    }

    #[test]
    fn enclosed_start_has_no_path() {
        let mut grid = grid_with(3, p(0, 0), p(2, 2), &[p(0, 1), p(1, 0)]);
        assert_eq!(run(&mut grid), Err(Error::NoPathFound));
    }

    /// Corresponds to the following 3x3 grid:
    /// ```text
    /// S..
    /// .#.
    /// ..E
    /// ```
    #[test]
    fn detours_around_barrier() {
        let mut grid = grid_with(3, p(0, 0), p(2, 2), &[p(1, 1)]);
        let path = run(&mut grid).unwrap();
        assert_eq!(path.edge_count(), 4);
        assert!(!path.points().contains(&p(1, 1)));
    }

    /// Right is enumerated before down, so the first staircase found runs along the
    /// top row.
    #[test]
    fn tie_break_is_reproducible() {
        let mut grid = grid_with(3, p(0, 0), p(2, 2), &[]);
        let first = run(&mut grid).unwrap();
        let second = run(&mut grid).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.points(), &[p(0, 0), p(0, 1), p(0, 2), p(1, 2), p(2, 2)]);
    }

    #[test]
    fn stepping_exposes_state_between_calls() {
        let mut grid = grid_with(4, p(0, 0), p(3, 3), &[]);
        let mut search = AstarSearch::new(&mut grid).unwrap();
        assert!(grid.cell(p(0, 0)).unwrap().is_open());
        assert_eq!(search.step(&mut grid), Ok(Step::Continue(p(0, 0))));
        let start = grid.cell(p(0, 0)).unwrap();
        assert!(start.is_closed());
        assert_eq!(start.g(), 0);
        let right = grid.cell(p(0, 1)).unwrap();
        assert!(right.is_open());
        assert_eq!((right.g(), right.h(), right.f()), (1, 5, 6));
        assert_eq!(right.previous(), grid.index(p(0, 0)));
        assert_eq!(search.expansions(), 1);
        assert_eq!(search.frontier_len(), 2);
        assert!(!search.is_finished());
        assert_eq!(grid.cell(p(2, 2)).unwrap().g(), INFINITE_COST);
    }

    #[test]
    fn finished_search_repeats_its_outcome() {
        let mut grid = grid_with(2, p(0, 0), p(1, 1), &[]);
        let mut search = AstarSearch::new(&mut grid).unwrap();
        let path = search.run(&mut grid).unwrap();
        assert!(search.is_finished());
        assert_eq!(search.step(&mut grid), Ok(Step::Done(path)));

        let mut blocked = grid_with(2, p(0, 0), p(1, 1), &[p(0, 1), p(1, 0)]);
        let mut search = AstarSearch::new(&mut blocked).unwrap();
        assert_eq!(search.run(&mut blocked), Err(Error::NoPathFound));
        assert_eq!(search.step(&mut blocked), Err(Error::NoPathFound));
    }

    #[test]
    fn every_cell_is_in_one_state() {
        let mut grid = grid_with(5, p(0, 0), p(4, 4), &[p(2, 1), p(2, 2), p(2, 3)]);
        let mut search = AstarSearch::new(&mut grid).unwrap();
        while let Ok(Step::Continue(_)) = search.step(&mut grid) {
            for cell in grid.cells() {
                assert!(!(cell.is_open() && cell.is_closed()));
                assert!(!cell.is_barrier() || cell.membership() == Membership::Unvisited);
                if cell.membership() != Membership::Unvisited {
                    assert!(cell.g() < INFINITE_COST);
                    assert_eq!(cell.f(), cell.g() + cell.h());
                }
            }
        }
    }

    #[test]
    fn dijkstra_finds_equally_short_path_with_more_work() {
        let barriers = [p(1, 1), p(1, 2), p(1, 3), p(3, 1), p(3, 2), p(3, 3)];
        let mut grid = grid_with(5, p(0, 0), p(4, 4), &barriers);
        let mut astar = AstarSearch::new(&mut grid).unwrap();
        let astar_path = astar.run(&mut grid).unwrap();
        let mut dijkstra = AstarSearch::with_heuristic(&mut grid, Dijkstra).unwrap();
        let dijkstra_path = dijkstra.run(&mut grid).unwrap();
        assert_eq!(astar_path.edge_count(), 8);
        assert_eq!(dijkstra_path.edge_count(), astar_path.edge_count());
        assert!(dijkstra.expansions() >= astar.expansions());
    }

    /// A cell blocked between two steps is never expanded, even if it was already on
    /// the frontier.
    #[test]
    fn barrier_placed_mid_search_is_not_crossed() {
        let mut grid = grid_with(3, p(0, 0), p(2, 0), &[]);
        let mut search = AstarSearch::new(&mut grid).unwrap();
        assert_eq!(search.step(&mut grid), Ok(Step::Continue(p(0, 0))));
        assert!(grid.cell(p(1, 0)).unwrap().is_open());
        grid.set_role(p(1, 0), Role::Barrier).unwrap();
        let path = search.run(&mut grid).unwrap();
        assert!(!path.points().contains(&p(1, 0)));
        assert_eq!(path.edge_count(), 4);
    }

    struct Huge;

    impl Heuristic for Huge {
        fn estimate(&self, _: &Point, _: &Point) -> i32 {
            i32::MAX
        }
    }

    #[test]
    fn oversized_estimates_saturate() {
        let mut grid = grid_with(3, p(0, 0), p(2, 2), &[]);
        let mut search = AstarSearch::with_heuristic(&mut grid, Huge).unwrap();
        let path = search.run(&mut grid).unwrap();
        assert_eq!(path.last(), Some(p(2, 2)));
        assert_eq!(grid.cell(p(0, 1)).unwrap().f(), i32::MAX);
    }

    #[test]
    fn rerun_after_barrier_change() {
        let mut grid = grid_with(3, p(0, 0), p(0, 2), &[]);
        assert_eq!(run(&mut grid).unwrap().edge_count(), 2);
        grid.set_role(p(0, 1), Role::Barrier).unwrap();
        assert_eq!(run(&mut grid).unwrap().edge_count(), 4);
        grid.set_role(p(1, 1), Role::Barrier).unwrap();
        grid.set_role(p(2, 1), Role::Barrier).unwrap();
        assert_eq!(run(&mut grid), Err(Error::NoPathFound));
    }
}
