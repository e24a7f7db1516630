use core::fmt;

use grid_util::grid::{Grid as _, SimpleGrid};
use grid_util::point::Point;
use log::{info, trace};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::cell::{Cell, Membership, Role};
use crate::error::Error;
use crate::path::Path;
use crate::DEFAULT_GRID_SIZE;

/// Neighbour lists never exceed the four orthogonal directions.
pub type Neighbours<T> = SmallVec<[T; 4]>;

/// A square `n×n` board of [Cell]s stored row-wise in a [SimpleGrid]. Owns the
/// start/end designation so that at most one of each exists, and derives 4-connected
/// adjacency against the current barriers on demand.
///
/// In addition to the cells it keeps connected components of the non-barrier cells
/// in a [UnionFind], joined eagerly when a barrier is removed and flagged as dirty
/// when one is placed (a new barrier may split a component).
#[derive(Clone, Debug)]
pub struct Grid {
    cells: SimpleGrid<Cell>,
    start: Option<usize>,
    end: Option<usize>,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl Default for Grid {
    fn default() -> Grid {
        Grid::with_size(DEFAULT_GRID_SIZE)
    }
}

impl Grid {
    /// Creates a blank `size×size` grid.
    pub fn new(size: i32) -> Result<Grid, Error> {
        if size <= 0 {
            return Err(Error::InvalidSize { size });
        }
        Ok(Grid::with_size(size as usize))
    }

    fn with_size(size: usize) -> Grid {
        let values = (0..size * size)
            .map(|ix| Cell::new(ix / size, ix % size))
            .collect::<Vec<Cell>>();
        let mut grid = Grid {
            cells: SimpleGrid {
                width: size,
                height: size,
                values,
            },
            start: None,
            end: None,
            components: UnionFind::new(size * size),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.cells.width()
    }
    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.values.is_empty()
    }
    /// All cells, row by row.
    pub fn cells(&self) -> &[Cell] {
        &self.cells.values
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        self.cells.point_in_bounds(point)
    }
    /// Flat index of a point, `row * size + col`.
    pub fn index(&self, point: Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some(self.cells.get_ix_point(&point))
        } else {
            None
        }
    }
    pub(crate) fn checked_index(&self, point: Point) -> Result<usize, Error> {
        self.index(point).ok_or(Error::OutOfBounds { point })
    }
    pub(crate) fn point(&self, ix: usize) -> Point {
        self.cells.values[ix].point()
    }

    pub fn cell(&self, point: Point) -> Result<&Cell, Error> {
        self.checked_index(point).map(|ix| &self.cells.values[ix])
    }
    pub(crate) fn cell_at(&self, ix: usize) -> &Cell {
        &self.cells.values[ix]
    }
    pub(crate) fn cell_at_mut(&mut self, ix: usize) -> &mut Cell {
        &mut self.cells.values[ix]
    }

    /// Position of the start cell, if one is designated.
    pub fn start(&self) -> Option<Point> {
        self.start.map(|ix| self.point(ix))
    }
    /// Position of the end cell, if one is designated.
    pub fn end(&self) -> Option<Point> {
        self.end.map(|ix| self.point(ix))
    }
    pub(crate) fn endpoints(&self) -> Result<(usize, usize), Error> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok((start, end)),
            (start, end) => Err(Error::MissingEndpoints {
                start: start.is_some(),
                end: end.is_some(),
            }),
        }
    }

    /// Assigns `role` to the cell at `point`, replacing whatever role it had. Making a
    /// cell the start (or end) takes that role away from the previous holder, so the
    /// grid never has more than one of either. Turning the current start or end into a
    /// barrier removes the endpoint designation.
    pub fn set_role(&mut self, point: Point, role: Role) -> Result<(), Error> {
        let ix = self.checked_index(point)?;
        let old = self.cells.values[ix].role;
        if old == role {
            return Ok(());
        }
        match old {
            Role::Start => self.start = None,
            Role::End => self.end = None,
            _ => {}
        }
        let displaced = match role {
            Role::Start => self.start.replace(ix),
            Role::End => self.end.replace(ix),
            _ => None,
        };
        if let Some(prev) = displaced {
            trace!("{} is no longer {:?}", self.point(prev), role);
            self.cells.values[prev].role = Role::None;
        }
        let cell = &mut self.cells.values[ix];
        cell.role = role;
        cell.on_path = false;

        if role == Role::Barrier {
            self.components_dirty = true;
        } else if old == Role::Barrier {
            for n in self.neighbour_indices(ix) {
                self.components.union(ix, n);
            }
        }
        trace!("{} set from {:?} to {:?}", point, old, role);
        Ok(())
    }

    /// The non-barrier cells orthogonally adjacent to `point`, enumerated right, left,
    /// up, down. Positions off the grid are left out. The subject itself may be a
    /// barrier.
    pub fn neighbors_of(&self, point: Point) -> Result<Neighbours<Point>, Error> {
        let ix = self.checked_index(point)?;
        Ok(self
            .neighbour_indices(ix)
            .into_iter()
            .map(|n| self.point(n))
            .collect())
    }

    pub(crate) fn neighbour_indices(&self, ix: usize) -> Neighbours<usize> {
        let n = self.size();
        let (row, col) = (ix / n, ix % n);
        [
            (col + 1 < n).then(|| ix + 1),
            (col > 0).then(|| ix - 1),
            (row > 0).then(|| ix - n),
            (row + 1 < n).then(|| ix + n),
        ]
        .into_iter()
        .flatten()
        .filter(|&adj| !self.cells.values[adj].is_barrier())
        .collect()
    }

    /// Returns every cell to its initial state: no roles, no search data.
    pub fn clear(&mut self) {
        info!("Clearing {0}x{0} grid", self.size());
        self.cells.values.iter_mut().for_each(Cell::clear);
        self.start = None;
        self.end = None;
        self.generate_components();
    }

    /// Resets only the fields written by a search, keeping roles and barriers.
    pub fn clear_search(&mut self) {
        self.cells.values.iter_mut().for_each(Cell::clear_search);
    }

    /// Flags the cells of `path` strictly between its endpoints as lying on the path.
    pub fn mark_path(&mut self, path: &Path) -> Result<(), Error> {
        let points = path.points();
        let inner = points.len().saturating_sub(1);
        for point in points.iter().take(inner).skip(1) {
            let ix = self.checked_index(*point)?;
            self.cells.values[ix].on_path = true;
        }
        Ok(())
    }

    /// Whether a barrier-free 4-connected route between `a` and `b` exists.
    pub fn reachable(&mut self, a: Point, b: Point) -> bool {
        self.update();
        match (self.index(a), self.index(b)) {
            (Some(a_ix), Some(b_ix)) => {
                !self.cells.values[a_ix].is_barrier()
                    && !self.cells.values[b_ix].is_barrier()
                    && self.components.equiv(a_ix, b_ix)
            }
            _ => false,
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Builds a fresh [UnionFind] and links every non-barrier cell to its right and
    /// lower non-barrier neighbours.
    pub fn generate_components(&mut self) {
        info!("Generating connected components");
        let n = self.size();
        self.components = UnionFind::new(n * n);
        self.components_dirty = false;
        for ix in 0..self.len() {
            if self.cells.values[ix].is_barrier() {
                continue;
            }
            let (row, col) = (ix / n, ix % n);
            if col + 1 < n && !self.cells.values[ix + 1].is_barrier() {
                self.components.union(ix, ix + 1);
            }
            if row + 1 < n && !self.cells.values[ix + n].is_barrier() {
                self.components.union(ix, ix + n);
            }
        }
    }
}

impl fmt::Display for Grid {
    /// One line per row: `S` start, `E` end, `#` barrier, `*` path, `x` closed,
    /// `o` open and `.` unvisited.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.values.chunks(self.size()) {
            let line = row
                .iter()
                .map(|cell| match cell.role {
                    Role::Start => 'S',
                    Role::End => 'E',
                    Role::Barrier => '#',
                    Role::None if cell.on_path => '*',
                    Role::None => match cell.membership {
                        Membership::Closed => 'x',
                        Membership::Open => 'o',
                        Membership::Unvisited => '.',
                    },
                })
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
