use grid_util::point::Point;
use log::error;

use crate::error::Error;
use crate::grid::Grid;

/// The cells from start to end inclusive, in walking order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    /// Number of cells on the path, endpoints included.
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    /// Number of moves, one less than the number of cells.
    pub fn edge_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }
    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl IntoIterator for Path {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Walks the `previous` links back from `end` until a cell without predecessor and
/// returns the cells in start-to-end order. Fails with [Error::BrokenChain] when the
/// walk outlasts the number of cells, which can only happen if the links form a
/// cycle.
pub fn reconstruct(grid: &Grid, end: Point) -> Result<Path, Error> {
    let end_ix = grid.checked_index(end)?;
    reconstruct_from(grid, end_ix)
}

pub(crate) fn reconstruct_from(grid: &Grid, end_ix: usize) -> Result<Path, Error> {
    let limit = grid.len();
    let mut points = vec![grid.point(end_ix)];
    let mut current = end_ix;
    while let Some(prev) = grid.cell_at(current).previous {
        if points.len() >= limit {
            error!(
                "Backlinks from {} did not reach a root within {} cells",
                grid.point(end_ix),
                limit
            );
            return Err(Error::BrokenChain {
                steps: points.len(),
            });
        }
        points.push(grid.point(prev));
        current = prev;
    }
    points.reverse();
    Ok(Path { points })
}
