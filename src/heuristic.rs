use grid_util::point::Point;

use crate::UNIT_COST;

/// Estimate of the remaining cost between two cells. Implementations must be
/// admissible (never overestimate the true 4-connected distance), otherwise the
/// search no longer guarantees shortest paths. Values are added to `g` with
/// saturation, so an estimate near `i32::MAX` only collapses the ordering.
pub trait Heuristic {
    fn estimate(&self, from: &Point, to: &Point) -> i32;
}

/// Manhattan distance, exact on an obstacle-free 4-connected grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    fn estimate(&self, from: &Point, to: &Point) -> i32 {
        estimate(from, to)
    }
}

/// Zero heuristic, which turns the search into Dijkstra's algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dijkstra;

impl Heuristic for Dijkstra {
    fn estimate(&self, _: &Point, _: &Point) -> i32 {
        0
    }
}

/// `|Δrow| + |Δcol|` in unit moves.
pub fn estimate(from: &Point, to: &Point) -> i32 {
    from.manhattan_distance(to) * UNIT_COST
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_symmetric_sum_of_deltas() {
        let a = Point::new(1, 4);
        let b = Point::new(3, 0);
        assert_eq!(Manhattan.estimate(&a, &b), 6);
        assert_eq!(Manhattan.estimate(&b, &a), 6);
        assert_eq!(Manhattan.estimate(&a, &a), 0);
    }

    #[test]
    fn dijkstra_estimates_nothing() {
        assert_eq!(Dijkstra.estimate(&Point::new(0, 0), &Point::new(9, 9)), 0);
    }
}
