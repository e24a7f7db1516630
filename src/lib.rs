//! # grid_astar
//!
//! The engine behind an A* visualizer: a square grid on which a start cell, an end
//! cell and barrier cells are placed, and an
//! [A* search](https://en.wikipedia.org/wiki/A*_search_algorithm) that can be
//! advanced one expansion at a time so each step can be drawn. Movement is
//! 4-connected with unit cost; the default heuristic is the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry).
//!
//! Frontier ties on `f` are broken towards the smaller `h`, then towards the entry
//! pushed first, and neighbours are always enumerated right, left, up, down, so the
//! same grid always produces the same path.
//!
//! ```
//! use grid_astar::{search, Grid, Role};
//! use grid_util::point::Point;
//!
//! let mut grid = Grid::new(3).unwrap();
//! grid.set_role(Point::new(0, 0), Role::Start).unwrap();
//! grid.set_role(Point::new(2, 2), Role::End).unwrap();
//! grid.set_role(Point::new(1, 1), Role::Barrier).unwrap();
//! let path = search::run(&mut grid).unwrap();
//! assert_eq!(path.edge_count(), 4);
//! ```
pub mod cell;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod path;
pub mod search;

pub use cell::{Cell, CellView, Membership, Role, VisitState};
pub use error::Error;
pub use grid::Grid;
pub use heuristic::{Dijkstra, Heuristic, Manhattan};
pub use path::{reconstruct, Path};
pub use search::{AstarSearch, Step};

/// Side length of [Grid::default], the board size of the visualizer.
pub const DEFAULT_GRID_SIZE: usize = 50;
/// Cost of a single orthogonal move.
pub const UNIT_COST: i32 = 1;
/// `g` of a cell that has not been reached.
pub const INFINITE_COST: i32 = i32::MAX;
