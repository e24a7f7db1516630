use grid_util::point::Point;

use crate::INFINITE_COST;

/// The role a user assigned to a cell. A cell holds exactly one role, which makes
/// "start and barrier at once" unrepresentable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    None,
    Start,
    End,
    Barrier,
}

/// Search membership of a cell. Every cell is in exactly one of these states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Membership {
    #[default]
    Unvisited,
    Open,
    Closed,
}

/// What a renderer should show for a cell. [VisitState::OnPath] is derived from the
/// presentation flag set by [Grid::mark_path](crate::Grid::mark_path) and is not an
/// engine state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisitState {
    Unvisited,
    Open,
    Closed,
    OnPath,
}

/// Read-only projection of a [Cell] for drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellView {
    pub row: usize,
    pub col: usize,
    pub role: Role,
    pub visit: VisitState,
}

/// One grid position. The identity is fixed at construction; the role is changed
/// through the owning [Grid](crate::Grid) and the remaining fields are written by
/// the search engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    row: usize,
    col: usize,
    pub(crate) role: Role,
    pub(crate) g: i32,
    pub(crate) h: i32,
    pub(crate) f: i32,
    pub(crate) membership: Membership,
    /// Flat index of the predecessor on the best known path.
    pub(crate) previous: Option<usize>,
    pub(crate) on_path: bool,
}

impl Cell {
    pub(crate) fn new(row: usize, col: usize) -> Cell {
        Cell {
            row,
            col,
            role: Role::None,
            g: INFINITE_COST,
            h: 0,
            f: 0,
            membership: Membership::Unvisited,
            previous: None,
            on_path: false,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }
    pub fn col(&self) -> usize {
        self.col
    }
    /// Position of the cell with `x = col` and `y = row`.
    pub fn point(&self) -> Point {
        Point::new(self.col as i32, self.row as i32)
    }
    pub fn role(&self) -> Role {
        self.role
    }
    pub fn is_start(&self) -> bool {
        self.role == Role::Start
    }
    pub fn is_end(&self) -> bool {
        self.role == Role::End
    }
    pub fn is_barrier(&self) -> bool {
        self.role == Role::Barrier
    }

    /// Best known cost from the start, [INFINITE_COST] if not yet reached.
    pub fn g(&self) -> i32 {
        self.g
    }
    /// Heuristic estimate to the end, set when the cell is first reached.
    pub fn h(&self) -> i32 {
        self.h
    }
    pub fn f(&self) -> i32 {
        self.f
    }
    pub fn membership(&self) -> Membership {
        self.membership
    }
    pub fn is_open(&self) -> bool {
        self.membership == Membership::Open
    }
    pub fn is_closed(&self) -> bool {
        self.membership == Membership::Closed
    }
    /// Flat index of the predecessor cell, if one has been recorded.
    pub fn previous(&self) -> Option<usize> {
        self.previous
    }
    pub fn on_path(&self) -> bool {
        self.on_path
    }

    pub fn view(&self) -> CellView {
        let visit = if self.on_path {
            VisitState::OnPath
        } else {
            match self.membership {
                Membership::Unvisited => VisitState::Unvisited,
                Membership::Open => VisitState::Open,
                Membership::Closed => VisitState::Closed,
            }
        };
        CellView {
            row: self.row,
            col: self.col,
            role: self.role,
            visit,
        }
    }

    /// Resets the fields written during a search, keeping identity and role.
    pub(crate) fn clear_search(&mut self) {
        self.g = INFINITE_COST;
        self.h = 0;
        self.f = 0;
        self.membership = Membership::Unvisited;
        self.previous = None;
        self.on_path = false;
    }

    pub(crate) fn clear(&mut self) {
        self.role = Role::None;
        self.clear_search();
    }
}
