//! Error type shared by the grid, the search engine and path reconstruction.
use core::fmt;
use grid_util::point::Point;

/// Everything that can go wrong while building a grid or searching it.
///
/// Only [Error::BrokenChain] signals an internal defect; the other variants are
/// ordinary outcomes a caller is expected to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A grid was requested with a non-positive dimension.
    InvalidSize { size: i32 },
    /// A position lies outside the grid.
    OutOfBounds { point: Point },
    /// Search was started without a start and/or end cell. The flags tell
    /// which of the two is present.
    MissingEndpoints { start: bool, end: bool },
    /// The frontier was exhausted without reaching the end cell.
    NoPathFound,
    /// Following `previous` links did not terminate within the cell count.
    BrokenChain { steps: usize },
}

impl Error {
    /// Whether the error indicates corrupted state rather than a legitimate outcome.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::BrokenChain { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSize { size } => {
                write!(f, "grid size must be positive, got {size}")
            }
            Error::OutOfBounds { point } => write!(f, "{point} lies outside the grid"),
            Error::MissingEndpoints { start, end } => match (start, end) {
                (false, false) => write!(f, "no start or end cell designated"),
                (false, true) => write!(f, "no start cell designated"),
                _ => write!(f, "no end cell designated"),
            },
            Error::NoPathFound => write!(f, "no path exists between start and end"),
            Error::BrokenChain { steps } => write!(
                f,
                "path reconstruction did not reach the start after {steps} steps"
            ),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_broken_chain_is_fatal() {
        assert!(Error::BrokenChain { steps: 9 }.is_fatal());
        assert!(!Error::NoPathFound.is_fatal());
        assert!(!Error::InvalidSize { size: 0 }.is_fatal());
        assert!(!Error::MissingEndpoints {
            start: true,
            end: false
        }
        .is_fatal());
    }

    #[test]
    fn missing_endpoints_names_the_missing_one() {
        let msg = Error::MissingEndpoints {
            start: true,
            end: false,
        }
        .to_string();
        assert_eq!(msg, "no end cell designated");
        let msg = Error::MissingEndpoints {
            start: false,
            end: true,
        }
        .to_string();
        assert_eq!(msg, "no start cell designated");
    }
}
