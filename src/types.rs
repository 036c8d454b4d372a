use std::fmt;

use serde::{Serialize, Serializer};

/// Rendered state of a single cell.
///
/// Contract with the renderer: serializes as a numeric code,
/// 0 = dead, 1 = alive, 2 = undead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Dead,
    Alive,
    Undead,
}

impl CellState {
    pub fn code(self) -> u8 {
        match self {
            Self::Dead => 0,
            Self::Alive => 1,
            Self::Undead => 2,
        }
    }
}

impl Serialize for CellState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// One entry of the per-generation redraw list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellChange {
    pub x: i32,
    pub y: i32,
    pub state: CellState,
}

/// Result of advancing the grid by one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub alive: u32,
    pub undead: u32,
    /// Contract:
    /// - Every cell whose rendered state changes this tick appears once.
    /// - Undead cells are re-emitted every generation even though they never
    ///   change; callers may skip repainting them.
    /// - Survivors and deaths come first in scan order (ascending y, then x),
    ///   followed by births sorted the same way.
    pub changes: Vec<CellChange>,
}

/// Session snapshot returned from WASM APIs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionState {
    pub generation: u64,
    pub alive: u32,
    pub undead: u32,
    pub columns: u32,
    pub rows: u32,
    /// Running average of the algorithm step time, in microseconds.
    pub avg_step_micros: f64,
}

/// Errors surfaced synchronously by the simulation.
///
/// All operations are deterministic over the current state, so nothing is
/// retried; double-removal is a no-op and double-add an upsert, neither is an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifeError {
    /// Coordinate outside the session's configured board.
    InvalidCoordinate { x: i32, y: i32 },
    /// A sort invariant of the sparse grid is broken. Should be unreachable;
    /// fatal to the session, which should reset rather than continue.
    InvariantViolation(&'static str),
    /// No seed pattern registered under the given name.
    UnknownPattern(String),
}

impl fmt::Display for LifeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinate { x, y } => {
                write!(f, "coordinate ({x}, {y}) is outside the board")
            }
            Self::InvariantViolation(what) => write!(f, "grid invariant violated: {what}"),
            Self::UnknownPattern(name) => write!(f, "unknown pattern: {name}"),
        }
    }
}

impl std::error::Error for LifeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_state_codes_match_renderer_contract() {
        assert_eq!(CellState::Dead.code(), 0);
        assert_eq!(CellState::Alive.code(), 1);
        assert_eq!(CellState::Undead.code(), 2);
    }
}
