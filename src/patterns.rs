use std::collections::HashMap;

use once_cell::sync::Lazy;

/// A named seed pattern. Cell offsets are `(x, y)` relative to the stamp
/// origin, with no particular ordering.
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(i32, i32)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Blinker",
        cells: &[(0, 0), (1, 0), (2, 0)],
    },
    Pattern {
        name: "Toad",
        cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)],
    },
    Pattern {
        name: "Glider",
        cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    },
];

static BY_NAME: Lazy<HashMap<&'static str, &'static Pattern>> =
    Lazy::new(|| PATTERNS.iter().map(|pattern| (pattern.name, pattern)).collect());

pub fn find(name: &str) -> Option<&'static Pattern> {
    BY_NAME.get(name).copied()
}

pub fn names() -> Vec<&'static str> {
    PATTERNS.iter().map(|pattern| pattern.name).collect()
}
