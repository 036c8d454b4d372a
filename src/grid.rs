use std::collections::BTreeMap;

use crate::types::{CellChange, CellState, Generation, LifeError};

/// The 8-neighborhood, scan order: row above, own row, row below.
const NEIGHBORHOOD: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    x: i32,
    undead: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    y: i32,
    cells: Vec<Cell>,
}

/// Sparse "list life" grid.
///
/// Only occupied cells are stored: rows sorted strictly ascending by `y`,
/// cells within a row sorted strictly ascending by `x`. A row is dropped as
/// soon as it becomes empty. Coordinates are unbounded here; the session
/// layer enforces the configured board dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifeGrid {
    rows: Vec<Row>,
}

impl LifeGrid {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of occupied cells (alive + undead).
    pub fn population(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).sum()
    }

    /// Returns `(alive_count, undead_count)`.
    pub fn counts(&self) -> (u32, u32) {
        let mut alive = 0;
        let mut undead = 0;
        for row in &self.rows {
            for cell in &row.cells {
                if cell.undead {
                    undead += 1;
                } else {
                    alive += 1;
                }
            }
        }
        (alive, undead)
    }

    /// True if `(x, y)` is alive or undead.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.cell_state(x, y) != CellState::Dead
    }

    pub fn cell_state(&self, x: i32, y: i32) -> CellState {
        let Ok(i) = self.row_index(y) else {
            return CellState::Dead;
        };
        match self.rows[i].find(x) {
            Ok(j) if self.rows[i].cells[j].undead => CellState::Undead,
            Ok(_) => CellState::Alive,
            Err(_) => CellState::Dead,
        }
    }

    /// Occupied cells in scan order as `(x, y, undead)`.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, bool)> + '_ {
        self.rows.iter().flat_map(|row| {
            row.cells.iter().map(move |cell| (cell.x, row.y, cell.undead))
        })
    }

    /// Upsert: inserts `(x, y)` preserving both sort orders; if the
    /// coordinate is already present, overwrites its undead flag.
    pub fn add_cell(&mut self, x: i32, y: i32, undead: bool) {
        match self.row_index(y) {
            Ok(i) => {
                let row = &mut self.rows[i];
                match row.find(x) {
                    Ok(j) => row.cells[j].undead = undead,
                    Err(j) => row.cells.insert(j, Cell { x, undead }),
                }
            }
            Err(i) => self.rows.insert(
                i,
                Row {
                    y,
                    cells: vec![Cell { x, undead }],
                },
            ),
        }
    }

    /// No-op when `(x, y)` is not present. Drops the row once it empties.
    pub fn remove_cell(&mut self, x: i32, y: i32) {
        if let Ok(i) = self.row_index(y) {
            let row = &mut self.rows[i];
            if let Ok(j) = row.find(x) {
                row.cells.remove(j);
                if row.cells.is_empty() {
                    self.rows.remove(i);
                }
            }
        }
    }

    /// Toggle driven by direct user edits: occupied cells die, empty cells
    /// come up alive or undead per `place_undead`. Returns the new visual
    /// state so the caller can repaint a single cell.
    pub fn switch_cell(&mut self, x: i32, y: i32, place_undead: bool) -> CellState {
        if self.is_occupied(x, y) {
            self.remove_cell(x, y);
            CellState::Dead
        } else {
            self.add_cell(x, y, place_undead);
            if place_undead {
                CellState::Undead
            } else {
                CellState::Alive
            }
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Checks both sort invariants and that no empty row is retained.
    pub fn validate(&self) -> Result<(), LifeError> {
        for pair in self.rows.windows(2) {
            if pair[0].y >= pair[1].y {
                return Err(LifeError::InvariantViolation(
                    "rows must be strictly ascending by y",
                ));
            }
        }
        for row in &self.rows {
            if row.cells.is_empty() {
                return Err(LifeError::InvariantViolation("empty row retained"));
            }
            for pair in row.cells.windows(2) {
                if pair[0].x >= pair[1].x {
                    return Err(LifeError::InvariantViolation(
                        "cells must be strictly ascending by x",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Advances one generation.
    ///
    /// Undead cells are carried forward unchanged; ordinary-alive cells with
    /// at least one undead neighbor become undead; the rest follow the
    /// classic Conway rule on their alive-or-undead neighbor count. A dead
    /// cell tallied by exactly 3 occupied neighbors is born ordinary-alive.
    ///
    /// The replacement is atomic: on a broken sort invariant the call fails
    /// with `InvariantViolation` and the previous state stays visible.
    pub fn next_generation(&mut self) -> Result<Generation, LifeError> {
        self.validate()?;

        let mut next = LifeGrid::new();
        let mut changes = Vec::new();
        let mut alive: u32 = 0;
        let mut undead: u32 = 0;
        // Dead cells keyed by (y, x), each counting its occupied neighbors
        // (0..=8). Keeps birth emission sorted in scan order.
        let mut birth_tally: BTreeMap<(i32, i32), u8> = BTreeMap::new();

        for (i, row) in self.rows.iter().enumerate() {
            let above = self.adjacent_row(i, -1);
            let below = self.adjacent_row(i, 1);

            // Cells are processed left to right, so these cursors into the
            // adjacent rows only ever move right within one row scan.
            let mut above_cursor = 0usize;
            let mut below_cursor = 0usize;

            for (j, cell) in row.cells.iter().enumerate() {
                let x = cell.x;
                let mut living = 0u8;
                let mut infectious = 0u8;
                let mut occupied = 0u8;

                if let Some(above) = above {
                    scan_adjacent(
                        &above.cells,
                        &mut above_cursor,
                        x,
                        0,
                        &mut living,
                        &mut infectious,
                        &mut occupied,
                    );
                }
                if j > 0 && row.cells[j - 1].x == x - 1 {
                    occupied |= 1 << 3;
                    tally_neighbor(row.cells[j - 1].undead, &mut living, &mut infectious);
                }
                if let Some(right) = row.cells.get(j + 1)
                    && right.x == x + 1
                {
                    occupied |= 1 << 4;
                    tally_neighbor(right.undead, &mut living, &mut infectious);
                }
                if let Some(below) = below {
                    scan_adjacent(
                        &below.cells,
                        &mut below_cursor,
                        x,
                        5,
                        &mut living,
                        &mut infectious,
                        &mut occupied,
                    );
                }

                // Every dead neighbor of every processed cell feeds the
                // birth tally, undead cells included.
                for (idx, (dx, dy)) in NEIGHBORHOOD.iter().enumerate() {
                    if occupied & (1 << idx) == 0 {
                        *birth_tally.entry((row.y + dy, x + dx)).or_insert(0) += 1;
                    }
                }

                if cell.undead || infectious > 0 {
                    next.add_cell(x, row.y, true);
                    changes.push(CellChange {
                        x,
                        y: row.y,
                        state: CellState::Undead,
                    });
                    undead += 1;
                } else if living + infectious == 2 || living + infectious == 3 {
                    next.add_cell(x, row.y, false);
                    changes.push(CellChange {
                        x,
                        y: row.y,
                        state: CellState::Alive,
                    });
                    alive += 1;
                } else {
                    changes.push(CellChange {
                        x,
                        y: row.y,
                        state: CellState::Dead,
                    });
                }
            }
        }

        // Births never come up undead, whatever the 3 contributors were.
        for (&(y, x), &count) in &birth_tally {
            if count == 3 {
                next.add_cell(x, y, false);
                changes.push(CellChange {
                    x,
                    y,
                    state: CellState::Alive,
                });
                alive += 1;
            }
        }

        self.rows = next.rows;
        Ok(Generation {
            alive,
            undead,
            changes,
        })
    }

    fn row_index(&self, y: i32) -> Result<usize, usize> {
        self.rows.binary_search_by_key(&y, |row| row.y)
    }

    /// The row at `y ± 1` relative to row index `i`, if it exists. Row order
    /// guarantees it can only sit at the adjacent vector index.
    fn adjacent_row(&self, i: usize, delta_y: i32) -> Option<&Row> {
        let idx = if delta_y < 0 { i.checked_sub(1)? } else { i + 1 };
        let row = self.rows.get(idx)?;
        (row.y == self.rows[i].y + delta_y).then_some(row)
    }

    #[cfg(test)]
    fn set_rows_for_test(&mut self, rows: Vec<(i32, Vec<(i32, bool)>)>) {
        self.rows = rows
            .into_iter()
            .map(|(y, cells)| Row {
                y,
                cells: cells
                    .into_iter()
                    .map(|(x, undead)| Cell { x, undead })
                    .collect(),
            })
            .collect();
    }
}

impl Row {
    fn find(&self, x: i32) -> Result<usize, usize> {
        self.cells.binary_search_by_key(&x, |cell| cell.x)
    }
}

/// Scans an adjacent row for neighbors of column `x`, recording occupancy in
/// `occupied` starting at bit `mask_base`. `cursor` is the monotone index of
/// the first cell at or beyond `x - 1`.
fn scan_adjacent(
    cells: &[Cell],
    cursor: &mut usize,
    x: i32,
    mask_base: u8,
    living: &mut u8,
    infectious: &mut u8,
    occupied: &mut u8,
) {
    while *cursor < cells.len() && cells[*cursor].x < x - 1 {
        *cursor += 1;
    }
    for cell in &cells[*cursor..] {
        if cell.x > x + 1 {
            break;
        }
        let offset = (cell.x - (x - 1)) as u8;
        *occupied |= 1 << (mask_base + offset);
        tally_neighbor(cell.undead, living, infectious);
    }
}

fn tally_neighbor(undead: bool, living: &mut u8, infectious: &mut u8) {
    if undead {
        *infectious += 1;
    } else {
        *living += 1;
    }
}
