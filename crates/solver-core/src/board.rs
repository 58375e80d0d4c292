use serde::{Deserialize, Serialize};

/// Side length of the grid
pub const SIZE: usize = 9;
/// Total number of cells on a board
pub const CELL_COUNT: usize = SIZE * SIZE;

/// A single cell of the 9x9 grid
///
/// `editable` is derived once at construction: a cell that starts empty
/// belongs to the player, a cell that starts filled is a given clue and
/// stays locked. The flag is never recomputed, even when the value
/// changes later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    row: usize,
    col: usize,
    value: u8,
    editable: bool,
}

impl Cell {
    /// Create a cell at a fixed position; 0 means empty
    pub fn new(row: usize, col: usize, value: u8) -> Self {
        Self {
            row,
            col,
            value,
            editable: value == 0,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Whether this cell may be edited (false for given clues)
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_empty(&self) -> bool {
        self.value == 0
    }
}

/// The 9x9 puzzle board, sole owner of its 81 cells
///
/// Positions are `(row, col)` with both in `0..9`. Out-of-range access
/// is a programming error and panics via slice indexing; no puzzle
/// validity is enforced at construction (a loaded board may contain
/// duplicate clues).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    /// Build a board from 81 values in row-major order
    pub fn from_values(values: &[u8; CELL_COUNT]) -> Self {
        let cells = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Cell::new(i / SIZE, i % SIZE, value))
            .collect();
        Self { cells }
    }

    /// A board with every cell empty (and therefore editable)
    pub fn empty() -> Self {
        Self::from_values(&[0; CELL_COUNT])
    }

    /// Parse a board from an 81-character string
    ///
    /// Digits 1-9 are clues, '0' and '.' are empty cells; whitespace is
    /// ignored. Returns `None` for any other character or a wrong count.
    pub fn from_string(s: &str) -> Option<Self> {
        let mut values = [0u8; CELL_COUNT];
        let mut count = 0;
        for c in s.chars() {
            if c.is_whitespace() {
                continue;
            }
            if count >= CELL_COUNT {
                return None;
            }
            values[count] = match c {
                '.' | '0' => 0,
                '1'..='9' => c as u8 - b'0',
                _ => return None,
            };
            count += 1;
        }
        if count == CELL_COUNT {
            Some(Self::from_values(&values))
        } else {
            None
        }
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * SIZE + col].value
    }

    /// Set a cell's value directly; the editable flag is left untouched
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row * SIZE + col].value = value;
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[row * SIZE + col]
    }

    /// Row-major snapshot of all 81 values
    pub fn values(&self) -> [u8; CELL_COUNT] {
        std::array::from_fn(|i| self.cells[i].value)
    }

    /// Positions of all currently empty cells
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .filter(|c| c.is_empty())
            .map(|c| (c.row, c.col))
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    pub fn given_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_editable()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Whether `num` (1-9) may be placed at `(row, col)`
    ///
    /// False if `num` already appears anywhere in the row, the column,
    /// or the 3x3 box containing the position. The scan does not exclude
    /// the cell under test itself; callers must leave that cell empty
    /// before asking (0 never equals 1-9, so empty cells are safe).
    pub fn is_valid_placement(&self, row: usize, col: usize, num: u8) -> bool {
        for i in 0..SIZE {
            if self.get(row, i) == num || self.get(i, col) == num {
                return false;
            }
        }

        let box_row = row / 3 * 3;
        let box_col = col / 3 * 3;
        for r in box_row..box_row + 3 {
            for c in box_col..box_col + 3 {
                if self.get(r, c) == num {
                    return false;
                }
            }
        }

        true
    }

    /// Find a filled cell whose digit repeats in its row, column or box
    ///
    /// Used as a pre-search consistency check: a board that fails here
    /// can never be solved, even when it has no empty cells left.
    pub fn find_duplicate_clue(&self) -> Option<(usize, usize)> {
        for cell in &self.cells {
            if cell.is_empty() {
                continue;
            }
            let (row, col, value) = (cell.row, cell.col, cell.value);

            for i in 0..SIZE {
                if i != col && self.get(row, i) == value {
                    return Some((row, col));
                }
                if i != row && self.get(i, col) == value {
                    return Some((row, col));
                }
            }

            let box_row = row / 3 * 3;
            let box_col = col / 3 * 3;
            for r in box_row..box_row + 3 {
                for c in box_col..box_col + 3 {
                    if (r != row || c != col) && self.get(r, c) == value {
                        return Some((row, col));
                    }
                }
            }
        }
        None
    }

    /// True when no digit repeats within any row, column or box
    pub fn is_consistent(&self) -> bool {
        self.find_duplicate_clue().is_none()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..SIZE {
            if row > 0 && row % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for col in 0..SIZE {
                if col > 0 && col % 3 == 0 {
                    write!(f, "| ")?;
                }
                match self.get(row, col) {
                    0 => write!(f, ". ")?,
                    v => write!(f, "{} ", v)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
