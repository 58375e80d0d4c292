//! File-backed persistence for board snapshots.
//!
//! The board is stored as a flat list of `(row, col, value)` entries,
//! one per cell, in a JSON file under the platform data directory.
//! Loading is deliberately forgiving: a missing file yields an empty
//! board, and individual out-of-range entries are logged and skipped
//! rather than failing the load.

use serde::{Deserialize, Serialize};
use solver_core::{CELL_COUNT, SIZE};
use std::fs;
use std::path::PathBuf;

/// One persisted cell. Fields are signed so that malformed files still
/// parse entry-by-entry and can be range-checked (and skipped) here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct StoredCell {
    row: i32,
    col: i32,
    value: i32,
}

/// Errors from writing a board snapshot
#[derive(Debug, Clone)]
pub enum StoreError {
    Io(String),
    Format(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Format(e) => write!(f, "Format error: {}", e),
        }
    }
}

/// File-backed board store
pub struct BoardStore {
    path: PathBuf,
}

impl BoardStore {
    /// Store at the default location in the platform data directory
    pub fn new() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sudoku_solver_board.json");
        Self { path }
    }

    /// Store at an explicit path (CLI override, tests)
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load 81 values in row-major order
    ///
    /// Cells absent from the file default to 0. Entries with an
    /// out-of-range position or value are logged and skipped; an
    /// unreadable or malformed file yields an empty board. Never fatal.
    pub fn load(&self) -> [u8; CELL_COUNT] {
        let mut values = [0u8; CELL_COUNT];

        let entries: Vec<StoredCell> = match fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("board file {} is not valid JSON: {}", self.path.display(), e);
                Vec::new()
            }),
            Err(_) => Vec::new(),
        };

        for entry in entries {
            let in_range = (0..SIZE as i32).contains(&entry.row)
                && (0..SIZE as i32).contains(&entry.col)
                && (0..=9).contains(&entry.value);
            if in_range {
                values[entry.row as usize * SIZE + entry.col as usize] = entry.value as u8;
            } else {
                log::warn!(
                    "skipping invalid board entry: row {}, col {}, value {}",
                    entry.row,
                    entry.col,
                    entry.value
                );
            }
        }

        values
    }

    /// Save 81 values in row-major order
    ///
    /// Only non-negative values are written; a negative value marks a
    /// cell that must not be persisted, and it reads back as 0.
    pub fn save(&self, values: &[i16; CELL_COUNT]) -> Result<(), StoreError> {
        let entries: Vec<StoredCell> = values
            .iter()
            .enumerate()
            .filter(|(_, &value)| value > -1)
            .map(|(i, &value)| StoredCell {
                row: (i / SIZE) as i32,
                col: (i % SIZE) as i32,
                value: value as i32,
            })
            .collect();

        let json =
            serde_json::to_string_pretty(&entries).map_err(|e| StoreError::Format(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StoreError::Io(e.to_string()))?;

        log::info!("saved {} cells to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> BoardStore {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "sudoku_store_test_{}_{}.json",
            std::process::id(),
            n
        ));
        BoardStore::with_path(path)
    }

    #[test]
    fn test_missing_file_loads_empty_board() {
        let store = temp_store();
        assert_eq!(store.load(), [0u8; CELL_COUNT]);
    }

    #[test]
    fn test_round_trip() {
        let store = temp_store();
        let mut values = [0i16; CELL_COUNT];
        values[0] = 5;
        values[10] = 9;
        values[80] = 1;
        store.save(&values).unwrap();

        let loaded = store.load();
        assert_eq!(loaded[0], 5);
        assert_eq!(loaded[10], 9);
        assert_eq!(loaded[80], 1);
        assert_eq!(loaded.iter().filter(|&&v| v != 0).count(), 3);

        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_negative_values_are_not_persisted() {
        let store = temp_store();
        let mut values = [0i16; CELL_COUNT];
        values[4] = 7;
        values[40] = -1;
        store.save(&values).unwrap();

        let loaded = store.load();
        assert_eq!(loaded[4], 7);
        assert_eq!(loaded[40], 0);

        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_out_of_range_entries_are_skipped() {
        let store = temp_store();
        let json = r#"[
            {"row": 0, "col": 0, "value": 3},
            {"row": 11, "col": 0, "value": 5},
            {"row": -1, "col": 2, "value": 5},
            {"row": 2, "col": 2, "value": 42}
        ]"#;
        fs::write(store.path(), json).unwrap();

        let loaded = store.load();
        assert_eq!(loaded[0], 3);
        assert_eq!(loaded.iter().filter(|&&v| v != 0).count(), 1);

        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_malformed_file_loads_empty_board() {
        let store = temp_store();
        fs::write(store.path(), "not json at all").unwrap();
        assert_eq!(store.load(), [0u8; CELL_COUNT]);
        let _ = fs::remove_file(store.path());
    }
}
