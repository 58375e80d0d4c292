//! Core Sudoku engine: the 9x9 board model and a randomized,
//! iterative backtracking solver that animates one move at a time.
//!
//! The solver picks an empty cell uniformly at random, tries digits in
//! increasing order, and backtracks through an explicit frame stack
//! instead of call-stack recursion, so a host can suspend the search
//! between steps. Every trial placement and every reversal produces
//! exactly one [`BoardView`] notification, which is what lets a UI show
//! the solve cell by cell rather than presenting the finished grid.

pub mod board;
pub mod solver;
pub mod view;

pub use board::{Board, Cell, CELL_COUNT, SIZE};
pub use solver::{CancelToken, CellChange, SolveOutcome, SolveSession, SolveStep, Solver};
pub use view::{BoardView, NullView, RecordingView};
