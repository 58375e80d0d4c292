use crate::board::Board;
use crate::view::BoardView;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Terminal result of a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// Every cell is filled and all constraints hold
    Solved,
    /// The search was exhausted without a solution (also reported for
    /// boards that start out contradictory)
    Unsolvable,
    /// A cancel token fired before the search finished
    Cancelled,
}

/// A single mutation made by the engine: one trial placement or one
/// reversal (`value` 0). Recorded changes can be replayed against a
/// fresh board to reproduce the solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub row: usize,
    pub col: usize,
    pub value: u8,
}

/// Result of advancing the search by exactly one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStep {
    /// A digit was tentatively placed
    Placed(CellChange),
    /// A placement was undone while backtracking
    Undone(CellChange),
    Solved,
    Unsolvable,
}

/// Cooperative abort flag, checked once per solver step
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One resumable choice point: a chosen cell and the next digit to try
/// there. Digits are scanned in increasing order; `next_digit` lets the
/// scan resume where it left off after backtracking.
#[derive(Debug, Clone, Copy)]
struct Frame {
    row: usize,
    col: usize,
    next_digit: u8,
}

/// Resumable backtracking search over one board
///
/// The session holds the search state (an explicit frame stack instead
/// of call-stack recursion) but not the board; the same board must be
/// passed to every `step` call, and nothing else may mutate it between
/// steps. Each step performs exactly one placement or one reversal, so
/// a host loop can pace the animation one change per tick.
pub struct SolveSession {
    stack: Vec<Frame>,
    rng: StdRng,
    descend: bool,
    finished: Option<SolveOutcome>,
}

impl SolveSession {
    /// Start a search over `board`
    ///
    /// A board that already contains a duplicate clue can never be
    /// solved, so it is reported as unsolvable up front rather than
    /// conflated with an exhausted search (or, worse, reported solved
    /// when it happens to have no empty cells).
    pub fn new(board: &Board, rng: StdRng) -> Self {
        let finished = board.find_duplicate_clue().map(|_| SolveOutcome::Unsolvable);
        Self {
            stack: Vec::new(),
            rng,
            descend: true,
            finished,
        }
    }

    /// Advance the search by one step
    ///
    /// Returns `Placed` or `Undone` for each single-cell mutation, and
    /// a terminal `Solved`/`Unsolvable` once the search ends. Terminal
    /// results repeat on further calls.
    pub fn step(&mut self, board: &mut Board) -> SolveStep {
        match self.finished {
            Some(SolveOutcome::Solved) => return SolveStep::Solved,
            Some(_) => return SolveStep::Unsolvable,
            None => {}
        }

        if self.descend {
            let empties = board.empty_cells();
            if empties.is_empty() {
                self.finished = Some(SolveOutcome::Solved);
                return SolveStep::Solved;
            }
            // Uniform random choice among all empty cells, so the fill
            // order differs run to run
            let (row, col) = empties[self.rng.gen_range(0..empties.len())];
            self.stack.push(Frame {
                row,
                col,
                next_digit: 1,
            });
            self.descend = false;
        }

        loop {
            let Some(frame) = self.stack.last_mut() else {
                self.finished = Some(SolveOutcome::Unsolvable);
                return SolveStep::Unsolvable;
            };

            let mut digit = frame.next_digit;
            while digit <= 9 && !board.is_valid_placement(frame.row, frame.col, digit) {
                digit += 1;
            }

            if digit <= 9 {
                frame.next_digit = digit + 1;
                let (row, col) = (frame.row, frame.col);
                board.set(row, col, digit);
                self.descend = true;
                return SolveStep::Placed(CellChange {
                    row,
                    col,
                    value: digit,
                });
            }

            // Dead end: no digit fits this cell. Pop it and undo the
            // placement one level up; the parent resumes its digit scan
            // on the next step.
            self.stack.pop();
            if let Some(parent) = self.stack.last() {
                let (row, col) = (parent.row, parent.col);
                board.set(row, col, 0);
                return SolveStep::Undone(CellChange { row, col, value: 0 });
            }
        }
    }

    /// Whether the search has reached a terminal state
    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }
}

/// Randomized backtracking solver
///
/// By default the cell choice is seeded from entropy; `with_seed` pins
/// the whole search sequence, which tests use to reproduce runs.
pub struct Solver {
    seed: Option<u64>,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Self { seed: None }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Begin a step-by-step search, for callers that pace the animation
    /// themselves
    pub fn session(&self, board: &Board) -> SolveSession {
        SolveSession::new(board, self.rng())
    }

    /// Run the search to completion, notifying `view` after every
    /// single-cell mutation
    ///
    /// The board belongs exclusively to the engine for the duration;
    /// edit affordances are switched off on the view while the search
    /// runs.
    pub fn solve(&self, board: &mut Board, view: &mut dyn BoardView) -> SolveOutcome {
        self.solve_with_cancel(board, view, &CancelToken::new())
    }

    /// Like `solve`, but aborts as soon as `cancel` fires (checked once
    /// per step)
    pub fn solve_with_cancel(
        &self,
        board: &mut Board,
        view: &mut dyn BoardView,
        cancel: &CancelToken,
    ) -> SolveOutcome {
        let mut session = self.session(board);
        view.set_interactive(false);

        let outcome = loop {
            if cancel.is_cancelled() {
                break SolveOutcome::Cancelled;
            }
            match session.step(board) {
                SolveStep::Placed(change) | SolveStep::Undone(change) => {
                    view.on_cell_changed(change.row, change.col);
                }
                SolveStep::Solved => break SolveOutcome::Solved,
                SolveStep::Unsolvable => break SolveOutcome::Unsolvable,
            }
        };

        view.set_interactive(true);
        outcome
    }
}
