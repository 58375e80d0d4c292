//! Basic example: load a puzzle, solve it headlessly, print the result.

use solver_core::{Board, RecordingView, SolveOutcome, Solver};

fn main() {
    let puzzle =
        "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
    let mut board = Board::from_string(puzzle).expect("valid puzzle string");

    println!("Puzzle:");
    println!("{}", board);
    println!("Given cells: {}", board.given_count());
    println!("Empty cells: {}", board.empty_count());

    let solver = Solver::new();
    let mut view = RecordingView::new();

    match solver.solve(&mut board, &mut view) {
        SolveOutcome::Solved => {
            println!("\nSolved in {} steps:", view.changes.len());
            println!("{}", board);
        }
        SolveOutcome::Unsolvable => println!("\nNo solution exists"),
        SolveOutcome::Cancelled => println!("\nSolve was cancelled"),
    }
}
