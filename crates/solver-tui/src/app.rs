use crate::store::BoardStore;
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use solver_core::{Board, BoardView, SolveSession, SolveStep, Solver};
use std::time::{Duration, Instant};

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Currently open overlay menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    None,
    Save,
}

/// Options shown in the save menu
pub const SAVE_MENU_ITEMS: [&str; 3] = ["Save board", "Reload board", "Cancel"];

/// How many ticks a transient message stays on screen
const MESSAGE_TICKS: u32 = 40;

/// The main application state
pub struct App {
    /// The live board
    pub board: Board,
    /// Currently selected cell position
    pub cursor: (usize, usize),
    /// Color theme
    pub theme: Theme,
    /// Whether the game is stopped (no running timer)
    pub game_over: bool,
    /// Whether cell-edit affordances are active
    pub interactive: bool,
    /// Message to display
    pub message: Option<String>,
    /// Current menu state
    pub menu: MenuState,
    /// Selected menu item
    pub menu_selection: usize,
    /// Cell the solver touched last, for the step highlight
    pub last_change: Option<(usize, usize)>,
    message_timer: u32,
    session: Option<SolveSession>,
    store: BoardStore,
    solver: Solver,
    started_at: Option<Instant>,
    frozen: Duration,
    step_delay: Duration,
    high_contrast: bool,
}

impl App {
    pub fn new(store: BoardStore, solver: Solver, step_delay: Duration) -> Self {
        let board = Board::from_values(&store.load());
        Self {
            board,
            cursor: (4, 4),
            theme: Theme::dark(),
            game_over: true,
            interactive: false,
            message: None,
            menu: MenuState::None,
            menu_selection: 0,
            last_change: None,
            message_timer: 0,
            session: None,
            store,
            solver,
            started_at: None,
            frozen: Duration::ZERO,
            step_delay,
            high_contrast: false,
        }
    }

    /// Whether an animated solve is in progress
    pub fn is_solving(&self) -> bool {
        self.session.is_some()
    }

    /// Elapsed play time, frozen once the game is stopped
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(start) => self.frozen + start.elapsed(),
            None => self.frozen,
        }
    }

    /// Elapsed time formatted as HH:MM:SS
    pub fn elapsed_string(&self) -> String {
        let secs = self.elapsed().as_secs();
        format!(
            "{:02}:{:02}:{:02}",
            secs / 3600 % 24,
            secs / 60 % 60,
            secs % 60
        )
    }

    /// Tick rate for the host loop; solver steps are paced one per tick
    pub fn get_tick_rate(&self) -> Duration {
        if self.is_solving() {
            self.step_delay
        } else {
            Duration::from_millis(250)
        }
    }

    /// Advance animations: message decay and one solver step
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
        self.step_solver();
    }

    fn step_solver(&mut self) {
        let step = match self.session.as_mut() {
            Some(session) => session.step(&mut self.board),
            None => return,
        };

        match step {
            SolveStep::Placed(change) | SolveStep::Undone(change) => {
                self.on_cell_changed(change.row, change.col);
            }
            SolveStep::Solved => {
                self.session = None;
                self.last_change = None;
                let time = self.elapsed_string();
                self.stop_game();
                self.set_message(format!("Solved in {}", time));
            }
            SolveStep::Unsolvable => {
                self.session = None;
                self.last_change = None;
                self.set_interactive(!self.game_over);
                self.set_message("No solution exists for this board");
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if self.menu != MenuState::None {
            self.handle_menu_key(key.code);
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
            KeyCode::Char('s') => self.toggle_game(),
            KeyCode::Char('a') => self.start_solve(),
            KeyCode::Char('w') => self.open_save_menu(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char(c @ '1'..='9') => self.enter_digit(c as u8 - b'0'),
            KeyCode::Char('0') | KeyCode::Backspace | KeyCode::Delete => self.clear_cell(),
            _ => {}
        }
        AppAction::Continue
    }

    fn move_cursor(&mut self, drow: isize, dcol: isize) {
        let row = (self.cursor.0 as isize + drow).clamp(0, 8) as usize;
        let col = (self.cursor.1 as isize + dcol).clamp(0, 8) as usize;
        self.cursor = (row, col);
    }

    fn toggle_theme(&mut self) {
        self.high_contrast = !self.high_contrast;
        self.theme = if self.high_contrast {
            Theme::high_contrast()
        } else {
            Theme::dark()
        };
    }

    fn toggle_game(&mut self) {
        if self.is_solving() {
            // Dropping the session aborts the search; the board keeps
            // whatever trial digits were in place at that moment
            self.session = None;
            self.last_change = None;
            self.set_interactive(true);
            self.set_message("Solve cancelled");
        } else if self.game_over {
            self.start_game();
        } else {
            self.stop_game();
            self.set_message(format!("Stopped at {}", self.elapsed_string()));
        }
    }

    /// Rebuild the board from the store and start the timer
    fn start_game(&mut self) {
        self.board = Board::from_values(&self.store.load());
        self.session = None;
        self.last_change = None;
        self.game_over = false;
        self.frozen = Duration::ZERO;
        self.started_at = Some(Instant::now());
        self.set_interactive(true);
        self.set_message("Game started");
    }

    fn stop_game(&mut self) {
        if let Some(start) = self.started_at.take() {
            self.frozen += start.elapsed();
        }
        self.game_over = true;
        self.session = None;
        self.set_interactive(false);
    }

    fn start_solve(&mut self) {
        if self.is_solving() {
            return;
        }
        if self.game_over {
            self.set_message("Press s to start a game first");
            return;
        }
        // The board belongs to the engine until the search terminates
        self.session = Some(self.solver.session(&self.board));
        self.set_interactive(false);
        self.set_message("Solving...");
    }

    fn enter_digit(&mut self, digit: u8) {
        if self.is_solving() {
            self.set_message("Solver is running");
            return;
        }
        if self.game_over {
            self.set_message("Press s to start a game first");
            return;
        }

        let (row, col) = self.cursor;
        if !self.board.cell(row, col).is_editable() {
            self.set_message("That cell is a given clue");
            return;
        }

        // Clear first so the legality scan does not see the cell's own
        // current value
        let previous = self.board.get(row, col);
        self.board.set(row, col, 0);
        if self.board.is_valid_placement(row, col, digit) {
            self.board.set(row, col, digit);
            self.on_cell_changed(row, col);
            if self.board.is_full() {
                let time = self.elapsed_string();
                self.stop_game();
                self.set_message(format!("Board complete in {}", time));
            }
        } else {
            self.board.set(row, col, previous);
            self.set_message(format!("{} can't go at row {}, column {}", digit, row + 1, col + 1));
        }
    }

    fn clear_cell(&mut self) {
        if self.is_solving() {
            self.set_message("Solver is running");
            return;
        }
        if self.game_over {
            self.set_message("Press s to start a game first");
            return;
        }

        let (row, col) = self.cursor;
        if !self.board.cell(row, col).is_editable() {
            self.set_message("That cell is a given clue");
            return;
        }
        if self.board.get(row, col) == 0 {
            self.set_message("Nothing to clear");
            return;
        }
        self.board.set(row, col, 0);
        self.on_cell_changed(row, col);
    }

    fn open_save_menu(&mut self) {
        if self.is_solving() {
            self.set_message("Solver is running");
            return;
        }
        self.menu = MenuState::Save;
        self.menu_selection = 0;
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_selection = self.menu_selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.menu_selection + 1 < SAVE_MENU_ITEMS.len() {
                    self.menu_selection += 1;
                }
            }
            KeyCode::Enter => {
                let choice = self.menu_selection;
                self.menu = MenuState::None;
                self.run_menu_choice(choice);
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('w') => {
                self.menu = MenuState::None;
            }
            _ => {}
        }
    }

    fn run_menu_choice(&mut self, choice: usize) {
        match choice {
            0 => {
                let snapshot = self.board.values().map(i16::from);
                match self.store.save(&snapshot) {
                    Ok(()) => self.set_message("Board saved"),
                    Err(e) => {
                        log::warn!("save failed: {}", e);
                        self.set_message(format!("Save failed: {}", e));
                    }
                }
            }
            1 => {
                self.board = Board::from_values(&self.store.load());
                self.last_change = None;
                self.set_message("Board reloaded");
            }
            _ => {}
        }
    }

    fn set_message<S: Into<String>>(&mut self, msg: S) {
        self.message = Some(msg.into());
        self.message_timer = MESSAGE_TICKS;
    }
}

impl BoardView for App {
    fn on_cell_changed(&mut self, row: usize, col: usize) {
        self.last_change = Some((row, col));
    }

    fn set_interactive(&mut self, enabled: bool) {
        self.interactive = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_path() -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("sudoku_app_test_{}_{}.json", std::process::id(), n))
    }

    fn test_app() -> App {
        App::new(
            BoardStore::with_path(temp_path()),
            Solver::with_seed(1),
            Duration::from_millis(0),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn test_starts_stopped_and_non_interactive() {
        let app = test_app();
        assert!(app.game_over);
        assert!(!app.interactive);
        assert!(!app.is_solving());
        assert_eq!(app.elapsed_string(), "00:00:00");
    }

    #[test]
    fn test_cursor_stays_on_the_grid() {
        let mut app = test_app();
        for _ in 0..12 {
            app.handle_key(key(KeyCode::Up));
            app.handle_key(key(KeyCode::Left));
        }
        assert_eq!(app.cursor, (0, 0));
        for _ in 0..12 {
            app.handle_key(key(KeyCode::Char('j')));
            app.handle_key(key(KeyCode::Char('l')));
        }
        assert_eq!(app.cursor, (8, 8));
    }

    #[test]
    fn test_digit_rejected_before_start() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('5')));
        assert_eq!(app.board.get(4, 4), 0);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_digit_entry_and_clear() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('s')));
        assert!(!app.game_over);

        app.handle_key(key(KeyCode::Char('5')));
        assert_eq!(app.board.get(4, 4), 5);
        assert_eq!(app.last_change, Some((4, 4)));

        app.handle_key(key(KeyCode::Char('0')));
        assert_eq!(app.board.get(4, 4), 0);
    }

    #[test]
    fn test_conflicting_digit_rejected() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('s')));

        app.handle_key(key(KeyCode::Char('5')));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Char('5')));

        assert_eq!(app.board.get(4, 5), 0);
        assert!(app.message.as_deref().unwrap().contains("can't go"));
    }

    #[test]
    fn test_clue_cells_are_locked() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('s')));

        let mut values = [0u8; solver_core::CELL_COUNT];
        values[40] = 7; // cursor starts at (4, 4)
        app.board = Board::from_values(&values);

        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.board.get(4, 4), 7);
        assert_eq!(app.message.as_deref(), Some("That cell is a given clue"));
    }

    #[test]
    fn test_replacing_own_digit_is_allowed() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('s')));

        app.handle_key(key(KeyCode::Char('5')));
        app.handle_key(key(KeyCode::Char('6')));
        assert_eq!(app.board.get(4, 4), 6);
    }

    #[test]
    fn test_solve_runs_to_completion_over_ticks() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char('a')));
        assert!(app.is_solving());
        assert!(!app.interactive);

        for _ in 0..5_000_000 {
            app.tick();
            if !app.is_solving() {
                break;
            }
        }

        assert!(!app.is_solving());
        assert!(app.board.is_full());
        assert!(app.board.is_consistent());
        assert!(app.game_over);
    }

    #[test]
    fn test_edits_rejected_while_solving() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char('a')));

        app.handle_key(key(KeyCode::Char('5')));
        assert_eq!(app.message.as_deref(), Some("Solver is running"));
        assert!(app.is_solving());
    }

    #[test]
    fn test_stop_key_cancels_a_running_solve() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('s')));
        assert!(!app.is_solving());
        assert!(app.interactive);
    }

    #[test]
    fn test_save_menu_round_trip() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char('9')));
        assert_eq!(app.board.get(4, 4), 9);

        // Save through the menu
        app.handle_key(key(KeyCode::Char('w')));
        assert_eq!(app.menu, MenuState::Save);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.menu, MenuState::None);
        assert_eq!(app.message.as_deref(), Some("Board saved"));

        // Clear, then reload from the store
        app.handle_key(key(KeyCode::Char('0')));
        assert_eq!(app.board.get(4, 4), 0);
        app.handle_key(key(KeyCode::Char('w')));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.board.get(4, 4), 9);

        // A reloaded value was a clue in the stored board, so it is
        // locked in the rebuilt one
        assert!(!app.board.cell(4, 4).is_editable());
    }

    #[test]
    fn test_unsolvable_board_reports_and_unlocks() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('s')));

        let mut values = [0u8; solver_core::CELL_COUNT];
        values[0] = 5;
        values[8] = 5; // duplicate in row 0
        app.board = Board::from_values(&values);

        app.handle_key(key(KeyCode::Char('a')));
        app.tick();
        assert!(!app.is_solving());
        assert_eq!(
            app.message.as_deref(),
            Some("No solution exists for this board")
        );
        assert!(app.interactive);
    }
}
