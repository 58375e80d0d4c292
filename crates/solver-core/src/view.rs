/// Receiver for board-change notifications
///
/// The engine calls `on_cell_changed` once per mutation and names only
/// the position; the view re-reads the cell's current value from the
/// board it renders. `set_interactive` mirrors whether cell-edit
/// affordances should be active (switched off while the engine owns the
/// board).
pub trait BoardView {
    fn on_cell_changed(&mut self, row: usize, col: usize);

    fn set_interactive(&mut self, enabled: bool);
}

/// View that ignores every notification, for headless solves
pub struct NullView;

impl BoardView for NullView {
    fn on_cell_changed(&mut self, _row: usize, _col: usize) {}

    fn set_interactive(&mut self, _enabled: bool) {}
}

/// View that records every notification, for tests and deferred replay
#[derive(Debug)]
pub struct RecordingView {
    /// Positions in notification order
    pub changes: Vec<(usize, usize)>,
    /// Last interactivity state pushed by the engine
    pub interactive: bool,
}

impl RecordingView {
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
            interactive: true,
        }
    }
}

impl Default for RecordingView {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardView for RecordingView {
    fn on_cell_changed(&mut self, row: usize, col: usize) {
        self.changes.push((row, col));
    }

    fn set_interactive(&mut self, enabled: bool) {
        self.interactive = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_view_keeps_order() {
        let mut view = RecordingView::new();
        view.on_cell_changed(0, 2);
        view.on_cell_changed(4, 4);
        view.on_cell_changed(0, 2);
        assert_eq!(view.changes, vec![(0, 2), (4, 4), (0, 2)]);

        view.set_interactive(false);
        assert!(!view.interactive);
    }
}
