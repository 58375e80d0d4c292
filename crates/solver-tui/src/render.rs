use crate::app::{App, MenuState, SAVE_MENU_ITEMS};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;

pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, Clear(ClearType::All))?;

    // Grid is 37 chars wide x 19 tall; center it when there is room
    let grid_width: u16 = 37;
    let grid_height: u16 = 19;
    let start_x = if term_width > grid_width {
        (term_width - grid_width) / 2
    } else {
        0
    };
    let start_y: u16 = if term_height > grid_height + 8 { 2 } else { 1 };

    render_title(stdout, app, start_x, start_y.saturating_sub(2))?;
    render_grid(stdout, app, start_x, start_y)?;
    render_status(stdout, app, start_x, start_y + grid_height)?;
    render_controls(stdout, app, start_x, start_y + grid_height + 2)?;

    if let Some(msg) = app.message.clone() {
        render_message(stdout, app, &msg, start_x, start_y + grid_height + 4)?;
    }

    if app.menu != MenuState::None {
        render_menu(stdout, app, start_x, start_y + 6)?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_title(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(app.theme.bg),
        SetForegroundColor(app.theme.fg),
        Print("SUDOKU SOLVER")
    )
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.box_border),
        Print("+===+===+===+===+===+===+===+===+===+")
    )?;

    for row in 0..9 {
        let cell_y = y + 1 + row as u16 * 2;
        execute!(stdout, MoveTo(x, cell_y))?;

        for col in 0..9 {
            let border_color = if col % 3 == 0 {
                theme.box_border
            } else {
                theme.border
            };
            let border_char = if col % 3 == 0 { "\u{2551}" } else { "\u{2502}" };
            execute!(stdout, SetForegroundColor(border_color), Print(border_char))?;

            render_cell(stdout, app, row, col)?;
        }
        execute!(
            stdout,
            SetForegroundColor(theme.box_border),
            Print("\u{2551}")
        )?;

        let sep_y = cell_y + 1;
        execute!(stdout, MoveTo(x, sep_y))?;
        if (row + 1) % 3 == 0 {
            execute!(
                stdout,
                SetForegroundColor(theme.box_border),
                Print("+===+===+===+===+===+===+===+===+===+")
            )?;
        } else {
            execute!(
                stdout,
                SetForegroundColor(theme.border),
                Print("+---+---+---+---+---+---+---+---+---+")
            )?;
        }
    }

    Ok(())
}

fn render_cell(stdout: &mut io::Stdout, app: &App, row: usize, col: usize) -> io::Result<()> {
    let theme = &app.theme;
    let cell = app.board.cell(row, col);

    let bg = if (row, col) == app.cursor && app.interactive {
        theme.selected_bg
    } else if app.last_change == Some((row, col)) {
        theme.changed_bg
    } else {
        theme.bg
    };

    let fg = if cell.is_editable() {
        theme.filled
    } else {
        theme.given
    };

    let text = match cell.value() {
        0 => " . ".to_string(),
        v => format!(" {} ", v),
    };

    execute!(
        stdout,
        SetBackgroundColor(bg),
        SetForegroundColor(fg),
        Print(text),
        SetBackgroundColor(theme.bg)
    )
}

fn render_status(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let state = if app.is_solving() {
        "Solving"
    } else if app.game_over {
        "Stopped"
    } else {
        "Playing"
    };

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.info),
        Print(format!("Time {}   [{}]", app.elapsed_string(), state))
    )
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("s"),
        SetForegroundColor(theme.info),
        Print(" start/stop  "),
        SetForegroundColor(theme.key),
        Print("a"),
        SetForegroundColor(theme.info),
        Print(" solve  "),
        SetForegroundColor(theme.key),
        Print("w"),
        SetForegroundColor(theme.info),
        Print(" save  "),
        SetForegroundColor(theme.key),
        Print("1-9"),
        SetForegroundColor(theme.info),
        Print(" place  "),
        SetForegroundColor(theme.key),
        Print("0"),
        SetForegroundColor(theme.info),
        Print(" clear  "),
        SetForegroundColor(theme.key),
        Print("q"),
        SetForegroundColor(theme.info),
        Print(" quit")
    )
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    x: u16,
    y: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let color = if msg.contains("Solved") || msg.contains("complete") || msg.contains("saved") {
        theme.success
    } else if msg.contains("can't") || msg.contains("No solution") || msg.contains("failed") {
        theme.error
    } else {
        theme.info
    };

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(color),
        Print(msg)
    )
}

fn render_menu(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let menu_x = x + 8;

    execute!(
        stdout,
        MoveTo(menu_x, y),
        SetForegroundColor(theme.box_border),
        Print("+--------------------+")
    )?;
    for (i, item) in SAVE_MENU_ITEMS.iter().enumerate() {
        let item_y = y + 1 + i as u16;
        let (bg, fg) = if i == app.menu_selection {
            (theme.selected_bg, theme.fg)
        } else {
            (theme.bg, theme.info)
        };
        execute!(
            stdout,
            MoveTo(menu_x, item_y),
            SetForegroundColor(theme.box_border),
            Print("|"),
            SetBackgroundColor(bg),
            SetForegroundColor(fg),
            Print(format!(" {:<18} ", item)),
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.box_border),
            Print("|")
        )?;
    }
    execute!(
        stdout,
        MoveTo(menu_x, y + 1 + SAVE_MENU_ITEMS.len() as u16),
        SetForegroundColor(theme.box_border),
        Print("+--------------------+"),
        SetForegroundColor(Color::Reset)
    )
}
