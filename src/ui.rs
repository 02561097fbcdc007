#![allow(
    // Board dimensions and cell coordinates always fit in a terminal-sized u16
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use crate::app::App;
use crate::components::Cell;
use crate::systems::{GameState, Scoreboard};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

// Each board cell is 2 characters wide and 1 tall
const CELL_WIDTH: u16 = 2;
const INFO_WIDTH: u16 = 24;

// Fill value N is drawn with PALETTE[N - 1]
pub const PALETTE: [Color; 7] = [
    Color::Rgb(0xE8, 0xE8, 0x57),
    Color::Rgb(0x83, 0xFF, 0x91),
    Color::Rgb(0x00, 0xB6, 0xE8),
    Color::Rgb(0xFF, 0x00, 0xFB),
    Color::Rgb(0xFF, 0x06, 0x00),
    Color::Rgb(0xFA, 0x96, 0x23),
    Color::Rgb(0x04, 0x7F, 0xD6),
];

#[must_use]
pub fn cell_color(value: Cell) -> Option<Color> {
    (value as usize)
        .checked_sub(1)
        .and_then(|index| PALETTE.get(index))
        .copied()
}

pub fn render(f: &mut Frame, app: &App) {
    let (cols, rows) = {
        let state = app.world.resource::<GameState>();
        (state.board.cols() as u16, state.board.rows() as u16)
    };
    let board_width = cols * CELL_WIDTH + 2; // +2 for borders
    let board_height = rows + 2;

    if f.area().width < board_width + INFO_WIDTH || f.area().height < board_height {
        let warning_text = Paragraph::new(format!(
            "Terminal too small!\nNeed {}x{} characters.",
            board_width + INFO_WIDTH,
            board_height
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Arena Blocks"));
        f.render_widget(warning_text, f.area());
        return;
    }

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_width),
            Constraint::Length(INFO_WIDTH),
            Constraint::Fill(1),
        ])
        .split(f.area());

    let board_area = Rect {
        height: board_height,
        ..main_layout[0]
    };
    render_board(f, app, board_area);
    render_info(f, app, main_layout[1]);
}

fn render_board(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Arena Blocks");
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    if app.show_grid {
        for y in inner_area.top()..inner_area.bottom() {
            for x in (inner_area.left()..inner_area.right()).step_by(CELL_WIDTH as usize) {
                if let Some(cell) = f.buffer_mut().cell_mut((x, y)) {
                    cell.set_symbol("·");
                    cell.set_fg(Color::DarkGray);
                }
            }
        }
    }

    for (position, value) in app.get_render_cells() {
        let Some(color) = cell_color(value) else {
            continue;
        };
        if position.x < 0 || position.y < 0 {
            continue;
        }

        let block_x = inner_area.left() + position.x as u16 * CELL_WIDTH;
        let block_y = inner_area.top() + position.y as u16;
        if block_y >= inner_area.bottom() {
            continue;
        }

        for dx in 0..CELL_WIDTH {
            if block_x + dx >= inner_area.right() {
                break;
            }
            if let Some(cell) = f.buffer_mut().cell_mut((block_x + dx, block_y)) {
                cell.set_symbol("█");
                cell.set_fg(color);
                cell.set_bg(Color::Black);
            }
        }
    }
}

fn render_info(f: &mut Frame, app: &App, area: Rect) {
    let scoreboard = app.world.resource::<Scoreboard>();
    let state = app.world.resource::<GameState>();

    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(6), // Score
            Constraint::Min(6),    // Controls
        ])
        .split(area);

    let title = Paragraph::new("SCORE")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, info_layout[0]);

    let stats = format!(
        "Score: {}\nBest: {}\nPieces: {}\nRows: {}\nGames: {}\nDrop: {}ms",
        scoreboard.score,
        scoreboard.best,
        scoreboard.pieces,
        scoreboard.rows,
        scoreboard.games_over,
        state.progression.drop_interval,
    );
    let stats = Paragraph::new(stats)
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: true });
    f.render_widget(stats, info_layout[1]);

    let controls = Paragraph::new(
        "Controls:\n\
        ←/→: Move left/right\n\
        ↓: Drop one row\n\
        ↑/Enter: Rotate\n\
        Q: Quit\n\
        ",
    )
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[2]);
}
