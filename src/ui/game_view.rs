use crate::game::{Cell, GameOutcome, Player, Position, Snapshot, COLS, ROWS};
use crate::stats::GameStats;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Everything the game screen draws, gathered by the app each frame.
pub struct GameView<'a> {
    pub snapshot: &'a Snapshot,
    pub falling: Option<(Position, Player)>,
    pub thinking: bool,
    pub selected_column: usize,
    pub message: Option<&'a str>,
    pub stats: GameStats,
    pub sound_on: bool,
}

fn player_color(player: Player) -> Color {
    match player {
        Player::Human => Color::Red,
        Player::Ai => Color::Yellow,
    }
}

/// Header line and color for the current state.
pub fn status_line(view: &GameView<'_>) -> (String, Color) {
    match view.snapshot.outcome {
        GameOutcome::Win(player) => (format!("{} won!", player.name()), player_color(player)),
        GameOutcome::Draw => ("It's a draw!".to_string(), Color::White),
        GameOutcome::InProgress if view.thinking => (
            "Claude is thinking...".to_string(),
            player_color(Player::Ai),
        ),
        GameOutcome::InProgress => match view.snapshot.turn {
            Player::Human => ("Your turn".to_string(), player_color(Player::Human)),
            Player::Ai => ("Claude's turn".to_string(), player_color(Player::Ai)),
        },
    }
}

pub fn render(frame: &mut Frame, view: &GameView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Stats
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_board(frame, view, chunks[1]);
    render_stats(frame, view.stats, chunks[2]);
    render_message(frame, view.message, chunks[3]);
    render_controls(frame, view.sound_on, chunks[4]);
}

fn render_header(frame: &mut Frame, view: &GameView<'_>, area: Rect) {
    let (status, color) = status_line(view);

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, view: &GameView<'_>, area: Rect) {
    let snapshot = view.snapshot;
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        let label = format!(" {} ", col + 1);
        if col == view.selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔══════════════════════╗"));

    // Top row first; row 0 is the bottom of the board
    for row in (0..ROWS).rev() {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..COLS {
            let falling = view
                .falling
                .filter(|(pos, _)| *pos == Position::new(col, row))
                .map(|(_, player)| player);
            let winning = snapshot
                .winning_line
                .is_some_and(|line| line.contains(col, row));

            let span = match (falling, snapshot.board.at(col, row)) {
                (Some(player), _) => {
                    Span::styled(" ● ", Style::default().fg(player_color(player)))
                }
                (None, Cell::Empty) => Span::styled(" . ", Style::default().fg(Color::DarkGray)),
                (None, cell) => {
                    let color = cell.owner().map_or(Color::DarkGray, player_color);
                    let mut style = Style::default().fg(color);
                    if winning {
                        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                    }
                    Span::styled(" ● ", style)
                }
            };
            row_spans.push(span);
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from("  ╚══════════════════════╝"));

    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        if col == view.selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_stats(frame: &mut Frame, stats: GameStats, area: Rect) {
    let line = Line::from(vec![
        Span::styled("Player Wins ", Style::default().fg(Color::Red)),
        Span::raw(format!("{}   ", stats.player_wins)),
        Span::styled("Computer Wins ", Style::default().fg(Color::Yellow)),
        Span::raw(format!("{}   ", stats.ai_wins)),
        Span::styled("Games Played ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(stats.games_played.to_string()),
    ]);

    let widget = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Statistics"));

    frame.render_widget(widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, sound_on: bool, area: Rect) {
    let sound = if sound_on { "on" } else { "off" };
    let line = Line::from(format!(
        "←/→: Move  |  Enter/1-7: Drop  |  R: New game  |  S: Sound ({sound})  |  X: Reset stats  |  Q: Quit"
    ));

    let controls = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
