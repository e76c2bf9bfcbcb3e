use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::input::KeyLayout;
use crate::session::{Phase, SessionState, GRID_COLUMNS, GRID_SIZE};
use crate::util::{format_score, format_time_left};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// Renders one published snapshot; holds no state of its own
pub struct GameView<'a> {
    pub state: &'a SessionState,
    pub layout: KeyLayout,
    pub ascii: bool,
}

impl<'a> GameView<'a> {
    pub fn new(state: &'a SessionState, layout: KeyLayout, ascii: bool) -> Self {
        Self {
            state,
            layout,
            ascii,
        }
    }

    fn face(&self, idx: usize) -> &'static str {
        let token = self.state.tokens[idx];
        if self.ascii {
            token.ascii()
        } else {
            token.glyph()
        }
    }
}

impl Widget for &GameView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // score / level / time
                Constraint::Length(1), // timer gauge
                Constraint::Length(1), // padding
                Constraint::Min(3),    // grid
                Constraint::Length(1), // status
                Constraint::Length(1), // legend
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("SCORE ", dim_style),
            Span::styled(format_score(state.score), bold_style.fg(Color::Magenta)),
            Span::raw("   "),
            Span::styled(format!("LEVEL {}", state.level()), bold_style.fg(Color::Cyan)),
            Span::raw("   "),
            Span::styled("TIME LEFT ", dim_style),
            Span::styled(format_time_left(state.time_left), bold_style),
        ]))
        .alignment(Alignment::Center);
        header.render(chunks[0], buf);

        let fraction = state.timer_fraction();
        let gauge_color = if fraction > 0.5 {
            Color::Green
        } else if fraction > 0.2 {
            Color::Yellow
        } else {
            Color::Red
        };
        Gauge::default()
            .gauge_style(Style::default().fg(gauge_color))
            .ratio(fraction)
            .label(format_time_left(state.time_left))
            .render(chunks[1], buf);

        render_grid(self, chunks[3], buf);

        if state.phase() == Phase::Paused {
            Paragraph::new(Span::styled(
                "PAUSED - (p) to resume",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
        }

        let keys: String = self.layout.keys().iter().collect();
        Paragraph::new(Span::styled(
            format!("({}) whack / (r)estart / (p)ause / (esc)ape", keys),
            italic_style,
        ))
        .render(chunks[5], buf);

        if state.phase() == Phase::GameOver {
            render_game_over(state, area, buf);
        }
    }
}

fn render_grid(view: &GameView<'_>, area: Rect, buf: &mut Buffer) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 3); GRID_SIZE / GRID_COLUMNS])
        .split(area);
    let keys = view.layout.keys();

    for (row_idx, row) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); GRID_COLUMNS])
            .split(*row);

        for (col_idx, cell_area) in cols.iter().enumerate() {
            let idx = row_idx * GRID_COLUMNS + col_idx;
            let up = view.state.cells[idx];

            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", keys[idx]))
                .border_style(if up {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().add_modifier(Modifier::DIM)
                });
            let inner = block.inner(*cell_area);
            block.render(*cell_area, buf);

            if inner.width == 0 || inner.height == 0 {
                continue;
            }
            let middle = Rect {
                y: inner.y + inner.height / 2,
                height: 1,
                ..inner
            };
            let content = if up {
                Span::styled(
                    view.face(idx),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled("·", Style::default().add_modifier(Modifier::DIM))
            };
            Paragraph::new(content)
                .alignment(Alignment::Center)
                .render(middle, buf);
        }
    }
}

fn render_game_over(state: &SessionState, area: Rect, buf: &mut Buffer) {
    let lines = [
        "TIME'S UP!".to_string(),
        String::new(),
        "Final Score".to_string(),
        format_score(state.score),
        format!("Level {}", state.level()),
        String::new(),
        "(r) play again / (esc)ape".to_string(),
    ];
    let text_width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;

    let width = (text_width + 6).min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    Clear.render(popup, buf);
    let text: Vec<Line> = lines
        .into_iter()
        .enumerate()
        .map(|(i, l)| match i {
            0 => Line::styled(l, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            3 => Line::styled(l, Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
            _ => Line::raw(l),
        })
        .collect();
    Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .render(popup, buf);
}
