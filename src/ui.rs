use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, AppState},
    clock::Clock,
};

const HORIZONTAL_MARGIN: u16 = 5;
const INPUT_HEIGHT: u16 = 3;

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        if self.state == AppState::Idle {
            Paragraph::new(Span::styled(
                "press (enter) to get a quote",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(centered_row(area, 1), buf);
            return;
        }

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let quote_width: usize = self.units.iter().map(|u| u.text.width()).sum();
        let quote_lines = if quote_width <= max_chars_per_line as usize {
            1
        } else {
            (quote_width as f64 / max_chars_per_line as f64).ceil() as u16 + 1
        };

        let body_height = quote_lines + 1 + INPUT_HEIGHT + 2;
        let padding = area.height.saturating_sub(body_height) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(quote_lines),
                Constraint::Length(1),
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(1), // message
                Constraint::Length(1), // legend
                Constraint::Min(0),
            ])
            .split(area);

        let done = self.active_index();
        let spans = self
            .units
            .iter()
            .enumerate()
            .map(|(idx, unit)| {
                let style = if unit.active {
                    bold_style
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::UNDERLINED)
                } else if idx < done {
                    bold_style.fg(Color::Green)
                } else {
                    bold_style.add_modifier(Modifier::DIM)
                };
                Span::styled(unit.text.as_str(), style)
            })
            .collect::<Vec<Span>>();

        Paragraph::new(Line::from(spans))
            .alignment(if quote_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);

        let input_style = if self.error {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            bold_style
        };
        Paragraph::new(Span::styled(self.input.as_str(), input_style))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(input_style)
                    .title(if self.error { "error" } else { "type" }),
            )
            .render(chunks[3], buf);

        if let Some(message) = &self.message {
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
        }

        Paragraph::new(Span::styled(
            "(enter) new quote / (tab) restart / (esc)ape",
            italic_style,
        ))
        .render(chunks[5], buf);
    }
}

fn centered_row(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}
