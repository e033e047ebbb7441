//! Reusable UI component helpers

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::content::sections::{Section, SectionLabel};
use crate::theme::Theme;

/// Single-line bordered input. `masked` hides the value behind bullets.
#[allow(clippy::too_many_arguments)]
pub fn text_field(
    f: &mut Frame,
    theme: &Theme,
    area: Rect,
    title: &str,
    value: &str,
    focused: bool,
    masked: bool,
    error: Option<String>,
) {
    let border_color = match (&error, focused) {
        (Some(_), _) => theme.danger,
        (None, true) => theme.accent,
        (None, false) => theme.inactive,
    };
    let title_style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_dim)
    };

    let mut block = Block::default()
        .title(Span::styled(format!(" {} ", title), title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    if let Some(message) = error {
        block = block.title_bottom(Span::styled(format!(" {} ", message), Style::default().fg(theme.danger)));
    }

    let shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };

    // Keep the cursor end visible on long values
    let inner_width = area.width.saturating_sub(3) as usize;
    let char_count = shown.chars().count();
    let visible: String = if char_count > inner_width {
        shown.chars().skip(char_count - inner_width).collect()
    } else {
        shown
    };

    let mut spans = vec![Span::styled(visible, Style::default().fg(theme.text))];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(theme.accent)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Render sections as title + body blocks of lines
pub fn section_lines<'a>(theme: &Theme, sections: &'a [Section]) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    for section in sections {
        lines.push(Line::from(Span::styled(
            section.label.title(),
            Style::default().fg(theme.header).add_modifier(Modifier::BOLD),
        )));

        let body_style = match section.label {
            SectionLabel::GeneratedPost => Style::default().fg(theme.text),
            SectionLabel::ImagePrompt => Style::default().fg(theme.accent_bright).add_modifier(Modifier::ITALIC),
            _ => Style::default().fg(theme.text_dim),
        };
        for line in section.body.lines() {
            lines.push(Line::from(Span::styled(line, body_style)));
        }
        lines.push(Line::from(""));
    }

    lines
}

/// Keyboard legend line
pub fn hints_line<'a>(theme: &Theme, hints: &[(&'a str, &'a str)], max_hints: usize) -> Paragraph<'a> {
    let spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(theme.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(theme.text_dim)),
            ]
        })
        .collect();

    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

/// Bordered paragraph with wrapping
pub fn panel<'a>(theme: &Theme, title: &'a str, lines: Vec<Line<'a>>, focused: bool) -> Paragraph<'a> {
    let color = if focused { theme.accent } else { theme.inactive };
    Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .wrap(Wrap { trim: false })
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
