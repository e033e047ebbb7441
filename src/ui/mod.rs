mod components;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, CounterLevel, Focus, Popup, View, LOADING_STEPS};
use crate::content::validate::{Field, TOPIC_MAX_CHARS};
use crate::theme::Theme;
use components::{centered_rect, hints_line, panel, section_lines, text_field};

/// Render the whole screen from `app`. Holds no state of its own.
pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let theme = &app.theme;

    f.render_widget(Block::default().style(Style::default().bg(theme.bg)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Min(8),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    match app.view {
        View::Form => draw_form(f, app, chunks[1]),
        View::Loading => draw_loading(f, app, chunks[1]),
        View::Results => draw_results(f, app, chunks[1]),
        View::Error => draw_error(f, app, chunks[1]),
    }
    draw_footer(f, app, chunks[2]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f, theme),
        Popup::EditPost => draw_edit_popup(f, app),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let toggle = Span::styled(
        format!("  {} ^T", app.config.theme.toggle_icon()),
        Style::default().fg(theme.text_dim),
    );

    let line = if let Some(ref status) = app.status_message {
        Line::from(vec![Span::styled(status, Style::default().fg(theme.success)), toggle])
    } else {
        Line::from(vec![
            Span::styled("linkpost", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" │ {}", app.config.model), Style::default().fg(theme.text_dim)),
            toggle,
        ])
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let form_area = centered_rect(if area.width < 90 { 96 } else { 70 }, 100, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // API key
            Constraint::Length(3), // Topic
            Constraint::Length(1), // Character count
            Constraint::Length(3), // Profile URL
            Constraint::Length(3), // Industry keyword
            Constraint::Length(1), // Image toggle
            Constraint::Length(3), // Generate button
            Constraint::Min(0),
        ])
        .split(form_area);

    let fields = [
        (Field::ApiKey, "OpenAI API Key", rows[0]),
        (Field::Topic, "Topic Description", rows[1]),
        (Field::ProfileUrl, "LinkedIn Profile URL", rows[3]),
        (Field::Industry, "Industry Keyword", rows[4]),
    ];
    for (field, title, rect) in fields {
        text_field(
            f,
            theme,
            rect,
            title,
            app.form.value(field),
            app.focus.field() == Some(field),
            field == Field::ApiKey,
            app.field_error(field).map(|e| e.to_string()),
        );
    }

    let (count, level) = app.topic_counter();
    let count_style = match level {
        CounterLevel::Normal => Style::default().fg(theme.text_dim),
        CounterLevel::Warning => Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        CounterLevel::Critical => Style::default().fg(theme.danger).add_modifier(Modifier::BOLD),
    };
    f.render_widget(
        Paragraph::new(Span::styled(format!("{}/{} ", count, TOPIC_MAX_CHARS), count_style))
            .alignment(Alignment::Right),
        rows[2],
    );

    let toggle_focused = app.focus == Focus::ImageToggle;
    let checkbox = if app.form.generate_image { "[x]" } else { "[ ]" };
    let toggle_style = if toggle_focused {
        Style::default().fg(theme.accent).bg(theme.bg_selected).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {} ", checkbox), toggle_style),
            Span::styled("Also generate a LinkedIn-optimized image prompt", toggle_style),
        ])),
        rows[5],
    );

    let button_focused = app.focus == Focus::GenerateButton;
    let button_style = if button_focused {
        Style::default().fg(theme.bg).bg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.accent)
    };
    let button = Paragraph::new(Span::styled(" ✨ Generate Content ", button_style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if button_focused { theme.accent } else { theme.inactive })),
        );
    f.render_widget(button, centered_rect(40, 100, rows[6]));
}

fn draw_loading(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let current = app.loading_step();

    let mut lines = vec![
        Line::from(Span::styled(
            "Generating your personalized content...",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (i, step) in LOADING_STEPS.iter().enumerate() {
        let (marker, style) = if i < current {
            ("✓", Style::default().fg(theme.success))
        } else if i == current {
            ("●", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        } else {
            ("○", Style::default().fg(theme.text_dim))
        };
        lines.push(Line::from(Span::styled(format!("  {} {}", marker, step), style)));
    }

    let rect = centered_rect(60, 50, area);
    f.render_widget(panel(theme, " Working ", lines, true), rect);
}

fn draw_results(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let Some(results) = &app.results else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let mut lines = section_lines(theme, &results.content.sections);
    if lines.is_empty() {
        // No recognizable sections: show the reply as-is
        lines = results
            .content
            .raw
            .lines()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.text))))
            .collect();
    }
    let generated = panel(theme, " Generated Content ", lines, true).scroll((app.results_scroll, 0));
    f.render_widget(generated, columns[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(7)])
        .split(columns[1]);

    let post_lines: Vec<Line> = results
        .post
        .lines()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.text))))
        .collect();
    f.render_widget(panel(theme, " Post (c to copy) ", post_lines, false), side[0]);

    let request = &results.request;
    let label = Style::default().fg(theme.text_dim);
    let value = Style::default().fg(theme.text);
    let summary = vec![
        Line::from(vec![Span::styled("API key:  ", label), Span::styled(request.masked_api_key(), value)]),
        Line::from(vec![Span::styled("Topic:    ", label), Span::styled(request.topic.as_str(), value)]),
        Line::from(vec![Span::styled("Profile:  ", label), Span::styled(request.profile_url.as_str(), value)]),
        Line::from(vec![Span::styled("Industry: ", label), Span::styled(request.industry.as_str(), value)]),
        Line::from(vec![
            Span::styled("Image:    ", label),
            Span::styled(if request.generate_image { "yes" } else { "no" }, value),
        ]),
    ];
    f.render_widget(panel(theme, " Request ", summary, false), side[1]);
}

fn draw_error(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let message = app.error_message.as_deref().unwrap_or("Unknown error");

    let lines = vec![
        Line::from(Span::styled(
            "Something went wrong",
            Style::default().fg(theme.danger).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(vec![
            Span::styled("r", Style::default().fg(theme.accent)),
            Span::styled(" retry   ", Style::default().fg(theme.text_dim)),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::styled(" back to form", Style::default().fg(theme.text_dim)),
        ]),
    ];

    let rect = centered_rect(70, 50, area);
    let block = Block::default()
        .title(Span::styled(" Error ", Style::default().fg(theme.danger)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.danger));
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), rect);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match app.view {
        View::Form => vec![
            ("Tab", "Next"),
            ("S-Tab", "Prev"),
            ("Space", "Toggle"),
            ("^G", "Generate"),
            ("F1", "Help"),
            ("^C", "Quit"),
        ],
        View::Loading => vec![("Esc", "Cancel"), ("^C", "Quit")],
        View::Results => vec![
            ("c", "Copy"),
            ("e", "Edit"),
            ("r", "Regenerate"),
            ("↑↓", "Scroll"),
            ("n", "New"),
            ("q", "Quit"),
        ],
        View::Error => vec![("r", "Retry"), ("Esc", "Back"), ("q", "Quit")],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 3 } else if area.width < 80 { 4 } else { hints.len() };
    f.render_widget(hints_line(&app.theme, &hints, max_hints), area);
}

fn draw_edit_popup(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup_area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, popup_area);

    let mut lines: Vec<Line> = app
        .edit_buffer
        .split('\n')
        .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.text))))
        .collect();
    if let Some(last) = lines.last_mut() {
        last.push_span(Span::styled("█", Style::default().fg(theme.accent)));
    }

    let block = Block::default()
        .title(Span::styled(" Edit Post ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)))
        .title_bottom(Span::styled(" ^S save │ Esc cancel ", Style::default().fg(theme.text_dim)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), popup_area);
}

fn draw_help_popup(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 30 { 95 } else { 75 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let heading = Style::default().fg(theme.header).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(theme.accent);
    let help_text = vec![
        Line::from(Span::styled("═══ Form ═══", heading)),
        Line::from(vec![Span::styled("  Tab/↓     ", key), Span::raw("Next field")]),
        Line::from(vec![Span::styled("  S-Tab/↑   ", key), Span::raw("Previous field")]),
        Line::from(vec![Span::styled("  Space     ", key), Span::raw("Toggle image prompt (on the checkbox)")]),
        Line::from(vec![Span::styled("  Ctrl-G    ", key), Span::raw("Generate from any field")]),
        Line::from(""),
        Line::from(Span::styled("═══ Results ═══", heading)),
        Line::from(vec![Span::styled("  c         ", key), Span::raw("Copy the post to the clipboard")]),
        Line::from(vec![Span::styled("  e         ", key), Span::raw("Edit the post (Ctrl-S saves)")]),
        Line::from(vec![Span::styled("  r         ", key), Span::raw("Regenerate with the same inputs")]),
        Line::from(vec![Span::styled("  n/Esc     ", key), Span::raw("Back to the form")]),
        Line::from(""),
        Line::from(Span::styled("═══ Anywhere ═══", heading)),
        Line::from(vec![Span::styled("  Ctrl-T    ", key), Span::raw("Switch dark/light theme")]),
        Line::from(vec![Span::styled("  Ctrl-C    ", key), Span::raw("Quit")]),
        Line::from(""),
        Line::from(Span::styled("═══ Scripting ═══", heading)),
        Line::from(vec![Span::styled("  linkpost --format reply.txt --json   ", key)]),
        Line::from(vec![Span::styled("  linkpost --generate --topic ... --url ... --industry ...", key)]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(theme.text_dim)),
            Span::styled("Esc", key),
            Span::styled(" to close", Style::default().fg(theme.text_dim)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" linkpost Help ", key))
                .borders(Borders::ALL)
                .border_style(key),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Results;
    use crate::config::AppConfig;
    use crate::content::GeneratedContent;
    use crate::generation::tests::{request, EchoClient};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::Duration;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        let client = EchoClient { delay: Duration::ZERO, fail: false };
        App::new(AppConfig::default(), None, Arc::new(client))
    }

    #[test]
    fn test_form_masks_api_key() {
        let mut app = app();
        app.form.api_key = "sk-secret".to_string();
        let screen = render(&app);
        assert!(!screen.contains("sk-secret"));
        assert!(screen.contains("Topic Description"));
        assert!(screen.contains("0/500"));
    }

    #[test]
    fn test_results_render_sections() {
        let mut app = app();
        let content = GeneratedContent::from_reply(
            "User Style Summary: Friendly.\nLinkedIn-Optimized Image Prompt: Sunrise.\nGenerated LinkedIn Post: Hello world.",
            false,
        );
        app.results = Some(Results {
            post: content.post.clone(),
            content,
            request: request("Testing", false),
        });
        app.view = View::Results;

        let screen = render(&app);
        assert!(screen.contains("Friendly."));
        assert!(screen.contains("Hello world."));
        assert!(!screen.contains("Sunrise."));
        assert!(!screen.contains("sk-abc"));
    }

    #[test]
    fn test_error_view_shows_message() {
        let mut app = app();
        app.error_message = Some("OpenAI API Error: quota exceeded".to_string());
        app.view = View::Error;
        assert!(render(&app).contains("quota exceeded"));
    }
}
