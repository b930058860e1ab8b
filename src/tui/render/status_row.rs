use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::model::Collection;
use crate::tui::app::App;

use super::helpers::spans_width;

/// Render the status row (bottom of screen): the app-wide unsaved marker,
/// the latest status message, and key hints on the right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();
    if app.has_unsaved() {
        spans.push(Span::styled(
            "\u{25CF} unsaved",
            Style::default()
                .fg(app.theme.yellow)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(message) = &app.status_message {
        if !spans.is_empty() {
            spans.push(Span::styled("  ", Style::default().bg(bg)));
        }
        let color = if message.starts_with("error") || message.starts_with("save failed") {
            app.theme.red
        } else if message.starts_with("saved") || message.starts_with("deleted") {
            app.theme.green
        } else {
            app.theme.text
        };
        spans.push(Span::styled(message.clone(), Style::default().fg(color).bg(bg)));
    }

    if app.config.ui.show_key_hints {
        let hint = key_hints(app);
        let content_width = spans_width(&spans);
        let hint_width = hint.width();
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn key_hints(app: &App) -> &'static str {
    match app.top_editor() {
        None => "a add  Enter edit  d delete  q quit",
        Some(editor) if editor.form.collection == Collection::Activities => {
            "^S save  ^X save+close  ^T template  Esc close"
        }
        Some(_) => "^S save  ^X save+close  Esc close",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use insta::assert_snapshot;

    fn render(app: &App) -> String {
        render_to_string(60, 1, |frame, area| {
            render_status_row(frame, app, area);
        })
    }

    #[test]
    fn unsaved_marker_with_editor_hints() {
        let mut app = test_app();
        app.open_editor(Collection::Medications, None).unwrap();
        app.edit_insert('x').unwrap();
        assert_snapshot!(render(&app), @"● unsaved                  ^S save  ^X save+close  Esc close");
    }

    #[test]
    fn clean_editor_has_no_marker() {
        let mut app = test_app();
        app.open_editor(Collection::Medications, None).unwrap();
        assert!(!render(&app).contains("unsaved"));
    }

    #[test]
    fn status_message_without_hints() {
        let mut app = test_app();
        app.config.ui.show_key_hints = false;
        app.status_message = Some("saved MED-1".into());
        assert_snapshot!(render(&app), @"saved MED-1");
    }

    fn message_color(app: &App) -> ratatui::style::Color {
        let mut terminal =
            ratatui::Terminal::new(ratatui::backend::TestBackend::new(60, 1)).unwrap();
        terminal
            .draw(|frame| render_status_row(frame, app, frame.area()))
            .unwrap();
        terminal.backend().buffer()[(0, 0)].fg
    }

    #[test]
    fn message_color_follows_outcome() {
        let mut app = test_app();
        app.status_message = Some("saved MED-1".into());
        assert_eq!(message_color(&app), app.theme.green);

        app.status_message = Some("deleted MED-1".into());
        assert_eq!(message_color(&app), app.theme.green);

        app.status_message = Some("save failed: disk full".into());
        assert_eq!(message_color(&app), app.theme.red);

        app.status_message = Some("MED-1 no longer exists".into());
        assert_eq!(message_color(&app), app.theme.text);
    }
}
