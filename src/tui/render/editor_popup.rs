use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, Editor};

use super::helpers::{centered_rect_fixed, truncate_to_width};

const LABEL_WIDTH: usize = 14;

/// Render every open editor, outermost first. Nested editors are offset so
/// the ones underneath stay visible.
pub fn render_editors(frame: &mut Frame, app: &App, area: Rect) {
    let depth = app.editors.len();
    for (i, editor) in app.editors.iter().enumerate() {
        let is_top = i + 1 == depth;
        let offset = (i as u16) * 2;
        let inner = Rect {
            x: area.x + offset,
            y: area.y + offset / 2,
            width: area.width.saturating_sub(offset),
            height: area.height.saturating_sub(offset / 2),
        };
        render_editor(frame, app, editor, is_top, inner);
    }
}

fn render_editor(frame: &mut Frame, app: &App, editor: &Editor, is_top: bool, area: Rect) {
    let bg = app.theme.background;
    let form = &editor.form;
    let fields = form.collection.fields();

    let popup_w: u16 = 56.min(area.width.saturating_sub(2));
    let popup_h: u16 = (fields.len() as u16 + 2).min(area.height);
    let popup = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);

    let dirty = app.lifecycle.is_dirty(editor.scope);
    let title = match &form.record_id {
        Some(id) => format!(" Edit {} {} ", form.collection.noun(), id),
        None => format!(" New {} ", form.collection.noun()),
    };
    let mut title_spans = vec![Span::styled(
        title,
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    if dirty {
        title_spans.push(Span::styled(
            "* ",
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }

    let border_color = if is_top { app.theme.highlight } else { app.theme.dim };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(title_spans))
        .border_style(Style::default().fg(border_color).bg(bg))
        .style(Style::default().bg(bg));

    let value_width = (popup_w as usize).saturating_sub(LABEL_WIDTH + 5);
    let lines: Vec<Line> = fields
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let selected = is_top && i == form.cursor;
            let label_style = if selected {
                Style::default().fg(app.theme.highlight).bg(bg)
            } else {
                Style::default().fg(app.theme.dim).bg(bg)
            };
            let value_style = if selected {
                Style::default().fg(app.theme.text_bright).bg(app.theme.selection_bg)
            } else {
                Style::default().fg(app.theme.text).bg(bg)
            };
            let value = form.get(spec.key);
            let mut spans = vec![Span::styled(
                format!(" {:<w$} ", spec.label, w = LABEL_WIDTH),
                label_style,
            )];
            if selected {
                let mut at = form.edit_cursor.min(value.len());
                if !value.is_char_boundary(at) {
                    at = value.len();
                }
                let before = truncate_to_width(&value[..at], value_width.saturating_sub(1));
                spans.push(Span::styled(before, value_style));
                spans.push(Span::styled(
                    "\u{258C}",
                    Style::default().fg(app.theme.highlight).bg(app.theme.selection_bg),
                ));
                spans.push(Span::styled(value[at..].to_string(), value_style));
            } else {
                spans.push(Span::styled(truncate_to_width(value, value_width), value_style));
            }
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(block).style(Style::default().bg(bg));
    frame.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Collection;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_editors(frame, app, area);
        })
    }

    #[test]
    fn new_editor_shows_fields_and_defaults() {
        let mut app = test_app();
        app.open_editor(Collection::Medications, None).unwrap();
        let output = render(&app);
        assert!(output.contains(" New medication "));
        assert!(output.contains("Schedule"));
        assert!(output.contains("daily"));
        assert!(!output.contains("* "));
    }

    #[test]
    fn dirty_editor_title_is_marked() {
        let mut app = app_with_medication("Aspirin", "81mg");
        app.open_editor(Collection::Medications, Some("MED-1".into()))
            .unwrap();
        assert!(render(&app).contains(" Edit medication MED-1 \u{2500}"));

        app.edit_insert('!').unwrap();
        let output = render(&app);
        assert!(output.contains(" Edit medication MED-1 * "));
    }

    #[test]
    fn nested_editor_draws_over_parent() {
        let mut app = test_app();
        app.open_editor(Collection::Activities, None).unwrap();
        app.open_editor(Collection::Templates, None).unwrap();
        let output = render(&app);
        assert!(output.contains(" New activity "));
        assert!(output.contains(" New template "));
    }
}
