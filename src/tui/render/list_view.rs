use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::helpers::truncate_to_width;

const ID_COLUMN: usize = 8;

/// Render the record list for the current tab
pub fn render_list_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let rows = app.current_rows();

    if rows.is_empty() {
        let line = Line::from(Span::styled(
            format!(" No {} yet. Press a to add one.", app.tab.name()),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
        return;
    }

    // Keep the cursor on screen
    let height = area.height as usize;
    let cursor = app.cursor();
    let offset = if height == 0 { 0 } else { cursor.saturating_sub(height - 1) };

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, row)| {
            let selected = i == cursor;
            let row_bg = if selected { app.theme.selection_bg } else { bg };
            let id_style = Style::default().fg(app.theme.dim).bg(row_bg);
            let mut text_style = Style::default().fg(app.theme.text).bg(row_bg);
            if selected {
                text_style = text_style
                    .fg(app.theme.text_bright)
                    .add_modifier(Modifier::BOLD);
            }
            let summary_width = width.saturating_sub(ID_COLUMN + 2);
            Line::from(vec![
                Span::styled(format!(" {:<w$}", row.id, w = ID_COLUMN), id_style),
                Span::styled(" ", id_style),
                Span::styled(truncate_to_width(&row.summary, summary_width), text_style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
