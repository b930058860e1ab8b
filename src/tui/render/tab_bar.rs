use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Collection;
use crate::tui::app::App;

/// Render the tab bar: one tab per collection, with separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let bg = app.theme.background;
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    let mut spans: Vec<Span> = Vec::new();
    for (i, collection) in Collection::ALL.iter().enumerate() {
        let is_current = app.tab == *collection;
        spans.push(Span::styled(
            format!(" {} {} ", i + 1, collection.label()),
            tab_style(app, is_current),
        ));
        spans.push(sep.clone());
    }
    let tabs = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(tabs, chunks[0]);

    let rule = "\u{2500}".repeat(chunks[1].width as usize);
    let separator = Paragraph::new(Line::from(Span::styled(
        rule,
        Style::default().fg(app.theme.dim).bg(bg),
    )));
    frame.render_widget(separator, chunks[1]);
}

fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
