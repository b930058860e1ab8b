pub mod confirm_popup;
pub mod editor_popup;
pub mod list_view;
pub mod status_row;
pub mod tab_bar;

mod helpers;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Main render function: dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);
    list_view::render_list_view(frame, app, chunks[1]);

    // Editors float over the list, innermost on top
    editor_popup::render_editors(frame, app, chunks[1]);

    // Prompts are rendered on top of everything
    confirm_popup::render_delete_confirm(frame, app, area);
    confirm_popup::render_guard_confirm(frame, app, area);
    confirm_popup::render_quit_prompt(frame, app, area);

    status_row::render_status_row(frame, app, chunks[2]);
}
