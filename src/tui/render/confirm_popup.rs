use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::{centered_rect_fixed, truncate_to_width};

/// The navigation guard's pending "discard unsaved changes?" question
pub fn render_guard_confirm(frame: &mut Frame, app: &App, area: Rect) {
    let Some(request) = app.guard.first_pending() else {
        return;
    };
    let detail = match request.covered().len() {
        1 => "Unsaved edits in this editor will be lost.".to_string(),
        n => format!("Unsaved edits in {} open editors will be lost.", n),
    };
    render_yes_no(
        frame,
        app,
        area,
        " Unsaved changes ",
        &[request.prompt(), detail.as_str()],
        ("y", "discard"),
        ("n", "keep editing"),
    );
}

pub fn render_delete_confirm(frame: &mut Frame, app: &App, area: Rect) {
    let Some(pending) = &app.pending_delete else {
        return;
    };
    let question = format!("Delete {} {}?", pending.collection.noun(), pending.id);
    render_yes_no(
        frame,
        app,
        area,
        " Delete ",
        &[question.as_str(), "This cannot be undone."],
        ("y", "delete"),
        ("n", "cancel"),
    );
}

/// The unload guard's quit prompt
pub fn render_quit_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let Some(message) = &app.quit_prompt else {
        return;
    };
    render_yes_no(
        frame,
        app,
        area,
        " Quit ",
        &[message.as_str()],
        ("y", "quit"),
        ("n", "stay"),
    );
}

fn render_yes_no(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    message: &[&str],
    yes: (&str, &str),
    no: (&str, &str),
) {
    let bg = app.theme.background;
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let bright_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(app.theme.highlight).bg(bg);

    let popup_w: u16 = 52.min(area.width.saturating_sub(2));
    let text_w = (popup_w as usize).saturating_sub(4);

    let mut lines: Vec<Line> = Vec::new();
    for (i, text) in message.iter().enumerate() {
        let style = if i == 0 { bright_style } else { text_style };
        lines.push(Line::from(Span::styled(
            format!(" {}", truncate_to_width(text, text_w)),
            style,
        )));
    }
    lines.push(Line::from(Span::styled("", text_style)));
    lines.push(Line::from(vec![
        Span::styled(" ", text_style),
        Span::styled(yes.0, key_style),
        Span::styled(format!(" {}  ", yes.1), text_style),
        Span::styled(no.0, key_style),
        Span::styled(format!(" {}", no.1), text_style),
    ]));

    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title.to_string(), key_style.add_modifier(Modifier::BOLD)))
        .border_style(Style::default().fg(app.theme.yellow).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines).block(block).style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}
