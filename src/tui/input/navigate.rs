use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Collection;
use crate::tui::app::{App, PendingDelete};

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) => request_quit(app),

        // Tabs
        (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='4')) => {
            let idx = c as usize - '1' as usize;
            switch_tab(app, Collection::ALL[idx]);
        }
        (_, KeyCode::Tab) => {
            let idx = tab_index(app.tab);
            switch_tab(app, Collection::ALL[(idx + 1) % Collection::ALL.len()]);
        }
        (_, KeyCode::BackTab) => {
            let idx = tab_index(app.tab);
            let len = Collection::ALL.len();
            switch_tab(app, Collection::ALL[(idx + len - 1) % len]);
        }

        // Cursor
        (_, KeyCode::Char('j') | KeyCode::Down) => move_cursor(app, 1),
        (_, KeyCode::Char('k') | KeyCode::Up) => move_cursor(app, -1),
        (_, KeyCode::Char('g') | KeyCode::Home) => set_cursor(app, 0),
        (_, KeyCode::Char('G') | KeyCode::End) => set_cursor(app, usize::MAX),

        // Records
        (_, KeyCode::Enter) => {
            if let Some(id) = app.selected_row().map(|r| r.id.clone()) {
                let collection = app.tab;
                if let Err(e) = app.open_editor(collection, Some(id)) {
                    app.report(e);
                }
            }
        }
        (_, KeyCode::Char('a')) => {
            let collection = app.tab;
            if let Err(e) = app.open_editor(collection, None) {
                app.report(e);
            }
        }
        (_, KeyCode::Char('d')) => {
            if let Some(id) = app.selected_row().map(|r| r.id.clone()) {
                app.pending_delete = Some(PendingDelete {
                    collection: app.tab,
                    id,
                });
            }
        }
        (_, KeyCode::Esc) => app.status_message = None,
        _ => {}
    }
}

fn tab_index(tab: Collection) -> usize {
    Collection::ALL.iter().position(|c| *c == tab).unwrap_or(0)
}

fn switch_tab(app: &mut App, tab: Collection) {
    app.tab = tab;
    app.status_message = None;
}

fn move_cursor(app: &mut App, delta: isize) {
    let cursor = app.cursor();
    let next = if delta < 0 {
        cursor.saturating_sub(delta.unsigned_abs())
    } else {
        cursor.saturating_add(delta as usize)
    };
    set_cursor(app, next);
}

fn set_cursor(app: &mut App, pos: usize) {
    let len = app.current_rows().len();
    let clamped = pos.min(len.saturating_sub(1));
    app.cursors.insert(app.tab, clamped);
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;

    use crate::model::Collection;
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::*;

    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn number_keys_switch_tabs() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.tab, Collection::Templates);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab, Collection::Users);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab, Collection::Medications);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.tab, Collection::Users);
    }

    #[test]
    fn cursor_clamps_to_rows() {
        let mut app = app_with_medication("Aspirin", "81mg");
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.cursor(), 0);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor(), 0);
    }

    #[test]
    fn enter_opens_selected_record() {
        let mut app = app_with_medication("Aspirin", "81mg");
        press(&mut app, KeyCode::Enter);
        let editor = app.top_editor().unwrap();
        assert_eq!(editor.form.record_id.as_deref(), Some("MED-1"));
        assert!(!app.has_unsaved());
    }

    #[test]
    fn quit_with_nothing_open_is_immediate() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
        assert!(app.quit_prompt.is_none());
    }

    #[test]
    fn delete_asks_first() {
        let mut app = app_with_medication("Aspirin", "81mg");
        press(&mut app, KeyCode::Char('d'));
        assert!(app.pending_delete.is_some());
        press(&mut app, KeyCode::Char('n'));
        assert!(app.pending_delete.is_none());
        assert_eq!(app.current_rows().len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.current_rows().is_empty());
    }
}
