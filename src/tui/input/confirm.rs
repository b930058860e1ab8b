use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::coord::Decision;
use crate::tui::app::App;

use super::*;

/// Answer the navigation guard's "discard unsaved changes?" prompt
pub(super) fn handle_guard_confirm(app: &mut App, key: KeyEvent) {
    let Some(scope) = app.guard.first_pending().map(|r| r.scope()) else {
        return;
    };
    match (key.modifiers, key.code) {
        // Discard: y
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('y' | 'Y')) => {
            if let Some(clearance) = app.guard.resolve(scope, Decision::Discard) {
                let result = clearance.proceed(&mut app.lifecycle, |intent| {
                    apply_exit(&mut app.editors, &mut app.tab, &intent).map(|_| intent)
                });
                finish_exit(app, result);
            }
        }
        // Keep editing: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            let _ = app.guard.resolve(scope, Decision::Keep);
        }
        _ => {}
    }
}

pub(super) fn handle_delete_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            if let Some(pending) = app.pending_delete.take() {
                match app.store.delete(pending.collection, &pending.id) {
                    Ok(true) => {
                        tracing::info!(id = %pending.id, "deleted record");
                        app.status_message = Some(format!("deleted {}", pending.id));
                    }
                    Ok(false) => {
                        app.status_message = Some(format!("{} no longer exists", pending.id));
                    }
                    Err(e) => app.report(e.into()),
                }
                app.refresh_rows(pending.collection);
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.pending_delete = None;
        }
        _ => {}
    }
}

/// Answer the quit prompt raised by the unload guard
pub(super) fn handle_quit_prompt(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('y' | 'Y')) => {
            tracing::info!("quitting with unsaved changes");
            app.quit_prompt = None;
            app.should_quit = true;
        }
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.quit_prompt = None;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;
    use pretty_assertions::assert_eq;

    use crate::model::Collection;
    use crate::tui::app::PendingDelete;
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::*;

    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn discard_reopens_requested_record() {
        let mut app = app_with_medication("Aspirin", "81mg");
        app.open_editor(Collection::Medications, None).unwrap();
        app.edit_insert('z').unwrap();
        let root = app.editors[0].scope;

        super::super::guarded_exit(
            &mut app,
            root,
            ExitIntent::OpenRecord {
                collection: Collection::Medications,
                id: Some("MED-1".into()),
            },
        );
        assert!(app.guard.has_pending());

        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.editors.len(), 1);
        let editor = app.top_editor().unwrap();
        assert_eq!(editor.form.record_id.as_deref(), Some("MED-1"));
        assert_eq!(editor.form.get("name"), "Aspirin");
        assert!(!app.has_unsaved());
        assert!(!app.lifecycle.is_open(root));
    }

    #[test]
    fn delete_of_missing_record_reports_it() {
        let mut app = test_app();
        app.pending_delete = Some(PendingDelete {
            collection: Collection::Users,
            id: "USR-9".into(),
        });
        press(&mut app, KeyCode::Char('y'));
        assert!(app.pending_delete.is_none());
        assert_eq!(app.status_message.as_deref(), Some("USR-9 no longer exists"));
    }

    #[test]
    fn delete_confirm_ignores_other_keys() {
        let mut app = app_with_medication("Aspirin", "81mg");
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('j'));
        assert!(app.pending_delete.is_some());
        press(&mut app, KeyCode::Esc);
        assert!(app.pending_delete.is_none());
        assert_eq!(app.current_rows().len(), 1);
    }

    #[test]
    fn quit_prompt_esc_cancels() {
        let mut app = test_app();
        app.quit_prompt = Some("leave?".into());
        press(&mut app, KeyCode::Esc);
        assert!(app.quit_prompt.is_none());
        assert!(!app.should_quit);
    }
}
