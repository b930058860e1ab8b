use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Collection;
use crate::tui::app::{App, ExitIntent};

use super::*;

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    let Some(top) = app.top_editor() else {
        return;
    };
    let scope = top.scope;
    let collection = top.form.collection;
    let root = app.editors[0].scope;

    let result = match (key.modifiers, key.code) {
        // Leaving
        (_, KeyCode::Esc) => {
            guarded_exit(app, scope, ExitIntent::CloseEditor);
            Ok(())
        }
        (_, KeyCode::F(n @ 1..=4)) => {
            let tab = Collection::ALL[n as usize - 1];
            guarded_exit(app, root, ExitIntent::SwitchTab(tab));
            Ok(())
        }
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => {
            guarded_exit(app, root, ExitIntent::OpenRecord { collection, id: None });
            Ok(())
        }

        // Saving. A store failure already put its message in the status row.
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => skip_store_failure(app.save_top_editor(false)),
        (KeyModifiers::CONTROL, KeyCode::Char('x')) => skip_store_failure(app.save_top_editor(true)),

        // Nested template editor
        (KeyModifiers::CONTROL, KeyCode::Char('t')) if collection == Collection::Activities => {
            open_template_from_activity(app)
        }

        // Field navigation
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Tab) => {
            with_form(app, |f| f.next_field());
            Ok(())
        }
        (_, KeyCode::Up) | (_, KeyCode::BackTab) => {
            with_form(app, |f| f.prev_field());
            Ok(())
        }
        (_, KeyCode::Enter) => {
            with_form(app, |f| f.next_field());
            Ok(())
        }
        (_, KeyCode::Left) => {
            with_form(app, |f| f.move_left());
            Ok(())
        }
        (_, KeyCode::Right) => {
            with_form(app, |f| f.move_right());
            Ok(())
        }

        // Text
        (_, KeyCode::Backspace) => app.edit_backspace(),
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => app.edit_insert(c),
        _ => Ok(()),
    };

    if let Err(e) = result {
        app.report(e);
    }
}

fn skip_store_failure(result: Result<(), AppError>) -> Result<(), AppError> {
    match result {
        Err(AppError::Store(_)) => Ok(()),
        other => other,
    }
}

fn with_form(app: &mut App, f: impl FnOnce(&mut crate::model::FormState)) {
    if let Some(editor) = app.editors.last_mut() {
        f(&mut editor.form);
    }
}

/// Open the activity's template (or a blank one) on top of the activity editor
fn open_template_from_activity(app: &mut App) -> Result<(), AppError> {
    let template_id = app
        .top_editor()
        .map(|e| e.form.get("template").trim().to_string())
        .filter(|id| !id.is_empty());
    app.open_editor(Collection::Templates, template_id)
}
