mod confirm;
mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::coord::{Guarded, ScopeId, UnloadVerdict};

use super::app::{App, AppError, ExitIntent, apply_exit};

use confirm::*;
use edit::*;
use navigate::*;

/// Handle a key event. Prompts intercept input before editors, editors
/// before the list view.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if app.quit_prompt.is_some() {
        handle_quit_prompt(app, key);
        return;
    }

    if app.guard.has_pending() {
        handle_guard_confirm(app, key);
        return;
    }

    if app.pending_delete.is_some() {
        handle_delete_confirm(app, key);
        return;
    }

    // Ctrl-C quits from anywhere, through the unload guard
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        request_quit(app);
        return;
    }

    if app.editors.is_empty() {
        handle_navigate(app, key);
    } else {
        handle_edit(app, key);
    }
}

/// The app's unload signal: quit now, or hold the exit behind the quit prompt
pub(super) fn request_quit(app: &mut App) {
    match app.guard.guard_unload() {
        UnloadVerdict::Allow => app.should_quit = true,
        UnloadVerdict::Prevent { message } => app.quit_prompt = Some(message),
    }
}

/// Route an exit from `scope` through the navigation guard
pub(super) fn guarded_exit(app: &mut App, scope: ScopeId, intent: ExitIntent) {
    match app.guard.guard(&app.lifecycle, scope, intent) {
        Ok(Guarded::Clear(clearance)) => {
            let result = clearance.proceed(&mut app.lifecycle, |intent| {
                apply_exit(&mut app.editors, &mut app.tab, &intent).map(|_| intent)
            });
            finish_exit(app, result);
        }
        Ok(Guarded::Pending { .. }) | Ok(Guarded::AlreadyPending(_)) => {}
        Err(e) => app.report(e.into()),
    }
}

/// Follow-up once an exit went through and its scopes are disarmed
pub(super) fn finish_exit(app: &mut App, result: Result<ExitIntent, AppError>) {
    match result {
        Ok(ExitIntent::OpenRecord { collection, id }) => {
            if let Err(e) = app.open_editor(collection, id) {
                app.report(e);
            }
        }
        Ok(_) => {}
        Err(e) => app.report(e),
    }
}
