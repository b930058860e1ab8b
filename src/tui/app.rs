use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::coord::{
    CoordinationError, InitCompletion, InitialData, NavigationGuard, ScopeId,
    ScopeLifecycleController, SharedAggregator,
};
use crate::io::config_io::read_config;
use crate::io::store::{DocumentStore, JsonFileStore, StoreError};
use crate::model::{AppConfig, Collection, FormState};
use crate::ops::record_ops::{self, RecordRow};

use super::input;
use super::render;
use super::theme::Theme;

/// Errors surfaced in the status row
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Coordination(#[from] CoordinationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What to do once an editor may be left.
///
/// Held by the navigation guard while a confirmation is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitIntent {
    /// Close the topmost editor
    CloseEditor,
    /// Close every editor and show another collection
    SwitchTab(Collection),
    /// Close every editor and open another record instead
    OpenRecord {
        collection: Collection,
        id: Option<String>,
    },
}

/// Record deletion awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub collection: Collection,
    pub id: String,
}

/// One open editing surface
#[derive(Debug)]
pub struct Editor {
    pub scope: ScopeId,
    pub form: FormState,
}

/// Main application state
pub struct App {
    pub data_dir: PathBuf,
    pub config: AppConfig,
    pub store: Box<dyn DocumentStore>,
    pub theme: Theme,
    pub tab: Collection,
    pub rows: HashMap<Collection, Vec<RecordRow>>,
    pub cursors: HashMap<Collection, usize>,
    pub lifecycle: ScopeLifecycleController,
    pub guard: NavigationGuard<ExitIntent>,
    /// Open editors, innermost last
    pub editors: Vec<Editor>,
    pub pending_delete: Option<PendingDelete>,
    /// Message of the quit prompt while the unload guard holds the exit
    pub quit_prompt: Option<String>,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(data_dir: PathBuf, config: AppConfig, store: Box<dyn DocumentStore>) -> Self {
        let aggregator = SharedAggregator::new();
        let lifecycle = ScopeLifecycleController::new(aggregator.clone());
        let mut guard = NavigationGuard::with_prompts(
            aggregator,
            config.guard.confirm_prompt.clone(),
            config.guard.unload_prompt.clone(),
        );
        // One registration for the lifetime of the app
        let _ = guard.register_unload();

        let theme = Theme::from_config(&config.ui);
        let mut app = App {
            data_dir,
            config,
            store,
            theme,
            tab: Collection::Medications,
            rows: HashMap::new(),
            cursors: HashMap::new(),
            lifecycle,
            guard,
            editors: Vec::new(),
            pending_delete: None,
            quit_prompt: None,
            status_message: None,
            should_quit: false,
        };
        for collection in Collection::ALL {
            app.refresh_rows(collection);
        }
        app
    }

    /// Reload list rows for a collection from the store
    pub fn refresh_rows(&mut self, collection: Collection) {
        match record_ops::rows(self.store.as_ref(), collection) {
            Ok(rows) => {
                let len = rows.len();
                self.rows.insert(collection, rows);
                let cursor = self.cursors.entry(collection).or_insert(0);
                *cursor = (*cursor).min(len.saturating_sub(1));
            }
            Err(e) => self.report(AppError::from(e)),
        }
    }

    pub fn current_rows(&self) -> &[RecordRow] {
        self.rows.get(&self.tab).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cursor(&self) -> usize {
        self.cursors.get(&self.tab).copied().unwrap_or(0)
    }

    pub fn selected_row(&self) -> Option<&RecordRow> {
        self.current_rows().get(self.cursor())
    }

    pub fn top_editor(&self) -> Option<&Editor> {
        self.editors.last()
    }

    /// Any open editor has unsaved changes
    pub fn has_unsaved(&self) -> bool {
        self.lifecycle.aggregator().read()
    }

    pub fn init_fallback(&self) -> Duration {
        Duration::from_millis(self.config.guard.init_fallback_ms)
    }

    pub fn report(&mut self, err: AppError) {
        tracing::warn!("{}", err);
        self.status_message = Some(format!("error: {}", err));
    }

    /// Mount an editor for a record (`None` creates a new one). Opens nested
    /// inside the current top editor, if any.
    pub fn open_editor(&mut self, collection: Collection, id: Option<String>) -> Result<(), AppError> {
        let initial = match &id {
            Some(id) => InitialData::Existing(id.clone()),
            None => InitialData::Blank,
        };
        let completion = InitCompletion::Fallback(self.init_fallback());
        let scope = match self.editors.last() {
            Some(parent) => self.lifecycle.on_nested_surface_open(
                parent.scope,
                collection.noun(),
                initial,
                completion,
            )?,
            None => self
                .lifecycle
                .on_surface_open(collection.noun(), initial, completion),
        };

        let values = match &id {
            Some(id) => match record_ops::record_values(self.store.as_ref(), collection, id) {
                Ok(Some(values)) => values,
                Ok(None) => FormState::defaults(collection),
                Err(e) => {
                    self.lifecycle.on_surface_close(scope)?;
                    return Err(e.into());
                }
            },
            None => FormState::defaults(collection),
        };

        // Pre-population goes through the same path as typing; the scope is
        // still initializing, so none of it counts as an edit.
        let mut form = FormState::empty(collection, id);
        for (key, value) in values {
            if form.set(key, &value) {
                self.lifecycle.on_field_change(scope)?;
            }
        }
        form.cursor = 0;
        form.edit_cursor = form.current_value().len();
        self.lifecycle.complete_initialization(scope)?;

        self.editors.push(Editor { scope, form });
        Ok(())
    }

    /// Save the top editor. On success the scope is marked saved (and closed
    /// when `closing`); on failure nothing about the scope changes.
    pub fn save_top_editor(&mut self, closing: bool) -> Result<(), AppError> {
        let Some(editor) = self.editors.last_mut() else {
            return Ok(());
        };
        let collection = editor.form.collection;
        let id = match record_ops::save_form(self.store.as_mut(), &editor.form) {
            Ok(id) => id,
            Err(e) => {
                self.status_message = Some(format!("save failed: {}", e));
                return Err(e.into());
            }
        };
        editor.form.record_id = Some(id.clone());
        let scope = editor.scope;
        self.lifecycle.on_save_succeeded(scope, closing)?;
        if closing {
            self.editors.pop();
            self.link_saved_template(collection, &id)?;
        }
        self.refresh_rows(collection);
        self.status_message = Some(format!("saved {}", id));
        Ok(())
    }

    /// A template saved from inside an activity editor is attached to it.
    fn link_saved_template(&mut self, saved: Collection, id: &str) -> Result<(), AppError> {
        if saved != Collection::Templates {
            return Ok(());
        }
        if let Some(parent) = self.editors.last_mut()
            && parent.form.collection == Collection::Activities
            && parent.form.set("template", id)
        {
            self.lifecycle.on_field_change(parent.scope)?;
        }
        Ok(())
    }

    /// Type a character into the top editor
    pub fn edit_insert(&mut self, c: char) -> Result<(), AppError> {
        if let Some(editor) = self.editors.last_mut() {
            editor.form.insert_char(c);
            self.lifecycle.on_field_change(editor.scope)?;
        }
        Ok(())
    }

    pub fn edit_backspace(&mut self) -> Result<(), AppError> {
        if let Some(editor) = self.editors.last_mut()
            && editor.form.backspace()
        {
            self.lifecycle.on_field_change(editor.scope)?;
        }
        Ok(())
    }
}

/// Perform a cleared exit. Only touches UI state; the guard's clearance
/// disarms the scopes afterwards.
pub fn apply_exit(
    editors: &mut Vec<Editor>,
    tab: &mut Collection,
    intent: &ExitIntent,
) -> Result<(), AppError> {
    match intent {
        ExitIntent::CloseEditor => {
            editors.pop();
        }
        ExitIntent::SwitchTab(collection) => {
            editors.clear();
            *tab = *collection;
        }
        ExitIntent::OpenRecord { collection, .. } => {
            editors.clear();
            *tab = *collection;
        }
    }
    Ok(())
}

/// Run the TUI application
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config(data_dir)?;
    std::fs::create_dir_all(data_dir)?;
    // Flushes the log file when dropped at the end of run
    let _log_guard = crate::io::logging::init_file_logging(data_dir);
    tracing::info!(dir = %data_dir.display(), "starting tui");

    let store = JsonFileStore::new(data_dir);
    let mut app = App::new(data_dir.to_path_buf(), config, Box::new(store));

    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        let mut timeout = Duration::from_millis(250);
        if let Some(deadline) = app.lifecycle.next_deadline() {
            timeout = timeout.min(deadline.saturating_duration_since(Instant::now()));
        }

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        app.lifecycle.poll_deadlines(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Restore tab and cursors from .state.json
pub fn restore_ui_state(app: &mut App) {
    use crate::io::state::read_ui_state;

    let ui_state = match read_ui_state(&app.data_dir) {
        Some(s) => s,
        None => return,
    };

    if let Some(tab) = Collection::parse_collection(&ui_state.tab) {
        app.tab = tab;
    }
    for collection in Collection::ALL {
        if let Some(&cursor) = ui_state.cursors.get(collection.name()) {
            let len = app.rows.get(&collection).map_or(0, Vec::len);
            app.cursors
                .insert(collection, cursor.min(len.saturating_sub(1)));
        }
    }
}

/// Save tab and cursors to .state.json
pub fn save_ui_state(app: &App) {
    use crate::io::state::{UiState, write_ui_state};

    let ui_state = UiState {
        tab: app.tab.name().to_string(),
        cursors: app
            .cursors
            .iter()
            .map(|(c, &i)| (c.name().to_string(), i))
            .collect(),
    };

    if let Err(e) = write_ui_state(&app.data_dir, &ui_state) {
        tracing::warn!("could not save ui state: {}", e);
    }
}
