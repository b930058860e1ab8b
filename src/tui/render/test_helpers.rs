use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::MemoryStore;
use crate::model::{AppConfig, Collection, FormState};
use crate::ops::record_ops::save_form;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over an empty in-memory store.
pub fn test_app() -> App {
    app_with_store(MemoryStore::new())
}

pub fn app_with_store(store: MemoryStore) -> App {
    App::new(
        PathBuf::from("/tmp/carebook-test"),
        AppConfig::default(),
        Box::new(store),
    )
}

/// An App whose store holds one medication, MED-1.
pub fn app_with_medication(name: &str, dosage: &str) -> App {
    let mut store = MemoryStore::new();
    let mut form = FormState::empty(Collection::Medications, None);
    form.set("name", name);
    form.set("dosage", dosage);
    form.set("schedule", "daily");
    save_form(&mut store, &form).unwrap();
    app_with_store(store)
}
