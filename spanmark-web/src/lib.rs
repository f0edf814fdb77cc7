//! spanmark Web - WebAssembly version of the span annotation tool
//!
//! Runs the same annotation sessions as the CLI over a few sample texts,
//! rendered into the DOM with Ratzilla. Sessions are driven one key event
//! at a time instead of through a blocking frontend.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use ratzilla::ratatui::Terminal;
use ratzilla::{event::KeyCode, DomBackend, WebRenderer};
use wasm_bindgen::prelude::*;

use spanmark_core::{AnnotationRecord, AnnotationSession, Dataset, Entry, Exit, Key, LabelSet, Progress};

pub mod io;
mod ui;

const STORAGE_KEY: &str = "spanmark-dataset";
const EXPORT_FILE: &str = "spanmark-dataset.json";

/// Sample texts for the demo
const SAMPLE_TEXTS: &[&str] = &[
    "Rust 1.80 ships LazyCell and LazyLock in the standard library.",
    "We moved the ingest service from Python 3.9 to Go and cut p99 latency in half.",
    "Tokio 1.38 adds a new scheduler metric, and axum 0.7 builds on hyper 1.0.",
    "Postgres 16 logical replication now works from standby servers.",
    "Anyone tried running Kafka on Kubernetes with Strimzi 0.40?",
];

/// Demo state: the dataset and the session over its current record
pub struct DemoApp {
    dataset: Dataset,
    labels: Arc<LabelSet>,
    index: usize,
    session: Option<AnnotationSession>,
    status: Option<String>,
}

impl DemoApp {
    pub fn new(dataset: Dataset, labels: Arc<LabelSet>) -> Self {
        let mut app = Self {
            dataset,
            labels,
            index: 0,
            session: None,
            status: None,
        };
        app.open(0);
        app
    }

    /// Start a session on the first usable record at or after `index`
    fn open(&mut self, index: usize) {
        self.session = None;
        for (i, entry) in self.dataset.entries().iter().enumerate().skip(index) {
            if let Entry::Record(record) = entry {
                let session = AnnotationSession::from_record(record, Arc::clone(&self.labels));
                if session.is_exhausted() {
                    continue;
                }
                self.index = i;
                self.session = Some(session);
                return;
            }
        }
        self.index = self.dataset.len();
    }

    pub fn is_finished(&self) -> bool {
        self.session.is_none()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.index + 1, self.dataset.len())
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Feed one key to the current session. Returns true when the dataset
    /// changed and should be persisted.
    pub fn handle_key(&mut self, key: Key) -> bool {
        self.status = None;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(exit) = session.handle_key(key) else {
            return false;
        };

        let spans = session.outcome(exit).into_spans();
        if let Some(Entry::Record(record)) = self.dataset.entries_mut().get_mut(self.index) {
            record.spans = spans;
        }

        match exit {
            Exit::Completed => self.open(self.index + 1),
            Exit::Aborted => self.session = None,
        }
        true
    }

    pub fn set_status(&mut self, message: &str) {
        self.status = Some(message.to_string());
    }

    /// Screen of the running session, if any
    pub fn session(&self) -> Option<&AnnotationSession> {
        self.session.as_ref()
    }
}

fn sample_dataset() -> Dataset {
    Dataset::from_records(SAMPLE_TEXTS.iter().map(|text| AnnotationRecord::new(*text)))
}

fn to_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    }
}

fn log(message: &str) {
    web_sys::console::log_1(&message.into());
}

/// Initialize the spanmark web application
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let dataset = match io::load_from_storage(STORAGE_KEY) {
        Ok(Some(dataset)) if !dataset.is_empty() => {
            log("spanmark: restored dataset from localStorage");
            dataset
        }
        Ok(_) => sample_dataset(),
        Err(e) => {
            web_sys::console::warn_1(&e);
            sample_dataset()
        }
    };

    let app_state = Rc::new(RefCell::new(DemoApp::new(dataset, Arc::new(LabelSet::tech()))));

    let backend = DomBackend::new()
        .map_err(|e| JsValue::from_str(&format!("Failed to create backend: {:?}", e)))?;
    let mut terminal = Terminal::new(backend)
        .map_err(|e| JsValue::from_str(&format!("Failed to create terminal: {:?}", e)))?;

    terminal.on_key_event({
        let app_state_cloned = app_state.clone();
        move |event| {
            let mut app = app_state_cloned.borrow_mut();

            if app.is_finished() {
                match event.code {
                    KeyCode::Char('e') => match app.dataset().to_json() {
                        Ok(json) => match io::download_json(EXPORT_FILE, &json) {
                            Ok(()) => app.set_status(&format!("Exported to {}", EXPORT_FILE)),
                            Err(e) => app.set_status(&format!("Export failed: {:?}", e)),
                        },
                        Err(e) => app.set_status(&format!("Serialization failed: {}", e)),
                    },
                    KeyCode::Char('r') => {
                        *app = DemoApp::new(sample_dataset(), Arc::new(LabelSet::tech()));
                        if let Err(e) = io::save_to_storage(STORAGE_KEY, app.dataset()) {
                            web_sys::console::warn_1(&e);
                        }
                    }
                    _ => {}
                }
                return;
            }

            if app.handle_key(to_key(event.code)) {
                if let Err(e) = io::save_to_storage(STORAGE_KEY, app.dataset()) {
                    web_sys::console::warn_1(&e);
                }
                if app.is_finished() {
                    log("spanmark: annotation finished");
                }
            }
        }
    });

    terminal.draw_web(move |frame| {
        let app = app_state.borrow();
        ui::draw(frame, &app);
    });

    log("spanmark WASM initialized");

    Ok(())
}
