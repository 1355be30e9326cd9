//! WebAssembly entry point and the JavaScript-facing API.

use crate::config::WebConfig;
use crate::error::WebError;
use crate::host::{WebCanvas, apply_effects};
use crate::session::{HostEffect, NoteSession};
use serde_json::json;
use vecnote_core::ToolKind;
use vecnote_core::storage::{LocalStorage, load_or_default};
use wasm_bindgen::prelude::*;

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Module start: install the panic hook before anything else runs.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    console_error_panic_hook::set_once();
}

/// Load the stored notes and mount the canvas.
///
/// `config_json` is an optional JSON [`WebConfig`]; missing fields keep
/// their defaults.
#[wasm_bindgen]
pub async fn mount(config_json: Option<String>) -> Result<VecnoteApp, JsValue> {
    let config = match config_json {
        Some(json) => WebConfig::from_json(&json).map_err(WebError::from)?,
        None => WebConfig::default(),
    };

    if console_log::init_with_level(config.log_level()).is_err() {
        log::warn!("Logger already initialized");
    }
    log::info!("Starting Vecnote (WASM)");

    let file_system = load_or_default(&LocalStorage::new(), &config.storage_key).await;
    let canvas = WebCanvas::mount(config, file_system)?;
    Ok(VecnoteApp { canvas })
}

/// Handle for the toolbar and note browser.
#[wasm_bindgen]
pub struct VecnoteApp {
    canvas: WebCanvas,
}

impl VecnoteApp {
    fn update(&self, f: impl FnOnce(&mut NoteSession) -> Vec<HostEffect>) {
        let state = self.canvas.state();
        let effects = f(&mut state.borrow_mut().session);
        apply_effects(state, effects);
        state.borrow_mut().redraw();
    }

    fn read<T>(&self, f: impl FnOnce(&NoteSession) -> T) -> T {
        f(&self.canvas.state().borrow().session)
    }
}

#[wasm_bindgen]
impl VecnoteApp {
    /// Select `"pen"` or `"lasso"`.
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&self, tool: &str) -> bool {
        let tool = match tool {
            "pen" => ToolKind::Pen,
            "lasso" => ToolKind::Lasso,
            _ => return false,
        };
        self.update(|s| {
            s.set_tool(tool);
            Vec::new()
        });
        true
    }

    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&self, color: &str) -> bool {
        let mut accepted = false;
        self.update(|s| {
            accepted = s.set_color(color);
            Vec::new()
        });
        accepted
    }

    #[wasm_bindgen(js_name = setWidth)]
    pub fn set_width(&self, width: f64) -> bool {
        let mut accepted = false;
        self.update(|s| {
            accepted = s.set_width(width);
            Vec::new()
        });
        accepted
    }

    #[wasm_bindgen(js_name = toggleFingerDrawing)]
    pub fn toggle_finger_drawing(&self) -> bool {
        self.update(|s| {
            s.toggle_finger_drawing();
            Vec::new()
        });
        self.read(|s| s.settings().finger_drawing_enabled)
    }

    pub fn undo(&self) {
        self.update(NoteSession::undo);
    }

    #[wasm_bindgen(js_name = addTab)]
    pub fn add_tab(&self) {
        self.update(NoteSession::add_tab);
    }

    #[wasm_bindgen(js_name = setActiveTab)]
    pub fn set_active_tab(&self, tab_id: &str) {
        self.update(|s| s.set_active_tab(tab_id));
    }

    #[wasm_bindgen(js_name = renameTab)]
    pub fn rename_tab(&self, tab_id: &str, name: &str) {
        self.update(|s| s.rename_tab(tab_id, name));
    }

    #[wasm_bindgen(js_name = renameNote)]
    pub fn rename_note(&self, name: &str) {
        self.update(|s| s.rename_note(name));
    }

    #[wasm_bindgen(js_name = createNote)]
    pub fn create_note(&self, name: &str) {
        self.update(|s| s.create_note(name));
    }

    #[wasm_bindgen(js_name = openNote)]
    pub fn open_note(&self, id: &str) -> bool {
        let mut opened = false;
        self.update(|s| {
            opened = s.open_note(id);
            if opened { vec![HostEffect::Resize] } else { Vec::new() }
        });
        opened
    }

    /// Note summaries, most recently updated first, as JSON.
    #[wasm_bindgen(js_name = listNotes)]
    pub fn list_notes(&self) -> String {
        self.read(|s| {
            let notes: Vec<_> = s
                .file_system()
                .sorted_notes()
                .into_iter()
                .map(|n| json!({ "id": n.id, "name": n.name, "updatedAt": n.updated_at }))
                .collect();
            serde_json::Value::Array(notes).to_string()
        })
    }

    /// The open note as JSON.
    #[wasm_bindgen(js_name = currentNote)]
    pub fn current_note(&self) -> Option<String> {
        self.read(|s| s.note().and_then(|n| serde_json::to_string(n).ok()))
    }
}
