//! Notes, tabs and the persisted file system.
//!
//! The JSON layout matches what the browser app keeps in local storage, so
//! field names are camelCase and timestamps are ISO-8601 strings.

use crate::storage::{StorageError, StorageResult};
use crate::stroke::{Stroke, time_id, without_last};
use crate::tools::{DEFAULT_COLOR, DEFAULT_WIDTH};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Height of a fresh canvas tab.
pub const DEFAULT_TAB_HEIGHT: f64 = 2000.0;

/// Distance from the bottom edge at which a tab grows.
pub const GROW_THRESHOLD: f64 = 500.0;

/// How much a tab grows at a time.
pub const GROW_STEP: f64 = 1000.0;

const WELCOME_NOTE_ID: &str = "welcome-note";
const WELCOME_TAB_ID: &str = "default-tab-1";

fn default_height() -> f64 {
    DEFAULT_TAB_HEIGHT
}

/// One canvas page inside a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    /// Virtual canvas height in pixels.
    #[serde(default = "default_height")]
    pub height: f64,
}

impl Tab {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            strokes: Vec::new(),
            height: DEFAULT_TAB_HEIGHT,
        }
    }

    /// Extend the canvas when the viewport bottom nears its end.
    ///
    /// Returns true if the height changed.
    pub fn grow_height(&mut self, viewport_bottom: f64) -> bool {
        if viewport_bottom + GROW_THRESHOLD < self.height {
            return false;
        }
        self.height += GROW_STEP;
        log::debug!("tab {} grown to {}px", self.id, self.height);
        true
    }
}

/// A named note made of tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFile {
    pub id: String,
    pub name: String,
    pub tabs: Vec<Tab>,
    pub active_tab_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NoteFile {
    /// New note with a single empty tab.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_ids(time_id("note"), name, time_id("tab"))
    }

    fn with_ids(id: impl Into<String>, name: impl Into<String>, tab_id: impl Into<String>) -> Self {
        let tab = Tab::new(tab_id, "Tab 1");
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            active_tab_id: tab.id.clone(),
            tabs: vec![tab],
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Rename the note. Blank or unchanged names are ignored.
    pub fn rename(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || name == self.name {
            return false;
        }
        self.name = name.to_string();
        self.touch();
        true
    }

    /// Append a tab named `Tab N` and make it active.
    pub fn add_tab(&mut self) -> &Tab {
        let tab = Tab::new(time_id("tab"), format!("Tab {}", self.tabs.len() + 1));
        self.active_tab_id = tab.id.clone();
        self.touch();
        self.tabs.push(tab);
        &self.tabs[self.tabs.len() - 1]
    }

    /// Rename a tab. Blank names and unknown tabs are ignored.
    pub fn rename_tab(&mut self, tab_id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id == tab_id) else {
            return false;
        };
        tab.name = name.to_string();
        self.touch();
        true
    }

    /// Switch to another tab. Returns false for the current or an unknown tab.
    pub fn set_active_tab(&mut self, tab_id: &str) -> bool {
        if tab_id == self.active_tab_id || !self.tabs.iter().any(|t| t.id == tab_id) {
            return false;
        }
        self.active_tab_id = tab_id.to_string();
        self.touch();
        true
    }

    /// The active tab, or the first tab if the active id is stale.
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs
            .iter()
            .find(|t| t.id == self.active_tab_id)
            .or_else(|| self.tabs.first())
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let index = self
            .tabs
            .iter()
            .position(|t| t.id == self.active_tab_id)
            .unwrap_or(0);
        self.tabs.get_mut(index)
    }

    /// Replace the active tab's strokes.
    pub fn set_active_strokes(&mut self, strokes: Vec<Stroke>) {
        if let Some(tab) = self.active_tab_mut() {
            tab.strokes = strokes;
            self.touch();
        }
    }

    /// Clear the selection and drop the newest stroke of the active tab.
    pub fn undo_last_stroke(&mut self) -> bool {
        let Some(strokes) = self.active_tab().and_then(|t| without_last(&t.strokes)) else {
            return false;
        };
        self.set_active_strokes(strokes);
        true
    }
}

/// All notes, keyed by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSystem {
    pub notes: BTreeMap<String, NoteFile>,
}

impl Default for FileSystem {
    /// A file system holding only the welcome note.
    fn default() -> Self {
        let note = NoteFile::with_ids(WELCOME_NOTE_ID, "Welcome Note", WELCOME_TAB_ID);
        let mut notes = BTreeMap::new();
        notes.insert(note.id.clone(), note);
        Self { notes }
    }
}

impl FileSystem {
    pub fn empty() -> Self {
        Self { notes: BTreeMap::new() }
    }

    /// Create a note and return its id.
    pub fn create_note(&mut self, name: &str) -> String {
        let note = NoteFile::new(name);
        let id = note.id.clone();
        log::debug!("created note {id}");
        self.notes.insert(id.clone(), note);
        id
    }

    pub fn note(&self, id: &str) -> Option<&NoteFile> {
        self.notes.get(id)
    }

    pub fn note_mut(&mut self, id: &str) -> Option<&mut NoteFile> {
        self.notes.get_mut(id)
    }

    pub fn rename_note(&mut self, id: &str, name: &str) -> bool {
        self.notes.get_mut(id).is_some_and(|n| n.rename(name))
    }

    pub fn delete_note(&mut self, id: &str) -> Option<NoteFile> {
        self.notes.remove(id)
    }

    /// Notes ordered by most recent update first.
    pub fn sorted_notes(&self) -> Vec<&NoteFile> {
        let mut notes: Vec<&NoteFile> = self.notes.values().collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        notes
    }

    /// Parse stored JSON, upgrading older layouts first.
    pub fn from_json(json: &str) -> StorageResult<Self> {
        let mut value: Value =
            serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
        migrate(&mut value);
        serde_json::from_value(value).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> StorageResult<String> {
        serde_json::to_string(self).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

fn migrate(value: &mut Value) {
    let Some(notes) = value.get_mut("notes").and_then(Value::as_object_mut) else {
        return;
    };
    for note in notes.values_mut() {
        let Some(tabs) = note.get_mut("tabs").and_then(Value::as_array_mut) else {
            continue;
        };
        tabs.iter_mut().for_each(migrate_tab);
    }
}

fn migrate_tab(tab: &mut Value) {
    let Some(tab) = tab.as_object_mut() else {
        return;
    };
    tab.entry("height").or_insert_with(|| json!(DEFAULT_TAB_HEIGHT));

    let tab_id = tab
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let Some(strokes) = tab.get_mut("strokes").and_then(Value::as_array_mut) else {
        return;
    };
    // Old tabs stored each stroke as a bare list of points.
    if !strokes.first().is_some_and(Value::is_array) {
        return;
    }
    log::info!("migrating {} legacy strokes in tab {tab_id}", strokes.len());
    let legacy = std::mem::take(strokes);
    *strokes = legacy
        .into_iter()
        .enumerate()
        .map(|(index, points)| {
            json!({
                "id": format!("migrated-{tab_id}-{index}-{}", uuid::Uuid::new_v4().simple()),
                "points": points,
                "color": DEFAULT_COLOR,
                "width": DEFAULT_WIDTH,
                "selected": false,
            })
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Point;

    fn stroke(id: &str, selected: bool) -> Stroke {
        let mut s = Stroke::new(id, vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)], "#FFFFFF", 3.0);
        s.selected = selected;
        s
    }

    #[test]
    fn test_default_file_system() {
        let fs = FileSystem::default();
        let note = fs.note("welcome-note").unwrap();
        assert_eq!(note.name, "Welcome Note");
        assert_eq!(note.active_tab_id, "default-tab-1");
        let tab = note.active_tab().unwrap();
        assert_eq!(tab.name, "Tab 1");
        assert_eq!(tab.height, DEFAULT_TAB_HEIGHT);
        assert!(tab.strokes.is_empty());
    }

    #[test]
    fn test_add_and_rename_tabs() {
        let mut note = NoteFile::new("Math");
        let tab_id = note.add_tab().id.clone();
        assert_eq!(note.tabs.len(), 2);
        assert_eq!(note.tabs[1].name, "Tab 2");
        assert_eq!(note.active_tab_id, tab_id);

        assert!(note.rename_tab(&tab_id, "  Proofs "));
        assert_eq!(note.tabs[1].name, "Proofs");
        assert!(!note.rename_tab(&tab_id, "   "));
        assert!(!note.rename_tab("missing", "x"));
    }

    #[test]
    fn test_set_active_tab() {
        let mut note = NoteFile::new("n");
        let first = note.tabs[0].id.clone();
        let second = note.add_tab().id.clone();
        assert!(!note.set_active_tab(&second));
        assert!(note.set_active_tab(&first));
        assert!(!note.set_active_tab("missing"));
        assert_eq!(note.active_tab().unwrap().id, first);
    }

    #[test]
    fn test_active_tab_falls_back_to_first() {
        let mut note = NoteFile::new("n");
        note.active_tab_id = "gone".to_string();
        assert_eq!(note.active_tab().unwrap().id, note.tabs[0].id);
        note.set_active_strokes(vec![stroke("a", false)]);
        assert_eq!(note.tabs[0].strokes.len(), 1);
    }

    #[test]
    fn test_rename_note() {
        let mut fs = FileSystem::default();
        assert!(fs.rename_note("welcome-note", " Hello "));
        assert_eq!(fs.note("welcome-note").unwrap().name, "Hello");
        assert!(!fs.rename_note("welcome-note", "Hello"));
        assert!(!fs.rename_note("welcome-note", ""));
        assert!(!fs.rename_note("missing", "x"));
    }

    #[test]
    fn test_undo_last_stroke() {
        let mut note = NoteFile::new("n");
        assert!(!note.undo_last_stroke());

        note.set_active_strokes(vec![stroke("a", true), stroke("b", false)]);
        assert!(note.undo_last_stroke());
        let strokes = &note.active_tab().unwrap().strokes;
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].id, "a");
        assert!(!strokes[0].selected);
    }

    #[test]
    fn test_grow_height() {
        let mut tab = Tab::new("t", "Tab 1");
        assert!(!tab.grow_height(1000.0));
        assert!(tab.grow_height(1500.0));
        assert_eq!(tab.height, 3000.0);
        assert!(!tab.grow_height(1500.0));
    }

    #[test]
    fn test_sorted_notes_newest_first() {
        let mut fs = FileSystem::empty();
        let old = fs.create_note("old");
        let new = fs.create_note("new");
        fs.note_mut(&old).unwrap().updated_at = "2020-01-01T00:00:00.000Z".parse().unwrap();
        fs.note_mut(&new).unwrap().updated_at = "2024-06-01T12:00:00.000Z".parse().unwrap();

        let ids: Vec<&str> = fs.sorted_notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![new.as_str(), old.as_str()]);

        assert!(fs.delete_note(&old).is_some());
        assert_eq!(fs.sorted_notes().len(), 1);
    }

    #[test]
    fn test_json_uses_camel_case() {
        let fs = FileSystem::default();
        let json = fs.to_json().unwrap();
        assert!(json.contains("\"activeTabId\":\"default-tab-1\""));
        assert!(json.contains("\"updatedAt\""));
        assert_eq!(FileSystem::from_json(&json).unwrap(), fs);
    }

    #[test]
    fn test_migrates_missing_height_and_legacy_strokes() {
        let json = r##"{"notes":{"n1":{
            "id":"n1","name":"Old","activeTabId":"t1",
            "createdAt":"2023-01-01T00:00:00.000Z","updatedAt":"2023-01-02T00:00:00.000Z",
            "tabs":[{"id":"t1","name":"Tab 1","strokes":[
                [{"x":0,"y":0,"pressure":0.5},{"x":4,"y":4,"pressure":0.5}],
                [{"x":1,"y":1}]
            ]}]
        }}}"##;
        let fs = FileSystem::from_json(json).unwrap();
        let tab = fs.note("n1").unwrap().active_tab().unwrap();
        assert_eq!(tab.height, DEFAULT_TAB_HEIGHT);
        assert_eq!(tab.strokes.len(), 2);
        assert!(tab.strokes[0].id.starts_with("migrated-t1-0-"));
        assert!(tab.strokes[1].id.starts_with("migrated-t1-1-"));
        assert_eq!(tab.strokes[0].color, "#FFFFFF");
        assert_eq!(tab.strokes[0].width, 3.0);
        assert!(!tab.strokes[1].selected);
        assert_eq!(tab.strokes[1].points[0].pressure, 0.5);
    }

    #[test]
    fn test_structured_strokes_are_kept() {
        let json = r##"{"notes":{"n1":{
            "id":"n1","name":"New","activeTabId":"t1",
            "createdAt":"2023-01-01T00:00:00Z","updatedAt":"2023-01-01T00:00:00Z",
            "tabs":[{"id":"t1","name":"Tab 1","height":3000,"strokes":[
                {"id":"stroke-1","points":[{"x":0,"y":0,"pressure":1}],"color":"#FF0000","width":5}
            ]}]
        }}}"##;
        let fs = FileSystem::from_json(json).unwrap();
        let tab = &fs.note("n1").unwrap().tabs[0];
        assert_eq!(tab.height, 3000.0);
        assert_eq!(tab.strokes[0].id, "stroke-1");
        assert!(!tab.strokes[0].selected);
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        assert!(matches!(
            FileSystem::from_json("{not json"),
            Err(StorageError::Serialization(_))
        ));
        assert!(matches!(
            FileSystem::from_json(r#"{"notes": 5}"#),
            Err(StorageError::Serialization(_))
        ));
    }
}
