//! Editing session: the open note, tool settings and stroke engine.
//!
//! This is the host side of the engine contract. It owns the canonical
//! stroke lists, applies [`EngineCommand`]s to them and tells the platform
//! layer what to do next through [`HostEffect`]s.

use kurbo::Size;
use vecnote_core::{
    CancellationToken, CanvasProps, EngineCommand, EngineConfig, FileSystem, NoteFile, PointerEvent,
    Stroke, StrokeEngine, Tab, ToolKind, ToolSettings,
};
use vecnote_render::{RenderConfig, RenderContext};

/// Work the platform layer must do after a session call.
#[derive(Debug, Clone)]
pub enum HostEffect {
    /// The file system changed and should be saved.
    Persist,
    /// Scroll the viewport vertically by this many pixels.
    ScrollBy(f64),
    /// Drive [`NoteSession::tick_frame`] from the display refresh until the
    /// token is cancelled.
    StartInertia(CancellationToken),
    /// The canvas height changed; the backing surface must be resized.
    Resize,
}

/// One open note and everything needed to edit it.
pub struct NoteSession {
    fs: FileSystem,
    note_id: String,
    settings: ToolSettings,
    engine: StrokeEngine,
}

impl NoteSession {
    /// Open the most recently updated note, creating one if there is none.
    pub fn new(mut fs: FileSystem, config: EngineConfig) -> Self {
        let newest = fs.sorted_notes().first().map(|note| note.id.clone());
        let note_id = match newest {
            Some(id) => id,
            None => fs.create_note("Untitled Note"),
        };
        log::info!("Opening note {note_id}");
        Self {
            fs,
            note_id,
            settings: ToolSettings::default(),
            engine: StrokeEngine::new(config),
        }
    }

    pub fn file_system(&self) -> &FileSystem {
        &self.fs
    }

    pub fn note(&self) -> Option<&NoteFile> {
        self.fs.note(&self.note_id)
    }

    fn note_mut(&mut self) -> Option<&mut NoteFile> {
        self.fs.note_mut(&self.note_id)
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.note().and_then(NoteFile::active_tab)
    }

    /// Committed strokes of the active tab.
    pub fn strokes(&self) -> &[Stroke] {
        self.active_tab().map_or(&[][..], |tab| tab.strokes.as_slice())
    }

    /// Virtual height of the active tab.
    pub fn canvas_height(&self) -> f64 {
        self.active_tab().map_or(vecnote_core::notes::DEFAULT_TAB_HEIGHT, |tab| tab.height)
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.settings.set_tool(tool);
    }

    pub fn set_color(&mut self, color: &str) -> bool {
        self.settings.set_color(color)
    }

    pub fn set_width(&mut self, width: f64) -> bool {
        self.settings.set_width(width)
    }

    pub fn toggle_finger_drawing(&mut self) {
        self.settings.toggle_finger_drawing();
    }

    /// Switch to another note. Transient gesture state is dropped.
    pub fn open_note(&mut self, id: &str) -> bool {
        if self.fs.note(id).is_none() {
            log::warn!("Cannot open unknown note {id}");
            return false;
        }
        self.engine.reset();
        self.note_id = id.to_string();
        true
    }

    /// Create a note and open it.
    pub fn create_note(&mut self, name: &str) -> Vec<HostEffect> {
        let id = self.fs.create_note(name);
        self.open_note(&id);
        vec![HostEffect::Persist, HostEffect::Resize]
    }

    pub fn rename_note(&mut self, name: &str) -> Vec<HostEffect> {
        if self.fs.rename_note(&self.note_id, name) {
            vec![HostEffect::Persist]
        } else {
            Vec::new()
        }
    }

    pub fn add_tab(&mut self) -> Vec<HostEffect> {
        self.engine.reset();
        match self.note_mut() {
            Some(note) => {
                note.add_tab();
                vec![HostEffect::Persist, HostEffect::Resize]
            }
            None => Vec::new(),
        }
    }

    pub fn set_active_tab(&mut self, tab_id: &str) -> Vec<HostEffect> {
        if !self.note_mut().is_some_and(|n| n.set_active_tab(tab_id)) {
            return Vec::new();
        }
        self.engine.reset();
        vec![HostEffect::Persist, HostEffect::Resize]
    }

    pub fn rename_tab(&mut self, tab_id: &str, name: &str) -> Vec<HostEffect> {
        if self.note_mut().is_some_and(|n| n.rename_tab(tab_id, name)) {
            vec![HostEffect::Persist]
        } else {
            Vec::new()
        }
    }

    /// Remove the newest stroke of the active tab.
    pub fn undo(&mut self) -> Vec<HostEffect> {
        if self.note_mut().is_some_and(NoteFile::undo_last_stroke) {
            vec![HostEffect::Persist]
        } else {
            Vec::new()
        }
    }

    /// Grow the active tab when the viewport bottom nears its end.
    pub fn grow_for_viewport(&mut self, viewport_bottom: f64) -> Vec<HostEffect> {
        let grown = self
            .note_mut()
            .and_then(NoteFile::active_tab_mut)
            .is_some_and(|tab| tab.grow_height(viewport_bottom));
        if grown {
            vec![HostEffect::Persist, HostEffect::Resize]
        } else {
            Vec::new()
        }
    }

    /// Feed one pointer event through the engine.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Vec<HostEffect> {
        let commands = {
            let strokes = self
                .fs
                .note(&self.note_id)
                .and_then(NoteFile::active_tab)
                .map_or(&[][..], |tab| tab.strokes.as_slice());
            let height = self.canvas_height();
            let props = CanvasProps::new(strokes, &self.settings, height);
            self.engine.handle_event(event, &props)
        };
        commands.into_iter().filter_map(|c| self.apply(c)).collect()
    }

    /// Advance inertial scrolling by one display frame.
    pub fn tick_frame(&mut self) -> Option<HostEffect> {
        let command = self.engine.tick_frame()?;
        self.apply(command)
    }

    pub fn is_animating(&self) -> bool {
        self.engine.is_animating()
    }

    fn apply(&mut self, command: EngineCommand) -> Option<HostEffect> {
        match command {
            EngineCommand::StrokesChanged(strokes) => {
                let note = self.note_mut()?;
                note.set_active_strokes(strokes);
                Some(HostEffect::Persist)
            }
            EngineCommand::Pan(dy) => Some(HostEffect::ScrollBy(dy)),
            EngineCommand::ScheduleInertia(token) => Some(HostEffect::StartInertia(token)),
        }
    }

    /// Render context for the current state.
    pub fn render_context(&self, width: f64, config: RenderConfig) -> RenderContext<'_> {
        RenderContext::new(self.strokes(), Size::new(width, self.canvas_height()))
            .with_overlay(self.engine.overlay())
            .with_live_style(&self.settings.color, self.settings.width)
            .with_config(config)
    }
}
