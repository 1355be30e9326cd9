//! DOM wiring for one canvas: pointer events, scrolling, resizing and the
//! inertia frame loop.

use crate::canvas2d::Canvas2dRenderer;
use crate::config::WebConfig;
use crate::error::{WebError, WebResult};
use crate::session::{HostEffect, NoteSession};
use std::cell::RefCell;
use std::rc::Rc;
use vecnote_core::storage::{LocalStorage, Storage};
use vecnote_core::{CancellationToken, FileSystem, Point, PointerEvent, PointerSample, PointerType};
use vecnote_render::Renderer;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, EventTarget, HtmlCanvasElement};

type EventClosure = Closure<dyn FnMut(Event)>;
type FrameClosure = Closure<dyn FnMut(f64)>;

/// An event listener that is removed when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: EventClosure,
}

impl Listener {
    fn new(target: &EventTarget, kind: &'static str, f: impl FnMut(Event) + 'static) -> WebResult<Self> {
        let closure = EventClosure::new(f);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|e| WebError::Js(format!("addEventListener({kind}): {:?}", e)))?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Mutable state shared by all listeners.
pub(crate) struct CanvasState {
    pub(crate) session: NoteSession,
    canvas: HtmlCanvasElement,
    renderer: Canvas2dRenderer,
    config: WebConfig,
}

impl CanvasState {
    /// Match the backing surface to the layout width and the tab height.
    ///
    /// Setting the canvas size clears it, so this always redraws.
    fn resize(&mut self) {
        let height = self.session.canvas_height();
        if let Err(e) = self
            .canvas
            .style()
            .set_property("height", &format!("{height}px"))
        {
            log::warn!("Failed to set canvas height: {:?}", e);
        }
        let width = self.canvas.get_bounding_client_rect().width();
        if width > 0.0 {
            self.canvas.set_width(width as u32);
            self.canvas.set_height(height as u32);
        }
        self.redraw();
    }

    pub(crate) fn redraw(&mut self) {
        let width = f64::from(self.canvas.width());
        if width == 0.0 {
            return;
        }
        let ctx = self.session.render_context(width, self.config.render_config());
        if let Err(e) = self.renderer.build_scene(&ctx) {
            log::error!("Render failed: {e}");
        }
    }

    fn sample(&self, event: &web_sys::PointerEvent) -> PointerSample {
        let rect = self.canvas.get_bounding_client_rect();
        let client_x = f64::from(event.client_x());
        let client_y = f64::from(event.client_y());
        let position = Point::with_pressure(
            client_x - rect.left(),
            client_y - rect.top(),
            f64::from(event.pressure()),
        );
        PointerSample::new(
            event.pointer_id(),
            PointerType::from_dom(&event.pointer_type()),
            position,
            event.time_stamp(),
        )
        .with_client_y(client_y)
    }

    fn scroll_by(&self, dy: f64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let container = self
            .config
            .scroll_container_id
            .as_deref()
            .and_then(|id| window.document()?.get_element_by_id(id));
        match container {
            Some(element) => element.scroll_by_with_x_and_y(0.0, dy),
            None => window.scroll_by_with_x_and_y(0.0, dy),
        }
    }

    /// Canvas-local y of the bottom edge of the visible area.
    fn viewport_bottom(&self) -> Option<f64> {
        let window = web_sys::window()?;
        let visible_bottom = match self.config.scroll_container_id.as_deref() {
            Some(id) => window
                .document()?
                .get_element_by_id(id)?
                .get_bounding_client_rect()
                .bottom(),
            None => window.inner_height().ok()?.as_f64()?,
        };
        Some(visible_bottom - self.canvas.get_bounding_client_rect().top())
    }
}

/// Save the file system in the background.
fn persist(file_system: FileSystem, key: String) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = LocalStorage::new().save(&key, &file_system).await {
            log::error!("Failed to save notes: {e}");
        }
    });
}

/// Carry out session effects.
pub(crate) fn apply_effects(state: &Rc<RefCell<CanvasState>>, effects: Vec<HostEffect>) {
    for effect in effects {
        match effect {
            HostEffect::Persist => {
                let s = state.borrow();
                persist(s.session.file_system().clone(), s.config.storage_key.clone());
            }
            HostEffect::ScrollBy(dy) => state.borrow().scroll_by(dy),
            HostEffect::StartInertia(token) => start_inertia(state.clone(), token),
            HostEffect::Resize => state.borrow_mut().resize(),
        }
    }
}

/// Tick the session once per animation frame until the token is cancelled
/// or the scroll comes to rest.
fn start_inertia(state: Rc<RefCell<CanvasState>>, token: CancellationToken) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let holder: Rc<RefCell<Option<FrameClosure>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let window_for_cb = window.clone();

    let cb = FrameClosure::new(move |_ts: f64| {
        let effect = if token.is_cancelled() {
            None
        } else {
            state.borrow_mut().session.tick_frame()
        };
        let Some(effect) = effect else {
            holder_for_cb.borrow_mut().take();
            return;
        };
        apply_effects(&state, vec![effect]);

        let scheduled = holder_for_cb.borrow().as_ref().is_some_and(|cb| {
            window_for_cb
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .is_ok()
        });
        if !scheduled {
            token.cancel();
            holder_for_cb.borrow_mut().take();
        }
    });

    if window.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok() {
        *holder.borrow_mut() = Some(cb);
    } else {
        log::warn!("requestAnimationFrame unavailable; inertia skipped");
    }
}

/// A mounted canvas. Dropping it detaches every listener.
pub struct WebCanvas {
    state: Rc<RefCell<CanvasState>>,
    _listeners: Vec<Listener>,
}

impl WebCanvas {
    /// Mount on the configured canvas element.
    pub fn mount(config: WebConfig, file_system: FileSystem) -> WebResult<Self> {
        let window = web_sys::window().ok_or_else(|| WebError::MissingElement("window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| WebError::MissingElement("document".to_string()))?;
        let canvas = document
            .get_element_by_id(&config.canvas_id)
            .ok_or_else(|| WebError::MissingElement(config.canvas_id.clone()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| WebError::MissingElement(format!("{} is not a canvas", config.canvas_id)))?;
        if let Err(e) = canvas.style().set_property("touch-action", "none") {
            log::warn!("Failed to disable touch actions: {:?}", e);
        }

        let renderer = Canvas2dRenderer::new(&canvas)?;
        let session = NoteSession::new(file_system, config.engine.clone());
        let scroll_target: EventTarget = match config.scroll_container_id.as_deref() {
            Some(id) => document
                .get_element_by_id(id)
                .ok_or_else(|| WebError::MissingElement(id.to_string()))?
                .into(),
            None => window.clone().into(),
        };

        let state = Rc::new(RefCell::new(CanvasState {
            session,
            canvas: canvas.clone(),
            renderer,
            config,
        }));

        let mut listeners = Vec::new();
        for kind in ["pointerdown", "pointermove", "pointerup", "pointercancel"] {
            let state = Rc::clone(&state);
            listeners.push(Listener::new(&canvas, kind, move |event: Event| {
                if let Ok(event) = event.dyn_into::<web_sys::PointerEvent>() {
                    on_pointer(&state, kind, &event);
                }
            })?);
        }
        {
            let state = Rc::clone(&state);
            listeners.push(Listener::new(&window, "resize", move |_| {
                state.borrow_mut().resize();
            })?);
        }
        {
            let state = Rc::clone(&state);
            listeners.push(Listener::new(&scroll_target, "scroll", move |_| {
                let effects = {
                    let mut s = state.borrow_mut();
                    match s.viewport_bottom() {
                        Some(bottom) => s.session.grow_for_viewport(bottom),
                        None => Vec::new(),
                    }
                };
                apply_effects(&state, effects);
            })?);
        }

        state.borrow_mut().resize();
        log::info!("Canvas mounted");
        Ok(Self {
            state,
            _listeners: listeners,
        })
    }

    pub(crate) fn state(&self) -> &Rc<RefCell<CanvasState>> {
        &self.state
    }
}

fn on_pointer(state: &Rc<RefCell<CanvasState>>, kind: &str, event: &web_sys::PointerEvent) {
    event.prevent_default();
    let sample = state.borrow().sample(event);
    let canvas = state.borrow().canvas.clone();

    let pointer_event = match kind {
        "pointerdown" => {
            if let Err(e) = canvas.set_pointer_capture(sample.pointer_id) {
                log::debug!("setPointerCapture failed: {:?}", e);
            }
            PointerEvent::Down(sample)
        }
        "pointermove" => PointerEvent::Move(sample),
        "pointerup" => PointerEvent::Up(sample),
        _ => PointerEvent::Cancel(sample),
    };
    if pointer_event.is_release() && canvas.has_pointer_capture(sample.pointer_id) {
        let _ = canvas.release_pointer_capture(sample.pointer_id);
    }

    let effects = state.borrow_mut().session.handle_pointer(&pointer_event);
    apply_effects(state, effects);
    state.borrow_mut().redraw();
}
