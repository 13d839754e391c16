//! Browser host
//!
//! Mounts a star field into a container element: a fixed full-window canvas for
//! the lines, one `div.star` marker per star, window `resize` and `mousemove`
//! listeners, and a `requestAnimationFrame` loop. Everything is torn down when
//! the returned [`StopHandle`] is stopped or dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, MouseEvent,
    Window,
};

use crate::field::StarField;
use crate::renderer::DrawingSurface;
use crate::renderer::canvas::context_2d;
use crate::scheduler::{FrameScheduler, StopHandle};
use crate::settings::Settings;
use crate::viewport::Viewport;

/// Window inner size in CSS pixels
pub fn window_viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32;
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// Everything the listeners and the frame callback share
struct Host {
    field: StarField,
    document: Document,
    container: Element,
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
    markers: Vec<HtmlElement>,
    marker_generation: u64,
}

impl Host {
    fn frame(&mut self, scheduler: &FrameScheduler) -> bool {
        let surface = self.ctx.as_mut().map(|c| c as &mut dyn DrawingSurface);
        if !scheduler.run_frame(&mut self.field, surface) {
            return false;
        }
        self.place_markers();
        true
    }

    fn pointer_moved(&mut self, position: Vec2) {
        let surface = self.ctx.as_mut().map(|c| c as &mut dyn DrawingSurface);
        self.field.on_pointer_move(position, surface);
    }

    fn resized(&mut self, viewport: Viewport) {
        self.canvas.set_width(viewport.width);
        self.canvas.set_height(viewport.height);
        if self.field.on_resize(viewport) {
            if let Err(e) = self.rebuild_markers() {
                log::warn!("Could not rebuild star markers: {:?}", e);
            }
        }
    }

    /// Recreate marker elements if the star set was replaced
    fn rebuild_markers(&mut self) -> Result<(), JsValue> {
        if self.marker_generation == self.field.generation() && !self.markers.is_empty() {
            return Ok(());
        }
        for marker in self.markers.drain(..) {
            marker.remove();
        }
        for star in self.field.markers() {
            let el: HtmlElement = self.document.create_element("div")?.dyn_into()?;
            el.set_class_name("star");
            let style = el.style();
            style.set_property("width", &format!("{}px", star.size))?;
            style.set_property("height", &format!("{}px", star.size))?;
            style.set_property("left", &format!("{}%", star.anchor.x))?;
            style.set_property("top", &format!("{}%", star.anchor.y))?;
            style.set_property("animation-delay", &format!("{}s", star.twinkle_delay))?;
            style.set_property("animation-duration", &format!("{}s", star.twinkle_duration))?;
            self.container.append_child(&el)?;
            self.markers.push(el);
        }
        self.marker_generation = self.field.generation();
        log::debug!("Built {} star markers", self.markers.len());
        Ok(())
    }

    fn place_markers(&self) {
        for (el, star) in self.markers.iter().zip(self.field.markers()) {
            let transform = format!("translate({}px, {}px)", star.offset.x, star.offset.y);
            let _ = el.style().set_property("transform", &transform);
        }
    }
}

fn create_lines_canvas(document: &Document, viewport: Viewport) -> Result<HtmlCanvasElement, JsValue> {
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_class_name("star-lines");
    canvas.set_width(viewport.width);
    canvas.set_height(viewport.height);

    let style = canvas.style();
    style.set_property("position", "fixed")?;
    style.set_property("top", "0")?;
    style.set_property("left", "0")?;
    style.set_property("pointer-events", "none")?;
    style.set_property("z-index", "1")?;
    Ok(canvas)
}

/// Mount a star field into `container` and start animating it
pub fn mount(container: Element, settings: Settings) -> Result<StopHandle, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    container.set_inner_html("");
    let viewport = window_viewport(&window);
    let canvas = create_lines_canvas(&document, viewport)?;
    container.append_child(&canvas)?;

    let ctx = context_2d(&canvas);
    if ctx.is_none() {
        log::warn!("2D canvas context unavailable; lines will not be drawn");
    }

    let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
    let field = StarField::new(settings, viewport, seed);
    log::info!(
        "Star field mounted: {} stars, {}x{}, seed {}",
        field.particles().len(),
        viewport.width,
        viewport.height,
        seed
    );

    let host = Rc::new(RefCell::new(Host {
        field,
        document,
        container,
        canvas,
        ctx,
        markers: Vec::new(),
        marker_generation: 0,
    }));
    host.borrow_mut().rebuild_markers()?;

    let scheduler = FrameScheduler::new();
    let mut handle = scheduler.start();

    wire_resize(&window, host.clone(), &mut handle)?;
    wire_pointer(&window, host.clone(), &mut handle)?;
    start_animation_frames(&window, host, scheduler, &mut handle)?;

    Ok(handle)
}

fn wire_resize(window: &Window, host: Rc<RefCell<Host>>, handle: &mut StopHandle) -> Result<(), JsValue> {
    let win = window.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        host.borrow_mut().resized(window_viewport(&win));
    });
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;

    let win = window.clone();
    handle.on_stop(move || {
        let _ = win.remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    });
    Ok(())
}

fn wire_pointer(window: &Window, host: Rc<RefCell<Host>>, handle: &mut StopHandle) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
        let position = Vec2::new(event.client_x() as f32, event.client_y() as f32);
        host.borrow_mut().pointer_moved(position);
    });
    window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;

    let win = window.clone();
    handle.on_stop(move || {
        let _ = win.remove_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
    });
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_animation_frames(
    window: &Window,
    host: Rc<RefCell<Host>>,
    scheduler: FrameScheduler,
    handle: &mut StopHandle,
) -> Result<(), JsValue> {
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let frame_id = Rc::new(Cell::new(0));

    {
        let rearm_with = callback.clone();
        let frame_id = frame_id.clone();
        let win = window.clone();
        *callback.borrow_mut() = Some(Closure::new(move |_time: f64| {
            if !host.borrow_mut().frame(&scheduler) {
                return;
            }
            if let Some(cb) = rearm_with.borrow().as_ref() {
                match win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => frame_id.set(id),
                    Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
                }
            }
        }));
    }

    if let Some(cb) = callback.borrow().as_ref() {
        frame_id.set(window.request_animation_frame(cb.as_ref().unchecked_ref())?);
    }

    let win = window.clone();
    handle.on_stop(move || {
        let _ = win.cancel_animation_frame(frame_id.get());
        // Breaks the callback's self-reference so it can be freed
        callback.borrow_mut().take();
    });
    Ok(())
}
