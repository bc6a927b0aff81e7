use std::cell::RefCell;
use std::rc::Rc;

use campus_map_shared::schedule::RESIZE_DEBOUNCE_MS;
use campus_map_shared::{Camera, MapSurface, OverlayFilter};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent, PointerEvent,
    WheelEvent,
};

use crate::app::canvas_dimensions;
use crate::assets::{fetch_buildings, load_base_map, load_overlays};
use crate::debounce::Debouncer;
use crate::render_loop::RenderScheduler;
use crate::session::Session;

struct ResizeBinding {
    window: web_sys::Window,
    _handler: Closure<dyn Fn()>,
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

/// CSS `filter` value for an overlay state.
fn filter_css(filter: OverlayFilter) -> String {
    match filter.svg_id() {
        Some(id) => format!("url(#{id})"),
        None => "none".to_string(),
    }
}

/// Canvas 2D drawing target for the map.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` when the browser cannot give us a 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())?;
        Some(Self { canvas, ctx })
    }

    fn resize(&self, width: f64, height: f64) {
        let w = width.round().max(1.0) as u32;
        let h = height.round().max(1.0) as u32;
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
    }

    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }
}

impl MapSurface for CanvasSurface {
    type Image = HtmlImageElement;

    fn reset(&mut self) {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        self.ctx.set_filter("none");
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn apply_camera(&mut self, camera: &Camera) {
        self.ctx.translate(camera.offset_x, camera.offset_y).ok();
        self.ctx.scale(camera.scale, camera.scale).ok();
    }

    fn draw_image(&mut self, image: &HtmlImageElement, filter: OverlayFilter) {
        self.ctx.set_filter(&filter_css(filter));
        if let Err(e) = self
            .ctx
            .draw_image_with_html_image_element(image, 0.0, 0.0)
        {
            web_sys::console::warn_1(&format!("draw failed: {e:?}").into());
        }
        self.ctx.set_filter("none");
    }
}

fn local_coords(canvas: Option<HtmlCanvasElement>, client_x: i32, client_y: i32) -> (f64, f64) {
    match canvas {
        Some(el) => {
            let rect = el.get_bounding_client_rect();
            (client_x as f64 - rect.left(), client_y as f64 - rect.top())
        }
        None => (client_x as f64, client_y as f64),
    }
}

/// Start loading the base map and buildings. Overlays install all at once
/// after every decode has settled.
fn load_assets(session: Session, surface: Rc<RefCell<Option<CanvasSurface>>>) {
    wasm_bindgen_futures::spawn_local(async move {
        match load_base_map().await {
            Ok(image) => {
                let (map_w, map_h) = (image.natural_width() as f64, image.natural_height() as f64);
                let (vw, vh) = surface
                    .borrow()
                    .as_ref()
                    .map(CanvasSurface::size)
                    .unwrap_or_else(canvas_dimensions);
                session.base_map.set_value(Some(image));
                session.dispatch(|c| c.on_base_map_loaded(map_w, map_h, vw, vh));
            }
            Err(err) => {
                web_sys::console::error_1(&format!("base map unavailable: {err}").into());
            }
        }
    });

    wasm_bindgen_futures::spawn_local(async move {
        let buildings = match fetch_buildings().await {
            Ok(buildings) => buildings,
            Err(err) => {
                web_sys::console::error_1(&format!("building dataset unavailable: {err}").into());
                return;
            }
        };
        let batch = load_overlays(buildings).await;
        let Some((report, fx)) = session
            .controller
            .try_update_value(|c| c.install_buildings(batch))
        else {
            return;
        };
        if !report.duplicates.is_empty() {
            web_sys::console::warn_1(
                &format!("duplicate building ids ignored: {}", report.duplicates.join(", ")).into(),
            );
        }
        if !report.failed.is_empty() {
            web_sys::console::warn_1(
                &format!(
                    "{} of {} building overlays failed to load: {}",
                    report.failed.len(),
                    report.installed + report.failed.len(),
                    report.failed.join(", ")
                )
                .into(),
            );
        }
        session.apply(fx);
    });
}

fn bind_window_resize(surface: Rc<RefCell<Option<CanvasSurface>>>, scheduler: Rc<RenderScheduler>) {
    let Some(window) = web_sys::window() else {
        return;
    };

    RESIZE_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            let _ = old
                .window
                .remove_event_listener_with_callback("resize", old._handler.as_ref().unchecked_ref());
        }
    });

    let debouncer: Debouncer<(f64, f64)> = Debouncer::new(RESIZE_DEBOUNCE_MS);
    let handler = Closure::<dyn Fn()>::new(move || {
        let surface = surface.clone();
        let scheduler = scheduler.clone();
        debouncer.schedule(canvas_dimensions(), move |(w, h)| {
            if let Some(s) = surface.borrow().as_ref() {
                s.resize(w, h);
            }
            scheduler.mark_dirty();
        });
    });

    if window
        .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
        .is_ok()
    {
        RESIZE_BINDING.with(|slot| {
            *slot.borrow_mut() = Some(ResizeBinding {
                window: window.clone(),
                _handler: handler,
            });
        });
    }
}

/// Full-window map canvas: pan, zoom, hover and click selection.
#[component]
pub fn MapCanvas() -> impl IntoView {
    let session: Session = expect_context();
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    let surface: Rc<RefCell<Option<CanvasSurface>>> = Rc::new(RefCell::new(None));

    let surface_render = surface.clone();
    let scheduler = Rc::new(RenderScheduler::new(move || {
        let mut slot = surface_render.borrow_mut();
        let Some(surface) = slot.as_mut() else {
            return;
        };
        session.controller.with_value(|controller| {
            session
                .base_map
                .with_value(|base| controller.render(surface, base.as_ref()));
        });
    }));

    // Mount: acquire the 2D context once, then size, bind and load
    let started = Rc::new(std::cell::Cell::new(false));
    Effect::new({
        let surface = surface.clone();
        let scheduler = scheduler.clone();
        move || {
            if started.get() {
                return;
            }
            let Some(canvas_el) = canvas_ref.get() else {
                return;
            };
            started.set(true);

            let canvas: &HtmlCanvasElement = &canvas_el;
            let Some(s) = CanvasSurface::new(canvas.clone()) else {
                web_sys::console::error_1(
                    &"map canvas has no 2D context; the map cannot start".into(),
                );
                return;
            };
            let (w, h) = canvas_dimensions();
            s.resize(w, h);
            *surface.borrow_mut() = Some(s);

            bind_window_resize(surface.clone(), scheduler.clone());
            load_assets(session, surface.clone());
            scheduler.mark_dirty();
        }
    });

    let sched_redraw = scheduler.clone();
    Effect::new(move || {
        session.redraw.track();
        sched_redraw.mark_dirty();
    });

    // --- Input handlers ---

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let (x, y) = local_coords(canvas_ref.get_untracked(), e.client_x(), e.client_y());
        let delta = e.delta_y();
        session.dispatch(|c| c.wheel(delta, x, y));
    };

    // No pointer capture: leaving the canvas must reach `pointer_leave` and end a drag
    let on_pointer_down = move |e: PointerEvent| {
        let (x, y) = local_coords(canvas_ref.get_untracked(), e.client_x(), e.client_y());
        session.dispatch(|c| c.pointer_down(x, y));
    };

    let on_pointer_move = move |e: PointerEvent| {
        let (x, y) = local_coords(canvas_ref.get_untracked(), e.client_x(), e.client_y());
        session.dispatch(|c| c.pointer_move(x, y));
    };

    let on_pointer_up = move |_: PointerEvent| {
        session.dispatch(|c| c.pointer_up());
    };

    let on_pointer_leave = move |_: PointerEvent| {
        session.dispatch(|c| c.pointer_leave());
    };

    let on_click = move |e: MouseEvent| {
        let (x, y) = local_coords(canvas_ref.get_untracked(), e.client_x(), e.client_y());
        session.dispatch(|c| c.click(x, y));
    };

    view! {
        <canvas
            id="canvas"
            node_ref=canvas_ref
            style="position: absolute; inset: 0; display: block; touch-action: none;"
            style:cursor=move || session.cursor.get().css()
            on:wheel=on_wheel
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointerleave=on_pointer_leave
            on:click=on_click
        />
    }
}
