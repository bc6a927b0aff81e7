use campus_map_shared::schedule::PANEL_SHOW_DEBOUNCE_MS;
use campus_map_shared::{
    Building, Cursor, Effects, ImageCache, InfoPanel, MapController, PanelCommand, PhotoRequest,
};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlImageElement;

use crate::assets::{load_image, sample_accent};
use crate::debounce::Debouncer;
use crate::info_panel::PanelModel;

pub(crate) type Controller = MapController<HtmlImageElement>;

/// Per-page session state, shared through context. All handles are `Copy`.
#[derive(Clone, Copy)]
pub(crate) struct Session {
    pub controller: StoredValue<Controller, LocalStorage>,
    pub base_map: StoredValue<Option<HtmlImageElement>, LocalStorage>,
    photos: StoredValue<ImageCache<HtmlImageElement>, LocalStorage>,
    panel: StoredValue<InfoPanel>,
    show_debounce: StoredValue<Debouncer<Building>, LocalStorage>,
    pub view: PanelModel,
    /// Bumped whenever the map needs a repaint; the canvas coalesces these per frame.
    pub redraw: RwSignal<u64>,
    pub cursor: RwSignal<Cursor>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            controller: StoredValue::new_local(MapController::new()),
            base_map: StoredValue::new_local(None),
            photos: StoredValue::new_local(ImageCache::new()),
            panel: StoredValue::new(InfoPanel::default()),
            show_debounce: StoredValue::new_local(Debouncer::new(PANEL_SHOW_DEBOUNCE_MS)),
            view: PanelModel::new(),
            redraw: RwSignal::new(0),
            cursor: RwSignal::new(Cursor::Default),
        }
    }

    /// Run a controller operation and carry out its effects.
    pub fn dispatch(self, op: impl FnOnce(&mut Controller) -> Effects) {
        if let Some(fx) = self.controller.try_update_value(op) {
            self.apply(fx);
        }
    }

    pub fn apply(self, fx: Effects) {
        if fx.render {
            self.request_redraw();
        }
        if let Some(cursor) = fx.cursor {
            self.cursor.set(cursor);
        }
        match fx.panel {
            Some(PanelCommand::Show(building)) => self.schedule_show(building),
            Some(PanelCommand::Hide) => self.hide_panel(),
            None => {}
        }
    }

    pub fn request_redraw(self) {
        self.redraw.update(|n| *n = n.wrapping_add(1));
    }

    /// Exit control and Escape: hide the panel and clear the selection.
    pub fn close_panel(self) {
        self.hide_panel();
        self.dispatch(|c| {
            let fx = c.deselect();
            Effects { panel: None, ..fx }
        });
    }

    pub fn toggle_panel(self) {
        let mut view = self.view;
        self.panel.update_value(|panel| {
            panel.toggle(&mut view);
        });
    }

    pub fn handle_key(self, key: &str) {
        if self
            .panel
            .with_value(|panel| panel.closes_on_key(key))
        {
            self.close_panel();
        }
    }

    fn hide_panel(self) {
        self.show_debounce.with_value(Debouncer::cancel);
        let mut view = self.view;
        self.panel.update_value(|panel| panel.hide(&mut view));
    }

    fn schedule_show(self, building: Building) {
        let debouncer = self.show_debounce.with_value(Clone::clone);
        debouncer.schedule(building, move |building| self.show_now(&building));
    }

    fn show_now(self, building: &Building) {
        let mut view = self.view;
        let request = self.panel.try_update_value(|panel| {
            self.photos
                .try_update_value(|cache| panel.show(&mut view, building, cache, sample_accent))
        });
        if let Some(Some(PhotoRequest::Load(src))) = request {
            self.load_photo(src);
        }
    }

    fn load_photo(self, src: String) {
        spawn_local(async move {
            let result = load_image(&src).await;
            if let Err(err) = &result {
                web_sys::console::warn_1(&format!("photo unavailable: {err}").into());
            }
            self.photos.update_value(|cache| {
                cache.complete(&src, result);
            });
            let mut view = self.view;
            self.panel.update_value(|panel| {
                self.photos.update_value(|cache| {
                    panel.photo_settled(&mut view, &src, cache, sample_accent);
                });
            });
        });
    }
}
