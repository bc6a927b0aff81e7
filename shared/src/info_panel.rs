use crate::building::{Building, NO_IMAGE_SRC, map_search_url};
use crate::colors::{AccentError, NEUTRAL_GRADIENT, Rgb, accent_gradient};
use crate::image_cache::{ImageCache, LoadState, Preload};

/// Addressable parts of the info panel view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelSlot {
    Panel,
    TriggerButton,
    Title,
    Address,
    Description,
    Accessibility,
    SecondaryInfo,
}

/// Capabilities the panel controller needs from a UI toolkit.
pub trait PanelView {
    fn set_text(&mut self, slot: PanelSlot, text: &str);
    fn set_visible(&mut self, slot: PanelSlot, visible: bool);
    fn set_link(&mut self, slot: PanelSlot, href: &str);
    fn set_image_source(&mut self, src: &str);
    fn set_background(&mut self, css: &str);
}

/// What the caller must do after `show`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoRequest {
    /// Start the single decode for this path, then report back through `photo_settled`.
    Load(String),
    /// A decode for this path is already in flight; wait for its `photo_settled`.
    Wait(String),
    /// The photo was already settled and has been applied.
    Applied,
}

/// Info panel controller. Owns only what is shown, never the building data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoPanel {
    open: bool,
    building_id: Option<String>,
    awaiting_photo: Option<String>,
}

impl InfoPanel {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Id of the building whose details are currently rendered.
    pub fn building_id(&self) -> Option<&str> {
        self.building_id.as_deref()
    }

    pub fn awaiting_photo(&self) -> Option<&str> {
        self.awaiting_photo.as_deref()
    }

    /// Render a building and request its photo. Text is populated and the panel
    /// is visible with a neutral background before the photo settles.
    pub fn show<I>(
        &mut self,
        view: &mut impl PanelView,
        building: &Building,
        cache: &mut ImageCache<I>,
        sampler: impl FnOnce(&I) -> Result<Rgb, AccentError>,
    ) -> PhotoRequest {
        render_details(view, building);
        self.open_view(view);
        view.set_background(NEUTRAL_GRADIENT);
        self.building_id = Some(building.id.clone());

        let src = building.photo_src();
        match cache.preload(&src) {
            Preload::Started => {
                self.await_photo(view, &src);
                PhotoRequest::Load(src)
            }
            Preload::Cached => {
                let settled = cache
                    .entry(&src)
                    .is_some_and(|e| !matches!(e.state(), LoadState::Pending));
                if settled {
                    self.awaiting_photo = None;
                    apply_photo(view, &src, cache, sampler);
                    PhotoRequest::Applied
                } else {
                    self.await_photo(view, &src);
                    PhotoRequest::Wait(src)
                }
            }
        }
    }

    /// A photo decode finished (already recorded in `cache`). Applied only if the
    /// panel is still waiting for this path; returns whether it was applied.
    pub fn photo_settled<I>(
        &mut self,
        view: &mut impl PanelView,
        src: &str,
        cache: &mut ImageCache<I>,
        sampler: impl FnOnce(&I) -> Result<Rgb, AccentError>,
    ) -> bool {
        if self.awaiting_photo.as_deref() != Some(src) {
            return false;
        }
        self.awaiting_photo = None;
        apply_photo(view, src, cache, sampler);
        true
    }

    /// Hide the panel and restore the trigger button. Deselection is the caller's job.
    pub fn hide(&mut self, view: &mut impl PanelView) {
        self.open = false;
        view.set_visible(PanelSlot::Panel, false);
        view.set_visible(PanelSlot::TriggerButton, true);
    }

    /// Trigger button: open with whatever is rendered, or close. Returns the new open state.
    pub fn toggle(&mut self, view: &mut impl PanelView) -> bool {
        if self.open {
            self.hide(view);
        } else {
            self.open_view(view);
        }
        self.open
    }

    /// Escape closes an open panel from any focus context.
    pub fn closes_on_key(&self, key: &str) -> bool {
        self.open && key == "Escape"
    }

    /// Placeholder until `src` settles, so a previous building's photo never lingers.
    fn await_photo(&mut self, view: &mut impl PanelView, src: &str) {
        self.awaiting_photo = Some(src.to_string());
        view.set_image_source(NO_IMAGE_SRC);
    }

    fn open_view(&mut self, view: &mut impl PanelView) {
        self.open = true;
        view.set_visible(PanelSlot::TriggerButton, false);
        view.set_visible(PanelSlot::Panel, true);
    }
}

fn render_details(view: &mut impl PanelView, building: &Building) {
    view.set_text(PanelSlot::Title, &building.display_name);

    let blocks = [
        (PanelSlot::Address, &building.address),
        (PanelSlot::Description, &building.description),
        (PanelSlot::Accessibility, &building.accessibility),
        (PanelSlot::SecondaryInfo, &building.secondary_info),
    ];
    for (slot, text) in blocks {
        if text.is_empty() {
            view.set_visible(slot, false);
            continue;
        }
        view.set_visible(slot, true);
        view.set_text(slot, text);
        if slot == PanelSlot::Address {
            view.set_link(slot, &map_search_url(text));
        }
    }
}

fn apply_photo<I>(
    view: &mut impl PanelView,
    src: &str,
    cache: &mut ImageCache<I>,
    sampler: impl FnOnce(&I) -> Result<Rgb, AccentError>,
) {
    let ready = cache
        .entry(src)
        .is_some_and(|e| matches!(e.state(), LoadState::Ready(_)));
    if !ready {
        view.set_image_source(NO_IMAGE_SRC);
        view.set_background(NEUTRAL_GRADIENT);
        return;
    }

    view.set_image_source(src);
    match cache.accent_color(src, sampler) {
        Ok(color) => view.set_background(&accent_gradient(color)),
        Err(_) => view.set_background(NEUTRAL_GRADIENT),
    }
}


#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::test_support::FakeView;
    use super::*;
    use crate::colors::extract_accent_color;
    use crate::image_cache::LoadError;

    fn buxton() -> Building {
        Building {
            id: "buxton-hall".into(),
            display_name: "Buxton Hall".into(),
            address: "310 SW Weatherford Place".into(),
            accessibility: "Elevator at the north entrance".into(),
            secondary_info: String::new(),
            ..Building::default()
        }
    }

    fn no_sample(_: &RgbaImage) -> Result<Rgb, AccentError> {
        panic!("sampler should not run")
    }

    #[test]
    fn show_renders_present_blocks_and_hides_empty_ones() {
        let mut panel = InfoPanel::default();
        let mut view = FakeView::default();
        let mut cache: ImageCache<RgbaImage> = ImageCache::new();

        let req = panel.show(&mut view, &buxton(), &mut cache, no_sample);

        assert_eq!(req, PhotoRequest::Load("style/images/buildings/buxton-hall.jpg".into()));
        assert!(panel.is_open());
        assert!(view.is_visible(PanelSlot::Panel));
        assert!(!view.is_visible(PanelSlot::TriggerButton));
        assert_eq!(view.text[&PanelSlot::Title], "Buxton Hall");

        assert!(view.is_visible(PanelSlot::Address));
        assert_eq!(view.text[&PanelSlot::Address], "310 SW Weatherford Place");
        assert!(view.links[&PanelSlot::Address].contains("310 SW Weatherford Place"));

        assert!(view.is_visible(PanelSlot::Accessibility));
        assert!(!view.is_visible(PanelSlot::Description));
        assert!(!view.is_visible(PanelSlot::SecondaryInfo));
        assert!(!view.text.contains_key(&PanelSlot::SecondaryInfo));

        // Neutral background while the photo is pending
        assert_eq!(view.background.as_deref(), Some(NEUTRAL_GRADIENT));
        assert_eq!(view.image.as_deref(), Some(NO_IMAGE_SRC));
    }

    #[test]
    fn missing_photo_falls_back_to_placeholder() {
        let mut panel = InfoPanel::default();
        let mut view = FakeView::default();
        let mut cache: ImageCache<RgbaImage> = ImageCache::new();

        let PhotoRequest::Load(src) = panel.show(&mut view, &buxton(), &mut cache, no_sample)
        else {
            panic!("first show must start a load");
        };
        cache.complete(&src, Err(LoadError("HTTP 404".into())));
        assert!(panel.photo_settled(&mut view, &src, &mut cache, no_sample));

        assert_eq!(view.image.as_deref(), Some(NO_IMAGE_SRC));
        assert_eq!(view.background.as_deref(), Some(NEUTRAL_GRADIENT));
        assert!(view.is_visible(PanelSlot::Panel));
    }

    #[test]
    fn loaded_photo_applies_accent_gradient() {
        let mut panel = InfoPanel::default();
        let mut view = FakeView::default();
        let mut cache = ImageCache::new();

        let PhotoRequest::Load(src) = panel.show(&mut view, &buxton(), &mut cache, no_sample)
        else {
            panic!("first show must start a load");
        };
        let photo = RgbaImage::from_pixel(30, 20, Rgba([200, 60, 20, 255]));
        cache.complete(&src, Ok(photo));
        panel.photo_settled(&mut view, &src, &mut cache, extract_accent_color);

        assert_eq!(view.image.as_deref(), Some(src.as_str()));
        assert_eq!(
            view.background.as_deref(),
            Some("linear-gradient(to bottom, rgb(200,60,20), #121211)")
        );
    }

    #[test]
    fn dull_photo_keeps_neutral_background() {
        let mut panel = InfoPanel::default();
        let mut view = FakeView::default();
        let mut cache = ImageCache::new();

        let PhotoRequest::Load(src) = panel.show(&mut view, &buxton(), &mut cache, no_sample)
        else {
            panic!("first show must start a load");
        };
        cache.complete(&src, Ok(RgbaImage::from_pixel(10, 10, Rgba([50, 50, 50, 255]))));
        panel.photo_settled(&mut view, &src, &mut cache, extract_accent_color);

        assert_eq!(view.image.as_deref(), Some(src.as_str()));
        assert_eq!(view.background.as_deref(), Some(NEUTRAL_GRADIENT));
    }

    #[test]
    fn cached_photo_applies_immediately_without_resampling() {
        let mut panel = InfoPanel::default();
        let mut view = FakeView::default();
        let mut cache = ImageCache::new();
        let src = buxton().photo_src();
        cache.preload(&src);
        cache.complete(&src, Ok(RgbaImage::from_pixel(10, 10, Rgba([20, 180, 60, 255]))));

        assert_eq!(
            panel.show(&mut view, &buxton(), &mut cache, extract_accent_color),
            PhotoRequest::Applied
        );
        assert_eq!(
            panel.show(&mut view, &buxton(), &mut cache, no_sample),
            PhotoRequest::Applied
        );
        assert_eq!(cache.entry(&src).map(|e| e.samples()), Some(1));
        assert_eq!(
            view.background.as_deref(),
            Some("linear-gradient(to bottom, rgb(20,180,60), #121211)")
        );
    }

    #[test]
    fn stale_photo_for_superseded_building_is_ignored() {
        let mut panel = InfoPanel::default();
        let mut view = FakeView::default();
        let mut cache: ImageCache<RgbaImage> = ImageCache::new();
        let other = Building {
            id: "kec".into(),
            display_name: "Kelley Engineering Center".into(),
            ..Building::default()
        };

        let PhotoRequest::Load(first) = panel.show(&mut view, &buxton(), &mut cache, no_sample)
        else {
            panic!("first show must start a load");
        };
        panel.show(&mut view, &other, &mut cache, no_sample);
        let sets_before = view.image_sets;

        cache.complete(&first, Err(LoadError("late".into())));
        assert!(!panel.photo_settled(&mut view, &first, &mut cache, no_sample));
        assert_eq!(view.image_sets, sets_before);
        assert_eq!(panel.building_id(), Some("kec"));
        assert_eq!(view.text[&PanelSlot::Title], "Kelley Engineering Center");
    }

    #[test]
    fn pending_photo_replaces_previous_buildings_image() {
        let mut panel = InfoPanel::default();
        let mut view = FakeView::default();
        let mut cache = ImageCache::new();
        let kec = Building {
            id: "kec".into(),
            display_name: "KEC".into(),
            ..Building::default()
        };

        let PhotoRequest::Load(first) = panel.show(&mut view, &buxton(), &mut cache, no_sample)
        else {
            panic!("first show must start a load");
        };
        cache.complete(&first, Ok(RgbaImage::from_pixel(10, 10, Rgba([200, 60, 20, 255]))));
        panel.photo_settled(&mut view, &first, &mut cache, extract_accent_color);
        assert_eq!(view.image.as_deref(), Some(first.as_str()));

        let req = panel.show(&mut view, &kec, &mut cache, no_sample);
        assert_eq!(req, PhotoRequest::Load(kec.photo_src()));
        assert_eq!(view.text[&PanelSlot::Title], "KEC");
        assert_eq!(view.image.as_deref(), Some(NO_IMAGE_SRC));
        assert_eq!(view.background.as_deref(), Some(NEUTRAL_GRADIENT));

        // Waiting on an in-flight decode also drops the stale photo
        panel.show(&mut view, &buxton(), &mut cache, extract_accent_color);
        assert_eq!(view.image.as_deref(), Some(first.as_str()));
        assert_eq!(
            panel.show(&mut view, &kec, &mut cache, no_sample),
            PhotoRequest::Wait(kec.photo_src())
        );
        assert_eq!(view.image.as_deref(), Some(NO_IMAGE_SRC));
    }

    #[test]
    fn in_flight_photo_is_awaited_not_reloaded() {
        let mut panel = InfoPanel::default();
        let mut view = FakeView::default();
        let mut cache: ImageCache<RgbaImage> = ImageCache::new();

        panel.show(&mut view, &buxton(), &mut cache, no_sample);
        let again = panel.show(&mut view, &buxton(), &mut cache, no_sample);
        assert_eq!(again, PhotoRequest::Wait(buxton().photo_src()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn hide_restores_trigger_and_escape_only_when_open() {
        let mut panel = InfoPanel::default();
        let mut view = FakeView::default();
        let mut cache: ImageCache<RgbaImage> = ImageCache::new();
        assert!(!panel.closes_on_key("Escape"));

        panel.show(&mut view, &buxton(), &mut cache, no_sample);
        assert!(panel.closes_on_key("Escape"));
        assert!(!panel.closes_on_key("Enter"));

        panel.hide(&mut view);
        assert!(!panel.is_open());
        assert!(!view.is_visible(PanelSlot::Panel));
        assert!(view.is_visible(PanelSlot::TriggerButton));
    }

    #[test]
    fn trigger_button_toggles_visibility() {
        let mut panel = InfoPanel::default();
        let mut view = FakeView::default();
        assert!(panel.toggle(&mut view));
        assert!(view.is_visible(PanelSlot::Panel));
        assert!(!panel.toggle(&mut view));
        assert!(!view.is_visible(PanelSlot::Panel));
    }
}
