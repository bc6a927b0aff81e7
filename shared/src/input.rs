use crate::building::Building;
use crate::camera::{Camera, ZoomDirection};
use crate::render::{MapSurface, render_scene};
use crate::scene::{BuildingScene, InstallReport, OverlayLoad};
use crate::selection::Selection;

/// Pointer travel (device pixels) beyond which a press counts as a drag, not a click.
pub const CLICK_SLOP_PX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
    Grabbing,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Pointer => "pointer",
            Self::Grabbing => "grabbing",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    Show(Building),
    Hide,
}

/// Side effects the host must carry out after an input event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    /// Request a redraw; the host coalesces requests per animation frame.
    pub render: bool,
    pub cursor: Option<Cursor>,
    pub panel: Option<PanelCommand>,
}

impl Effects {
    fn none() -> Self {
        Self::default()
    }

    fn redraw() -> Self {
        Self {
            render: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        start_x: f64,
        start_y: f64,
        last_x: f64,
        last_y: f64,
        travelled: bool,
    },
}

/// Input/camera controller: owns the camera, the building scene and the
/// selection, and turns pointer, wheel and click events into state changes.
#[derive(Debug)]
pub struct MapController<I> {
    camera: Camera,
    scene: BuildingScene<I>,
    selection: Selection,
    drag: DragState,
    suppress_click: bool,
    centered: bool,
}

impl<I> Default for MapController<I> {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            scene: BuildingScene::new(),
            selection: Selection::default(),
            drag: DragState::Idle,
            suppress_click: false,
            centered: false,
        }
    }
}

impl<I> MapController<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &BuildingScene<I> {
        &self.scene
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Center the base map in the viewport. Only the first call has an effect.
    pub fn on_base_map_loaded(
        &mut self,
        map_w: f64,
        map_h: f64,
        viewport_w: f64,
        viewport_h: f64,
    ) -> Effects {
        if self.centered {
            return Effects::none();
        }
        self.centered = true;
        self.camera.center_content(map_w, map_h, viewport_w, viewport_h);
        Effects::redraw()
    }

    /// Install every overlay outcome at once; the first full render follows.
    pub fn install_buildings(
        &mut self,
        batch: impl IntoIterator<Item = (Building, OverlayLoad<I>)>,
    ) -> (InstallReport, Effects) {
        let report = self.scene.install(batch);
        (report, Effects::redraw())
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Effects {
        self.drag = DragState::Dragging {
            start_x: x,
            start_y: y,
            last_x: x,
            last_y: y,
            travelled: false,
        };
        self.suppress_click = false;
        Effects {
            cursor: Some(Cursor::Grabbing),
            ..Effects::none()
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Effects {
        if let DragState::Dragging {
            start_x,
            start_y,
            last_x,
            last_y,
            travelled,
        } = &mut self.drag
        {
            self.camera.pan(x - *last_x, y - *last_y);
            *last_x = x;
            *last_y = y;
            if (x - *start_x).abs() > CLICK_SLOP_PX || (y - *start_y).abs() > CLICK_SLOP_PX {
                *travelled = true;
            }
            return Effects {
                render: true,
                cursor: Some(Cursor::Grabbing),
                panel: None,
            };
        }

        let (mx, my) = self.camera.screen_to_map(x, y);
        let hit = self.scene.hit_test(mx, my);
        let changed = self.selection.set_hovering(hit);
        Effects {
            render: changed,
            cursor: Some(self.hover_cursor()),
            panel: None,
        }
    }

    pub fn pointer_up(&mut self) -> Effects {
        self.end_drag()
    }

    /// Leaving the canvas ends any drag and clears the hover highlight.
    pub fn pointer_leave(&mut self) -> Effects {
        let mut fx = self.end_drag();
        if self.selection.set_hovering(None) {
            fx.render = true;
        }
        fx.cursor = Some(Cursor::Default);
        fx
    }

    pub fn wheel(&mut self, delta_y: f64, x: f64, y: f64) -> Effects {
        let Some(direction) = ZoomDirection::from_wheel_delta(delta_y) else {
            return Effects::none();
        };
        if self.camera.zoom_at(direction, x, y) {
            Effects::redraw()
        } else {
            Effects::none()
        }
    }

    /// Click at device coordinates. Ignored when it ends a drag.
    pub fn click(&mut self, x: f64, y: f64) -> Effects {
        if std::mem::take(&mut self.suppress_click) {
            return Effects::none();
        }
        let (mx, my) = self.camera.screen_to_map(x, y);
        let hit = self.scene.hit_test(mx, my).map(str::to_string);
        match hit {
            Some(id) => {
                self.selection.select_id(&mut self.scene, &id);
                let panel = self
                    .scene
                    .get(&id)
                    .map(|rb| PanelCommand::Show(rb.building.clone()));
                Effects {
                    render: true,
                    cursor: None,
                    panel,
                }
            }
            None => {
                let mut fx = self.deselect();
                fx.render = true;
                fx
            }
        }
    }

    pub fn select_id(&mut self, id: &str) -> Effects {
        if self.selection.select_id(&mut self.scene, id) {
            Effects::redraw()
        } else {
            Effects::none()
        }
    }

    /// Clear the selection and hide the panel. A no-op when nothing is selected.
    pub fn deselect(&mut self) -> Effects {
        if !self.selection.deselect(&mut self.scene) {
            return Effects::none();
        }
        Effects {
            render: true,
            cursor: None,
            panel: Some(PanelCommand::Hide),
        }
    }

    pub fn render<S>(&self, surface: &mut S, base_map: Option<&I>)
    where
        S: MapSurface<Image = I>,
    {
        render_scene(surface, base_map, &self.scene, &self.camera, &self.selection);
    }

    fn end_drag(&mut self) -> Effects {
        let DragState::Dragging { travelled, .. } = self.drag else {
            return Effects::none();
        };
        self.drag = DragState::Idle;
        self.suppress_click = travelled;
        Effects {
            cursor: Some(self.hover_cursor()),
            ..Effects::none()
        }
    }

    fn hover_cursor(&self) -> Cursor {
        if self.selection.hovering().is_some() {
            Cursor::Pointer
        } else {
            Cursor::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{MAX_SCALE, MIN_SCALE};
    use crate::render::OverlayFilter;
    use crate::render::test_support::{Op, RecordingSurface};
    use crate::scene::test_support::{building, square_mask};

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    /// "a" covers map [2,6) and "b" covers map [12,16) on a 20px grid.
    fn controller() -> MapController<&'static str> {
        let mut c = MapController::new();
        c.install_buildings([
            (
                building("a"),
                OverlayLoad::Ready {
                    overlay: "a.svg",
                    mask: square_mask(20, 2, 6),
                },
            ),
            (
                building("b"),
                OverlayLoad::Ready {
                    overlay: "b.svg",
                    mask: square_mask(20, 12, 16),
                },
            ),
        ]);
        c
    }

    fn flagged(c: &MapController<&'static str>) -> Vec<String> {
        c.scene()
            .iter()
            .filter(|rb| rb.is_selected)
            .map(|rb| rb.building.id.clone())
            .collect()
    }

    #[test]
    fn drag_pans_by_pointer_delta() {
        let mut c = controller();
        c.pointer_down(100.0, 100.0);
        let fx = c.pointer_move(110.0, 95.0);
        assert!(fx.render);
        assert_eq!(fx.cursor, Some(Cursor::Grabbing));
        c.pointer_move(130.0, 90.0);
        assert_close(c.camera().offset_x, 30.0);
        assert_close(c.camera().offset_y, -10.0);
        c.pointer_up();
        assert!(!c.is_dragging());
    }

    #[test]
    fn hover_follows_silhouette_and_only_reports_changes() {
        let mut c = controller();
        let fx = c.pointer_move(3.0, 3.0);
        assert!(fx.render);
        assert_eq!(fx.cursor, Some(Cursor::Pointer));
        assert_eq!(c.selection().hovering(), Some("a"));

        let fx = c.pointer_move(4.0, 4.0);
        assert!(!fx.render);

        let fx = c.pointer_move(9.0, 9.0);
        assert!(fx.render);
        assert_eq!(fx.cursor, Some(Cursor::Default));
        assert_eq!(c.selection().hovering(), None);
    }

    #[test]
    fn hover_uses_inverse_camera_transform() {
        let mut c = controller();
        // Zoom in twice around the origin: scale 1.21
        c.wheel(-1.0, 0.0, 0.0);
        c.wheel(-1.0, 0.0, 0.0);
        c.pointer_down(0.0, 0.0);
        c.pointer_move(20.0, 20.0);
        c.pointer_up();
        // Device (37, 37) -> map ((37 - 20) / 1.21) ~= 14.05, inside "b"
        c.pointer_move(37.0, 37.0);
        assert_eq!(c.selection().hovering(), Some("b"));
    }

    #[test]
    fn no_hover_detection_while_dragging() {
        let mut c = controller();
        c.pointer_down(50.0, 50.0);
        c.pointer_move(50.0, 50.0);
        assert_eq!(c.selection().hovering(), None);
    }

    #[test]
    fn wheel_zoom_anchors_and_rejects_out_of_range() {
        let mut c = controller();
        let (px, py) = (240.0, 130.0);
        let before = c.camera().screen_to_map(px, py);
        assert!(c.wheel(-100.0, px, py).render);
        let after = c.camera().screen_to_map(px, py);
        assert_close(after.0, before.0);
        assert_close(after.1, before.1);

        for _ in 0..100 {
            c.wheel(-100.0, px, py);
        }
        let saturated = *c.camera();
        assert!(saturated.scale < MAX_SCALE);
        let fx = c.wheel(-100.0, px, py);
        assert!(!fx.render);
        assert_eq!(*c.camera(), saturated);

        for _ in 0..200 {
            c.wheel(100.0, px, py);
        }
        assert!(c.camera().scale > MIN_SCALE);
    }

    #[test]
    fn click_on_building_selects_and_shows_panel() {
        let mut c = controller();
        let fx = c.click(13.0, 13.0);
        assert!(fx.render);
        assert_eq!(c.selection().selected(), Some("b"));
        assert_eq!(flagged(&c), ["b"]);
        match fx.panel {
            Some(PanelCommand::Show(b)) => assert_eq!(b.id, "b"),
            other => panic!("expected Show, got {other:?}"),
        }
    }

    #[test]
    fn click_on_empty_map_clears_selection() {
        let mut c = controller();
        c.click(3.0, 3.0);
        let fx = c.click(9.0, 9.0);
        assert!(fx.render);
        assert_eq!(fx.panel, Some(PanelCommand::Hide));
        assert_eq!(c.selection().selected(), None);
        assert!(flagged(&c).is_empty());
    }

    #[test]
    fn click_on_empty_map_without_selection_still_redraws() {
        let mut c = controller();
        let fx = c.click(9.0, 9.0);
        assert!(fx.render);
        assert_eq!(fx.panel, None);
    }

    #[test]
    fn click_after_drag_is_ignored() {
        let mut c = controller();
        c.pointer_down(100.0, 100.0);
        c.pointer_move(140.0, 100.0);
        c.pointer_up();
        let fx = c.click(3.0, 3.0);
        assert_eq!(fx, Effects::default());
        assert_eq!(c.selection().selected(), None);

        // The suppression only covers the click ending that drag
        let fx = c.click(43.0, 3.0);
        assert_eq!(c.selection().selected(), Some("a"));
        assert!(fx.render);
    }

    #[test]
    fn small_jitter_still_counts_as_click() {
        let mut c = controller();
        c.pointer_down(3.0, 3.0);
        c.pointer_move(5.0, 4.0);
        c.pointer_up();
        // Camera moved by (2, 1); map point (2, 3) is still inside "a"
        c.click(4.0, 4.0);
        assert_eq!(c.selection().selected(), Some("a"));
    }

    #[test]
    fn deselect_is_idempotent() {
        let mut c = controller();
        assert_eq!(c.deselect(), Effects::default());
        c.select_id("a");
        let fx = c.deselect();
        assert!(fx.render);
        assert_eq!(fx.panel, Some(PanelCommand::Hide));
        assert_eq!(c.deselect(), Effects::default());
    }

    #[test]
    fn pointer_leave_ends_drag_and_clears_hover() {
        let mut c = controller();
        c.pointer_move(3.0, 3.0);
        c.pointer_down(3.0, 3.0);
        let fx = c.pointer_leave();
        assert!(!c.is_dragging());
        assert!(fx.render);
        assert_eq!(fx.cursor, Some(Cursor::Default));
        assert_eq!(c.selection().hovering(), None);
    }

    #[test]
    fn moves_after_leaving_mid_drag_do_not_pan() {
        let mut c = controller();
        c.pointer_down(10.0, 10.0);
        c.pointer_move(30.0, 10.0);
        let panned_x = c.camera().offset_x;
        c.pointer_leave();

        // Re-entering with the button still held is a plain hover
        c.pointer_move(80.0, 60.0);
        assert!(!c.is_dragging());
        assert_close(c.camera().offset_x, panned_x);
    }

    #[test]
    fn pointer_up_restores_hover_cursor() {
        let mut c = controller();
        c.pointer_move(3.0, 3.0);
        assert_eq!(c.pointer_down(3.0, 3.0).cursor, Some(Cursor::Grabbing));
        assert_eq!(c.pointer_up().cursor, Some(Cursor::Pointer));
    }

    #[test]
    fn base_map_centers_once() {
        let mut c: MapController<()> = MapController::new();
        assert!(c.on_base_map_loaded(1000.0, 500.0, 1200.0, 900.0).render);
        assert_close(c.camera().offset_x, 100.0);
        assert_close(c.camera().offset_y, 200.0);
        c.pointer_down(0.0, 0.0);
        c.pointer_move(10.0, 0.0);
        c.pointer_up();
        assert!(!c.on_base_map_loaded(1000.0, 500.0, 1200.0, 900.0).render);
        assert_close(c.camera().offset_x, 110.0);
    }

    #[test]
    fn render_reflects_hover_and_selection() {
        let mut c = controller();
        c.click(3.0, 3.0);
        c.pointer_move(13.0, 13.0);
        let mut surface = RecordingSurface::default();
        c.render(&mut surface, Some(&"base.svg"));
        assert_eq!(
            &surface.ops[2..],
            &[
                Op::Draw("base.svg", OverlayFilter::Identity),
                Op::Draw("a.svg", OverlayFilter::Selected),
                Op::Draw("b.svg", OverlayFilter::Hover),
            ]
        );
    }
}
