use crate::camera::Camera;
use crate::scene::BuildingScene;
use crate::selection::Selection;

/// Visual state applied to a building overlay when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayFilter {
    Identity,
    Hover,
    Selected,
}

impl OverlayFilter {
    /// Selected wins over hover.
    pub fn for_building(id: &str, selection: &Selection) -> Self {
        if selection.selected() == Some(id) {
            Self::Selected
        } else if selection.hovering() == Some(id) {
            Self::Hover
        } else {
            Self::Identity
        }
    }

    /// Element id of the SVG filter implementing this state.
    pub fn svg_id(self) -> Option<&'static str> {
        match self {
            Self::Identity => None,
            Self::Hover => Some("hover-filter"),
            Self::Selected => Some("selected-filter"),
        }
    }

    /// 4x5 row-major color matrix (feColorMatrix `values`).
    pub fn color_matrix(self) -> Option<[f32; 20]> {
        let (r, g, b) = match self {
            Self::Identity => return None,
            Self::Hover => (1.25, 1.25, 1.25),
            Self::Selected => (1.5, 1.5, 2.0),
        };
        Some([
            r, 0.0, 0.0, 0.0, 0.0, //
            0.0, g, 0.0, 0.0, 0.0, //
            0.0, 0.0, b, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ])
    }
}

/// `<svg>` block with the hover and selected filter definitions, hidden from layout.
pub fn svg_filter_defs() -> String {
    let mut out = String::from(
        r#"<svg xmlns="http://www.w3.org/2000/svg" style="position:absolute;width:0;height:0;">"#,
    );
    for filter in [OverlayFilter::Hover, OverlayFilter::Selected] {
        let (Some(id), Some(matrix)) = (filter.svg_id(), filter.color_matrix()) else {
            continue;
        };
        let values = matrix
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!(
            r#"<filter id="{id}"><feColorMatrix type="matrix" values="{values}"/></filter>"#
        ));
    }
    out.push_str("</svg>");
    out
}

/// A 2D drawing target for the map scene.
pub trait MapSurface {
    type Image;

    /// Reset to the identity transform and clear the whole surface.
    fn reset(&mut self);
    /// Translate by the camera offset, then scale uniformly.
    fn apply_camera(&mut self, camera: &Camera);
    /// Draw an image at the map origin with a visual filter.
    fn draw_image(&mut self, image: &Self::Image, filter: OverlayFilter);
}

/// Redraw the whole scene. Overlays are skipped until the scene is ready;
/// the base map is drawn whenever it is available.
pub fn render_scene<S: MapSurface>(
    surface: &mut S,
    base_map: Option<&S::Image>,
    scene: &BuildingScene<S::Image>,
    camera: &Camera,
    selection: &Selection,
) {
    surface.reset();
    surface.apply_camera(camera);

    if let Some(base) = base_map {
        surface.draw_image(base, OverlayFilter::Identity);
    }

    if !scene.is_ready() {
        return;
    }

    for rb in scene.iter() {
        let filter = OverlayFilter::for_building(&rb.building.id, selection);
        surface.draw_image(&rb.overlay, filter);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{Op, RecordingSurface};
    use super::*;
    use crate::scene::OverlayLoad;
    use crate::scene::test_support::{building, square_mask};

    fn labelled_scene() -> BuildingScene<&'static str> {
        let mut scene = BuildingScene::new();
        scene.install([
            (
                building("a"),
                OverlayLoad::Ready {
                    overlay: "a.svg",
                    mask: square_mask(4, 0, 2),
                },
            ),
            (building("gone"), OverlayLoad::Failed),
            (
                building("b"),
                OverlayLoad::Ready {
                    overlay: "b.svg",
                    mask: square_mask(4, 2, 4),
                },
            ),
        ]);
        scene
    }

    #[test]
    fn draws_base_then_overlays_with_filters() {
        let mut scene = labelled_scene();
        let mut selection = Selection::default();
        selection.select_id(&mut scene, "b");
        selection.set_hovering(Some("a"));
        let camera = Camera {
            offset_x: 4.0,
            offset_y: 2.0,
            scale: 1.5,
        };

        let mut surface = RecordingSurface::default();
        render_scene(&mut surface, Some(&"base.svg"), &scene, &camera, &selection);

        assert_eq!(
            surface.ops,
            vec![
                Op::Reset,
                Op::Camera(camera),
                Op::Draw("base.svg", OverlayFilter::Identity),
                Op::Draw("a.svg", OverlayFilter::Hover),
                Op::Draw("b.svg", OverlayFilter::Selected),
            ]
        );
    }

    #[test]
    fn base_map_draws_before_buildings_are_ready() {
        let scene = BuildingScene::new();
        let mut surface = RecordingSurface::default();
        render_scene(
            &mut surface,
            Some(&"base.svg"),
            &scene,
            &Camera::default(),
            &Selection::default(),
        );
        assert_eq!(
            surface.ops.last(),
            Some(&Op::Draw("base.svg", OverlayFilter::Identity))
        );
        assert_eq!(surface.ops.len(), 3);
    }

    #[test]
    fn overlays_draw_without_base_map() {
        let scene = labelled_scene();
        let mut surface = RecordingSurface::default();
        render_scene(
            &mut surface,
            None,
            &scene,
            &Camera::default(),
            &Selection::default(),
        );
        let draws: Vec<_> = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Draw(..)))
            .collect();
        assert_eq!(draws.len(), 2);
    }

    #[test]
    fn selected_takes_precedence_over_hover() {
        let mut scene = labelled_scene();
        let mut selection = Selection::default();
        selection.select_id(&mut scene, "a");
        selection.set_hovering(Some("a"));
        assert_eq!(
            OverlayFilter::for_building("a", &selection),
            OverlayFilter::Selected
        );
    }

    #[test]
    fn filter_defs_contain_both_matrices() {
        let defs = svg_filter_defs();
        assert!(defs.contains(r#"<filter id="hover-filter">"#));
        assert!(defs.contains(r#"<filter id="selected-filter">"#));
        assert!(defs.contains("values=\"1.25 0 0 0 0 0 1.25 0 0 0 0 0 1.25 0 0 0 0 0 1 0\""));
        assert!(defs.contains("values=\"1.5 0 0 0 0 0 1.5 0 0 0 0 0 2 0 0 0 0 0 1 0\""));
    }
}
