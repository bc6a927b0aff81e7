/// Camera manages the pan/zoom transformation from map coordinates to screen coordinates.
/// Drawing applies the translation first, then the uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

/// Scale bounds are exclusive: a zoom landing on either bound is rejected.
pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 10.0;
const ZOOM_IN_FACTOR: f64 = 1.1;
const ZOOM_OUT_FACTOR: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Scrolling down (positive delta) zooms out. A zero delta is not a zoom.
    pub fn from_wheel_delta(delta_y: f64) -> Option<Self> {
        if delta_y > 0.0 {
            Some(Self::Out)
        } else if delta_y < 0.0 {
            Some(Self::In)
        } else {
            None
        }
    }

    fn factor(self) -> f64 {
        match self {
            Self::In => ZOOM_IN_FACTOR,
            Self::Out => ZOOM_OUT_FACTOR,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

impl Camera {
    /// Convert map coordinates to screen coordinates.
    pub fn map_to_screen(&self, mx: f64, my: f64) -> (f64, f64) {
        (
            mx * self.scale + self.offset_x,
            my * self.scale + self.offset_y,
        )
    }

    /// Convert screen coordinates to map coordinates.
    pub fn screen_to_map(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        )
    }

    /// Pan by screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Zoom one step toward a focus point (screen coordinates).
    ///
    /// Returns `false` and leaves the camera untouched when the new scale
    /// would fall outside `(MIN_SCALE, MAX_SCALE)`.
    pub fn zoom_at(&mut self, direction: ZoomDirection, screen_x: f64, screen_y: f64) -> bool {
        let new_scale = self.scale * direction.factor();
        if new_scale <= MIN_SCALE || new_scale >= MAX_SCALE {
            return false;
        }

        // Keep the map point under the cursor fixed
        let (mx, my) = self.screen_to_map(screen_x, screen_y);
        self.scale = new_scale;
        self.offset_x = screen_x - mx * self.scale;
        self.offset_y = screen_y - my * self.scale;
        true
    }

    /// Center content of the given map-space size inside the viewport at the current scale.
    pub fn center_content(
        &mut self,
        content_w: f64,
        content_h: f64,
        viewport_w: f64,
        viewport_h: f64,
    ) {
        self.offset_x = (viewport_w - content_w * self.scale) / 2.0;
        self.offset_y = (viewport_h - content_h * self.scale) / 2.0;
    }
}
