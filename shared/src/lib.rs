pub mod building;
pub mod camera;
pub mod colors;
pub mod hit_mask;
pub mod image_cache;
pub mod info_panel;
pub mod input;
pub mod render;
pub mod scene;
pub mod schedule;
pub mod selection;

pub use building::{Building, parse_buildings};
pub use camera::{Camera, ZoomDirection};
pub use colors::{AccentError, Rgb};
pub use hit_mask::{HitMask, MaskError};
pub use image_cache::{ImageCache, LoadError, LoadState, Preload};
pub use info_panel::{InfoPanel, PanelSlot, PanelView, PhotoRequest};
pub use input::{Cursor, Effects, MapController, PanelCommand};
pub use render::{MapSurface, OverlayFilter};
pub use scene::{BuildingScene, InstallReport, OverlayLoad};
pub use schedule::{Debounce, DebounceTicket, FrameGate};
pub use selection::Selection;
