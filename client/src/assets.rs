use campus_map_shared::building::{BASE_MAP_SRC, BUILDINGS_DATA_SRC};
use campus_map_shared::colors::{extract_accent_color, sample_dimensions};
use campus_map_shared::{AccentError, Building, HitMask, LoadError, OverlayLoad, Rgb};
use futures::future::join_all;
use image::RgbaImage;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// Load and decode an image. `decode()` settles exactly once, so there is no
/// onload/onerror race to arbitrate.
pub async fn load_image(src: &str) -> Result<HtmlImageElement, LoadError> {
    let image = HtmlImageElement::new()
        .map_err(|e| LoadError(format!("cannot create image element: {e:?}")))?;
    image.set_src(src);
    JsFuture::from(image.decode())
        .await
        .map_err(|e| LoadError(format!("{src}: {e:?}")))?;
    Ok(image)
}

pub async fn load_base_map() -> Result<HtmlImageElement, LoadError> {
    load_image(BASE_MAP_SRC).await
}

/// Fetch the building dataset once.
pub async fn fetch_buildings() -> Result<Vec<Building>, String> {
    let resp = gloo_net::http::Request::get(BUILDINGS_DATA_SRC)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    let body = resp
        .text()
        .await
        .map_err(|e| format!("read error: {e}"))?;
    campus_map_shared::parse_buildings(&body).map_err(|e| format!("parse error: {e}"))
}

/// Decode every overlay and build its hit mask. Resolves only once every
/// building has settled, successfully or not.
pub async fn load_overlays(
    buildings: Vec<Building>,
) -> Vec<(Building, OverlayLoad<HtmlImageElement>)> {
    join_all(buildings.into_iter().map(|building| async move {
        let load = match load_overlay(&building).await {
            Ok((overlay, mask)) => OverlayLoad::Ready { overlay, mask },
            Err(err) => {
                web_sys::console::warn_1(
                    &format!("overlay for {} unavailable: {err}", building.id).into(),
                );
                OverlayLoad::Failed
            }
        };
        (building, load)
    }))
    .await
}

async fn load_overlay(building: &Building) -> Result<(HtmlImageElement, HitMask), String> {
    let overlay = load_image(&building.overlay_src())
        .await
        .map_err(|e| e.to_string())?;
    let (w, h) = (overlay.natural_width(), overlay.natural_height());
    if w == 0 || h == 0 {
        return Err("overlay has no intrinsic size".to_string());
    }
    let rgba = read_pixels(&overlay, w, h)?;
    let mask = HitMask::from_rgba(w, h, &rgba).map_err(|e| e.to_string())?;
    Ok((overlay, mask))
}

/// Rasterize an image into an off-screen canvas of `width` x `height` and read it back as RGBA.
fn read_pixels(image: &HtmlImageElement, width: u32, height: u32) -> Result<Vec<u8>, String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let canvas = document
        .create_element("canvas")
        .map_err(|e| format!("{e:?}"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| "not a canvas element")?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or("off-screen canvas has no 2d context")?;
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        image,
        0.0,
        0.0,
        width as f64,
        height as f64,
    )
    .map_err(|e| format!("{e:?}"))?;
    let data = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| format!("{e:?}"))?;
    Ok(data.data().0)
}

/// Accent color of a decoded photo, sampled from a downscaled read-back.
pub fn sample_accent(photo: &HtmlImageElement) -> Result<Rgb, AccentError> {
    let (w, h) = sample_dimensions(photo.natural_width(), photo.natural_height());
    if w == 0 || h == 0 {
        return Err(AccentError::Unreadable("photo has no intrinsic size".into()));
    }
    let pixels = read_pixels(photo, w, h).map_err(AccentError::Unreadable)?;
    let buffer = RgbaImage::from_raw(w, h, pixels)
        .ok_or_else(|| AccentError::Unreadable("pixel buffer size mismatch".into()))?;
    extract_accent_color(&buffer)
}
