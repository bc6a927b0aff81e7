use std::collections::HashMap;
use std::fmt;

use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Longest side of the working buffer used for accent sampling.
pub const SAMPLE_MAX_SIDE: u32 = 100;
/// Sample every 4th pixel of the working buffer.
const PIXEL_STRIDE: usize = 4;
const SATURATION_THRESHOLD: f64 = 0.3;
const BRIGHTNESS_THRESHOLD: f64 = 0.3;
const BUCKET_STEP: f64 = 10.0;

const GRADIENT_END: &str = "#121211";

/// Panel background used while a photo is pending and whenever no accent is available.
pub const NEUTRAL_GRADIENT: &str = "linear-gradient(to bottom, #333333, #121211)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccentError {
    /// No sampled pixel passed the saturation/brightness filter.
    NoVibrantColor,
    /// Pixels could not be read back from the decoded image.
    Unreadable(String),
}

impl fmt::Display for AccentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoVibrantColor => f.write_str("no vibrant color found"),
            Self::Unreadable(reason) => write!(f, "image pixels unreadable: {reason}"),
        }
    }
}

impl std::error::Error for AccentError {}

/// Convert RGB to HSV. Returns (h: 0..1, s: 0..1, v: 0..1).
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    let v = max;
    let s = if max == 0.0 { 0.0 } else { d / max };

    if d == 0.0 {
        return (0.0, s, v);
    }

    let h = if max == r {
        let mut h = (g - b) / d;
        if g < b {
            h += 6.0;
        }
        h
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h / 6.0, s, v)
}

/// Working buffer size: the image scaled down to fit within 100x100, aspect preserved.
pub fn sample_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width <= SAMPLE_MAX_SIDE && height <= SAMPLE_MAX_SIDE {
        return (width, height);
    }
    let ratio = (SAMPLE_MAX_SIDE as f64 / width as f64).min(SAMPLE_MAX_SIDE as f64 / height as f64);
    let w = (width as f64 * ratio).round().max(1.0) as u32;
    let h = (height as f64 * ratio).round().max(1.0) as u32;
    (w.min(SAMPLE_MAX_SIDE), h.min(SAMPLE_MAX_SIDE))
}

fn quantize(channel: u8) -> u8 {
    ((channel as f64 / BUCKET_STEP).round() * BUCKET_STEP).min(255.0) as u8
}

/// Estimate a single vibrant representative color for a photo.
///
/// Samples every 4th pixel of a working buffer capped at 100x100, keeps
/// pixels with saturation and value above 0.3, buckets them to multiples of
/// 10 per channel and returns the most populated bucket. Ties go to the
/// bucket seen first.
pub fn extract_accent_color(image: &RgbaImage) -> Result<Rgb, AccentError> {
    let (w, h) = sample_dimensions(image.width(), image.height());
    let resized;
    let working = if (w, h) == image.dimensions() {
        image
    } else {
        resized = imageops::resize(image, w, h, FilterType::Nearest);
        &resized
    };

    // bucket -> (count, first-seen order)
    let mut buckets: HashMap<Rgb, (u32, usize)> = HashMap::new();
    for px in working.as_raw().chunks_exact(4).step_by(PIXEL_STRIDE) {
        let (r, g, b) = (px[0], px[1], px[2]);
        let (_, s, v) = rgb_to_hsv(r, g, b);
        if s <= SATURATION_THRESHOLD || v <= BRIGHTNESS_THRESHOLD {
            continue;
        }
        let key = Rgb::new(quantize(r), quantize(g), quantize(b));
        let seen = buckets.len();
        buckets.entry(key).or_insert((0, seen)).0 += 1;
    }

    buckets
        .into_iter()
        .max_by(|(_, (count_a, seen_a)), (_, (count_b, seen_b))| {
            count_a.cmp(count_b).then(seen_b.cmp(seen_a))
        })
        .map(|(color, _)| color)
        .ok_or(AccentError::NoVibrantColor)
}

/// Panel background derived from an accent color.
pub fn accent_gradient(color: Rgb) -> String {
    format!("linear-gradient(to bottom, {color}, {GRADIENT_END})")
}
