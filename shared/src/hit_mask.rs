use std::fmt;

/// Alpha mask of a building overlay, sized to the overlay's pixel dimensions.
/// This is the authoritative shape test: only drawn pixels hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// Buffer length does not match `width * height * 4`.
    SizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "RGBA buffer has {actual} bytes, expected {expected}")
            }
        }
    }
}

impl std::error::Error for MaskError {}

impl HitMask {
    /// Copy the alpha channel out of an RGBA-interleaved buffer.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, MaskError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(MaskError::SizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        let alpha = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True iff the point lies inside the mask and the pixel there is not fully transparent.
    pub fn is_opaque_at(&self, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return false;
        }
        let (px, py) = (x.floor() as u64, y.floor() as u64);
        if px >= self.width as u64 || py >= self.height as u64 {
            return false;
        }
        self.alpha[(py * self.width as u64 + px) as usize] > 0
    }
}
