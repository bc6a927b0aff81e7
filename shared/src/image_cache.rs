use std::collections::HashMap;
use std::fmt;

use crate::colors::{AccentError, Rgb};

/// Why a photo never became available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError(pub String);

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image load failed: {}", self.0)
    }
}

impl std::error::Error for LoadError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<I> {
    Pending,
    Ready(I),
    Failed,
}

#[derive(Debug, Clone)]
pub struct CacheEntry<I> {
    state: LoadState<I>,
    accent: Option<Rgb>,
    samples: u32,
}

impl<I> CacheEntry<I> {
    pub fn state(&self) -> &LoadState<I> {
        &self.state
    }

    pub fn accent(&self) -> Option<Rgb> {
        self.accent
    }

    /// How many times the sampler has run for this entry.
    pub fn samples(&self) -> u32 {
        self.samples
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preload {
    /// New entry: the caller starts the one and only decode for this path.
    Started,
    /// Entry already exists, loaded or in flight.
    Cached,
}

/// Session-wide photo cache keyed by exact source path. No retries: each path
/// gets one decode attempt and keeps its terminal outcome.
#[derive(Debug, Clone)]
pub struct ImageCache<I> {
    entries: HashMap<String, CacheEntry<I>>,
}

impl<I> Default for ImageCache<I> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<I> ImageCache<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preload(&mut self, src: &str) -> Preload {
        if self.entries.contains_key(src) {
            return Preload::Cached;
        }
        self.entries.insert(
            src.to_string(),
            CacheEntry {
                state: LoadState::Pending,
                accent: None,
                samples: 0,
            },
        );
        Preload::Started
    }

    /// Record the terminal outcome of a decode. Only the first outcome for a
    /// pending entry is kept; returns whether this call settled the entry.
    pub fn complete(&mut self, src: &str, result: Result<I, LoadError>) -> bool {
        let Some(entry) = self.entries.get_mut(src) else {
            return false;
        };
        if !matches!(entry.state, LoadState::Pending) {
            return false;
        }
        entry.state = match result {
            Ok(image) => LoadState::Ready(image),
            Err(_) => LoadState::Failed,
        };
        true
    }

    pub fn entry(&self, src: &str) -> Option<&CacheEntry<I>> {
        self.entries.get(src)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Accent color for a loaded photo, running `sampler` only until it first succeeds.
    pub fn accent_color(
        &mut self,
        src: &str,
        sampler: impl FnOnce(&I) -> Result<Rgb, AccentError>,
    ) -> Result<Rgb, AccentError> {
        let Some(entry) = self.entries.get_mut(src) else {
            return Err(AccentError::Unreadable(format!("{src} is not cached")));
        };
        if let Some(color) = entry.accent {
            return Ok(color);
        }
        let LoadState::Ready(image) = &entry.state else {
            return Err(AccentError::Unreadable(format!("{src} is not loaded")));
        };
        entry.samples += 1;
        let color = sampler(image)?;
        entry.accent = Some(color);
        Ok(color)
    }
}
