use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use super::error::RecorderError;
use crate::glyphs::DEFAULT_GLYPHS;

/// Ordered, non-empty list of distinct glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphCatalog {
    glyphs: Arc<[String]>,
}

impl GlyphCatalog {
    pub fn new<I, S>(glyphs: I) -> Result<Self, RecorderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let glyphs: Vec<String> = glyphs.into_iter().map(Into::into).collect();
        if glyphs.is_empty() {
            return Err(RecorderError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for glyph in &glyphs {
            if !seen.insert(glyph.as_str()) {
                return Err(RecorderError::DuplicateGlyph(glyph.clone()));
            }
        }
        Ok(Self {
            glyphs: glyphs.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, index: usize) -> &str {
        &self.glyphs[index % self.glyphs.len()]
    }
}

impl Default for GlyphCatalog {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_GLYPHS.iter().map(|g| g.to_string()).collect(),
        }
    }
}

/// Round-robin glyph selector.
///
/// Clones share one counter, so every recorder built from the same cycler
/// (including the process-wide [`BulletCycler::global`]) draws from a single
/// sequence.
#[derive(Debug, Clone)]
pub struct BulletCycler {
    catalog: GlyphCatalog,
    counter: Arc<AtomicUsize>,
}

static GLOBAL_CYCLER: OnceLock<BulletCycler> = OnceLock::new();

impl BulletCycler {
    pub fn new(catalog: GlyphCatalog) -> Self {
        Self::seeded(catalog, 0)
    }

    pub fn seeded(catalog: GlyphCatalog, start: usize) -> Self {
        Self {
            catalog,
            counter: Arc::new(AtomicUsize::new(start)),
        }
    }

    /// The shared cycler over the default catalog, created on first use.
    pub fn global() -> Self {
        GLOBAL_CYCLER
            .get_or_init(|| BulletCycler::new(GlyphCatalog::default()))
            .clone()
    }

    pub fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        self.catalog.get(n).to_string()
    }

    pub fn position(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.counter.store(0, Ordering::Relaxed);
    }
}
