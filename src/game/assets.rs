//! Texture Cache
//!
//! Maps asset names to renderer texture handles. Load failures are logged
//! and skipped per item — a missing tile image must not abort rendering of
//! the remaining tiles — and negative results are cached so a broken asset
//! warns once, not every frame.

use std::collections::HashMap;

use log::warn;

use crate::render::TextureId;

/// Owned by the scene; no ambient global registry.
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: HashMap<String, Option<TextureId>>,
    next_id: u32,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a texture, loading it through `load` on first use.
    ///
    /// `load` resolves the name to image bytes (from disk, an archive, or a
    /// test stub); the backend upload itself is the renderer's business, so
    /// the cache only assigns the handle. Returns `None` when the asset is
    /// missing or broken.
    pub fn get_or_load(
        &mut self,
        name: &str,
        load: impl FnOnce(&str) -> anyhow::Result<Vec<u8>>,
    ) -> Option<TextureId> {
        if let Some(cached) = self.entries.get(name) {
            return *cached;
        }
        let resolved = match load(name) {
            Ok(_bytes) => {
                let id = TextureId(self.next_id);
                self.next_id += 1;
                Some(id)
            }
            Err(err) => {
                warn!("texture '{name}' failed to load, skipping: {err:#}");
                None
            }
        };
        self.entries.insert(name.to_string(), resolved);
        resolved
    }

    /// Look up without loading.
    pub fn get(&self, name: &str) -> Option<TextureId> {
        self.entries.get(name).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.entries.values().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
