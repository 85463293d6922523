use std::collections::HashMap;

use xxhash_rust::xxh3::Xxh3;

use crate::foundation::error::{RasterError, RasterResult};

const FONT_HASH_SEED: u64 = 0x51f0_9c3e_a2d4_7b61;

/// Content hash of a font face: xxh3-64 over the font bytes and face index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontKey(u64);

impl FontKey {
    /// Key for face `index` of `bytes`.
    pub fn of(bytes: &[u8], index: u32) -> Self {
        let mut h = Xxh3::with_seed(FONT_HASH_SEED);
        h.update(bytes);
        h.update(&index.to_le_bytes());
        Self(h.digest())
    }

    /// Raw hash value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A loaded font face, shareable by glyph rasterizers.
#[derive(Clone)]
pub struct FontFace {
    key: FontKey,
    data: vello_cpu::peniko::FontData,
}

impl FontFace {
    /// Face `index` of the font file `bytes`.
    pub fn new(bytes: Vec<u8>, index: u32) -> RasterResult<Self> {
        if bytes.is_empty() {
            return Err(RasterError::text("font bytes are empty"));
        }
        let key = FontKey::of(&bytes, index);
        Ok(Self {
            key,
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index),
        })
    }

    /// Content hash of this face.
    pub fn key(&self) -> FontKey {
        self.key
    }

    /// Raw font file bytes.
    pub fn bytes(&self) -> &[u8] {
        self.data.data.as_ref()
    }

    /// Face index within the font file.
    pub fn index(&self) -> u32 {
        self.data.index
    }

    /// Font handle for `vello_cpu` glyph runs.
    pub fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.data
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("key", &self.key)
            .field("index", &self.index())
            .field("bytes", &self.bytes().len())
            .finish()
    }
}

#[derive(Debug)]
struct FontEntry {
    face: FontFace,
    refs: usize,
}

/// Content-addressed font faces with explicit acquire/release reference counting.
///
/// Acquiring the same bytes twice shares one face; the face is dropped when the last
/// reference is released.
#[derive(Debug, Default)]
pub struct FontRegistry {
    entries: HashMap<FontKey, FontEntry>,
}

impl FontRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a reference to face `index` of `bytes`, loading it on first use.
    pub fn acquire(&mut self, bytes: &[u8], index: u32) -> RasterResult<FontKey> {
        let key = FontKey::of(bytes, index);
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.refs += 1;
            return Ok(key);
        }
        let face = FontFace::new(bytes.to_vec(), index)?;
        tracing::debug!(key = key.get(), bytes = bytes.len(), "font face loaded");
        self.entries.insert(key, FontEntry { face, refs: 1 });
        Ok(key)
    }

    /// Drop one reference; returns `true` when that was the last one and the face was freed.
    pub fn release(&mut self, key: FontKey) -> bool {
        let Some(entry) = self.entries.get_mut(&key) else {
            tracing::debug!(key = key.get(), "release of unknown font key");
            return false;
        };
        entry.refs -= 1;
        if entry.refs > 0 {
            return false;
        }
        self.entries.remove(&key);
        true
    }

    /// Face for `key`, if it is still referenced.
    pub fn get(&self, key: FontKey) -> Option<&FontFace> {
        self.entries.get(&key).map(|e| &e.face)
    }

    /// Current reference count (0 for unknown keys).
    pub fn refcount(&self, key: FontKey) -> usize {
        self.entries.get(&key).map_or(0, |e| e.refs)
    }

    /// Number of live faces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no face is loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
