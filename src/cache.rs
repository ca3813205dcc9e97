use std::collections::HashMap;
use std::hash::Hash;

use crate::entity::Shape;

/// Memoizes values by key. Everything is dropped on [`Cache::purge`], e.g.
/// when the display resolution changes and every rendered image goes stale.
#[derive(Debug, Clone)]
pub struct Cache<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> Cache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, key: K, load: impl FnOnce(&K) -> V) -> &V {
        self.entries.entry(key).or_insert_with_key(|key| load(key))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn purge(&mut self) {
        self.entries.clear();
    }
}

/// Structural cache key for one rendered sprite: which image, at what pixel
/// size, turned how many quarter turns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpriteKey {
    pub id: String,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub quarter_turns: usize,
}

impl SpriteKey {
    pub fn for_shape(shape: &Shape, pixels_per_unit: usize) -> Self {
        let (pixel_width, pixel_height) = shape.pixel_dimensions(pixels_per_unit);
        Self {
            id: shape.id().to_string(),
            pixel_width,
            pixel_height,
            quarter_turns: shape.rotation().quarter_turns(),
        }
    }
}
