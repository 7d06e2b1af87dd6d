//! Texture identity and caching

use std::collections::HashMap;

/// What a sprite looks like. Equal ids share one texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DrawableId {
    Hazard,
    Fragment,
    Target,
    Player,
    /// A line of text rasterized at a pixel size
    Text { content: String, size_px: u32 },
}

/// Opaque handle issued by a [`TextureLoader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Creates GPU textures. Implemented by the platform layer.
pub trait TextureLoader {
    fn load(&mut self, id: &DrawableId) -> TextureHandle;

    /// Free a texture the cache no longer references
    fn release(&mut self, _handle: TextureHandle) {}
}

/// Memoizes loader results so each distinct drawable is uploaded once
#[derive(Debug, Default)]
pub struct TextureCache {
    handles: HashMap<DrawableId, TextureHandle>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached handle for `id`, loading it on first use
    pub fn get(&mut self, id: &DrawableId, loader: &mut dyn TextureLoader) -> TextureHandle {
        if let Some(&handle) = self.handles.get(id) {
            return handle;
        }
        let handle = loader.load(id);
        log::debug!("Loaded texture {:?} as {:?}", id, handle);
        self.handles.insert(id.clone(), handle);
        handle
    }

    /// Drop one entry and free its texture. Returns false if it was not cached.
    pub fn evict(&mut self, id: &DrawableId, loader: &mut dyn TextureLoader) -> bool {
        match self.handles.remove(id) {
            Some(handle) => {
                loader.release(handle);
                true
            }
            None => false,
        }
    }

    /// Forget every handle without freeing. Used after a context loss, when
    /// the textures are already gone with the context.
    pub fn clear(&mut self) {
        self.handles.clear();
    }

    /// Free every cached texture and empty the cache
    pub fn release_all(&mut self, loader: &mut dyn TextureLoader) {
        for (_, handle) in self.handles.drain() {
            loader.release(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
