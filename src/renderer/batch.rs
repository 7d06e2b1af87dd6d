//! Batched sprite submission
//!
//! One draw call per entity kind per frame. The shared quad and the texture
//! cache live here and are rebuilt lazily after a context loss.

use glam::Mat4;

use super::texture::{DrawableId, TextureCache, TextureHandle, TextureLoader};
use super::vertex::{QUAD_INDICES, QUAD_VERTICES, QuadVertex, SpriteInstance};
use crate::sim::{Drawable, ObjectPool, Poolable, SlotId};

/// Handle to an uploaded quad mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadHandle(pub u32);

/// The graphics backend, seen from the engine
pub trait RenderSurface {
    fn upload_quad(&mut self, vertices: &[QuadVertex], indices: &[u16]) -> QuadHandle;
    fn draw_batch(&mut self, quad: QuadHandle, texture: TextureHandle, instances: &[SpriteInstance]);
}

#[derive(Debug, Default)]
pub struct RenderBatcher {
    quad: Option<QuadHandle>,
    textures: TextureCache,
    /// Reused instance buffer
    scratch: Vec<SpriteInstance>,
}

impl RenderBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop GPU-resident state; it is recreated on the next submit
    pub fn invalidate(&mut self) {
        self.quad = None;
        self.textures.clear();
    }

    /// Free a texture that nothing will draw again
    pub fn evict(&mut self, id: &DrawableId, loader: &mut dyn TextureLoader) {
        self.textures.evict(id, loader);
    }

    /// Free every GPU resource the batcher holds
    pub fn release(&mut self, loader: &mut dyn TextureLoader) {
        self.quad = None;
        self.textures.release_all(loader);
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    fn quad(&mut self, surface: &mut dyn RenderSurface) -> QuadHandle {
        *self
            .quad
            .get_or_insert_with(|| surface.upload_quad(&QUAD_VERTICES, &QUAD_INDICES))
    }

    /// Draw every listed slot of a pool in one call. The first entity decides
    /// the texture; all members of a pool share one.
    pub fn submit<T: Drawable + Poolable>(
        &mut self,
        surface: &mut dyn RenderSurface,
        loader: &mut dyn TextureLoader,
        view_proj: &Mat4,
        pool: &ObjectPool<T>,
        active: &[SlotId],
    ) {
        let Some(&first) = active.first() else {
            return;
        };
        let texture = self.textures.get(&pool.get(first).drawable(), loader);

        self.scratch.clear();
        self.scratch.extend(
            active
                .iter()
                .map(|&slot| pool.get(slot))
                .filter(|entity| entity.body().alive)
                .map(|entity| SpriteInstance::from_body(view_proj, entity.body())),
        );
        if self.scratch.is_empty() {
            return;
        }

        let quad = self.quad(surface);
        surface.draw_batch(quad, texture, &self.scratch);
    }

    /// Draw a single non-pooled entity
    pub fn submit_one<T: Drawable>(
        &mut self,
        surface: &mut dyn RenderSurface,
        loader: &mut dyn TextureLoader,
        view_proj: &Mat4,
        entity: &T,
    ) {
        let texture = self.textures.get(&entity.drawable(), loader);
        let instance = SpriteInstance::from_body(view_proj, entity.body());
        let quad = self.quad(surface);
        surface.draw_batch(quad, texture, &[instance]);
    }
}
