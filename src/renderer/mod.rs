//! Sprite rendering
//!
//! The engine never talks to a graphics API directly. It hands batches of
//! per-sprite transforms to a [`RenderSurface`] implemented by the platform.

pub mod batch;
pub mod texture;
pub mod vertex;

pub use batch::{QuadHandle, RenderBatcher, RenderSurface};
pub use texture::{DrawableId, TextureCache, TextureHandle, TextureLoader};
pub use vertex::{QUAD_INDICES, QUAD_VERTICES, QuadVertex, SpriteInstance};
