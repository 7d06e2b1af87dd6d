//! Collision detection between entities
//!
//! Every collidable is approximated by one circle in the xy plane; z is
//! ignored. The test is conservative and symmetric.

use glam::Vec2;

use super::entity::{Collidable, Poolable};
use super::pool::{ObjectPool, SlotId};

/// World-space collision circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    /// Strict overlap: circles that only touch do not collide
    #[inline]
    pub fn overlaps(&self, other: &Circle) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }
}

/// Check whether two entities overlap
#[inline]
pub fn collides<A, B>(a: &A, b: &B) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
{
    a.circle().overlaps(&b.circle())
}

/// Index into `active` of the first entity overlapping `probe`, scanning front to back
pub fn first_hit<T>(probe: &Circle, pool: &ObjectPool<T>, active: &[SlotId]) -> Option<usize>
where
    T: Collidable + Poolable,
{
    active
        .iter()
        .position(|&slot| pool.get(slot).circle().overlaps(probe))
}
