//! GPU-facing data for sprite quads

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

use crate::sim::Body;

/// Corner of the shared unit quad
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl QuadVertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }
}

/// Unit quad spanning `[-1, 1]` on both axes, so entity scale is a half-extent
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex::new(-1.0, -1.0, 0.0, 1.0),
    QuadVertex::new(1.0, -1.0, 1.0, 1.0),
    QuadVertex::new(1.0, 1.0, 1.0, 0.0),
    QuadVertex::new(-1.0, 1.0, 0.0, 0.0),
];

/// Two counter-clockwise triangles
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Per-sprite instance data (must match the sprite shader layout)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub mvp: [[f32; 4]; 4],
}

impl SpriteInstance {
    /// `view_proj * translate * rotate_z * scale`
    pub fn from_body(view_proj: &Mat4, body: &Body) -> Self {
        let model = Mat4::from_scale_rotation_translation(
            body.scale.extend(1.0),
            Quat::from_rotation_z(body.rotation_z.to_radians()),
            body.position,
        );
        Self {
            mvp: (*view_proj * model).to_cols_array_2d(),
        }
    }

    /// Where the quad's center lands in clip space
    pub fn origin(&self) -> Vec3 {
        Vec3::new(self.mvp[3][0], self.mvp[3][1], self.mvp[3][2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_instance_places_quad_at_body() {
        let body = Body {
            position: Vec3::new(0.25, -0.5, 0.0),
            scale: Vec2::new(0.1, 0.2),
            rotation_z: 90.0,
            ..Default::default()
        };
        let instance = SpriteInstance::from_body(&Mat4::IDENTITY, &body);
        assert!((instance.origin() - body.position).length() < 1e-6);

        // A quarter turn sends the quad's +x corner onto +y
        let model = Mat4::from_cols_array_2d(&instance.mvp);
        let corner = model.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((corner - Vec3::new(0.25, -0.4, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_quad_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 16);
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 64);
        assert_eq!(bytemuck::cast_slice::<QuadVertex, f32>(&QUAD_VERTICES).len(), 16);
    }
}
