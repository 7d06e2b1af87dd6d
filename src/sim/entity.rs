//! Entity kinds and their capabilities
//!
//! Every kind wraps a shared [`Body`] and opts into the capabilities it
//! needs: pooled kinds implement [`Poolable`], moving kinds [`Updatable`],
//! anything that can be hit [`Collidable`], anything on screen [`Drawable`].

use glam::{Vec2, Vec3};
use rand::Rng;

use super::collision::Circle;
use crate::consts::*;
use crate::random_between;
use crate::renderer::DrawableId;

/// Transform, motion and collision state shared by every entity kind
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec3,
    /// Displacement per frame
    pub velocity: Vec3,
    pub scale: Vec2,
    /// Degrees around the z axis
    pub rotation_z: f32,
    /// Collision circle center, in units of local scale
    pub collision_center: Vec2,
    /// Collision circle radius, in units of local scale
    pub collision_radius: f32,
    pub alive: bool,
    pub in_use: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            scale: Vec2::ONE,
            rotation_z: 0.0,
            collision_center: Vec2::ZERO,
            collision_radius: 1.0,
            alive: false,
            in_use: false,
        }
    }
}

impl Body {
    /// World-space collision circle. Both the offset and the radius follow the x scale.
    pub fn collision_circle(&self) -> Circle {
        Circle {
            center: self.position.truncate() + self.collision_center * self.scale.x,
            radius: self.collision_radius * self.scale.x,
        }
    }

    #[inline]
    fn step(&mut self) {
        self.position += self.velocity;
    }
}

/// Per-frame inputs to motion updates
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Screen height / width; the visible y range is `[-ratio, ratio]`
    pub ratio: f32,
    /// Horizontal bias from the tilt provider, in `[-1, 1]`
    pub tilt: f32,
}

/// Access to the shared body
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
}

/// Participates in circle-overlap tests
pub trait Collidable: Entity {
    fn circle(&self) -> Circle {
        self.body().collision_circle()
    }
}

/// Advances once per frame
pub trait Updatable: Entity {
    /// Returns `false` once the entity has expired or left its valid range
    fn update(&mut self, ctx: &FrameContext) -> bool;
}

/// Has a texture and can be submitted to the renderer
pub trait Drawable: Entity {
    fn drawable(&self) -> DrawableId;
}

/// Can live in an [`super::ObjectPool`]; `Default` is the recycled state
pub trait Poolable: Entity + Default {}

/// Falling rock
#[derive(Debug, Clone, Default)]
pub struct Hazard {
    pub body: Body,
    /// Degrees per frame
    pub spin: f32,
}

impl Hazard {
    /// Randomize size, drop position and speed; spawns just above the top edge
    pub fn init_random<R: Rng + ?Sized>(&mut self, rng: &mut R, ratio: f32) {
        let scale = random_between(rng, HAZARD_MIN_SCALE, HAZARD_MAX_SCALE);
        self.body.scale = Vec2::splat(scale);
        self.body.position = Vec3::new(
            random_between(rng, -HAZARD_SPAWN_SPAN, HAZARD_SPAWN_SPAN),
            ratio + scale,
            0.0,
        );
        self.body.velocity = Vec3::new(
            random_between(rng, -HAZARD_MAX_DRIFT, HAZARD_MAX_DRIFT),
            -random_between(rng, HAZARD_MIN_FALL_SPEED, HAZARD_MAX_FALL_SPEED),
            0.0,
        );
        self.body.rotation_z = random_between(rng, 0.0, 360.0);
        self.spin = random_between(rng, -HAZARD_MAX_SPIN, HAZARD_MAX_SPIN);
    }
}

impl Entity for Hazard {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Collidable for Hazard {}
impl Poolable for Hazard {}

impl Updatable for Hazard {
    fn update(&mut self, ctx: &FrameContext) -> bool {
        self.body.step();
        self.body.rotation_z = (self.body.rotation_z + self.spin) % 360.0;
        // Valid until the top of the rock passes the bottom edge
        self.body.position.y + self.body.scale.y > -ctx.ratio
    }
}

impl Drawable for Hazard {
    fn drawable(&self) -> DrawableId {
        DrawableId::Hazard
    }
}

/// Debris from a destroyed hazard; decorative only
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    pub body: Body,
    pub spin: f32,
    /// Frames left before expiry
    pub ttl: u32,
}

impl Fragment {
    pub fn init(&mut self, position: Vec3, velocity: Vec3, scale: f32, lifetime: u32) {
        self.body.position = position;
        self.body.velocity = velocity;
        self.body.scale = Vec2::splat(scale);
        self.spin = velocity.x * 600.0;
        self.ttl = lifetime;
    }
}

impl Entity for Fragment {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Poolable for Fragment {}

impl Updatable for Fragment {
    fn update(&mut self, ctx: &FrameContext) -> bool {
        self.body.step();
        self.body.rotation_z += self.spin;
        self.ttl = self.ttl.saturating_sub(1);
        self.ttl > 0 && self.body.position.y + self.body.scale.y > -ctx.ratio
    }
}

impl Drawable for Fragment {
    fn drawable(&self) -> DrawableId {
        DrawableId::Fragment
    }
}

/// Protected creature pacing along the ground
#[derive(Debug, Clone, Default)]
pub struct Target {
    pub body: Body,
}

impl Target {
    pub fn init<R: Rng + ?Sized>(&mut self, rng: &mut R, ratio: f32) {
        self.body.scale = Vec2::splat(TARGET_SCALE);
        let span = 1.0 - TARGET_SCALE;
        self.body.position = Vec3::new(random_between(rng, -span, span), 0.0, 0.0);
        let direction = if rng.random::<bool>() { 1.0 } else { -1.0 };
        self.body.velocity = Vec3::new(TARGET_WALK_SPEED * direction, 0.0, 0.0);
        self.apply_ratio(ratio);
    }

    /// Stand on the bottom edge
    pub fn apply_ratio(&mut self, ratio: f32) {
        self.body.position.y = -ratio + self.body.scale.y;
    }
}

impl Entity for Target {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Collidable for Target {}
impl Poolable for Target {}

impl Updatable for Target {
    fn update(&mut self, _ctx: &FrameContext) -> bool {
        self.body.step();
        let limit = 1.0 - self.body.scale.x;
        if self.body.position.x.abs() > limit {
            self.body.position.x = self.body.position.x.clamp(-limit, limit);
            self.body.velocity.x = -self.body.velocity.x;
        }
        // Only a hazard can remove a target
        true
    }
}

impl Drawable for Target {
    fn drawable(&self) -> DrawableId {
        DrawableId::Target
    }
}

/// The tilt-driven ship; one per engine, never pooled
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    /// Horizontal speed at full tilt
    pub speed: f32,
}

impl Player {
    pub fn new(speed: f32, ratio: f32) -> Self {
        let mut player = Self {
            body: Body {
                scale: Vec2::splat(PLAYER_SCALE),
                collision_radius: PLAYER_COLLISION_RADIUS,
                alive: true,
                in_use: true,
                ..Default::default()
            },
            speed,
        };
        player.apply_ratio(ratio);
        player
    }

    pub fn apply_ratio(&mut self, ratio: f32) {
        self.body.position.y = -ratio + PLAYER_ALTITUDE;
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Collidable for Player {}

impl Updatable for Player {
    fn update(&mut self, ctx: &FrameContext) -> bool {
        self.body.velocity.x = ctx.tilt.clamp(-1.0, 1.0) * self.speed;
        self.body.step();
        let limit = 1.0 - self.body.scale.x;
        self.body.position.x = self.body.position.x.clamp(-limit, limit);
        true
    }
}

impl Drawable for Player {
    fn drawable(&self) -> DrawableId {
        DrawableId::Player
    }
}

/// Static hazard picture next to the destroyed counter
#[derive(Debug, Clone, Default)]
pub struct HudIcon {
    pub body: Body,
    /// False until a layout has placed it
    pub visible: bool,
}

impl HudIcon {
    pub fn place(&mut self, center: Vec2, scale: Vec2) {
        self.body.position = center.extend(0.0);
        self.body.scale = scale;
        self.visible = true;
    }
}

impl Entity for HudIcon {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Drawable for HudIcon {
    fn drawable(&self) -> DrawableId {
        DrawableId::Hazard
    }
}

/// Where a text quad is pinned
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextAnchor {
    /// Horizontally centered on screen
    Center,
    /// Left edge at this x
    Left(f32),
}

/// A line of overlay text rendered into its own texture
#[derive(Debug, Clone)]
pub struct HudText {
    pub body: Body,
    pub text: String,
    pub size_px: u32,
    pub anchor: TextAnchor,
    pub visible: bool,
    /// World units per screen pixel; zero until the surface size is known
    px_to_world: f32,
}

impl HudText {
    pub fn new(size_px: u32, anchor: TextAnchor) -> Self {
        Self {
            body: Body::default(),
            text: String::new(),
            size_px,
            anchor,
            visible: false,
            px_to_world: 0.0,
        }
    }

    /// Record the surface width so quad size can follow the text
    pub fn fit(&mut self, surface_width: f32) {
        if surface_width > 0.0 {
            // The x axis spans two world units across the surface
            self.px_to_world = 2.0 / surface_width;
            self.relayout();
        }
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
            self.relayout();
        }
    }

    pub fn set_anchor(&mut self, anchor: TextAnchor, y: f32) {
        self.anchor = anchor;
        self.body.position.y = y;
        self.relayout();
    }

    fn relayout(&mut self) {
        // Quads span [-1, 1], so scale is the half-extent
        let half_height = self.size_px as f32 * self.px_to_world * 0.5;
        let half_width = half_height * GLYPH_ASPECT * self.text.chars().count() as f32;
        self.body.scale = Vec2::new(half_width, half_height);
        self.body.position.x = match self.anchor {
            TextAnchor::Center => 0.0,
            TextAnchor::Left(x) => x + half_width,
        };
    }
}

impl Entity for HudText {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Drawable for HudText {
    fn drawable(&self) -> DrawableId {
        DrawableId::Text {
            content: self.text.clone(),
            size_px: self.size_px,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(ratio: f32) -> FrameContext {
        FrameContext { ratio, tilt: 0.0 }
    }

    #[test]
    fn test_hazard_spawns_above_top_and_falls() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut hazard = Hazard::default();
        hazard.init_random(&mut rng, 1.5);
        assert!(hazard.body.position.y > 1.5);
        assert!(hazard.body.velocity.y < 0.0);
        assert!(hazard.body.position.x.abs() <= HAZARD_SPAWN_SPAN);
    }

    #[test]
    fn test_hazard_leaves_range_below_bottom() {
        let mut hazard = Hazard::default();
        hazard.body.scale = Vec2::splat(0.1);
        hazard.body.position = Vec3::new(0.0, -1.05, 0.0);
        hazard.body.velocity = Vec3::new(0.0, -0.01, 0.0);
        assert!(hazard.update(&ctx(1.0)));
        hazard.body.position.y = -1.2;
        assert!(!hazard.update(&ctx(1.0)));
    }

    #[test]
    fn test_fragment_expires_after_lifetime() {
        let mut fragment = Fragment::default();
        fragment.init(Vec3::ZERO, Vec3::ZERO, 0.02, 3);
        assert!(fragment.update(&ctx(1.0)));
        assert!(fragment.update(&ctx(1.0)));
        assert!(!fragment.update(&ctx(1.0)));
    }

    #[test]
    fn test_target_turns_at_edge_and_never_expires() {
        let mut target = Target::default();
        target.body.scale = Vec2::splat(TARGET_SCALE);
        target.body.position.x = 1.0 - TARGET_SCALE;
        target.body.velocity.x = 0.01;
        assert!(target.update(&ctx(1.0)));
        assert!(target.body.velocity.x < 0.0);
        assert!(target.body.position.x <= 1.0 - TARGET_SCALE);
    }

    #[test]
    fn test_player_follows_tilt_and_stays_on_screen() {
        let mut player = Player::new(0.1, 1.0);
        for _ in 0..100 {
            player.update(&FrameContext { ratio: 1.0, tilt: 1.0 });
        }
        assert!((player.body.position.x - (1.0 - PLAYER_SCALE)).abs() < 1e-5);
        player.update(&FrameContext { ratio: 1.0, tilt: -0.5 });
        assert!((player.body.velocity.x + 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_hud_text_left_anchor_tracks_width() {
        let mut text = HudText::new(20, TextAnchor::Left(-0.5));
        text.fit(200.0);
        text.set_text("12");
        let half_height = 20.0 * (2.0 / 200.0) * 0.5;
        assert!((text.body.scale.y - half_height).abs() < 1e-6);
        assert!((text.body.position.x - (-0.5 + text.body.scale.x)).abs() < 1e-6);

        let narrow = text.body.scale.x;
        text.set_text("1234");
        assert!(text.body.scale.x > narrow);
    }
}
