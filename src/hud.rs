//! HUD placement
//!
//! The platform measures where its overlay widgets sit on screen and sends
//! those rectangles in pixels. They are mapped into world space here so the
//! HUD sprites line up with them.

use std::collections::HashMap;

use glam::Vec2;

use crate::consts::*;
use crate::sim::{HudIcon, HudText, TextAnchor};

/// HUD elements the platform can position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HudElement {
    HazardIcon,
    HazardCountText,
}

/// Screen rectangle in pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ScreenRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }
}

pub type HudLayout = HashMap<HudElement, ScreenRect>;

/// Surface size in pixels. Never zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// `None` for empty or non-finite sizes
    pub fn new(width: f32, height: f32) -> Option<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Height over width; the world's vertical half-extent
    pub fn ratio(&self) -> f32 {
        self.height / self.width
    }

    /// Pixel point to world point
    pub fn to_world(&self, px: Vec2) -> Vec2 {
        let ratio = self.ratio();
        Vec2::new(
            px.x / self.width * 2.0 - 1.0,
            -(px.y / self.height * 2.0 * ratio - ratio),
        )
    }

    pub fn to_centered(&self, rect: &ScreenRect) -> Vec2 {
        self.to_world(rect.center())
    }

    /// Bottom-left corner in world space
    pub fn to_corner(&self, rect: &ScreenRect) -> Vec2 {
        self.to_world(Vec2::new(rect.left, rect.bottom))
    }

    /// Both axes are divided by the width, matching the world's x span
    pub fn to_scale(&self, rect: &ScreenRect) -> Vec2 {
        Vec2::new(rect.width() / self.width, rect.height() / self.width)
    }
}

/// Engine-owned HUD and overlay entities
#[derive(Debug, Clone)]
pub struct HudOverlay {
    pub icon: HudIcon,
    pub count_text: HudText,
    pub game_over_text: HudText,
    pub rank_text: HudText,
    layout: HudLayout,
}

impl Default for HudOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl HudOverlay {
    pub fn new() -> Self {
        let mut game_over_text = HudText::new(GAME_OVER_TEXT_PX, TextAnchor::Center);
        game_over_text.set_anchor(TextAnchor::Center, GAME_OVER_TEXT_Y);
        let mut rank_text = HudText::new(RANK_TEXT_PX, TextAnchor::Center);
        rank_text.set_anchor(TextAnchor::Center, RANK_TEXT_Y);

        let mut count_text = HudText::new(COUNT_TEXT_PX, TextAnchor::Left(0.0));
        count_text.set_text("0");

        Self {
            icon: HudIcon::default(),
            count_text,
            game_over_text,
            rank_text,
            layout: HudLayout::new(),
        }
    }

    pub fn layout(&self) -> &HudLayout {
        &self.layout
    }

    /// Replace the layout and re-place the HUD if the viewport is known
    pub fn set_layout(&mut self, layout: HudLayout, viewport: Option<Viewport>) {
        self.layout = layout;
        if let Some(viewport) = viewport {
            self.apply(&viewport);
        }
    }

    /// Map the current layout into world space. Idempotent.
    pub fn apply(&mut self, viewport: &Viewport) {
        for text in [
            &mut self.count_text,
            &mut self.game_over_text,
            &mut self.rank_text,
        ] {
            text.fit(viewport.width());
        }

        let mut missing = Vec::new();

        match self.layout.get(&HudElement::HazardIcon) {
            Some(rect) => self
                .icon
                .place(viewport.to_centered(rect), viewport.to_scale(rect)),
            None => missing.push(HudElement::HazardIcon),
        }

        match self.layout.get(&HudElement::HazardCountText) {
            Some(rect) => {
                let corner = viewport.to_corner(rect);
                self.count_text.set_anchor(TextAnchor::Left(corner.x), corner.y);
                self.count_text.visible = true;
            }
            None => missing.push(HudElement::HazardCountText),
        }

        if !missing.is_empty() {
            log::warn!("HUD layout has no rectangle for {:?}", missing);
        }
    }

    pub fn set_count(&mut self, destroyed: u32) {
        self.count_text.set_text(&destroyed.to_string());
    }

    /// Show or hide the two game-over lines
    pub fn show_result(&mut self, summary: Option<(&str, &str)>) {
        match summary {
            Some((score_line, rank_line)) => {
                self.game_over_text.set_text(score_line);
                self.rank_text.set_text(rank_line);
                self.game_over_text.visible = true;
                self.rank_text.visible = true;
            }
            None => {
                self.game_over_text.visible = false;
                self.rank_text.visible = false;
            }
        }
    }
}
