use glam::Vec2;

/// Side-scrolling camera that follows a target horizontally.
///
/// `scroll_x` is the world x of the view's left edge. The vertical axis is
/// fixed; the whole level height is always on screen.
#[derive(Debug, Clone)]
pub struct FollowCamera {
    /// Visible width in world units.
    pub width: f32,
    /// Visible height in world units.
    pub height: f32,
    /// World x of the left edge of the view.
    pub scroll_x: f32,
    /// Horizontal scroll limits (min_x, max_x) for the view's edges.
    pub bounds: Option<[f32; 2]>,
    /// Fraction of the remaining distance covered per step (1.0 = snap).
    pub lerp: f32,
    following: bool,
}

impl FollowCamera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            bounds: None,
            lerp: 1.0,
            following: true,
        }
    }

    /// Set horizontal world bounds. The view never shows x outside them.
    pub fn set_bounds(&mut self, min_x: f32, max_x: f32) {
        self.bounds = Some([min_x, max_x]);
        self.clamp_to_bounds();
    }

    /// Set the per-step follow factor, clamped to (0, 1].
    pub fn set_lerp(&mut self, lerp: f32) {
        self.lerp = lerp.clamp(0.001, 1.0);
    }

    /// Stop tracking the target; the view freezes where it is.
    pub fn stop_follow(&mut self) {
        self.following = false;
    }

    pub fn start_follow(&mut self) {
        self.following = true;
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    /// Center the view on `target` immediately.
    pub fn snap_to(&mut self, target: Vec2) {
        self.scroll_x = target.x - self.width / 2.0;
        self.clamp_to_bounds();
    }

    /// Ease the view toward centering on `target`. Call once per step.
    pub fn follow(&mut self, target: Vec2) {
        if !self.following {
            return;
        }
        let desired = target.x - self.width / 2.0;
        self.scroll_x += (desired - self.scroll_x) * self.lerp;
        self.clamp_to_bounds();
    }

    /// World x of the view's right edge.
    pub fn view_right(&self) -> f32 {
        self.scroll_x + self.width
    }

    /// Whether the horizontal span [left, right] overlaps the view.
    pub fn is_span_visible(&self, left: f32, right: f32) -> bool {
        right >= self.scroll_x && left <= self.view_right()
    }

    fn clamp_to_bounds(&mut self) {
        if let Some([min_x, max_x]) = self.bounds {
            if self.width >= max_x - min_x {
                self.scroll_x = min_x;
            } else {
                self.scroll_x = self.scroll_x.clamp(min_x, max_x - self.width);
            }
        }
    }
}
