/// Gameplay tuning for the player's airplane.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirplaneTuning {
    /// Sprite-sized hit box in pixels.
    pub width: f32,
    pub height: f32,

    /// Horizontal step in pixels per tick.
    pub speed: f32,

    /// Vertical steps are `speed * vertical_factor`.
    pub vertical_factor: f32,

    /// Start position relative to the playfield: x is centred minus this offset.
    pub start_offset_x: f32,
    /// Start position: y is `height - start_inset_y`.
    pub start_inset_y: f32,

    /// Topmost y the airplane may climb to.
    pub top_margin: f32,
    /// Gap kept between the airplane and the bottom edge.
    pub bottom_margin: f32,

    /// Ticks between two rockets while fire is held.
    pub shoot_cooldown_ticks: u32,
}

impl AirplaneTuning {
    pub fn desktop() -> Self {
        Self {
            width: 150.0 * 0.85,
            height: 175.0 * 0.85,
            speed: 5.0,
            vertical_factor: 0.7,
            start_offset_x: 75.0 * 0.85,
            start_inset_y: 170.0,
            top_margin: 50.0,
            bottom_margin: 10.0,
            shoot_cooldown_ticks: 15,
        }
    }

    pub fn mobile() -> Self {
        Self {
            width: 100.0,
            height: 120.0,
            speed: 4.0,
            start_offset_x: 50.0,
            start_inset_y: 100.0,
            ..Self::desktop()
        }
    }
}

impl Default for AirplaneTuning {
    fn default() -> Self {
        Self::desktop()
    }
}
