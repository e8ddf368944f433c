use crate::types::Rgb;

pub const MIN_FONT_SIZE: f32 = 16.0;
pub const MAX_FONT_SIZE_CAP: f32 = 80.0;
pub const MAX_FONT_CANVAS_DIVISOR: f32 = 8.0;

pub const FONT_FAMILY: &str = "Inter, sans-serif";

pub const PLACEMENT_MARGIN: f32 = 10.0;
pub const ANGLE_STEP: f32 = 0.1;
pub const RADIUS_STEP: f32 = 5.0;

pub const SHADOW_BLUR: f32 = 4.0;
pub const SHADOW_OFFSET: f32 = 2.0;
pub const SHADOW_ALPHA: f32 = 0.1;

pub const GRID_CELL_SIZE: f32 = 64.0;

pub const POLL_INTERVAL_SECS: u64 = 3;
pub const FEED_BATCH_MAX: usize = 3;
pub const INPUT_MAX: usize = 32;

// Pixel footprint of one terminal cell for the demo surface.
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;
pub const GLYPH_ADVANCE_RATIO: f32 = 0.6;

pub const PALETTE: [Rgb; 15] = [
    Rgb::new(255, 107, 107),
    Rgb::new(78, 205, 196),
    Rgb::new(69, 183, 209),
    Rgb::new(255, 160, 122),
    Rgb::new(152, 216, 200),
    Rgb::new(247, 220, 111),
    Rgb::new(187, 143, 206),
    Rgb::new(133, 193, 226),
    Rgb::new(248, 177, 149),
    Rgb::new(192, 108, 132),
    Rgb::new(108, 91, 123),
    Rgb::new(246, 114, 128),
    Rgb::new(53, 92, 125),
    Rgb::new(153, 184, 152),
    Rgb::new(232, 74, 95),
];
