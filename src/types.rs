use std::ops::{Add, AddAssign, Mul};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Rotation in canvas coordinates (y grows downward), so a positive
    /// quarter turn maps the x axis onto the downward y axis.
    pub fn rotated(self, radians: f32) -> Vec2 {
        let (sin, cos) = radians.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Padded overlap test: true when the gap between the boxes is smaller
    /// than `margin` on both axes. Strict comparisons, so boxes separated by
    /// exactly `margin` do not count as touching.
    pub fn overlaps_padded(&self, other: &Rect, margin: f32) -> bool {
        self.x < other.x + other.width + margin
            && self.x + self.width + margin > other.x
            && self.y < other.y + other.height + margin
            && self.y + self.height + margin > other.y
    }

    pub fn fits_within(&self, canvas_width: f32, canvas_height: f32) -> bool {
        self.x >= 0.0
            && self.x + self.width <= canvas_width
            && self.y >= 0.0
            && self.y + self.height <= canvas_height
    }

    pub fn inflated(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    pub text: String,
    pub count: u32,
}

impl Word {
    pub fn new(text: impl Into<String>, count: u32) -> Self {
        Self {
            text: text.into(),
            count,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub text: String,
    pub count: u32,
    pub font_size: f32,
    pub color: Rgb,
    pub rotation: Rotation,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Glyph {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
