use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::{
    config,
    types::{Glyph, Rgb, Rgba, Rotation, Vec2},
};

/// The hosting surface is missing or unusable. The caller decides whether to
/// retry or fall back; no partial draw state is left behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceError {
    Unavailable,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Unavailable => write!(f, "rendering surface unavailable"),
        }
    }
}

impl std::error::Error for SurfaceError {}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub bold: bool,
    pub family: &'static str,
}

impl FontSpec {
    pub fn sized(size: f32) -> Self {
        Self {
            size,
            bold: true,
            family: config::FONT_FAMILY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowSpec {
    pub color: Rgba,
    pub blur: f32,
    pub offset: Vec2,
}

impl ShadowSpec {
    pub fn soft() -> Self {
        Self {
            color: Rgba::new(0, 0, 0, config::SHADOW_ALPHA),
            blur: config::SHADOW_BLUR,
            offset: Vec2::new(config::SHADOW_OFFSET, config::SHADOW_OFFSET),
        }
    }
}

/// Text measurement capability of a rendering surface.
pub trait Measure {
    fn text_width(&self, text: &str, font: &FontSpec) -> Result<f32, SurfaceError>;
}

/// Drawing capability of a rendering surface, canvas-style: style setters
/// mutate current state, `save`/`restore` manage a state stack.
pub trait Surface: Measure {
    fn clear(&mut self) -> Result<(), SurfaceError>;
    fn save(&mut self);
    fn restore(&mut self);
    fn set_font(&mut self, font: &FontSpec);
    fn set_fill(&mut self, color: Rgb);
    fn set_shadow(&mut self, shadow: &ShadowSpec);
    fn translate(&mut self, delta: Vec2);
    fn rotate(&mut self, radians: f32);
    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<(), SurfaceError>;
}

/// Saves surface state on entry and restores it on drop, so style and
/// transform mutations cannot leak out of a glyph's paint, error paths
/// included.
struct StateScope<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> StateScope<'a, S> {
    fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Drop for StateScope<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

impl<S: Surface + ?Sized> Deref for StateScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for StateScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

/// Paints placed glyphs onto the surface. Vertical glyphs rotate the context
/// a quarter turn about the glyph center and draw with coordinates adjusted
/// so the visual center matches the unrotated placement.
pub fn render<S: Surface + ?Sized>(glyphs: &[Glyph], surface: &mut S) -> Result<(), SurfaceError> {
    surface.clear()?;
    let shadow = ShadowSpec::soft();

    for glyph in glyphs {
        let mut scope = StateScope::new(surface);
        scope.set_font(&FontSpec::sized(glyph.font_size));
        scope.set_fill(glyph.color);
        scope.set_shadow(&shadow);

        match glyph.rotation {
            Rotation::Vertical => {
                scope.translate(Vec2::new(
                    glyph.x + glyph.width / 2.0,
                    glyph.y + glyph.height / 2.0,
                ));
                scope.rotate(std::f32::consts::FRAC_PI_2);
                scope.fill_text(&glyph.text, -glyph.height / 2.0, -glyph.width / 2.0)?;
            }
            Rotation::Horizontal => {
                scope.fill_text(&glyph.text, glyph.x, glyph.y)?;
            }
        }
    }

    Ok(())
}

#[derive(Clone, Copy, Debug)]
pub struct Cell {
    pub ch: char,
    pub priority: f32,
    pub color: Rgb,
}

const EMPTY_CELL: Cell = Cell {
    ch: ' ',
    priority: f32::NEG_INFINITY,
    color: Rgb::new(255, 255, 255),
};

#[derive(Clone, Copy, Debug)]
struct DrawState {
    font: FontSpec,
    fill: Rgb,
    origin: Vec2,
    rotation: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            font: FontSpec::sized(config::MIN_FONT_SIZE),
            fill: Rgb::new(255, 255, 255),
            origin: Vec2::ZERO,
            rotation: 0.0,
        }
    }
}

/// Terminal-cell implementation of the rendering surface. Each cell stands
/// for an 8x16 px patch of the virtual canvas; contested cells go to the
/// glyph with the larger font size. Shadows have no cell representation and
/// are accepted but ignored.
#[derive(Debug)]
pub struct CellSurface {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl CellSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut surface = Self {
            cols,
            rows,
            cells: Vec::new(),
            state: DrawState::default(),
            stack: Vec::new(),
        };
        surface.resize(cols, rows);
        surface
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        let len = (cols as usize).saturating_mul(rows as usize);
        if self.cells.len() != len {
            self.cells.resize(len, EMPTY_CELL);
        }
        self.reset_cells();
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn px_width(&self) -> f32 {
        self.cols as f32 * config::CELL_WIDTH_PX
    }

    pub fn px_height(&self) -> f32 {
        self.rows as f32 * config::CELL_HEIGHT_PX
    }

    pub fn get(&self, col: u16, row: u16) -> Cell {
        debug_assert!(col < self.cols && row < self.rows, "get() out of bounds");
        let idx = (row as usize) * (self.cols as usize) + (col as usize);
        self.cells[idx]
    }

    fn reset_cells(&mut self) {
        for cell in &mut self.cells {
            *cell = EMPTY_CELL;
        }
    }

    fn set(&mut self, col: i32, row: i32, ch: char, priority: f32, color: Rgb) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = (row as usize) * (self.cols as usize) + (col as usize);
        let cell = &mut self.cells[idx];
        if priority >= cell.priority {
            cell.ch = ch;
            cell.priority = priority;
            cell.color = color;
        }
    }
}

impl Measure for CellSurface {
    fn text_width(&self, text: &str, font: &FontSpec) -> Result<f32, SurfaceError> {
        let advance = font.size * config::GLYPH_ADVANCE_RATIO;
        Ok(text.chars().count() as f32 * advance)
    }
}

impl Surface for CellSurface {
    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.reset_cells();
        Ok(())
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.state.font = *font;
    }

    fn set_fill(&mut self, color: Rgb) {
        self.state.fill = color;
    }

    fn set_shadow(&mut self, _shadow: &ShadowSpec) {}

    fn translate(&mut self, delta: Vec2) {
        let rotated = delta.rotated(self.state.rotation);
        self.state.origin += rotated;
    }

    fn rotate(&mut self, radians: f32) {
        self.state.rotation += radians;
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<(), SurfaceError> {
        let advance = self.state.font.size * config::GLYPH_ADVANCE_RATIO;
        let priority = self.state.font.size;
        let fill = self.state.fill;
        for (idx, ch) in text.chars().enumerate() {
            // Plot each character at its center so the covering cell is the
            // one the character visually occupies.
            let local = Vec2::new(
                x + idx as f32 * advance + advance / 2.0,
                y + self.state.font.size / 2.0,
            );
            let world = self.state.origin + local.rotated(self.state.rotation);
            let col = (world.x / config::CELL_WIDTH_PX).floor() as i32;
            let row = (world.y / config::CELL_HEIGHT_PX).floor() as i32;
            self.set(col, row, ch, priority, fill);
        }
        Ok(())
    }
}
