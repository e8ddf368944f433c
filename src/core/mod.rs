use std::collections::HashMap;

use crate::{
    config,
    render::{FontSpec, Measure, SurfaceError},
    spatial::BoxGrid,
    types::{Glyph, Rect, Rotation, Vec2, Word},
};

/// Wrapping sum of the text's char code points. The rotation derivation
/// below depends on this exact hash; rendered clouds stay stable across
/// passes because of it.
pub fn text_hash(text: &str) -> u32 {
    text.chars().fold(0u32, |acc, ch| acc.wrapping_add(ch as u32))
}

/// Roughly a third of all words come out vertical, and a given word always
/// gets the same answer no matter its count or position in the list.
pub fn rotation_for(text: &str) -> Rotation {
    if text_hash(text) % 3 == 0 {
        Rotation::Vertical
    } else {
        Rotation::Horizontal
    }
}

pub fn max_font_size(canvas_width: f32) -> f32 {
    config::MAX_FONT_SIZE_CAP.min(canvas_width / config::MAX_FONT_CANVAS_DIVISOR)
}

/// Full layout pass: style assignment, measurement through the injected
/// capability, then spiral placement. Returns the placed subset only; words
/// that found no room are dropped, which is a density outcome rather than an
/// error.
pub fn layout<M: Measure + ?Sized>(
    words: &[Word],
    canvas_width: f32,
    canvas_height: f32,
    measure: &M,
) -> Result<Vec<Glyph>, SurfaceError> {
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let mut glyphs = assign_styles(words, canvas_width);
    measure_glyphs(&mut glyphs, measure)?;
    Ok(place(glyphs, canvas_width, canvas_height))
}

fn assign_styles(words: &[Word], canvas_width: f32) -> Vec<Glyph> {
    let max_count = words.iter().map(|w| w.count).max().unwrap_or(0);
    let max_size = max_font_size(canvas_width);

    words
        .iter()
        .enumerate()
        .map(|(idx, word)| {
            let font_size = if max_count == 0 {
                config::MIN_FONT_SIZE
            } else {
                let t = word.count as f32 / max_count as f32;
                // The width cap can fall below the floor on very narrow
                // canvases; sizes still never drop under the minimum.
                (config::MIN_FONT_SIZE + t * (max_size - config::MIN_FONT_SIZE))
                    .max(config::MIN_FONT_SIZE)
            };
            Glyph {
                text: word.text.clone(),
                count: word.count,
                font_size,
                color: config::PALETTE[idx % config::PALETTE.len()],
                rotation: rotation_for(&word.text),
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            }
        })
        .collect()
}

fn measure_glyphs<M: Measure + ?Sized>(
    glyphs: &mut [Glyph],
    measure: &M,
) -> Result<(), SurfaceError> {
    for glyph in glyphs {
        let font = FontSpec::sized(glyph.font_size);
        let text_width = measure.text_width(&glyph.text, &font)?;
        match glyph.rotation {
            // Vertical text occupies the post-rotation footprint.
            Rotation::Vertical => {
                glyph.width = glyph.font_size;
                glyph.height = text_width;
            }
            Rotation::Horizontal => {
                glyph.width = text_width;
                glyph.height = glyph.font_size;
            }
        }
    }
    Ok(())
}

fn place(glyphs: Vec<Glyph>, canvas_width: f32, canvas_height: f32) -> Vec<Glyph> {
    let center = Vec2::new(canvas_width / 2.0, canvas_height / 2.0);
    let radius_limit = canvas_width.max(canvas_height);
    let mut grid = BoxGrid::new(config::GRID_CELL_SIZE);
    let mut scratch = Vec::new();
    let mut placed = Vec::new();

    for mut glyph in glyphs {
        let mut angle = 0.0_f32;
        let mut radius = 0.0_f32;
        let mut spot = None;

        while radius < radius_limit {
            let x = center.x + radius * angle.cos() - glyph.width / 2.0;
            // The y offset is height/3, not height/2; kept as-is for
            // pixel-exact compatibility with reference renders.
            let y = center.y + radius * angle.sin() + glyph.height / 3.0;
            let candidate = Rect::new(x, y, glyph.width, glyph.height);

            if !grid.collides(&candidate, config::PLACEMENT_MARGIN, &mut scratch)
                && candidate.fits_within(canvas_width, canvas_height)
            {
                spot = Some((x, y));
                break;
            }

            angle += config::ANGLE_STEP;
            radius += config::RADIUS_STEP * config::ANGLE_STEP;
        }

        match spot {
            Some((x, y)) => {
                glyph.x = x;
                glyph.y = y;
                grid.insert(glyph.bounds());
                placed.push(glyph);
            }
            None => {
                log::debug!("no room for \"{}\", leaving it out", glyph.text);
            }
        }
    }

    placed
}

/// Cleans one raw response the way submissions are validated: strip
/// everything outside word characters, hyphen, and whitespace, reject
/// multi-word input, lowercase the rest.
pub fn normalize_word(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_' || *ch == '-' || ch.is_whitespace())
        .collect();
    if cleaned.is_empty() || cleaned.chars().any(char::is_whitespace) {
        return None;
    }
    Some(cleaned.to_lowercase())
}

/// Folds normalized responses into per-word counts, ordered count-descending
/// (text ascending on ties) so the layout sees the most frequent words first.
pub fn tally(responses: &[String]) -> Vec<Word> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for response in responses {
        *counts.entry(response.as_str()).or_insert(0) += 1;
    }

    let mut words: Vec<Word> = counts
        .into_iter()
        .map(|(text, count)| Word::new(text, count))
        .collect();
    words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
    words
}
