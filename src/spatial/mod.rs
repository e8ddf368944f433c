use std::collections::HashMap;

use crate::types::Rect;

/// Uniform grid over placed bounding boxes. Insertion registers a box in
/// every cell its extent touches; collision queries gather candidates from
/// the cells touched by the margin-padded probe and re-run the exact overlap
/// test, so results match a scan over every inserted box.
#[derive(Debug)]
pub struct BoxGrid {
    cell_size: f32,
    boxes: Vec<Rect>,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl BoxGrid {
    pub fn new(cell_size: f32) -> Self {
        assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "cell_size must be positive and finite"
        );
        Self {
            cell_size,
            boxes: Vec::new(),
            cells: HashMap::new(),
        }
    }

    pub fn insert(&mut self, rect: Rect) {
        let idx = self.boxes.len();
        self.boxes.push(rect);
        let ((x0, y0), (x1, y1)) = self.cell_span(&rect);
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                self.cells.entry((cx, cy)).or_default().push(idx);
            }
        }
    }

    pub fn collides(&self, probe: &Rect, margin: f32, scratch: &mut Vec<usize>) -> bool {
        scratch.clear();
        let ((x0, y0), (x1, y1)) = self.cell_span(&probe.inflated(margin));
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                if let Some(indices) = self.cells.get(&(cx, cy)) {
                    scratch.extend_from_slice(indices);
                }
            }
        }
        // A wide box lands in several cells; drop the duplicates.
        scratch.sort_unstable();
        scratch.dedup();
        scratch
            .iter()
            .any(|&idx| self.boxes[idx].overlaps_padded(probe, margin))
    }

    fn cell_span(&self, rect: &Rect) -> ((i32, i32), (i32, i32)) {
        let x0 = (rect.x / self.cell_size).floor() as i32;
        let y0 = (rect.y / self.cell_size).floor() as i32;
        let x1 = ((rect.x + rect.width) / self.cell_size).floor() as i32;
        let y1 = ((rect.y + rect.height) / self.cell_size).floor() as i32;
        ((x0, y0), (x1, y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod box_grid_new {
        use super::*;

        #[test]
        fn creates_with_valid_cell_size() {
            let grid = BoxGrid::new(64.0);
            assert_eq!(grid.cell_size, 64.0);
        }

        #[test]
        #[should_panic(expected = "cell_size must be positive and finite")]
        fn panics_with_zero_cell_size() {
            BoxGrid::new(0.0);
        }

        #[test]
        #[should_panic(expected = "cell_size must be positive and finite")]
        fn panics_with_negative_cell_size() {
            BoxGrid::new(-1.0);
        }

        #[test]
        #[should_panic(expected = "cell_size must be positive and finite")]
        fn panics_with_infinite_cell_size() {
            BoxGrid::new(f32::INFINITY);
        }
    }

    mod box_grid_insert {
        use super::*;

        #[test]
        fn wide_box_registers_in_every_touched_cell() {
            let mut grid = BoxGrid::new(10.0);
            grid.insert(Rect::new(0.0, 0.0, 45.0, 5.0));
            let mut scratch = Vec::new();
            // A probe near the far end of the box must still see it.
            assert!(grid.collides(&Rect::new(44.0, 0.0, 5.0, 5.0), 0.1, &mut scratch));
        }

        #[test]
        fn boxes_with_negative_coordinates_are_indexed() {
            let mut grid = BoxGrid::new(10.0);
            grid.insert(Rect::new(-25.0, -15.0, 10.0, 10.0));
            let mut scratch = Vec::new();
            assert!(grid.collides(&Rect::new(-22.0, -12.0, 4.0, 4.0), 0.1, &mut scratch));
            assert!(!grid.collides(&Rect::new(20.0, 20.0, 4.0, 4.0), 0.1, &mut scratch));
        }
    }

    mod box_grid_collides {
        use super::*;

        #[test]
        fn empty_grid_never_collides() {
            let grid = BoxGrid::new(64.0);
            let mut scratch = Vec::new();
            assert!(!grid.collides(&Rect::new(0.0, 0.0, 100.0, 100.0), 10.0, &mut scratch));
        }

        #[test]
        fn gap_smaller_than_margin_collides() {
            let mut grid = BoxGrid::new(64.0);
            grid.insert(Rect::new(0.0, 0.0, 50.0, 20.0));
            let mut scratch = Vec::new();
            assert!(grid.collides(&Rect::new(55.0, 0.0, 50.0, 20.0), 10.0, &mut scratch));
        }

        #[test]
        fn gap_equal_to_margin_is_clear() {
            let mut grid = BoxGrid::new(64.0);
            grid.insert(Rect::new(0.0, 0.0, 50.0, 20.0));
            let mut scratch = Vec::new();
            assert!(!grid.collides(&Rect::new(60.0, 0.0, 50.0, 20.0), 10.0, &mut scratch));
        }

        #[test]
        fn probe_spanning_cell_boundary_finds_neighbor() {
            let mut grid = BoxGrid::new(10.0);
            grid.insert(Rect::new(12.0, 0.0, 5.0, 5.0));
            let mut scratch = Vec::new();
            // Probe sits in the previous cell column; padding reaches across.
            assert!(grid.collides(&Rect::new(0.0, 0.0, 8.0, 5.0), 10.0, &mut scratch));
        }

        #[test]
        fn matches_brute_force_scan() {
            use rand::{Rng, SeedableRng, rngs::StdRng};

            let mut rng = StdRng::seed_from_u64(7);
            let mut grid = BoxGrid::new(40.0);
            let mut boxes = Vec::new();
            for _ in 0..60 {
                let rect = Rect::new(
                    rng.gen_range(-200.0..600.0),
                    rng.gen_range(-200.0..400.0),
                    rng.gen_range(5.0..180.0),
                    rng.gen_range(5.0..60.0),
                );
                grid.insert(rect);
                boxes.push(rect);
            }

            let mut scratch = Vec::new();
            for _ in 0..200 {
                let probe = Rect::new(
                    rng.gen_range(-250.0..650.0),
                    rng.gen_range(-250.0..450.0),
                    rng.gen_range(5.0..180.0),
                    rng.gen_range(5.0..60.0),
                );
                let expected = boxes.iter().any(|b| b.overlaps_padded(&probe, 10.0));
                assert_eq!(grid.collides(&probe, 10.0, &mut scratch), expected);
            }
        }
    }
}
