//! Visualizers
//!
//! `AsciiVisualizer` draws each object's glyph on a character grid.
//! `HeadlessVisualizer` only counts frames, for benchmarks and tests.

use std::io::Write;

use crate::sim::{SpaceField, Visualizer};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Text renderer writing one frame per tick
pub struct AsciiVisualizer<W: Write> {
    out: W,
    columns: usize,
    rows: usize,
    clear_screen: bool,
    frames: u64,
}

impl<W: Write> AsciiVisualizer<W> {
    pub fn new(out: W, columns: usize, rows: usize) -> Self {
        Self {
            out,
            columns: columns.max(1),
            rows: rows.max(1),
            clear_screen: false,
            frames: 0,
        }
    }

    /// Prefix each frame with an ANSI clear, for interactive terminals
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Draw the field as a bordered grid with a status line
    ///
    /// Field y grows upward, so row 0 of the grid is the top edge. Later
    /// objects overwrite earlier ones; the ship is drawn last.
    pub fn render_to_string(&self, field: &SpaceField) -> String {
        let mut grid = vec![vec![' '; self.columns]; self.rows];

        for object in field.all_objects() {
            let fx = object.center.x() / field.width();
            let fy = object.center.y() / field.height();
            if !(0.0..=1.0).contains(&fx) || !(0.0..=1.0).contains(&fy) {
                continue;
            }
            let col = ((fx * self.columns as f64) as usize).min(self.columns - 1);
            let row_from_bottom = ((fy * self.rows as f64) as usize).min(self.rows - 1);
            grid[self.rows - 1 - row_from_bottom][col] = object.glyph();
        }

        let border = format!("+{}+\n", "-".repeat(self.columns));
        let mut frame = String::with_capacity((self.columns + 3) * (self.rows + 3));
        frame.push_str(&format!(
            "asteroids: {}  missiles: {}  explosions: {}\n",
            field.asteroids().len(),
            field.missiles().len(),
            field.explosions().len()
        ));
        frame.push_str(&border);
        for row in grid {
            frame.push('|');
            frame.extend(row);
            frame.push_str("|\n");
        }
        frame.push_str(&border);
        frame
    }
}

impl<W: Write> Visualizer for AsciiVisualizer<W> {
    fn render_space_field(&mut self, field: &SpaceField) {
        let frame = self.render_to_string(field);
        let prefix = if self.clear_screen { CLEAR_SCREEN } else { "" };
        let written = write!(self.out, "{}{}", prefix, frame).and_then(|_| self.out.flush());
        if let Err(e) = written {
            log::warn!("Failed to draw frame {}: {}", self.frames, e);
        }
        self.frames += 1;
    }
}

/// Draws nothing
#[derive(Debug, Clone, Default)]
pub struct HeadlessVisualizer {
    frames: u64,
    last_object_count: usize,
}

impl HeadlessVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Objects (explosions included) in the most recent frame
    pub fn last_object_count(&self) -> usize {
        self.last_object_count
    }
}

impl Visualizer for HeadlessVisualizer {
    fn render_space_field(&mut self, field: &SpaceField) {
        self.frames += 1;
        self.last_object_count = field.all_objects().count();
        log::trace!("Frame {}: {} objects", self.frames, self.last_object_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::vector::{Point2D, Vector2D};

    #[test]
    fn test_glyph_placement() {
        let mut field = SpaceField::new(&Config::default());
        field.add_asteroid(Point2D::new(0.0, 600.0), Vector2D::ZERO, 5.0, 500.0);
        field.add_missile(Point2D::new(799.0, 1.0), Vector2D::ZERO);

        let viz = AsciiVisualizer::new(Vec::new(), 8, 4);
        let frame = viz.render_to_string(&field);
        let lines: Vec<&str> = frame.lines().collect();

        assert_eq!(lines[0], "asteroids: 1  missiles: 1  explosions: 0");
        assert_eq!(lines[1], "+--------+");
        assert_eq!(lines[2], "|.       |");
        // Ship at the center: column 4, row 2 from the bottom
        assert_eq!(lines[3], "|    ^   |");
        assert_eq!(lines[4], "|        |");
        assert_eq!(lines[5], "|       ||");
        assert_eq!(lines[6], "+--------+");
    }

    #[test]
    fn test_out_of_field_objects_are_skipped() {
        let mut field = SpaceField::new(&Config::default());
        field.add_asteroid(Point2D::new(-3.0, 10.0), Vector2D::ZERO, 5.0, 500.0);
        let viz = AsciiVisualizer::new(Vec::new(), 10, 5);
        let frame = viz.render_to_string(&field);
        assert_eq!(frame.matches('.').count(), 0);
        assert_eq!(frame.matches('^').count(), 1);
    }

    #[test]
    fn test_render_writes_frames() {
        let field = SpaceField::new(&Config::default());
        let mut viz = AsciiVisualizer::new(Vec::new(), 10, 5).with_clear_screen(true);
        viz.render_space_field(&field);
        viz.render_space_field(&field);
        assert_eq!(viz.frames(), 2);
        let out = String::from_utf8(viz.into_inner()).unwrap();
        assert_eq!(out.matches(CLEAR_SCREEN).count(), 2);
    }

    #[test]
    fn test_headless_counts() {
        let field = SpaceField::new(&Config::default());
        let mut viz = HeadlessVisualizer::new();
        viz.render_space_field(&field);
        assert_eq!(viz.frames(), 1);
        assert_eq!(viz.last_object_count(), 1);
    }
}
