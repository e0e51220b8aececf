// stream.rs - Falling glyph streams
//
// A stream owns one column. Its head steps down one row each time the
// sub-row accumulator passes 1, pushing a fresh glyph onto the trail.

use std::collections::VecDeque;

use super::Entropy;
use crate::glyphs::ALPHABET_SIZE;
use crate::grid::{Cell, GridBuffer, Shade};

#[derive(Clone, Debug, PartialEq)]
pub struct Stream {
    id: u64,
    column: usize,
    head_row: i32,
    progress: f32,
    speed: f32,
    trail_len: usize,
    // Most recent first
    symbols: VecDeque<u8>,
}

impl Stream {
    /// New stream just above the top row
    pub fn new(id: u64, column: usize, speed: f32, trail_len: usize) -> Self {
        Self {
            id,
            column,
            head_row: -1,
            progress: 0.0,
            speed,
            trail_len,
            symbols: VecDeque::with_capacity(trail_len),
        }
    }

    pub fn id(&self) -> u64 { self.id }
    pub fn column(&self) -> usize { self.column }
    pub fn head_row(&self) -> i32 { self.head_row }
    pub fn progress(&self) -> f32 { self.progress }
    pub fn speed(&self) -> f32 { self.speed }
    pub fn trail_len(&self) -> usize { self.trail_len }
    pub fn symbols(&self) -> &VecDeque<u8> { &self.symbols }

    /// True once the last trail glyph has left a grid of `rows` rows
    #[inline]
    pub fn has_exited(&self, rows: usize) -> bool {
        self.head_row as i64 >= rows as i64 + self.trail_len as i64
    }

    /// Advance by `dt` seconds. Returns false when the stream should be
    /// retired; no further steps are taken once that happens.
    pub fn advance<R: Entropy + ?Sized>(&mut self, dt: f32, rows: usize, rng: &mut R) -> bool {
        self.progress += dt * self.speed;
        while self.progress >= 1.0 {
            self.progress -= 1.0;
            self.head_row += 1;
            if self.has_exited(rows) {
                return false;
            }
            self.symbols.push_front(rng.next_below(ALPHABET_SIZE) as u8);
            self.symbols.truncate(self.trail_len);
        }
        true
    }

    /// Brightness of the trail glyph `offset` rows behind the head.
    ///
    /// Interpolated by the sub-row accumulator so the fade slides smoothly
    /// between row steps.
    #[inline]
    pub fn fade(&self, offset: usize) -> f32 {
        (1.0 - (offset as f32 + self.progress) / self.trail_len as f32).clamp(0.0, 1.0)
    }

    /// Write the trail into the grid; rows outside the grid are skipped
    pub fn paint(&self, grid: &mut GridBuffer) {
        for (i, &glyph) in self.symbols.iter().enumerate() {
            let shade = if i == 0 { Shade::Head } else { Shade::Trail(self.fade(i)) };
            grid.set(self.head_row - i as i32, self.column, Cell { glyph, shade });
        }
    }
}
