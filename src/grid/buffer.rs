// buffer.rs - Per-frame cell buffer
//
// Dense row-major storage. Writes outside the grid are dropped.

/// How brightly a cell is lit
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shade {
    /// Leading glyph of a stream, always drawn at full brightness
    Head,
    /// Trail glyph, brightness in [0, 1]
    Trail(f32),
}

impl Shade {
    #[inline]
    pub fn brightness(self) -> f32 {
        match self {
            Shade::Head => 1.0,
            Shade::Trail(b) => b,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    /// Index into `glyphs::ALPHABET`
    pub glyph: u8,
    pub shade: Shade,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridBuffer {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Cell>>,
}

impl GridBuffer {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, cells: vec![None; rows * cols] }
    }

    /// Reallocate for new dimensions; all cells become empty
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.cells.clear();
        self.cells.resize(rows * cols, None);
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }

    /// Write a cell; returns false when (row, col) is outside the grid
    #[inline]
    pub fn set(&mut self, row: i32, col: usize, cell: Cell) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = Some(cell);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn get(&self, row: i32, col: usize) -> Option<&Cell> {
        self.index(row, col).and_then(|i| self.cells[i].as_ref())
    }

    /// Occupied cells in row-major order as (row, col, cell)
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.as_ref().map(|c| (i / cols, i % cols, c)))
    }

    #[cfg(test)]
    pub(crate) fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    #[inline]
    fn index(&self, row: i32, col: usize) -> Option<usize> {
        if row < 0 || col >= self.cols { return None; }
        let row = row as usize;
        if row >= self.rows { return None; }
        Some(row * self.cols + col)
    }
}
