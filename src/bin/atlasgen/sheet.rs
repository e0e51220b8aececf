// sheet.rs - Glyph sheet slicing and coverage masks
//
// Input sheets are a regular grid of glyph cells read in row-major order.
// Output is one column of square slots, white RGB, coverage in alpha.

use anyhow::{ensure, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub cols: u32,
    pub rows: u32,
}

/// Cut `count` cells out of the sheet
pub fn slice(img: &DynamicImage, layout: Layout, count: usize) -> Result<Vec<DynamicImage>> {
    ensure!(layout.cols > 0 && layout.rows > 0, "sheet layout must have at least one cell");
    ensure!(
        (layout.cols * layout.rows) as usize >= count,
        "sheet layout {}x{} holds fewer than {} glyphs",
        layout.cols, layout.rows, count
    );

    let (w, h) = img.dimensions();
    let cell_w = w / layout.cols;
    let cell_h = h / layout.rows;
    ensure!(cell_w > 0 && cell_h > 0, "sheet {}x{} is too small for its layout", w, h);

    Ok((0..count as u32)
        .map(|i| {
            let (cx, cy) = (i % layout.cols, i / layout.cols);
            img.crop_imm(cx * cell_w, cy * cell_h, cell_w, cell_h)
        })
        .collect())
}

/// Glyph coverage of one pixel: luminance weighted by alpha.
/// `invert` is for dark glyphs on a light background.
pub fn coverage(p: Rgba<u8>, invert: bool) -> u8 {
    let [r, g, b, a] = p.0;
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    let luma = if invert { 255.0 - luma } else { luma };
    (luma * a as f32 / 255.0).round().clamp(0.0, 255.0) as u8
}

/// Resample every cell to `size`x`size` and stack them top to bottom
pub fn stack(cells: &[DynamicImage], size: u32, invert: bool) -> RgbaImage {
    let mut out = RgbaImage::new(size, size * cells.len() as u32);
    for (i, cell) in cells.iter().enumerate() {
        let top = i as u32 * size;
        let resized = cell.resize_exact(size, size, FilterType::Lanczos3).to_rgba8();
        for (x, y, p) in resized.enumerate_pixels() {
            out.put_pixel(x, top + y, Rgba([255, 255, 255, coverage(*p, invert)]));
        }
    }
    out
}

/// Number of slots with any visible coverage
pub fn filled_slots(atlas: &RgbaImage, slots: u32) -> usize {
    if slots == 0 { return 0; }
    let slot_h = atlas.height() / slots;
    (0..slots)
        .filter(|s| {
            (s * slot_h..(s + 1) * slot_h)
                .any(|y| (0..atlas.width()).any(|x| atlas.get_pixel(x, y)[3] > 0))
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cols: u32, rows: u32, cell: u32) -> DynamicImage {
        // Each cell is filled white except the last, which is black
        let last = cols * rows - 1;
        let img = RgbaImage::from_fn(cols * cell, rows * cell, |x, y| {
            let i = (y / cell) * cols + x / cell;
            if i == last { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) }
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn coverage_weights_luma_by_alpha() {
        assert_eq!(coverage(Rgba([255, 255, 255, 255]), false), 255);
        assert_eq!(coverage(Rgba([255, 255, 255, 0]), false), 0);
        assert_eq!(coverage(Rgba([0, 0, 0, 255]), false), 0);
        assert_eq!(coverage(Rgba([0, 0, 0, 255]), true), 255);
        assert_eq!(coverage(Rgba([255, 255, 255, 128]), false), 128);
    }

    #[test]
    fn slices_row_major() {
        let cells = slice(&sheet(3, 2, 4), Layout { cols: 3, rows: 2 }, 6).unwrap();
        assert_eq!(cells.len(), 6);
        assert!(cells.iter().all(|c| c.dimensions() == (4, 4)));
        assert_eq!(cells[5].get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(cells[2].get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn rejects_layouts_that_are_too_small() {
        assert!(slice(&sheet(2, 2, 4), Layout { cols: 2, rows: 2 }, 5).is_err());
        assert!(slice(&sheet(1, 1, 1), Layout { cols: 4, rows: 1 }, 1).is_err());
    }

    #[test]
    fn stacks_slots_vertically() {
        let cells = slice(&sheet(2, 2, 8), Layout { cols: 2, rows: 2 }, 4).unwrap();
        let atlas = stack(&cells, 6, false);
        assert_eq!(atlas.dimensions(), (6, 24));
        assert!(atlas.get_pixel(3, 3).0[3] > 250);
        assert_eq!(atlas.get_pixel(3, 21).0[3], 0);
        assert_eq!(filled_slots(&atlas, 4), 3);
    }
}
