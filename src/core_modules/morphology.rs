// THEORY:
// This module holds the pipeline's two dilation operators, which exist for
// very different reasons despite sharing a name:
//
// 1.  **Light Gap Closer** (`close_hairline_gaps`): a single 3x3 Moore
//     dilation with a fixed, non-configurable radius of one pixel. Its only
//     job is to bridge 1-pixel-wide breaks (anti-aliasing seams, broken
//     strokes) before the background flood fill runs, so the fill cannot
//     leak through a hairline gap into a sprite's interior.
//
// 2.  **Heavy Box Dilator** (`box_dilate`): an O(N) separable box dilation
//     with a caller-chosen radius. It inflates the solid object mask into the
//     "detection mask," purposely over-merging fragments that lie within 2r
//     of each other so that the component labeler sees them as one blob. The
//     solid mask itself is left untouched; detection geometry never feeds
//     pixel-accurate output.
//
// The box dilation is separable: a horizontal sliding-window pass followed by
// a vertical one over the intermediate result. Each pass maintains the window
// sum incrementally as it slides (one add, one subtract per cell), so the cost
// is independent of the radius. For binary masks "window sum > 0" in both
// passes is exactly equivalent to a true 2D box dilation.

use crate::core_modules::mask::BinaryMask;

pub mod morphology {
    use super::*;

    /// One pass of 8-neighbor (Moore) dilation with radius 1: any 0-cell
    /// adjacent to a 1-cell, diagonals included, becomes 1.
    pub fn close_hairline_gaps(mask: &BinaryMask) -> BinaryMask {
        let width = mask.width() as i64;
        let height = mask.height() as i64;
        let mut closed = BinaryMask::new(mask.width(), mask.height());

        for y in 0..height {
            for x in 0..width {
                let mut hit = false;
                for dy in -1..=1i64 {
                    for dx in -1..=1i64 {
                        let nx = x + dx;
                        let ny = y + dy;
                        if nx >= 0 && nx < width && ny >= 0 && ny < height {
                            if mask.get(nx as u32, ny as u32) == 1 {
                                hit = true;
                                break;
                            }
                        }
                    }
                    if hit {
                        break;
                    }
                }
                if hit {
                    closed.set_at(x as u32, y as u32, 1);
                }
            }
        }

        closed
    }

    /// One pass of 8-neighbor erosion with radius 1, the inverse of
    /// [`close_hairline_gaps`]: a 1-cell stays 1 only if all of its in-bounds
    /// Moore neighbors are 1. Out-of-bounds neighbors count as foreground so
    /// that objects touching the image edge keep their edge pixels.
    pub fn erode_once(mask: &BinaryMask) -> BinaryMask {
        let width = mask.width() as i64;
        let height = mask.height() as i64;
        let mut eroded = BinaryMask::new(mask.width(), mask.height());

        for y in 0..height {
            for x in 0..width {
                if mask.get(x as u32, y as u32) == 0 {
                    continue;
                }
                let mut keep = true;
                for dy in -1..=1i64 {
                    for dx in -1..=1i64 {
                        let nx = x + dx;
                        let ny = y + dy;
                        if nx >= 0 && nx < width && ny >= 0 && ny < height {
                            if mask.get(nx as u32, ny as u32) == 0 {
                                keep = false;
                                break;
                            }
                        }
                    }
                    if !keep {
                        break;
                    }
                }
                if keep {
                    eroded.set_at(x as u32, y as u32, 1);
                }
            }
        }

        eroded
    }

    /// Separable box dilation with the given radius. A cell is foreground in
    /// the output iff any cell within the (2r+1) x (2r+1) box around it is
    /// foreground in the input. `radius == 0` returns a bit-identical copy.
    pub fn box_dilate(mask: &BinaryMask, radius: u32) -> BinaryMask {
        if radius == 0 {
            return mask.clone();
        }
        let rows = dilate_rows(mask, radius);
        dilate_columns(&rows, radius)
    }

    /// Horizontal pass: for each row, slides a +/- radius window across the
    /// columns, maintaining the foreground count incrementally.
    fn dilate_rows(mask: &BinaryMask, radius: u32) -> BinaryMask {
        let width = mask.width() as i64;
        let r = radius as i64;
        let mut out = BinaryMask::new(mask.width(), mask.height());

        for y in 0..mask.height() {
            let row = mask.index_of(0, y);
            // Window sum for x = 0 covers columns [0, r].
            let mut sum: u32 = 0;
            for x in 0..width.min(r + 1) {
                sum += mask.value(row + x as usize) as u32;
            }
            for x in 0..width {
                if sum > 0 {
                    out.set(row + x as usize, 1);
                }
                let entering = x + 1 + r;
                if entering < width {
                    sum += mask.value(row + entering as usize) as u32;
                }
                let leaving = x - r;
                if leaving >= 0 {
                    sum -= mask.value(row + leaving as usize) as u32;
                }
            }
        }

        out
    }

    /// Vertical pass: the same sliding-window technique over each column of
    /// the intermediate mask.
    fn dilate_columns(mask: &BinaryMask, radius: u32) -> BinaryMask {
        let height = mask.height() as i64;
        let r = radius as i64;
        let mut out = BinaryMask::new(mask.width(), mask.height());

        for x in 0..mask.width() {
            let mut sum: u32 = 0;
            for y in 0..height.min(r + 1) {
                sum += mask.get(x, y as u32) as u32;
            }
            for y in 0..height {
                if sum > 0 {
                    out.set_at(x, y as u32, 1);
                }
                let entering = y + 1 + r;
                if entering < height {
                    sum += mask.get(x, entering as u32) as u32;
                }
                let leaving = y - r;
                if leaving >= 0 {
                    sum -= mask.get(x, leaving as u32) as u32;
                }
            }
        }

        out
    }
}
