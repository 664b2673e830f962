// THEORY:
// This module owns the pipeline's only traversal primitive and the stage that
// is built on it: the border-seeded background fill that produces the solid
// object mask.
//
// Key architectural principles:
// 1.  **One Fill, Many Callers**: There is exactly one flood-fill
//     implementation. It takes the grid to traverse, a target cell value, a
//     separate marks array to write a fill value into, and an optional
//     per-cell predicate that can veto admission. The background filler and
//     the component labeler both drive this same primitive, so connectivity
//     semantics cannot drift between stages.
// 2.  **Recursion-Free**: The fill walks an explicit stack of flat pixel
//     indices whose capacity is reserved up front at width * height. Large
//     images can never blow the call stack, and the stack never reallocates
//     mid-fill.
// 3.  **Read-Only Grid**: The fill never mutates the mask it is testing.
//     Visited state lives in the caller's marks array, which is also how the
//     labeler reuses the primitive to write label ids directly.
// 4.  **Solid Mask Semantics**: After seeding the fill from every 0-valued
//     border cell of the light-dilated mask, "confirmed background" is
//     exactly the exterior: object pixels, the 1-pixel closing ring, and any
//     enclosed cavity all stay unreached. Eroding that unreached set by one
//     pixel sheds the ring, leaving true sprite pixels plus enclosed holes.
//     The ring is scaffolding that stops the fill from leaking through
//     hairline gaps; it never counts as sprite.

use crate::core_modules::mask::BinaryMask;
use crate::core_modules::morphology::morphology::erode_once;

pub mod flood_fill {
    use super::*;

    /// Four-connected neighbor offsets, shared by every fill in the crate.
    pub const NEIGHBORS_4: [(i64, i64); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

    /// Allocates a traversal stack sized to the mask's pixel count, so a fill
    /// over the whole image never reallocates.
    pub fn fill_stack_for(mask: &BinaryMask) -> Vec<usize> {
        Vec::with_capacity(mask.len())
    }

    /// Iterative 4-connected flood fill.
    ///
    /// Starting from `seed`, traverses cells whose value in `grid` equals
    /// `target` and whose mark still equals `blank`, writing `fill_value`
    /// into `marks` for every cell reached. `predicate` can veto individual
    /// cells; `visit` is invoked once per filled cell (the labeler uses it to
    /// grow bounding boxes and area counts). The grid itself is never
    /// mutated. Does nothing if the seed is not fillable.
    pub fn fill<M>(
        grid: &BinaryMask,
        target: u8,
        seed: usize,
        marks: &mut [M],
        blank: M,
        fill_value: M,
        predicate: Option<&dyn Fn(usize) -> bool>,
        stack: &mut Vec<usize>,
        mut visit: impl FnMut(usize),
    ) where
        M: Copy + PartialEq,
    {
        let admitted = |index: usize, marks: &[M]| {
            grid.value(index) == target
                && marks[index] == blank
                && predicate.map_or(true, |p| p(index))
        };

        if !admitted(seed, marks) {
            return;
        }
        marks[seed] = fill_value;
        stack.push(seed);

        let width = grid.width() as i64;
        let height = grid.height() as i64;

        while let Some(current) = stack.pop() {
            visit(current);
            let (x, y) = grid.coords_of(current);

            for (dx, dy) in &NEIGHBORS_4 {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx >= 0 && nx < width && ny >= 0 && ny < height {
                    let neighbor = grid.index_of(nx as u32, ny as u32);
                    if admitted(neighbor, marks) {
                        marks[neighbor] = fill_value;
                        stack.push(neighbor);
                    }
                }
            }
        }
    }

    /// Marks every exterior background cell of `closed` (the light-dilated
    /// mask) with 1 in the returned array, by flood-filling 0-cells from all
    /// four border edges.
    pub fn confirmed_background(closed: &BinaryMask, stack: &mut Vec<usize>) -> Vec<u8> {
        let mut background = vec![0u8; closed.len()];
        let width = closed.width();
        let height = closed.height();

        let seed_from = |x: u32, y: u32, background: &mut Vec<u8>, stack: &mut Vec<usize>| {
            let index = closed.index_of(x, y);
            fill(closed, 0, index, background, 0, 1, None, stack, |_| {});
        };

        for x in 0..width {
            seed_from(x, 0, &mut background, stack);
            seed_from(x, height - 1, &mut background, stack);
        }
        for y in 0..height {
            seed_from(0, y, &mut background, stack);
            seed_from(width - 1, y, &mut background, stack);
        }

        background
    }

    /// Builds the solid object mask: true sprite pixels plus enclosed
    /// cavities. `closed` is the light-dilated mask the background fill runs
    /// over. Everything the fill could not reach is kept, then eroded by one
    /// pixel to undo the light closer's ring.
    pub fn solid_object_mask(closed: &BinaryMask) -> BinaryMask {
        let mut stack = fill_stack_for(closed);
        let background = confirmed_background(closed, &mut stack);

        let mut unreached = BinaryMask::new(closed.width(), closed.height());
        for index in 0..closed.len() {
            if background[index] == 0 {
                unreached.set(index, 1);
            }
        }
        erode_once(&unreached)
    }
}
