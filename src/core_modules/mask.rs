// THEORY:
// The pipeline's intermediate results are all width x height grids: four
// binary masks (foreground, light-dilated, solid, detection) and one label
// map. This module provides the two grid types they share.
//
// Key architectural principles:
// 1.  **One Mask Per Stage**: Every stage allocates and owns its own output
//     mask. Data flows strictly forward; no stage mutates an earlier stage's
//     array, and no two masks ever alias the same storage. This keeps the
//     stages independently testable and makes the whole pipeline trivially
//     safe to run on many images in parallel.
// 2.  **Flat Storage, Index-Based Traversal**: Cells live in a flat `Vec`,
//     row-major, so the flood-fill and labeling stages can work on plain
//     `usize` pixel indices instead of (x, y) pairs. Conversions between the
//     two representations live here and nowhere else.
// 3.  **Strict 0/1 Discipline**: A `BinaryMask` cell is only ever 0 or 1,
//     which lets the separable box dilator treat cells directly as window
//     summands.

/// A width x height grid of 0/1 cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl BinaryMask {
    /// Creates an all-zero mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![0u8; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The number of cells (width * height).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The flat index of cell (x, y).
    pub fn index_of(&self, x: u32, y: u32) -> usize {
        ((y * self.width) + x) as usize
    }

    /// The (x, y) coordinates of a flat index.
    pub fn coords_of(&self, index: usize) -> (u32, u32) {
        let x = (index % self.width as usize) as u32;
        let y = (index / self.width as usize) as u32;
        (x, y)
    }

    /// The cell value at a flat index.
    pub fn value(&self, index: usize) -> u8 {
        self.cells[index]
    }

    /// The cell value at (x, y).
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.cells[self.index_of(x, y)]
    }

    /// Sets the cell at a flat index. `value` must be 0 or 1.
    pub fn set(&mut self, index: usize, value: u8) {
        debug_assert!(value <= 1);
        self.cells[index] = value;
    }

    /// Sets the cell at (x, y). `value` must be 0 or 1.
    pub fn set_at(&mut self, x: u32, y: u32, value: u8) {
        let index = self.index_of(x, y);
        self.set(index, value);
    }

    /// Counts cells with value 1.
    pub fn foreground_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }
}

/// A width x height grid of component labels. 0 means "unlabeled"; values >= 1
/// identify a connected component. Labels increase monotonically and are never
/// reused, so gaps in the label sequence are permitted and carry no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    width: u32,
    height: u32,
    labels: Vec<u32>,
}

impl LabelMap {
    /// Wraps a flat label array produced by the component labeler.
    pub fn from_labels(width: u32, height: u32, labels: Vec<u32>) -> Self {
        debug_assert_eq!(labels.len(), (width as usize) * (height as usize));
        Self {
            width,
            height,
            labels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The label at (x, y); 0 if the cell belongs to no component.
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.labels[((y * self.width) + x) as usize]
    }

    /// The label at a flat index.
    pub fn value(&self, index: usize) -> u32 {
        self.labels[index]
    }
}
