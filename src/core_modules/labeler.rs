// THEORY:
// The `labeler` is the decision-making stage of the pipeline. It walks the
// detection mask in raster order and grows a connected component from every
// unlabeled foreground cell it meets, using the same flood-fill primitive as
// the background stage.
//
// Key architectural principles:
// 1.  **Two Masks, Two Questions**: connectivity is judged on the detection
//     mask (the heavily dilated one), but a component's true area is counted
//     only where the solid object mask is foreground. A one-pixel noise speck
//     may be inflated to hundreds of detection-mask cells by the box dilator,
//     yet its true area stays 1 and the min-area filter rejects it.
// 2.  **Monotonic Labels, Sparse Regions**: every component consumes a fresh
//     label, retained or not, so label ids are monotonically increasing with
//     permitted gaps and no semantic meaning. The label-to-region association
//     is a sparse, insertion-ordered `Vec<Region>`, never a dense array
//     indexed by label.
// 3.  **Order Is Discovery Order**: regions are emitted in raster-scan order
//     of each component's first pixel. Components are independent, so the
//     scan order affects numbering only, never the retained set.

use crate::core_modules::flood_fill::flood_fill;
use crate::core_modules::mask::{BinaryMask, LabelMap};

/// A retained connected component: its label, bounding box over the detection
/// mask, and true pixel area measured against the solid object mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// The component's label in the label map. Gaps between retained labels
    /// are normal; rejected components consume labels too.
    pub label: u32,
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
    /// Count of component cells that are foreground in the solid object mask.
    pub area: usize,
}

impl Region {
    /// Bounding box width; at least 1 for any retained region.
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Bounding box height; at least 1 for any retained region.
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

pub mod labeler {
    use super::*;

    /// Labels every connected component of `detection` and returns the label
    /// map together with the regions whose true area (against `solid`)
    /// exceeds `min_area`, in raster discovery order.
    pub fn find_regions(
        detection: &BinaryMask,
        solid: &BinaryMask,
        min_area: usize,
    ) -> (LabelMap, Vec<Region>) {
        let mut labels = vec![0u32; detection.len()];
        let mut stack = flood_fill::fill_stack_for(detection);
        let mut regions: Vec<Region> = Vec::new();
        let mut next_label = 0u32;

        for seed in 0..detection.len() {
            if detection.value(seed) != 1 || labels[seed] != 0 {
                continue;
            }
            next_label += 1;

            let mut min_x = u32::MAX;
            let mut min_y = u32::MAX;
            let mut max_x = 0u32;
            let mut max_y = 0u32;
            let mut area = 0usize;

            flood_fill::fill(
                detection,
                1,
                seed,
                &mut labels,
                0,
                next_label,
                None,
                &mut stack,
                |index| {
                    let (x, y) = detection.coords_of(index);
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                    if solid.value(index) == 1 {
                        area += 1;
                    }
                },
            );

            if area > min_area {
                regions.push(Region {
                    label: next_label,
                    min_x,
                    max_x,
                    min_y,
                    max_y,
                    area,
                });
            }
        }

        (
            LabelMap::from_labels(detection.width(), detection.height(), labels),
            regions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::labeler::find_regions;
    use super::*;
    use crate::core_modules::morphology::morphology::box_dilate;

    fn square_mask(width: u32, height: u32, squares: &[(u32, u32, u32)]) -> BinaryMask {
        let mut mask = BinaryMask::new(width, height);
        for &(x0, y0, side) in squares {
            for y in y0..y0 + side {
                for x in x0..x0 + side {
                    mask.set_at(x, y, 1);
                }
            }
        }
        mask
    }

    #[test]
    fn separate_components_in_discovery_order() {
        let solid = square_mask(20, 20, &[(12, 1, 3), (2, 10, 4)]);
        let (map, regions) = find_regions(&solid, &solid, 0);

        assert_eq!(regions.len(), 2);
        // Raster order: the top-right square is met first.
        assert_eq!(regions[0].min_x, 12);
        assert_eq!(regions[0].area, 9);
        assert_eq!(regions[0].label, 1);
        assert_eq!(regions[1].min_y, 10);
        assert_eq!(regions[1].area, 16);
        assert_eq!(regions[1].label, 2);
        assert_eq!(map.get(13, 2), 1);
        assert_eq!(map.get(3, 11), 2);
        assert_eq!(map.get(0, 0), 0);
    }

    #[test]
    fn true_area_never_exceeds_bounding_box_area() {
        let solid = square_mask(16, 16, &[(2, 2, 3), (10, 9, 5)]);
        let detection = box_dilate(&solid, 2);
        let (_, regions) = find_regions(&detection, &solid, 0);
        for region in &regions {
            assert!(region.area <= (region.width() as usize) * (region.height() as usize));
            assert!(region.min_x <= region.max_x);
            assert!(region.min_y <= region.max_y);
        }
    }

    #[test]
    fn dilated_speck_is_still_rejected_by_true_area() {
        // One real sprite plus a single-pixel speck. Heavy dilation inflates
        // the speck's detection footprint, but its true area stays 1.
        let mut solid = square_mask(40, 40, &[(4, 4, 6)]);
        solid.set_at(30, 30, 1);
        let detection = box_dilate(&solid, 5);

        let (_, regions) = find_regions(&detection, &solid, 1);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, 36);
    }

    #[test]
    fn rejected_components_leave_label_gaps() {
        // Small square first in raster order, big square second. With the
        // small one rejected, the survivor keeps label 2.
        let solid = square_mask(24, 24, &[(2, 2, 2), (10, 10, 6)]);
        let (map, regions) = find_regions(&solid, &solid, 10);

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].label, 2);
        assert_eq!(regions[0].area, 36);
        // The rejected component's cells are still labeled in the map.
        assert_eq!(map.get(2, 2), 1);
    }

    #[test]
    fn min_area_is_a_strict_threshold() {
        let solid = square_mask(12, 12, &[(3, 3, 3)]);
        let (_, at_area) = find_regions(&solid, &solid, 9);
        assert!(at_area.is_empty(), "area == min_area must be rejected");
        let (_, below) = find_regions(&solid, &solid, 8);
        assert_eq!(below.len(), 1);
    }

    #[test]
    fn bounding_box_tracks_the_detection_mask() {
        // With dilation radius 2 the bounding box covers the inflated blob,
        // not just the solid footprint.
        let solid = square_mask(20, 20, &[(8, 8, 4)]);
        let detection = box_dilate(&solid, 2);
        let (_, regions) = find_regions(&detection, &solid, 0);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].min_x, 6);
        assert_eq!(regions[0].max_x, 13);
        assert_eq!(regions[0].area, 16);
    }
}
