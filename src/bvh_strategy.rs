use std::cmp::min;

use strum::IntoEnumIterator;

use crate::{Axis, Grow, SimpleBVHNode, AABB, BVH, RAY_INTERSECT_EPSILON};

#[derive(Debug, Clone, Copy)]
pub struct SplitPlane {
    pub axis: Axis,
    pub split_position: f32,
    pub should_split: bool,
}

impl Default for SplitPlane {
    fn default() -> Self {
        Self {
            axis: Axis::X,
            split_position: f32::INFINITY,
            should_split: false,
        }
    }
}

pub trait SplitPlaneStrategy {
    /// Get split plane from a node using an strategy.
    fn get_split_plane<P: BVH>(node: &SimpleBVHNode, prims: &[P], prims_id: &[u32])
        -> SplitPlane;
}

/// Primitives of a leaf node, in partition order
#[inline]
fn node_prims<'a, P: BVH>(
    node: &SimpleBVHNode,
    prims: &'a [P],
    prims_id: &'a [u32],
) -> impl Iterator<Item = &'a P> + 'a {
    let first = node.first_prim() as usize;
    let count = node.prim_count as usize;
    prims_id[first..first + count]
        .iter()
        .map(move |&id| &prims[id as usize])
}

/// Split at the middle of the longest extent of the node bounds.
pub struct LongestExtentStrategy {}
impl SplitPlaneStrategy for LongestExtentStrategy {
    fn get_split_plane<P: BVH>(
        node: &SimpleBVHNode,
        _prims: &[P],
        _prims_id: &[u32],
    ) -> SplitPlane {
        if node.prim_count <= 2 {
            return SplitPlane::default();
        }

        let extent = node.aabb.extent();
        let axis = Axis::longest(extent);

        let split_pos = node.aabb.min[axis] + extent[axis] * 0.5;
        SplitPlane {
            axis,
            split_position: split_pos,
            should_split: true,
        }
    }
}

/// Full SAH sweep, every primitive centroid is a split candidate.
pub struct SAHStrategy {}

impl SAHStrategy {
    /// Evaluate the SAH heuristic cost at a position
    fn evaluate_sah<P: BVH>(
        node: &SimpleBVHNode,
        prims: &[P],
        prims_id: &[u32],
        axis: Axis,
        pos: f32,
    ) -> f32 {
        // determine primitive counts and bounds for this split candidate
        let mut left_box: AABB = Default::default();
        let mut right_box: AABB = Default::default();
        let mut left_count = 0;
        let mut right_count = 0;

        for prim in node_prims(node, prims, prims_id) {
            if prim.centroid()[axis] < pos {
                left_count += 1;
                left_box.grow(&prim.bounds());
            } else {
                right_count += 1;
                right_box.grow(&prim.bounds());
            }
        }

        if left_count == 0 || right_count == 0 {
            return f32::INFINITY;
        }

        left_count as f32 * left_box.area() + right_count as f32 * right_box.area()
    }
}

impl SplitPlaneStrategy for SAHStrategy {
    fn get_split_plane<P: BVH>(node: &SimpleBVHNode, prims: &[P], prims_id: &[u32]) -> SplitPlane {
        let mut best_axis = Axis::X;
        let mut best_pos: f32 = 0.0;
        let mut best_cost = f32::INFINITY;

        for axis in Axis::iter() {
            for prim in node_prims(node, prims, prims_id) {
                let candidate_pos = prim.centroid()[axis];
                let cost = Self::evaluate_sah(node, prims, prims_id, axis, candidate_pos);
                if cost < best_cost {
                    best_pos = candidate_pos;
                    best_axis = axis;
                    best_cost = cost;
                }
            }
        }

        if best_cost >= node.compute_sah() {
            return SplitPlane::default();
        }

        SplitPlane {
            axis: best_axis,
            split_position: best_pos,
            should_split: true,
        }
    }
}

/// Binned SAH. Number of intervals set at compile time.
pub struct BinnedSAHStrategy<const INTERVAL_NUM: usize = 8> {}

impl<const INTERVAL_NUM: usize> SplitPlaneStrategy for BinnedSAHStrategy<INTERVAL_NUM> {
    fn get_split_plane<P: BVH>(node: &SimpleBVHNode, prims: &[P], prims_id: &[u32]) -> SplitPlane {
        assert!(INTERVAL_NUM >= 2, "At least two intervals are needed");
        let mut best_axis = Axis::X;
        let mut best_pos: f32 = 0.0;
        let mut best_cost = f32::INFINITY;

        let mut centroid_bounds = AABB::default();
        for prim in node_prims(node, prims, prims_id) {
            centroid_bounds.grow(prim.centroid());
        }

        #[derive(Debug, Clone, Copy, Default)]
        struct Bin {
            pub bounds: AABB,
            pub prim_count: u32,
        }

        for axis in Axis::iter() {
            let bounds_min = centroid_bounds.min[axis];
            let bounds_max = centroid_bounds.max[axis];

            if approx::abs_diff_eq!(bounds_min, bounds_max, epsilon = RAY_INTERSECT_EPSILON) {
                continue;
            }

            let mut bins = [Bin::default(); INTERVAL_NUM];

            let scale = INTERVAL_NUM as f32 / (bounds_max - bounds_min);

            for prim in node_prims(node, prims, prims_id) {
                let bin_id = min(
                    INTERVAL_NUM - 1,
                    ((prim.centroid()[axis] - bounds_min) * scale) as usize,
                );

                let bin = &mut bins[bin_id];

                bin.prim_count += 1;
                bin.bounds.grow(&prim.bounds());
            }

            // Only the first INTERVAL_NUM - 1 entries are planes, the last one stays unused
            let mut left_area = [0.0_f32; INTERVAL_NUM];
            let mut right_area = [0.0_f32; INTERVAL_NUM];
            let mut left_count = [0_u32; INTERVAL_NUM];
            let mut right_count = [0_u32; INTERVAL_NUM];

            let mut left_box: AABB = Default::default();
            let mut right_box: AABB = Default::default();

            let mut left_sum: u32 = 0;
            let mut right_sum: u32 = 0;

            for i in 0..(INTERVAL_NUM - 1) {
                left_sum += bins[i].prim_count;
                left_count[i] = left_sum;
                left_box.grow(&bins[i].bounds);
                left_area[i] = left_box.area();

                right_sum += bins[INTERVAL_NUM - 1 - i].prim_count;
                right_count[INTERVAL_NUM - 2 - i] = right_sum;
                right_box.grow(&bins[INTERVAL_NUM - 1 - i].bounds);
                right_area[INTERVAL_NUM - 2 - i] = right_box.area();
            }

            let scale = (bounds_max - bounds_min) / INTERVAL_NUM as f32;
            for i in 0..(INTERVAL_NUM - 1) {
                if left_count[i] == 0 || right_count[i] == 0 {
                    continue;
                }
                let plane_cost =
                    left_count[i] as f32 * left_area[i] + right_count[i] as f32 * right_area[i];
                if plane_cost < best_cost {
                    best_pos = bounds_min + scale * (i + 1) as f32;
                    best_axis = axis;
                    best_cost = plane_cost;
                }
            }
        }

        if best_cost >= node.compute_sah() {
            return SplitPlane::default();
        }

        SplitPlane {
            axis: best_axis,
            split_position: best_pos,
            should_split: true,
        }
    }
}
