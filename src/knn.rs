use std::collections::BinaryHeap;

use glam::{Vec3, Vec3A};
use ordered_float::OrderedFloat;

use crate::{BinnedSAHStrategy, EngineError, SimpleBVH, AABB, BVH};

/// Point stored in a k-nearest-neighbour accelerator
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KnnPoint {
    pub position: Vec3A,
}

impl BVH for KnnPoint {
    #[inline]
    fn bounds(&self) -> AABB {
        AABB::from_point(self.position)
    }

    #[inline]
    fn centroid(&self) -> Vec3A {
        self.position
    }
}

/// A point found by a query. Ordered by distance so the result heap keeps the furthest on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Neighbor {
    pub distance: OrderedFloat<f32>,
    /// Index of the point in the buffer given to [`KnnAccelerator::set_points`]
    pub prim_id: u32,
}

/// Reusable result buffer of a k-nearest-neighbour query
#[derive(Debug, Clone, Default)]
pub struct KnnResult {
    k: usize,
    heap: BinaryHeap<Neighbor>,
}

impl KnnResult {
    pub fn with_capacity(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k),
        }
    }

    fn reset(&mut self, k: usize) {
        self.k = k;
        self.heap.clear();
    }

    /// Offer a candidate, returning the new search radius once `k` neighbours are held
    fn offer(&mut self, neighbor: Neighbor, radius: f32) -> f32 {
        if self.k == 0 || neighbor.distance.0 >= radius {
            return radius;
        }

        if self.heap.len() == self.k {
            let closer = self
                .heap
                .peek()
                .is_some_and(|furthest| neighbor.distance < furthest.distance);
            if !closer {
                return radius;
            }
            self.heap.pop();
        }

        self.heap.push(neighbor);

        if self.heap.len() == self.k {
            self.furthest().unwrap_or(radius)
        } else {
            radius
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Distance of the furthest neighbour held
    pub fn furthest(&self) -> Option<f32> {
        self.heap.peek().map(|n| n.distance.0)
    }

    /// Neighbours, nearest first
    pub fn neighbors(&self) -> Vec<Neighbor> {
        self.heap.clone().into_sorted_vec()
    }
}

/// Point BVH answering k-nearest-neighbour queries
#[derive(Debug, Clone, Default)]
pub struct KnnAccelerator {
    bvh: SimpleBVH<KnnPoint>,
}

impl KnnAccelerator {
    /// Replace the point set with a flat xyz buffer and rebuild the tree
    pub fn set_points(&mut self, points: &[f32]) -> Result<(), EngineError> {
        let points: &[Vec3] =
            bytemuck::try_cast_slice(points).map_err(|_| EngineError::MalformedBuffer {
                buffer: "point",
                len: points.len(),
            })?;

        let points = points
            .iter()
            .map(|&p| KnnPoint {
                position: p.into(),
            })
            .collect();
        self.bvh = SimpleBVH::build::<BinnedSAHStrategy>(points);

        log::debug!(
            "Built KNN tree with {} nodes over {} points",
            self.bvh.node_count(),
            self.point_count()
        );

        Ok(())
    }

    pub fn point_count(&self) -> usize {
        self.bvh.prims().len()
    }

    /// Find up to `k` points strictly closer than `radius` to `position`.
    ///
    /// # Return
    ///
    /// Distance of the furthest neighbour found, or `radius` if there is none
    pub fn query(&self, position: Vec3A, radius: f32, k: usize, result: &mut KnnResult) -> f32 {
        result.reset(k);

        let mut search_radius = radius;
        self.bvh
            .point_query(position, &mut search_radius, |prim_id, point, radius| {
                let neighbor = Neighbor {
                    distance: OrderedFloat(point.position.distance(position)),
                    prim_id,
                };
                *radius = result.offer(neighbor, *radius);
            });

        result.furthest().unwrap_or(radius)
    }
}
