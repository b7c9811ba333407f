extern crate glam;
use glam::Vec3A;

use crate::{Grow, Triangle, AABB};

/// Primitives that can be stored in a BVH
pub trait BVH {
    fn bounds(&self) -> AABB;
    fn centroid(&self) -> Vec3A;
}

impl BVH for Triangle {
    #[inline]
    fn bounds(&self) -> AABB {
        let mut aabb = AABB::default();

        aabb.grow(self);

        aabb
    }

    #[inline]
    fn centroid(&self) -> Vec3A {
        self.centroid
    }
}
