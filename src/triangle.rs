extern crate glam;

use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

use crate::{Grow, MeshId, AABB};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertex0: glam::Vec3A,
    pub vertex1: glam::Vec3A,
    pub vertex2: glam::Vec3A,
    pub centroid: glam::Vec3A,
    /// Mesh the triangle was registered with
    pub mesh_id: MeshId,
    /// Index of the triangle inside its mesh
    pub prim_id: u32,
}

impl Triangle {
    /// Zeroed Triangle
    pub const ZERO: Self = Triangle {
        vertex0: glam::Vec3A::ZERO,
        vertex1: glam::Vec3A::ZERO,
        vertex2: glam::Vec3A::ZERO,
        centroid: glam::Vec3A::ZERO,
        mesh_id: 0,
        prim_id: 0,
    };

    #[inline]
    pub fn new(vertex0: glam::Vec3A, vertex1: glam::Vec3A, vertex2: glam::Vec3A) -> Triangle {
        let mut tri = Triangle {
            vertex0,
            vertex1,
            vertex2,
            ..Self::ZERO
        };
        tri.compute_centroid();
        tri
    }

    #[inline]
    pub fn with_ids(mut self, mesh_id: MeshId, prim_id: u32) -> Triangle {
        self.mesh_id = mesh_id;
        self.prim_id = prim_id;
        self
    }

    #[inline]
    pub fn compute_centroid(&mut self) {
        self.centroid = (self.vertex0 + self.vertex1 + self.vertex2) / 3.0;
    }
}

impl Default for Triangle {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Grow<&Triangle> for AABB {
    #[inline]
    fn grow(&mut self, tri: &Triangle) {
        self.grow(tri.vertex0);
        self.grow(tri.vertex1);
        self.grow(tri.vertex2);
    }
}

impl Distribution<Triangle> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Triangle {
        Triangle::new(rng.gen(), rng.gen(), rng.gen())
    }
}
