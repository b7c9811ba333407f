use glam::{Vec3, Vec3A};

use crate::{
    BinnedSAHStrategy, BuildQuality, EngineError, Hit, InPlaceRayIntersect,
    LongestExtentStrategy, MeshId, Ray, SAHStrategy, SimpleBVH, Triangle,
};

/// Indexed triangle mesh as registered with a scene
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub vertices: Vec<Vec3A>,
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Validate and copy flat vertex (xyz) and index (3 per triangle) buffers
    pub fn from_buffers(vertices: &[f32], indices: &[u32]) -> Result<Self, EngineError> {
        let vertices: &[Vec3] =
            bytemuck::try_cast_slice(vertices).map_err(|_| EngineError::MalformedBuffer {
                buffer: "vertex",
                len: vertices.len(),
            })?;
        let triangles: &[[u32; 3]] =
            bytemuck::try_cast_slice(indices).map_err(|_| EngineError::MalformedBuffer {
                buffer: "index",
                len: indices.len(),
            })?;

        for (triangle, corners) in triangles.iter().enumerate() {
            if let Some(&index) = corners.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(EngineError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        Ok(Self {
            vertices: vertices.iter().copied().map(Vec3A::from).collect(),
            indices: triangles.to_vec(),
        })
    }

    pub fn triangles(&self, mesh_id: MeshId) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.iter().enumerate().map(move |(prim_id, &[a, b, c])| {
            Triangle::new(
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            )
            .with_ids(mesh_id, prim_id as u32)
        })
    }
}

/// A set of triangle meshes plus the BVH built over them at finalization
#[derive(Debug, Clone, Default)]
pub struct Scene {
    quality: BuildQuality,
    meshes: Vec<TriangleMesh>,
    bvh: Option<SimpleBVH<Triangle>>,
}

impl Scene {
    pub fn new(quality: BuildQuality) -> Self {
        Self {
            quality,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.bvh.is_some()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.indices.len()).sum()
    }

    pub fn add_triangle_mesh(
        &mut self,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<MeshId, EngineError> {
        if self.is_finalized() {
            return Err(EngineError::AlreadyFinalized);
        }

        let mesh = TriangleMesh::from_buffers(vertices, indices)?;
        let mesh_id = self.meshes.len() as MeshId;
        self.meshes.push(mesh);

        Ok(mesh_id)
    }

    /// Seal the geometry and build the BVH
    pub fn finalize(&mut self) -> Result<(), EngineError> {
        if self.is_finalized() {
            return Err(EngineError::AlreadyFinalized);
        }

        let triangles: Vec<Triangle> = self
            .meshes
            .iter()
            .enumerate()
            .flat_map(|(mesh_id, mesh)| mesh.triangles(mesh_id as MeshId))
            .collect();
        let triangle_count = triangles.len();

        let bvh = match self.quality {
            BuildQuality::Low => SimpleBVH::build::<LongestExtentStrategy>(triangles),
            BuildQuality::Medium => SimpleBVH::build::<BinnedSAHStrategy<8>>(triangles),
            BuildQuality::High => SimpleBVH::build::<SAHStrategy>(triangles),
        };

        log::debug!(
            "Built {:?} quality BVH with {} nodes over {} triangles in {} meshes",
            self.quality,
            bvh.node_count(),
            triangle_count,
            self.meshes.len()
        );

        self.bvh = Some(bvh);
        Ok(())
    }

    /// Closest hit along the ray, written into `hit`
    #[inline]
    pub fn intersect(&self, ray: &Ray, hit: &mut Hit) -> Result<(), EngineError> {
        let bvh = self.bvh.as_ref().ok_or(EngineError::NotFinalized)?;
        *hit = Hit::MISS;
        bvh.inplace_ray_intersect(ray, hit);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3A;

    use approx::*;

    use crate::*;

    #[test]
    fn quad_mesh_is_accepted() {
        let mut scene = Scene::default();

        let mesh_id = scene.add_triangle_mesh(&QUAD_VERTICES, &QUAD_INDICES).unwrap();

        assert_eq!(mesh_id, 0);
        assert_eq!(scene.mesh_count(), 1);
        assert_eq!(scene.triangle_count(), 2);
    }

    #[test]
    fn mesh_ids_are_sequential() {
        let mut scene = Scene::default();
        assert_eq!(scene.add_triangle_mesh(&QUAD_VERTICES, &QUAD_INDICES), Ok(0));
        assert_eq!(scene.add_triangle_mesh(&QUAD_VERTICES, &QUAD_INDICES), Ok(1));
    }

    #[test]
    fn malformed_buffers_are_rejected() {
        let mut scene = Scene::default();

        assert_eq!(
            scene.add_triangle_mesh(&QUAD_VERTICES[..11], &QUAD_INDICES),
            Err(EngineError::MalformedBuffer {
                buffer: "vertex",
                len: 11
            })
        );
        assert_eq!(
            scene.add_triangle_mesh(&QUAD_VERTICES, &QUAD_INDICES[..5]),
            Err(EngineError::MalformedBuffer {
                buffer: "index",
                len: 5
            })
        );
        assert_eq!(
            scene.add_triangle_mesh(&QUAD_VERTICES, &[0, 1, 4]),
            Err(EngineError::IndexOutOfRange {
                triangle: 0,
                index: 4,
                vertex_count: 4
            })
        );
        assert_eq!(scene.mesh_count(), 0);
    }

    #[test]
    fn lifecycle_is_enforced() {
        let mut scene = Scene::default();
        let mut hit = Hit::default();
        let ray = Ray::default();

        assert_eq!(scene.intersect(&ray, &mut hit), Err(EngineError::NotFinalized));

        scene.add_triangle_mesh(&QUAD_VERTICES, &QUAD_INDICES).unwrap();
        scene.finalize().unwrap();

        assert_eq!(scene.finalize(), Err(EngineError::AlreadyFinalized));
        assert_eq!(
            scene.add_triangle_mesh(&QUAD_VERTICES, &QUAD_INDICES),
            Err(EngineError::AlreadyFinalized)
        );
        assert!(scene.intersect(&ray, &mut hit).is_ok());
    }

    #[test]
    fn empty_scene_misses() {
        let mut scene = Scene::default();
        scene.finalize().unwrap();

        let mut hit = Hit::default();
        scene
            .intersect(&Ray::new(Vec3A::ZERO, Vec3A::Y, 0.0), &mut hit)
            .unwrap();

        assert!(!hit.is_hit());
    }

    #[test]
    fn hits_each_quad_triangle() {
        for quality in [BuildQuality::Low, BuildQuality::Medium, BuildQuality::High] {
            let mut scene = Scene::new(quality);
            scene.add_triangle_mesh(&QUAD_VERTICES, &QUAD_INDICES).unwrap();
            scene.finalize().unwrap();

            // first triangle covers x > z, second x < z
            let mut hit = Hit::default();
            let ray = Ray::new(Vec3A::new(0.5, 2.0, -0.5), -Vec3A::Y, 0.0);
            scene.intersect(&ray, &mut hit).unwrap();
            assert_eq!((hit.mesh_id, hit.prim_id), (0, 0));
            assert_relative_eq!(hit.distance, 2.0);

            let ray = Ray::new(Vec3A::new(-0.5, -3.0, 0.5), Vec3A::Y, 0.0);
            scene.intersect(&ray, &mut hit).unwrap();
            assert_eq!((hit.mesh_id, hit.prim_id), (0, 1));
            assert_relative_eq!(hit.distance, 3.0);
        }
    }

    #[test]
    fn hit_record_is_reset_between_queries() {
        let mut scene = Scene::default();
        scene.add_triangle_mesh(&QUAD_VERTICES, &QUAD_INDICES).unwrap();
        scene.finalize().unwrap();

        let mut hit = Hit::default();
        scene
            .intersect(&Ray::new(Vec3A::new(0.5, 1.0, -0.5), -Vec3A::Y, 0.0), &mut hit)
            .unwrap();
        assert!(hit.is_hit());

        scene
            .intersect(&Ray::new(Vec3A::new(5.0, 1.0, 5.0), -Vec3A::Y, 0.0), &mut hit)
            .unwrap();
        assert!(!hit.is_hit());
    }

    #[test]
    fn rays_along_quad_edges_match_brute_force() {
        let mesh = TriangleMesh::from_buffers(&QUAD_VERTICES, &QUAD_INDICES).unwrap();

        for quality in [BuildQuality::Low, BuildQuality::Medium, BuildQuality::High] {
            let mut scene = Scene::new(quality);
            scene.add_triangle_mesh(&QUAD_VERTICES, &QUAD_INDICES).unwrap();
            scene.finalize().unwrap();

            for origin in [
                Vec3A::new(-1.0, 1.0, 0.0),
                Vec3A::new(0.5, 1.0, -1.0),
                Vec3A::new(1.0, 1.0, 0.0),
                Vec3A::new(0.0, 1.0, 1.0),
            ] {
                let ray = Ray::new(origin, -Vec3A::Y, 0.0);

                let mut expected = Hit::default();
                for tri in mesh.triangles(0) {
                    inplace_ray_triangle_intersect(&tri, &ray, &mut expected);
                }
                assert!(expected.is_hit());

                let mut hit = Hit::default();
                scene.intersect(&ray, &mut hit).unwrap();
                assert!(hit.is_hit(), "{:?} missed from {}", quality, origin);
                assert_relative_eq!(hit.distance, expected.distance);
            }
        }
    }
}
