use crate::{Hit, Ray, Triangle};

/// Objects capable of being intersected by a ray, writing the closest hit in place
pub trait InPlaceRayIntersect {
    fn inplace_ray_intersect(&self, ray: &Ray, hit: &mut Hit);
}

/// Epsilon used for ray intersections
pub const RAY_INTERSECT_EPSILON: f32 = 0.0001;

/// Möller-Trumbore ray/triangle test.
///
/// # Return
///
/// (distance, u, v) where u and v are the barycentric weights of `vertex1` and `vertex2`
#[inline]
pub fn ray_triangle_intersect(tri: &Triangle, ray: &Ray) -> Option<(f32, f32, f32)> {
    let edge1 = tri.vertex1 - tri.vertex0;
    let edge2 = tri.vertex2 - tri.vertex0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);
    if a > -RAY_INTERSECT_EPSILON && a < RAY_INTERSECT_EPSILON {
        // ray parallel to triangle
        return None;
    }
    let f = 1.0 / a;
    let s = ray.origin - tri.vertex0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = f * edge2.dot(q);
    if t > RAY_INTERSECT_EPSILON && t >= ray.min_distance {
        Some((t, u, v))
    } else {
        None
    }
}

/// Intersect a triangle with a ray, then store the intersection in the hit if it is the closest
#[inline]
pub fn inplace_ray_triangle_intersect(tri: &Triangle, ray: &Ray, hit: &mut Hit) {
    if let Some((t, u, v)) = ray_triangle_intersect(tri, ray) {
        if t < hit.distance {
            *hit = Hit {
                mesh_id: tri.mesh_id,
                prim_id: tri.prim_id,
                u,
                v,
                distance: t,
            };
        }
    }
}

impl InPlaceRayIntersect for Triangle {
    #[inline]
    fn inplace_ray_intersect(&self, ray: &Ray, hit: &mut Hit) {
        inplace_ray_triangle_intersect(self, ray, hit);
    }
}

#[cfg(test)]
mod tests {

    use rand::{thread_rng, Rng};

    use glam::Vec3A;

    use approx::*;

    use crate::*;

    fn random_triangle() -> Triangle {
        let mut rng = thread_rng();
        let v0 = rng.gen::<Vec3A>() * 9.0 - Vec3A::splat(5.0);
        let v1 = rng.gen();
        let v2 = rng.gen();
        Triangle::new(v0, v1, v2).with_ids(2, 5)
    }

    #[test]
    fn ray_triangle_intersect() {
        let tri = random_triangle();

        let ray = Ray::new(Vec3A::ZERO, tri.centroid.normalize_or_zero(), 0.0);
        let mut hit = Hit::default();

        tri.inplace_ray_intersect(&ray, &mut hit);

        assert!(hit.is_hit());
        assert_eq!((hit.mesh_id, hit.prim_id), (2, 5));
        assert_abs_diff_eq!(
            hit.distance,
            tri.centroid.distance(Vec3A::ZERO),
            epsilon = RAY_INTERSECT_EPSILON
        );
        // the centroid has equal barycentric weights
        assert_abs_diff_eq!(hit.u, 1.0 / 3.0, epsilon = 1e-3);
        assert_abs_diff_eq!(hit.v, 1.0 / 3.0, epsilon = 1e-3);
    }

    #[test]
    fn ray_triangle_no_intersect() {
        let tri = random_triangle();

        let ray = Ray::new(Vec3A::ZERO, -tri.centroid.normalize_or_zero(), 0.0);
        let mut hit = Hit::default();

        tri.inplace_ray_intersect(&ray, &mut hit);

        assert!(!hit.is_hit());
        assert!(hit.distance.is_infinite());
    }

    #[test]
    fn unnormalized_direction_scales_distance() {
        let tri = Triangle::new(
            Vec3A::new(-1.0, 0.0, -1.0),
            Vec3A::new(1.0, 0.0, -1.0),
            Vec3A::new(1.0, 0.0, 1.0),
        );
        let ray = Ray::new(Vec3A::new(0.5, 4.0, -0.5), Vec3A::new(0.0, -2.0, 0.0), 0.0);

        let (t, _, _) = super::ray_triangle_intersect(&tri, &ray).unwrap();

        assert_relative_eq!(t, 2.0);
        assert_relative_eq!(ray.origin + ray.direction * t, Vec3A::new(0.5, 0.0, -0.5));
    }

    #[test]
    fn min_distance_skips_near_hits() {
        let tri = Triangle::new(
            Vec3A::new(-1.0, 0.0, -1.0),
            Vec3A::new(1.0, 0.0, -1.0),
            Vec3A::new(1.0, 0.0, 1.0),
        );
        let ray = Ray::new(Vec3A::new(0.5, 1.0, -0.5), -Vec3A::Y, 2.0);

        assert!(super::ray_triangle_intersect(&tri, &ray).is_none());
    }

    #[test]
    fn keeps_closest_hit() {
        let near = Triangle::new(
            Vec3A::new(-1.0, 1.0, -1.0),
            Vec3A::new(1.0, 1.0, -1.0),
            Vec3A::new(1.0, 1.0, 1.0),
        )
        .with_ids(0, 0);
        let far = Triangle::new(
            Vec3A::new(-1.0, 0.0, -1.0),
            Vec3A::new(1.0, 0.0, -1.0),
            Vec3A::new(1.0, 0.0, 1.0),
        )
        .with_ids(1, 0);
        let ray = Ray::new(Vec3A::new(0.5, 3.0, -0.5), -Vec3A::Y, 0.0);
        let mut hit = Hit::default();

        near.inplace_ray_intersect(&ray, &mut hit);
        far.inplace_ray_intersect(&ray, &mut hit);

        assert_eq!(hit.mesh_id, 0);
        assert_relative_eq!(hit.distance, 2.0);
    }
}
