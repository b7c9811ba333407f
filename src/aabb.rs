use crate::Ray;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: glam::Vec3A,
    pub max: glam::Vec3A,
}

impl Default for AABB {
    fn default() -> Self {
        Self {
            min: glam::Vec3A::splat(f32::INFINITY),
            max: glam::Vec3A::splat(-f32::INFINITY),
        }
    }
}

/// Things an AABB can be grown to contain
pub trait Grow<T> {
    fn grow(&mut self, item: T);
}

impl Grow<glam::Vec3A> for AABB {
    /// Grow the box to contain a new point
    #[inline]
    fn grow(&mut self, point: glam::Vec3A) {
        self.max = self.max.max(point);
        self.min = self.min.min(point);
    }
}

impl Grow<&AABB> for AABB {
    /// Grow the box to contain another box
    #[inline]
    fn grow(&mut self, other: &AABB) {
        self.max = self.max.max(other.max);
        self.min = self.min.min(other.min);
    }
}

impl AABB {
    #[inline]
    pub fn from_point(point: glam::Vec3A) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// If the AABB is valid (min <= max)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    #[inline]
    pub fn extent(&self) -> glam::Vec3A {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> glam::Vec3A {
        (self.min + self.max) * 0.5
    }

    /// Surface area, zero for an empty box
    #[inline]
    pub fn area(&self) -> f32 {
        if !self.is_valid() {
            return 0.0;
        }
        let e = self.extent();
        2.0 * (e.x * e.y + e.y * e.z + e.z * e.x)
    }

    /// Squared distance from a point to the box, zero if the point is inside
    #[inline]
    pub fn distance_squared(&self, point: glam::Vec3A) -> f32 {
        let clamped = point.clamp(self.min, self.max);
        clamped.distance_squared(point)
    }

    /// Slab test. Returns the entry distance along the ray, or infinity when the ray misses the
    /// box or only reaches it beyond `max_distance`.
    #[inline]
    pub fn ray_intersect(&self, ray: &Ray, max_distance: f32) -> f32 {
        let inv_direction = ray.direction.recip();
        let t1 = (self.min - ray.origin) * inv_direction;
        let t2 = (self.max - ray.origin) * inv_direction;

        // Axes the ray runs parallel to either contain the origin for the whole ray or never do.
        // Their slab distances can be 0 * inf = NaN, so they are replaced outright.
        let parallel = ray.direction.cmpeq(glam::Vec3A::ZERO);
        let inside = ray.origin.cmpge(self.min) & ray.origin.cmple(self.max);
        let (enter, exit) = (
            glam::Vec3A::select(inside, glam::Vec3A::NEG_INFINITY, glam::Vec3A::INFINITY),
            glam::Vec3A::select(inside, glam::Vec3A::INFINITY, glam::Vec3A::NEG_INFINITY),
        );
        let t_min = glam::Vec3A::select(parallel, enter, t1.min(t2));
        let t_max = glam::Vec3A::select(parallel, exit, t1.max(t2));

        let t_near = t_min.max_element().max(ray.min_distance);
        let t_far = t_max.min_element().min(max_distance);

        if t_near <= t_far {
            t_near
        } else {
            f32::INFINITY
        }
    }
}
