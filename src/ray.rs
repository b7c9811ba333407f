/// Ray object. Hits closer than `min_distance` are ignored.
///
/// The direction is taken as given and is not required to be unit length, in which case
/// distances are measured in multiples of the direction length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: glam::Vec3A,
    pub direction: glam::Vec3A,
    pub min_distance: f32,
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Default::default(),
            direction: glam::Vec3A::new(1.0, 0.0, 0.0),
            min_distance: 0.0,
        }
    }
}

impl Ray {
    #[inline]
    pub fn new(origin: glam::Vec3A, direction: glam::Vec3A, min_distance: f32) -> Self {
        Self {
            origin,
            direction,
            min_distance,
        }
    }
}
