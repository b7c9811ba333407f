/// Identifier of a mesh inside a scene, in registration order
pub type MeshId = u32;

/// Mesh id of a hit record that did not hit anything
pub const INVALID_MESH_ID: MeshId = MeshId::MAX;

/// Closest-hit record written by a trace call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub mesh_id: MeshId,
    /// Triangle index inside the mesh
    pub prim_id: u32,
    pub u: f32,
    pub v: f32,
    pub distance: f32,
}

impl Default for Hit {
    fn default() -> Self {
        Self::MISS
    }
}

impl Hit {
    pub const MISS: Self = Hit {
        mesh_id: INVALID_MESH_ID,
        prim_id: u32::MAX,
        u: 0.0,
        v: 0.0,
        distance: f32::INFINITY,
    };

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.mesh_id != INVALID_MESH_ID
    }
}
