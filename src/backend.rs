use crate::{EngineError, Hit, MeshId, Ray};

/// Handle-based raytracing API driven by the benchmark.
///
/// Scenes follow create, add meshes, finalize, trace, destroy. Handles are plain values and stop
/// resolving once destroyed.
pub trait TraceBackend {
    type SceneHandle: Copy;

    fn create_scene(&self) -> Result<Self::SceneHandle, EngineError>;

    fn add_triangle_mesh(
        &self,
        scene: Self::SceneHandle,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<MeshId, EngineError>;

    fn finalize_scene(&self, scene: Self::SceneHandle) -> Result<(), EngineError>;

    fn trace_single(
        &self,
        scene: Self::SceneHandle,
        ray: &Ray,
        hit: &mut Hit,
    ) -> Result<(), EngineError>;

    fn destroy_scene(&self, scene: Self::SceneHandle) -> Result<(), EngineError>;
}

/// Owns a scene for its lifetime and destroys it when dropped
pub struct SceneGuard<'a, B>
where
    B: TraceBackend + ?Sized,
{
    backend: &'a B,
    handle: Option<B::SceneHandle>,
}

impl<'a, B> SceneGuard<'a, B>
where
    B: TraceBackend + ?Sized,
{
    pub fn create(backend: &'a B) -> Result<Self, EngineError> {
        let handle = backend.create_scene()?;
        Ok(Self {
            backend,
            handle: Some(handle),
        })
    }

    #[inline]
    fn live_handle(&self) -> Result<B::SceneHandle, EngineError> {
        self.handle.ok_or(EngineError::InvalidHandle)
    }

    pub fn add_triangle_mesh(
        &self,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<MeshId, EngineError> {
        self.backend
            .add_triangle_mesh(self.live_handle()?, vertices, indices)
    }

    pub fn finalize(&self) -> Result<(), EngineError> {
        self.backend.finalize_scene(self.live_handle()?)
    }

    #[inline]
    pub fn trace_single(&self, ray: &Ray, hit: &mut Hit) -> Result<(), EngineError> {
        self.backend.trace_single(self.live_handle()?, ray, hit)
    }

    /// Destroy the scene now and report the outcome
    pub fn destroy(mut self) -> Result<(), EngineError> {
        match self.handle.take() {
            Some(handle) => self.backend.destroy_scene(handle),
            None => Ok(()),
        }
    }
}

impl<B> Drop for SceneGuard<'_, B>
where
    B: TraceBackend + ?Sized,
{
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(err) = self.backend.destroy_scene(handle) {
                log::warn!("Failed to destroy scene: {}", err);
            }
        }
    }
}
