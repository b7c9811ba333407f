use glam::Vec3A;
use parking_lot::RwLock;

use crate::{
    object_pool::{Handle, HandlePool},
    BuildQuality, EngineConfig, EngineError, Hit, KnnAccelerator, KnnResult, MeshId, Ray, Scene,
    TraceBackend,
};

/// Opaque handle to a scene owned by an [`Engine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle(Handle);

/// Opaque handle to a KNN accelerator owned by an [`Engine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KnnHandle(Handle);

/// Registry of scenes and KNN accelerators addressed through opaque handles.
///
/// All calls take `&self`; a finalized scene can be traced from several threads at once.
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    scenes: RwLock<HandlePool<Scene>>,
    knn: RwLock<HandlePool<KnnAccelerator>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Number of live scenes
    pub fn scene_count(&self) -> usize {
        self.scenes.read().len()
    }

    pub fn create_scene(&self) -> Result<SceneHandle, EngineError> {
        self.create_scene_with_quality(self.config.build_quality)
    }

    pub fn create_scene_with_quality(
        &self,
        quality: BuildQuality,
    ) -> Result<SceneHandle, EngineError> {
        let handle = self
            .scenes
            .write()
            .insert(Scene::new(quality))
            .ok_or(EngineError::PoolExhausted)?;
        log::trace!("Created scene {:?}", handle);
        Ok(SceneHandle(handle))
    }

    pub fn add_triangle_mesh(
        &self,
        scene: SceneHandle,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<MeshId, EngineError> {
        self.scenes
            .write()
            .get_mut(&scene.0)
            .ok_or(EngineError::InvalidHandle)?
            .add_triangle_mesh(vertices, indices)
    }

    pub fn finalize_scene(&self, scene: SceneHandle) -> Result<(), EngineError> {
        self.scenes
            .write()
            .get_mut(&scene.0)
            .ok_or(EngineError::InvalidHandle)?
            .finalize()
    }

    #[inline]
    pub fn trace_single(
        &self,
        scene: SceneHandle,
        ray: &Ray,
        hit: &mut Hit,
    ) -> Result<(), EngineError> {
        self.scenes
            .read()
            .get(&scene.0)
            .ok_or(EngineError::InvalidHandle)?
            .intersect(ray, hit)
    }

    pub fn destroy_scene(&self, scene: SceneHandle) -> Result<(), EngineError> {
        self.scenes
            .write()
            .remove(&scene.0)
            .ok_or(EngineError::InvalidHandle)?;
        log::trace!("Destroyed scene {:?}", scene.0);
        Ok(())
    }

    pub fn new_knn_accelerator(&self) -> Result<KnnHandle, EngineError> {
        let handle = self
            .knn
            .write()
            .insert(KnnAccelerator::default())
            .ok_or(EngineError::PoolExhausted)?;
        Ok(KnnHandle(handle))
    }

    /// Replace the accelerator's points with a flat xyz buffer
    pub fn set_knn_points(
        &self,
        accelerator: KnnHandle,
        points: &[f32],
    ) -> Result<(), EngineError> {
        self.knn
            .write()
            .get_mut(&accelerator.0)
            .ok_or(EngineError::InvalidHandle)?
            .set_points(points)
    }

    /// See [`KnnAccelerator::query`]
    pub fn knn_query(
        &self,
        accelerator: KnnHandle,
        position: Vec3A,
        radius: f32,
        k: usize,
        result: &mut KnnResult,
    ) -> Result<f32, EngineError> {
        let pool = self.knn.read();
        let accelerator = pool.get(&accelerator.0).ok_or(EngineError::InvalidHandle)?;
        Ok(accelerator.query(position, radius, k, result))
    }

    pub fn release_knn_accelerator(&self, accelerator: KnnHandle) -> Result<(), EngineError> {
        self.knn
            .write()
            .remove(&accelerator.0)
            .map(|_| ())
            .ok_or(EngineError::InvalidHandle)
    }
}

impl TraceBackend for Engine {
    type SceneHandle = SceneHandle;

    fn create_scene(&self) -> Result<SceneHandle, EngineError> {
        Engine::create_scene(self)
    }

    fn add_triangle_mesh(
        &self,
        scene: SceneHandle,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<MeshId, EngineError> {
        Engine::add_triangle_mesh(self, scene, vertices, indices)
    }

    fn finalize_scene(&self, scene: SceneHandle) -> Result<(), EngineError> {
        Engine::finalize_scene(self, scene)
    }

    #[inline]
    fn trace_single(
        &self,
        scene: SceneHandle,
        ray: &Ray,
        hit: &mut Hit,
    ) -> Result<(), EngineError> {
        Engine::trace_single(self, scene, ray, hit)
    }

    fn destroy_scene(&self, scene: SceneHandle) -> Result<(), EngineError> {
        Engine::destroy_scene(self, scene)
    }
}
