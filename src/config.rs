use crate::BenchmarkError;

/// Split strategy used when a scene is finalized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildQuality {
    /// Longest extent midpoint split
    Low,
    /// Binned SAH with 8 bins
    Medium,
    /// SAH sweep over every centroid
    #[default]
    High,
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Quality of scenes created without an explicit one
    pub build_quality: BuildQuality,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub num_trials: u32,
    pub rays_per_trial: u32,
    /// Seed of the ray sampler, applied once before the tracing phase
    pub seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            num_trials: 10,
            rays_per_trial: 1_000_000,
            seed: 1337,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<(), BenchmarkError> {
        if self.num_trials == 0 {
            return Err(BenchmarkError::InvalidConfig("num_trials must be at least 1"));
        }
        if self.rays_per_trial == 0 {
            return Err(BenchmarkError::InvalidConfig("rays_per_trial must be at least 1"));
        }
        Ok(())
    }
}
