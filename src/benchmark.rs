use std::{
    fmt,
    hint::black_box,
    time::{Duration, Instant},
};

use glam::Vec3A;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{
    BenchmarkConfig, BenchmarkError, EngineError, Hit, Ray, SceneGuard, TraceBackend,
};

/// Unit quad in the y = 0 plane, four xyz corners
#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; 12] = [
    -1.0, 0.0, -1.0,
     1.0, 0.0, -1.0,
     1.0, 0.0,  1.0,
    -1.0, 0.0,  1.0,
];

/// The quad split into two triangles
#[rustfmt::skip]
pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 2,
    0, 2, 3,
];

/// Random ray source. Origins and directions are uniform in [0, 1)^3 and directions are not
/// normalized.
pub struct RaySampler<R = SmallRng> {
    rng: R,
}

impl RaySampler<SmallRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<R> RaySampler<R>
where
    R: Rng,
{
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    #[inline]
    pub fn next_vector3(&mut self) -> Vec3A {
        self.rng.gen()
    }

    #[inline]
    pub fn next_ray(&mut self) -> Ray {
        let origin = self.next_vector3();
        let direction = self.next_vector3();
        Ray::new(origin, direction, 0.0)
    }
}

/// Wall-clock totals of both phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkReport {
    pub num_trials: u32,
    pub rays_per_trial: u32,
    /// Tracing phase: sampling plus trace calls
    pub total_elapsed: Duration,
    /// Sampling phase alone
    pub rng_elapsed: Duration,
}

/// Whole milliseconds per trial, truncated
#[inline]
fn ms_per_trial(elapsed: Duration, num_trials: u32) -> i64 {
    (elapsed.as_millis() / u128::from(num_trials.max(1))) as i64
}

/// Line reporting the tracing phase, printed as soon as that phase ends
pub fn tracing_done_line(total_ms_per_trial: i64) -> String {
    format!("Done after {}ms.", total_ms_per_trial)
}

impl BenchmarkReport {
    #[inline]
    fn ms_per_trial(&self, elapsed: Duration) -> i64 {
        ms_per_trial(elapsed, self.num_trials)
    }

    pub fn total_ms_per_trial(&self) -> i64 {
        self.ms_per_trial(self.total_elapsed)
    }

    pub fn rng_ms_per_trial(&self) -> i64 {
        self.ms_per_trial(self.rng_elapsed)
    }

    /// Estimated cost of the trace calls alone. Negative when timing noise exceeds the
    /// difference, it is never clamped.
    pub fn pure_ms_per_trial(&self) -> i64 {
        self.total_ms_per_trial() - self.rng_ms_per_trial()
    }

    /// The two lines that follow the sampling phase
    pub fn overhead_lines(&self) -> String {
        format!(
            "RNG overhead {}ms.\nPure cost for tracing + overhead: {}ms.",
            self.rng_ms_per_trial(),
            self.pure_ms_per_trial()
        )
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", tracing_done_line(self.total_ms_per_trial()))?;
        write!(f, "{}", self.overhead_lines())
    }
}

/// Line announcing the tracing workload
pub fn workload_banner(config: &BenchmarkConfig) -> String {
    match config.rays_per_trial {
        1_000_000 => "Tracing a million rays...".to_owned(),
        n => format!("Tracing {} rays...", n),
    }
}

fn time_tracing<B>(
    scene: &SceneGuard<'_, B>,
    sampler: &mut RaySampler,
    config: &BenchmarkConfig,
) -> Result<Duration, EngineError>
where
    B: TraceBackend + ?Sized,
{
    let start = Instant::now();

    for _ in 0..config.num_trials {
        for _ in 0..config.rays_per_trial {
            let ray = sampler.next_ray();
            let mut hit = Hit::default();
            scene.trace_single(&ray, &mut hit)?;
            black_box(&hit);
        }
    }

    Ok(start.elapsed())
}

fn time_sampling(sampler: &mut RaySampler, config: &BenchmarkConfig) -> Duration {
    let start = Instant::now();

    for _ in 0..config.num_trials {
        for _ in 0..config.rays_per_trial {
            black_box(sampler.next_vector3());
            black_box(sampler.next_vector3());
        }
    }

    start.elapsed()
}

/// Time random-ray tracing against the quad scene, then time the ray sampling alone, so the
/// difference estimates what the trace calls cost.
///
/// The scene is built before and destroyed after both timed phases, including when the backend
/// fails midway.
pub fn run_benchmark<B>(
    backend: &B,
    config: &BenchmarkConfig,
) -> Result<BenchmarkReport, BenchmarkError>
where
    B: TraceBackend + ?Sized,
{
    run_benchmark_with(backend, config, |_| {})
}

/// [`run_benchmark`], calling `on_traced` with the per-trial tracing time in milliseconds as soon
/// as the tracing phase ends and before the sampling phase starts.
pub fn run_benchmark_with<B, F>(
    backend: &B,
    config: &BenchmarkConfig,
    on_traced: F,
) -> Result<BenchmarkReport, BenchmarkError>
where
    B: TraceBackend + ?Sized,
    F: FnOnce(i64),
{
    config.validate()?;

    let scene = SceneGuard::create(backend)?;
    scene.add_triangle_mesh(&QUAD_VERTICES, &QUAD_INDICES)?;
    scene.finalize()?;

    let mut sampler = RaySampler::seeded(config.seed);

    log::info!(
        "Tracing phase: {} trials of {} rays",
        config.num_trials,
        config.rays_per_trial
    );
    let total_elapsed = time_tracing(&scene, &mut sampler, config)?;
    on_traced(ms_per_trial(total_elapsed, config.num_trials));

    // the sampler is not reseeded, this phase only needs the same amount of work
    log::info!("Sampling phase");
    let rng_elapsed = time_sampling(&mut sampler, config);

    scene.destroy()?;

    Ok(BenchmarkReport {
        num_trials: config.num_trials,
        rays_per_trial: config.rays_per_trial,
        total_elapsed,
        rng_elapsed,
    })
}
