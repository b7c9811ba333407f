use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use glam::Vec3A;

use rand::{rngs::SmallRng, Rng, SeedableRng};

use tinytrace::*;

static TRIANGLES_NUM: usize = 1024;

static CAM_POS: Vec3A = Vec3A::new(0.0, 0.0, -18.0);
static P0: Vec3A = Vec3A::new(-1.0, 1.0, -15.0);
static P1: Vec3A = Vec3A::new(1.0, 1.0, -15.0);
static P2: Vec3A = Vec3A::new(-1.0, -1.0, -15.0);

static RESOLUTION_X: u32 = 128;
static RESOLUTION_Y: u32 = 128;

fn random_soup(rng: &mut SmallRng, count: usize) -> (Vec<f32>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(count * 9);
    for _ in 0..count {
        let v0 = rng.gen::<Vec3A>() * 9.0 - Vec3A::splat(5.0);
        let v1 = v0 + rng.gen::<Vec3A>();
        let v2 = v0 + rng.gen::<Vec3A>();
        vertices.extend(v0.to_array());
        vertices.extend(v1.to_array());
        vertices.extend(v2.to_array());
    }
    let indices = (0..(count * 3) as u32).collect();
    (vertices, indices)
}

fn camera_rays() -> Vec<Ray> {
    (0..RESOLUTION_Y)
        .flat_map(|y| (0..RESOLUTION_X).map(move |x| (x, y)))
        .map(|(x, y)| {
            let pixel_pos: Vec3A = P0
                + (P1 - P0) * (x as f32 / RESOLUTION_X as f32)
                + (P2 - P0) * (y as f32 / RESOLUTION_Y as f32);
            Ray::new(CAM_POS, (pixel_pos - CAM_POS).normalize_or_zero(), 0.0)
        })
        .collect()
}

fn quad_trace_single(c: &mut Criterion) {
    let engine = Engine::default();
    let scene = SceneGuard::create(&engine).unwrap();
    scene.add_triangle_mesh(&QUAD_VERTICES, &QUAD_INDICES).unwrap();
    scene.finalize().unwrap();

    let mut sampler = RaySampler::new(SmallRng::seed_from_u64(1337));

    c.bench_function("quad_trace_single", |b| {
        b.iter(|| {
            let ray = sampler.next_ray();
            let mut hit = Hit::default();
            scene.trace_single(&ray, &mut hit).unwrap();
            black_box(hit)
        })
    });

    c.bench_function("quad_sample_only", |b| {
        b.iter(|| (black_box(sampler.next_vector3()), black_box(sampler.next_vector3())))
    });
}

fn soup_build(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(0);
    let (vertices, indices) = random_soup(&mut rng, TRIANGLES_NUM);

    let mut group = c.benchmark_group("soup_build");
    for quality in [BuildQuality::Low, BuildQuality::Medium, BuildQuality::High] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", quality)),
            &quality,
            |b, &quality| {
                b.iter(|| {
                    let mut scene = Scene::new(quality);
                    scene.add_triangle_mesh(&vertices, &indices).unwrap();
                    scene.finalize().unwrap();
                    scene
                })
            },
        );
    }
    group.finish();
}

fn soup_camera_intersect(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(0);
    let (vertices, indices) = random_soup(&mut rng, TRIANGLES_NUM);
    let rays = camera_rays();

    let mut group = c.benchmark_group("soup_camera_intersect");
    group.throughput(Throughput::Elements(rays.len() as u64));
    for quality in [BuildQuality::Low, BuildQuality::Medium, BuildQuality::High] {
        let engine = Engine::default();
        let scene = engine.create_scene_with_quality(quality).unwrap();
        engine.add_triangle_mesh(scene, &vertices, &indices).unwrap();
        engine.finalize_scene(scene).unwrap();

        group.bench_function(BenchmarkId::from_parameter(format!("{:?}", quality)), |b| {
            b.iter(|| {
                let mut hits = 0;
                for ray in &rays {
                    let mut hit = Hit::default();
                    engine.trace_single(scene, ray, &mut hit).unwrap();
                    hits += hit.is_hit() as u32;
                }
                hits
            })
        });
    }
    group.finish();
}

fn knn_query(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(0);
    let points: Vec<f32> = (0..10_000)
        .flat_map(|_| (rng.gen::<Vec3A>() * 10.0).to_array())
        .collect();

    let engine = Engine::default();
    let accelerator = engine.new_knn_accelerator().unwrap();
    engine.set_knn_points(accelerator, &points).unwrap();

    let mut result = KnnResult::with_capacity(8);
    c.bench_function("knn_query_k8", |b| {
        b.iter(|| {
            let position = rng.gen::<Vec3A>() * 10.0;
            engine
                .knn_query(accelerator, position, 1.0, 8, &mut result)
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    quad_trace_single,
    soup_build,
    soup_camera_intersect,
    knn_query
);
criterion_main!(benches);
