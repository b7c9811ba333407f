use tinytrace::{
    run_benchmark_with, tracing_done_line, workload_banner, BenchmarkConfig, Engine, EngineConfig,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Same quad scene and seed on every run
    let config = BenchmarkConfig::default();
    let engine = Engine::new(EngineConfig::default());

    println!("{}", workload_banner(&config));
    let report = run_benchmark_with(&engine, &config, |total_ms| {
        println!("{}", tracing_done_line(total_ms));
    })?;
    println!("{}", report.overhead_lines());

    Ok(())
}
