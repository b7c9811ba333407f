pub mod object_pool;

pub mod axis;
pub use axis::*;

pub mod triangle;
pub use triangle::*;

pub mod ray;
pub use ray::*;

pub mod hit;
pub use hit::*;

pub mod aabb;
pub use aabb::*;

pub mod intersections;
pub use intersections::*;

pub mod bvh;
pub use bvh::*;

pub mod bvh_strategy;
pub use bvh_strategy::*;

pub mod bvh_implementations;
pub use bvh_implementations::*;

pub mod error;
pub use error::*;

pub mod config;
pub use config::*;

pub mod scene;
pub use scene::*;

pub mod knn;
pub use knn::*;

pub mod backend;
pub use backend::*;

pub mod engine;
pub use engine::*;

pub mod benchmark;
pub use benchmark::*;
