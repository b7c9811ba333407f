pub mod simple_bvh;
pub use simple_bvh::*;
