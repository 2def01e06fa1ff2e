//! WebGPU rendering for the backdrop

pub mod pipeline;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::{SpriteInstance, StarInstance};
