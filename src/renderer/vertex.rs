//! Per-instance GPU layouts for the backdrop pipelines

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::sim::{Sprite, StarVertex};

/// Star population kinds (must match the shader's shape selection)
pub const STAR_KIND_GLYPH: u32 = 0;
pub const STAR_KIND_ROUND: u32 = 1;

/// One background star, instanced as a camera-facing quad
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub size: f32,
    pub phase: f32,
    pub kind: u32,
}

impl StarInstance {
    pub fn from_star(star: &StarVertex, kind: u32) -> Self {
        Self {
            position: star.position.to_array(),
            color: star.color.to_array(),
            size: star.size,
            phase: star.phase,
            kind,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32,
            3 => Float32,
            4 => Uint32,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}

/// Shooting-star sub-entity kinds (shader fragment selection)
pub const SPRITE_KIND_TRAIL: u32 = 0;
pub const SPRITE_KIND_STREAM: u32 = 1;
pub const SPRITE_KIND_GLOW: u32 = 2;
pub const SPRITE_KIND_TERMINAL: u32 = 3;

/// One shooting-star sub-entity, instanced as an oriented quad
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 3],
    pub rotation: f32,
    pub scale: [f32; 2],
    pub color: [f32; 3],
    pub alpha: f32,
    pub kind: u32,
}

impl SpriteInstance {
    pub fn from_sprite(sprite: &Sprite, kind: u32) -> Self {
        Self {
            position: sprite.position.to_array(),
            rotation: sprite.rotation,
            scale: sprite.scale.to_array(),
            color: sprite.color.to_array(),
            alpha: sprite.alpha,
            kind,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32,
            2 => Float32x2,
            3 => Float32x3,
            4 => Float32,
            5 => Uint32,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}

/// Background clear color (near-black night sky)
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.004,
    g: 0.006,
    b: 0.016,
    a: 1.0,
};

/// Terminal static-star tint
pub const TERMINAL_TINT: Vec3 = Vec3::new(1.0, 0.95, 0.85);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_strides_match_attributes() {
        // Tightly packed: no implicit padding allowed, the shader reads
        // exactly these offsets
        assert_eq!(std::mem::size_of::<StarInstance>(), 36);
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 44);
    }
}
