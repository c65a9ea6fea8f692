//! Uniform block shared by every image plane.
//!
//! Shaders consuming this block see a single `uStartIndex`/`uEndIndex` pair
//! for the whole scene. Nothing here is per-mesh: the shader decides which
//! texture each plane shows from those two indices and `uTimeline`.
//!
//! `uScroll` is declared for scroll-reactive shader effects but the engine
//! never writes it, so it stays at zero.

use bytemuck::{Pod, Zeroable};

use crate::textures::TextureArrayRegistry;

#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionUniforms {
    pub u_time: f32,
    pub u_timeline: f32,
    pub u_start_index: i32,
    pub u_end_index: i32,
    pub u_scroll: f32,
    pub u_padding: [f32; 3],
}

unsafe impl Zeroable for TransitionUniforms {}
unsafe impl Pod for TransitionUniforms {}

impl TransitionUniforms {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            u_time: 0.0,
            u_timeline: 0.0,
            u_start_index: index_uniform(start_index),
            u_end_index: index_uniform(end_index),
            u_scroll: 0.0,
            u_padding: [0.0; 3],
        }
    }
}

fn index_uniform(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

/// The one material instance every plane is drawn with.
#[derive(Debug, Clone)]
pub struct SharedMaterial {
    uniforms: TransitionUniforms,
    textures: TextureArrayRegistry,
}

impl SharedMaterial {
    pub fn new(textures: TextureArrayRegistry, start_index: usize, end_index: usize) -> Self {
        Self {
            uniforms: TransitionUniforms::new(start_index, end_index),
            textures,
        }
    }

    pub fn uniforms(&self) -> &TransitionUniforms {
        &self.uniforms
    }

    /// Raw bytes of the uniform block for a buffer upload.
    pub fn uniform_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.uniforms)
    }

    pub fn texture_array(&self) -> &TextureArrayRegistry {
        &self.textures
    }

    pub fn set_time(&mut self, time: f32) {
        self.uniforms.u_time = time;
    }

    pub fn set_timeline(&mut self, timeline: f32) {
        self.uniforms.u_timeline = timeline;
    }

    pub fn set_indices(&mut self, start_index: usize, end_index: usize) {
        self.uniforms.u_start_index = index_uniform(start_index);
        self.uniforms.u_end_index = index_uniform(end_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_is_std140_sized() {
        assert_eq!(std::mem::size_of::<TransitionUniforms>(), 32);
        assert_eq!(std::mem::align_of::<TransitionUniforms>(), 16);
    }

    #[test]
    fn bytes_follow_field_order() {
        let mut material = SharedMaterial::new(TextureArrayRegistry::default(), 2, 5);
        material.set_time(1.5);
        material.set_timeline(3.0);
        let bytes = material.uniform_bytes();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[0..4], &1.5f32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &3.0f32.to_ne_bytes());
        assert_eq!(&bytes[8..12], &2i32.to_ne_bytes());
        assert_eq!(&bytes[12..16], &5i32.to_ne_bytes());
    }

    #[test]
    fn scroll_slot_stays_zero() {
        let mut material = SharedMaterial::new(TextureArrayRegistry::default(), 0, 1);
        material.set_time(9.0);
        material.set_timeline(2.0);
        material.set_indices(1, 0);
        assert_eq!(material.uniforms().u_scroll, 0.0);
    }
}
