use anyhow::{bail, Result};
use planesync::{DrawTarget, Frame, TransitionUniforms};

/// Draw target that stages the uniform block the way a GPU upload would and
/// checks the frame is drawable, without touching a device.
#[derive(Debug, Default)]
pub struct HeadlessTarget {
    uniform_buffer: Vec<u8>,
    planes: usize,
    draws: u64,
}

impl HeadlessTarget {
    pub fn new() -> Self {
        Self {
            uniform_buffer: vec![0; std::mem::size_of::<TransitionUniforms>()],
            ..Self::default()
        }
    }

    pub fn planes(&self) -> usize {
        self.planes
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl DrawTarget for HeadlessTarget {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<()> {
        let uniforms = frame.material.uniforms();
        let layers = frame.material.texture_array().len();
        for (name, index) in [
            ("uStartIndex", uniforms.u_start_index),
            ("uEndIndex", uniforms.u_end_index),
        ] {
            if index < 0 || index as usize >= layers {
                bail!("{name} = {index} is outside the {layers}-layer texture array");
            }
        }

        let bytes = frame.material.uniform_bytes();
        self.uniform_buffer.clear();
        self.uniform_buffer.extend_from_slice(bytes);
        self.planes = frame.entries.len();
        self.draws += 1;
        Ok(())
    }
}
