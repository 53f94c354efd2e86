use bytemuck::{Pod, Zeroable};
use chrono::{Datelike, Local, Timelike, Utc};
use winit::dpi::PhysicalSize;

use crate::runtime::FrameTiming;

/// CPU mirror of the `FrameParams` uniform block injected by `compile.rs`.
///
/// Field order and the explicit padding follow std140; keep in sync with the
/// GLSL header.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug)]
pub(crate) struct FrameUniforms {
    pub i_resolution: [i32; 2],
    pub i_step: i32,
    pub f_time: f32,
    pub f_time_delta: f32,
    pub f_timestamp: f32,
    pub _padding0: [i32; 2],
    pub i_date: [i32; 4],
    pub i_mouse: [i32; 4],
}

unsafe impl Zeroable for FrameUniforms {}
unsafe impl Pod for FrameUniforms {}

impl FrameUniforms {
    pub fn new(size: PhysicalSize<u32>) -> Self {
        let mut uniforms = Self {
            i_resolution: [size.width as i32, size.height as i32],
            i_step: 0,
            f_time: 0.0,
            f_time_delta: 0.0,
            f_timestamp: 0.0,
            _padding0: [0; 2],
            i_date: [0; 4],
            i_mouse: [0; 4],
        };
        uniforms.refresh_date();
        uniforms
    }

    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.i_resolution = [width as i32, height as i32];
    }

    /// Folds the current frame's clock, pointer, and wall-clock values in.
    pub fn update_frame(&mut self, timing: FrameTiming, mouse: [i32; 4]) {
        self.i_step = timing.frame_index.min(i32::MAX as u32) as i32;
        self.f_time = timing.elapsed_ms;
        self.f_time_delta = timing.delta_ms;
        self.f_timestamp = Utc::now().timestamp_millis() as f32;
        self.i_mouse = mouse;
        self.refresh_date();
    }

    fn refresh_date(&mut self) {
        let now = Local::now();
        self.i_date = [
            now.year(),
            now.month() as i32,
            now.day() as i32,
            now.num_seconds_from_midnight() as i32,
        ];
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{offset_of, size_of};

    use super::*;

    #[test]
    fn layout_matches_the_std140_block() {
        assert_eq!(size_of::<FrameUniforms>(), 64);
        assert_eq!(offset_of!(FrameUniforms, i_resolution), 0);
        assert_eq!(offset_of!(FrameUniforms, i_step), 8);
        assert_eq!(offset_of!(FrameUniforms, f_time), 12);
        assert_eq!(offset_of!(FrameUniforms, f_time_delta), 16);
        assert_eq!(offset_of!(FrameUniforms, f_timestamp), 20);
        assert_eq!(offset_of!(FrameUniforms, i_date), 32);
        assert_eq!(offset_of!(FrameUniforms, i_mouse), 48);
    }

    #[test]
    fn update_frame_carries_timing_and_mouse_through() {
        let mut uniforms = FrameUniforms::new(PhysicalSize::new(640, 400));
        uniforms.update_frame(
            FrameTiming {
                elapsed_ms: 1_500.0,
                delta_ms: 16.7,
                frame_index: 42,
            },
            [10, 390, 1, 0],
        );

        assert_eq!(uniforms.i_resolution, [640, 400]);
        assert_eq!(uniforms.i_step, 42);
        assert_eq!(uniforms.f_time, 1_500.0);
        assert_eq!(uniforms.f_time_delta, 16.7);
        assert!(uniforms.f_timestamp > 0.0);
        assert_eq!(uniforms.i_mouse, [10, 390, 1, 0]);
    }

    #[test]
    fn date_fields_are_plausible() {
        let uniforms = FrameUniforms::new(PhysicalSize::new(1, 1));
        let [year, month, day, seconds] = uniforms.i_date;
        assert!(year >= 2024);
        assert!((1..=12).contains(&month));
        assert!((1..=31).contains(&day));
        assert!((0..86_400).contains(&seconds));
    }
}
