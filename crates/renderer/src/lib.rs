//! Renderer crate for fragview.
//!
//! The crate glues a `winit` window, a `wgpu` pipeline, and a background
//! file watcher together so a fragment shader can be edited live. The
//! overall flow is:
//!
//! ```text
//!   CLI / fragview
//!          │ ViewerConfig
//!          ▼
//!   Viewer::run ──▶ winit event loop ──▶ render frame ─▶ uniforms ─▶ GPU UBO
//!          ▲               │ try_take()
//!          │               ▼
//!   watcher thread ──▶ reload handoff ──▶ recompile + swap pipeline
//! ```
//!
//! The watcher thread re-reads the shader file on every write and offers the
//! contents through a single-slot rendezvous; the render loop polls that slot
//! once per iteration, so a reload is picked up promptly without the steady
//! draw path ever blocking.

mod compile;
mod gpu;
mod monitors;
mod reload;
mod runtime;
mod types;
mod watch;
mod window;

use anyhow::Result;

pub use monitors::{enumerate_monitors, MonitorInfo};
pub use runtime::{FrameClock, FrameTiming};
pub use types::ViewerConfig;

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives inside the window module; `Viewer` simply hands
/// the configuration over and reports setup failures.
pub struct Viewer {
    config: ViewerConfig,
}

impl Viewer {
    /// Builds a viewer for the supplied configuration.
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }

    /// Opens the window, spawns the source watcher, and drives the render
    /// loop until the window is closed.
    ///
    /// Returns an error when the window, GPU device, or initial shader file
    /// cannot be set up. A shader that fails to *compile* is not an error at
    /// this level; the viewer keeps running and reports the diagnostic.
    pub fn run(&mut self) -> Result<()> {
        window::run(&self.config)
    }
}
