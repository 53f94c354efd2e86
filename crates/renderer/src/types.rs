use std::path::PathBuf;
use std::time::Duration;

/// Immutable configuration passed to the viewer at start-up.
///
/// `ViewerConfig` mirrors the CLI flags and tells the viewer which shader
/// file to display and watch, how large the window should be, and how the
/// render loop should behave across reloads.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// Window size in physical pixels (ignored in fullscreen mode).
    pub window_size: (u32, u32),
    /// Path to the fragment shader that is rendered and watched for changes.
    pub shader_path: PathBuf,
    /// Reset the frame counter and elapsed-time origin whenever a reload is
    /// applied.
    pub reset_on_reload: bool,
    /// Optional pause between presented frames; `None` renders as fast as
    /// presentation allows.
    pub idle_delay: Option<Duration>,
    /// Render borderless fullscreen on the target monitor instead of a window.
    pub fullscreen: bool,
    /// Monitor to use for fullscreen mode; `None` picks the primary monitor.
    pub monitor_index: Option<usize>,
}

impl Default for ViewerConfig {
    /// Provides a 640x400 windowed configuration watching `default.frag`.
    fn default() -> Self {
        Self {
            window_size: (640, 400),
            shader_path: PathBuf::from("default.frag"),
            reset_on_reload: false,
            idle_delay: None,
            fullscreen: false,
            monitor_index: None,
        }
    }
}
