use anyhow::{Context, Result};
use winit::event_loop::EventLoop;

/// Description of one monitor as reported by the windowing system.
#[derive(Debug, Clone)]
pub struct MonitorInfo {
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    pub refresh_rate_millihertz: Option<u32>,
    pub scale_factor: f64,
}

/// Briefly initialises the windowing layer and reports the monitors it sees,
/// in the same order `--monitor` indexes them.
pub fn enumerate_monitors() -> Result<Vec<MonitorInfo>> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    Ok(event_loop
        .available_monitors()
        .map(|monitor| {
            let size = monitor.size();
            MonitorInfo {
                name: monitor.name(),
                width: size.width,
                height: size.height,
                refresh_rate_millihertz: monitor.refresh_rate_millihertz(),
                scale_factor: monitor.scale_factor(),
            }
        })
        .collect())
}
