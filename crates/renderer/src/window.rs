use std::fs;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use tracing::{error, info, warn};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::monitor::MonitorHandle;
use winit::window::{Fullscreen, WindowBuilder};

use crate::gpu::GpuState;
use crate::reload::reload_handoff;
use crate::runtime::{FrameClock, FramePacer};
use crate::types::ViewerConfig;
use crate::watch::spawn_source_watcher;

/// Opens the window, spawns the source watcher, and drives the render loop
/// until the window is closed.
///
/// Each loop iteration first polls the reload handoff without blocking; when
/// a fresh fragment source is pending it is compiled and swapped in instead
/// of drawing that iteration, otherwise the clock advances and a frame is
/// drawn. The common path never waits on the watcher thread.
pub(crate) fn run(config: &ViewerConfig) -> Result<()> {
    let initial_source = fs::read_to_string(&config.shader_path).with_context(|| {
        format!(
            "failed to read fragment shader at {}",
            config.shader_path.display()
        )
    })?;
    info!(path = %config.shader_path.display(), "loaded fragment shader");

    let event_loop = EventLoop::new().context("failed to initialize event loop")?;

    let fullscreen = config
        .fullscreen
        .then(|| Fullscreen::Borderless(select_monitor(&event_loop, config.monitor_index)));

    let window_size = PhysicalSize::new(config.window_size.0, config.window_size.1);
    let title = format!("{} - fragview", config.shader_path.display());
    let mut builder = WindowBuilder::new()
        .with_title(title)
        .with_inner_size(window_size);
    if let Some(fullscreen) = fullscreen {
        builder = builder.with_fullscreen(Some(fullscreen));
    }
    let window = builder
        .build(&event_loop)
        .context("failed to create window")?;

    let mut state = GpuState::new(&window, window.inner_size(), &initial_source)?;

    let (reload_tx, reload_rx) = reload_handoff();
    spawn_source_watcher(config.shader_path.clone(), reload_tx)
        .context("failed to spawn watcher thread")?;

    let mut clock = FrameClock::new(Instant::now());
    let mut pacer = FramePacer::new(config.idle_delay);
    let mut mouse = MouseState::default();
    let reset_on_reload = config.reset_on_reload;

    window.request_redraw();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    elwt.exit();
                }
                WindowEvent::Resized(new_size) => {
                    state.resize(new_size);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    mouse.handle_cursor_moved(position);
                }
                WindowEvent::MouseInput {
                    state: button_state,
                    button,
                    ..
                } => {
                    mouse.handle_button(button, button_state);
                }
                WindowEvent::RedrawRequested => {
                    let timing = clock.advance(Instant::now());
                    let mouse_uniform = mouse.as_uniform(state.size().height);
                    match state.render(timing, mouse_uniform) {
                        Ok(()) => pacer.mark_presented(Instant::now()),
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            state.resize(state.size());
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("surface out of memory; exiting");
                            elwt.exit();
                        }
                        Err(err) => {
                            warn!(error = ?err, "surface error; retrying next frame");
                        }
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if let Some(source) = reload_rx.try_take() {
                    info!("new fragment source received");
                    match state.swap_fragment(&source) {
                        Ok(()) => {
                            if reset_on_reload {
                                info!("resetting timers");
                                clock.reset(Instant::now());
                            }
                        }
                        Err(err) => {
                            error!("shader reload failed; keeping previous program:\n{err:#}");
                        }
                    }
                    // No draw on a reload iteration; the next frame uses the
                    // swapped program.
                    window.request_redraw();
                    elwt.set_control_flow(ControlFlow::Poll);
                } else if pacer.ready_for_frame(Instant::now()) {
                    window.request_redraw();
                    elwt.set_control_flow(ControlFlow::Poll);
                } else if let Some(deadline) = pacer.next_deadline() {
                    elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                }
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}

/// Resolves the fullscreen target monitor, falling back to the primary one
/// when the requested index is out of range.
fn select_monitor(event_loop: &EventLoop<()>, index: Option<usize>) -> Option<MonitorHandle> {
    let monitor = match index {
        Some(index) => match event_loop.available_monitors().nth(index) {
            Some(monitor) => Some(monitor),
            None => {
                let count = event_loop.available_monitors().count();
                warn!(
                    index,
                    count, "monitor index out of range; falling back to primary monitor"
                );
                event_loop.primary_monitor()
            }
        },
        None => event_loop.primary_monitor(),
    };

    if let Some(monitor) = &monitor {
        info!(
            name = %monitor.name().unwrap_or_default(),
            width = monitor.size().width,
            height = monitor.size().height,
            "using monitor"
        );
    }
    monitor
}

/// Last-known pointer position and button state.
///
/// Written only by the window callbacks on the render thread, read once per
/// frame when uniforms are bound.
#[derive(Default)]
struct MouseState {
    position: Option<PhysicalPosition<f64>>,
    left_down: bool,
    right_down: bool,
}

impl MouseState {
    fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.position = Some(position);
    }

    fn handle_button(&mut self, button: MouseButton, state: ElementState) {
        let down = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.left_down = down,
            MouseButton::Right => self.right_down = down,
            _ => {}
        }
    }

    /// Pointer coordinates with a bottom-left origin plus 0/1 button flags.
    fn as_uniform(&self, height: u32) -> [i32; 4] {
        let (x, y) = match self.position {
            Some(position) => (position.x as i32, height as i32 - position.y as i32),
            None => (0, 0),
        };
        [x, y, i32::from(self.left_down), i32::from(self.right_down)]
    }
}
