use std::time::Duration;

use anyhow::Result;
use renderer::{Viewer, ViewerConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(args: RunArgs) -> Result<()> {
    tracing::info!(shader = %args.shader.display(), "starting fragview");

    let config = ViewerConfig {
        window_size: (args.width, args.height),
        shader_path: args.shader,
        reset_on_reload: args.reset_on_reload,
        idle_delay: args.idle_ms.filter(|ms| *ms > 0).map(Duration::from_millis),
        fullscreen: args.fullscreen,
        monitor_index: args.monitor,
    };

    Viewer::new(config).run()
}
