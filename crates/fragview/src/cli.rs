use std::path::PathBuf;

use clap::{Parser, Subcommand};

const UNIFORM_HELP: &str = "\
Uniforms available to the shader (all optional to declare):
  ivec2  iResolution  Window pixel resolution (width and height)
  int    iStep        Running render frame count
  float  fTime        Running time in milliseconds
                      Note that this is affected by --reset-on-reload
  float  fTimeDelta   Milliseconds since the last rendered frame
  float  fTimestamp   Current UNIX timestamp in milliseconds
  ivec4  iDate        Year, month, day, and time of day in total seconds
  ivec4  iMouse       Mouse pixel coordinates x and y (bottom-left origin),
                      first and second mouse button states (1 pressed, 0 lifted)";

#[derive(Parser, Debug)]
#[command(
    name = "fragview",
    author,
    version,
    about = "Display a fragment shader in a window and reload it on every save",
    long_about = "Display a fragment shader in a window.\n\n\
        The vertex stage is provided internally: it fills the entire viewport \
        with a single triangle, which the fragment shader then uses as its \
        canvas. The shader file is watched for changes and recompiled on every \
        save without restarting the window.",
    after_help = UNIFORM_HELP
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Fragment shader source file to display and watch.
    #[arg(value_name = "FILE", default_value = "default.frag")]
    pub shader: PathBuf,

    /// Width of the output window in pixels.
    #[arg(long, value_name = "PIXELS", default_value_t = 640)]
    pub width: u32,

    /// Height of the output window in pixels.
    #[arg(long, value_name = "PIXELS", default_value_t = 400)]
    pub height: u32,

    /// Reset the timer uniforms (iStep and fTime) whenever the shader is
    /// recompiled.
    #[arg(long)]
    pub reset_on_reload: bool,

    /// Sleep this many milliseconds between rendered frames.
    #[arg(long, value_name = "MILLISECONDS")]
    pub idle_ms: Option<u64>,

    /// Render borderless fullscreen at the target monitor's native resolution.
    #[arg(long)]
    pub fullscreen: bool,

    /// Monitor index to use for fullscreen mode (see `fragview monitors`).
    #[arg(long, value_name = "INDEX")]
    pub monitor: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the monitors available on this system.
    Monitors,
    /// Write a starter fragment shader and exit.
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Destination path for the starter shader.
    #[arg(value_name = "FILE", default_value = "default.frag")]
    pub path: PathBuf,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_declaration_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_documented_surface() {
        let cli = Cli::try_parse_from(["fragview"]).unwrap();
        assert_eq!(cli.run.shader, PathBuf::from("default.frag"));
        assert_eq!(cli.run.width, 640);
        assert_eq!(cli.run.height, 400);
        assert!(!cli.run.reset_on_reload);
        assert!(cli.run.idle_ms.is_none());
        assert!(!cli.run.fullscreen);
        assert!(cli.run.monitor.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "fragview",
            "demo.frag",
            "--width",
            "1280",
            "--height",
            "720",
            "--reset-on-reload",
            "--idle-ms",
            "16",
            "--fullscreen",
            "--monitor",
            "1",
        ])
        .unwrap();
        assert_eq!(cli.run.shader, PathBuf::from("demo.frag"));
        assert_eq!(cli.run.width, 1280);
        assert_eq!(cli.run.height, 720);
        assert!(cli.run.reset_on_reload);
        assert_eq!(cli.run.idle_ms, Some(16));
        assert!(cli.run.fullscreen);
        assert_eq!(cli.run.monitor, Some(1));
    }

    #[test]
    fn init_subcommand_takes_an_optional_path() {
        let cli = Cli::try_parse_from(["fragview", "init", "canvas.frag"]).unwrap();
        match cli.command {
            Some(Command::Init(args)) => assert_eq!(args.path, PathBuf::from("canvas.frag")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
