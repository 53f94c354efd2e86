mod cli;
mod monitors;
mod run;
mod template;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Monitors) => monitors::list_monitors(),
        Some(Command::Init(args)) => template::write_template(&args.path),
        None => run::run(cli.run),
    }
}
