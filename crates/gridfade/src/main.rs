mod cli;
mod headless;
mod page_file;
mod run;
mod script;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Command::Simulate(args) => run::simulate(args),
        Command::Config(args) => run::print_config(args),
    }
}
