use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "gridfade",
    author,
    version,
    about = "Headless driver for the image-plane crossfade engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a pointer script against a page description and print one JSON line per frame.
    Simulate(SimulateArgs),
    /// Print the effective configuration as TOML.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Page description (viewport, image and link rectangles) as JSON.
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// Site configuration TOML; built-in defaults are used when omitted.
    #[arg(long, value_name = "FILE", env = "GRIDFADE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Comma separated steps: `hover:N`, `click:N`, `resize:WIDTHxHEIGHT`, `wait:FRAMES`.
    #[arg(long, value_name = "STEPS", default_value = "")]
    pub script: String,

    /// Frames to run after the script. Defaults to running until the transition settles.
    #[arg(long, value_name = "N")]
    pub frames: Option<u32>,

    /// Simulated display refresh interval in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    pub frame_ms: u64,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Site configuration TOML to validate and print.
    #[arg(long, value_name = "FILE", env = "GRIDFADE_CONFIG")]
    pub config: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
