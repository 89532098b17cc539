use std::fs::File;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use env_logger::{Env, Target};

use emu8::{Options, CLOCK_SPEED};

mod keymap;
mod keypad;
mod run;

#[derive(Parser)]
#[command(name = "chip8")]
#[command(about = "A Chip-8 virtual machine", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a Chip-8 program in a window
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Program to load, read from stdin when omitted
    program: Option<PathBuf>,

    #[arg(long, default_value_t = CLOCK_SPEED, value_parser = clap::value_parser!(u32).range(1..))]
    #[arg(help = "Instructions executed per second")]
    clock: u32,

    #[arg(long, help = "Write logs to this file instead of stderr")]
    log: Option<PathBuf>,

    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    #[arg(help = "Size of each Chip-8 pixel on screen")]
    scale: u32,
}

fn init_logging(log: Option<&PathBuf>) -> std::io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or("emu8=debug,chip8=debug"));
    if let Some(path) = log {
        builder.target(Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.init();
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let Command::Run(args) = cli.command;

    if let Err(e) = init_logging(args.log.as_ref()) {
        eprintln!("unable to open log file: {}", e);
        process::exit(1);
    }

    let config = run::Config {
        program: args.program,
        options: Options {
            clock_speed: args.clock,
        },
        scale: args.scale,
    };
    if let Err(e) = run::run(config) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
