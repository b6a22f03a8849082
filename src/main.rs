use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use superchip::{
    config::{DEFAULT_BATCH_PAUSE_MS, DEFAULT_BATCH_SIZE, DEFAULT_PIXEL_SCALE},
    window::Screen,
    Config, Emulator,
};

#[derive(Parser, Debug)]
#[command(name = "superchip", version, about = "CHIP-8 / SUPER-CHIP interpreter")]
struct Args {
    /// Program image, loaded verbatim at 0x200
    rom: PathBuf,

    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, help = "Instructions per timer tick")]
    batch_size: usize,

    #[arg(long, default_value_t = DEFAULT_BATCH_PAUSE_MS, help = "Sleep after each batch, in ms")]
    pause_ms: u64,

    #[arg(long, default_value_t = DEFAULT_PIXEL_SCALE, help = "Window pixels per low-res cell, rounded down to even (min 2)")]
    scale: usize,

    #[arg(long, help = "Seed for the random opcode")]
    seed: Option<u64>,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            batch_size: self.batch_size,
            batch_pause: Duration::from_millis(self.pause_ms),
            pixel_scale: self.scale,
            seed: self.seed,
        }
    }
}

// A missing or extra positional argument prints usage and exits cleanly;
// bad option values still fail with clap's message.
fn is_usage_error(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::MissingRequiredArgument | ErrorKind::UnknownArgument | ErrorKind::TooManyValues
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print()?;
            return Ok(());
        }
        Err(err) if is_usage_error(err.kind()) => {
            println!("{}", Args::command().render_usage());
            return Ok(());
        }
        Err(err) => err.exit(),
    };
    let config = args.config();

    let mut emu = Emulator::from_file(&args.rom, config.seed)
        .with_context(|| format!("loading {}", args.rom.display()))?;
    let mut screen = Screen::new(config.pixel_scale)?;

    emu.run(&mut screen, &config).map_err(|err| {
        log::error!("halted at {:#05x}: {err}", emu.mem.pc.0);
        err
    })?;
    Ok(())
}
