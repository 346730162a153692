//! K8E, a Chip-8 emulator.
//!
//! ```text
//! k8e [OPTIONS] <ROM>
//! ```
//!
//! While running:
//! - `Esc` quits
//! - `F5` pauses, `F6` resumes and `F7` steps one instruction while paused
//! - `F8` dumps RAM to `k8e_ram_dump_<time>.txt`
//! - `F9` writes a savestate to `savestate_<time>.k8e`

use std::path::PathBuf;
use std::process;

use clap::Parser;
use env_logger::Env;

use k8e::constants::CLOCK_SPEED;
use k8e::{Config, Fault};

mod audio;
mod keymap;
mod keypad;
mod run;

#[derive(Parser, Debug)]
#[command(name = "k8e", version, about = "A Chip-8 emulator")]
struct Args {
    /// Program to run
    rom: PathBuf,

    /// Pause when the PC reaches this address; may be given up to 16 times
    #[arg(short = 'b', long = "breakpoint", value_parser = parse_hex_u16)]
    breakpoints: Vec<u16>,

    /// Background colour as RRGGBB hex
    #[arg(short = 'B', long, value_parser = parse_hex_u32, default_value = "000000")]
    background: u32,

    /// Foreground colour as RRGGBB hex
    #[arg(short = 'F', long, value_parser = parse_hex_u32, default_value = "FFFFFF")]
    foreground: u32,

    /// CPU clock speed in Hz
    #[arg(short = 'c', long, default_value_t = CLOCK_SPEED)]
    clock: u32,

    /// Trace every instruction
    #[arg(short = 'd', long)]
    debug: bool,

    /// Savestate to load; starts paused
    #[arg(short = 'l', long)]
    load: Option<PathBuf>,

    /// Disable sound
    #[arg(short = 'm', long)]
    mute: bool,

    /// Start paused
    #[arg(short = 'p', long)]
    paused: bool,

    /// Window pixels per Chip-8 pixel
    #[arg(short = 'P', long, default_value_t = 8)]
    scale: u32,

    /// Tone pitch in Hz
    #[arg(short = 't', long, default_value_t = 880)]
    pitch: u32,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            clock_speed: self.clock,
            background: self.background,
            foreground: self.foreground,
            scale: self.scale,
            pitch: self.pitch,
            mute: self.mute,
            paused: self.paused,
            savestate: self.load.clone(),
            breakpoints: self.breakpoints.clone(),
        }
    }
}

fn strip_hex_prefix(s: &str) -> &str {
    s.trim_start_matches("0x").trim_start_matches("0X")
}

fn parse_hex_u16(s: &str) -> Result<u16, String> {
    u16::from_str_radix(strip_hex_prefix(s), 16).map_err(|e| format!("{}: {}", s, e))
}

fn parse_hex_u32(s: &str) -> Result<u32, String> {
    let value =
        u32::from_str_radix(strip_hex_prefix(s), 16).map_err(|e| format!("{}: {}", s, e))?;
    if value > 0xFFFFFF {
        return Err(format!("{} is not an RRGGBB colour", s));
    }
    Ok(value)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.debug { "trace" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).try_init()?;

    match run::run(&args.rom, &args.config()) {
        Ok(()) | Err(Fault::QuitRequested) => Ok(()),
        Err(fault) => {
            eprintln!("ERROR 0x{:02x}: {}", fault.exit_code(), fault);
            process::exit(fault.exit_code());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_arguments() {
        assert_eq!(parse_hex_u16("0x2A0"), Ok(0x2A0));
        assert_eq!(parse_hex_u16("2a0"), Ok(0x2A0));
        assert!(parse_hex_u16("0xZZ").is_err());
        assert_eq!(parse_hex_u32("FF8800"), Ok(0xFF8800));
        assert!(parse_hex_u32("0x1000000").is_err());
    }

    #[test]
    fn test_args_fill_config() {
        let args = Args::parse_from(vec![
            "k8e", "-b", "0x204", "-b", "20A", "-c", "700", "-m", "-P", "4", "pong.ch8",
        ]);
        let config = args.config();
        assert_eq!(config.breakpoints, vec![0x204, 0x20A]);
        assert_eq!(config.clock_speed, 700);
        assert_eq!(config.scale, 4);
        assert!(config.mute);
        assert_eq!(config.foreground, 0xFFFFFF);
        assert_eq!(config.pitch, 880);
        assert_eq!(args.rom, PathBuf::from("pong.ch8"));
    }

    #[test]
    fn test_defaults_match_config() {
        let args = Args::parse_from(vec!["k8e", "rom.ch8"]);
        assert_eq!(args.config(), Config::default());
    }
}
