use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::info;

use k8e::constants::TIMER_SPEED;
use k8e::{Chip8, Clock, Config, Fault, SaveState, Speaker};
use k8e_display::Window;

use crate::audio::{Mute, Tone};
use crate::keymap::Hotkey;
use crate::keypad::SdlKeypad;

/// Runs a program until it faults or the user quits
pub fn run(rom: &Path, config: &Config) -> Result<(), Fault> {
    config.validate()?;

    let sdl = sdl2::init().map_err(|e| Fault::Init(format!("SDL2: {}", e)))?;
    let mut chip8 = Chip8::new();
    chip8.load_program_file(rom)?;

    let mut window = Window::new(&sdl, config)?;
    let mut speaker: Box<dyn Speaker> = if config.mute {
        Box::new(Mute)
    } else {
        Box::new(Tone::new(&sdl, config.pitch)?)
    };
    let mut keypad = SdlKeypad::new(&sdl)?;

    let mut cpu_clock = Clock::new(config.clock_speed);
    let mut timer_clock = Clock::new(TIMER_SPEED);
    cpu_clock.start();
    timer_clock.start();

    chip8.display.clear();
    if config.paused || config.savestate.is_some() {
        chip8.cpu.pause();
    }
    if let Some(path) = &config.savestate {
        chip8.restore(&SaveState::load_file(path)?)?;
    }
    chip8.present(&mut window)?;

    // a breakpoint pauses once on arrival so that resuming from it works
    let mut last_breakpoint = None;
    loop {
        let pc = chip8.pc();
        if !config.is_breakpoint(pc) {
            last_breakpoint = None;
        } else if last_breakpoint != Some(pc) {
            info!("Breakpoint at {:04X}", pc);
            chip8.cpu.pause();
            last_breakpoint = Some(pc);
        }

        idle(&mut chip8, &mut keypad, &mut cpu_clock)?;
        if timer_clock.poll() && !chip8.tick_timers() {
            speaker.stop_tone();
        }

        chip8.step(&mut keypad)?;
        if chip8.sound_active() {
            speaker.start_tone()?;
        }
        chip8.present(&mut window)?;
    }
}

/// Services input and hotkeys until the CPU clock ticks
fn idle(chip8: &mut Chip8, keypad: &mut SdlKeypad, cpu_clock: &mut Clock) -> Result<(), Fault> {
    while !cpu_clock.poll() {
        for hotkey in keypad.poll()? {
            match hotkey {
                Hotkey::Quit => return Err(Fault::QuitRequested),
                Hotkey::Pause => chip8.cpu.pause(),
                Hotkey::Resume => chip8.cpu.resume(),
                Hotkey::Step => chip8.cpu.request_step(),
                Hotkey::DumpRam => dump_ram(chip8)?,
                Hotkey::SaveState => {
                    let path = timestamped("savestate_", ".k8e");
                    chip8.capture().save_file(&path)?;
                }
            }
        }
        std::thread::sleep(cpu_clock.remaining());
    }
    Ok(())
}

fn dump_ram(chip8: &Chip8) -> Result<(), Fault> {
    let path = timestamped("k8e_ram_dump_", ".txt");
    let io_fault = |source: std::io::Error| Fault::Io {
        context: format!("could not write to file {}", path.display()),
        source,
    };
    let mut writer = BufWriter::new(File::create(&path).map_err(io_fault)?);
    chip8.dump_ram(&mut writer)?;
    writer.flush().map_err(io_fault)?;
    info!("Dumped RAM to {}", path.display());
    Ok(())
}

/// `<prefix><unix seconds><suffix>` in the working directory
fn timestamped(prefix: &str, suffix: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    PathBuf::from(format!("{}{}{}", prefix, now, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamped_file_names() {
        let name = timestamped("savestate_", ".k8e");
        let name = name.to_string_lossy();
        assert!(name.starts_with("savestate_"));
        assert!(name.ends_with(".k8e"));
        let stamp = &name["savestate_".len()..name.len() - ".k8e".len()];
        assert!(stamp.parse::<u64>().unwrap() > 1_600_000_000);
    }
}
