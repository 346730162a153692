use std::path::PathBuf;

use crate::constants::{CLOCK_SPEED, MAX_BREAKPOINTS};
use crate::error::Fault;

/// Everything a run can be tuned with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// CPU frequency in Hz
    pub clock_speed: u32,
    /// 0xRRGGBB
    pub background: u32,
    /// 0xRRGGBB
    pub foreground: u32,
    /// Window pixels per Chip-8 pixel
    pub scale: u32,
    /// Tone frequency in Hz
    pub pitch: u32,
    pub mute: bool,
    pub paused: bool,
    /// Savestate to apply before the first instruction runs
    pub savestate: Option<PathBuf>,
    pub breakpoints: Vec<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            clock_speed: CLOCK_SPEED,
            background: 0x000000,
            foreground: 0xFFFFFF,
            scale: 8,
            pitch: 880,
            mute: false,
            paused: false,
            savestate: None,
            breakpoints: Vec::new(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Fault> {
        if self.clock_speed == 0 {
            return Err(Fault::Argument("clock speed must be above 0 Hz".to_string()));
        }
        if self.scale == 0 {
            return Err(Fault::Argument("pixel scale must be above 0".to_string()));
        }
        if self.pitch == 0 {
            return Err(Fault::Argument("tone pitch must be above 0 Hz".to_string()));
        }
        if self.breakpoints.len() > MAX_BREAKPOINTS {
            return Err(Fault::Argument(format!(
                "at most {} breakpoints can be set",
                MAX_BREAKPOINTS
            )));
        }
        Ok(())
    }

    /// Whether execution should stop before running the instruction at `pc`
    pub fn is_breakpoint(&self, pc: u16) -> bool {
        self.breakpoints.contains(&pc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultKind;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.clock_speed, 500);
        assert_eq!(config.scale, 8);
        assert_eq!(config.pitch, 880);
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let checks = [
            Config { clock_speed: 0, ..Config::default() },
            Config { scale: 0, ..Config::default() },
            Config { pitch: 0, ..Config::default() },
        ];
        for config in checks.iter() {
            assert_eq!(config.validate().unwrap_err().kind(), FaultKind::Argument);
        }
    }

    #[test]
    fn test_breakpoint_limit() {
        let mut config = Config {
            breakpoints: (0..16).map(|n| 0x200 + n * 2).collect(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.is_breakpoint(0x21E));
        assert!(!config.is_breakpoint(0x220));

        config.breakpoints.push(0x300);
        assert_eq!(config.validate().unwrap_err().exit_code(), 0x02);
    }
}
