use std::f32::consts::PI;

use log::debug;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

use k8e::{Fault, Speaker};

const SAMPLE_RATE: i32 = 44_100;
const VOLUME: f32 = 0.25;

/// A sine wave generated one sample at a time
pub struct SineWave {
    phase: f32,
    phase_step: f32,
    volume: f32,
}

impl SineWave {
    fn new(pitch: u32, sample_rate: i32) -> Self {
        SineWave {
            phase: 0.0,
            phase_step: pitch as f32 / sample_rate as f32,
            volume: VOLUME,
        }
    }
}

impl AudioCallback for SineWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.volume * (2.0 * PI * self.phase).sin();
            self.phase = (self.phase + self.phase_step) % 1.0;
        }
    }
}

/// Plays a continuous tone while the sound timer is running
pub struct Tone {
    device: AudioDevice<SineWave>,
    playing: bool,
}

impl Tone {
    /// # Arguments
    /// * `sdl` an sdl2 context to open the audio device on
    /// * `pitch` tone frequency in Hz
    pub fn new(sdl: &sdl2::Sdl, pitch: u32) -> Result<Self, Fault> {
        let audio = sdl
            .audio()
            .map_err(|e| Fault::Init(format!("audio subsystem: {}", e)))?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: None,
        };
        let device = audio
            .open_playback(None::<&str>, &desired, |spec| SineWave::new(pitch, spec.freq))
            .map_err(|e| Fault::Init(format!("audio device: {}", e)))?;
        debug!("Opened audio device [pitch: {}Hz]", pitch);
        Ok(Tone {
            device,
            playing: false,
        })
    }
}

impl Speaker for Tone {
    fn start_tone(&mut self) -> Result<(), Fault> {
        if !self.playing {
            self.device.resume();
            self.playing = true;
        }
        Ok(())
    }

    fn stop_tone(&mut self) {
        if self.playing {
            self.device.pause();
            self.playing = false;
        }
    }
}

/// Stands in for a `Tone` when sound is turned off
pub struct Mute;

impl Speaker for Mute {
    fn start_tone(&mut self) -> Result<(), Fault> {
        Ok(())
    }

    fn stop_tone(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_starts_at_zero_and_stays_in_volume() {
        let mut wave = SineWave::new(880, SAMPLE_RATE);
        let mut out = [1.0; 512];
        wave.callback(&mut out);
        assert_eq!(out[0], 0.0);
        assert!(out.iter().all(|s| s.abs() <= VOLUME));
        assert!(out.iter().any(|s| *s > VOLUME / 2.0));
        assert!(out.iter().any(|s| *s < -VOLUME / 2.0));
    }

    #[test]
    fn test_sine_period_follows_pitch() {
        // 441Hz at 44.1kHz repeats every 100 samples
        let mut wave = SineWave::new(441, SAMPLE_RATE);
        let mut out = [0.0; 201];
        wave.callback(&mut out);
        assert!((out[25] - VOLUME).abs() < 1e-3);
        assert!((out[125] - VOLUME).abs() < 1e-3);
        assert!(out[100].abs() < 1e-3);
    }

    #[test]
    fn test_mute_ignores_everything() {
        let mut mute = Mute;
        assert!(mute.start_tone().is_ok());
        mute.stop_tone();
    }
}
