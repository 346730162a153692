use std::collections::VecDeque;

use log::debug;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::EventPump;

use k8e::constants::KEY_COUNT;
use k8e::{Fault, Keypad};

use crate::keymap::{hotkey, keymap, Hotkey};

/// Keyboard input from an sdl2 event pump.
///
/// Tracks the pressed status of keys 0..F and queues up any hotkeys seen
/// along the way for the driving loop to act on.
pub struct SdlKeypad {
    events: EventPump,
    keys: KeyState,
}

impl SdlKeypad {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, Fault> {
        let events = sdl
            .event_pump()
            .map_err(|e| Fault::Init(format!("event pump: {}", e)))?;
        Ok(SdlKeypad {
            events,
            keys: KeyState::new(),
        })
    }

    /// Handles every pending event and hands back the hotkeys pressed since
    /// the last call
    pub fn poll(&mut self) -> Result<Vec<Hotkey>, Fault> {
        while let Some(event) = self.events.poll_event() {
            self.handle(event)?;
        }
        Ok(self.keys.hotkeys.drain(..).collect())
    }

    /// Applies an event, returning the Chip-8 key if one was freshly pressed
    fn handle(&mut self, event: Event) -> Result<Option<u8>, Fault> {
        match event {
            Event::Quit { .. } => Err(Fault::QuitRequested),
            Event::KeyDown {
                scancode: Some(scancode),
                repeat,
                ..
            } => self.keys.key_down(scancode, repeat),
            Event::KeyUp {
                scancode: Some(scancode),
                ..
            } => {
                self.keys.key_up(scancode);
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

/// Key state kept apart from the event pump
struct KeyState {
    pressed_keys: [bool; KEY_COUNT as usize],
    hotkeys: VecDeque<Hotkey>,
}

impl KeyState {
    fn new() -> Self {
        KeyState {
            pressed_keys: [false; KEY_COUNT as usize],
            hotkeys: VecDeque::new(),
        }
    }

    /// Auto-repeat keeps a key held but never counts as a new press
    fn key_down(&mut self, scancode: Scancode, repeat: bool) -> Result<Option<u8>, Fault> {
        match (keymap(scancode), hotkey(scancode)) {
            (Some(key), _) => {
                self.pressed_keys[key as usize] = true;
                Ok(if repeat { None } else { Some(key) })
            }
            (_, Some(Hotkey::Quit)) => Err(Fault::QuitRequested),
            (_, Some(command)) if !repeat => {
                debug!("Hotkey {:?}", command);
                self.hotkeys.push_back(command);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn key_up(&mut self, scancode: Scancode) {
        if let Some(key) = keymap(scancode) {
            self.pressed_keys[key as usize] = false;
        }
    }
}

impl Keypad for SdlKeypad {
    fn is_down(&self, key: u8) -> bool {
        self.keys
            .pressed_keys
            .get(key as usize)
            .copied()
            .unwrap_or(false)
    }

    fn wait_key(&mut self) -> Result<u8, Fault> {
        loop {
            let event = self.events.wait_event();
            if let Some(key) = self.handle(event)? {
                return Ok(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_holds_key_without_a_new_press() {
        let mut keys = KeyState::new();
        assert_eq!(keys.key_down(Scancode::W, false).unwrap(), Some(0x5));
        assert_eq!(keys.key_down(Scancode::W, true).unwrap(), None);
        assert!(keys.pressed_keys[0x5]);

        keys.key_up(Scancode::W);
        assert!(!keys.pressed_keys[0x5]);
        assert_eq!(keys.key_down(Scancode::W, false).unwrap(), Some(0x5));
    }

    #[test]
    fn test_hotkeys_are_queued_once() {
        let mut keys = KeyState::new();
        assert_eq!(keys.key_down(Scancode::F5, false).unwrap(), None);
        assert_eq!(keys.key_down(Scancode::F5, true).unwrap(), None);
        assert_eq!(keys.hotkeys, VecDeque::from(vec![Hotkey::Pause]));
        assert!(matches!(
            keys.key_down(Scancode::Escape, false),
            Err(Fault::QuitRequested)
        ));
    }
}
