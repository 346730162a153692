use sdl2::keyboard::Scancode;

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// The keypad is laid over the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
/// Physical positions are used, so the layout holds on any keyboard.
const KEYPAD: [(Scancode, u8); 16] = [
    (Scancode::Num1, 0x1),
    (Scancode::Num2, 0x2),
    (Scancode::Num3, 0x3),
    (Scancode::Num4, 0xC),
    (Scancode::Q, 0x4),
    (Scancode::W, 0x5),
    (Scancode::E, 0x6),
    (Scancode::R, 0xD),
    (Scancode::A, 0x7),
    (Scancode::S, 0x8),
    (Scancode::D, 0x9),
    (Scancode::F, 0xE),
    (Scancode::Z, 0xA),
    (Scancode::X, 0x0),
    (Scancode::C, 0xB),
    (Scancode::V, 0xF),
];

pub fn keymap(key: Scancode) -> Option<u8> {
    KEYPAD
        .iter()
        .find(|(scancode, _)| *scancode == key)
        .map(|(_, chip8_key)| *chip8_key)
}

/// Emulator controls that live outside the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    Quit,
    Pause,
    Resume,
    Step,
    DumpRam,
    SaveState,
}

pub fn hotkey(key: Scancode) -> Option<Hotkey> {
    match key {
        Scancode::Escape => Some(Hotkey::Quit),
        Scancode::F5 => Some(Hotkey::Pause),
        Scancode::F6 => Some(Hotkey::Resume),
        Scancode::F7 => Some(Hotkey::Step),
        Scancode::F8 => Some(Hotkey::DumpRam),
        Scancode::F9 => Some(Hotkey::SaveState),
        _ => None,
    }
}
