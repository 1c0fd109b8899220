//! Keyboard packet translation: make/break scan codes to key events.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Prefix byte that turns the following scan code into a release.
const BREAK_PREFIX: u8 = 0xF0;

/// The keys the game cares about. Everything else is folded into
/// [`Key::Other`], which carries no gameplay meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    Other,
}

static BY_SCAN_CODE: Lazy<HashMap<u8, Key>> = Lazy::new(|| {
    HashMap::from([
        (0x1D, Key::W),
        (0x1C, Key::A),
        (0x1B, Key::S),
        (0x23, Key::D),
        (0x29, Key::Space),
    ])
});

impl Key {
    pub fn from_scan_code(code: u8) -> Self {
        BY_SCAN_CODE.get(&code).copied().unwrap_or(Key::Other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
}

impl KeyEvent {
    /// Translate a 3-byte window of the scan-code stream. The last byte
    /// is the code; a break prefix directly before it marks a release.
    pub fn decode(packet: [u8; 3]) -> Self {
        Self {
            key: Key::from_scan_code(packet[2]),
            pressed: packet[1] != BREAK_PREFIX,
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_make_code_is_a_press() {
        let ev = KeyEvent::decode([0x1D, 0x1D, 0x1D]);
        assert_eq!(ev, KeyEvent { key: Key::W, pressed: true });
    }

    #[test]
    fn break_prefix_marks_release() {
        let ev = KeyEvent::decode([0x1D, 0xF0, 0x1D]);
        assert_eq!(ev, KeyEvent { key: Key::W, pressed: false });
    }

    #[test]
    fn scan_code_map() {
        assert_eq!(Key::from_scan_code(0x1C), Key::A);
        assert_eq!(Key::from_scan_code(0x1B), Key::S);
        assert_eq!(Key::from_scan_code(0x23), Key::D);
        assert_eq!(Key::from_scan_code(0x29), Key::Space);
    }

    #[test]
    fn unmapped_codes_fold_to_other() {
        assert_eq!(Key::from_scan_code(0x5A), Key::Other); // Enter
        let ev = KeyEvent::decode([0, 0, 0x76]); // Escape
        assert_eq!(ev.key, Key::Other);
    }
}
