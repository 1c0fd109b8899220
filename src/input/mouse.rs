//! Mouse packet translation.

use bitflags::bitflags;
use thiserror::Error;

bitflags! {
    /// Byte 0 of a standard 3-byte mouse report.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MouseStatus: u8 {
        const LEFT_BUTTON   = 1 << 0;
        const RIGHT_BUTTON  = 1 << 1;
        const MIDDLE_BUTTON = 1 << 2;
        /// Hard-wired to 1; a clear bit means the stream lost alignment.
        const ALIGN         = 1 << 3;
        const X_SIGN        = 1 << 4;
        const Y_SIGN        = 1 << 5;
        const X_OVERFLOW    = 1 << 6;
        const Y_OVERFLOW    = 1 << 7;
    }
}

/// Reasons a report is discarded rather than decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    /// The always-one bit was clear: we are mid-report somewhere.
    #[error("mouse packet out of alignment (status {0:#04x})")]
    Misaligned(u8),

    /// The device clipped a delta; the magnitude bytes are unusable.
    #[error("mouse delta overflow (status {0:#04x})")]
    Overflow(u8),
}

/// One frame's worth of mouse input. The default value doubles as the
/// "no report this frame" event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub dx: i32,
    pub dy: i32,
    pub left: bool,
}

impl MouseEvent {
    /// Decode a validated 3-byte report.
    ///
    /// Deltas are 9-bit signed values: the sign lives in byte 0, the low
    /// eight bits in bytes 1/2. A set sign bit extends the magnitude byte
    /// downward rather than negating it.
    pub fn decode(packet: [u8; 3]) -> Result<Self, PacketError> {
        let status = MouseStatus::from_bits_retain(packet[0]);

        if !status.contains(MouseStatus::ALIGN) {
            return Err(PacketError::Misaligned(packet[0]));
        }
        if status.intersects(MouseStatus::X_OVERFLOW | MouseStatus::Y_OVERFLOW) {
            return Err(PacketError::Overflow(packet[0]));
        }

        Ok(Self {
            dx: extend(packet[1], status.contains(MouseStatus::X_SIGN)),
            dy: extend(packet[2], status.contains(MouseStatus::Y_SIGN)),
            left: status.contains(MouseStatus::LEFT_BUTTON),
        })
    }
}

fn extend(magnitude: u8, negative: bool) -> i32 {
    if negative {
        i32::from(magnitude) - 256
    } else {
        i32::from(magnitude)
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
