//! Packet accumulation over a polled PS/2 data register.
//!
//! Both attached devices report in 3-byte units. The decoder never blocks
//! waiting for a report to *start* (an idle device must not stall the
//! frame), but once a first byte is in it busy-polls until the report is
//! whole. Bytes would otherwise be left straddling two frames and every
//! later packet would come out shifted.

use crate::hw::Ps2Bus;

/// Data-valid flag in the polled register word.
const RVALID: u16 = 0x8000;

/// Self-test-passed byte a device emits right after plugging in.
const BAT_OK: u8 = 0xAA;
/// Device id that follows `BAT_OK`.
const DEVICE_ID: u8 = 0x00;

const CMD_RESET: u8 = 0xFF;
const CMD_ENABLE_REPORTING: u8 = 0xF4;

/// Stateful reader for one PS/2 port.
pub struct Ps2Decoder<B> {
    bus: B,
}

impl<B: Ps2Bus> Ps2Decoder<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Reset the device and re-enable data reporting.
    pub fn reset(&mut self) {
        self.bus.write_command(CMD_RESET);
        self.bus.write_command(CMD_ENABLE_REPORTING);
    }

    /// Try to pull one 3-byte packet off the port.
    ///
    /// Returns `None` when the FIFO is idle on the first poll, and also
    /// when the bytes turn out to be the plug-in handshake, which is
    /// answered here (the device stays mute forever if reporting is not
    /// re-enabled) and never surfaces as input.
    pub fn poll_packet(&mut self) -> Option<[u8; 3]> {
        let word = self.bus.poll_word();
        if word & RVALID == 0 {
            return None;
        }

        let mut bytes = [word as u8, 0, 0];
        let mut have = 1;
        while have < 3 {
            let word = self.bus.poll_word();
            if word & RVALID != 0 {
                bytes[have] = word as u8;
                have += 1;
            }
        }

        if bytes[1] == BAT_OK && bytes[2] == DEVICE_ID {
            self.bus.write_command(CMD_ENABLE_REPORTING);
            return None;
        }

        Some(bytes)
    }

    /// Drain the FIFO until it reads empty. Used to discard power-on
    /// garbage at init and to re-synchronise after a malformed packet.
    pub fn flush(&mut self) {
        while self.bus.poll_word() & RVALID != 0 {}
    }

    /// Raw bus access for tests that script the byte stream.
    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
