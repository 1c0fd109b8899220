//! In-memory fakes of the hardware seams.
//!
//! These let the test-suite (and anything else that wants a headless run)
//! drive the full game loop frame by frame: script PS/2 bytes in, fire
//! timers by hand, read rendered pixels back out.

use std::collections::VecDeque;

use crate::defs::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::{CountdownTimer, FrameSink, Ps2Bus, SegmentDisplay, Surface};

pub const RVALID: u16 = 0x8000;

/* ── PS/2 ─────────────────────────────────────────────────────────── */

/// A PS/2 port fed from a pre-scripted word queue.
#[derive(Default)]
pub struct ScriptedPs2 {
    pub incoming: VecDeque<u16>,
    /// Every command byte the driver wrote, in order.
    pub commands: Vec<u8>,
}

impl ScriptedPs2 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `bytes` as valid data words.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.incoming.push_back(RVALID | u16::from(b));
        }
    }

    /// Queue `n` polls worth of empty-FIFO reads.
    pub fn push_idle(&mut self, n: usize) {
        for _ in 0..n {
            self.incoming.push_back(0);
        }
    }
}

impl Ps2Bus for ScriptedPs2 {
    fn poll_word(&mut self) -> u16 {
        // An exhausted script reads as an empty FIFO.
        self.incoming.pop_front().unwrap_or(0)
    }

    fn write_command(&mut self, cmd: u8) {
        self.commands.push(cmd);
    }
}

/* ── timer ────────────────────────────────────────────────────────── */

/// A countdown channel whose expirations are triggered by the test.
#[derive(Default)]
pub struct FakeTimer {
    /// `(ticks, repeat)` of the most recent `program` call.
    pub armed: Option<(u32, bool)>,
    pub running: bool,
    expired_latch: bool,
    pub counter: u32,
}

impl FakeTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the countdown reaching zero.
    pub fn fire(&mut self) {
        self.expired_latch = true;
        if let Some((_, repeat)) = self.armed {
            self.running = repeat;
        }
    }
}

impl CountdownTimer for FakeTimer {
    fn program(&mut self, ticks: u32, repeat: bool) {
        self.armed = Some((ticks, repeat));
        self.running = true;
    }

    fn read_and_clear_expired(&mut self) -> bool {
        std::mem::take(&mut self.expired_latch)
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn snapshot(&mut self) -> u32 {
        self.counter
    }
}

/* ── pixel controller ─────────────────────────────────────────────── */

/// Two RGB565 surfaces with immediate (zero-latency) swaps.
pub struct CaptureSink {
    surfaces: [Vec<u16>; 2],
    front: usize,
    back: usize,
    pub swaps: u32,
}

impl Default for CaptureSink {
    fn default() -> Self {
        let blank = vec![0u16; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize];
        Self {
            surfaces: [blank.clone(), blank],
            front: 0,
            back: 0,
            swaps: 0,
        }
    }
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The surface currently on screen.
    pub fn front(&self) -> &[u16] {
        &self.surfaces[self.front]
    }

    pub fn pixel(&self, x: i32, y: i32) -> u16 {
        self.front()[(y * SCREEN_WIDTH + x) as usize]
    }
}

impl FrameSink for CaptureSink {
    fn set_buffer_address(&mut self, surface: Surface) {
        self.back = match surface {
            Surface::One => 0,
            Surface::Two => 1,
        };
    }

    fn write_pixel(&mut self, x: i32, y: i32, color: u16) {
        debug_assert!(
            (0..SCREEN_WIDTH).contains(&x) && (0..SCREEN_HEIGHT).contains(&y),
            "pixel ({x},{y}) outside the visible resolution"
        );
        self.surfaces[self.back][(y * SCREEN_WIDTH + x) as usize] = color;
    }

    fn request_swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
        self.swaps += 1;
    }

    fn swap_pending(&self) -> bool {
        false
    }
}

/* ── 7-segment bank ───────────────────────────────────────────────── */

#[derive(Default)]
pub struct CaptureHex {
    pub last: Option<[u8; 6]>,
}

impl CaptureHex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SegmentDisplay for CaptureHex {
    fn show(&mut self, segments: [u8; 6]) {
        self.last = Some(segments);
    }
}
