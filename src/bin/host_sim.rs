//! Desktop harness: the whole game core, unmodified, against a minifb
//! window.
//!
//! The window plays every peripheral at once. Host mouse and keyboard
//! state is re-encoded into genuine PS/2 byte streams (3-byte aligned
//! reports, sign bits, make/break codes), so the real decoders run here
//! exactly as they do on the board; pixels land in an RGB888 shadow
//! buffer that is pushed out once per swap request.
//!
//! ```bash
//! cargo run --bin host_sim -- --background assets/field.bin
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use minifb::{Key, MouseButton, MouseMode, Scale, Window, WindowOptions};

use goblin_arena::defs::{BLACK, SCREEN_HEIGHT, SCREEN_WIDTH, TICKS_PER_MS};
use goblin_arena::hw::{CountdownTimer, FrameSink, Ps2Bus, SegmentDisplay, Surface};
use goblin_arena::render::{Background, SpriteBank};
use goblin_arena::score::SEGMENT_CODES;
use goblin_arena::Game;

#[derive(Parser, Debug)]
#[command(about = "Run the game in a desktop window")]
struct Opts {
    /// Raw little-endian RGB565 background dump (see `mk_background`)
    #[arg(long, value_name = "FILE")]
    background: Option<PathBuf>,
}

type SharedWindow = Rc<RefCell<Window>>;

const RVALID: u16 = 0x8000;

/* ── PS/2 synthesis ───────────────────────────────────────────────── */

/// Mouse reports rebuilt from window state: 9-bit signed deltas split
/// into a sign bit and a low byte, alignment bit set, button in bit 0.
struct HostMouse {
    window: SharedWindow,
    fifo: VecDeque<u8>,
    last_pos: (f32, f32),
    last_left: bool,
}

impl HostMouse {
    fn new(window: SharedWindow) -> Self {
        let pos = window
            .borrow()
            .get_mouse_pos(MouseMode::Clamp)
            .unwrap_or((0.0, 0.0));
        Self {
            window,
            fifo: VecDeque::new(),
            last_pos: pos,
            last_left: false,
        }
    }

    fn synth_report(&mut self) {
        let win = self.window.borrow();
        let pos = win.get_mouse_pos(MouseMode::Clamp).unwrap_or(self.last_pos);
        let left = win.get_mouse_down(MouseButton::Left);
        drop(win);

        let dx = ((pos.0 - self.last_pos.0) as i32).clamp(-255, 255);
        let dy = ((pos.1 - self.last_pos.1) as i32).clamp(-255, 255);
        if dx == 0 && dy == 0 && left == self.last_left {
            return; // a quiet mouse sends nothing
        }
        self.last_pos = pos;
        self.last_left = left;

        let mut status = 0x08u8; // alignment bit
        if left {
            status |= 0x01;
        }
        if dx < 0 {
            status |= 0x10;
        }
        if dy < 0 {
            status |= 0x20;
        }
        self.fifo.extend([status, dx as u8, dy as u8]);
    }
}

impl Ps2Bus for HostMouse {
    fn poll_word(&mut self) -> u16 {
        if self.fifo.is_empty() {
            self.synth_report();
        }
        match self.fifo.pop_front() {
            Some(byte) => RVALID | u16::from(byte),
            None => 0,
        }
    }

    fn write_command(&mut self, cmd: u8) {
        // A reset elicits the plug-in handshake, like the real article.
        if cmd == 0xFF {
            self.fifo.clear();
            self.fifo.extend([0xFA, 0xAA, 0x00]);
        }
    }
}

/// Keyboard scan codes rebuilt from window key state. Reports are padded
/// to whole 3-byte windows so a release can never strand the decoder
/// mid-packet.
struct HostKeyboard {
    window: SharedWindow,
    fifo: VecDeque<u8>,
    was_down: [bool; TRACKED_KEYS.len()],
}

const TRACKED_KEYS: [(Key, u8); 5] = [
    (Key::W, 0x1D),
    (Key::A, 0x1C),
    (Key::S, 0x1B),
    (Key::D, 0x23),
    (Key::Space, 0x29),
];

impl HostKeyboard {
    fn new(window: SharedWindow) -> Self {
        Self {
            window,
            fifo: VecDeque::new(),
            was_down: [false; TRACKED_KEYS.len()],
        }
    }

    fn synth_reports(&mut self) {
        let win = self.window.borrow();
        for (i, (key, code)) in TRACKED_KEYS.iter().enumerate() {
            let down = win.is_key_down(*key);
            if down {
                // Typematic stream: one make window per frame while held.
                self.fifo.extend([*code, *code, *code]);
            } else if self.was_down[i] {
                self.fifo.extend([*code, 0xF0, *code]);
            }
            self.was_down[i] = down;
        }
    }
}

impl Ps2Bus for HostKeyboard {
    fn poll_word(&mut self) -> u16 {
        if self.fifo.is_empty() {
            self.synth_reports();
        }
        match self.fifo.pop_front() {
            Some(byte) => RVALID | u16::from(byte),
            None => 0,
        }
    }

    fn write_command(&mut self, cmd: u8) {
        if cmd == 0xFF {
            self.fifo.clear();
            self.fifo.extend([0xFA, 0xAA, 0x00]);
        }
    }
}

/* ── display ──────────────────────────────────────────────────────── */

/// Single shadow buffer; `request_swap` pushes it to the window, which
/// also paces the loop via the target frame rate.
struct HostSink {
    window: SharedWindow,
    shadow: Vec<u32>,
}

impl HostSink {
    fn new(window: SharedWindow) -> Self {
        Self {
            window,
            shadow: vec![0; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
        }
    }
}

fn rgb565_to_888(c: u16) -> u32 {
    let r = ((c >> 11) & 0x1F) as u32;
    let g = ((c >> 5) & 0x3F) as u32;
    let b = (c & 0x1F) as u32;
    ((r << 3 | r >> 2) << 16) | ((g << 2 | g >> 4) << 8) | (b << 3 | b >> 2)
}

impl FrameSink for HostSink {
    fn set_buffer_address(&mut self, _surface: Surface) {
        // One shadow buffer stands in for both surfaces.
    }

    fn write_pixel(&mut self, x: i32, y: i32, color: u16) {
        self.shadow[(y * SCREEN_WIDTH + x) as usize] = rgb565_to_888(color);
    }

    fn request_swap(&mut self) {
        self.window
            .borrow_mut()
            .update_with_buffer(&self.shadow, SCREEN_WIDTH as usize, SCREEN_HEIGHT as usize)
            .expect("window update failed");
    }

    fn swap_pending(&self) -> bool {
        false // update_with_buffer already blocked for pacing
    }
}

/* ── timers & score ───────────────────────────────────────────────── */

struct HostTimer {
    epoch: Instant,
    deadline: Option<Instant>,
    period: Duration,
    repeat: bool,
}

impl HostTimer {
    fn new() -> Self {
        Self {
            epoch: Instant::now(),
            deadline: None,
            period: Duration::ZERO,
            repeat: false,
        }
    }
}

impl CountdownTimer for HostTimer {
    fn program(&mut self, ticks: u32, repeat: bool) {
        self.period = Duration::from_millis(u64::from(ticks / TICKS_PER_MS));
        self.repeat = repeat;
        self.deadline = Some(Instant::now() + self.period);
    }

    fn read_and_clear_expired(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = self.repeat.then(|| deadline + self.period);
                true
            }
            _ => false,
        }
    }

    fn stop(&mut self) {
        self.deadline = None;
    }

    fn snapshot(&mut self) -> u32 {
        self.epoch.elapsed().subsec_nanos()
    }
}

/// Score lands in the window title instead of a segment bank.
struct TitleHex {
    window: SharedWindow,
    last: Option<[u8; 6]>,
}

impl SegmentDisplay for TitleHex {
    fn show(&mut self, segments: [u8; 6]) {
        if self.last == Some(segments) {
            return;
        }
        self.last = Some(segments);

        let digits: String = segments
            .iter()
            .rev()
            .map(|seg| {
                SEGMENT_CODES
                    .iter()
                    .position(|c| c == seg)
                    .map_or('?', |d| char::from_digit(d as u32, 16).unwrap())
            })
            .collect();
        self.window
            .borrow_mut()
            .set_title(&format!("Goblin Arena - score {digits}"));
    }
}

/* ── entry ────────────────────────────────────────────────────────── */

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let background = match &opts.background {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading background {}", path.display()))?;
            Background::from_rgb565_bytes(&bytes)
                .with_context(|| format!("decoding background {}", path.display()))?
        }
        None => Background::solid(BLACK),
    };

    let mut window = Window::new(
        "Goblin Arena",
        SCREEN_WIDTH as usize,
        SCREEN_HEIGHT as usize,
        WindowOptions {
            scale: Scale::X2,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(60);
    let window: SharedWindow = Rc::new(RefCell::new(window));

    let mut game = Game::new(
        HostMouse::new(window.clone()),
        HostKeyboard::new(window.clone()),
        HostTimer::new(),
        HostTimer::new(),
        HostSink::new(window.clone()),
        TitleHex {
            window: window.clone(),
            last: None,
        },
        background,
        SpriteBank::placeholder(),
    );

    while window.borrow().is_open() && !window.borrow().is_key_down(Key::Escape) {
        game.frame();
    }
    Ok(())
}
