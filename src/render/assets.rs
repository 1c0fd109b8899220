//! Pixel assets: the background image and the sprite-sheet bank.
//!
//! Everything is RGB565. Sheets hold all animation frames side by side;
//! a frame is addressed by dividing the sheet width by the frame count.
//! The reserved value [`CHROMA_KEY`] reads as transparent during blits.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use crate::defs::{
    CURSOR_HEIGHT, CURSOR_WIDTH, GOBLIN_ANIM_FRAMES, GOBLIN_SPRITE_SIZE, RED, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
use crate::sim::Facing;

/// Transparent sentinel for sprite blits (white in RGB565).
pub const CHROMA_KEY: u16 = 0xFFFF;

/// Errors raised while decoding raw asset bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset is {got} bytes, expected {expected}")]
    BadLength { expected: usize, got: usize },

    #[error("sheet width {width} is not divisible by {frames} frames")]
    RaggedFrames { width: usize, frames: usize },
}

/* ── background ───────────────────────────────────────────────────── */

/// Full-screen backdrop, loaded once and read-only afterwards.
pub struct Background {
    pixels: Vec<u16>,
}

impl Background {
    pub fn solid(color: u16) -> Self {
        Self {
            pixels: vec![color; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
        }
    }

    /// Decode a little-endian RGB565 dump of exactly one screen.
    pub fn from_rgb565_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let expected = (SCREEN_WIDTH * SCREEN_HEIGHT) as usize * 2;
        if bytes.len() != expected {
            return Err(AssetError::BadLength {
                expected,
                got: bytes.len(),
            });
        }
        let mut pixels = vec![0u16; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize];
        LittleEndian::read_u16_into(bytes, &mut pixels);
        Ok(Self { pixels })
    }

    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> u16 {
        self.pixels[(y * SCREEN_WIDTH + x) as usize]
    }
}

/* ── sprite sheets ────────────────────────────────────────────────── */

#[derive(Clone)]
pub struct SpriteSheet {
    width: usize,
    height: usize,
    frames: usize,
    pixels: Vec<u16>,
}

impl SpriteSheet {
    /// Decode a little-endian RGB565 sheet of `width`×`height` holding
    /// `frames` equal-width frames.
    pub fn from_rgb565_bytes(
        width: usize,
        height: usize,
        frames: usize,
        bytes: &[u8],
    ) -> Result<Self, AssetError> {
        if width % frames != 0 {
            return Err(AssetError::RaggedFrames { width, frames });
        }
        let expected = width * height * 2;
        if bytes.len() != expected {
            return Err(AssetError::BadLength {
                expected,
                got: bytes.len(),
            });
        }
        let mut pixels = vec![0u16; width * height];
        LittleEndian::read_u16_into(bytes, &mut pixels);
        Ok(Self {
            width,
            height,
            frames,
            pixels,
        })
    }

    pub fn frame_width(&self) -> usize {
        self.width / self.frames
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read one texel of `frame`; `mirror` flips the read index so one
    /// side-view sheet serves both horizontal facings.
    #[inline]
    pub fn pixel(&self, frame: usize, fx: usize, fy: usize, mirror: bool) -> u16 {
        let fw = self.frame_width();
        let sx = if mirror { fw - 1 - fx } else { fx } + frame * fw;
        self.pixels[fy * self.width + sx]
    }
}

/* ── the bank ─────────────────────────────────────────────────────── */

/// Every sheet the renderer draws from. Left/right goblins share the
/// side sheets via mirrored reads, so four facings need six sheets.
pub struct SpriteBank {
    pub goblin_walk_side: SpriteSheet,
    pub goblin_attack_side: SpriteSheet,
    pub goblin_walk_up: SpriteSheet,
    pub goblin_attack_up: SpriteSheet,
    pub goblin_walk_down: SpriteSheet,
    pub goblin_attack_down: SpriteSheet,
    pub cursor: SpriteSheet,
}

impl SpriteBank {
    /// Pick the sheet for a goblin; the bool asks for a mirrored blit.
    pub fn goblin(&self, heading: Facing, attacking: bool) -> (&SpriteSheet, bool) {
        if heading.contains(Facing::RIGHT) {
            (
                if attacking { &self.goblin_attack_side } else { &self.goblin_walk_side },
                true,
            )
        } else if heading.contains(Facing::LEFT) {
            (
                if attacking { &self.goblin_attack_side } else { &self.goblin_walk_side },
                false,
            )
        } else if heading.contains(Facing::DOWN) {
            (
                if attacking { &self.goblin_attack_down } else { &self.goblin_walk_down },
                false,
            )
        } else {
            (
                if attacking { &self.goblin_attack_up } else { &self.goblin_walk_up },
                false,
            )
        }
    }

    /// Built-in flat-color stand-in art, good enough to see the game
    /// move before real sheets are converted.
    pub fn placeholder() -> Self {
        Self {
            goblin_walk_side: keyed_sheet(0x2589),   // muted green
            goblin_attack_side: keyed_sheet(0xB9E7), // angry orange
            goblin_walk_up: keyed_sheet(0x2D09),
            goblin_attack_up: keyed_sheet(0xB249),
            goblin_walk_down: keyed_sheet(0x3549),
            goblin_attack_down: keyed_sheet(0xAA89),
            cursor: crosshair(),
        }
    }
}

/// A goblin-sized sheet: solid body on a transparent field, with the
/// body inset wobbling per frame so the animation is visible.
fn keyed_sheet(body: u16) -> SpriteSheet {
    let size = GOBLIN_SPRITE_SIZE as usize;
    let frames = GOBLIN_ANIM_FRAMES as usize;
    let width = size * frames;
    let mut pixels = vec![CHROMA_KEY; width * size];

    for frame in 0..frames {
        let inset = 8 + (frame % 3);
        for y in inset..size - inset {
            for x in inset..size - inset {
                pixels[y * width + frame * size + x] = body;
            }
        }
    }

    SpriteSheet {
        width,
        height: size,
        frames,
        pixels,
    }
}

fn crosshair() -> SpriteSheet {
    let (w, h) = (CURSOR_WIDTH as usize, CURSOR_HEIGHT as usize);
    let mut pixels = vec![CHROMA_KEY; w * h];
    for x in 0..w {
        pixels[(h / 2) * w + x] = RED;
    }
    for y in 0..h {
        pixels[y * w + w / 2] = RED;
    }

    SpriteSheet {
        width: w,
        height: h,
        frames: 1,
        pixels,
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
