//! Double-buffered frame rendering.
//!
//! The renderer owns the background and the sprite bank, draws a whole
//! frame into whatever surface the controller calls the back buffer, then
//! requests the swap and busy-waits it out. That wait is the game's only
//! pacing mechanism; there is no separate frame clock.

mod assets;

pub use assets::{AssetError, Background, SpriteBank, SpriteSheet, CHROMA_KEY};

use crate::defs::{GREEN, SCREEN_HEIGHT, SCREEN_WIDTH, YELLOW};
use crate::hw::{FrameSink, Surface};
use crate::sim::{Cursor, GoblinHorde, Player, ProjectilePool, Rect};

pub struct Renderer<S> {
    sink: S,
    background: Background,
    sprites: SpriteBank,
}

impl<S: FrameSink> Renderer<S> {
    /// Bring up both surfaces: point the controller at each in turn and
    /// paint the background so the first real frame swaps onto a clean
    /// screen.
    pub fn new(mut sink: S, background: Background, sprites: SpriteBank) -> Self {
        sink.set_buffer_address(Surface::One);
        clear(&mut sink, &background);
        sink.request_swap();
        while sink.swap_pending() {}

        sink.set_buffer_address(Surface::Two);
        clear(&mut sink, &background);

        Self {
            sink,
            background,
            sprites,
        }
    }

    /// Draw one complete frame and block until the swap lands.
    pub fn refresh(
        &mut self,
        player: &Player,
        cursor: &Cursor,
        projectiles: &ProjectilePool,
        horde: &GoblinHorde,
    ) {
        clear(&mut self.sink, &self.background);

        fill_rect(&mut self.sink, player.rect(), GREEN);

        for shot in projectiles.iter() {
            fill_rect(&mut self.sink, shot.rect(), YELLOW);
        }

        for goblin in horde.iter() {
            let (sheet, mirror) = self.sprites.goblin(goblin.heading, goblin.attacking);
            blit(
                &mut self.sink,
                sheet,
                goblin.x,
                goblin.y,
                goblin.current_frame as usize,
                mirror,
            );
        }

        blit(&mut self.sink, &self.sprites.cursor, cursor.x, cursor.y, 0, false);

        self.sink.request_swap();
        while self.sink.swap_pending() {}
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

/// Copy the background over the whole back buffer.
fn clear<S: FrameSink>(sink: &mut S, background: &Background) {
    for y in 0..SCREEN_HEIGHT {
        for x in 0..SCREEN_WIDTH {
            sink.write_pixel(x, y, background.pixel(x, y));
        }
    }
}

/// Flat-color rectangle, clipped to the screen.
fn fill_rect<S: FrameSink>(sink: &mut S, rect: Rect, color: u16) {
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = (rect.x + rect.w).min(SCREEN_WIDTH);
    let y1 = (rect.y + rect.h).min(SCREEN_HEIGHT);
    for y in y0..y1 {
        for x in x0..x1 {
            sink.write_pixel(x, y, color);
        }
    }
}

/// Blit one animation frame, skipping chroma-key texels and anything
/// hanging off the screen edge.
fn blit<S: FrameSink>(
    sink: &mut S,
    sheet: &SpriteSheet,
    x: i32,
    y: i32,
    frame: usize,
    mirror: bool,
) {
    let fw = sheet.frame_width() as i32;
    let fh = sheet.height() as i32;
    for fy in 0..fh {
        let py = y + fy;
        if !(0..SCREEN_HEIGHT).contains(&py) {
            continue;
        }
        for fx in 0..fw {
            let px = x + fx;
            if !(0..SCREEN_WIDTH).contains(&px) {
                continue;
            }
            let texel = sheet.pixel(frame, fx as usize, fy as usize, mirror);
            if texel != CHROMA_KEY {
                sink.write_pixel(px, py, texel);
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
